//! # Record Extraction Module
//!
//! Turns one product element of a listing page into a validated [`Product`].
//! Every field is located with a fixed CSS selector; a selector that matches
//! nothing is a structure error, a value that cannot be converted is a parse
//! error. Batches are converted element by element so a single malformed
//! listing never costs its siblings.
//!
//! ## Key Components
//!
//! - `ProductSelectors`: the compiled field selectors
//! - `ProductFragment`: the outer HTML of one product element and its position
//! - `extract_product`: element to record
//! - `extract_all`: batch-tolerant conversion of a category's fragments

mod error;
mod record;

pub use error::ExtractError;
pub use record::{extract_product, parse_price, parse_rating, parse_review_count};

use std::fmt;

use scraper::{Html, Selector};
use serde::Serialize;
use tracing::warn;

use crate::catalog::Product;

/// The fields of a product listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Description,
    Price,
    Rating,
    Reviews,
}

impl Field {
    /// CSS selector locating the field inside a product element
    pub fn selector(self) -> &'static str {
        match self {
            Field::Title => ".title",
            Field::Description => ".description",
            Field::Price => ".price",
            Field::Rating => ".ratings > p[data-rating]",
            Field::Reviews => ".ratings > p.pull-right",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::Price => "price",
            Field::Rating => "rating",
            Field::Reviews => "review count",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compile a CSS selector, mapping the parser error into [`ExtractError`]
pub fn compile_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Compiled selectors for every product field
#[derive(Debug, Clone)]
pub struct ProductSelectors {
    pub(crate) title: Selector,
    pub(crate) description: Selector,
    pub(crate) price: Selector,
    pub(crate) rating: Selector,
    pub(crate) reviews: Selector,
}

impl ProductSelectors {
    pub fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            title: compile_selector(Field::Title.selector())?,
            description: compile_selector(Field::Description.selector())?,
            price: compile_selector(Field::Price.selector())?,
            rating: compile_selector(Field::Rating.selector())?,
            reviews: compile_selector(Field::Reviews.selector())?,
        })
    }

    pub(crate) fn for_field(&self, field: Field) -> &Selector {
        match field {
            Field::Title => &self.title,
            Field::Description => &self.description,
            Field::Price => &self.price,
            Field::Rating => &self.rating,
            Field::Reviews => &self.reviews,
        }
    }
}

/// The markup of one product element, detached from the live page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFragment {
    /// Zero-based position within the category, in display order
    pub index: usize,

    /// Outer HTML of the product element
    pub html: String,
}

impl ProductFragment {
    pub fn new(index: usize, html: impl Into<String>) -> Self {
        Self {
            index,
            html: html.into(),
        }
    }

    /// Parse the fragment and extract its product. The fragment itself is
    /// left untouched, so repeated calls yield the same record.
    pub fn extract(&self, selectors: &ProductSelectors) -> Result<Product, ExtractError> {
        let document = Html::parse_fragment(&self.html);
        extract_product(document.root_element(), selectors)
    }
}

/// A fragment that could not be converted
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractFailure {
    /// Position of the fragment within the category
    pub index: usize,

    /// Why the conversion failed
    pub error: ExtractError,
}

/// Result of converting a batch of fragments
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Successfully extracted products, in fragment order
    pub products: Vec<Product>,

    /// Fragments that were skipped
    pub failures: Vec<ExtractFailure>,
}

/// Convert every fragment independently. Failures are logged with the
/// category and fragment index, then skipped.
pub fn extract_all(
    category: &str,
    fragments: &[ProductFragment],
    selectors: &ProductSelectors,
) -> Extraction {
    let mut extraction = Extraction::default();
    for fragment in fragments {
        match fragment.extract(selectors) {
            Ok(product) => extraction.products.push(product),
            Err(error) => {
                warn!(category, index = fragment.index, %error, "Skipping product");
                extraction.failures.push(ExtractFailure {
                    index: fragment.index,
                    error,
                });
            }
        }
    }
    extraction
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_html(title: &str, price: &str, reviews: &str) -> String {
        format!(
            r#"<div class="thumbnail">
                <div class="caption">
                    <h4 class="price">{price}</h4>
                    <h4><a class="title" href="/product/1">{title}</a></h4>
                    <p class="description">A product</p>
                </div>
                <div class="ratings">
                    <p class="pull-right">{reviews}</p>
                    <p data-rating="3"></p>
                </div>
            </div>"#
        )
    }

    #[test]
    fn test_field_selectors_match_their_elements() {
        let selectors = ProductSelectors::new().unwrap();
        let html = Html::parse_fragment(&product_html("Asus VivoBook", "$295.99", "7 reviews"));

        let text = |field: Field| -> String {
            let element = html
                .select(selectors.for_field(field))
                .next()
                .unwrap_or_else(|| panic!("{field} matched nothing"));
            element.text().collect::<String>().trim().to_string()
        };
        assert_eq!(text(Field::Title), "Asus VivoBook");
        assert_eq!(text(Field::Description), "A product");
        assert_eq!(text(Field::Price), "$295.99");
        assert_eq!(text(Field::Reviews), "7 reviews");

        let rating = html.select(selectors.for_field(Field::Rating)).next().unwrap();
        assert_eq!(rating.value().attr("data-rating"), Some("3"));
        assert_eq!(rating.value().attr("class"), None);
    }

    #[test]
    fn test_compile_selector_invalid() {
        let err = compile_selector("div[").unwrap_err();
        match err {
            ExtractError::InvalidSelector { selector, .. } => assert_eq!(selector, "div["),
            other => panic!("Expected InvalidSelector, got {other:?}"),
        }
    }

    #[test]
    fn test_fragment_extract_is_idempotent() {
        let selectors = ProductSelectors::new().unwrap();
        let fragment = ProductFragment::new(0, product_html("Asus VivoBook", "$295.99", "14 reviews"));

        let first = fragment.extract(&selectors).unwrap();
        let second = fragment.extract(&selectors).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.title, "Asus VivoBook");
        assert_eq!(first.price, 295.99);
        assert_eq!(first.rating, 3);
        assert_eq!(first.num_of_reviews, 14);
    }

    #[test]
    fn test_extract_all_skips_bad_fragments() {
        let selectors = ProductSelectors::new().unwrap();
        let fragments = vec![
            ProductFragment::new(0, product_html("One", "$10.00", "1 reviews")),
            ProductFragment::new(1, product_html("Two", "$ten", "2 reviews")),
            ProductFragment::new(2, "<div class=\"thumbnail\"><p>broken</p></div>"),
            ProductFragment::new(3, product_html("Four", "$40.50", "4 reviews")),
        ];

        let extraction = extract_all("laptops", &fragments, &selectors);

        let titles: Vec<_> = extraction.products.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Four"]);
        assert_eq!(extraction.failures.len(), 2);
        assert_eq!(extraction.failures[0].index, 1);
        assert!(extraction.failures[0].error.is_parse());
        assert_eq!(extraction.failures[1].index, 2);
        assert!(extraction.failures[1].error.is_structure());
    }

    #[test]
    fn test_field_display() {
        assert_eq!(Field::Reviews.to_string(), "review count");
        assert_eq!(Field::Price.to_string(), "price");
    }
}
