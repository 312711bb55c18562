//! Field-level parsing of a product element

use scraper::ElementRef;

use super::{ExtractError, Field, ProductSelectors};
use crate::catalog::Product;

/// Extract a product from one product element.
///
/// Title, description, price and review count must be present. The rating
/// element is optional; a listing without one is rated 0.
pub fn extract_product(
    element: ElementRef<'_>,
    selectors: &ProductSelectors,
) -> Result<Product, ExtractError> {
    let title = field_text(element, selectors, Field::Title)?;
    let description = field_text(element, selectors, Field::Description)?;
    let price = parse_price(&field_text(element, selectors, Field::Price)?)?;
    let rating = parse_rating(
        element
            .select(selectors.for_field(Field::Rating))
            .next()
            .and_then(|rating| rating.value().attr("data-rating")),
    )?;
    let num_of_reviews = parse_review_count(&field_text(element, selectors, Field::Reviews)?)?;

    Ok(Product {
        title,
        description,
        price,
        rating,
        num_of_reviews,
    })
}

/// Trimmed text content of the first element matching the field's selector
fn field_text(
    element: ElementRef<'_>,
    selectors: &ProductSelectors,
    field: Field,
) -> Result<String, ExtractError> {
    element
        .select(selectors.for_field(field))
        .next()
        .map(|found| found.text().collect::<String>().trim().to_string())
        .ok_or(ExtractError::Structure {
            field,
            selector: field.selector(),
        })
}

/// Parse a price such as `"$899.00"`.
///
/// One leading `$` is stripped; the rest must be a finite, non-negative
/// decimal number.
pub fn parse_price(text: &str) -> Result<f64, ExtractError> {
    let trimmed = text.trim();
    let amount = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
    let price = amount
        .parse::<f64>()
        .map_err(|e| ExtractError::parse(Field::Price, text, e))?;

    if !price.is_finite() {
        return Err(ExtractError::parse(Field::Price, text, "not a finite number"));
    }
    if price < 0.0 {
        return Err(ExtractError::parse(Field::Price, text, "negative price"));
    }
    Ok(price)
}

/// Parse the `data-rating` attribute, treating an absent attribute as 0
pub fn parse_rating(attr: Option<&str>) -> Result<i32, ExtractError> {
    let value = attr.unwrap_or("0");
    value
        .trim()
        .parse::<i32>()
        .map_err(|e| ExtractError::parse(Field::Rating, value, e))
}

/// Parse the leading number of a review label such as `"24 reviews"`
pub fn parse_review_count(text: &str) -> Result<u32, ExtractError> {
    let token = text
        .split_whitespace()
        .next()
        .ok_or_else(|| ExtractError::parse(Field::Reviews, text, "empty review text"))?;
    token
        .parse::<u32>()
        .map_err(|e| ExtractError::parse(Field::Reviews, text, e))
}
