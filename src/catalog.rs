//! Product records and the category pages they are harvested from

use serde::{Deserialize, Serialize};
use url::Url;

/// Category paths under the base listing, in processing order.
pub const CATEGORY_PATHS: [&str; 5] = ["computers", "laptops", "tablets", "phones", "touch"];

/// Name used for the base listing itself.
pub const HOME_CATEGORY: &str = "home";

/// One product listing extracted from the shop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product title
    pub title: String,

    /// Short description shown under the title
    pub description: String,

    /// Price with the currency symbol removed; finite and non-negative
    pub price: f64,

    /// Star rating, 0 when the listing carries no rating attribute
    pub rating: i32,

    /// Number of reviews
    pub num_of_reviews: u32,
}

/// A category listing paired with the file its products are written to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPage {
    /// Short category name, e.g. `laptops`
    pub name: String,

    /// Listing URL
    pub url: String,

    /// Output file name, e.g. `laptops.csv`
    pub filename: String,
}

impl CategoryPage {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        let name = name.into();
        let filename = format!("{name}.csv");
        Self {
            name,
            url: url.into(),
            filename,
        }
    }
}

/// Build the six category pages: the base listing plus every category path
/// resolved against it.
pub fn default_categories(base_url: &str) -> Result<Vec<CategoryPage>, url::ParseError> {
    let base = Url::parse(base_url)?;
    let mut pages = Vec::with_capacity(CATEGORY_PATHS.len() + 1);
    pages.push(CategoryPage::new(HOME_CATEGORY, base.as_str()));
    for path in CATEGORY_PATHS {
        pages.push(CategoryPage::new(path, base.join(path)?.as_str()));
    }
    Ok(pages)
}

/// Names accepted by [`select_categories`].
pub fn category_names() -> Vec<&'static str> {
    std::iter::once(HOME_CATEGORY).chain(CATEGORY_PATHS).collect()
}

/// Keep only the pages whose names appear in `names`, preserving the
/// processing order. An empty filter keeps everything.
///
/// Returns the first unknown name as the error.
pub fn select_categories(
    pages: Vec<CategoryPage>,
    names: &[String],
) -> Result<Vec<CategoryPage>, String> {
    if names.is_empty() {
        return Ok(pages);
    }
    if let Some(unknown) = names
        .iter()
        .find(|name| !pages.iter().any(|page| &page.name == *name))
    {
        return Err(unknown.clone());
    }
    Ok(pages
        .into_iter()
        .filter(|page| names.contains(&page.name))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://webscraper.io/test-sites/e-commerce/more/";

    #[test]
    fn test_default_categories() {
        let pages = default_categories(BASE).unwrap();

        assert_eq!(pages.len(), 6);
        assert_eq!(pages[0].name, "home");
        assert_eq!(pages[0].url, BASE);
        assert_eq!(pages[0].filename, "home.csv");
        assert_eq!(
            pages[1].url,
            "https://webscraper.io/test-sites/e-commerce/more/computers"
        );
        assert_eq!(pages[5].filename, "touch.csv");
    }

    #[test]
    fn test_default_categories_invalid_base() {
        assert!(default_categories("not a url").is_err());
    }

    #[test]
    fn test_select_categories_keeps_order() {
        let pages = default_categories(BASE).unwrap();
        let names = vec!["phones".to_string(), "home".to_string()];

        let selected = select_categories(pages, &names).unwrap();
        let selected: Vec<_> = selected.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(selected, vec!["home", "phones"]);
    }

    #[test]
    fn test_select_categories_unknown_name() {
        let pages = default_categories(BASE).unwrap();
        let names = vec!["laptops".to_string(), "fridges".to_string()];

        assert_eq!(select_categories(pages, &names), Err("fridges".to_string()));
    }

    #[test]
    fn test_category_names() {
        assert_eq!(
            category_names(),
            vec!["home", "computers", "laptops", "tablets", "phones", "touch"]
        );
    }
}
