//! CSV output for harvested products
//!
//! Files are written to a temporary sibling and renamed into place, so a
//! category file either has its header row or does not exist.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::catalog::Product;
use crate::error::Error as CrateError;

/// Header row of every output file
pub const HEADER: [&str; 5] = ["Title", "Description", "Price", "Rating", "Number of Reviews"];

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV error on {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl From<OutputError> for CrateError {
    fn from(err: OutputError) -> Self {
        CrateError::Output(err.to_string())
    }
}

/// Format a price so it always carries a fractional part (`899.0`, `1139.54`)
pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 && price.abs() < 1e15 {
        format!("{price:.1}")
    } else {
        price.to_string()
    }
}

fn product_record(product: &Product) -> [String; 5] {
    [
        product.title.clone(),
        product.description.clone(),
        format_price(product.price),
        product.rating.to_string(),
        product.num_of_reviews.to_string(),
    ]
}

/// Write `products` to `path` behind the header row. Returns the number of
/// product rows written.
pub fn write_products(path: &Path, products: &[Product]) -> Result<usize, OutputError> {
    let io_err = |source: io::Error| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let result = write_csv(&tmp, products).and_then(|()| fs::rename(&tmp, path).map_err(io_err));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result?;

    debug!(path = %path.display(), rows = products.len(), "Wrote CSV");
    Ok(products.len())
}

fn write_csv(path: &Path, products: &[Product]) -> Result<(), OutputError> {
    let csv_err = |source: csv::Error| OutputError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    writer.write_record(HEADER).map_err(csv_err)?;
    for product in products {
        writer.write_record(product_record(product)).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(title: &str, price: f64) -> Product {
        Product {
            title: title.to_string(),
            description: "14\" screen, 8GB".to_string(),
            price,
            rating: 3,
            num_of_reviews: 12,
        }
    }

    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)
            .unwrap();
        reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect()
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(899.0), "899.0");
        assert_eq!(format_price(1139.54), "1139.54");
        assert_eq!(format_price(0.0), "0.0");
        assert_eq!(format_price(24.5), "24.5");
    }

    #[test]
    fn test_write_products() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("laptops.csv");
        let products = vec![product("Acer, Aspire", 899.0), product("Dell", 1139.54)];

        let written = write_products(&path, &products).unwrap();

        assert_eq!(written, 2);
        let rows = read_rows(&path);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], HEADER.to_vec());
        assert_eq!(
            rows[1],
            vec!["Acer, Aspire", "14\" screen, 8GB", "899.0", "3", "12"]
        );
        assert_eq!(rows[2][2], "1139.54");
        assert!(!dir.path().join("laptops.csv.tmp").exists());
    }

    #[test]
    fn test_write_empty_category_keeps_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("touch.csv");

        assert_eq!(write_products(&path, &[]).unwrap(), 0);

        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(raw, "Title,Description,Price,Rating,Number of Reviews\n");
    }

    #[test]
    fn test_write_creates_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/home.csv");

        write_products(&path, &[product("One", 1.0)]).unwrap();

        assert_eq!(read_rows(&path).len(), 2);
    }

    #[test]
    fn test_write_into_missing_parent_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();
        let path = blocker.join("home.csv");

        let err = write_products(&path, &[product("One", 1.0)]).unwrap_err();

        assert!(matches!(err, OutputError::Io { .. }));
        assert!(!path.exists());
    }
}
