//! Per-category reports and the end-of-run summary

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use super::{CategoryOutcome, HarvestError};
use crate::catalog::CategoryPage;
use crate::extract::{ExtractError, ExtractFailure};

/// A product that was left out of its category file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedProduct {
    /// Position of the product within the category
    pub index: usize,

    /// `structure` or `parse`
    pub kind: String,

    /// Error message
    pub reason: String,
}

impl From<ExtractFailure> for SkippedProduct {
    fn from(failure: ExtractFailure) -> Self {
        let kind = match failure.error {
            ExtractError::Structure { .. } => "structure",
            ExtractError::Parse { .. } => "parse",
            ExtractError::InvalidSelector { .. } => "selector",
        };
        Self {
            index: failure.index,
            kind: kind.to_string(),
            reason: failure.error.to_string(),
        }
    }
}

/// What happened to one category
#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
    pub category: String,
    pub url: String,

    /// Output file, when one was written
    pub output: Option<PathBuf>,

    /// Pagination steps taken
    pub steps: usize,

    /// Records written
    pub records: usize,

    /// Products that could not be extracted
    pub skipped: Vec<SkippedProduct>,

    /// Why the category was aborted
    pub error: Option<String>,
}

impl CategoryReport {
    pub(crate) fn completed(page: &CategoryPage, outcome: CategoryOutcome) -> Self {
        Self {
            category: page.name.clone(),
            url: page.url.clone(),
            output: Some(outcome.output),
            steps: outcome.steps,
            records: outcome.written,
            skipped: outcome.skipped,
            error: None,
        }
    }

    pub(crate) fn failed(page: &CategoryPage, error: &HarvestError) -> Self {
        Self {
            category: page.name.clone(),
            url: page.url.clone(),
            output: None,
            steps: 0,
            records: 0,
            skipped: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub categories: Vec<CategoryReport>,
}

impl RunSummary {
    pub fn total_records(&self) -> usize {
        self.categories.iter().map(|c| c.records).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.categories.iter().map(|c| c.skipped.len()).sum()
    }

    /// Categories that were aborted
    pub fn failed(&self) -> impl Iterator<Item = &CategoryReport> {
        self.categories.iter().filter(|c| !c.is_ok())
    }

    /// True when at least one category was requested and none succeeded
    pub fn all_failed(&self) -> bool {
        !self.categories.is_empty() && self.categories.iter().all(|c| !c.is_ok())
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.categories {
            match &report.error {
                None => writeln!(
                    f,
                    "{:<10} {:>5} records  {:>3} skipped  -> {}",
                    report.category,
                    report.records,
                    report.skipped.len(),
                    report
                        .output
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default()
                )?,
                Some(error) => writeln!(f, "{:<10} FAILED: {}", report.category, error)?,
            }
        }
        let elapsed = self.finished_at - self.started_at;
        write!(
            f,
            "{} categories ({} failed), {} records, {} skipped in {:.1}s",
            self.categories.len(),
            self.failed().count(),
            self.total_records(),
            self.total_skipped(),
            elapsed.num_milliseconds() as f64 / 1000.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Field;

    fn page(name: &str) -> CategoryPage {
        CategoryPage::new(name, format!("http://shop.test/{name}"))
    }

    fn completed(name: &str, written: usize, skipped: usize) -> CategoryReport {
        let skipped = (0..skipped)
            .map(|index| SkippedProduct {
                index,
                kind: "parse".to_string(),
                reason: "bad".to_string(),
            })
            .collect();
        CategoryReport::completed(
            &page(name),
            CategoryOutcome {
                steps: 1,
                found: written,
                written,
                skipped,
                output: PathBuf::from(format!("{name}.csv")),
            },
        )
    }

    #[test]
    fn test_skipped_product_from_failure() {
        let skipped = SkippedProduct::from(ExtractFailure {
            index: 7,
            error: ExtractError::Structure {
                field: Field::Price,
                selector: ".price",
            },
        });

        assert_eq!(skipped.index, 7);
        assert_eq!(skipped.kind, "structure");
        assert!(skipped.reason.contains(".price"));
    }

    #[test]
    fn test_summary_totals() {
        let timeout = HarvestError::Timeout {
            category: "phones".to_string(),
            after: std::time::Duration::from_secs(1),
        };
        let summary = RunSummary {
            started_at: Utc::now(),
            finished_at: Utc::now(),
            categories: vec![
                completed("home", 3, 1),
                CategoryReport::failed(&page("phones"), &timeout),
                completed("touch", 4, 0),
            ],
        };

        assert_eq!(summary.total_records(), 7);
        assert_eq!(summary.total_skipped(), 1);
        assert_eq!(summary.failed().count(), 1);
        assert!(!summary.all_failed());

        let text = summary.to_string();
        assert!(text.contains("phones     FAILED: category phones timed out"));
        assert!(text.contains("3 categories (1 failed), 7 records, 1 skipped"));
    }

    #[test]
    fn test_summary_serializes_to_json() {
        let summary = RunSummary {
            started_at: Utc::now(),
            finished_at: Utc::now(),
            categories: vec![completed("laptops", 2, 0)],
        };

        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["categories"][0]["category"], "laptops");
        assert_eq!(json["categories"][0]["records"], 2);
        assert!(json["categories"][0]["error"].is_null());
    }

    #[test]
    fn test_all_failed() {
        let err = HarvestError::Timeout {
            category: "home".to_string(),
            after: std::time::Duration::from_secs(1),
        };
        let summary = RunSummary {
            started_at: Utc::now(),
            finished_at: Utc::now(),
            categories: vec![CategoryReport::failed(&page("home"), &err)],
        };

        assert!(summary.all_failed());
    }
}
