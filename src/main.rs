//! # shopharvest CLI
//!
//! Runs one harvest over the selected category listings of the demo shop
//! and writes a CSV file per category.
//!
//! Requires a WebDriver server (chromedriver by default on port 9515).
//! Progress is shown as a bar over the categories; a summary with record
//! and skip counts is printed at the end, as text or JSON.

mod telemetry;

use anyhow::{anyhow, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use shopharvest::catalog::{category_names, default_categories, select_categories};
use shopharvest::config::{DEFAULT_BASE_URL, DEFAULT_WEBDRIVER_URL, HarvestConfig};
use shopharvest::harvest::harvest_with_webdriver;
use std::path::PathBuf;
use telemetry::TelemetryOptions;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Harvest product listings from the e-commerce demo shop into CSV files", long_about = None)]
struct Cli {
    /// Base listing URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// WebDriver server URL
    #[arg(long, default_value = DEFAULT_WEBDRIVER_URL)]
    webdriver: String,

    /// Directory to write the CSV files to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Categories to harvest (comma-separated; default: all)
    #[arg(short, long, value_delimiter = ',')]
    category: Vec<String>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Milliseconds to wait for new products after navigating or loading more
    #[arg(long, default_value = "5000")]
    settle_timeout_ms: u64,

    /// Milliseconds between page checks while waiting
    #[arg(long, default_value = "100")]
    poll_interval_ms: u64,

    /// Seconds allowed per category
    #[arg(long, default_value = "300")]
    category_timeout_secs: u64,

    /// Maximum "load more" steps per category
    #[arg(long, default_value = "500")]
    max_steps: usize,

    /// Summary format (text|json)
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Export traces and metrics over OTLP
    #[arg(long)]
    otlp: bool,
}

impl Cli {
    fn harvest_config(&self) -> HarvestConfig {
        HarvestConfig::builder()
            .base_url(self.base_url.clone())
            .webdriver_url(self.webdriver.clone())
            .output_dir(self.output_dir.clone())
            .headless(!self.headed)
            .settle_timeout_ms(self.settle_timeout_ms)
            .poll_interval_ms(self.poll_interval_ms)
            .category_timeout_secs(self.category_timeout_secs)
            .max_steps(self.max_steps)
            .build()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _otel = telemetry::init_tracing_subscriber(&TelemetryOptions {
        log_file: cli.log_file.clone(),
        otlp: cli.otlp,
    })?;

    let config = cli.harvest_config();
    let pages = select_categories(default_categories(&config.base_url)?, &cli.category)
        .map_err(|unknown| {
            anyhow!(
                "unknown category '{}' (expected one of: {})",
                unknown,
                category_names().join(", ")
            )
        })?;
    info!(categories = pages.len(), output_dir = %config.output_dir.display(), "Starting harvest");

    let progress_bar = ProgressBar::new(pages.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );
    progress_bar.set_message("Scraping pages");

    let summary = harvest_with_webdriver(config, &pages, |report| {
        progress_bar.inc(1);
        progress_bar.set_message(format!("{}: {} records", report.category, report.records));
    })
    .await?;
    progress_bar.finish_with_message("Done");

    match cli.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        _ => println!("{}", summary),
    }

    if summary.all_failed() {
        bail!("every category failed");
    }

    Ok(())
}
