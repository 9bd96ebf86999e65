//! Command-line interface for the harvester.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{SyncConfig, CATALOG_URL, DEFAULT_REQUEST_DELAY_MS};
use crate::error::Result;
use crate::harvester::{sync_catalog, SyncObserver};
use crate::snapshot::ensure_destination_free;
use crate::types::CatalogIndex;

/// License Harvester - Download the SPDX license list into a single snapshot file.
#[derive(Parser)]
#[command(name = "license-harvester")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Destination file for the snapshot (must not exist)
    pub output: PathBuf,

    /// License catalog URL
    #[arg(long, default_value = CATALOG_URL)]
    pub catalog_url: String,

    /// Pause before each license request, in milliseconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_DELAY_MS)]
    pub delay_ms: u64,
}

impl Cli {
    /// Build the run configuration from the parsed arguments.
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig::default()
            .with_catalog_url(self.catalog_url.as_str())
            .with_request_delay(Duration::from_millis(self.delay_ms))
    }
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    sync_command(&cli.sync_config(), &cli.output)
}

/// Drives an indicatif progress bar from pipeline notifications.
struct ProgressObserver {
    pb: ProgressBar,
}

impl SyncObserver for ProgressObserver {
    fn index_read(&mut self, index: &CatalogIndex) {
        self.pb.println(format!(
            "  License list version: {}",
            style(&index.version).green()
        ));
        self.pb.println(format!("  Licenses: {}", index.identifiers.len()));
        self.pb.set_length(index.identifiers.len() as u64);
        self.pb.set_position(0);
    }

    fn license_started(&mut self, position: usize, _total: usize, identifier: &str) {
        self.pb.set_position(position.saturating_sub(1) as u64);
        self.pb.set_message(format!("Downloading license {identifier}"));
    }
}

/// Execute the sync command.
fn sync_command(config: &SyncConfig, output: &Path) -> Result<()> {
    // Fail fast before printing anything or touching the network
    ensure_destination_free(output)?;

    println!(
        "{} {} into {}",
        style("Synchronizing").bold(),
        style(&config.catalog_url).cyan(),
        style(output.display()).green()
    );
    println!();

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .expect("valid template"),
    );
    pb.set_message("Reading license index...");
    pb.enable_steady_tick(Duration::from_millis(100));

    let mut observer = ProgressObserver { pb: pb.clone() };
    let summary = match sync_catalog(config, output, &mut observer) {
        Ok(summary) => summary,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    pb.finish_and_clear();

    println!("  Facts: {}", summary.fact_count);
    println!();
    println!(
        "{} {} licenses (version {}) to {}",
        style("Saved").green().bold(),
        summary.license_count,
        summary.version,
        summary.output.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_output() {
        let cli = Cli::parse_from(["license-harvester", "licenses.bin"]);

        assert_eq!(cli.output, PathBuf::from("licenses.bin"));
        assert_eq!(cli.catalog_url, CATALOG_URL);
        assert_eq!(cli.delay_ms, 1000);
        assert_eq!(cli.sync_config(), SyncConfig::default());
    }

    #[test]
    fn test_cli_parse_overrides() {
        let cli = Cli::parse_from([
            "license-harvester",
            "out.bin",
            "--catalog-url",
            "http://localhost:8080/licenses",
            "--delay-ms",
            "0",
        ]);

        let config = cli.sync_config();
        assert_eq!(config.catalog_url, "http://localhost:8080/licenses/");
        assert_eq!(config.request_delay, Duration::ZERO);
    }

    #[test]
    fn test_cli_requires_output() {
        assert!(Cli::try_parse_from(["license-harvester"]).is_err());
    }
}
