//! Main harvester service that ties all components together.
//!
//! A run is strictly sequential: guard the destination, read the index,
//! then fetch every license in case-insensitive order with a pause before
//! each request, and finally write the snapshot. The first error aborts the
//! run; nothing is written unless every license was retrieved.

use std::cmp::Ordering;
use std::path::Path;

use crate::config::{validate_identifier, SyncConfig};
use crate::error::Result;
use crate::http::{create_client, HttpFetcher, PageFetcher};
use crate::index::read_index;
use crate::license::retrieve_license;
use crate::rate_limit::RateLimiter;
use crate::snapshot::{ensure_destination_free, write_snapshot};
use crate::types::{CatalogGraph, CatalogIndex, SyncSummary};

/// Receives progress notifications during a run.
pub trait SyncObserver {
    /// The index page was read.
    fn index_read(&mut self, _index: &CatalogIndex) {}

    /// About to retrieve license `position` (1-based) of `total`.
    fn license_started(&mut self, _position: usize, _total: usize, _identifier: &str) {}
}

/// Observer that ignores all notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SyncObserver for NoopObserver {}

/// Case-insensitive comparison with a case-sensitive tie-break, so the
/// order is total and deterministic.
pub fn compare_identifiers(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Sort identifiers into retrieval order.
pub fn sort_identifiers<'a, I>(identifiers: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut sorted: Vec<&str> = identifiers.into_iter().map(String::as_str).collect();
    sorted.sort_by(|a, b| compare_identifiers(a, b));
    sorted
}

/// Build the aggregate graph for the whole catalog.
///
/// Every identifier is validated before the first detail request, then
/// licenses are retrieved one at a time in sorted order, each preceded by
/// `limiter.throttle()`.
pub fn harvest_catalog(
    fetcher: &impl PageFetcher,
    limiter: &RateLimiter,
    config: &SyncConfig,
    observer: &mut dyn SyncObserver,
) -> Result<CatalogGraph> {
    let index = read_index(fetcher, &config.catalog_url)?;
    observer.index_read(&index);

    let identifiers = sort_identifiers(&index.identifiers);
    for identifier in &identifiers {
        validate_identifier(identifier)?;
    }

    let mut catalog = CatalogGraph::new(&config.catalog_url, &index.version);
    let total = identifiers.len();

    for (position, identifier) in identifiers.into_iter().enumerate() {
        observer.license_started(position + 1, total, identifier);
        tracing::info!(identifier, position = position + 1, total, "Downloading license");

        limiter.throttle();
        let license = retrieve_license(fetcher, config, identifier)?;
        let root = license.root.clone();
        if !catalog.add_member(license) {
            tracing::warn!(identifier, root = %root, "License root is already attached or is the catalog itself");
        }
    }

    Ok(catalog)
}

/// Run the full pipeline against `fetcher` and write the snapshot to `output`.
///
/// Fails with `DestinationExists` before any request if `output` exists, and
/// with `InconsistentCatalog` instead of writing a graph that does not carry
/// exactly one version.
pub fn sync_to_file(
    fetcher: &impl PageFetcher,
    limiter: &RateLimiter,
    config: &SyncConfig,
    output: &Path,
    observer: &mut dyn SyncObserver,
) -> Result<SyncSummary> {
    ensure_destination_free(output)?;

    let catalog = harvest_catalog(fetcher, limiter, config, observer)?;
    let version = catalog.checked_version()?.to_string();
    write_snapshot(&catalog, output)?;

    Ok(SyncSummary {
        version,
        license_count: catalog.member_count(),
        fact_count: catalog.graph().len(),
        output: output.to_path_buf(),
    })
}

/// Synchronize the catalog over HTTP into a snapshot file.
///
/// # Arguments
/// * `config` - Catalog location, pacing and size limits
/// * `output` - Destination path; must not exist
/// * `observer` - Progress notifications
///
/// # Returns
/// A summary of the written snapshot
pub fn sync_catalog(
    config: &SyncConfig,
    output: &Path,
    observer: &mut dyn SyncObserver,
) -> Result<SyncSummary> {
    let fetcher =
        HttpFetcher::new(create_client()?).with_max_response_size(config.max_response_size);
    let limiter = RateLimiter::new(config.request_delay);
    sync_to_file(&fetcher, &limiter, config, output, observer)
}
