//! Catalog index page reading.
//!
//! The index page lists the catalog version (`spdx:licenseListVersion`) and
//! one `spdx:licenseId` per listed license.

use std::collections::BTreeSet;

use crate::error::{HarvesterError, Result};
use crate::http::PageFetcher;
use crate::rdf::vocab::{LICENSE_ID, LICENSE_LIST_VERSION};
use crate::rdf::{FactSet, Object};
use crate::rdfa::extract_facts;
use crate::types::CatalogIndex;

/// Fetch the index page and read version and identifiers from it.
///
/// # Errors
/// * `Retrieval` if the page could not be fetched or did not answer 200
/// * `MissingVersion` if the page carries no version literal
pub fn read_index(fetcher: &impl PageFetcher, url: &str) -> Result<CatalogIndex> {
    let page = fetcher.fetch(url)?.ensure_ok()?;
    let facts = extract_facts(&page.body, &page.url);
    tracing::debug!(url = %url, facts = facts.len(), "Index page parsed");
    parse_index(&facts, url)
}

/// Read version and identifiers from index page facts.
///
/// The first version literal in document order wins. Identifier literals
/// are trimmed; duplicates collapse.
pub fn parse_index(facts: &FactSet, url: &str) -> Result<CatalogIndex> {
    let mut versions = facts
        .objects(LICENSE_LIST_VERSION)
        .filter_map(Object::as_literal)
        .map(|l| l.lexical.trim());

    let version = versions
        .next()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| HarvesterError::MissingVersion {
            url: url.to_string(),
        })?
        .to_string();
    if versions.next().is_some() {
        tracing::warn!(url = %url, version = %version, "Index page declares more than one version, using the first");
    }

    let identifiers: BTreeSet<String> = facts
        .objects(LICENSE_ID)
        .filter_map(Object::as_literal)
        .map(|l| l.lexical.trim().to_string())
        .collect();

    tracing::info!(version = %version, licenses = identifiers.len(), "Read license index");

    Ok(CatalogIndex {
        version,
        identifiers,
    })
}
