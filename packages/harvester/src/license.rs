//! License detail page retrieval.

use crate::config::{validate_identifier, SyncConfig};
use crate::error::Result;
use crate::http::PageFetcher;
use crate::rdf::Term;
use crate::rdfa::extract_facts;
use crate::types::LicenseFacts;

/// Fetch and extract the detail page for one license.
///
/// The identifier is validated before any request is made. The first subject
/// discovered on the page becomes the license root, and only facts about the
/// root (and the blank nodes it reaches) are kept. A page without any facts
/// is treated as describing the page URL itself.
///
/// # Errors
/// * `InvalidIdentifier` if the identifier is blank or contains `/` or `:`
/// * `Retrieval` if the page could not be fetched or did not answer 200
pub fn retrieve_license(
    fetcher: &impl PageFetcher,
    config: &SyncConfig,
    identifier: &str,
) -> Result<LicenseFacts> {
    let identifier = validate_identifier(identifier)?;
    let url = config.license_url(identifier);

    let page = fetcher.fetch(&url)?.ensure_ok()?;
    let facts = extract_facts(&page.body, &page.url);

    let root = match facts.first_subject() {
        Some(subject) => subject.clone(),
        None => {
            tracing::warn!(identifier, url = %url, "License page has no facts");
            Term::iri(page.url.as_str())
        }
    };
    let retained = facts.closure(&root);
    let dropped = facts.len() - retained.len();
    if dropped > 0 {
        tracing::debug!(identifier, dropped, "Ignoring facts not about the license root");
    }
    tracing::debug!(identifier, root = %root, facts = retained.len(), "License retrieved");

    Ok(LicenseFacts {
        identifier: identifier.to_string(),
        root,
        facts: retained,
    })
}
