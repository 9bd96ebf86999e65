//! Configuration constants and validation functions for the harvester.

use std::time::Duration;

use crate::error::{HarvesterError, Result};

/// Canonical URL of the SPDX license catalog.
///
/// Serves as the index page, the base for detail pages, and the IRI of the
/// catalog root in the snapshot.
pub const CATALOG_URL: &str = "https://spdx.org/licenses/";

/// HTTP timeout in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Default pause before each license detail request, in milliseconds.
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 1000;

/// Default pause before each license detail request.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(DEFAULT_REQUEST_DELAY_MS);

/// Default maximum HTTP response size in bytes (16 MB).
///
/// License detail pages carry the full license text; the largest ones are
/// well below a megabyte.
pub const DEFAULT_MAX_RESPONSE_SIZE: u64 = 16 * 1024 * 1024;

/// Characters that would let an identifier escape the catalog path.
const FORBIDDEN_IDENTIFIER_CHARS: [char; 2] = ['/', ':'];

/// Settings for one synchronization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Catalog URL, always ending in `/`.
    pub catalog_url: String,
    /// Pause before every license detail request.
    pub request_delay: Duration,
    /// Upper bound for a single response body.
    pub max_response_size: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            catalog_url: CATALOG_URL.to_string(),
            request_delay: DEFAULT_REQUEST_DELAY,
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
        }
    }
}

impl SyncConfig {
    /// Use a different catalog location (e.g. a mirror).
    ///
    /// A trailing `/` is appended when missing so detail URLs stay inside
    /// the catalog path.
    #[must_use]
    pub fn with_catalog_url(mut self, url: impl Into<String>) -> Self {
        let mut url = url.into();
        if !url.ends_with('/') {
            url.push('/');
        }
        self.catalog_url = url;
        self
    }

    /// Set the pause before each license detail request.
    #[must_use]
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Build the detail page URL for an identifier.
    ///
    /// The identifier must have passed [`validate_identifier`].
    pub fn license_url(&self, identifier: &str) -> String {
        license_url(&self.catalog_url, identifier)
    }
}

/// Validate a license identifier before it is interpolated into a URL.
///
/// Rejects blank identifiers and identifiers containing `/` or `:`. This is a
/// request-forgery guard, not a general sanitizer: everything else is passed
/// through unchanged.
///
/// # Examples
/// ```
/// use license_harvester::config::validate_identifier;
///
/// assert_eq!(validate_identifier("Apache-2.0").unwrap(), "Apache-2.0");
/// assert!(validate_identifier("../etc").is_err());
/// assert!(validate_identifier("http:evil").is_err());
/// ```
pub fn validate_identifier(identifier: &str) -> Result<&str> {
    if identifier.trim().is_empty() || identifier.contains(FORBIDDEN_IDENTIFIER_CHARS) {
        return Err(HarvesterError::InvalidIdentifier(identifier.to_string()));
    }
    Ok(identifier)
}

/// Build a license detail URL from a catalog base URL.
///
/// # Panics
/// Debug builds panic if the identifier was not validated first.
pub fn license_url(catalog_url: &str, identifier: &str) -> String {
    debug_assert!(
        validate_identifier(identifier).is_ok(),
        "identifier should be validated before calling license_url"
    );
    format!("{catalog_url}{identifier}")
}
