//! Error types for the harvester.
//!
//! Every variant is fatal for a synchronization run: the pipeline aborts on
//! the first error and never writes a partial snapshot.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the harvester library.
#[derive(Debug, Error)]
pub enum HarvesterError {
    /// Identifier is blank or contains a path/scheme delimiter.
    #[error("Invalid license identifier: '{0}'. Identifiers must be non-blank and must not contain '/' or ':'")]
    InvalidIdentifier(String),

    /// Destination path is already present.
    #[error("Destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    /// A fetch returned no response or a non-200 status.
    #[error("Failed to retrieve {url}: {}", describe_status(.status))]
    Retrieval {
        url: String,
        status: Option<StatusCode>,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Index page carried no catalog version fact.
    #[error("No license list version found on index page {url}")]
    MissingVersion { url: String },

    /// Aggregate graph lost its single version literal.
    #[error("Catalog graph has {versions} version literals, expected exactly one")]
    InconsistentCatalog { versions: usize },

    /// Response body exceeded the configured size limit.
    #[error("Response from {url} exceeds the maximum size of {limit} bytes")]
    ResponseTooLarge { url: String, limit: u64 },

    /// HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot encoding or decoding failed.
    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] bincode::Error),

    /// Bytes are not a snapshot this version understands.
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

fn describe_status(status: &Option<StatusCode>) -> String {
    match status {
        Some(status) => format!("status {status}"),
        None => "no response".to_string(),
    }
}

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, HarvesterError>;
