//! License Harvester - Synchronize the SPDX license list into one snapshot.
//!
//! This crate visits the license catalog index page, discovers every listed
//! license, fetches each license's detail page at a polite pace, extracts
//! the RDFa facts embedded in those pages and writes everything as a single
//! binary graph snapshot.
//!
//! # Example
//!
//! ```
//! use license_harvester::config;
//!
//! // Identifiers are checked before they become part of a URL
//! assert!(config::validate_identifier("MIT").is_ok());
//! assert!(config::validate_identifier("../etc").is_err());
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Constants, run configuration and identifier validation
//! - [`error`]: Error types and Result alias
//! - [`http`]: Page fetching over HTTP
//! - [`rdf`]: Facts and the in-memory graph
//! - [`rdfa`]: RDFa fact extraction from HTML
//! - [`rate_limit`]: Pacing between license requests
//! - [`index`]: Catalog index page reading
//! - [`license`]: License detail page retrieval
//! - [`types`]: Core data types, including the aggregate catalog graph
//! - [`snapshot`]: Snapshot format, destination guard and writer
//! - [`harvester`]: Main harvester pipeline
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod harvester;
pub mod http;
pub mod index;
pub mod license;
pub mod rate_limit;
pub mod rdf;
pub mod rdfa;
pub mod snapshot;
pub mod types;

// Re-export main functions
pub use harvester::{harvest_catalog, sync_catalog, sync_to_file};

// Re-export commonly used items
pub use config::{validate_identifier, SyncConfig};
pub use error::{HarvesterError, Result};
pub use types::{CatalogGraph, CatalogIndex, LicenseFacts, SyncSummary};
