//! HTTP access to the license catalog.
//!
//! The pipeline only needs "GET this URL, give me status and body", so that
//! capability sits behind the [`PageFetcher`] trait. [`HttpFetcher`] is the
//! production implementation on top of a blocking `reqwest` client.

use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::config::{DEFAULT_MAX_RESPONSE_SIZE, HTTP_TIMEOUT_SECS};
use crate::error::{HarvesterError, Result};

/// User agent string identifying this harvester.
const USER_AGENT: &str = concat!("license-harvester/", env!("CARGO_PKG_VERSION"));

/// A fetched page: any HTTP response, successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub url: String,
    pub status: StatusCode,
    pub body: String,
}

impl Page {
    /// Return the page if the server answered 200, a retrieval error otherwise.
    pub fn ensure_ok(self) -> Result<Self> {
        if self.status == StatusCode::OK {
            Ok(self)
        } else {
            Err(HarvesterError::Retrieval {
                url: self.url,
                status: Some(self.status),
                source: None,
            })
        }
    }
}

/// Performs a single GET request.
///
/// Implementations return `Ok` for every HTTP response regardless of status,
/// and `HarvesterError::Retrieval { status: None, .. }` when no response was
/// received at all.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<Page>;
}

impl<T: PageFetcher + ?Sized> PageFetcher for &T {
    fn fetch(&self, url: &str) -> Result<Page> {
        (**self).fetch(url)
    }
}

/// Create a configured HTTP client.
///
/// # Returns
/// A `reqwest::blocking::Client` configured with appropriate timeout and user agent.
pub fn create_client() -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// [`PageFetcher`] backed by a blocking `reqwest` client.
///
/// No retries: a failed request is reported immediately.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_response_size: u64,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
        }
    }

    #[must_use]
    pub fn with_max_response_size(mut self, limit: u64) -> Self {
        self.max_response_size = limit;
        self
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Page> {
        tracing::debug!(url = %url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| HarvesterError::Retrieval {
                url: url.to_string(),
                status: None,
                source: Some(e),
            })?;

        let status = response.status();
        if response
            .content_length()
            .is_some_and(|len| len > self.max_response_size)
        {
            return Err(HarvesterError::ResponseTooLarge {
                url: url.to_string(),
                limit: self.max_response_size,
            });
        }

        // Read one byte past the limit to detect oversized bodies without a
        // Content-Length header.
        let mut bytes = Vec::new();
        response
            .take(self.max_response_size + 1)
            .read_to_end(&mut bytes)
            .map_err(HarvesterError::Io)?;
        if bytes.len() as u64 > self.max_response_size {
            return Err(HarvesterError::ResponseTooLarge {
                url: url.to_string(),
                limit: self.max_response_size,
            });
        }

        tracing::debug!(url = %url, status = %status, bytes = bytes.len(), "Response received");

        Ok(Page {
            url: url.to_string(),
            status,
            body: bytes_to_string(&bytes, url),
        })
    }
}

/// Decode a response body as UTF-8, replacing invalid sequences.
pub fn bytes_to_string(bytes: &[u8], context: &str) -> String {
    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => s,
        Err(_) => {
            tracing::warn!(context, "Response is not valid UTF-8, decoding lossily");
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}
