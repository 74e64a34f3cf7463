//! HTTP access to the eAsistent public timetable pages.
//!
//! Provides [`HttpFetcher`], the network-backed [`DocumentFetcher`]:
//! - slug pages are fetched with `GET {base}/urniki/{path}`
//! - timetable fragments with a form `POST {base}/urniki/ajax_urnik`

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use urnik_core::{DocumentFetcher, QueryKey, TransportError};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_BASE_URL: &str = "https://www.easistent.com";
const TIMETABLE_ENDPOINT: &str = "urniki/ajax_urnik";
const USER_AGENT: &str = concat!("urnik/", env!("CARGO_PKG_VERSION"));

/// Fetcher construction errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The base URL is not an absolute http(s) URL.
    #[error("invalid base URL: {0:?}")]
    InvalidBaseUrl(String),
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// Blocking fetcher for a single eAsistent host.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct HttpFetcher {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpFetcher {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, HttpError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(HttpError::InvalidBaseUrl(base_url.to_string()));
        }

        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(HttpError::ClientBuild)?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of a public page below `urniki/`.
    pub fn page_url(&self, path: &str) -> String {
        format!("{}/urniki/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn timetable_url(&self) -> String {
        format!("{}/{TIMETABLE_ENDPOINT}", self.base_url)
    }

    fn read_body(
        url: &str,
        response: reqwest::blocking::Response,
    ) -> Result<String, TransportError> {
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().map_err(|err| request_error(url, err))
    }
}

fn request_error(url: &str, err: reqwest::Error) -> TransportError {
    TransportError::Request {
        url: url.to_string(),
        source: Box::new(err),
    }
}

impl DocumentFetcher for HttpFetcher {
    fn fetch_page(&self, path: &str) -> Result<String, TransportError> {
        let url = self.page_url(path);
        tracing::debug!(%url, "fetching page");
        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|err| request_error(&url, err))?;
        Self::read_body(&url, response)
    }

    fn fetch_timetable(&self, query: &QueryKey) -> Result<String, TransportError> {
        let url = self.timetable_url();
        tracing::debug!(%url, ?query, "fetching timetable");
        let response = self
            .http
            .post(&url)
            .form(&query.form_fields())
            .send()
            .map_err(|err| request_error(&url, err))?;
        Self::read_body(&url, response)
    }
}
