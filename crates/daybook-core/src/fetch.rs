//! Fetch a source file from a code-hosting URL for `visualize_code`.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use thiserror::Error;

use crate::config::DaybookConfig;

pub const VISUALIZE_PROMPT: &str = "Please generate an SVG visualization for this code:\n\n";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Error fetching code: {0}")]
    Request(#[source] reqwest::Error),
}

/// How `visualize_code` decides that the fetched text is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSniffing {
    /// Any text containing "error" (case-insensitive) is returned bare,
    /// including source files that merely mention the word.
    Legacy,
    /// Only an actual fetch failure is treated as an error.
    FetchResult,
}

impl ErrorSniffing {
    pub fn from_config(config: &DaybookConfig) -> Self {
        if config.legacy_error_sniffing() {
            ErrorSniffing::Legacy
        } else {
            ErrorSniffing::FetchResult
        }
    }
}

/// Rewrite a repository browser URL to its raw-content URL.
///
/// `https://github.com/o/r/blob/main/src/lib.rs` becomes
/// `https://raw.githubusercontent.com/o/r/main/src/lib.rs`.
pub fn raw_content_url(url: &str) -> String {
    url.replace("github.com", "raw.githubusercontent.com")
        .replace("/blob/", "/")
}

pub fn looks_like_error(text: &str) -> bool {
    text.to_lowercase().contains("error")
}

pub fn visualization_prompt(code: &str) -> String {
    format!("{VISUALIZE_PROMPT}{code}")
}

#[derive(Debug, Clone)]
pub struct CodeFetcher {
    client: reqwest::Client,
}

impl CodeFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("text/html"));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    pub fn from_config(config: &DaybookConfig) -> Result<Self, FetchError> {
        Self::new(config.fetch_timeout(), &config.user_agent())
    }

    /// Single GET against the raw-content URL. Non-2xx statuses are errors.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let raw_url = raw_content_url(url);
        tracing::debug!(url = %raw_url, "fetching source");
        let response = self
            .client
            .get(&raw_url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(FetchError::Request)?;
        response.text().await.map_err(FetchError::Request)
    }
}

/// Fetch `url` and wrap the source into the visualization prompt.
///
/// Failures come back as `"Error fetching code: ..."` text rather than an
/// error value.
pub async fn visualize_code(fetcher: &CodeFetcher, url: &str, sniffing: ErrorSniffing) -> String {
    let code = match fetcher.fetch(url).await {
        Ok(code) => code,
        Err(err) => {
            tracing::warn!(url, error = %err, "fetch failed");
            return err.to_string();
        }
    };
    if sniffing == ErrorSniffing::Legacy && looks_like_error(&code) {
        tracing::debug!(url, "fetched text mentions \"error\"; returning it unwrapped");
        return code;
    }
    visualization_prompt(&code)
}
