//! Fetcher capability and its HTTP implementation
//!
//! The crawl core only knows the [`Fetcher`] trait: give it an address, get back
//! a body and the ordered addresses discovered in it, or a [`FetchError`].
//! [`HttpFetcher`] is the network-backed implementation:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to fetch page content
//! - Error classification
//! - Link extraction for HTML responses

use crate::config::UserAgentConfig;
use crate::crawler::parser::extract_links;
use crate::Address;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A successfully retrieved resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage<A> {
    /// Page body content
    pub body: String,

    /// Discovered addresses, in document order
    pub links: Vec<A>,
}

impl<A> FetchedPage<A> {
    pub fn new(body: impl Into<String>, links: Vec<A>) -> Self {
        Self {
            body: body.into(),
            links,
        }
    }
}

/// Failure to retrieve a claimed address
///
/// Every variant is local to the task that issued the fetch: it is reported
/// and that task ends without children. Nothing is retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("not found: {address}")]
    NotFound { address: String },

    #[error("HTTP {status} for {address}")]
    Status { address: String, status: u16 },

    #[error("transport error for {address}: {message}")]
    Transport { address: String, message: String },

    #[error("fetch of {address} timed out")]
    Timeout { address: String },

    #[error("failed to read body of {address}: {message}")]
    Body { address: String, message: String },
}

impl FetchError {
    /// The address whose fetch failed
    pub fn address(&self) -> &str {
        match self {
            Self::NotFound { address }
            | Self::Status { address, .. }
            | Self::Transport { address, .. }
            | Self::Timeout { address }
            | Self::Body { address, .. } => address,
        }
    }
}

/// Retrieves content and outbound links for an address
#[async_trait]
pub trait Fetcher<A: Address>: Send + Sync {
    async fn fetch(&self, address: &A) -> Result<FetchedPage<A>, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Overall request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages over HTTP and extracts their links
///
/// Addresses are URL strings. Relative hrefs are resolved against the final
/// URL of the response. Non-HTML responses succeed with no links and an
/// empty body; their bodies are not downloaded.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher from the user agent configuration
    pub fn from_config(
        config: &UserAgentConfig,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config, timeout)?))
    }
}

#[async_trait]
impl Fetcher<String> for HttpFetcher {
    async fn fetch(&self, address: &String) -> Result<FetchedPage<String>, FetchError> {
        let response = self
            .client
            .get(address.as_str())
            .send()
            .await
            .map_err(|e| classify_transport_error(address, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                address: address.clone(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                address: address.clone(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        // Non-HTML bodies are never read
        if !is_html(&content_type) {
            tracing::debug!("{} is {}, not following links", address, content_type);
            return Ok(FetchedPage::new(String::new(), Vec::new()));
        }

        let body = response.text().await.map_err(|e| FetchError::Body {
            address: address.clone(),
            message: e.to_string(),
        })?;

        let links = extract_links(&body, &final_url);
        Ok(FetchedPage::new(body, links))
    }
}

/// Media types compare case-insensitively and may carry parameters
fn is_html(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|media_type| media_type.trim().eq_ignore_ascii_case("text/html"))
        .unwrap_or(false)
}

fn classify_transport_error(address: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            address: address.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Transport {
            address: address.to_string(),
            message: "Connection refused".to_string(),
        }
    } else if error.is_builder() {
        // Unparseable address: reqwest rejects it before sending
        let message = Url::parse(address)
            .err()
            .map(|e| e.to_string())
            .unwrap_or_else(|| error.to_string());
        FetchError::Transport {
            address: address.to_string(),
            message,
        }
    } else {
        FetchError::Transport {
            address: address.to_string(),
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }

    #[test]
    fn test_build_http_client() {
        let config = create_test_config();
        let client = build_http_client(&config, Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[test]
    fn test_user_agent_format() {
        let config = create_test_config();
        assert_eq!(
            config.header_value(),
            "TestCrawler/1.0 (+https://example.com/about; admin@example.com)"
        );
    }

    #[test]
    fn test_fetch_error_address() {
        let err = FetchError::Status {
            address: "https://example.com/x".to_string(),
            status: 500,
        };
        assert_eq!(err.address(), "https://example.com/x");
        assert_eq!(err.to_string(), "HTTP 500 for https://example.com/x");
    }

    #[test]
    fn test_not_found_message() {
        let err = FetchError::NotFound {
            address: "https://golang.org/cmd/".to_string(),
        };
        assert_eq!(err.to_string(), "not found: https://golang.org/cmd/");
    }

    #[test]
    fn test_is_html() {
        assert!(is_html("text/html"));
        assert!(is_html("text/html; charset=utf-8"));
        assert!(is_html("Text/HTML; charset=UTF-8"));
        assert!(is_html(" TEXT/HTML "));
        assert!(!is_html("application/json"));
        assert!(!is_html("application/xhtml+xml"));
        assert!(!is_html(""));
    }

    #[tokio::test]
    async fn test_unparseable_address_is_fetch_failure() {
        let config = create_test_config();
        let fetcher = HttpFetcher::from_config(&config, Duration::from_secs(1)).unwrap();

        let result = fetcher.fetch(&"not a url".to_string()).await;
        assert!(matches!(result, Err(FetchError::Transport { .. })));
    }
}
