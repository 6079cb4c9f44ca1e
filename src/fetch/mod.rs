// src/fetch/mod.rs
// =============================================================================
// This module performs all HTTP traffic for a crawl session.
//
// Key functionality:
// - One reqwest::Client for the whole session. Its connection pool keeps
//   sockets alive between requests, so repeated fetches against the same
//   host reuse one persistent channel instead of re-handshaking
// - GET with a bounded per-request timeout, so a hanging server cannot
//   stall the crawl
// - Transport failures (DNS, connect, timeout) are classified into a small
//   enum; HTTP error statuses are NOT errors here, the caller decides what
//   a 404 means
//
// Rust concepts:
// - async/await: For concurrent network I/O
// - Result<T, E>: For error handling
// =============================================================================

use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;
use url::Url;

use crate::error::{ConfigError, FailureKind};

// Per-request timeout. A hung request must not stall the whole crawl.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// Follow up to this many redirects before giving up on a URL
const MAX_REDIRECTS: usize = 5;

// What came back from a successful HTTP exchange.
//
// "Successful" means the server answered; the status may still be 4xx/5xx.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    // True when the Content-Type header says this is an HTML page worth
    // feeding to the link extractor
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.starts_with("text/html") || ct.starts_with("application/xhtml"))
            .unwrap_or(false)
    }

    // The page body as text, for the HTML parser. Invalid UTF-8 is replaced
    // rather than refused; the extractor degrades gracefully on garbage.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

// Why a request produced no HTTP response at all
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("could not resolve hostname")]
    Dns,
    #[error("connection failed")]
    Connect,
    #[error("too many redirects")]
    TooManyRedirects,
    #[error("{0}")]
    Other(String),
}

impl From<FetchError> for FailureKind {
    fn from(err: FetchError) -> Self {
        FailureKind::Network {
            message: err.to_string(),
        }
    }
}

// The session-wide HTTP client.
//
// Cheap to clone: reqwest::Client is a handle onto one shared pool, so
// every worker fetches over the same connection channel.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    // Builds the client with the session's timeout.
    //
    // Failing to construct a client is a startup failure, not a per-URL
    // one, so it maps to ConfigError.
    pub fn new(timeout: Duration) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(concat!("fetchanything/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Fetcher { client })
    }

    pub fn with_default_timeout() -> Result<Self, ConfigError> {
        Self::new(DEFAULT_TIMEOUT)
    }

    // Issues one GET.
    //
    // Any HTTP response, including 4xx/5xx, is an Ok: the caller classifies
    // statuses. Err means the exchange never completed (DNS, connect,
    // timeout, or the body was cut off mid-transfer).
    pub async fn fetch(&self, url: &Url) -> Result<FetchResponse, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        // Reading the body can also fail mid-transfer (connection reset)
        let body = response.bytes().await.map_err(classify_error)?.to_vec();

        Ok(FetchResponse {
            status,
            content_type,
            body,
        })
    }
}

// Maps reqwest's error soup onto our transport taxonomy.
//
// reqwest does not expose DNS failures as a dedicated kind, so we fall back
// to inspecting the message the resolver left in the chain.
fn classify_error(error: reqwest::Error) -> FetchError {
    let error_string = error.to_string();

    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_redirect() {
        FetchError::TooManyRedirects
    } else if error.is_connect() {
        if error_string.contains("dns") {
            FetchError::Dns
        } else {
            FetchError::Connect
        }
    } else {
        FetchError::Other(error_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(content_type: Option<&str>) -> FetchResponse {
        FetchResponse {
            status: StatusCode::OK,
            content_type: content_type.map(|s| s.to_string()),
            body: Vec::new(),
        }
    }

    #[test]
    fn test_is_html_accepts_charset_suffix() {
        assert!(response(Some("text/html; charset=utf-8")).is_html());
        assert!(response(Some("text/html")).is_html());
    }

    #[test]
    fn test_is_html_rejects_other_types() {
        assert!(!response(Some("application/pdf")).is_html());
        assert!(!response(Some("image/jpeg")).is_html());
        assert!(!response(None).is_html());
    }

    #[test]
    fn test_fetch_error_converts_to_network_failure() {
        let kind: FailureKind = FetchError::Timeout.into();
        assert_eq!(
            kind,
            FailureKind::Network {
                message: "request timed out".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_reports_http_statuses_as_responses() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = Fetcher::with_default_timeout().unwrap();
        let url = Url::parse(&format!("{}/missing", server.url())).unwrap();

        // A 404 is a response, not a FetchError
        let response = fetcher.fetch(&url).await.unwrap();
        assert_eq!(response.status.as_u16(), 404);
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn test_fetch_returns_body_and_content_type() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/page")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html>hi</html>")
            .create_async()
            .await;

        let fetcher = Fetcher::with_default_timeout().unwrap();
        let url = Url::parse(&format!("{}/page", server.url())).unwrap();

        let response = fetcher.fetch(&url).await.unwrap();
        assert!(response.is_success());
        assert!(response.is_html());
        assert_eq!(response.body_text(), "<html>hi</html>");
    }

    #[tokio::test]
    async fn test_connection_refused_classifies_as_transport_error() {
        let fetcher = Fetcher::with_default_timeout().unwrap();
        // Reserved port on localhost that nothing listens on
        let url = Url::parse("http://127.0.0.1:1/unreachable").unwrap();

        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Connect | FetchError::Other(_) | FetchError::Timeout
        ));
    }
}
