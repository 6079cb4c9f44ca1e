// src/error.rs
// =============================================================================
// This module defines the two error families the crawler distinguishes:
//
// - ConfigError: problems with the user's input (bad seed URL, bad pattern,
//   unusable output directory). These are fatal and abort before any network
//   activity happens.
// - FailureKind: problems with a single URL during the crawl (network,
//   HTTP status, filesystem). These are recorded per task and never stop
//   the traversal.
//
// Rust concepts:
// - thiserror: Derives std::error::Error and Display from attributes
// - serde: FailureKind is serialized into the JSON summary output
// =============================================================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

// A configuration problem detected at startup.
//
// Every variant aborts the run with a non-zero exit code before the first
// request is sent.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The seed URL could not be parsed
    #[error("invalid URL '{url}': {reason}")]
    InvalidSeedUrl { url: String, reason: String },

    /// The seed URL parsed, but is not something we can crawl
    #[error("seed URL must use http or https, got '{0}'")]
    UnsupportedScheme(String),

    /// The --filter pattern did not compile
    #[error("invalid filter pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The output directory could not be created
    #[error("cannot create output directory '{path}': {reason}")]
    UnwritableOutputDir { path: String, reason: String },

    /// The HTTP client could not be constructed
    #[error("failed to initialize HTTP client: {0}")]
    HttpClient(String),
}

// Why a single crawl task failed.
//
// #[serde(tag = "kind", rename_all = "snake_case")] gives us JSON like
// {"kind": "http_status", "status": 404} when the summary is printed
// with --json.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureKind {
    /// Transport-level failure: DNS, connect, timeout, reset
    #[error("network error: {message}")]
    Network { message: String },

    /// The server answered, but with a non-2xx status
    #[error("HTTP {status}")]
    HttpStatus { status: u16 },

    /// The response arrived but could not be written to disk
    #[error("filesystem error: {message}")]
    Filesystem { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kind_serializes_with_tag() {
        let kind = FailureKind::HttpStatus { status: 404 };
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, r#"{"kind":"http_status","status":404}"#);
    }

    #[test]
    fn test_failure_kind_display() {
        let kind = FailureKind::Network {
            message: "connection refused".to_string(),
        };
        assert_eq!(kind.to_string(), "network error: connection refused");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::UnsupportedScheme("ftp".to_string());
        assert!(err.to_string().contains("ftp"));
    }
}
