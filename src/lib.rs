// src/lib.rs
// =============================================================================
// Library root for fetchanything.
//
// The binary in main.rs is a thin shell over this library; keeping the
// engine here lets integration tests drive whole crawl sessions without
// spawning the CLI.
//
// Modules:
// - cli:      command-line parsing and seed validation
// - crawl:    frontier, session state machine, progress events
// - download: fetch-and-persist pipeline with path derivation
// - error:    the error taxonomy
// - extract:  link extraction from HTML pages
// - fetch:    the shared HTTP client
// - pattern:  glob filename matching
// =============================================================================

pub mod cli;
pub mod crawl;
pub mod download;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod pattern;

// Re-export the types a typical caller touches
pub use crawl::{
    noop_hook, CrawlConfig, CrawlEvent, CrawlResult, CrawlSession, CrawlTask, DownloadRecord,
    FailureRecord, Frontier, ProgressHook, SessionState,
};
pub use download::{derive_local_path, Download, Downloader};
pub use error::{ConfigError, FailureKind};
pub use extract::extract_links;
pub use fetch::{FetchError, FetchResponse, Fetcher};
pub use pattern::FilenamePattern;
