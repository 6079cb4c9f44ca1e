// src/crawl/mod.rs
// =============================================================================
// This module is the crawl engine.
//
// Submodules:
// - frontier: the breadth-first queue and the visited set
// - session: the state machine that drives one crawl run
// - events: the progress hook the engine reports through
//
// This file (mod.rs) is the module root - it re-exports the public API so
// callers write `crawl::CrawlSession` instead of `crawl::session::CrawlSession`.
// =============================================================================

mod events;
mod frontier;
mod session;

pub use events::{noop_hook, CrawlEvent, ProgressHook};
pub use frontier::{CrawlTask, Frontier};
pub use session::{
    CrawlConfig, CrawlResult, CrawlSession, DownloadRecord, FailureRecord, SessionState,
};
