// src/crawl/events.rs
// =============================================================================
// Progress reporting hook for crawl sessions.
//
// The engine never prints anything itself. Instead it invokes a
// caller-supplied callback at three points: when a task is taken off the
// frontier, and when a download completes or fails. The CLI installs a
// renderer; library callers and tests install whatever they need, or
// nothing.
// =============================================================================

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::FailureKind;

// One observable moment in a crawl
#[derive(Debug, Clone)]
pub enum CrawlEvent {
    /// A task was taken off the frontier and is about to be processed
    TaskDequeued { url: String, depth: usize },
    /// A matched URL was fetched and written to disk
    DownloadCompleted { url: String, path: PathBuf },
    /// A matched URL could not be downloaded
    DownloadFailed { url: String, kind: FailureKind },
}

// The hook is shared across concurrent workers, hence Arc + Send + Sync.
// It must be fast and must not block; heavy consumers should hand the
// event off to a channel.
pub type ProgressHook = Arc<dyn Fn(&CrawlEvent) + Send + Sync>;

// Hook that ignores every event, for callers that do not track progress
pub fn noop_hook() -> ProgressHook {
    Arc::new(|_event| {})
}
