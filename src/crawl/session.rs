// src/crawl/session.rs
// =============================================================================
// This module runs one crawl from seed to summary.
//
// How it works:
// 1. The seed URL is enqueued at depth 0
// 2. The frontier is drained one breadth-first level at a time; the tasks
//    of a level are fetched concurrently by a bounded worker pool
// 3. Per task: if the filename matches the filter, the URL is downloaded
//    (at any depth); if the task is above the depth limit and the response
//    is HTML, its links are extracted and enqueued one level deeper
// 4. Every worker hands its findings back to the session loop, which is
//    the only writer of the frontier and the result
// 5. The loop ends when the frontier is empty (Completed) or when the
//    cancellation flag is observed between tasks (Cancelled); both ways
//    the accumulated result is returned
//
// Failures of individual URLs are recorded, logged and skipped; they never
// abort the session.
// =============================================================================

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use url::Url;

use crate::crawl::events::{noop_hook, CrawlEvent, ProgressHook};
use crate::crawl::frontier::{CrawlTask, Frontier};
use crate::download::Downloader;
use crate::error::{ConfigError, FailureKind};
use crate::extract::extract_links;
use crate::fetch::Fetcher;
use crate::pattern::FilenamePattern;

const DEFAULT_MAX_DEPTH: usize = 2;
const DEFAULT_OUT_DIR: &str = "downloads";
const DEFAULT_WORKERS: usize = 8;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

// Everything a session needs to know before it starts
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Where the crawl starts (depth 0)
    pub seed: Url,
    /// Maximum number of link hops from the seed
    pub max_depth: usize,
    /// Root of the local directory tree downloads land in
    pub out_dir: PathBuf,
    /// Upper bound on concurrent fetches
    pub workers: usize,
    /// Per-request timeout
    pub timeout: Duration,
}

impl CrawlConfig {
    pub fn new(seed: Url) -> Self {
        CrawlConfig {
            seed,
            max_depth: DEFAULT_MAX_DEPTH,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            workers: DEFAULT_WORKERS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

// Lifecycle of a session. There is no way back from the two terminal
// states; a session runs once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Completed,
    Cancelled,
}

/// A download that made it to disk
#[derive(Debug, Clone, Serialize)]
pub struct DownloadRecord {
    pub url: String,
    pub path: PathBuf,
}

/// A URL that failed, and how
#[derive(Debug, Clone, Serialize)]
pub struct FailureRecord {
    pub url: String,
    // flatten merges the FailureKind fields into this record's JSON
    #[serde(flatten)]
    pub error: FailureKind,
}

// The aggregate outcome of one session.
//
// Accumulated incrementally while the crawl runs, returned when it ends,
// complete or not.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CrawlResult {
    pub downloaded: Vec<DownloadRecord>,
    pub failed: Vec<FailureRecord>,
    pub pages_visited: usize,
}

// What one worker hands back to the session loop
enum TaskOutcome {
    // The cancellation flag was set before this task started
    Skipped,
    Done {
        depth: usize,
        download: Option<DownloadRecord>,
        failure: Option<FailureRecord>,
        links: Vec<Url>,
    },
}

// Orchestrates frontier, fetcher, extractor, matcher and downloader for
// one run
pub struct CrawlSession {
    config: CrawlConfig,
    fetcher: Fetcher,
    downloader: Downloader,
    pattern: FilenamePattern,
    cancel: Arc<AtomicBool>,
    hook: ProgressHook,
    state: SessionState,
}

// Manual Debug: the progress hook is a boxed closure and cannot derive
// Debug, so it is rendered as an opaque placeholder while the rest of the
// session state prints normally.
impl std::fmt::Debug for CrawlSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrawlSession")
            .field("config", &self.config)
            .field("fetcher", &self.fetcher)
            .field("downloader", &self.downloader)
            .field("pattern", &self.pattern)
            .field("cancel", &self.cancel)
            .field("hook", &"<progress hook>")
            .field("state", &self.state)
            .finish()
    }
}

impl CrawlSession {
    // Validates what can be validated before any network activity: the
    // output root must be creatable and the HTTP client must build.
    // (Seed URL and pattern are validated by their own constructors.)
    pub fn new(config: CrawlConfig, pattern: FilenamePattern) -> Result<Self, ConfigError> {
        std::fs::create_dir_all(&config.out_dir).map_err(|e| {
            ConfigError::UnwritableOutputDir {
                path: config.out_dir.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        let fetcher = Fetcher::new(config.timeout)?;
        let downloader = Downloader::new(fetcher.clone(), config.out_dir.clone());

        Ok(CrawlSession {
            config,
            fetcher,
            downloader,
            pattern,
            cancel: Arc::new(AtomicBool::new(false)),
            hook: noop_hook(),
            state: SessionState::Idle,
        })
    }

    // Installs the progress callback. Must be called before run()
    pub fn set_progress_hook(&mut self, hook: ProgressHook) {
        self.hook = hook;
    }

    // Shared flag that requests cancellation. Setting it stops the session
    // at the next safe point, between tasks; in-flight fetches finish or
    // hit the transport timeout
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    // Runs the crawl to one of the terminal states and returns the
    // accumulated result.
    pub async fn run(&mut self) -> CrawlResult {
        self.state = SessionState::Running;
        log::info!(
            "starting crawl at {} (max depth {}, {} workers)",
            self.config.seed,
            self.config.max_depth,
            self.config.workers
        );

        let mut frontier = Frontier::new(self.config.max_depth);
        frontier.enqueue(self.config.seed.clone(), 0);

        let mut result = CrawlResult::default();
        let workers = self.config.workers.max(1);

        while !frontier.is_empty() {
            if self.cancel.load(Ordering::SeqCst) {
                self.state = SessionState::Cancelled;
                break;
            }

            // One breadth-first level; every child discovered below is one
            // level deeper, so depth never interleaves across waves
            let level = frontier.drain_level();

            let outcomes: Vec<TaskOutcome> =
                stream::iter(level.into_iter().map(|task| self.process_task(task)))
                    .buffer_unordered(workers)
                    .collect()
                    .await;

            // Only this loop writes the frontier and the result; workers
            // report, they do not mutate
            for outcome in outcomes {
                match outcome {
                    TaskOutcome::Skipped => {}
                    TaskOutcome::Done {
                        depth,
                        download,
                        failure,
                        links,
                    } => {
                        result.pages_visited += 1;
                        if let Some(record) = download {
                            result.downloaded.push(record);
                        }
                        if let Some(record) = failure {
                            result.failed.push(record);
                        }
                        for link in links {
                            frontier.enqueue(link, depth + 1);
                        }
                    }
                }
            }
        }

        if self.state != SessionState::Cancelled {
            self.state = SessionState::Completed;
        }

        log::info!(
            "crawl finished: {} pages visited, {} downloaded, {} failed",
            result.pages_visited,
            result.downloaded.len(),
            result.failed.len()
        );

        result
    }

    // Handles one task: download if the filename matches, expand links if
    // the depth limit allows. Never fails; problems become records.
    async fn process_task(&self, task: CrawlTask) -> TaskOutcome {
        if self.cancel.load(Ordering::SeqCst) {
            return TaskOutcome::Skipped;
        }

        (self.hook)(&CrawlEvent::TaskDequeued {
            url: task.url.to_string(),
            depth: task.depth,
        });
        log::debug!("crawling {} (depth {})", task.url, task.depth);

        // Terminal-depth tasks are still download-matched, but their pages
        // are never expanded
        let expand = task.depth < self.config.max_depth;

        let mut download = None;
        let mut failure = None;
        let mut links = Vec::new();

        if self.pattern.matches(&task.url) {
            match self.downloader.download(&task.url).await {
                Ok(done) => {
                    log::info!("downloaded {} -> {}", task.url, done.path.display());
                    (self.hook)(&CrawlEvent::DownloadCompleted {
                        url: task.url.to_string(),
                        path: done.path.clone(),
                    });

                    // The downloader hands the response back, so an HTML
                    // page that matched the filter is fetched exactly once
                    if expand && done.response.is_html() {
                        links = extract_links(&task.url, &done.response.body_text());
                    }

                    download = Some(DownloadRecord {
                        url: task.url.to_string(),
                        path: done.path,
                    });
                }
                Err(kind) => {
                    log::warn!("failed to download {}: {}", task.url, kind);
                    (self.hook)(&CrawlEvent::DownloadFailed {
                        url: task.url.to_string(),
                        kind: kind.clone(),
                    });
                    failure = Some(FailureRecord {
                        url: task.url.to_string(),
                        error: kind,
                    });
                }
            }
        } else if expand {
            match self.fetcher.fetch(&task.url).await {
                Ok(response) if response.is_success() => {
                    if response.is_html() {
                        links = extract_links(&task.url, &response.body_text());
                    }
                }
                Ok(response) => {
                    let kind = FailureKind::HttpStatus {
                        status: response.status.as_u16(),
                    };
                    log::warn!("failed to fetch {}: {}", task.url, kind);
                    failure = Some(FailureRecord {
                        url: task.url.to_string(),
                        error: kind,
                    });
                }
                Err(e) => {
                    let kind = FailureKind::from(e);
                    log::warn!("failed to fetch {}: {}", task.url, kind);
                    failure = Some(FailureRecord {
                        url: task.url.to_string(),
                        error: kind,
                    });
                }
            }
        }

        if !links.is_empty() {
            log::debug!("{} links found on {}", links.len(), task.url);
        }

        TaskOutcome::Done {
            depth: task.depth,
            download,
            failure,
            links,
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is buffer_unordered?
//    - It runs up to N futures from a stream concurrently and yields
//      results as they finish (not in submission order)
//    - It's like Promise.all() but with a concurrency limit
//    - Network latency dominates a crawl, so overlapping fetches is where
//      all the speed comes from
//
// 2. How can concurrent workers share one frontier without a lock?
//    - They don't share it: workers only READ (fetch, match, extract) and
//      return a TaskOutcome value
//    - The session loop alone inserts into the visited set and the queue,
//      after collecting a wave
//    - One writer means no lock and no lost-update races on the dedup set
//
// 3. Why drain whole levels instead of single tasks?
//    - All tasks in the queue at wave start share one depth, so children
//      enqueued during the wave are all exactly one level deeper
//    - That keeps the breadth-first guarantee under concurrency: a page
//      is never expanded before its parent level finished extracting
//
// 4. What does the AtomicBool buy us over a plain bool?
//    - The Ctrl-C handler lives on another task; an atomic lets both sides
//      read and write the flag without a mutex
//    - Workers check it before starting, so cancellation takes effect
//      between tasks, never mid-write
// -----------------------------------------------------------------------------
