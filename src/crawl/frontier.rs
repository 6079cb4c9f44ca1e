// src/crawl/frontier.rs
// =============================================================================
// This module implements the crawl frontier: the queue of pages we still
// have to look at, plus the set of URLs we have already seen.
//
// How it works:
// 1. Discovered URLs are enqueued together with their depth (link hops
//    from the seed)
// 2. A URL enters the visited set AT ENQUEUE TIME, not when it is
//    processed, so two pages discovering the same link in one wave cannot
//    both get it queued
// 3. Dequeuing is FIFO, which makes the traversal breadth-first: depth
//    increases level by level instead of by whichever branch runs first
// 4. Tasks whose depth would exceed the limit are refused outright
//
// Rust concepts:
// - HashSet: To track visited URLs (O(1) lookup)
// - VecDeque: Double-ended queue for breadth-first crawling
// =============================================================================

use std::collections::{HashSet, VecDeque};

use url::Url;

// One unit of crawl work: a page to visit and how far from the seed it is.
//
// Immutable once created, consumed exactly once when dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub url: Url,
    pub depth: usize,
}

// The traversal engine's state: pending queue + visited set.
//
// One Frontier belongs to one crawl session. It is not synchronized
// internally; the session mutates it from a single owner task only.
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<CrawlTask>,
    visited: HashSet<String>,
    max_depth: usize,
}

impl Frontier {
    pub fn new(max_depth: usize) -> Self {
        Frontier {
            queue: VecDeque::new(),
            visited: HashSet::new(),
            max_depth,
        }
    }

    // Adds a task unless its URL was already seen or its depth is out of
    // bounds. Returns whether the task was actually queued.
    //
    // The URL is normalized before the dedup check: fragments are dropped
    // (the url crate already lowercases scheme and host at parse time), so
    // "/a#x" and "/a#y" collapse into one entry.
    pub fn enqueue(&mut self, url: Url, depth: usize) -> bool {
        if depth > self.max_depth {
            return false;
        }

        let url = normalize(url);

        // insert() returns false when the value was already present
        if !self.visited.insert(url.to_string()) {
            return false;
        }

        self.queue.push_back(CrawlTask { url, depth });
        true
    }

    // Next task in breadth-first (FIFO) order, or None when the crawl is
    // done
    pub fn dequeue_next(&mut self) -> Option<CrawlTask> {
        self.queue.pop_front()
    }

    // Takes every currently queued task at once.
    //
    // Children discovered while a batch is processed are all one level
    // deeper, so each call returns exactly one BFS level. The concurrent
    // session drains levels instead of single tasks.
    pub fn drain_level(&mut self) -> Vec<CrawlTask> {
        std::mem::take(&mut self.queue).into()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    // How many distinct URLs have ever been enqueued
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

// Strips the fragment so the visited set treats "/a#x" and "/a#y" as the
// same page. Returns the cleaned URL so the task fetches the same form
// that was deduplicated.
fn normalize(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why insert into visited at enqueue time instead of at processing time?
//    - Between "discovered" and "processed" a URL sits in the queue
//    - If page A and page B both link to /c, marking at processing time
//      would let /c into the queue twice
//    - Marking at enqueue time makes the queue itself duplicate-free
//
// 2. Why HashSet<String> and not HashSet<Url>?
//    - The visited set is keyed by the normalized text form, which is
//      exactly what "the same URL" means here
//    - Url hashes fine too, but the string makes the normalization step
//      explicit and the set contents printable
//
// 3. What is std::mem::take?
//    - Swaps the queue with a fresh empty one and hands us the old queue
//    - The frontier keeps working (children go into the new queue) while
//      we iterate the level we took out
//
// 4. Breadth-first vs depth-first:
//    - Breadth-first: crawl all pages at depth 1, then depth 2, etc.
//    - Depth-first: follow one path all the way down, then backtrack
//    - FIFO order gives us breadth-first, so the depth bound cuts the
//      crawl off evenly instead of wherever the stack happened to be
// -----------------------------------------------------------------------------
