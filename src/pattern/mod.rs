// src/pattern/mod.rs
// =============================================================================
// This module decides which discovered URLs are download targets.
//
// The user gives us a glob pattern like "*.pdf":
// - '*' matches any run of characters
// - '?' matches exactly one character
// - everything else matches literally
//
// We compile the glob down to an anchored regex once, at startup, and then
// evaluate it against the FINAL path segment of each URL (the filename).
// Matching is case-sensitive: "*.pdf" does not match "report.PDF".
// No pattern configured means everything matches.
//
// Rust concepts:
// - Regex: Compiled once, reused for every candidate URL
// - Option<T>: "no pattern" is represented as None, not as ".*"
// =============================================================================

use regex::Regex;
use url::Url;

use crate::error::ConfigError;

// A compiled filename filter.
//
// Immutable once constructed. Cloning is cheap enough for handing one to
// each worker (Regex is internally reference-counted).
#[derive(Debug, Clone)]
pub struct FilenamePattern {
    // None means "match everything"
    regex: Option<Regex>,
}

impl FilenamePattern {
    // Compiles a glob pattern into a matcher.
    //
    // Returns ConfigError::InvalidPattern if the translated regex does not
    // compile (in practice only possible through pathological input, but we
    // refuse to start the crawl on it rather than guessing).
    pub fn new(pattern: Option<&str>) -> Result<Self, ConfigError> {
        let regex = match pattern {
            None => None,
            Some(glob) => {
                let translated = glob_to_regex(glob);
                let compiled =
                    Regex::new(&translated).map_err(|e| ConfigError::InvalidPattern {
                        pattern: glob.to_string(),
                        reason: e.to_string(),
                    })?;
                Some(compiled)
            }
        };

        Ok(FilenamePattern { regex })
    }

    // A matcher that accepts every filename (the default when no --filter
    // is given)
    pub fn match_all() -> Self {
        FilenamePattern { regex: None }
    }

    // Checks whether the URL's filename matches the pattern.
    //
    // Only the final path segment is considered:
    //   "https://example.com/a/b/report.pdf" is matched as "report.pdf"
    //
    // A URL ending in '/' has an empty filename, which only the match-all
    // pattern accepts.
    pub fn matches(&self, url: &Url) -> bool {
        match &self.regex {
            None => true,
            Some(regex) => regex.is_match(filename_of(url)),
        }
    }
}

// Extracts the final path segment of a URL.
//
// "https://example.com/docs/a.pdf" -> "a.pdf"
// "https://example.com/docs/"      -> ""
// "https://example.com"            -> ""  (the path is "/")
fn filename_of(url: &Url) -> &str {
    url.path_segments()
        .and_then(|segments| segments.last())
        .unwrap_or("")
}

// Translates a glob into an anchored regex string.
//
// '*' becomes ".*", '?' becomes ".", and every other character is escaped
// so regex metacharacters in the glob (like the '.' in "*.pdf") are taken
// literally. Anchoring with ^...$ makes the pattern cover the whole
// filename, not a substring of it.
fn glob_to_regex(glob: &str) -> String {
    let mut regex = String::with_capacity(glob.len() + 2);
    regex.push('^');

    for ch in glob.chars() {
        match ch {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            other => regex.push_str(&regex::escape(&other.to_string())),
        }
    }

    regex.push('$');
    regex
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why compile the glob to a regex instead of comparing characters?
//    - The regex engine already handles backtracking for patterns like
//      "a*b*c" correctly
//    - We compile once and match thousands of times, which is exactly what
//      Regex is built for
//
// 2. What does regex::escape do?
//    - It backslash-escapes regex metacharacters (. + ( ) [ ] and friends)
//    - Without it, the glob "*.pdf" would turn into ".*.pdf" where the
//      second '.' matches ANY character, so "report_pdf" would match too
//
// 3. Why anchor with ^ and $?
//    - Regex matching finds substrings by default
//    - "^.*\.pdf$" must cover the whole filename, so "a.pdf.exe" does not
//      sneak through
//
// 4. What is path_segments()?
//    - The url crate splits the path on '/' for us
//    - It returns None for URLs that cannot have a path (like mailto:),
//      which we never see here because the extractor filters those out
// -----------------------------------------------------------------------------
