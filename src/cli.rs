// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// The tool has exactly one job, so there are no subcommands: a seed URL
// plus a handful of flags. Seed validation lives here too, because a bad
// URL is a configuration error that must stop the program before any
// crawling starts.
// =============================================================================

use std::path::PathBuf;

use clap::Parser;
use url::Url;

use crate::error::ConfigError;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "fetchanything",
    version,
    about = "Crawl a website and download files matching a pattern",
    long_about = "fetchanything starts at a seed URL, follows links up to a maximum depth, \
                  and downloads every file whose name matches the filter pattern into a \
                  local directory tree."
)]
pub struct Cli {
    /// Starting URL to crawl (e.g. https://example.com)
    ///
    /// This is a positional argument (required, no flag needed)
    pub url: String,

    /// Maximum crawl depth in link hops from the seed
    ///
    /// 0 means only the seed itself; 2 means the seed, its links, and
    /// their links
    #[arg(long, default_value_t = 2)]
    pub level: usize,

    /// Filename pattern to download, e.g. "*.pdf" ('*' any run, '?' one char)
    ///
    /// Matching is case-sensitive and applies to the final path segment
    /// only. Without a filter, every crawled URL is downloaded.
    #[arg(long)]
    pub filter: Option<String>,

    /// Output directory for the downloaded tree
    #[arg(long, default_value = "downloads")]
    pub out: PathBuf,

    /// Upper bound on concurrent fetches
    #[arg(long, default_value_t = 8)]
    pub workers: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Print the final summary as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output (debug-level logging)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    // Parses and validates the seed URL.
    //
    // Only http and https seeds make sense for a web crawl; anything else
    // (including strings that happen to parse, like "ftp://x") is refused
    // up front.
    pub fn seed_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.url).map_err(|e| ConfigError::InvalidSeedUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::UnsupportedScheme(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["fetchanything", "https://example.com"]);
        assert_eq!(cli.level, 2);
        assert_eq!(cli.out, PathBuf::from("downloads"));
        assert_eq!(cli.filter, None);
        assert_eq!(cli.workers, 8);
        assert_eq!(cli.timeout, 10);
        assert!(!cli.verbose);
        assert!(!cli.json);
    }

    #[test]
    fn test_all_flags() {
        let cli = parse(&[
            "fetchanything",
            "https://example.com/docs",
            "--level",
            "3",
            "--filter",
            "*.pdf",
            "--out",
            "papers",
            "-v",
        ]);
        assert_eq!(cli.level, 3);
        assert_eq!(cli.filter.as_deref(), Some("*.pdf"));
        assert_eq!(cli.out, PathBuf::from("papers"));
        assert!(cli.verbose);
    }

    #[test]
    fn test_valid_seed_url() {
        let cli = parse(&["fetchanything", "https://example.com/docs"]);
        let url = cli.seed_url().unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn test_unparseable_seed_url() {
        let cli = parse(&["fetchanything", "not a url"]);
        assert!(matches!(
            cli.seed_url(),
            Err(ConfigError::InvalidSeedUrl { .. })
        ));
    }

    #[test]
    fn test_non_http_seed_url() {
        let cli = parse(&["fetchanything", "ftp://example.com/pub"]);
        assert!(matches!(
            cli.seed_url(),
            Err(ConfigError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_url_is_required() {
        assert!(Cli::try_parse_from(["fetchanything"]).is_err());
    }
}
