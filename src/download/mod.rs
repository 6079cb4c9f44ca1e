// src/download/mod.rs
// =============================================================================
// This module persists matched URLs to the output directory.
//
// The local path is derived from the URL itself:
//
//   https://example.com/docs/a.pdf  ->  <out>/example.com/docs/a.pdf
//   https://example.com/docs/       ->  <out>/example.com/docs/index.html
//   https://example.com             ->  <out>/example.com/index.html
//
// Derivation rules:
// - The host becomes the first directory, so multi-page crawls produce one
//   tree per site
// - Empty, "." and ".." segments are dropped; a derived path can never
//   escape the output directory
// - An existing file at the derived path is overwritten. Two URLs that
//   derive the same path resolve as last-writer-wins
//
// Failures are classified, never thrown: the session records them and
// keeps crawling.
// =============================================================================

use std::path::{Path, PathBuf};

use url::Url;

use crate::error::FailureKind;
use crate::fetch::{FetchResponse, Fetcher};

// Filename used when the URL path ends in '/' and has no filename of its own
const DIRECTORY_INDEX: &str = "index.html";

// A completed download: where the bytes landed, plus the response itself.
//
// The response is handed back so the caller can reuse the body (e.g. to
// extract links from a downloaded HTML page) without fetching twice.
#[derive(Debug)]
pub struct Download {
    pub path: PathBuf,
    pub response: FetchResponse,
}

// Writes matched URLs beneath one output directory
#[derive(Debug, Clone)]
pub struct Downloader {
    fetcher: Fetcher,
    out_dir: PathBuf,
}

impl Downloader {
    pub fn new(fetcher: Fetcher, out_dir: PathBuf) -> Self {
        Downloader { fetcher, out_dir }
    }

    // Fetches a URL and writes the body to the derived local path.
    //
    // Errors by stage:
    // - transport failure        -> FailureKind::Network
    // - non-2xx response         -> FailureKind::HttpStatus
    // - create_dir_all / write   -> FailureKind::Filesystem
    pub async fn download(&self, url: &Url) -> Result<Download, FailureKind> {
        let response = self.fetcher.fetch(url).await.map_err(FailureKind::from)?;

        if !response.is_success() {
            return Err(FailureKind::HttpStatus {
                status: response.status.as_u16(),
            });
        }

        let path = derive_local_path(&self.out_dir, url);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| FailureKind::Filesystem {
                    message: format!("creating {}: {}", parent.display(), e),
                })?;
        }

        tokio::fs::write(&path, &response.body)
            .await
            .map_err(|e| FailureKind::Filesystem {
                message: format!("writing {}: {}", path.display(), e),
            })?;

        log::debug!("wrote {} bytes to {}", response.body.len(), path.display());

        Ok(Download { path, response })
    }
}

// Maps a URL onto a path beneath the output directory.
//
// Kept public so the layout is testable without network I/O.
pub fn derive_local_path(out_dir: &Path, url: &Url) -> PathBuf {
    let mut path = out_dir.to_path_buf();
    path.push(url.host_str().unwrap_or("unknown-host"));

    // Anything that would climb out of out_dir is dropped here
    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| {
            segments
                .filter(|s| !s.is_empty() && *s != "." && *s != "..")
                .collect()
        })
        .unwrap_or_default();

    // A path ending in '/' names a directory; give its body a filename
    let names_directory = url.path().ends_with('/');

    match segments.split_last() {
        Some((filename, directories)) if !names_directory => {
            for dir in directories {
                path.push(dir);
            }
            path.push(filename);
        }
        _ => {
            for dir in &segments {
                path.push(dir);
            }
            path.push(DIRECTORY_INDEX);
        }
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derive(url: &str) -> PathBuf {
        derive_local_path(Path::new("downloads"), &Url::parse(url).unwrap())
    }

    #[test]
    fn test_path_mirrors_host_and_path() {
        assert_eq!(
            derive("https://example.com/docs/a.pdf"),
            Path::new("downloads/example.com/docs/a.pdf")
        );
    }

    #[test]
    fn test_root_url_becomes_index_html() {
        assert_eq!(
            derive("https://example.com"),
            Path::new("downloads/example.com/index.html")
        );
    }

    #[test]
    fn test_trailing_slash_becomes_index_html() {
        assert_eq!(
            derive("https://example.com/docs/"),
            Path::new("downloads/example.com/docs/index.html")
        );
    }

    #[test]
    fn test_dot_segments_cannot_escape_output_dir() {
        // url's own resolution folds literal ".."; encoded dot segments
        // stay percent-encoded and must land as inert directory names
        let url = Url::parse("https://example.com/%2e%2e/a.pdf").unwrap();
        let path = derive_local_path(Path::new("downloads"), &url);
        assert!(path.starts_with("downloads/example.com"));
        assert!(!path
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir)));
    }

    #[test]
    fn test_query_string_is_not_part_of_the_path() {
        assert_eq!(
            derive("https://example.com/a.pdf?version=2"),
            Path::new("downloads/example.com/a.pdf")
        );
    }

    #[tokio::test]
    async fn test_download_writes_body_and_creates_directories() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/deep/tree/file.pdf")
            .with_status(200)
            .with_header("content-type", "application/pdf")
            .with_body("pdf-bytes")
            .create_async()
            .await;

        let out = tempfile::tempdir().unwrap();
        let downloader = Downloader::new(
            Fetcher::with_default_timeout().unwrap(),
            out.path().to_path_buf(),
        );

        let url = Url::parse(&format!("{}/deep/tree/file.pdf", server.url())).unwrap();
        let download = downloader.download(&url).await.unwrap();

        assert_eq!(std::fs::read(&download.path).unwrap(), b"pdf-bytes");
        assert!(download.path.ends_with("deep/tree/file.pdf"));
    }

    #[tokio::test]
    async fn test_download_overwrites_existing_file() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/file.txt")
            .with_status(200)
            .with_body("second")
            .create_async()
            .await;

        let out = tempfile::tempdir().unwrap();
        let downloader = Downloader::new(
            Fetcher::with_default_timeout().unwrap(),
            out.path().to_path_buf(),
        );

        let url = Url::parse(&format!("{}/file.txt", server.url())).unwrap();
        let expected = derive_local_path(out.path(), &url);
        std::fs::create_dir_all(expected.parent().unwrap()).unwrap();
        std::fs::write(&expected, "first").unwrap();

        downloader.download(&url).await.unwrap();
        assert_eq!(std::fs::read_to_string(&expected).unwrap(), "second");
    }

    #[tokio::test]
    async fn test_non_2xx_is_an_http_status_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/gone.pdf")
            .with_status(410)
            .create_async()
            .await;

        let out = tempfile::tempdir().unwrap();
        let downloader = Downloader::new(
            Fetcher::with_default_timeout().unwrap(),
            out.path().to_path_buf(),
        );

        let url = Url::parse(&format!("{}/gone.pdf", server.url())).unwrap();
        let err = downloader.download(&url).await.unwrap_err();
        assert_eq!(err, FailureKind::HttpStatus { status: 410 });

        // Nothing may be written for a failed download
        assert!(!derive_local_path(out.path(), &url).exists());
    }
}
