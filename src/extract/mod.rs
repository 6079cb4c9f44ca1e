// src/extract/mod.rs
// =============================================================================
// This module extracts links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser), so malformed markup is
//   recovered instead of rejected
//
// The `url` crate resolves what we find against the page's own URL:
// - relative paths ("../a", "/docs/b")
// - protocol-relative paths ("//cdn.example.com/c")
// - fragment-only references ("#section", which resolve to the page itself)
//
// Two rules shape the output:
// - Fragments are stripped, because "/a#x" and "/a#y" are the same page as
//   far as the frontier is concerned
// - Only http and https survive; mailto:, javascript:, tel: and friends
//   are discarded
// =============================================================================

use scraper::{Html, Selector};
use url::Url;

// Extracts every followable link from an HTML page.
//
// Parameters:
//   base: the URL the page was fetched from (for resolving relative links)
//   html: the page body
//
// Returns: absolute, fragment-free http(s) URLs, in document order.
// Duplicates are NOT removed here; the frontier's visited set owns
// deduplication.
//
// This function never fails. Broken markup parses to whatever html5ever
// can recover, and hrefs that do not resolve are skipped.
pub fn extract_links(base: &Url, html: &str) -> Vec<Url> {
    let mut links = Vec::new();

    let document = Html::parse_document(html);

    // Our selector is a constant and known to be valid, so unwrap is safe
    let selector = Selector::parse("a[href]").unwrap();

    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            if let Some(url) = resolve_href(base, href) {
                links.push(url);
            }
        }
    }

    links
}

// Resolves one href against the page URL.
//
// Url::join implements standard URL resolution semantics, so absolute,
// relative, protocol-relative and fragment-only hrefs all come out right.
// Returns None for hrefs that do not resolve or resolve to a scheme we
// do not crawl.
fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    let mut url = base.join(href).ok()?;

    // "/a#x" and "/a#y" are the same frontier entry
    url.set_fragment(None);

    match url.scheme() {
        "http" | "https" => Some(url),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/docs/page.html").unwrap()
    }

    fn urls(html: &str) -> Vec<String> {
        extract_links(&base(), html)
            .into_iter()
            .map(|u| u.to_string())
            .collect()
    }

    #[test]
    fn test_absolute_link() {
        let links = urls(r#"<a href="https://other.com/file.pdf">x</a>"#);
        assert_eq!(links, vec!["https://other.com/file.pdf"]);
    }

    #[test]
    fn test_relative_links_resolve_against_base() {
        let links = urls(r#"<a href="a.pdf">x</a><a href="/top.html">y</a>"#);
        assert_eq!(
            links,
            vec![
                "https://example.com/docs/a.pdf",
                "https://example.com/top.html",
            ]
        );
    }

    #[test]
    fn test_parent_directory_link() {
        let links = urls(r#"<a href="../other/b.pdf">x</a>"#);
        assert_eq!(links, vec!["https://example.com/other/b.pdf"]);
    }

    #[test]
    fn test_protocol_relative_link_takes_base_scheme() {
        let links = urls(r#"<a href="//cdn.example.com/lib.js">x</a>"#);
        assert_eq!(links, vec!["https://cdn.example.com/lib.js"]);
    }

    #[test]
    fn test_fragment_is_stripped() {
        let links = urls(r#"<a href="/a#section-2">x</a>"#);
        assert_eq!(links, vec!["https://example.com/a"]);
    }

    #[test]
    fn test_fragment_only_link_resolves_to_the_page_itself() {
        // "#top" resolves to the page URL; the frontier will drop it as a
        // duplicate of the page being extracted
        let links = urls(r##"<a href="#top">x</a>"##);
        assert_eq!(links, vec!["https://example.com/docs/page.html"]);
    }

    #[test]
    fn test_non_http_schemes_are_discarded() {
        let html = r#"
            <a href="mailto:test@example.com">mail</a>
            <a href="javascript:void(0)">js</a>
            <a href="tel:+15551234">tel</a>
            <a href="ftp://example.com/f">ftp</a>
        "#;
        assert!(urls(html).is_empty());
    }

    #[test]
    fn test_malformed_html_still_yields_recoverable_links() {
        // Unclosed tags and stray brackets; html5ever recovers the anchor
        let html = r#"<div><p><a href="/ok.pdf">ok<div></p>"#;
        assert_eq!(urls(html), vec!["https://example.com/ok.pdf"]);
    }

    #[test]
    fn test_anchors_without_href_are_ignored() {
        let links = urls(r#"<a name="here">x</a><a href="/real">y</a>"#);
        assert_eq!(links, vec!["https://example.com/real"]);
    }

    #[test]
    fn test_duplicates_are_preserved_for_the_frontier_to_handle() {
        let links = urls(r#"<a href="/a">1</a><a href="/a">2</a>"#);
        assert_eq!(links.len(), 2);
    }
}
