//! HTML link extraction for the HTTP fetcher
//!
//! Only anchors and canonical links are followed. The output keeps document
//! order and duplicates; deduplication is the crawl core's job.

use scraper::{Html, Selector};
use url::Url;

/// Extracts the followable links from an HTML page, as absolute URLs
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">`
/// - `<link rel="canonical" href="...">`
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - Fragment-only links
/// - Anything that is not http(s) after resolution
///
/// # Example
///
/// ```
/// use depth_crawler::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let links = extract_links(html, &base_url);
/// assert_eq!(links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href], link[rel='canonical'][href]") else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    document
        .select(&selector)
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves an href to an absolute http(s) URL, or `None` if it should not be followed
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    const SKIPPED_SCHEMES: [&str; 4] = ["javascript:", "mailto:", "tel:", "data:"];
    if SKIPPED_SCHEMES.iter().any(|scheme| href.starts_with(scheme)) {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://golang.org/pkg/").unwrap()
    }

    #[test]
    fn test_resolves_relative_links() {
        let html = r#"<html><body>
            <a href="fmt/">fmt</a>
            <a href="/cmd/">cmd</a>
            <a href="https://other.org/x">x</a>
        </body></html>"#;
        let links = extract_links(html, &base_url());
        assert_eq!(
            links,
            vec![
                "https://golang.org/pkg/fmt/".to_string(),
                "https://golang.org/cmd/".to_string(),
                "https://other.org/x".to_string(),
            ]
        );
    }

    #[test]
    fn test_keeps_order_and_duplicates() {
        let html = r#"<html><body>
            <a href="/b">b</a>
            <a href="/a">a</a>
            <a href="/b">b again</a>
        </body></html>"#;
        let links = extract_links(html, &base_url());
        assert_eq!(
            links,
            vec![
                "https://golang.org/b".to_string(),
                "https://golang.org/a".to_string(),
                "https://golang.org/b".to_string(),
            ]
        );
    }

    #[test]
    fn test_skips_unfollowable_links() {
        let html = r##"<html><body>
            <a href="javascript:void(0)">js</a>
            <a href="mailto:gopher@golang.org">mail</a>
            <a href="tel:+1234567890">tel</a>
            <a href="data:text/html,<h1>x</h1>">data</a>
            <a href="#section">jump</a>
            <a href="/go.tar.gz" download>download</a>
            <a href="ftp://golang.org/pub">ftp</a>
            <a href="   ">blank</a>
        </body></html>"##;
        assert!(extract_links(html, &base_url()).is_empty());
    }

    #[test]
    fn test_extract_canonical_link() {
        let html = r#"<html><head><link rel="canonical" href="https://golang.org/pkg/" /></head><body></body></html>"#;
        let links = extract_links(html, &base_url());
        assert_eq!(links, vec!["https://golang.org/pkg/".to_string()]);
    }

    #[test]
    fn test_ignores_stylesheets() {
        let html = r#"<html><head><link rel="stylesheet" href="/style.css" /></head><body></body></html>"#;
        assert!(extract_links(html, &base_url()).is_empty());
    }
}
