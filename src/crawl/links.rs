// src/crawl/links.rs
// =============================================================================
// This module finds the links on a page that we should follow next.
//
// Steps for every <a href="..."> on the page:
// 1. Resolve the href against the page URL (relative -> absolute)
// 2. Keep only http/https links
// 3. Drop the #fragment, so "page#a" and "page" are the same page
// 4. Keep only links the ScopeFilter accepts (same site)
// 5. Drop links we have already visited
// 6. Drop duplicates, keeping the order in which links first appear
//
// The result is ordered, so a crawl over the same pages always visits them
// in the same order.
// =============================================================================

use super::scope::ScopeFilter;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

// Extracts the links worth following from a page
//
// Parameters:
//   html: the raw page markup
//   page_url: the URL of the page (for resolving relative links)
//   scope: decides which links are on the same site
//   visited: normalized URLs already visited in this run
//
// Returns: absolute URLs in first-seen order, without duplicates
pub fn extract_links(
    html: &str,
    page_url: &Url,
    scope: &ScopeFilter,
    visited: &HashSet<String>,
) -> Vec<Url> {
    let document = Html::parse_document(html);

    // Our selector is a constant and known to be valid
    let selector = Selector::parse("a[href]").expect("valid selector");

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(url) = resolve_link(page_url, href) else {
            continue;
        };

        if !scope.in_scope(&url) {
            continue;
        }

        let key = normalize_url(&url);
        if visited.contains(&key) || !seen.insert(key) {
            continue;
        }

        links.push(url);
    }

    links
}

// Resolves a (possibly relative) href into an absolute http(s) URL
// without a fragment
//
// Examples:
//   base = "https://example.com/docs/intro"
//   href = "setup"              -> Some("https://example.com/docs/setup")
//   href = "/about#team"        -> Some("https://example.com/about")
//   href = "mailto:a@b.c"       -> None
//   href = "javascript:void(0)" -> None
pub fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let mut url = base.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    url.set_fragment(None);
    Some(url)
}

// The key we store in the visited set
pub fn normalize_url(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.to_string()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does url.join() do?
//    - It resolves a link the way a browser does
//    - "https://example.com/docs/intro" + "setup" = "https://example.com/docs/setup"
//    - "https://example.com/docs/intro" + "/about" = "https://example.com/about"
//
// 2. What is let-else?
//    - let Some(x) = expr else { continue; };
//    - Binds x if the pattern matches, otherwise runs the else block
//
// 3. Why both `visited` and `seen`?
//    - visited: pages fetched earlier in this run (owned by the crawler)
//    - seen: links already collected from *this* page, to drop duplicates
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScopeMatch;

    fn page() -> Url {
        Url::parse("https://example.com/docs/intro").unwrap()
    }

    fn scope() -> ScopeFilter {
        ScopeFilter::new(Url::parse("https://example.com/").unwrap(), ScopeMatch::Authority)
    }

    fn as_strings(links: &[Url]) -> Vec<String> {
        links.iter().map(|u| u.to_string()).collect()
    }

    #[test]
    fn test_resolve_relative_link() {
        let result = resolve_link(&page(), "setup").unwrap();
        assert_eq!(result.as_str(), "https://example.com/docs/setup");

        let result = resolve_link(&page(), "../about").unwrap();
        assert_eq!(result.as_str(), "https://example.com/about");
    }

    #[test]
    fn test_resolve_drops_fragment() {
        let result = resolve_link(&page(), "/about#team").unwrap();
        assert_eq!(result.as_str(), "https://example.com/about");

        // A pure anchor points back at the page itself
        let result = resolve_link(&page(), "#section").unwrap();
        assert_eq!(result.as_str(), "https://example.com/docs/intro");
    }

    #[test]
    fn test_skip_non_http() {
        assert_eq!(resolve_link(&page(), "mailto:test@example.com"), None);
        assert_eq!(resolve_link(&page(), "javascript:void(0)"), None);
        assert_eq!(resolve_link(&page(), "tel:+123"), None);
        assert_eq!(resolve_link(&page(), "   "), None);
    }

    #[test]
    fn test_extract_keeps_same_site_in_order() {
        let html = r#"
            <a href="/b">B</a>
            <a href="https://other.com/x">Other</a>
            <a href="/a">A</a>
            <a href="/b#again">B again</a>
            <a href="https://example.com/c">C</a>
            <a name="no-href">nothing</a>
        "#;
        let links = extract_links(html, &page(), &scope(), &HashSet::new());
        assert_eq!(
            as_strings(&links),
            vec![
                "https://example.com/b",
                "https://example.com/a",
                "https://example.com/c",
            ]
        );
    }

    #[test]
    fn test_extract_skips_visited() {
        let html = r##"
            <a href="/docs/intro">Self</a>
            <a href="#top">Top</a>
            <a href="/next">Next</a>
        "##;
        let mut visited = HashSet::new();
        visited.insert(normalize_url(&page()));

        let links = extract_links(html, &page(), &scope(), &visited);
        assert_eq!(as_strings(&links), vec!["https://example.com/next"]);
    }

    #[test]
    fn test_extract_from_page_without_links() {
        let links = extract_links("<p>No links here</p>", &page(), &scope(), &HashSet::new());
        assert!(links.is_empty());
    }
}
