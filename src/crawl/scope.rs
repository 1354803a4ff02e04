// src/crawl/scope.rs
// =============================================================================
// This module decides whether a URL belongs to the site we are crawling.
//
// The rule: a URL is "in scope" when its network location (host[:port])
// matches the seed URL's. Path, query and fragment never matter.
//
// The url crate already normalizes a few things while parsing:
// - hosts are lower-cased ("Example.COM" -> "example.com")
// - a scheme's default port is dropped ("https://x:443" -> "https://x")
//
// What happens across schemes is configurable with ScopeMatch:
// - Authority: compare host[:port] as parsed (the default)
// - Host:      compare the host only
// - Origin:    compare scheme + host + effective port
// =============================================================================

use crate::config::ScopeMatch;
use url::Url;

#[derive(Debug, Clone)]
pub struct ScopeFilter {
    base: Url,
    mode: ScopeMatch,
}

impl ScopeFilter {
    pub fn new(base: Url, mode: ScopeMatch) -> Self {
        Self { base, mode }
    }

    pub fn in_scope(&self, candidate: &Url) -> bool {
        // URLs without a host (mailto:, data:, ...) are never part of the site
        if candidate.host_str().is_none() {
            return false;
        }

        match self.mode {
            ScopeMatch::Authority => netloc(candidate) == netloc(&self.base),
            ScopeMatch::Host => candidate.host_str() == self.base.host_str(),
            ScopeMatch::Origin => candidate.origin() == self.base.origin(),
        }
    }
}

// host[:port], the way it appears in the URL after parsing
fn netloc(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Check(ScopeFilter);

    impl Check {
        // Anything that does not parse is out of scope
        fn in_scope(&self, candidate: &str) -> bool {
            Url::parse(candidate)
                .map(|url| self.0.in_scope(&url))
                .unwrap_or(false)
        }
    }

    fn filter(base: &str, mode: ScopeMatch) -> Check {
        Check(ScopeFilter::new(Url::parse(base).unwrap(), mode))
    }

    #[test]
    fn test_same_host_any_path() {
        let scope = filter("https://example.com/", ScopeMatch::Authority);
        assert!(scope.in_scope("https://example.com/"));
        assert!(scope.in_scope("https://example.com/docs/page?x=1#top"));
        assert!(scope.in_scope("http://example.com/about"));
    }

    #[test]
    fn test_other_hosts_rejected() {
        let scope = filter("https://example.com/", ScopeMatch::Authority);
        assert!(!scope.in_scope("https://www.example.com/"));
        assert!(!scope.in_scope("https://example.org/"));
        assert!(!scope.in_scope("https://sub.example.com/page"));
        assert!(!scope.in_scope("mailto:someone@example.com"));
        assert!(!scope.in_scope("not a url"));
    }

    #[test]
    fn test_authority_port_must_match() {
        let scope = filter("http://localhost:8080/", ScopeMatch::Authority);
        assert!(scope.in_scope("http://localhost:8080/a"));
        assert!(!scope.in_scope("http://localhost:9090/a"));
        assert!(!scope.in_scope("http://localhost/a"));
    }

    #[test]
    fn test_authority_normalizes_case_and_default_port() {
        let scope = filter("https://example.com/", ScopeMatch::Authority);
        assert!(scope.in_scope("https://EXAMPLE.com/"));
        assert!(scope.in_scope("https://example.com:443/"));
        // 443 is not the default for http, so the netloc differs
        assert!(!scope.in_scope("http://example.com:443/"));
    }

    #[test]
    fn test_host_mode_ignores_port() {
        let scope = filter("http://localhost:8080/", ScopeMatch::Host);
        assert!(scope.in_scope("http://localhost:9090/"));
        assert!(scope.in_scope("https://localhost/"));
        assert!(!scope.in_scope("http://127.0.0.1:8080/"));
    }

    #[test]
    fn test_origin_mode_requires_scheme() {
        let scope = filter("https://example.com/", ScopeMatch::Origin);
        assert!(scope.in_scope("https://example.com/page"));
        assert!(scope.in_scope("https://example.com:443/page"));
        assert!(!scope.in_scope("http://example.com/page"));
    }
}
