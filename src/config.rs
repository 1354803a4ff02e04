// src/config.rs
// =============================================================================
// This module holds the settings for one crawl run.
//
// A run is described by:
// - the seed URL (also defines which host we stay on)
// - the maximum depth (1-5)
// - an optional cap on how many pages we fetch
// - the traversal order and the same-site matching rule
// - HTTP details: timeout and User-Agent
//
// The config is built once, before any network activity, and never changes
// while the crawl is running.
//
// Rust concepts:
// - thiserror: Derive Display/Error for our error enum
// - Builder-style methods: `with_*` methods that consume and return Self
// - clap::ValueEnum: Lets enums be used directly as CLI values
// =============================================================================

use clap::ValueEnum;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const MIN_DEPTH: u8 = 1;
pub const MAX_DEPTH: u8 = 5;

// Per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// Desktop browser identity sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const OUTPUT_EXTENSION: &str = "pdf";

// Problems with the user's input. All of these are detected before we
// make a single HTTP request.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Please enter a valid number for crawl depth (got '{0}')")]
    NotANumber(String),

    #[error("Crawl depth must be between 1 and 5 (got {0})")]
    DepthOutOfRange(i64),

    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Only http and https URLs can be crawled (got '{0}')")]
    UnsupportedScheme(String),

    #[error("URL has no host: {0}")]
    MissingHost(String),
}

// In which order pages are visited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TraversalOrder {
    /// Follow the first link all the way down before its siblings
    #[default]
    DepthFirst,
    /// Visit every page of one level before going one level deeper
    BreadthFirst,
}

// How a discovered URL is compared against the seed to decide if it is
// "the same site"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopeMatch {
    /// host[:port] must match exactly; the scheme is ignored
    #[default]
    Authority,
    /// Only the host must match; port and scheme are ignored
    Host,
    /// Scheme, host and effective port must all match
    Origin,
}

// Everything the crawler needs to know for one run
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub base_url: Url,
    pub max_depth: u8,
    pub max_pages: Option<usize>,
    pub order: TraversalOrder,
    pub scope: ScopeMatch,
    pub timeout: Duration,
    pub user_agent: String,
}

impl CrawlConfig {
    // Creates a config with default settings for everything except the
    // seed URL and the depth, which are validated here
    pub fn new(base_url: &str, max_depth: u8) -> Result<Self, InputError> {
        let base_url = parse_seed_url(base_url)?;
        let max_depth = check_depth(i64::from(max_depth))?;

        Ok(Self {
            base_url,
            max_depth,
            max_pages: None,
            order: TraversalOrder::default(),
            scope: ScopeMatch::default(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_order(mut self, order: TraversalOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_scope(mut self, scope: ScopeMatch) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

// Parses the depth the user typed in
//
// Examples:
//   "3"   -> Ok(3)
//   " 2 " -> Ok(2)
//   "abc" -> Err(NotANumber)
//   "9"   -> Err(DepthOutOfRange)
pub fn parse_depth(input: &str) -> Result<u8, InputError> {
    let trimmed = input.trim();
    let depth: i64 = trimmed
        .parse()
        .map_err(|_| InputError::NotANumber(trimmed.to_string()))?;
    check_depth(depth)
}

fn check_depth(depth: i64) -> Result<u8, InputError> {
    if depth < i64::from(MIN_DEPTH) || depth > i64::from(MAX_DEPTH) {
        return Err(InputError::DepthOutOfRange(depth));
    }
    // In range, so it fits in a u8
    Ok(depth as u8)
}

// Parses and validates the seed URL
pub fn parse_seed_url(input: &str) -> Result<Url, InputError> {
    let trimmed = input.trim();
    let url = Url::parse(trimmed).map_err(|source| InputError::InvalidUrl {
        url: trimmed.to_string(),
        source,
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(InputError::UnsupportedScheme(trimmed.to_string()));
    }
    if url.host_str().is_none() {
        return Err(InputError::MissingHost(trimmed.to_string()));
    }

    Ok(url)
}

// Makes sure the output file name ends in ".pdf"
//
// Examples:
//   "site"     -> "site.pdf"
//   "site.pdf" -> "site.pdf"
//   "site.PDF" -> "site.PDF"
//   "v1.2"     -> "v1.2.pdf"
pub fn resolve_output_path(name: &str) -> PathBuf {
    let name = name.trim();
    let has_extension = PathBuf::from(name)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case(OUTPUT_EXTENSION))
        .unwrap_or(false);

    if has_extension {
        PathBuf::from(name)
    } else {
        PathBuf::from(format!("{}.{}", name, OUTPUT_EXTENSION))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_depth_accepts_range() {
        for depth in 1..=5u8 {
            assert_eq!(parse_depth(&depth.to_string()).unwrap(), depth);
        }
        assert_eq!(parse_depth(" 3\n").unwrap(), 3);
    }

    #[test]
    fn test_parse_depth_rejects_text() {
        let err = parse_depth("abc").unwrap_err();
        assert!(matches!(err, InputError::NotANumber(ref s) if s == "abc"));
        assert!(err.to_string().contains("valid number"));
    }

    #[test]
    fn test_parse_depth_rejects_out_of_range() {
        assert!(matches!(parse_depth("0"), Err(InputError::DepthOutOfRange(0))));
        assert!(matches!(parse_depth("6"), Err(InputError::DepthOutOfRange(6))));
        assert!(matches!(parse_depth("-1"), Err(InputError::DepthOutOfRange(-1))));
    }

    #[test]
    fn test_seed_url_validation() {
        assert!(parse_seed_url("https://example.com/").is_ok());
        assert!(matches!(
            parse_seed_url("example.com"),
            Err(InputError::InvalidUrl { .. })
        ));
        assert!(matches!(
            parse_seed_url("ftp://example.com/"),
            Err(InputError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_config_defaults() {
        let config = CrawlConfig::new("https://example.com/", 2).unwrap();
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.max_pages, None);
        assert_eq!(config.order, TraversalOrder::DepthFirst);
        assert_eq!(config.scope, ScopeMatch::Authority);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_config_rejects_bad_depth() {
        assert!(matches!(
            CrawlConfig::new("https://example.com/", 0),
            Err(InputError::DepthOutOfRange(0))
        ));
    }

    #[test]
    fn test_output_path_extension() {
        assert_eq!(resolve_output_path("site"), PathBuf::from("site.pdf"));
        assert_eq!(resolve_output_path("site.pdf"), PathBuf::from("site.pdf"));
        assert_eq!(resolve_output_path("site.PDF"), PathBuf::from("site.PDF"));
        assert_eq!(resolve_output_path("v1.2"), PathBuf::from("v1.2.pdf"));
    }
}
