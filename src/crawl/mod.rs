// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Depth-first (default) or breadth-first traversal from a seed URL
// - Same-site restriction (doesn't crawl external sites)
// - Configurable depth limit and optional page cap
// - Every URL is fetched at most once per run
//
// Submodules:
// - scope: same-site check
// - fetch: one HTTP GET per page
// - links: link extraction and URL normalization
// - traversal: the worklist loop tying it all together
// =============================================================================

mod fetch;
mod links;
mod scope;
mod traversal;

// Re-export what main.rs needs
pub use traversal::{CrawlReport, Crawler};
