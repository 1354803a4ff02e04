// src/crawl/traversal.rs
// =============================================================================
// This module drives the whole crawl.
//
// How it works:
// 1. Put the seed URL on the worklist at depth 0
// 2. Take the next item off the worklist
// 3. Skip it if it is too deep, already visited, or the page cap is hit
// 4. Mark it visited *before* fetching (so a page linking to itself, or a
//    cycle of pages, can never bring us back)
// 5. Fetch the page; on failure, abandon this branch
// 6. Extract paragraphs and write them to the document sink:
//    "Page: <url>" heading, the paragraphs, then a page break
// 7. Extract same-site links and put them on the worklist at depth + 1
// 8. Repeat until the worklist is empty
//
// The worklist is a stack for depth-first order (same order as following
// each link recursively) or a queue for breadth-first order.
//
// All state for one run lives in CrawlContext, which is passed explicitly
// to each visit. Everything runs one page at a time.
//
// Rust concepts:
// - Generics: run() works with any DocumentSink
// - HashSet: To track visited URLs (O(1) lookup)
// - VecDeque / Vec: queue and stack for the worklist
// - serde: The report can be printed as JSON
// =============================================================================

use super::fetch::{FetchError, Fetcher};
use super::links::{extract_links, normalize_url};
use super::scope::ScopeFilter;
use crate::config::{CrawlConfig, TraversalOrder};
use crate::document::{DocumentSink, SinkError};
use crate::extract::extract_paragraphs;
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info, warn};
use url::Url;

// A page waiting on the worklist
#[derive(Debug, Clone)]
struct CrawlItem {
    url: Url,
    depth: u8, // How many link hops from the seed URL
}

// Everything that changes while one crawl runs
#[derive(Debug, Default)]
pub struct CrawlContext {
    visited: HashSet<String>,
    fetched: usize,
}

impl CrawlContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(&normalize_url(url))
    }

    // Returns false if the URL was already in the set
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        self.visited.insert(normalize_url(url))
    }

    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }

    pub fn fetched(&self) -> usize {
        self.fetched
    }
}

// Why a URL taken from the worklist was not fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    AlreadyVisited,
    DepthExceeded,
    PageLimit,
}

// What happened to one URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PageStatus {
    /// Content was written to the document
    Added { paragraphs: usize, links: usize },
    /// The page could not be downloaded; its links were not followed
    FetchFailed { reason: String },
    /// The page was downloaded but contributed no content
    ContentFailed { reason: String, links: usize },
    /// The page was never fetched
    Skipped { reason: SkipReason },
}

#[derive(Debug, Clone, Serialize)]
pub struct PageOutcome {
    pub url: String,
    pub depth: u8,
    #[serde(flatten)]
    pub status: PageStatus,
}

// Summary of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub seed: String,
    pub max_depth: u8,
    pub order: TraversalOrder,
    pub pages: Vec<PageOutcome>,
    /// True when the page cap stopped the crawl early
    pub truncated: bool,
}

impl CrawlReport {
    fn new(config: &CrawlConfig) -> Self {
        Self {
            seed: config.base_url.to_string(),
            max_depth: config.max_depth,
            order: config.order,
            pages: Vec::new(),
            truncated: false,
        }
    }

    pub fn added(&self) -> usize {
        self.count(|status| matches!(status, PageStatus::Added { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|status| {
            matches!(
                status,
                PageStatus::FetchFailed { .. } | PageStatus::ContentFailed { .. }
            )
        })
    }

    pub fn fetched(&self) -> usize {
        self.count(|status| !matches!(status, PageStatus::Skipped { .. }))
    }

    fn count(&self, predicate: impl Fn(&PageStatus) -> bool) -> usize {
        self.pages.iter().filter(|page| predicate(&page.status)).count()
    }
}

// Stack for depth-first, queue for breadth-first
#[derive(Debug)]
enum Worklist {
    Stack(Vec<CrawlItem>),
    Queue(VecDeque<CrawlItem>),
}

impl Worklist {
    fn new(order: TraversalOrder) -> Self {
        match order {
            TraversalOrder::DepthFirst => Worklist::Stack(Vec::new()),
            TraversalOrder::BreadthFirst => Worklist::Queue(VecDeque::new()),
        }
    }

    fn pop(&mut self) -> Option<CrawlItem> {
        match self {
            Worklist::Stack(stack) => stack.pop(),
            Worklist::Queue(queue) => queue.pop_front(),
        }
    }

    // Children come in document order; that is also the order they will be
    // visited in
    fn extend(&mut self, children: Vec<CrawlItem>) {
        match self {
            Worklist::Stack(stack) => stack.extend(children.into_iter().rev()),
            Worklist::Queue(queue) => queue.extend(children),
        }
    }
}

pub struct Crawler {
    config: CrawlConfig,
    fetcher: Fetcher,
    scope: ScopeFilter,
}

impl Crawler {
    pub fn new(config: CrawlConfig) -> Result<Self, FetchError> {
        let fetcher = Fetcher::new(config.timeout, &config.user_agent)?;
        let scope = ScopeFilter::new(config.base_url.clone(), config.scope);

        Ok(Self {
            config,
            fetcher,
            scope,
        })
    }

    // Crawls the site and feeds every page's content to `sink`.
    // Individual page failures are recorded in the report, never returned.
    pub async fn run<S: DocumentSink>(&self, sink: &mut S) -> CrawlReport {
        let mut ctx = CrawlContext::new();
        let mut report = CrawlReport::new(&self.config);
        let mut worklist = Worklist::new(self.config.order);

        sink.begin();
        worklist.extend(vec![CrawlItem {
            url: self.config.base_url.clone(),
            depth: 0,
        }]);

        while let Some(item) = worklist.pop() {
            // Only a page we would actually fetch counts against the cap
            if self.page_limit_reached(&ctx) && !ctx.is_visited(&item.url) {
                info!(
                    fetched = ctx.fetched(),
                    "page limit reached, stopping crawl"
                );
                report.pages.push(PageOutcome {
                    url: item.url.to_string(),
                    depth: item.depth,
                    status: PageStatus::Skipped {
                        reason: SkipReason::PageLimit,
                    },
                });
                report.truncated = true;
                break;
            }

            let (outcome, children) = self.visit(&mut ctx, sink, item).await;
            report.pages.push(outcome);
            worklist.extend(children);
        }

        info!(
            visited = ctx.visited().len(),
            added = report.added(),
            failed = report.failed(),
            "crawl finished"
        );
        report
    }

    fn page_limit_reached(&self, ctx: &CrawlContext) -> bool {
        matches!(self.config.max_pages, Some(max) if ctx.fetched() >= max)
    }

    // Visits one URL: returns what happened and the links to follow next
    async fn visit<S: DocumentSink>(
        &self,
        ctx: &mut CrawlContext,
        sink: &mut S,
        item: CrawlItem,
    ) -> (PageOutcome, Vec<CrawlItem>) {
        let CrawlItem { url, depth } = item;
        let outcome = |status| PageOutcome {
            url: url.to_string(),
            depth,
            status,
        };

        if depth >= self.config.max_depth {
            debug!(url = %url, depth, "depth limit reached, skipping");
            let status = PageStatus::Skipped {
                reason: SkipReason::DepthExceeded,
            };
            return (outcome(status), Vec::new());
        }

        // Marking before the fetch keeps self-links and cycles out
        if !ctx.mark_visited(&url) {
            debug!(url = %url, "already visited, skipping");
            let status = PageStatus::Skipped {
                reason: SkipReason::AlreadyVisited,
            };
            return (outcome(status), Vec::new());
        }

        info!(depth, "Processing: {}", url);
        ctx.fetched += 1;

        let html = match self.fetcher.fetch(&url).await {
            Ok(html) => html,
            Err(e) => {
                let status = PageStatus::FetchFailed {
                    reason: e.to_string(),
                };
                return (outcome(status), Vec::new());
            }
        };

        let content = extract_paragraphs(&html)
            .map_err(|e| e.to_string())
            .and_then(|paragraphs| {
                write_page(sink, &url, &paragraphs)
                    .map(|()| paragraphs.len())
                    .map_err(|e| e.to_string())
            });

        let links = extract_links(&html, &url, &self.scope, ctx.visited());
        let found = links.len();

        let status = match content {
            Ok(paragraphs) => PageStatus::Added {
                paragraphs,
                links: found,
            },
            Err(reason) => {
                warn!(url = %url, error = %reason, "Error adding content from page");
                PageStatus::ContentFailed {
                    reason,
                    links: found,
                }
            }
        };

        let next_depth = depth + 1;
        let children = if next_depth < self.config.max_depth {
            links
                .into_iter()
                .map(|url| CrawlItem {
                    url,
                    depth: next_depth,
                })
                .collect()
        } else {
            debug!(url = %url, links = found, "not following links past max depth");
            Vec::new()
        };

        (outcome(status), children)
    }
}

// Heading, paragraphs, page break. On a sink error whatever made it into
// the document for this page is dropped again, so the page contributes
// nothing and the next page starts clean.
fn write_page<S: DocumentSink>(
    sink: &mut S,
    url: &Url,
    paragraphs: &[String],
) -> Result<(), SinkError> {
    let result = write_blocks(sink, url, paragraphs);
    if result.is_err() {
        sink.discard_page();
    }
    sink.new_page();
    result
}

fn write_blocks<S: DocumentSink>(
    sink: &mut S,
    url: &Url,
    paragraphs: &[String],
) -> Result<(), SinkError> {
    sink.add_heading(&format!("Page: {}", url))?;
    for paragraph in paragraphs {
        sink.add_paragraph(paragraph)?;
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a worklist instead of recursion?
//    - A recursive crawl keeps its "frontier" on the call stack
//    - With an explicit Vec/VecDeque we can pick the order (stack = depth-first,
//      queue = breadth-first) and stop cleanly when the page cap is hit
//    - Pushing children in reverse onto a stack gives the same visiting order
//      as recursing into each link in turn
//
// 2. Why is CrawlContext passed as &mut?
//    - All mutable state of the run is in one place
//    - visit() only changes what it is given, which keeps it easy to test
//
// 3. What is #[serde(flatten)]?
//    - PageOutcome embeds PageStatus; flatten puts the status fields next
//      to url/depth in the JSON instead of nesting them
// -----------------------------------------------------------------------------
