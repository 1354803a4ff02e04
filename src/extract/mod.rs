// src/extract/mod.rs
// =============================================================================
// This module turns raw page HTML into readable paragraphs.
//
// Submodules:
// - isolate: strips scripts/navigation/footers and finds the main content
// - normalize: HTML -> plain text, blank-line collapsing, URL masking
//
// extract_paragraphs() runs the whole pipeline for one page.
// =============================================================================

mod isolate;
mod normalize;

use isolate::isolate;
use normalize::{normalize, paragraphs};

use thiserror::Error;

// Something went wrong while turning one page into text.
// Only that page is affected; the crawl carries on.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("could not convert HTML to text: {0}")]
    Conversion(String),
}

// Raw HTML in, ordered non-empty paragraphs out
pub fn extract_paragraphs(html: &str) -> Result<Vec<String>, ContentError> {
    let fragment = isolate(html);
    let text = normalize(&fragment)?;
    Ok(paragraphs(&text))
}
