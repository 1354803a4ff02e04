// src/extract/normalize.rs
// =============================================================================
// This module turns an HTML fragment into plain text paragraphs.
//
// Conversion (html2text):
// - link text is kept, and so are link targets (as footnotes)
// - images are dropped entirely
// - no line wrapping: line breaks only come from the HTML structure
//
// Clean-up afterwards (clean_text):
// - any run of blank lines becomes exactly one blank line
// - every http(s) URL is replaced by the placeholder "[URL]"
// - leading/trailing whitespace is trimmed
//
// clean_text is idempotent: running it twice gives the same text as
// running it once.
// =============================================================================

use super::isolate::remove_elements;
use super::ContentError;
use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;

pub const URL_PLACEHOLDER: &str = "[URL]";

// html2text needs a width; this is wide enough that it never wraps prose
const UNWRAPPED_WIDTH: usize = 10_000;

// Images render as their alt text, horizontal rules as a full-width line
const NOT_TEXT: &str = "img, picture, svg, hr";

static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("hardcoded regex pattern is valid"));

static LONG_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://(?:[a-zA-Z0-9$-_@.&+!*(),]|%[0-9a-fA-F]{2})+")
        .expect("hardcoded regex pattern is valid")
});

// Converts an isolated HTML fragment into cleaned plain text
pub fn normalize(fragment: &str) -> Result<String, ContentError> {
    let mut document = Html::parse_document(fragment);
    remove_elements(&mut document, NOT_TEXT);
    let html = document.html();

    let text = html2text::config::plain()
        .string_from_read(html.as_bytes(), UNWRAPPED_WIDTH)
        .map_err(|e| ContentError::Conversion(e.to_string()))?;

    Ok(clean_text(&text))
}

pub fn clean_text(text: &str) -> String {
    let collapsed = BLANK_LINES.replace_all(text, "\n\n");
    let masked = LONG_URL.replace_all(&collapsed, URL_PLACEHOLDER);
    masked.trim().to_string()
}

// Splits normalized text on blank lines, skipping empty paragraphs
pub fn paragraphs(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
