// src/extract/isolate.rs
// =============================================================================
// This module cuts a page down to the part a human would want to read.
//
// 1. Remove everything that is never content:
//    <script>, <style>, <nav>, <footer>, <iframe>
// 2. Pick the main content region, first match wins, in this order:
//    - the <main> landmark (or an element with role="main")
//    - the element with id="content"
//    - the first element with class="content"
// 3. If none of these exist, keep the whole cleaned document.
//
// The result is serialized back to HTML for the normalizer.
// =============================================================================

use scraper::{Html, Selector};

const NON_CONTENT: &str = "script, style, nav, footer, iframe";

// Priority order matters: landmark, then id, then class
const CONTENT_REGIONS: [&str; 3] = ["main, [role=\"main\"]", "#content", ".content"];

pub fn isolate(html: &str) -> String {
    let mut document = Html::parse_document(html);
    remove_elements(&mut document, NON_CONTENT);

    for css in CONTENT_REGIONS {
        let selector = Selector::parse(css).expect("valid selector");
        if let Some(region) = document.select(&selector).next() {
            return region.html();
        }
    }

    document.html()
}

// Detaches every element matching `css` (and its whole subtree) from the
// document tree
pub(crate) fn remove_elements(document: &mut Html, css: &str) {
    let selector = Selector::parse(css).expect("valid selector");

    // Collect first: we cannot mutate the tree while iterating over it
    let ids: Vec<_> = document.select(&selector).map(|element| element.id()).collect();

    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}
