// src/document/mod.rs
// =============================================================================
// This module defines where the extracted text ends up.
//
// The crawler only talks to the DocumentSink trait:
// - begin()            once, before the first page
// - add_heading(text)  a page header ("Page: <url>")
// - add_paragraph(text) one paragraph of content
// - new_page()         finish the current page, start a fresh one
// - discard_page()     drop everything added since begin()/new_page()
// - serialize(path)    write the finished document, once, at the end
//
// Blocks land in the document in exactly the order they were added.
// discard_page() is the only way to take anything back, and only for the
// page still being written.
//
// Implementations:
// - pdf::PdfDocument: lays the blocks out on A4 pages and writes a PDF
// =============================================================================

mod pdf;

pub use pdf::PdfDocument;

use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not move finished document into place: {0}")]
    Persist(String),
}

pub trait DocumentSink {
    fn begin(&mut self);

    fn add_heading(&mut self, text: &str) -> Result<(), SinkError>;

    fn add_paragraph(&mut self, text: &str) -> Result<(), SinkError>;

    fn new_page(&mut self);

    fn discard_page(&mut self);

    fn serialize(&mut self, path: &Path) -> Result<(), SinkError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::path::PathBuf;

    // Everything a sink can receive, recorded in order
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Block {
        Begin,
        Heading(String),
        Paragraph(String),
        NewPage,
    }

    // Records every call so tests can check exactly what the crawler emitted
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        pub blocks: Vec<Block>,
        pub saved_to: Option<PathBuf>,
        // Paragraphs containing this text are rejected with an error
        pub reject: Option<String>,
    }

    impl RecordingSink {
        pub fn headings(&self) -> Vec<String> {
            self.blocks
                .iter()
                .filter_map(|block| match block {
                    Block::Heading(text) => Some(text.clone()),
                    _ => None,
                })
                .collect()
        }

        pub fn paragraphs(&self) -> Vec<String> {
            self.blocks
                .iter()
                .filter_map(|block| match block {
                    Block::Paragraph(text) => Some(text.clone()),
                    _ => None,
                })
                .collect()
        }
    }

    impl DocumentSink for RecordingSink {
        fn begin(&mut self) {
            self.blocks.push(Block::Begin);
        }

        fn add_heading(&mut self, text: &str) -> Result<(), SinkError> {
            self.blocks.push(Block::Heading(text.to_string()));
            Ok(())
        }

        fn add_paragraph(&mut self, text: &str) -> Result<(), SinkError> {
            if let Some(bad) = &self.reject {
                if text.contains(bad.as_str()) {
                    return Err(SinkError::Pdf(format!("cannot encode '{}'", text)));
                }
            }
            self.blocks.push(Block::Paragraph(text.to_string()));
            Ok(())
        }

        fn new_page(&mut self) {
            self.blocks.push(Block::NewPage);
        }

        fn discard_page(&mut self) {
            let start = self
                .blocks
                .iter()
                .rposition(|block| matches!(block, Block::Begin | Block::NewPage))
                .map_or(0, |i| i + 1);
            self.blocks.truncate(start);
        }

        fn serialize(&mut self, path: &Path) -> Result<(), SinkError> {
            self.saved_to = Some(path.to_path_buf());
            Ok(())
        }
    }
}
