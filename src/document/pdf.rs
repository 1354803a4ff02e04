// src/document/pdf.rs
// =============================================================================
// This module writes the collected text as a PDF, using lopdf.
//
// Layout:
// - A4 pages (595 x 842 points), 15 mm (~42 pt) margins on every side
// - Headings: Helvetica-Bold 14 pt
// - Paragraphs: Helvetica 11 pt, word-wrapped to the page width
// - A new page starts automatically when the bottom margin is reached
//
// We use the 14 standard PDF fonts, so nothing has to be embedded. Those
// fonts only cover the WinAnsi character set; anything else is printed
// as '?' instead of failing the page.
//
// Nothing touches the disk until serialize(). The finished file is written
// to a temporary file first and renamed into place, so a failed save never
// leaves half a PDF behind.
//
// Rust concepts:
// - Traits: PdfDocument implements DocumentSink
// - std::mem::take: Move a Vec out of a struct, leaving an empty one behind
// =============================================================================

use super::{DocumentSink, SinkError};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::Path;
use tempfile::NamedTempFile;

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 42.5;

const HEADING_SIZE: f32 = 14.0;
const HEADING_LEADING: f32 = 28.0;
const HEADING_GAP: f32 = 14.0;

const BODY_SIZE: f32 = 11.0;
const BODY_LEADING: f32 = 17.0;
const PARAGRAPH_GAP: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    // Name of the font in the page resources dictionary
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

// One line of text, already positioned on its page
#[derive(Debug, Clone)]
struct Line {
    font: Font,
    size: f32,
    x: f32,
    y: f32,
    text: Vec<u8>,
}

#[derive(Debug)]
pub struct PdfDocument {
    pages: Vec<Vec<Line>>,
    current: Vec<Line>,
    // Top of the next line, in points from the bottom of the page
    cursor: f32,
    // Index into `pages` where the page being written began; an overflowing
    // page may already have spilled into `pages`
    page_start: usize,
}

impl Default for PdfDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfDocument {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            cursor: PAGE_HEIGHT - MARGIN,
            page_start: 0,
        }
    }

    // Pages that will end up in the file (an empty document still gets
    // one blank page when saved)
    pub fn page_count(&self) -> usize {
        self.pages.len() + usize::from(!self.current.is_empty())
    }

    fn text_width() -> f32 {
        PAGE_WIDTH - 2.0 * MARGIN
    }

    fn finish_page(&mut self) {
        if !self.current.is_empty() {
            self.pages.push(std::mem::take(&mut self.current));
        }
        self.cursor = PAGE_HEIGHT - MARGIN;
    }

    fn add_block(&mut self, text: &str, font: Font, size: f32, leading: f32, gap: f32) {
        for line in wrap_text(text, size, Self::text_width()) {
            if self.cursor - leading < MARGIN {
                self.finish_page();
            }

            // Baseline sits roughly one font size below the top of the line
            let y = self.cursor - size;
            self.current.push(Line {
                font,
                size,
                x: MARGIN,
                y,
                text: encode_win_ansi(&line),
            });
            self.cursor -= leading;
        }
        self.cursor -= gap;
    }

    fn build(&self) -> Result<Document, SinkError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular_id,
                "F2" => bold_id,
            },
        });

        let mut pages: Vec<&[Line]> = self.pages.iter().map(Vec::as_slice).collect();
        if !self.current.is_empty() {
            pages.push(&self.current);
        }
        if pages.is_empty() {
            pages.push(&[]);
        }

        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for lines in pages {
            let content = Content {
                operations: page_operations(lines),
            };
            let encoded = content
                .encode()
                .map_err(|e| SinkError::Pdf(e.to_string()))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let media_box: Vec<Object> = vec![
            0.into(),
            0.into(),
            (PAGE_WIDTH as i64).into(),
            (PAGE_HEIGHT as i64).into(),
        ];
        let count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => media_box,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        Ok(doc)
    }
}

impl DocumentSink for PdfDocument {
    fn begin(&mut self) {
        self.pages.clear();
        self.current.clear();
        self.cursor = PAGE_HEIGHT - MARGIN;
        self.page_start = 0;
    }

    fn add_heading(&mut self, text: &str) -> Result<(), SinkError> {
        self.add_block(text, Font::Bold, HEADING_SIZE, HEADING_LEADING, HEADING_GAP);
        Ok(())
    }

    fn add_paragraph(&mut self, text: &str) -> Result<(), SinkError> {
        self.add_block(text, Font::Regular, BODY_SIZE, BODY_LEADING, PARAGRAPH_GAP);
        Ok(())
    }

    // Never leaves an empty page behind
    fn new_page(&mut self) {
        self.finish_page();
        self.page_start = self.pages.len();
    }

    fn discard_page(&mut self) {
        self.pages.truncate(self.page_start);
        self.current.clear();
        self.cursor = PAGE_HEIGHT - MARGIN;
    }

    fn serialize(&mut self, path: &Path) -> Result<(), SinkError> {
        let mut doc = self.build()?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir)?;
        doc.save_to(&mut file)
            .map_err(|e| SinkError::Pdf(e.to_string()))?;
        file.as_file().sync_all()?;
        file.persist(path)
            .map_err(|e| SinkError::Persist(e.to_string()))?;

        Ok(())
    }
}

// BT /F1 11 Tf x y Td (text) Tj ET, once per line
fn page_operations(lines: &[Line]) -> Vec<Operation> {
    let mut operations = Vec::with_capacity(lines.len() * 5);
    for line in lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![line.font.resource().into(), (line.size.round() as i64).into()],
        ));
        operations.push(Operation::new(
            "Td",
            vec![(line.x.round() as i64).into(), (line.y.round() as i64).into()],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(line.text.clone())],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    operations
}

// Approximate Helvetica advance widths, in 1/1000 em
fn glyph_width(c: char) -> f32 {
    let units = match c {
        ' ' | '!' | ',' | '.' | '/' | ':' | ';' | '[' | ']' | 'I' | 'f' | 't' | '\\' => 278,
        '\'' | '|' => 191,
        'i' | 'j' | 'l' => 222,
        '(' | ')' | '-' | '`' | 'r' => 333,
        'm' => 833,
        'w' => 722,
        'M' => 833,
        'W' => 944,
        '@' => 1015,
        'A'..='Z' => 667,
        _ => 556,
    };
    units as f32
}

fn measure(text: &str, size: f32) -> f32 {
    text.chars().map(glyph_width).sum::<f32>() * size / 1000.0
}

// Greedy word wrap. Line breaks inside the text are kept; words wider than
// a whole line are broken between characters.
fn wrap_text(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let space = measure(" ", size);
    let mut lines = Vec::new();

    for source_line in text.lines() {
        let mut current = String::new();
        let mut width = 0.0;

        for word in source_line.split_whitespace() {
            let word_width = measure(word, size);

            if !current.is_empty() && width + space + word_width <= max_width {
                current.push(' ');
                current.push_str(word);
                width += space + word_width;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if word_width <= max_width {
                current.push_str(word);
                width = word_width;
            } else {
                let mut pieces = break_word(word, size, max_width);
                // The last piece may still have room for the following words
                current = pieces.pop().unwrap_or_default();
                width = measure(&current, size);
                lines.extend(pieces);
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

fn break_word(word: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut width = 0.0;

    for c in word.chars() {
        let w = glyph_width(c) * size / 1000.0;
        if !piece.is_empty() && width + w > max_width {
            pieces.push(std::mem::take(&mut piece));
            width = 0.0;
        }
        piece.push(c);
        width += w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }

    pieces
}

// Maps text onto the WinAnsi (Windows-1252) code page used by the
// standard fonts
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7e}' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u8,
            '\t' => b' ',
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            '\u{2500}'..='\u{257f}' => box_drawing(c),
            _ => b'?',
        })
        .collect()
}

// Plain-text tables are drawn with box-drawing characters; fall back to
// ASCII lines and crossings
fn box_drawing(c: char) -> u8 {
    match c {
        '─' | '━' | '┄' | '┅' | '┈' | '┉' | '╌' | '╍' | '═' | '╴' | '╶' | '╸' | '╺' | '╼' | '╾' => {
            b'-'
        }
        '│' | '┃' | '┆' | '┇' | '┊' | '┋' | '╎' | '╏' | '║' | '╵' | '╷' | '╹' | '╻' | '╽' | '╿' => {
            b'|'
        }
        _ => b'+',
    }
}
