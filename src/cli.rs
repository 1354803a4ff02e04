// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Three values are needed for a run:
// - the website URL
// - the maximum crawl depth (1-5)
// - the output file name (".pdf" is appended if missing)
//
// Each of them can be passed as an argument. Whatever is missing is asked
// for interactively on stdin, so running `site2pdf` with no arguments
// walks the user through it.
//
// The depth is taken as text on purpose: "abc" must produce our own
// friendly error message, not a clap usage error.
// =============================================================================

use crate::config::{ScopeMatch, TraversalOrder};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};

#[derive(Parser, Debug)]
#[command(
    name = "site2pdf",
    version,
    about = "Crawl a website and collect its readable text into a single PDF",
    long_about = "site2pdf starts at a URL, follows links on the same site up to a maximum depth, \
                  strips navigation and other page furniture, and writes the remaining text of \
                  every page into one PDF document."
)]
pub struct Cli {
    /// Website URL to start from (e.g., https://example.com)
    ///
    /// Prompted for when omitted
    pub url: Option<String>,

    /// Maximum crawl depth, 1-5
    ///
    /// Depth 1 = just the starting page
    /// Depth 2 = starting page + all pages it links to
    /// etc.
    #[arg(short, long)]
    pub depth: Option<String>,

    /// Output PDF file name (".pdf" is added if missing)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Stop after fetching this many pages
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Order in which pages are visited
    #[arg(long, value_enum, default_value_t = TraversalOrder::DepthFirst)]
    pub order: TraversalOrder,

    /// Which links count as "the same site"
    #[arg(long, value_enum, default_value_t = ScopeMatch::Authority)]
    pub scope: ScopeMatch,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// User-Agent header sent with every request
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Print the crawl report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

// The three values every run needs, after prompting
#[derive(Debug, Clone)]
pub struct RunInput {
    pub url: String,
    pub depth: String,
    pub output: String,
}

impl Cli {
    // Fills in anything that was not given on the command line by asking
    // the user. The banner and questions go to `out`, so --json can keep
    // them off stdout.
    pub fn resolve_input<W: Write>(&self, out: &mut W) -> Result<RunInput> {
        let interactive = self.url.is_none() || self.depth.is_none() || self.output.is_none();
        if interactive {
            writeln!(out, "Webpage to PDF Converter")?;
            writeln!(out, "-----------------------")?;
        }

        let stdin = io::stdin();
        let mut input = stdin.lock();

        let url = match &self.url {
            Some(url) => url.clone(),
            None => prompt(&mut input, out, "Enter the website URL: ")?,
        };
        let depth = match &self.depth {
            Some(depth) => depth.clone(),
            None => prompt(&mut input, out, "Enter maximum crawl depth (1-5): ")?,
        };
        let output = match &self.output {
            Some(output) => output.clone(),
            None => prompt(&mut input, out, "Enter output PDF filename: ")?,
        };

        Ok(RunInput { url, depth, output })
    }
}

// Prints a question and reads one line of answer (without the newline)
fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<String> {
    write!(output, "{}", question)?;
    output.flush()?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    if read == 0 {
        anyhow::bail!("no input available for: {}", question.trim_end_matches(": "));
    }

    Ok(line.trim().to_string())
}
