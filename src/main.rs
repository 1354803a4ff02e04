// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing, filtered by RUST_LOG, default "info")
// 2. Parse command-line arguments, prompting for anything missing
// 3. Validate the input before any network activity
// 4. Crawl the site, feeding every page into the PDF document
// 5. Save the PDF and print a summary
// 6. Exit with a code that tells scripts what happened
//
// Exit codes:
//   0 = PDF written
//   1 = crawl depth outside 1-5
//   2 = other invalid input (non-numeric depth, bad URL)
//   3 = the PDF could not be saved
//   4 = any other error
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;      // src/cli.rs - command-line parsing and prompts
mod config;   // src/config.rs - run settings and input validation
mod crawl;    // src/crawl/ - fetching pages and following links
mod document; // src/document/ - the PDF output
mod extract;  // src/extract/ - HTML -> readable paragraphs

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use config::{CrawlConfig, InputError};
use crawl::{CrawlReport, Crawler};
use document::{DocumentSink, PdfDocument};
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const EXIT_OK: i32 = 0;
const EXIT_DEPTH_OUT_OF_RANGE: i32 = 1;
const EXIT_INVALID_INPUT: i32 = 2;
const EXIT_SAVE_FAILED: i32 = 3;
const EXIT_ERROR: i32 = 4;

#[tokio::main]
async fn main() {
    init_logging();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            error!("An error occurred: {:#}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// This is the main application logic
// Returns the process exit code
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    // With --json, stdout carries the report and nothing else
    let input = if cli.json {
        cli.resolve_input(&mut io::stderr())?
    } else {
        cli.resolve_input(&mut io::stdout())?
    };

    let config = match build_config(&cli, &input.url, &input.depth) {
        Ok(config) => config,
        Err(e) => {
            error!("Error: {}", e);
            return Ok(exit_code_for(&e));
        }
    };
    let output = config::resolve_output_path(&input.output);

    if cli.json {
        info!(url = %config.base_url, max_depth = config.max_depth, "Crawling website");
    } else {
        println!("🔍 Crawling website: {}", config.base_url);
        println!("📊 Max crawl depth: {}", config.max_depth);
    }

    let crawler = Crawler::new(config)?;
    let mut pdf = PdfDocument::new();
    let report = crawler.run(&mut pdf).await;

    let saved = save(&mut pdf, &output);

    if cli.json {
        write_json(&mut io::stdout().lock(), &report)?;
    } else {
        if saved {
            println!("✅ PDF saved successfully as {}", output.display());
        }
        print_summary(&report, pdf.page_count());
    }

    if saved {
        Ok(EXIT_OK)
    } else {
        Ok(EXIT_SAVE_FAILED)
    }
}

fn build_config(cli: &Cli, url: &str, depth: &str) -> Result<CrawlConfig, InputError> {
    let depth = config::parse_depth(depth)?;

    let mut config = CrawlConfig::new(url, depth)?
        .with_max_pages(cli.max_pages)
        .with_order(cli.order)
        .with_scope(cli.scope)
        .with_timeout(Duration::from_secs(cli.timeout));
    if let Some(user_agent) = &cli.user_agent {
        config = config.with_user_agent(user_agent.clone());
    }

    Ok(config)
}

fn exit_code_for(err: &InputError) -> i32 {
    match err {
        InputError::DepthOutOfRange(_) => EXIT_DEPTH_OUT_OF_RANGE,
        _ => EXIT_INVALID_INPUT,
    }
}

// Writes the PDF; a failure is logged and no file is left behind
fn save(pdf: &mut PdfDocument, output: &Path) -> bool {
    match pdf.serialize(output) {
        Ok(()) => {
            info!(path = %output.display(), "PDF saved successfully");
            true
        }
        Err(e) => {
            error!(path = %output.display(), error = %e, "Error saving PDF");
            false
        }
    }
}

// The whole report as one JSON document, and nothing else
fn write_json<W: Write>(out: &mut W, report: &CrawlReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

fn print_summary(report: &CrawlReport, pages_in_pdf: usize) {
    println!();
    println!("📊 Summary:");
    println!("   ✅ Added: {}", report.added());
    println!("   ❌ Failed: {}", report.failed());
    println!("   🌐 Fetched: {}", report.fetched());
    println!("   📄 PDF pages: {}", pages_in_pdf.max(1));
    if report.truncated {
        println!("   ⚠️  Stopped early: page limit reached");
    }
}
