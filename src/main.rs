// src/main.rs
// =============================================================================
// This is the entry point of the `mirror` CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Validate the page URL (usage errors touch neither network nor disk)
// 3. Run the mirroring engine from the library
// 4. Print the report and exit with the proper code
//    (0 = everything saved, 1 = some resources failed, 2 = usage/fatal error)
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use cli::Cli;

use page_mirror::fetch::{ResourceOutcome, ResourceStatus};
use page_mirror::{logging, mirror_page, HttpFetcher, MirrorError, MirrorReport};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole error chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse_from(cli::normalize_args(std::env::args_os()));

    let page_url = match cli.page_url() {
        Ok(Some(url)) => url,
        Ok(None) => {
            println!("URL flag has not been set\n");
            print_usage()?;
            return Ok(2);
        }
        Err(e) => {
            println!("{}\n", invalid_url_message(&e));
            print_usage()?;
            return Ok(2);
        }
    };

    logging::init_logging();

    let config = cli.config();
    let fetcher = HttpFetcher::new(config.timeout).context("failed to create HTTP client")?;

    let report = mirror_page(&fetcher, &page_url, &config)
        .await
        .with_context(|| format!("failed to save page at {}", page_url))?;

    print_report(&report, cli.json)?;

    if report.failed_count() > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

// "Invalid URL: <value> (<reason>)", printed above the usage text
fn invalid_url_message(error: &MirrorError) -> String {
    match error {
        MirrorError::InvalidUrl { url, source } => format!("Invalid URL: {} ({})", url, source),
        MirrorError::MissingHost(url) => format!("Invalid URL: {} (no host)", url),
        other => format!("Invalid URL: {}", other),
    }
}

fn print_usage() -> Result<()> {
    Cli::command().print_help()?;
    Ok(())
}

// Prints the report either as a table or JSON
fn print_report(report: &MirrorReport, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
    } else {
        print_table(report);
    }
    Ok(())
}

fn print_table(report: &MirrorReport) {
    if !report.resources.is_empty() {
        println!("{:<30} {:<12} {:<60}", "FILE", "STATUS", "URL");
        println!("{}", "=".repeat(102));

        for outcome in &report.resources {
            println!(
                "{:<30} {:<12} {:<60}",
                truncate(&outcome.file_name, 30),
                format_status(outcome),
                truncate(&outcome.url, 60)
            );
        }
        println!();
    }

    for failed in report.failures() {
        if let ResourceStatus::Failed { reason } = &failed.status {
            println!("❌ {}: {}", failed.url, reason);
        }
    }

    println!("📄 Page: {}", report.page_file.display());
    println!("📁 Resources: {}", report.resource_dir.display());
    println!("📊 Summary:");
    println!("   ✅ Saved: {}", report.saved_count());
    println!("   ❌ Failed: {}", report.failed_count());
    println!("   📋 Total: {}", report.resources.len());
}

fn format_status(outcome: &ResourceOutcome) -> String {
    match &outcome.status {
        ResourceStatus::Saved { bytes } => format!("✅ {} B", bytes),
        ResourceStatus::Failed { .. } => "❌ FAILED".to_string(),
    }
}

// Cuts on a char boundary so multi-byte names don't panic
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}
