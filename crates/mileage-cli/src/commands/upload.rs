//! Upload command - run the upload pipeline over one or more documents.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, warn};

use mileage_core::UploadReport;

use super::Context;

/// Arguments for the upload command.
#[derive(Args)]
pub struct UploadArgs {
    /// Input file or glob pattern
    #[arg(required = true)]
    input: String,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Print the full upload reports as JSON
    #[arg(long)]
    json: bool,
}

/// Result of uploading a single file.
struct FileResult {
    path: PathBuf,
    report: Option<UploadReport>,
    error: Option<String>,
}

pub async fn run(args: UploadArgs, ctx: &Context) -> anyhow::Result<()> {
    let start = Instant::now();
    let session = ctx.open_session()?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document")
            .to_string();

        let outcome = match tokio::fs::read(&path).await {
            Ok(data) => session
                .service
                .upload_document(&session.user_id, &filename, &data)
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match outcome {
            Ok(report) => {
                if let Some(persist_error) = &report.persist_error {
                    warn!("Store error while saving {}: {}", path.display(), persist_error);
                }
                results.push(FileResult {
                    path,
                    report: Some(report),
                    error: None,
                });
            }
            Err(error_msg) => {
                if args.continue_on_error {
                    warn!("Failed to upload {}: {}", path.display(), error_msg);
                    results.push(FileResult {
                        path,
                        report: None,
                        error: Some(error_msg),
                    });
                } else {
                    pb.abandon();
                    error!("Failed to upload {}: {}", path.display(), error_msg);
                    anyhow::bail!("Upload failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    if args.json {
        let reports: Vec<&UploadReport> = results.iter().filter_map(|r| r.report.as_ref()).collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print_results(&results);
    }

    let failed = results.iter().filter(|r| r.error.is_some()).count();
    let stored: usize = results
        .iter()
        .filter_map(|r| r.report.as_ref())
        .map(|r| r.stored_trips.len())
        .sum();

    eprintln!();
    eprintln!(
        "{} Uploaded {} files in {:?}: {} trips stored, {} failed",
        style("✓").green(),
        results.len() - failed,
        start.elapsed(),
        stored,
        failed
    );

    Ok(())
}

fn print_results(results: &[FileResult]) {
    for result in results {
        let name = result.path.display();
        match (&result.report, &result.error) {
            (Some(report), _) => {
                let marker = if report.fallback_used {
                    style("⚠").yellow()
                } else {
                    style("✓").green()
                };
                println!(
                    "{} {} (upload {}): {} trips extracted, {} stored",
                    marker,
                    name,
                    report.upload.id,
                    report.candidates.len(),
                    report.stored_trips.len()
                );
                if report.fallback_used {
                    println!("    no readings recognized, stored a placeholder trip");
                }
            }
            (None, Some(error)) => {
                println!("{} {}: {}", style("✗").red(), name, error);
            }
            (None, None) => {}
        }
    }
}
