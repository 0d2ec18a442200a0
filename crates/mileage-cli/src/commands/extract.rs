//! Extract command - pull trip candidates out of a single document.

use std::path::PathBuf;
use std::time::Instant;

use chrono::NaiveDate;
use clap::Args;
use console::style;
use tracing::{debug, info};

use mileage_core::extract::ExtractionResult;
use mileage_core::models::trip::TripCandidate;
use mileage_core::{Clock, DocumentKind, DocumentLoader, SystemClock, TextLoader, TripExtractor};

use super::{emit, parse_date, Context, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF or text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Date used for readings without one (YYYY-MM-DD, default: today)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
}

pub async fn run(args: ExtractArgs, ctx: &Context) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = ctx.load_config()?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let filename = args.input.to_string_lossy();
    let kind = DocumentKind::from_filename(&filename)?;

    let data = tokio::fs::read(&args.input).await?;
    let size = data.len() as u64;
    if size > config.upload.max_file_size {
        anyhow::bail!(
            "{} is {} bytes, limit is {} bytes",
            args.input.display(),
            size,
            config.upload.max_file_size
        );
    }

    info!("Extracting trips from {}", args.input.display());
    let text = TextLoader.load_text(kind, &data)?;

    let today = args.date.unwrap_or_else(|| SystemClock.today());
    let result = TripExtractor::new().parse(&text, today);

    report_warnings(&result);

    let output = format_candidates(&result.candidates, args.format)?;
    emit(&output, args.output.as_deref())?;

    debug!(
        "Extraction took {}ms, total {:?}",
        result.processing_time_ms,
        start.elapsed()
    );

    Ok(())
}

fn report_warnings(result: &ExtractionResult) {
    if result.fallback_used {
        eprintln!(
            "{} No mileage readings recognized; the result is a placeholder trip.",
            style("⚠").yellow()
        );
    }
    if result.rejected > 0 {
        eprintln!(
            "{} Ignored {} readings where the end mileage was not above the start.",
            style("ℹ").blue(),
            result.rejected
        );
    }
}

pub fn format_candidates(candidates: &[TripCandidate], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(candidates)?),
        OutputFormat::Csv => format_csv(candidates),
        OutputFormat::Text => Ok(format_text(candidates)),
    }
}

fn format_csv(candidates: &[TripCandidate]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "date",
        "start_mileage",
        "end_mileage",
        "miles",
        "business",
        "source",
        "location",
        "notes",
    ])?;

    for c in candidates {
        wtr.write_record([
            &c.date.to_string(),
            &c.start_mileage.to_string(),
            &c.end_mileage.to_string(),
            &c.miles().to_string(),
            &c.business.to_string(),
            &c.source.as_str().to_string(),
            &c.location,
            &c.notes,
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(candidates: &[TripCandidate]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Trips found: {}\n", candidates.len()));
    for c in candidates {
        output.push_str(&format!(
            "  {}  {:>8} -> {:<8} {:>6} mi  [{}]\n",
            c.date,
            c.start_mileage,
            c.end_mileage,
            c.miles(),
            c.source.as_str()
        ));
        if !c.matched_text.is_empty() {
            output.push_str(&format!("      matched: {:?}\n", c.matched_text));
        }
    }

    output
}
