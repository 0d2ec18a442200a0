//! Gaps command - detect, list and resolve mileage gaps.

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use console::style;

use mileage_core::models::trip::RecordId;
use mileage_core::{Gap, GapFilter, GapResolution};

use super::{emit, parse_date, Context, OutputFormat};

/// Arguments for the gaps command.
#[derive(Args)]
pub struct GapsArgs {
    #[command(subcommand)]
    command: GapsCommand,
}

#[derive(Subcommand)]
enum GapsCommand {
    /// Scan business trips for undocumented days and store the gaps found
    Detect {
        /// Print the detection report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List stored gaps, newest first
    List(ListArgs),

    /// Mark a gap as reviewed
    Resolve {
        /// Gap id
        id: RecordId,

        /// Miles actually driven during the gap
        #[arg(long)]
        actual_miles: Option<u32>,

        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Args)]
struct ListArgs {
    /// Only unresolved gaps
    #[arg(long, conflicts_with = "resolved")]
    unresolved: bool,

    /// Only resolved gaps
    #[arg(long)]
    resolved: bool,

    #[arg(long, value_parser = parse_date)]
    start_date: Option<NaiveDate>,

    #[arg(long, value_parser = parse_date)]
    end_date: Option<NaiveDate>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub async fn run(args: GapsArgs, ctx: &Context) -> anyhow::Result<()> {
    let session = ctx.open_session()?;
    let service = &session.service;
    let user = session.user_id.as_str();

    match args.command {
        GapsCommand::Detect { json } => {
            let report = service.detect_gaps(user)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "{} Gap detection completed: {} gaps found",
                    style("✓").green(),
                    report.gaps_detected()
                );
                for gap in &report.gaps {
                    println!("  {}  ~{} mi/day", gap.date, gap.expected_miles);
                }
                if report.skipped_known > 0 {
                    println!(
                        "{} {} gaps skipped, already recorded for those dates",
                        style("ℹ").blue(),
                        report.skipped_known
                    );
                }
            }

            if let Some(error) = &report.persist_error {
                eprintln!(
                    "{} Gaps were detected but the store reported an error: {}",
                    style("⚠").yellow(),
                    error
                );
            }
        }
        GapsCommand::List(list) => {
            let resolved = match (list.unresolved, list.resolved) {
                (true, _) => Some(false),
                (_, true) => Some(true),
                _ => None,
            };
            let filter = GapFilter {
                resolved,
                start_date: list.start_date,
                end_date: list.end_date,
            };
            let gaps = service.list_gaps(user, &filter)?;
            emit(&format_gaps(&gaps, list.format)?, None)?;
        }
        GapsCommand::Resolve {
            id,
            actual_miles,
            notes,
        } => {
            let gap = service.resolve_gap(user, id, &GapResolution { actual_miles, notes })?;
            println!(
                "{} Resolved gap {} on {} ({} actual miles)",
                style("✓").green(),
                gap.id,
                gap.date,
                gap.actual_miles
            );
        }
    }

    Ok(())
}

fn format_gaps(gaps: &[Gap], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(gaps)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(["id", "date", "expected_miles", "actual_miles", "resolved", "notes"])?;
            for g in gaps {
                wtr.write_record([
                    &g.id.to_string(),
                    &g.date.to_string(),
                    &g.expected_miles.to_string(),
                    &g.actual_miles.to_string(),
                    &g.resolved.to_string(),
                    &g.notes.clone().unwrap_or_default(),
                ])?;
            }
            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
        OutputFormat::Text => {
            if gaps.is_empty() {
                return Ok("No gaps found.".to_string());
            }
            let mut output = String::new();
            for g in gaps {
                let status = if g.resolved {
                    format!("resolved, {} mi", g.actual_miles)
                } else {
                    "open".to_string()
                };
                output.push_str(&format!(
                    "{:>5}  {}  ~{} mi/day  {}\n",
                    g.id, g.date, g.expected_miles, status
                ));
            }
            Ok(output)
        }
    }
}
