//! Summary command - mileage totals over a date range.

use chrono::NaiveDate;
use clap::Args;

use mileage_core::MileageSummary;

use super::{emit, parse_date, Context, OutputFormat};

/// Arguments for the summary command.
#[derive(Args)]
pub struct SummaryArgs {
    /// Earliest trip date (inclusive)
    #[arg(long, value_parser = parse_date)]
    start_date: Option<NaiveDate>,

    /// Latest trip date (inclusive)
    #[arg(long, value_parser = parse_date)]
    end_date: Option<NaiveDate>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub async fn run(args: SummaryArgs, ctx: &Context) -> anyhow::Result<()> {
    let session = ctx.open_session()?;
    let summary = session
        .service
        .summary(&session.user_id, args.start_date, args.end_date)?;

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&summary)?,
        OutputFormat::Csv => format_csv(&summary)?,
        OutputFormat::Text => format_text(&summary),
    };
    emit(&output, None)
}

fn format_csv(summary: &MileageSummary) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "total_miles",
        "business_miles",
        "personal_miles",
        "total_trips",
        "business_trips",
        "personal_trips",
        "avg_business_miles",
        "avg_personal_miles",
        "first_trip_date",
        "last_trip_date",
        "unresolved_gaps",
    ])?;
    wtr.write_record([
        &summary.total_miles.to_string(),
        &summary.business_miles.to_string(),
        &summary.personal_miles.to_string(),
        &summary.total_trips.to_string(),
        &summary.business_trips.to_string(),
        &summary.personal_trips.to_string(),
        &summary.avg_business_miles.to_string(),
        &summary.avg_personal_miles.to_string(),
        &summary.first_trip_date.map(|d| d.to_string()).unwrap_or_default(),
        &summary.last_trip_date.map(|d| d.to_string()).unwrap_or_default(),
        &summary.unresolved_gaps.to_string(),
    ])?;
    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(summary: &MileageSummary) -> String {
    let mut output = String::new();

    match (summary.first_trip_date, summary.last_trip_date) {
        (Some(first), Some(last)) => output.push_str(&format!("Trips from {} to {}\n\n", first, last)),
        _ => output.push_str("No trips recorded.\n\n"),
    }

    output.push_str(&format!(
        "Total:     {:>8} mi  {:>4} trips\n",
        summary.total_miles, summary.total_trips
    ));
    output.push_str(&format!(
        "Business:  {:>8} mi  {:>4} trips  avg {} mi\n",
        summary.business_miles, summary.business_trips, summary.avg_business_miles
    ));
    output.push_str(&format!(
        "Personal:  {:>8} mi  {:>4} trips  avg {} mi\n",
        summary.personal_miles, summary.personal_trips, summary.avg_personal_miles
    ));

    if summary.unresolved_gaps > 0 {
        output.push_str(&format!("\nUnresolved gaps: {}\n", summary.unresolved_gaps));
        for gap in &summary.gaps {
            output.push_str(&format!("  {}  ~{} mi/day\n", gap.date, gap.expected_miles));
        }
    }

    output
}
