//! Trips command - add, list, show, update and delete trips.

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use console::style;

use mileage_core::models::trip::RecordId;
use mileage_core::{NewTrip, SortOrder, Trip, TripFilter, TripUpdate};

use super::{emit, parse_date, Context, OutputFormat};

/// Arguments for the trips command.
#[derive(Args)]
pub struct TripsArgs {
    #[command(subcommand)]
    command: TripsCommand,
}

#[derive(Subcommand)]
enum TripsCommand {
    /// Record a trip
    Add(AddArgs),

    /// List trips, newest first
    List(ListArgs),

    /// Show one trip
    Show {
        /// Trip id
        id: RecordId,
    },

    /// Change fields of a trip
    Update(UpdateArgs),

    /// Delete a trip
    Delete {
        /// Trip id
        id: RecordId,
    },
}

#[derive(Args)]
struct AddArgs {
    /// Odometer reading at the start
    #[arg(long)]
    start: u32,

    /// Odometer reading at the end
    #[arg(long)]
    end: u32,

    /// Trip date (YYYY-MM-DD, default: today)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// Mark the trip as personal
    #[arg(long)]
    personal: bool,

    #[arg(long)]
    location: Option<String>,

    #[arg(long)]
    notes: Option<String>,
}

#[derive(Args)]
struct ListArgs {
    /// Only business trips
    #[arg(long, conflicts_with = "personal")]
    business: bool,

    /// Only personal trips
    #[arg(long)]
    personal: bool,

    /// Earliest trip date (inclusive)
    #[arg(long, value_parser = parse_date)]
    start_date: Option<NaiveDate>,

    /// Latest trip date (inclusive)
    #[arg(long, value_parser = parse_date)]
    end_date: Option<NaiveDate>,

    /// Oldest first
    #[arg(long)]
    ascending: bool,

    /// Page number, starting at 1
    #[arg(long, default_value = "1")]
    page: usize,

    /// Trips per page
    #[arg(long, default_value_t = mileage_core::store::DEFAULT_PAGE_LIMIT)]
    limit: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Args)]
struct UpdateArgs {
    /// Trip id
    id: RecordId,

    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    #[arg(long)]
    start: Option<u32>,

    #[arg(long)]
    end: Option<u32>,

    /// Business (true) or personal (false)
    #[arg(long)]
    business: Option<bool>,

    #[arg(long)]
    location: Option<String>,

    #[arg(long)]
    notes: Option<String>,
}

pub async fn run(args: TripsArgs, ctx: &Context) -> anyhow::Result<()> {
    let session = ctx.open_session()?;
    let service = &session.service;
    let user = session.user_id.as_str();

    match args.command {
        TripsCommand::Add(add) => {
            let date = add.date.unwrap_or_else(|| service.today());
            let mut trip = NewTrip::new(user, date, add.start, add.end).with_business(!add.personal);
            if let Some(location) = add.location {
                trip = trip.with_location(location);
            }
            if let Some(notes) = add.notes {
                trip = trip.with_notes(notes);
            }

            let trip = service.create_trip(trip)?;
            println!(
                "{} Added trip {} ({} miles on {})",
                style("✓").green(),
                trip.id,
                trip.miles(),
                trip.date
            );
        }
        TripsCommand::List(list) => {
            let business = match (list.business, list.personal) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let filter = TripFilter {
                business,
                start_date: list.start_date,
                end_date: list.end_date,
                order: if list.ascending {
                    SortOrder::Ascending
                } else {
                    SortOrder::Descending
                },
                page: list.page,
                limit: Some(list.limit),
            };

            let trips = service.list_trips(user, &filter)?;
            emit(&format_trips(&trips, list.format)?, None)?;
        }
        TripsCommand::Show { id } => {
            let trip = service.get_trip(user, id)?;
            println!("{}", serde_json::to_string_pretty(&trip)?);
        }
        TripsCommand::Update(update) => {
            let changes = TripUpdate {
                date: update.date,
                start_mileage: update.start,
                end_mileage: update.end,
                business: update.business,
                location: update.location,
                notes: update.notes,
            };
            let trip = service.update_trip(user, update.id, &changes)?;
            println!("{} Updated trip {}", style("✓").green(), trip.id);
            println!("{}", serde_json::to_string_pretty(&trip)?);
        }
        TripsCommand::Delete { id } => {
            service.delete_trip(user, id)?;
            println!("{} Deleted trip {}", style("✓").green(), id);
        }
    }

    Ok(())
}

fn format_trips(trips: &[Trip], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(trips)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record([
                "id",
                "date",
                "start_mileage",
                "end_mileage",
                "miles",
                "business",
                "location",
                "notes",
            ])?;
            for t in trips {
                wtr.write_record([
                    &t.id.to_string(),
                    &t.date.to_string(),
                    &t.start_mileage.to_string(),
                    &t.end_mileage.to_string(),
                    &t.miles().to_string(),
                    &t.business.to_string(),
                    &t.location.clone().unwrap_or_default(),
                    &t.notes.clone().unwrap_or_default(),
                ])?;
            }
            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
        OutputFormat::Text => {
            if trips.is_empty() {
                return Ok("No trips found.".to_string());
            }
            let mut output = String::new();
            for t in trips {
                output.push_str(&format!(
                    "{:>5}  {}  {:>8} -> {:<8} {:>6} mi  {}{}\n",
                    t.id,
                    t.date,
                    t.start_mileage,
                    t.end_mileage,
                    t.miles(),
                    if t.business { "business" } else { "personal" },
                    t.location
                        .as_deref()
                        .map(|l| format!("  {}", l))
                        .unwrap_or_default()
                ));
            }
            Ok(output)
        }
    }
}
