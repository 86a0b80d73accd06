//! Parsers for the two input datasets: a GBFS-style station information
//! JSON document and a trip history CSV export.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::io::Read;
use tracing::{info, warn};

use crate::model::{Station, Trip};

/// `station_information.json` wraps the station list two levels deep.
#[derive(Deserialize)]
struct StationFeed {
    data: StationFeedData,
}

#[derive(Deserialize)]
struct StationFeedData {
    stations: Vec<Station>,
}

/// Parses a station information document.
///
/// # Errors
///
/// Returns an error if the document is not valid JSON or any station is
/// missing a required field; a partially usable station list is never
/// returned.
pub fn parse_stations(bytes: &[u8]) -> Result<Vec<Station>> {
    let feed: StationFeed =
        serde_json::from_slice(bytes).context("invalid station information JSON")?;

    info!(stations = feed.data.stations.len(), "Stations parsed");
    Ok(feed.data.stations)
}

/// Raw trip row as exported; timestamps stay strings until validated.
#[derive(Debug, Deserialize)]
struct TripRecord {
    start_station_id: String,
    end_station_id: String,
    started_at: String,
    ended_at: String,
}

/// Timestamp layouts seen in trip exports: space or `T` separated, with or
/// without fractional seconds.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw.trim(), fmt).ok())
}

/// Parses a trip history CSV.
///
/// Rows with an unparseable timestamp are skipped with a warning rather than
/// failing the load; they are excluded from every downstream computation,
/// including the radius scale domain. Structural CSV errors (bad headers,
/// wrong field count) are fatal.
pub fn parse_trips<R: Read>(reader: R) -> Result<Vec<Trip>> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let mut trips = Vec::new();
    let mut skipped = 0usize;

    for (row, result) in csv_reader.deserialize().enumerate() {
        let record: TripRecord = result.with_context(|| format!("trip CSV row {}", row + 1))?;

        let (Some(started_at), Some(ended_at)) = (
            parse_timestamp(&record.started_at),
            parse_timestamp(&record.ended_at),
        ) else {
            warn!(
                row = row + 1,
                started_at = %record.started_at,
                ended_at = %record.ended_at,
                "Skipping trip with unparseable timestamp"
            );
            skipped += 1;
            continue;
        };

        trips.push(Trip {
            start_station_id: record.start_station_id,
            end_station_id: record.end_station_id,
            started_at,
            ended_at,
        });
    }

    info!(trips = trips.len(), skipped, "Trips parsed");
    Ok(trips)
}
