//! Output formatting and persistence for recomputed station views.
//!
//! Supports JSON printing, whole-snapshot CSV files, and CSV append for
//! time sweeps.

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::model::{StationView, TimeFilter};
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// One pass's output: the selection label plus every station view.
#[derive(Serialize)]
struct Snapshot<'a> {
    selected_time: &'a str,
    stations: &'a [StationView],
}

/// Prints a pass result as pretty JSON to stdout.
pub fn print_json(label: &str, views: &[StationView]) -> Result<()> {
    let snapshot = Snapshot {
        selected_time: label,
        stations: views,
    };
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", serde_json::to_string_pretty(&snapshot)?)?;
    Ok(())
}

/// Writes one pass's station views to a CSV file, replacing any prior
/// contents.
pub fn write_views_csv(path: &str, views: &[StationView]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for view in views {
        writer.serialize(view)?;
    }
    writer.flush()?;

    debug!(path, rows = views.len(), "Snapshot CSV written");
    Ok(())
}

/// A station view tagged with the selection it was computed under, for
/// sweep output where many passes share one file.
#[derive(Serialize)]
struct SweepRow<'a> {
    time_minutes: i32,
    key: &'a str,
    departures: usize,
    arrivals: usize,
    total_traffic: usize,
    radius: f64,
    flow_bucket: f64,
}

impl<'a> SweepRow<'a> {
    fn new(time_minutes: i32, view: &'a StationView) -> Self {
        Self {
            time_minutes,
            key: &view.key,
            departures: view.departures,
            arrivals: view.arrivals,
            total_traffic: view.total_traffic,
            radius: view.radius,
            flow_bucket: view.flow_bucket,
        }
    }
}

/// Appends one pass's rows to a sweep CSV.
///
/// Creates the file with headers if it does not already exist.
pub fn append_sweep_rows(path: &str, filter: TimeFilter, views: &[StationView]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending sweep rows");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    let time_minutes = match filter {
        TimeFilter::Any => -1,
        TimeFilter::At(m) => m as i32,
    };

    for view in views {
        writer.serialize(SweepRow::new(time_minutes, view))?;
    }
    writer.flush()?;

    Ok(())
}
