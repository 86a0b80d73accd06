//! Core data types for the station traffic pipeline.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A bike-share station with its fixed identity and per-pass traffic counts.
///
/// `short_name`, `name`, `lon`, `lat` come from the station dataset and are
/// never modified after load. `arrivals`, `departures` and `total_traffic`
/// are a cache: overwritten by every aggregation pass and only valid until
/// the next one.
#[derive(Debug, Clone, Deserialize)]
pub struct Station {
    pub short_name: String,
    pub name: String,
    #[serde(deserialize_with = "deserialize_coord")]
    pub lon: f64,
    #[serde(deserialize_with = "deserialize_coord")]
    pub lat: f64,

    #[serde(skip)]
    pub arrivals: usize,
    #[serde(skip)]
    pub departures: usize,
    #[serde(skip)]
    pub total_traffic: usize,
}

/// Station feeds publish coordinates as either JSON numbers or strings.
fn deserialize_coord<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Coord {
        Num(f64),
        Text(String),
    }

    match Coord::deserialize(deserializer)? {
        Coord::Num(v) => Ok(v),
        Coord::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// A single ride between two stations. Immutable after load.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub start_station_id: String,
    pub end_station_id: String,
    pub started_at: NaiveDateTime,
    pub ended_at: NaiveDateTime,
}

/// The current time-of-day selection.
///
/// `Any` means no filtering; `At(m)` is a minutes-since-midnight center in
/// `[0, 1440)`. External inputs use `-1` as the "any time" sentinel, which
/// is converted at the edge via [`TimeFilter::from_slider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFilter {
    #[default]
    Any,
    At(u16),
}

impl TimeFilter {
    /// Converts a raw slider value (`-1` = any time) into a filter.
    ///
    /// Returns `None` for values outside `-1..1440`.
    pub fn from_slider(value: i32) -> Option<Self> {
        match value {
            -1 => Some(TimeFilter::Any),
            0..=1439 => Some(TimeFilter::At(value as u16)),
            _ => None,
        }
    }
}

/// Per-station output of a recomputation pass, consumed by a renderer.
#[derive(Debug, Clone, Serialize)]
pub struct StationView {
    pub key: String,
    pub name: String,
    pub lon: f64,
    pub lat: f64,
    pub departures: usize,
    pub arrivals: usize,
    pub total_traffic: usize,
    pub radius: f64,
    pub flow_bucket: f64,
    pub tooltip_text: String,
}
