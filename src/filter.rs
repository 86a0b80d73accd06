//! Time-of-day filtering of trips.

use crate::clock::minutes_since_midnight;
use crate::model::{TimeFilter, Trip};

/// Half-width of the selection window, in minutes.
const WINDOW_MINUTES: i32 = 60;

/// Selects the trips whose start or end falls within 60 minutes of the
/// selected time of day.
///
/// With [`TimeFilter::Any`] every trip is selected. The window is measured
/// on a linear clock: there is no wraparound at midnight, so a trip starting
/// at 23:50 does not match a center of 00:05. That matches the upstream
/// slider semantics and is intentional.
///
/// The input is never mutated and the output preserves input order.
pub fn filter_trips_by_time<'t>(trips: &'t [Trip], filter: TimeFilter) -> Vec<&'t Trip> {
    let center = match filter {
        TimeFilter::Any => return trips.iter().collect(),
        TimeFilter::At(m) => m as i32,
    };

    trips
        .iter()
        .filter(|trip| {
            let started = minutes_since_midnight(&trip.started_at) as i32;
            let ended = minutes_since_midnight(&trip.ended_at) as i32;

            (started - center).abs() <= WINDOW_MINUTES || (ended - center).abs() <= WINDOW_MINUTES
        })
        .collect()
}
