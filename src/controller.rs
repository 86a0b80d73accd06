//! Recomputation driven by time-of-day selection changes.
//!
//! The controller owns the immutable `(stations, trips)` base data, the
//! current [`TimeFilter`] and the fixed radius scale. Each selection change
//! runs one synchronous pass: filter the full trip set, aggregate over the
//! full station set, re-apply the scales, emit fresh view models. Filters
//! never stack and nothing accumulates across passes.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::clock::format_time;
use crate::filter::filter_trips_by_time;
use crate::model::{Station, StationView, TimeFilter, Trip};
use crate::scale::{RadiusScale, flow_bucket, flow_ratio};
use crate::traffic::compute_station_traffic;

#[derive(Debug)]
pub struct Controller {
    stations: Vec<Station>,
    trips: Vec<Trip>,
    time_filter: TimeFilter,
    radius_scale: RadiusScale,
}

impl Controller {
    /// Builds a controller from fully loaded datasets.
    ///
    /// Runs one unfiltered aggregation pass to fix the radius scale domain;
    /// that domain is never recomputed afterwards.
    pub fn new(mut stations: Vec<Station>, trips: Vec<Trip>) -> Self {
        compute_station_traffic(&mut stations, &trips);
        let radius_scale = RadiusScale::from_stations(&stations);

        info!(
            stations = stations.len(),
            trips = trips.len(),
            "Controller ready"
        );

        Self {
            stations,
            trips,
            time_filter: TimeFilter::Any,
            radius_scale,
        }
    }

    pub fn time_filter(&self) -> TimeFilter {
        self.time_filter
    }

    /// Runs one recomputation pass for the given selection and returns the
    /// per-station view models.
    ///
    /// Views from a previous pass describe a stale filter state; callers
    /// should replace them wholesale.
    pub fn apply(&mut self, filter: TimeFilter) -> Vec<StationView> {
        self.time_filter = filter;

        let filtered = filter_trips_by_time(&self.trips, filter);
        debug!(
            filter = ?filter,
            matched = filtered.len(),
            total = self.trips.len(),
            "Trips filtered"
        );

        compute_station_traffic(&mut self.stations, filtered);

        self.stations
            .iter()
            .map(|station| {
                let ratio = flow_ratio(station.departures, station.total_traffic);
                StationView {
                    key: station.short_name.clone(),
                    name: station.name.clone(),
                    lon: station.lon,
                    lat: station.lat,
                    departures: station.departures,
                    arrivals: station.arrivals,
                    total_traffic: station.total_traffic,
                    radius: self.radius_scale.radius(station.total_traffic),
                    flow_bucket: flow_bucket(ratio),
                    tooltip_text: format!(
                        "{} trips ({} departures, {} arrivals)",
                        station.total_traffic, station.departures, station.arrivals
                    ),
                }
            })
            .collect()
    }

    /// Display string for the current selection: a short time for a filtered
    /// state, empty when unfiltered.
    pub fn selection_label(&self) -> String {
        match self.time_filter {
            TimeFilter::Any => String::new(),
            TimeFilter::At(minutes) => format_time(minutes),
        }
    }
}

/// Consumes selection events and runs one pass per batch, keeping only the
/// latest pending value when events arrive faster than passes complete.
///
/// Passes are synchronous, so at most one is ever in flight; coalescing just
/// avoids burning passes on selections the user has already scrubbed past.
/// Each pass's views and label are handed to `emit`.
pub async fn run_event_loop<F>(
    controller: &mut Controller,
    mut selections: mpsc::Receiver<TimeFilter>,
    mut emit: F,
) where
    F: FnMut(&str, Vec<StationView>),
{
    while let Some(mut selection) = selections.recv().await {
        // Drain anything that queued up behind this event.
        while let Ok(newer) = selections.try_recv() {
            selection = newer;
        }

        let views = controller.apply(selection);
        emit(&controller.selection_label(), views);
    }
}
