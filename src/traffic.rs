//! Per-station departure/arrival aggregation.

use std::collections::HashMap;

use crate::model::{Station, Trip};

/// Recomputes `departures`, `arrivals` and `total_traffic` for every station
/// from the given trips.
///
/// One pass over the trips builds two count tables keyed by station id, one
/// pass over the stations attaches the results, so the whole thing is
/// O(|trips| + |stations|). Stations with no matching trips get zeros; trips
/// referencing a station id absent from the dataset count toward nothing.
///
/// The derived fields are overwritten in place: values from a previous pass
/// are invalid once this returns.
pub fn compute_station_traffic<'t>(
    stations: &mut [Station],
    trips: impl IntoIterator<Item = &'t Trip>,
) {
    let mut departures: HashMap<&str, usize> = HashMap::new();
    let mut arrivals: HashMap<&str, usize> = HashMap::new();

    for trip in trips {
        *departures.entry(trip.start_station_id.as_str()).or_default() += 1;
        *arrivals.entry(trip.end_station_id.as_str()).or_default() += 1;
    }

    for station in stations {
        let id = station.short_name.as_str();
        station.departures = departures.get(id).copied().unwrap_or(0);
        station.arrivals = arrivals.get(id).copied().unwrap_or(0);
        station.total_traffic = station.departures + station.arrivals;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn station(short_name: &str) -> Station {
        Station {
            short_name: short_name.to_string(),
            name: format!("Station {}", short_name),
            lon: -71.09,
            lat: 42.36,
            arrivals: 0,
            departures: 0,
            total_traffic: 0,
        }
    }

    fn trip(start: &str, end: &str) -> Trip {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        Trip {
            start_station_id: start.to_string(),
            end_station_id: end.to_string(),
            started_at: day.and_hms_opt(8, 0, 0).unwrap(),
            ended_at: day.and_hms_opt(8, 10, 0).unwrap(),
        }
    }

    #[test]
    fn test_two_station_round_trip() {
        let mut stations = vec![station("A"), station("B")];
        let trips = vec![trip("A", "B"), trip("B", "A")];

        compute_station_traffic(&mut stations, &trips);

        for s in &stations {
            assert_eq!(s.departures, 1);
            assert_eq!(s.arrivals, 1);
            assert_eq!(s.total_traffic, 2);
        }
    }

    #[test]
    fn test_total_is_sum_of_parts() {
        let mut stations = vec![station("A"), station("B"), station("C")];
        let trips = vec![trip("A", "B"), trip("A", "C"), trip("B", "A")];

        compute_station_traffic(&mut stations, &trips);

        for s in &stations {
            assert_eq!(s.total_traffic, s.arrivals + s.departures);
        }
        assert_eq!(stations[0].departures, 2);
        assert_eq!(stations[0].arrivals, 1);
    }

    #[test]
    fn test_station_with_no_trips_gets_zeros() {
        let mut stations = vec![station("A"), station("Z")];
        let trips = vec![trip("A", "A")];

        compute_station_traffic(&mut stations, &trips);

        assert_eq!(stations[1].departures, 0);
        assert_eq!(stations[1].arrivals, 0);
        assert_eq!(stations[1].total_traffic, 0);
    }

    #[test]
    fn test_unknown_station_id_is_dropped() {
        let mut stations = vec![station("A")];
        let trips = vec![trip("A", "GHOST"), trip("GHOST", "A")];

        compute_station_traffic(&mut stations, &trips);

        assert_eq!(stations[0].departures, 1);
        assert_eq!(stations[0].arrivals, 1);
    }

    #[test]
    fn test_order_independent() {
        let trips = vec![trip("A", "B"), trip("B", "A"), trip("A", "B")];
        let shuffled = vec![trips[2].clone(), trips[0].clone(), trips[1].clone()];

        let mut first = vec![station("A"), station("B")];
        let mut second = vec![station("A"), station("B")];

        compute_station_traffic(&mut first, &trips);
        compute_station_traffic(&mut second, &shuffled);

        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.departures, b.departures);
            assert_eq!(a.arrivals, b.arrivals);
            assert_eq!(a.total_traffic, b.total_traffic);
        }
    }

    #[test]
    fn test_pass_overwrites_previous_counts() {
        let mut stations = vec![station("A"), station("B")];
        let trips = vec![trip("A", "B"), trip("B", "A")];

        compute_station_traffic(&mut stations, &trips);
        compute_station_traffic(&mut stations, std::iter::empty());

        for s in &stations {
            assert_eq!(s.total_traffic, 0);
        }
    }
}
