//! Visual scale mappings for the station markers.
//!
//! The radius scale is built once from the unfiltered dataset and reused for
//! every filter pass, so a marker's size stays comparable as the user scrubs
//! the time slider. Recomputing the domain per filter would silently rescale
//! everything; keeping it fixed is a deliberate choice, not an oversight.

use crate::model::Station;

/// Square-root scale from a traffic count to a marker radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusScale {
    domain_max: f64,
    range_min: f64,
    range_max: f64,
}

impl RadiusScale {
    pub const DEFAULT_RANGE: (f64, f64) = (2.0, 40.0);

    /// Builds the scale from the full station set, using the maximum
    /// `total_traffic` as the fixed domain upper bound.
    ///
    /// Call this after one unfiltered aggregation pass and keep the result
    /// for the lifetime of the dataset.
    pub fn from_stations(stations: &[Station]) -> Self {
        let domain_max = stations
            .iter()
            .map(|s| s.total_traffic)
            .max()
            .unwrap_or(0) as f64;

        Self {
            domain_max,
            range_min: Self::DEFAULT_RANGE.0,
            range_max: Self::DEFAULT_RANGE.1,
        }
    }

    /// Maps a traffic count to a radius in `[range_min, range_max]`.
    ///
    /// An empty domain (no traffic anywhere) maps every count to the range
    /// minimum.
    pub fn radius(&self, total_traffic: usize) -> f64 {
        if self.domain_max == 0.0 {
            return self.range_min;
        }

        let t = (total_traffic as f64 / self.domain_max).sqrt();
        self.range_min + (self.range_max - self.range_min) * t
    }
}

/// Departure share of a station's traffic, in `[0, 1]`.
///
/// A station with no traffic reports 0.5 so it renders as balanced rather
/// than dividing by zero.
pub fn flow_ratio(departures: usize, total_traffic: usize) -> f64 {
    if total_traffic == 0 {
        0.5
    } else {
        departures as f64 / total_traffic as f64
    }
}

/// Quantizes a flow ratio in `[0, 1]` into the three buckets `0.0`, `0.5`
/// and `1.0` (thirds of the domain), driving the categorical color blend.
pub fn flow_bucket(ratio: f64) -> f64 {
    if ratio < 1.0 / 3.0 {
        0.0
    } else if ratio < 2.0 / 3.0 {
        0.5
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station_with_traffic(total: usize) -> Station {
        Station {
            short_name: "A".to_string(),
            name: "A".to_string(),
            lon: 0.0,
            lat: 0.0,
            arrivals: 0,
            departures: 0,
            total_traffic: total,
        }
    }

    #[test]
    fn test_radius_endpoints() {
        let scale = RadiusScale::from_stations(&[station_with_traffic(100)]);
        assert_eq!(scale.radius(0), 2.0);
        assert_eq!(scale.radius(100), 40.0);
    }

    #[test]
    fn test_radius_is_sqrt_shaped() {
        let scale = RadiusScale::from_stations(&[station_with_traffic(100)]);
        // A quarter of the max traffic lands at half of the range span.
        let expected = 2.0 + (40.0 - 2.0) * 0.5;
        assert!((scale.radius(25) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_radius_empty_domain() {
        let scale = RadiusScale::from_stations(&[station_with_traffic(0)]);
        assert_eq!(scale.radius(0), 2.0);

        let no_stations = RadiusScale::from_stations(&[]);
        assert_eq!(no_stations.radius(7), 2.0);
    }

    #[test]
    fn test_flow_ratio_neutral_on_zero_traffic() {
        assert_eq!(flow_ratio(0, 0), 0.5);
    }

    #[test]
    fn test_flow_ratio() {
        assert_eq!(flow_ratio(3, 4), 0.75);
        assert_eq!(flow_ratio(0, 4), 0.0);
        assert_eq!(flow_ratio(4, 4), 1.0);
    }

    #[test]
    fn test_flow_bucket_thirds() {
        assert_eq!(flow_bucket(0.0), 0.0);
        assert_eq!(flow_bucket(0.33), 0.0);
        assert_eq!(flow_bucket(0.34), 0.5);
        assert_eq!(flow_bucket(0.5), 0.5);
        assert_eq!(flow_bucket(0.66), 0.5);
        assert_eq!(flow_bucket(0.67), 1.0);
        assert_eq!(flow_bucket(1.0), 1.0);
    }
}
