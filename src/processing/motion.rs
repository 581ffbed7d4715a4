//! Path length and average speed per vehicle

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::tracks::{by_vehicle, VehicleTrack, VehicleTracks};
use crate::core::Observation;
use crate::validation::error::TrackError;

/// Motion summary for one vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSpeed {
    pub vehicle_id: String,
    /// Grid units per second. `None` when several pings share a single
    /// timestamp, leaving no elapsed time to divide by.
    pub average_speed: Option<f64>,
    pub total_distance: f64,
    pub total_time: u64,
    pub ping_count: usize,
}

/// Average speeds in order of each vehicle's first appearance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AverageSpeeds {
    entries: Vec<VehicleSpeed>,
}

impl AverageSpeeds {
    pub fn get(&self, vehicle_id: &str) -> Option<&VehicleSpeed> {
        self.entries.iter().find(|entry| entry.vehicle_id == vehicle_id)
    }

    /// Shorthand for the speed value of one vehicle
    pub fn speed_of(&self, vehicle_id: &str) -> Option<f64> {
        self.get(vehicle_id).and_then(|entry| entry.average_speed)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VehicleSpeed> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a AverageSpeeds {
    type Item = &'a VehicleSpeed;
    type IntoIter = std::slice::Iter<'a, VehicleSpeed>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Sum of straight-line hops between consecutive pings
pub fn total_distance_traveled(track: &VehicleTrack) -> f64 {
    track.step_distances().sum()
}

/// Summarise one track
pub fn vehicle_speed(track: &VehicleTrack) -> VehicleSpeed {
    let total_distance = total_distance_traveled(track);
    let total_time = track.duration();

    let average_speed = if track.len() <= 1 {
        Some(0.0)
    } else if total_time == 0 {
        warn!(
            vehicle_id = track.vehicle_id(),
            pings = track.len(),
            "all pings share one timestamp, average speed undefined"
        );
        None
    } else {
        Some(total_distance / total_time as f64)
    };

    VehicleSpeed {
        vehicle_id: track.vehicle_id().to_string(),
        average_speed,
        total_distance,
        total_time,
        ping_count: track.len(),
    }
}

/// Average speeds for tracks that are already grouped
pub fn speeds_for_tracks(tracks: &VehicleTracks) -> AverageSpeeds {
    AverageSpeeds {
        entries: tracks.iter().map(vehicle_speed).collect(),
    }
}

/// Group observations by vehicle and compute each vehicle's average speed
pub fn average_speeds(observations: &[Observation]) -> Result<AverageSpeeds, TrackError> {
    let tracks = by_vehicle(observations)?;
    Ok(speeds_for_tracks(&tracks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Point;

    fn obs(vehicle: &str, x: f64, y: f64, t: i64) -> Observation {
        Observation::new(vehicle, Point::new(x, y), t)
    }

    fn vehicle_a() -> Vec<Observation> {
        [0.0, 1.0, 1.0, 1.0, 2.0, 4.0, 6.0, 8.0, 8.0, 8.0]
            .iter()
            .enumerate()
            .map(|(t, &y)| obs("A", 0.0, y, t as i64))
            .collect()
    }

    #[test]
    fn test_vehicle_a_fixture() {
        let speeds = average_speeds(&vehicle_a()).unwrap();
        let a = speeds.get("A").unwrap();
        assert_eq!(a.total_distance, 8.0);
        assert_eq!(a.total_time, 9);
        assert_eq!(a.ping_count, 10);
        assert_eq!(a.average_speed, Some(8.0 / 9.0));
    }

    #[test]
    fn test_single_ping_is_stationary() {
        let speeds = average_speeds(&[obs("M", 4.0, 4.0, 17)]).unwrap();
        assert_eq!(speeds.speed_of("M"), Some(0.0));
    }

    #[test]
    fn test_zero_duration_is_undefined() {
        let speeds = average_speeds(&[obs("Z", 0.0, 0.0, 3), obs("Z", 3.0, 4.0, 3)]).unwrap();
        let z = speeds.get("Z").unwrap();
        assert_eq!(z.average_speed, None);
        assert_eq!(z.total_distance, 5.0);
        assert_eq!(z.total_time, 0);
    }

    #[test]
    fn test_multiple_vehicles_keep_first_seen_order() {
        let mut observations = vec![obs("B", 0.0, 0.0, 0), obs("B", 0.0, 3.0, 2)];
        observations.extend(vehicle_a());
        let speeds = average_speeds(&observations).unwrap();

        let ids: Vec<_> = speeds.iter().map(|s| s.vehicle_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
        assert_eq!(speeds.speed_of("B"), Some(1.5));
        assert!(speeds.get("Q").is_none());
    }

    #[test]
    fn test_extreme_timestamps_give_finite_speed() {
        let speeds = average_speeds(&[obs("A", 0.0, 0.0, i64::MIN), obs("A", 0.0, 6.0, i64::MAX)]).unwrap();
        let a = speeds.get("A").unwrap();
        assert_eq!(a.total_time, u64::MAX);
        assert_eq!(a.average_speed, Some(6.0 / u64::MAX as f64));
    }

    #[test]
    fn test_unsorted_input_rejected() {
        let result = average_speeds(&[obs("A", 0.0, 0.0, 4), obs("A", 0.0, 1.0, 1)]);
        assert!(matches!(result, Err(TrackError::OutOfOrder { .. })));
    }

    #[test]
    fn test_serializes_as_list() {
        let speeds = average_speeds(&[obs("Z", 0.0, 0.0, 3), obs("Z", 1.0, 0.0, 3)]).unwrap();
        let json = serde_json::to_value(&speeds).unwrap();
        assert_eq!(json[0]["vehicle_id"], "Z");
        assert!(json[0]["average_speed"].is_null());
    }
}
