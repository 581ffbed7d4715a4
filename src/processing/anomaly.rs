//! Heuristic damage detection
//!
//! Two independent scans over chronological tracks:
//! - abrupt motion: a jump of at least `accel_threshold` between consecutive
//!   step distances within one vehicle's track,
//! - proximity: two vehicles within `collision_distance` of each other at
//!   timestamps no more than `time_tolerance` apart.
//!
//! The union of both scans is the set of vehicles to inspect.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::tracks::{VehicleTrack, VehicleTracks};
use crate::core::{distance, ACCEL_THRESHOLD, COLLISION_DISTANCE, TIME_TOLERANCE};
use crate::validation::error::ConfigError;

/// Detector thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Minimum change between consecutive step distances (grid units)
    pub accel_threshold: f64,
    /// Maximum separation counted as a collision (grid units)
    pub collision_distance: f64,
    /// Maximum timestamp gap for a proximity comparison (seconds)
    pub time_tolerance: i64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            accel_threshold: ACCEL_THRESHOLD,
            collision_distance: COLLISION_DISTANCE,
            time_tolerance: TIME_TOLERANCE,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.accel_threshold.is_finite() || self.accel_threshold < 0.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "accel_threshold".to_string(),
                value: self.accel_threshold.to_string(),
                reason: "must be a finite, non-negative distance".to_string(),
            });
        }
        if !self.collision_distance.is_finite() || self.collision_distance < 0.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "collision_distance".to_string(),
                value: self.collision_distance.to_string(),
                reason: "must be a finite, non-negative distance".to_string(),
            });
        }
        if self.time_tolerance < 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "time_tolerance".to_string(),
                value: self.time_tolerance.to_string(),
                reason: "must be non-negative".to_string(),
            });
        }
        Ok(())
    }
}

/// Why a vehicle was flagged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// Step distance changed sharply around observation `index`
    AbruptMotion {
        vehicle_id: String,
        index: usize,
        timestamp: i64,
        delta: f64,
    },
    /// Two vehicles came within collision distance
    Proximity {
        first: String,
        second: String,
        first_timestamp: i64,
        second_timestamp: i64,
        distance: f64,
    },
}

impl Finding {
    /// Whether this finding implicates `vehicle_id`
    pub fn involves(&self, vehicle_id: &str) -> bool {
        match self {
            Finding::AbruptMotion { vehicle_id: v, .. } => v == vehicle_id,
            Finding::Proximity { first, second, .. } => first == vehicle_id || second == vehicle_id,
        }
    }
}

/// Outcome of a detection run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageReport {
    pub flagged: BTreeSet<String>,
    pub findings: Vec<Finding>,
}

impl DamageReport {
    pub fn is_flagged(&self, vehicle_id: &str) -> bool {
        self.flagged.contains(vehicle_id)
    }

    /// Findings that implicate one vehicle
    pub fn findings_for<'a>(&'a self, vehicle_id: &'a str) -> impl Iterator<Item = &'a Finding> + 'a {
        self.findings.iter().filter(move |f| f.involves(vehicle_id))
    }

    fn record(&mut self, finding: Finding) {
        match &finding {
            Finding::AbruptMotion { vehicle_id, .. } => {
                self.flagged.insert(vehicle_id.clone());
            }
            Finding::Proximity { first, second, .. } => {
                self.flagged.insert(first.clone());
                self.flagged.insert(second.clone());
            }
        }
        self.findings.push(finding);
    }
}

/// Damage detector with fixed thresholds
#[derive(Debug, Clone, Default)]
pub struct AnomalyDetector {
    config: DetectorConfig,
}

impl AnomalyDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Run both passes over every track
    pub fn detect(&self, tracks: &VehicleTracks) -> DamageReport {
        let mut report = DamageReport::default();

        for track in tracks {
            if let Some(finding) = self.abrupt_motion(track) {
                report.record(finding);
            }
        }

        let all: Vec<&VehicleTrack> = tracks.iter().collect();
        for (n, first) in all.iter().enumerate() {
            for second in &all[n + 1..] {
                // Equal timestamps advance the first pointer, so sweep both ways
                let mut events = self.proximity_events(first, second);
                for event in self.proximity_events(second, first) {
                    if !events.iter().any(|e| same_encounter(e, &event)) {
                        events.push(event);
                    }
                }
                for event in events {
                    report.record(event);
                }
            }
        }

        info!(
            vehicles = tracks.len(),
            flagged = report.flagged.len(),
            findings = report.findings.len(),
            "damage detection complete"
        );
        report
    }

    /// First abrupt change in step distance, if any
    pub fn abrupt_motion(&self, track: &VehicleTrack) -> Option<Finding> {
        let steps: Vec<f64> = track.step_distances().collect();
        steps.windows(2).enumerate().find_map(|(k, pair)| {
            let delta = (pair[1] - pair[0]).abs();
            if delta >= self.config.accel_threshold {
                let index = k + 2;
                let timestamp = track.observations()[index].timestamp;
                debug!(vehicle_id = track.vehicle_id(), index, delta, "abrupt motion");
                Some(Finding::AbruptMotion {
                    vehicle_id: track.vehicle_id().to_string(),
                    index,
                    timestamp,
                    delta,
                })
            } else {
                None
            }
        })
    }

    /// Two-pointer sweep over two tracks, advancing on earlier-or-equal timestamps of `first`
    pub fn proximity_events(&self, first: &VehicleTrack, second: &VehicleTrack) -> Vec<Finding> {
        let a = first.observations();
        let b = second.observations();
        let mut events = Vec::new();
        let (mut i, mut j) = (0, 0);
        // A negative tolerance matches nothing
        let tolerance = u64::try_from(self.config.time_tolerance).ok();

        while i < a.len() && j < b.len() {
            let (t1, t2) = (a[i].timestamp, b[j].timestamp);
            if tolerance.is_some_and(|tol| t1.abs_diff(t2) <= tol) {
                let separation = distance(&a[i].position, &b[j].position);
                if separation <= self.config.collision_distance {
                    debug!(
                        first = first.vehicle_id(),
                        second = second.vehicle_id(),
                        t1,
                        t2,
                        separation,
                        "proximity encounter"
                    );
                    events.push(Finding::Proximity {
                        first: first.vehicle_id().to_string(),
                        second: second.vehicle_id().to_string(),
                        first_timestamp: t1,
                        second_timestamp: t2,
                        distance: separation,
                    });
                }
            }

            if t1 <= t2 {
                i += 1;
            } else {
                j += 1;
            }
        }

        events
    }
}

/// Same pair of pings, regardless of which vehicle was swept first
fn same_encounter(a: &Finding, b: &Finding) -> bool {
    match (a, b) {
        (
            Finding::Proximity {
                first: f1,
                second: s1,
                first_timestamp: ft1,
                second_timestamp: st1,
                distance: d1,
            },
            Finding::Proximity {
                first: f2,
                second: s2,
                first_timestamp: ft2,
                second_timestamp: st2,
                distance: d2,
            },
        ) => f1 == s2 && s1 == f2 && ft1 == st2 && st1 == ft2 && d1 == d2,
        _ => false,
    }
}

/// Flagged vehicles under the default thresholds
pub fn detect_anomalies(tracks: &VehicleTracks) -> BTreeSet<String> {
    AnomalyDetector::default().detect(tracks).flagged
}
