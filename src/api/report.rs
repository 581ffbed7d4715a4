use serde::Serialize;

use crate::core::Observation;
use crate::processing::anomaly::{AnomalyDetector, DamageReport};
use crate::processing::motion::{speeds_for_tracks, AverageSpeeds};
use crate::processing::tracks::by_vehicle;
use crate::validation::error::TrackError;

/// Everything the tool reports about one batch of pings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarehouseReport {
    pub pings: Vec<Observation>,
    pub average_speeds: AverageSpeeds,
    pub damage: DamageReport,
}

impl WarehouseReport {
    /// Run both analytics over the same observation set
    pub fn build(
        observations: Vec<Observation>,
        detector: &AnomalyDetector,
    ) -> Result<Self, TrackError> {
        let tracks = by_vehicle(&observations)?;
        let average_speeds = speeds_for_tracks(&tracks);
        let damage = detector.detect(&tracks);

        Ok(Self {
            pings: observations,
            average_speeds,
            damage,
        })
    }
}
