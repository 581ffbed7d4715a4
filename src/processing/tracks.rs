//! Per-vehicle chronological tracks
//!
//! Both analytics walk each vehicle's pings in time order. Rather than trust
//! callers to keep that order, a [`VehicleTrack`] can only be built through a
//! validating constructor, and everything downstream takes tracks.

use std::collections::HashMap;

use crate::core::{distance, Observation};
use crate::validation::error::TrackError;

/// One vehicle's observations in non-decreasing timestamp order
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleTrack {
    vehicle_id: String,
    observations: Vec<Observation>,
}

impl VehicleTrack {
    /// Build a track, rejecting foreign or out-of-order observations
    pub fn new(
        vehicle_id: impl Into<String>,
        observations: Vec<Observation>,
    ) -> Result<Self, TrackError> {
        let mut track = Self::empty(vehicle_id.into());
        track.observations.reserve(observations.len());
        for observation in observations {
            track.push(observation)?;
        }
        Ok(track)
    }

    fn empty(vehicle_id: String) -> Self {
        Self {
            vehicle_id,
            observations: Vec::new(),
        }
    }

    fn push(&mut self, observation: Observation) -> Result<(), TrackError> {
        if observation.vehicle_id != self.vehicle_id {
            return Err(TrackError::ForeignObservation {
                expected: self.vehicle_id.clone(),
                found: observation.vehicle_id,
            });
        }
        if let Some(last) = self.observations.last() {
            if observation.timestamp < last.timestamp {
                return Err(TrackError::OutOfOrder {
                    vehicle_id: self.vehicle_id.clone(),
                    index: self.observations.len(),
                    previous: last.timestamp,
                    current: observation.timestamp,
                });
            }
        }
        self.observations.push(observation);
        Ok(())
    }

    pub fn vehicle_id(&self) -> &str {
        &self.vehicle_id
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn first(&self) -> Option<&Observation> {
        self.observations.first()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }

    /// Seconds between the first and last observation; zero for fewer than two
    pub fn duration(&self) -> u64 {
        match (self.first(), self.last()) {
            // last >= first, so the absolute difference is the span and cannot overflow
            (Some(first), Some(last)) => last.timestamp.abs_diff(first.timestamp),
            _ => 0,
        }
    }

    /// Distances between consecutive positions
    pub fn step_distances(&self) -> impl Iterator<Item = f64> + '_ {
        self.observations
            .windows(2)
            .map(|pair| distance(&pair[1].position, &pair[0].position))
    }
}

/// Tracks keyed by vehicle, in order of each vehicle's first appearance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleTracks {
    tracks: Vec<VehicleTrack>,
    index: HashMap<String, usize>,
}

impl VehicleTracks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a track, returning the one it replaces for the same vehicle
    pub fn insert(&mut self, track: VehicleTrack) -> Option<VehicleTrack> {
        match self.index.get(track.vehicle_id()) {
            Some(&slot) => Some(std::mem::replace(&mut self.tracks[slot], track)),
            None => {
                self.index.insert(track.vehicle_id.clone(), self.tracks.len());
                self.tracks.push(track);
                None
            }
        }
    }

    pub fn get(&self, vehicle_id: &str) -> Option<&VehicleTrack> {
        self.index.get(vehicle_id).map(|&slot| &self.tracks[slot])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VehicleTrack> {
        self.tracks.iter()
    }

    pub fn vehicle_ids(&self) -> impl Iterator<Item = &str> {
        self.tracks.iter().map(VehicleTrack::vehicle_id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Total observations across all vehicles
    pub fn observation_count(&self) -> usize {
        self.tracks.iter().map(VehicleTrack::len).sum()
    }
}

impl<'a> IntoIterator for &'a VehicleTracks {
    type Item = &'a VehicleTrack;
    type IntoIter = std::slice::Iter<'a, VehicleTrack>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Group observations by vehicle, keeping each vehicle's arrival order.
///
/// Fails with [`TrackError::OutOfOrder`] if any vehicle's timestamps decrease.
pub fn by_vehicle(observations: &[Observation]) -> Result<VehicleTracks, TrackError> {
    let mut tracks = VehicleTracks::new();
    for observation in observations {
        let slot = match tracks.index.get(&observation.vehicle_id) {
            Some(&slot) => slot,
            None => {
                tracks
                    .index
                    .insert(observation.vehicle_id.clone(), tracks.tracks.len());
                tracks
                    .tracks
                    .push(VehicleTrack::empty(observation.vehicle_id.clone()));
                tracks.tracks.len() - 1
            }
        };
        tracks.tracks[slot].push(observation.clone())?;
    }
    Ok(tracks)
}
