//! Core data types for the tracking system

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::constants::{
    DEFAULT_ANCHOR_IDS, DEFAULT_AP1_LOCATION, DEFAULT_AP2_LOCATION, DEFAULT_AP3_LOCATION,
    GEOMETRY_EPSILON,
};
use crate::validation::error::GeometryError;

/// 2D position on the warehouse grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point) -> f64 {
        super::geometry::distance(self, other)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn to_vector(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

impl From<Vector2<f64>> for Point {
    fn from(v: Vector2<f64>) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Fixed access point with a known grid position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub id: String,
    pub position: Point,
}

impl Anchor {
    pub fn new(id: impl Into<String>, position: Point) -> Self {
        Self {
            id: id.into(),
            position,
        }
    }
}

/// The three anchors a deployment trilaterates against.
///
/// A layout can only be obtained through [`AnchorLayout::new`], which rejects
/// duplicate or collinear anchors, so every layout in circulation describes a
/// solvable geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AnchorLayout {
    anchors: [Anchor; 3],
}

impl AnchorLayout {
    pub fn new(anchors: [Anchor; 3]) -> Result<Self, GeometryError> {
        for anchor in &anchors {
            if !anchor.position.is_finite() {
                return Err(GeometryError::NonFiniteAnchor {
                    anchor_id: anchor.id.clone(),
                });
            }
        }

        for i in 0..anchors.len() {
            for j in (i + 1)..anchors.len() {
                if anchors[i].position.distance_to(&anchors[j].position) < GEOMETRY_EPSILON {
                    return Err(GeometryError::DuplicateAnchors {
                        first: anchors[i].id.clone(),
                        second: anchors[j].id.clone(),
                    });
                }
            }
        }

        let a1 = anchors[0].position.to_vector();
        let a2 = anchors[1].position.to_vector();
        let a3 = anchors[2].position.to_vector();
        let u = a2 - a1;
        let v = a3 - a1;
        // Perpendicular distance of anchor 3 from the anchor 1 -> 2 baseline, in grid units
        let spread = (u.x * v.y - u.y * v.x).abs() / u.norm();
        if spread < GEOMETRY_EPSILON {
            return Err(GeometryError::CollinearAnchors {
                anchor_ids: anchors.iter().map(|a| a.id.clone()).collect(),
            });
        }

        Ok(Self { anchors })
    }

    /// Build a layout from a slice, as read from configuration
    pub fn from_slice(anchors: &[Anchor]) -> Result<Self, GeometryError> {
        match anchors {
            [a1, a2, a3] => Self::new([a1.clone(), a2.clone(), a3.clone()]),
            _ => Err(GeometryError::WrongAnchorCount {
                expected: 3,
                found: anchors.len(),
            }),
        }
    }

    pub fn anchors(&self) -> &[Anchor; 3] {
        &self.anchors
    }

    pub fn anchor(&self, index: usize) -> Option<&Anchor> {
        self.anchors.get(index)
    }

    /// Position of the anchor at `index` in reading order
    pub fn positions(&self) -> [Point; 3] {
        [
            self.anchors[0].position,
            self.anchors[1].position,
            self.anchors[2].position,
        ]
    }

    pub fn ids(&self) -> [&str; 3] {
        [
            self.anchors[0].id.as_str(),
            self.anchors[1].id.as_str(),
            self.anchors[2].id.as_str(),
        ]
    }
}

impl Default for AnchorLayout {
    fn default() -> Self {
        let locations = [DEFAULT_AP1_LOCATION, DEFAULT_AP2_LOCATION, DEFAULT_AP3_LOCATION];
        let anchors = [0, 1, 2].map(|i| Anchor::new(DEFAULT_ANCHOR_IDS[i], locations[i].into()));
        // The default coordinates are a fixed, non-degenerate triangle
        Self { anchors }
    }
}

impl<'de> Deserialize<'de> for AnchorLayout {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let anchors = Vec::<Anchor>::deserialize(deserializer)?;
        AnchorLayout::from_slice(&anchors).map_err(serde::de::Error::custom)
    }
}

/// A located vehicle ping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub vehicle_id: String,
    pub position: Point,
    /// Seconds since epoch
    pub timestamp: i64,
}

impl Observation {
    pub fn new(vehicle_id: impl Into<String>, position: Point, timestamp: i64) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            position,
            timestamp,
        }
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} @ {}", self.vehicle_id, self.position, self.timestamp)
    }
}
