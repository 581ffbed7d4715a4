//! Planar geometry helpers

use super::types::Point;

/// Euclidean distance between two points
pub fn distance(p1: &Point, p2: &Point) -> f64 {
    (p1.to_vector() - p2.to_vector()).norm()
}
