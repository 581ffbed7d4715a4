//! Closed-form 2D trilateration against three fixed anchors
//!
//! The solver works in a local orthonormal frame anchored at the first access
//! point: `ex` points at the second anchor and `ey` is the Gram-Schmidt
//! complement towards the third. Everything that depends only on the anchor
//! geometry is computed once in [`Trilaterator::new`], so each call to
//! [`Trilaterator::locate`] is a handful of multiplications.

use nalgebra::Vector2;
use tracing::{debug, trace};

use crate::core::{AnchorLayout, Point, GEOMETRY_EPSILON};
use crate::validation::error::GeometryError;

/// Trilateration engine bound to one anchor layout
#[derive(Debug, Clone)]
pub struct Trilaterator {
    layout: AnchorLayout,
    /// First anchor, origin of the local frame
    origin: Vector2<f64>,
    /// Unit vector from anchor 1 towards anchor 2
    ex: Vector2<f64>,
    /// Unit vector orthogonal to `ex`, towards anchor 3
    ey: Vector2<f64>,
    /// Projection of anchor 3 onto `ex`
    i: f64,
    /// Projection of anchor 3 onto `ey`
    j: f64,
    /// Baseline length between anchors 1 and 2
    d: f64,
}

impl Trilaterator {
    pub fn new(layout: AnchorLayout) -> Result<Self, GeometryError> {
        let [p1, p2, p3] = layout.positions();
        let origin = p1.to_vector();
        let to_second = p2.to_vector() - origin;
        let to_third = p3.to_vector() - origin;

        let d = to_second.norm();
        if d < GEOMETRY_EPSILON {
            let ids = layout.ids();
            return Err(GeometryError::DuplicateAnchors {
                first: ids[0].to_string(),
                second: ids[1].to_string(),
            });
        }
        let ex = to_second / d;
        let i = ex.dot(&to_third);

        let residual = to_third - ex * i;
        let residual_norm = residual.norm();
        if residual_norm < GEOMETRY_EPSILON {
            return Err(GeometryError::CollinearAnchors {
                anchor_ids: layout.ids().iter().map(|id| id.to_string()).collect(),
            });
        }
        let ey = residual / residual_norm;
        let j = ey.dot(&to_third);

        debug!(i, j, d, "trilateration basis prepared");

        Ok(Self {
            layout,
            origin,
            ex,
            ey,
            i,
            j,
            d,
        })
    }

    pub fn layout(&self) -> &AnchorLayout {
        &self.layout
    }

    /// Position estimate before snapping to the grid
    pub fn locate_unrounded(&self, d1: f64, d2: f64, d3: f64) -> Point {
        let (i, j, d) = (self.i, self.j, self.d);

        let offset_x = (d1.powi(2) - d2.powi(2) + d.powi(2)) / (2.0 * d);
        let offset_y = (d1.powi(2) - d3.powi(2) + i.powi(2) + j.powi(2)) / (2.0 * j)
            - (i * offset_x) / j;

        let estimate = self.origin + self.ex * offset_x + self.ey * offset_y;
        trace!(d1, d2, d3, x = estimate.x, y = estimate.y, "raw trilateration estimate");
        Point::from(estimate)
    }

    /// Locate a vehicle from its distances to anchors 1, 2 and 3.
    ///
    /// Distances are taken as given: inconsistent triples still produce a
    /// point, never an error. Coordinates snap to the integral warehouse grid,
    /// with halfway cases rounding to even.
    pub fn locate(&self, d1: f64, d2: f64, d3: f64) -> Point {
        let raw = self.locate_unrounded(d1, d2, d3);
        Point::new(snap(raw.x), snap(raw.y))
    }
}

/// Nearest integer, ties to even. Adding zero folds -0.0 into 0.0.
fn snap(value: f64) -> f64 {
    value.round_ties_even() + 0.0
}
