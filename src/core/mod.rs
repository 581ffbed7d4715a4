//! Core types and constants for the warehouse tracking system

pub mod types;
pub mod constants;
pub mod geometry;

pub use types::*;
pub use constants::*;
pub use geometry::distance;
