//! Warehouse Vehicle Tracking
//!
//! Reconstructs vehicle positions from three fixed access points by
//! trilateration, then derives per-vehicle average speed and flags vehicles
//! whose motion suggests they may have been damaged.
//!
//! ```
//! use warehouse_tracking::{AnchorLayout, Trilaterator, Observation, by_vehicle, detect_anomalies};
//!
//! let engine = Trilaterator::new(AnchorLayout::default()).unwrap();
//! let position = engine.locate(9.433981132056603, 12.649110640673518, 11.661903789690601);
//! assert_eq!((position.x, position.y), (0.0, 0.0));
//!
//! let tracks = by_vehicle(&[Observation::new("A", position, 0)]).unwrap();
//! assert!(detect_anomalies(&tracks).is_empty());
//! ```

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod validation;
pub mod utils;
pub mod api;

// Re-export commonly used types
pub use crate::core::{distance, Anchor, AnchorLayout, Observation, Point};
pub use algorithms::Trilaterator;
pub use processing::{
    average_speeds, by_vehicle, detect_anomalies, AnomalyDetector, AverageSpeeds, DamageReport,
    DetectorConfig, Finding, PingLoader, VehicleSpeed, VehicleTrack, VehicleTracks,
};
pub use validation::{ConfigError, GeometryError, IngestError, Result, TrackError, WarehouseError};
pub use utils::{ConfigurationManager, LogConfig, SystemConfig};
pub use api::{OutputFormat, WarehouseReport};
