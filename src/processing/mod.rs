//! Track grouping, motion analytics and damage detection

pub mod tracks;
pub mod motion;
pub mod anomaly;
pub mod ingest;

pub use tracks::{by_vehicle, VehicleTrack, VehicleTracks};
pub use motion::{average_speeds, AverageSpeeds, VehicleSpeed};
pub use anomaly::{detect_anomalies, AnomalyDetector, DamageReport, DetectorConfig, Finding};
pub use ingest::{AnchorRecord, PingLoader, RawPing};
