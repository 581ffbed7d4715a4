//! Error taxonomy and input validation

pub mod error;

pub use error::{ConfigError, GeometryError, IngestError, Result, TrackError, WarehouseError};
