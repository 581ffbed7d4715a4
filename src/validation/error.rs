//! Error types for the warehouse tracking system

use thiserror::Error;

/// Anchor geometry that makes trilateration undefined.
///
/// Raised once when a layout is built; a running engine never produces these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("expected {expected} anchors, found {found}")]
    WrongAnchorCount { expected: usize, found: usize },

    #[error("anchors {first} and {second} share the same position")]
    DuplicateAnchors { first: String, second: String },

    #[error("anchors {} are collinear", .anchor_ids.join(", "))]
    CollinearAnchors { anchor_ids: Vec<String> },

    #[error("anchor {anchor_id} has a non-finite coordinate")]
    NonFiniteAnchor { anchor_id: String },
}

/// Violations of the per-vehicle chronological ordering contract
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackError {
    #[error(
        "observations for vehicle {vehicle_id} out of order at index {index}: \
         timestamp {current} follows {previous}"
    )]
    OutOfOrder {
        vehicle_id: String,
        index: usize,
        previous: i64,
        current: i64,
    },

    #[error("observation for vehicle {found} filed under track {expected}")]
    ForeignObservation { expected: String, found: String },
}

/// Failures while reading anchor records and assembling pings
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read ping records: {0}")]
    Csv(#[from] csv::Error),

    #[error("record {record}: expected anchor {expected}, found {found}")]
    MisalignedRecord {
        record: usize,
        expected: String,
        found: String,
    },

    #[error(
        "record {record}: reading for {found_vehicle}@{found_timestamp} \
         does not match ping {vehicle_id}@{timestamp}"
    )]
    InconsistentTriple {
        record: usize,
        vehicle_id: String,
        timestamp: i64,
        found_vehicle: String,
        found_timestamp: i64,
    },

    #[error("ping {vehicle_id}@{timestamp} has only {readings} of 3 anchor readings")]
    IncompleteTriple {
        vehicle_id: String,
        timestamp: i64,
        readings: usize,
    },

    #[error("record {record}: invalid distance {distance}")]
    InvalidDistance { record: usize, distance: f64 },
}

/// Configuration loading and validation failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid parameter '{parameter}' = {value}: {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Crate-level error
#[derive(Debug, Error)]
pub enum WarehouseError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Track(#[from] TrackError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, WarehouseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GeometryError::CollinearAnchors {
            anchor_ids: vec!["AP1".into(), "AP2".into(), "AP3".into()],
        };
        assert_eq!(err.to_string(), "anchors AP1, AP2, AP3 are collinear");

        let err = TrackError::OutOfOrder {
            vehicle_id: "A".into(),
            index: 2,
            previous: 10,
            current: 7,
        };
        assert_eq!(
            err.to_string(),
            "observations for vehicle A out of order at index 2: timestamp 7 follows 10"
        );
    }

    #[test]
    fn test_conversion_into_crate_error() {
        let err: WarehouseError = GeometryError::WrongAnchorCount { expected: 3, found: 4 }.into();
        assert!(matches!(err, WarehouseError::Geometry(_)));
        assert_eq!(err.to_string(), "expected 3 anchors, found 4");
    }
}
