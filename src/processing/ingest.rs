//! Loading access point records into located observations
//!
//! Each ping arrives as three CSV rows, one per access point, in layout order:
//!
//! ```text
//! vehicle_id,timestamp,distance,anchor
//! A,0,9.433981132056603,AP1
//! A,0,12.649110640673518,AP2
//! A,0,11.661903789690601,AP3
//! ```
//!
//! There is no header row. Rows are sorted by vehicle, then timestamp.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::algorithms::Trilaterator;
use crate::core::{AnchorLayout, Observation};
use crate::validation::error::IngestError;

/// One access point's reading of one ping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorRecord {
    pub vehicle_id: String,
    pub timestamp: i64,
    pub distance: f64,
    pub anchor: String,
}

/// Distances from one ping to the three anchors, in layout order
#[derive(Debug, Clone, PartialEq)]
pub struct RawPing {
    pub vehicle_id: String,
    pub timestamp: i64,
    pub distances: [f64; 3],
}

/// Parse headerless anchor records
pub fn read_anchor_records<R: Read>(reader: R) -> Result<Vec<AnchorRecord>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let records = csv_reader
        .deserialize()
        .collect::<Result<Vec<AnchorRecord>, csv::Error>>()?;
    Ok(records)
}

/// Assemble consecutive record triples into pings.
///
/// Every triple must name the layout's anchors in order and agree on vehicle
/// and timestamp. Record numbers in errors are 1-based.
pub fn group_triples(
    records: &[AnchorRecord],
    layout: &AnchorLayout,
) -> Result<Vec<RawPing>, IngestError> {
    let anchor_ids = layout.ids();
    let mut pings = Vec::with_capacity(records.len() / 3);

    for (chunk_index, chunk) in records.chunks(3).enumerate() {
        let head = &chunk[0];
        if chunk.len() < 3 {
            return Err(IngestError::IncompleteTriple {
                vehicle_id: head.vehicle_id.clone(),
                timestamp: head.timestamp,
                readings: chunk.len(),
            });
        }

        let mut distances = [0.0; 3];
        for (slot, record) in chunk.iter().enumerate() {
            let record_number = chunk_index * 3 + slot + 1;

            if record.anchor != anchor_ids[slot] {
                return Err(IngestError::MisalignedRecord {
                    record: record_number,
                    expected: anchor_ids[slot].to_string(),
                    found: record.anchor.clone(),
                });
            }
            if record.vehicle_id != head.vehicle_id || record.timestamp != head.timestamp {
                return Err(IngestError::InconsistentTriple {
                    record: record_number,
                    vehicle_id: head.vehicle_id.clone(),
                    timestamp: head.timestamp,
                    found_vehicle: record.vehicle_id.clone(),
                    found_timestamp: record.timestamp,
                });
            }
            if !record.distance.is_finite() || record.distance < 0.0 {
                return Err(IngestError::InvalidDistance {
                    record: record_number,
                    distance: record.distance,
                });
            }

            distances[slot] = record.distance;
        }

        pings.push(RawPing {
            vehicle_id: head.vehicle_id.clone(),
            timestamp: head.timestamp,
            distances,
        });
    }

    Ok(pings)
}

/// Turns access point records into observations using one trilateration engine
#[derive(Debug, Clone)]
pub struct PingLoader {
    trilaterator: Trilaterator,
}

impl PingLoader {
    pub fn new(trilaterator: Trilaterator) -> Self {
        Self { trilaterator }
    }

    pub fn trilaterator(&self) -> &Trilaterator {
        &self.trilaterator
    }

    /// Locate already-grouped pings
    pub fn locate_all(&self, pings: &[RawPing]) -> Vec<Observation> {
        pings
            .iter()
            .map(|ping| {
                let [d1, d2, d3] = ping.distances;
                let position = self.trilaterator.locate(d1, d2, d3);
                debug!(
                    vehicle_id = %ping.vehicle_id,
                    timestamp = ping.timestamp,
                    x = position.x,
                    y = position.y,
                    "ping located"
                );
                Observation::new(ping.vehicle_id.clone(), position, ping.timestamp)
            })
            .collect()
    }

    pub fn load<R: Read>(&self, reader: R) -> Result<Vec<Observation>, IngestError> {
        let records = read_anchor_records(reader)?;
        let pings = group_triples(&records, self.trilaterator.layout())?;
        let observations = self.locate_all(&pings);
        info!(
            records = records.len(),
            pings = observations.len(),
            "ping records loaded"
        );
        Ok(observations)
    }

    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Observation>, IngestError> {
        let file = std::fs::File::open(path.as_ref()).map_err(csv::Error::from)?;
        self.load(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Point;

    fn loader() -> PingLoader {
        PingLoader::new(Trilaterator::new(AnchorLayout::default()).unwrap())
    }

    const TWO_PINGS: &str = "\
A,0,9.433981132056603,AP1
A,0,12.649110640673518,AP2
A,0,11.661903789690601,AP3
A,1,8.602325267042627,AP1
A,1,11.704699910719626,AP2
A,1,11.180339887498949,AP3
";

    #[test]
    fn test_load_locates_each_triple() {
        let observations = loader().load(TWO_PINGS.as_bytes()).unwrap();
        assert_eq!(
            observations,
            vec![
                Observation::new("A", Point::new(0.0, 0.0), 0),
                Observation::new("A", Point::new(0.0, 1.0), 1),
            ]
        );
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let data = "B, 7, 5.0 ,AP1\nB,7,5.66,AP2\nB,7,5,AP3\n";
        let observations = loader().load(data.as_bytes()).unwrap();
        assert_eq!(observations[0], Observation::new("B", Point::new(9.0, 10.0), 7));
    }

    #[test]
    fn test_misaligned_anchor_rejected() {
        let data = "A,0,1,AP2\nA,0,1,AP1\nA,0,1,AP3\n";
        let err = loader().load(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::MisalignedRecord { record: 1, ref expected, .. } if expected == "AP1"
        ));
    }

    #[test]
    fn test_inconsistent_triple_rejected() {
        let data = "A,0,1,AP1\nA,1,1,AP2\nA,0,1,AP3\n";
        let err = loader().load(data.as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::InconsistentTriple { record: 2, found_timestamp: 1, .. }));
    }

    #[test]
    fn test_incomplete_trailing_triple_rejected() {
        let data = format!("{}C,4,1,AP1\n", TWO_PINGS);
        let err = loader().load(data.as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::IncompleteTriple { readings: 1, .. }));
    }

    #[test]
    fn test_negative_distance_rejected() {
        let data = "A,0,1,AP1\nA,0,-2,AP2\nA,0,1,AP3\n";
        let err = loader().load(data.as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::InvalidDistance { record: 2, .. }));
    }

    #[test]
    fn test_malformed_row_is_csv_error() {
        let data = "A,zero,1,AP1\n";
        let err = loader().load(data.as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::Csv(_)));
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(loader().load("".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(loader().load_path("does/not/exist.csv").is_err());
    }
}
