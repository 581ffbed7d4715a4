//! End-to-end: CSV fixture through location, speeds and damage detection

use std::collections::BTreeSet;
use std::path::PathBuf;

use warehouse_tracking::api::formatting::render;
use warehouse_tracking::{
    AnchorLayout, AnomalyDetector, Finding, OutputFormat, PingLoader, Point, Trilaterator,
    WarehouseReport,
};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/warehouse_pings.csv")
}

fn load_report() -> WarehouseReport {
    let loader = PingLoader::new(Trilaterator::new(AnchorLayout::default()).unwrap());
    let observations = loader.load_path(fixture_path()).unwrap();
    WarehouseReport::build(observations, &AnomalyDetector::default()).unwrap()
}

#[test]
fn test_fixture_positions() {
    let report = load_report();
    assert_eq!(report.pings.len(), 18);

    let vehicle_a: Vec<Point> = report
        .pings
        .iter()
        .filter(|p| p.vehicle_id == "A")
        .map(|p| p.position)
        .collect();
    let expected: Vec<Point> = [0.0, 1.0, 1.0, 1.0, 2.0, 4.0, 6.0, 8.0, 8.0, 8.0]
        .iter()
        .map(|&y| Point::new(0.0, y))
        .collect();
    assert_eq!(vehicle_a, expected);

    for ping in &report.pings {
        assert_eq!(ping.position.x.fract(), 0.0);
        assert_eq!(ping.position.y.fract(), 0.0);
    }
}

#[test]
fn test_fixture_speeds() {
    let report = load_report();
    let speeds = &report.average_speeds;

    assert_eq!(speeds.speed_of("A"), Some(8.0 / 9.0));
    assert_eq!(speeds.speed_of("B"), Some(0.5));
    let c = speeds.speed_of("C").unwrap();
    let expected_c = (18f64.sqrt() + 13f64.sqrt()) / 6.0;
    assert!((c - expected_c).abs() < 1e-12);
    assert_eq!(speeds.speed_of("M"), Some(0.0));
}

#[test]
fn test_fixture_damage() {
    let report = load_report();
    let expected: BTreeSet<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
    assert_eq!(report.damage.flagged, expected);

    assert!(report
        .damage
        .findings_for("A")
        .all(|f| matches!(f, Finding::AbruptMotion { .. })));
    assert!(report.damage.findings.iter().any(|f| matches!(
        f,
        Finding::Proximity { first, second, first_timestamp: 6, second_timestamp: 7, .. }
            if first == "B" && second == "C"
    )));
}

#[test]
fn test_fixture_renders() {
    let report = load_report();
    let text = render(&report, OutputFormat::Text).unwrap();
    assert!(text.starts_with("Pings:\n  A: (0, 0) @ 0\n"));
    assert!(text.contains("  M: 0.000\n"));

    let json = render(&report, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["damage"]["flagged"], serde_json::json!(["A", "B", "C"]));
}
