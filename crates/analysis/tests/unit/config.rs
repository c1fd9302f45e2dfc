//! # Report Configuration Tests

use std::fs;
use std::path::PathBuf;

use simstats_core::render::DecimalSeparator;
use simstats_core::{AnalysisError, ReportConfig};
use tempfile::tempdir;

#[test]
fn default_layout() {
    let config = ReportConfig::default();
    assert_eq!(config.gain_tables.len(), 4);
    assert_eq!(config.gain_tables[0].program, "Dijkstra");
    assert_eq!(config.gain_tables[0].baseline, "1kB");
    assert_eq!(config.gain_tables[3].baseline, "2kB");
    assert_eq!(
        config.gain_tables[3].metrics,
        PathBuf::from("blowfish/plots_L1_A15/metrics_L1_A15_blowfish.csv")
    );
    assert_eq!(config.decimal_separator, DecimalSeparator::Comma);
    assert_eq!(config.efficiency.cores.len(), 2);
    assert_eq!(config.efficiency.columns.len(), 4);
    assert_eq!(
        config.efficiency.columns[0].metrics_for("A7"),
        PathBuf::from("dijkstra/plots_L1_A7/metrics_L1_A7_dijkstra.csv")
    );
}

#[test]
fn partial_json_keeps_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.json");
    fs::write(
        &path,
        r#"{
            "decimal_separator": "point",
            "gain_tables": [
                {"program": "Sha", "cpu": "Cortex-A7", "metrics": "sha.csv", "baseline": "4kB"}
            ]
        }"#,
    )
    .unwrap();
    let config = ReportConfig::from_path(&path).unwrap();
    assert_eq!(config.decimal_separator, DecimalSeparator::Point);
    assert_eq!(config.gain_tables.len(), 1);
    assert_eq!(config.gain_tables[0].metrics, PathBuf::from("sha.csv"));
    assert_eq!(config.preferred_datasets, ["small", "large"]);
    assert_eq!(config.efficiency, ReportConfig::default().efficiency);
}

#[test]
fn bad_json_and_missing_file_are_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.json");
    fs::write(&path, r#"{"gain_tables": 3}"#).unwrap();
    assert!(matches!(
        ReportConfig::from_path(&path),
        Err(AnalysisError::Config { .. })
    ));
    assert!(matches!(
        ReportConfig::from_path(&dir.path().join("absent.json")),
        Err(AnalysisError::MissingInput { .. })
    ));
}

#[test]
fn preferred_datasets_come_first() {
    let config = ReportConfig::default();
    let ordered = config.order_datasets(["tiny", "large", "", "alpha", "small", "large"]);
    assert_eq!(ordered, ["small", "large", "alpha", "tiny"]);
}
