//! # Counter Store Tests
//!
//! Parsing is a projection: only requested counters survive, every missing
//! required counter is reported, and parsing is deterministic.

use std::io::Cursor;

use pretty_assertions::assert_eq;
use rstest::rstest;
use simstats_core::schema::names;
use simstats_core::{AnalysisError, CounterSet, CounterStore, CpiModel};
use tempfile::TempDir;

use crate::common::{REFERENCE_COUNTERS, dump_text, without, write_run};

fn cpi_set() -> CounterSet {
    CpiModel::default().counter_set()
}

fn parse(text: &str, set: &CounterSet) -> Result<CounterStore, AnalysisError> {
    CounterStore::parse(Cursor::new(text.as_bytes()), "stats.txt", set)
}

#[test]
fn projects_only_requested_counters() {
    let store = parse(&dump_text(&REFERENCE_COUNTERS), &cpi_set()).unwrap();
    assert_eq!(store.len(), 12);
    assert!(!store.is_empty());
    assert_eq!(store.get("hostSeconds"), None);
    assert_eq!(store.get("system.cpu.unrelated::total"), None);
    assert_eq!(store.get(names::SIM_TICKS), Some(1_000_000.0));
    assert_eq!(store.get(names::L2_DEMAND_AVG_MISS_LATENCY), Some(400.0));
    assert!(store.counters().all(|(name, _)| cpi_set().contains(name)));
}

#[test]
fn reparsing_is_identical() {
    let text = dump_text(&REFERENCE_COUNTERS);
    let a = parse(&text, &cpi_set()).unwrap();
    let b = parse(&text, &cpi_set()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn reports_every_missing_counter() {
    let text = dump_text(&without(&[names::SIM_FREQ, names::L2_DEMAND_MISSES]));
    match parse(&text, &cpi_set()) {
        Err(AnalysisError::MissingCounter {
            source_name,
            missing,
        }) => {
            assert_eq!(source_name, "stats.txt");
            assert_eq!(
                missing,
                vec![names::SIM_FREQ.to_owned(), names::L2_DEMAND_MISSES.to_owned()]
            );
        }
        other => panic!("expected MissingCounter, got {other:?}"),
    }
}

#[test]
fn missing_counter_message_names_file_and_keys() {
    let text = dump_text(&without(&[names::CPI]));
    let err = parse(&text, &cpi_set()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("stats.txt"));
    assert!(message.contains(names::CPI));
}

#[test]
fn optional_counters_may_be_absent() {
    let set = CounterSet::new([names::CPI]).with_optional([names::BTB_HIT_RATIO]);
    let store = parse("system.cpu.cpi 1.5\n", &set).unwrap();
    assert_eq!(store.get(names::CPI), Some(1.5));
    assert_eq!(store.get(names::BTB_HIT_RATIO), None);
}

#[test]
fn last_occurrence_wins() {
    let set = CounterSet::new([names::CPI]);
    let store = parse("system.cpu.cpi 1.5\n----------\nsystem.cpu.cpi 2.5\n", &set).unwrap();
    assert_eq!(store.get(names::CPI), Some(2.5));
}

#[test]
fn duplicate_set_entries_collapse() {
    let set = CounterSet::new([names::CPI, names::IPC, names::CPI]);
    assert_eq!(set.required(), [names::CPI.to_owned(), names::IPC.to_owned()]);
    assert_eq!(set.len(), 2);
    assert!(!set.is_empty());
}

#[rstest]
#[case("system.cpu.cpi 2", Some(2.0))]
#[case("system.cpu.cpi    2.5   # Cycles per instruction", Some(2.5))]
#[case("\tsystem.cpu.cpi 1e0\r", Some(1.0))]
#[case("system.cpu.cpi -", None)]
#[case("system.cpu.cpi nan", None)]
#[case("system.cpu.cpi 2 3", None)]
fn line_forms(#[case] line: &str, #[case] expected: Option<f64>) {
    let set = CounterSet::new([names::CPI]);
    let store = parse(line, &set);
    assert_eq!(store.ok().and_then(|s| s.get(names::CPI)), expected);
}

#[test]
fn tolerates_invalid_utf8() {
    let mut bytes = b"junk \xff\xfe line\n".to_vec();
    bytes.extend_from_slice(b"system.cpu.cpi 3\n");
    let set = CounterSet::new([names::CPI]);
    let store = CounterStore::parse(Cursor::new(bytes), "bin", &set).unwrap();
    assert_eq!(store.get(names::CPI), Some(3.0));
}

#[test]
fn from_path_reports_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent").join("stats.txt");
    match CounterStore::from_path(&path, &cpi_set()) {
        Err(AnalysisError::MissingInput { path: p }) => assert_eq!(p, path),
        other => panic!("expected MissingInput, got {other:?}"),
    }
}

#[test]
fn from_path_uses_path_as_source() {
    let dir = TempDir::new().unwrap();
    let run = write_run(dir.path(), "m5run", &dump_text(&REFERENCE_COUNTERS));
    let path = run.join("stats.txt");
    let store = CounterStore::from_path(&path, &cpi_set()).unwrap();
    assert_eq!(store.source(), path.display().to_string());
}
