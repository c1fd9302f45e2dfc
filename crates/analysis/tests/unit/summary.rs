//! # Miss Summary Tests

use std::io::Cursor;

use simstats_core::counters::CounterStore;
use simstats_core::schema::names;
use simstats_core::summary::{MissSummary, counter_set};

use crate::common::{dump_text, summary_dump};

fn summarize(text: &str) -> MissSummary {
    let store = CounterStore::parse(Cursor::new(text.as_bytes()), "stats.txt", &counter_set()).unwrap();
    MissSummary::from_store(&store).unwrap()
}

#[test]
fn full_dump_fills_every_field() {
    let summary = summarize(&summary_dump(2.0, 0.5, 0.1, 0.2));
    assert_eq!(summary.cpi, 2.0);
    assert_eq!(summary.ipc, 0.5);
    assert_eq!(summary.icache_miss, Some(0.1));
    assert_eq!(summary.dcache_miss, Some(0.2));
    assert_eq!(summary.l2_miss, Some(0.25));
    assert_eq!(summary.btb_hit_ratio, Some(0.9));
    assert_eq!(summary.bp_cond_mispredict_rate, Some(0.05));
    assert_eq!(summary.bp_mispredict_rate, Some(0.05));
}

#[test]
fn optional_ratios_stay_absent() {
    let text = dump_text(&[
        (names::CPI, 1.0),
        (names::IPC, 1.0),
        (names::NUM_CYCLES, 10.0),
        (names::COND_PREDICTED, 0.0),
        (names::COND_INCORRECT, 3.0),
        (names::BRANCH_MISPREDICTS, 3.0),
    ]);
    let summary = summarize(&text);
    assert_eq!(summary.icache_miss, None);
    assert_eq!(summary.bp_cond_mispredict_rate, None);
    assert_eq!(summary.bp_mispredict_rate, None);
}

#[test]
fn core_counters_are_required() {
    let text = dump_text(&[(names::CPI, 1.0), (names::IPC, 1.0)]);
    assert!(CounterStore::parse(Cursor::new(text.as_bytes()), "s", &counter_set()).is_err());
}
