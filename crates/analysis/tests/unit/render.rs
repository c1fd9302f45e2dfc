//! # Rendering Tests
//!
//! CSV output must be byte-stable; typeset output is checked on the lines that matter.

use std::io::Cursor;

use pretty_assertions::assert_eq;
use simstats_core::baseline::gain_table;
use simstats_core::records::{METRICS_HEADER, MetricsRecord};
use simstats_core::render::{self, DecimalSeparator, trimmed};
use simstats_core::{CounterStore, CpiModel, ResultRow};

use crate::common::{REFERENCE_COUNTERS, dump_text};

fn reference_row(case: &str) -> ResultRow {
    let model = CpiModel::default();
    let store = CounterStore::parse(
        Cursor::new(dump_text(&REFERENCE_COUNTERS).into_bytes()),
        "stats.txt",
        &model.counter_set(),
    )
    .unwrap();
    model.compute(case, &store).unwrap()
}

#[test]
fn cpi_csv_is_byte_stable() {
    let model = CpiModel::default();
    let text = render::csv::cpi_table(&[reference_row("bfA7_small")], &model).unwrap();
    let expected = "case,cpi,ipc,ticks_per_cycle,mpki_l1,avg_l1_miss_cycles,mpki_l2,avg_l2_miss_cycles,\
deltaCPI_mem_total,pctCPI_mem_total,deltaCPI_l1_only,pctCPI_l1_only,deltaCPI_l2_miss,pctCPI_l2_miss\n\
bfA7_small,2.000000,0.500000,500.000000,50.000000,0.400000,10.000000,0.800000,\
0.02000000,1.0000,0.01200000,0.6000,0.00800000,0.4000\n";
    assert_eq!(text, expected);
    assert_eq!(
        render::csv::cpi_table(&[reference_row("bfA7_small")], &model).unwrap(),
        text
    );
}

#[test]
fn cpi_csv_keeps_row_order() {
    let model = CpiModel::default();
    let rows = [reference_row("b"), reference_row("a")];
    let text = render::csv::cpi_table(&rows, &model).unwrap();
    let cases: Vec<&str> = text
        .lines()
        .skip(1)
        .filter_map(|l| l.split(',').next())
        .collect();
    assert_eq!(cases, ["b", "a"]);
}

#[test]
fn metrics_csv_leaves_absent_cells_empty() {
    let record = MetricsRecord {
        dataset: "small".to_owned(),
        l1_size: "1kB".to_owned(),
        cpi: Some(2.0),
        ipc: Some(0.5),
        num_cycles: Some(1000.0),
        icache_miss: Some(0.125),
        ..MetricsRecord::default()
    };
    let text = render::csv::metrics_table(&[record]).unwrap();
    let expected = "jeu_donnees,L1_taille,cpi,ipc,numCycles,icache_miss,dcache_miss,l2_miss,\
bp_cond_mispredict_rate,btb_hit_ratio,bp_mispredict_rate\n\
small,1kB,2,0.5,1000,0.125,,,,,\n";
    assert_eq!(text, expected);
    assert_eq!(text.lines().next(), Some(METRICS_HEADER.join(",").as_str()));
}

#[test]
fn trimmed_numbers() {
    assert_eq!(trimmed(Some(0.1 + 0.2)), "0.3");
    assert_eq!(trimmed(Some(-0.000_000_1)), "0");
    assert_eq!(trimmed(Some(12.0)), "12");
    assert_eq!(trimmed(None), "");
}

#[test]
fn cpi_latex_lists_every_case() {
    let rows = [reference_row("bf_A7")];
    let text = render::latex::cpi_table(&rows, "l1", "l2", "Memory share", DecimalSeparator::Point);
    assert!(text.starts_with("\\begin{table}[h]\n\\centering\n"));
    assert!(text.contains("\\begin{tabular}{l|c|c|c|c}"));
    assert!(text.contains("\\%CPI L1-only (approx)"));
    assert!(text.contains("bf\\_A7 & 2.000 & 1.00\\% & 0.60\\% & 0.40\\% \\\\"));
    assert!(text.ends_with("\\caption{Memory share}\n\\end{table}\n"));
}

#[test]
fn gain_latex_uses_comma_and_placeholders() {
    let base = MetricsRecord {
        l1_size: "1kB".to_owned(),
        ipc: Some(0.4),
        icache_miss: Some(0.1),
        ..MetricsRecord::default()
    };
    let bigger = MetricsRecord {
        l1_size: "2kB".to_owned(),
        ipc: Some(0.5),
        icache_miss: Some(0.1),
        ..MetricsRecord::default()
    };
    let gains = gain_table(&[base, bigger], "1kB").unwrap();
    let text = render::latex::gain_table("Blowfish", "small", "Cortex-A7", &gains, DecimalSeparator::Comma);
    assert!(text.contains("1\\,kB & 0,00 & 0,00 & -- \\\\"));
    assert!(text.contains("2\\,kB & 25,00 & 0,00 & -- \\\\"));
    assert!(text.contains("\\caption{Blowfish small (Cortex-A7): relative gains against 1\\,kB.}"));
}

#[test]
fn efficiency_latex_marks_missing_runs() {
    let rows = [render::latex::EfficiencyRow {
        kib: 4,
        cells: vec![Some(0.005), None],
    }];
    let columns = ["Dijkstra small".to_owned(), "Blowfish_large".to_owned()];
    let text = render::latex::efficiency_table("Cortex-A7", 100.0, &columns, &rows, DecimalSeparator::Comma);
    assert!(text.contains("\\begin{tabular}{c|c|c}"));
    assert!(text.contains("\\textbf{Blowfish\\_large}"));
    assert!(text.contains("4 & 0,00500 & -- \\\\"));
    assert!(text.contains("\\mbox{100\\,mW}"));
    assert!(text.contains("\\label{tab:energy-efficiency-cortexa7}"));
    assert!(!text.contains("tabcolsep"));
}

#[test]
fn percent_rounds_half_up_and_hides_negative_zero() {
    use render::latex::percent;
    assert_eq!(percent(0.125, DecimalSeparator::Point), "0.13");
    assert_eq!(percent(-0.001, DecimalSeparator::Point), "0.00");
    assert_eq!(percent(-2.5, DecimalSeparator::Comma), "-2,50");
}
