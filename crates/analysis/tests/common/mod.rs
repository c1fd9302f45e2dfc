//! Fixtures: counter dumps, run directories, and metrics tables.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Counters of the reference run used throughout the tests.
///
/// With these values: ticks/cycle = 500, L1 MPKI = 50, L2 MPKI = 10,
/// ΔCPI mem = 0.02, ΔCPI L2 = 0.008, ΔCPI L1-only = 0.012, 1% of CPI.
pub const REFERENCE_COUNTERS: [(&str, f64); 12] = [
    ("simTicks", 1_000_000.0),
    ("simFreq", 2_000_000_000.0),
    ("system.cpu.numCycles", 2000.0),
    ("system.cpu.executeStats0.numInsts", 1000.0),
    ("system.cpu.cpi", 2.0),
    ("system.cpu.ipc", 0.5),
    ("system.cpu.dcache.demandMisses::total", 50.0),
    ("system.cpu.dcache.demandMissLatency::total", 10000.0),
    ("system.cpu.dcache.demandAvgMissLatency::total", 200.0),
    ("system.l2cache.demandMisses::total", 10.0),
    ("system.l2cache.demandMissLatency::total", 4000.0),
    ("system.l2cache.demandAvgMissLatency::total", 400.0),
];

/// Renders counters in the simulator's dump layout, with a separator header,
/// comments, and unrelated counters mixed in.
pub fn dump_text(counters: &[(&str, f64)]) -> String {
    let mut text = String::from("\n---------- Begin Simulation Statistics ----------\n");
    text.push_str("hostSeconds                                  0.42  # Real time elapsed on the host (Second)\n");
    for (name, value) in counters {
        let _ = writeln!(text, "{name:<50} {value}  # (Count)");
    }
    text.push_str("system.cpu.op_class_0::IntAlu  700  70.00%  70.00% # Class of executed instruction\n");
    text.push_str("system.cpu.unrelated::total                 12345  # not requested\n");
    text.push_str("\n---------- End Simulation Statistics   ----------\n");
    text
}

/// Reference counters with `name` replaced by `value`.
pub fn with_counter(name: &str, value: f64) -> Vec<(&'static str, f64)> {
    REFERENCE_COUNTERS
        .iter()
        .map(|&(n, v)| (n, if n == name { value } else { v }))
        .collect()
}

/// Reference counters without the given names.
pub fn without(names: &[&str]) -> Vec<(&'static str, f64)> {
    REFERENCE_COUNTERS
        .iter()
        .copied()
        .filter(|(n, _)| !names.contains(n))
        .collect()
}

/// Creates `<base>/<run>/stats.txt` holding `text` and returns the run directory.
pub fn write_run(base: &Path, run: &str, text: &str) -> PathBuf {
    let dir = base.join(run);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("stats.txt"), text).unwrap();
    dir
}

/// Writes a summary-style dump (miss rates and predictor counters).
pub fn summary_dump(cpi: f64, ipc: f64, icache: f64, dcache: f64) -> String {
    dump_text(&[
        ("system.cpu.cpi", cpi),
        ("system.cpu.ipc", ipc),
        ("system.cpu.numCycles", 2000.0),
        ("system.cpu.icache.overallMissRate::total", icache),
        ("system.cpu.dcache.overallMissRate::total", dcache),
        ("system.l2cache.overallMissRate::total", 0.25),
        ("system.cpu.branchPred.BTBHitRatio", 0.9),
        ("system.cpu.branchPred.condPredicted", 400.0),
        ("system.cpu.branchPred.condIncorrect", 20.0),
        ("system.cpu.branchPred.lookups", 500.0),
        ("system.cpu.commit.branchMispredicts", 25.0),
    ])
}

/// Writes a metrics table with `(dataset, l1_size, ipc, icache, dcache)` rows.
pub fn write_metrics(path: &Path, rows: &[(&str, &str, f64, f64, f64)]) {
    let mut text = String::from(
        "dataset,l1_size,cpi,ipc,num_cycles,icache_miss,dcache_miss,l2_miss,bp_cond_mispredict_rate,btb_hit_ratio,bp_mispredict_rate\n",
    );
    for (dataset, size, ipc, icache, dcache) in rows {
        let _ = writeln!(
            text,
            "{dataset},{size},{},{ipc},1000,{icache},{dcache},0.2,0.05,0.9,0.05",
            1.0 / ipc
        );
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, text).unwrap();
}
