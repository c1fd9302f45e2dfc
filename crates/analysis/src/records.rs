//! Typed rows of the intermediate CSV tables.
//!
//! Two tables sit between the simulator runs and the report:
//! 1. **Run table:** one row per run, naming its dataset, L1 size, and output directory.
//! 2. **Metrics table:** one row per run with the [`MissSummary`] values.
//!
//! Both tables keep the column names the chart and report tools read
//! (`jeu_donnees`, `L1_taille`, `numCycles`). English names are accepted as
//! aliases on input.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::baseline::GainSource;
use crate::error::{AnalysisError, Result};
use crate::summary::MissSummary;

/// One simulator run listed in a run table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunRecord {
    /// Dataset the benchmark was run on (`small`, `large`, ...).
    #[serde(default, alias = "jeu_donnees")]
    pub dataset: String,
    /// L1 cache size label.
    #[serde(default, alias = "L1_taille")]
    pub l1_size: String,
    /// Directory holding the run's `stats.txt`.
    #[serde(default, alias = "dossier_sortie")]
    pub output_dir: PathBuf,
}

/// One row of a metrics table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MetricsRecord {
    /// Dataset label.
    #[serde(default, rename = "jeu_donnees", alias = "dataset")]
    pub dataset: String,
    /// L1 cache size label.
    #[serde(default, rename = "L1_taille", alias = "l1_size")]
    pub l1_size: String,
    /// Measured CPI.
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub cpi: Option<f64>,
    /// Measured IPC.
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub ipc: Option<f64>,
    /// Core cycles.
    #[serde(
        default,
        rename = "numCycles",
        alias = "num_cycles",
        deserialize_with = "csv::invalid_option"
    )]
    pub num_cycles: Option<f64>,
    /// L1 instruction cache miss rate.
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub icache_miss: Option<f64>,
    /// L1 data cache miss rate.
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub dcache_miss: Option<f64>,
    /// L2 miss rate.
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub l2_miss: Option<f64>,
    /// Conditional-branch mispredict rate.
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub bp_cond_mispredict_rate: Option<f64>,
    /// BTB hit ratio.
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub btb_hit_ratio: Option<f64>,
    /// Committed mispredicts per predictor lookup.
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub bp_mispredict_rate: Option<f64>,
}

/// Column order of a written metrics table.
pub const METRICS_HEADER: [&str; 11] = [
    "jeu_donnees",
    "L1_taille",
    "cpi",
    "ipc",
    "numCycles",
    "icache_miss",
    "dcache_miss",
    "l2_miss",
    "bp_cond_mispredict_rate",
    "btb_hit_ratio",
    "bp_mispredict_rate",
];

impl MetricsRecord {
    /// Combines a run's identity with its summary.
    pub fn from_summary(run: &RunRecord, summary: &MissSummary) -> Self {
        Self {
            dataset: run.dataset.clone(),
            l1_size: run.l1_size.clone(),
            cpi: Some(summary.cpi),
            ipc: Some(summary.ipc),
            num_cycles: Some(summary.num_cycles),
            icache_miss: summary.icache_miss,
            dcache_miss: summary.dcache_miss,
            l2_miss: summary.l2_miss,
            bp_cond_mispredict_rate: summary.bp_cond_mispredict_rate,
            btb_hit_ratio: summary.btb_hit_ratio,
            bp_mispredict_rate: summary.bp_mispredict_rate,
        }
    }

    /// Numeric cells in [`METRICS_HEADER`] order, after the two label columns.
    pub const fn values(&self) -> [Option<f64>; 9] {
        [
            self.cpi,
            self.ipc,
            self.num_cycles,
            self.icache_miss,
            self.dcache_miss,
            self.l2_miss,
            self.bp_cond_mispredict_rate,
            self.btb_hit_ratio,
            self.bp_mispredict_rate,
        ]
    }
}

impl GainSource for MetricsRecord {
    fn axis_label(&self) -> &str {
        &self.l1_size
    }

    fn ipc(&self) -> Option<f64> {
        self.ipc
    }

    fn miss_metrics(&self) -> Vec<Option<f64>> {
        vec![self.icache_miss, self.dcache_miss]
    }
}

/// Reads a run table.
///
/// # Errors
///
/// [`AnalysisError::MissingInput`] if the file does not exist,
/// [`AnalysisError::EmptyTable`] if it has no data rows, [`AnalysisError::Csv`] on
/// malformed rows.
pub fn read_run_table(path: &Path) -> Result<Vec<RunRecord>> {
    read_table(path)
}

/// Reads a metrics table. Cells that are empty or not numeric become `None`.
///
/// # Errors
///
/// As [`read_run_table`].
pub fn read_metrics(path: &Path) -> Result<Vec<MetricsRecord>> {
    read_table(path)
}

fn read_table<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => AnalysisError::MissingInput {
            path: path.to_path_buf(),
        },
        _ => AnalysisError::io(path, e),
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);
    let rows = reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()
        .map_err(|e| AnalysisError::csv(path, e))?;
    if rows.is_empty() {
        return Err(AnalysisError::EmptyTable {
            path: path.to_path_buf(),
        });
    }
    Ok(rows)
}
