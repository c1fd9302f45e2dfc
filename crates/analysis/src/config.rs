//! Report configuration.
//!
//! This module describes which tables a report contains. It provides:
//! 1. **Defaults:** The standard layout (Dijkstra and Blowfish on Cortex-A7 and Cortex-A15).
//! 2. **Structures:** Gain-table jobs and energy-efficiency tables.
//! 3. **Loading:** JSON deserialization where every field may be omitted.
//!
//! Metrics paths are relative to a root directory supplied at run time. In
//! efficiency columns the placeholder `{core}` is replaced by the core name.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AnalysisError, Result};
use crate::render::DecimalSeparator;

/// Default values for report generation.
mod defaults {
    /// Datasets listed first, in this order; others follow alphabetically.
    pub const PREFERRED_DATASETS: [&str; 2] = ["small", "large"];

    /// Power budget of the little core in mW.
    pub const A7_P_MAX_MW: f64 = 100.0;

    /// Power budget of the big core in mW.
    pub const A15_P_MAX_MW: f64 = 500.0;
}

/// Root configuration for the gain and efficiency reports.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportConfig {
    /// Gain tables to emit, in order.
    #[serde(default = "ReportConfig::default_gain_tables")]
    pub gain_tables: Vec<GainJob>,

    /// Dataset ordering hint.
    #[serde(default = "ReportConfig::default_preferred_datasets")]
    pub preferred_datasets: Vec<String>,

    /// Energy-efficiency tables.
    #[serde(default)]
    pub efficiency: EfficiencyConfig,

    /// Decimal separator for typeset numbers.
    #[serde(default = "ReportConfig::default_separator")]
    pub decimal_separator: DecimalSeparator,
}

impl ReportConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::MissingInput`] if the file does not exist,
    /// [`AnalysisError::Config`] if it is not valid configuration JSON.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(AnalysisError::MissingInput {
                path: path.to_path_buf(),
            });
        }
        let text = fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
        serde_json::from_str(&text).map_err(|e| AnalysisError::Config {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn default_gain_tables() -> Vec<GainJob> {
        [
            ("Dijkstra", "Cortex-A7", "dijkstra", "A7", "1kB"),
            ("Dijkstra", "Cortex-A15", "dijkstra", "A15", "2kB"),
            ("Blowfish", "Cortex-A7", "blowfish", "A7", "1kB"),
            ("Blowfish", "Cortex-A15", "blowfish", "A15", "2kB"),
        ]
        .into_iter()
        .map(|(program, cpu, dir, core, baseline)| GainJob {
            program: program.to_owned(),
            cpu: cpu.to_owned(),
            metrics: PathBuf::from(format!("{dir}/plots_L1_{core}/metrics_L1_{core}_{dir}.csv")),
            baseline: baseline.to_owned(),
        })
        .collect()
    }

    fn default_preferred_datasets() -> Vec<String> {
        defaults::PREFERRED_DATASETS
            .iter()
            .map(|s| (*s).to_owned())
            .collect()
    }

    const fn default_separator() -> DecimalSeparator {
        DecimalSeparator::Comma
    }

    /// Orders `datasets`: preferred ones first in their configured order, then the
    /// rest alphabetically. Duplicates and empty names are dropped.
    pub fn order_datasets<'a, I>(&self, datasets: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut rest: Vec<String> = datasets
            .into_iter()
            .filter(|d| !d.is_empty())
            .map(str::to_owned)
            .collect();
        rest.sort();
        rest.dedup();
        let mut ordered: Vec<String> = self
            .preferred_datasets
            .iter()
            .filter(|p| rest.contains(p))
            .cloned()
            .collect();
        rest.retain(|d| !ordered.contains(d));
        ordered.append(&mut rest);
        ordered
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            gain_tables: Self::default_gain_tables(),
            preferred_datasets: Self::default_preferred_datasets(),
            efficiency: EfficiencyConfig::default(),
            decimal_separator: Self::default_separator(),
        }
    }
}

/// One gain table source: a metrics CSV and its requested baseline size.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GainJob {
    /// Program name for the caption.
    pub program: String,
    /// CPU model for the caption.
    pub cpu: String,
    /// Metrics CSV, relative to the report root.
    pub metrics: PathBuf,
    /// Requested baseline L1 size; the smallest size is used if absent from the data.
    pub baseline: String,
}

/// Energy-efficiency report layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EfficiencyConfig {
    /// One table per core.
    #[serde(default = "EfficiencyConfig::default_cores")]
    pub cores: Vec<CoreBudget>,
    /// Columns shared by every core table.
    #[serde(default = "EfficiencyConfig::default_columns")]
    pub columns: Vec<EfficiencyColumn>,
}

impl EfficiencyConfig {
    fn default_cores() -> Vec<CoreBudget> {
        vec![
            CoreBudget {
                core: "A7".to_owned(),
                label: "Cortex-A7".to_owned(),
                p_max_mw: defaults::A7_P_MAX_MW,
            },
            CoreBudget {
                core: "A15".to_owned(),
                label: "Cortex-A15".to_owned(),
                p_max_mw: defaults::A15_P_MAX_MW,
            },
        ]
    }

    fn default_columns() -> Vec<EfficiencyColumn> {
        let mut columns = Vec::new();
        for (program, dir) in [("Dijkstra", "dijkstra"), ("Blowfish", "blowfish")] {
            for dataset in defaults::PREFERRED_DATASETS {
                columns.push(EfficiencyColumn {
                    title: format!("{program} {dataset}"),
                    metrics: format!("{dir}/plots_L1_{{core}}/metrics_L1_{{core}}_{dir}.csv"),
                    dataset: dataset.to_owned(),
                });
            }
        }
        columns
    }
}

impl Default for EfficiencyConfig {
    fn default() -> Self {
        Self {
            cores: Self::default_cores(),
            columns: Self::default_columns(),
        }
    }
}

/// A core and its power budget.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoreBudget {
    /// Short core name substituted for `{core}` in metrics paths.
    pub core: String,
    /// Display name for the caption.
    pub label: String,
    /// Maximum power in mW.
    pub p_max_mw: f64,
}

/// One column of an efficiency table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EfficiencyColumn {
    /// Column header.
    pub title: String,
    /// Metrics CSV path template, relative to the report root.
    pub metrics: String,
    /// Dataset selected from that CSV.
    pub dataset: String,
}

impl EfficiencyColumn {
    /// Metrics path for `core`.
    pub fn metrics_for(&self, core: &str) -> PathBuf {
        PathBuf::from(self.metrics.replace("{core}", core))
    }
}
