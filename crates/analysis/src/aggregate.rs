//! Multi-run orchestration.
//!
//! Each function here drives one pipeline over a fixed list of inputs and returns
//! the rows or rendered text for a single artifact:
//! 1. **CPI breakdown:** run directories → [`ResultRow`]s. Any failure is fatal.
//! 2. **Metrics collection:** run table → [`MetricsRecord`]s. Runs without a
//!    `stats.txt` are skipped with a warning.
//! 3. **Gain report:** metrics tables → typeset gain tables per dataset.
//! 4. **Efficiency report:** metrics tables → typeset IPC/mW tables per core.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::baseline::gain_table;
use crate::config::ReportConfig;
use crate::counters::CounterStore;
use crate::cpi::{CpiModel, ResultRow};
use crate::error::{AnalysisError, Result};
use crate::records::{MetricsRecord, read_metrics, read_run_table};
use crate::render::latex::{self, EfficiencyRow};
use crate::size::SizeLabel;
use crate::summary::{self, MissSummary};

/// Name of the counter dump inside a run directory.
pub const STATS_FILE: &str = "stats.txt";

/// Case label of a run directory: its name with `prefix` removed.
pub fn case_label(dir: &str, prefix: &str) -> String {
    let name = Path::new(dir)
        .file_name()
        .map_or_else(|| dir.to_owned(), |n| n.to_string_lossy().into_owned());
    name.strip_prefix(prefix).unwrap_or(&name).to_owned()
}

/// Runs the CPI breakdown over `dirs` under `base`, in the given order.
///
/// # Arguments
///
/// * `base` - Directory holding the run directories.
/// * `dirs` - Run directory names; each must contain `stats.txt`.
/// * `prefix` - Prefix stripped from directory names to form case labels.
/// * `model` - Memory hierarchy to attribute CPI over.
///
/// # Errors
///
/// The first run that is missing, incomplete, or degenerate aborts the whole
/// breakdown, so no partial table is ever produced.
pub fn cpi_breakdown(
    base: &Path,
    dirs: &[String],
    prefix: &str,
    model: &CpiModel,
) -> Result<Vec<ResultRow>> {
    if !base.is_dir() {
        return Err(AnalysisError::MissingInput {
            path: base.to_path_buf(),
        });
    }
    let set = model.counter_set();
    dirs.iter()
        .map(|dir| {
            let path = base.join(dir).join(STATS_FILE);
            let store = CounterStore::from_path(&path, &set)?;
            let row = model.compute(&case_label(dir, prefix), &store)?;
            debug!(case = %row.case, cpi = row.cpi, "derived CPI breakdown");
            Ok(row)
        })
        .collect()
}

/// Picks an input table in `dir`: the alphabetically first `<prefix>*.csv` file.
///
/// A warning names the chosen file when several match.
///
/// # Errors
///
/// [`AnalysisError::MissingInput`] if `dir` does not exist or nothing matches,
/// [`AnalysisError::Io`] if it cannot be listed.
pub fn discover_input(dir: &Path, prefix: &str) -> Result<PathBuf> {
    let entries = fs::read_dir(dir).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => AnalysisError::MissingInput {
            path: dir.to_path_buf(),
        },
        _ => AnalysisError::io(dir, e),
    })?;
    let mut candidates: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(prefix) && n.ends_with(".csv"))
        })
        .collect();
    candidates.sort();
    let Some(first) = candidates.first().cloned() else {
        return Err(AnalysisError::MissingInput {
            path: dir.join(format!("{prefix}*.csv")),
        });
    };
    if candidates.len() > 1 {
        warn!(
            chosen = %first.display(),
            candidates = candidates.len(),
            "several input tables found, using the first"
        );
    }
    Ok(first)
}

/// Default metrics-table path for a run table: `resultats_X.csv` and `runs_X.csv`
/// become `metrics_X.csv`; any other name gets a `metrics_` prefix.
pub fn default_metrics_path(run_table: &Path) -> PathBuf {
    let name = run_table
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = ["resultats_", "runs_"]
        .iter()
        .find_map(|p| name.strip_prefix(p))
        .unwrap_or(&name);
    run_table.with_file_name(format!("metrics_{stem}"))
}

/// Collects summary metrics for every run listed in `run_table`.
///
/// Relative output directories are resolved against the table's own directory.
///
/// # Errors
///
/// Fails if the table is missing or empty, or if a present `stats.txt` lacks a
/// required counter. A missing `stats.txt` only skips its run.
pub fn collect_metrics(run_table: &Path) -> Result<Vec<MetricsRecord>> {
    let runs = read_run_table(run_table)?;
    let root = run_table.parent().unwrap_or_else(|| Path::new(""));
    let set = summary::counter_set();

    let mut records = Vec::with_capacity(runs.len());
    for run in &runs {
        let stats = root.join(&run.output_dir).join(STATS_FILE);
        if !stats.is_file() {
            warn!(path = %stats.display(), dataset = %run.dataset, l1 = %run.l1_size, "no stats.txt, skipping run");
            continue;
        }
        let store = CounterStore::from_path(&stats, &set)?;
        let summary = MissSummary::from_store(&store)?;
        records.push(MetricsRecord::from_summary(run, &summary));
    }
    info!(
        table = %run_table.display(),
        runs = runs.len(),
        collected = records.len(),
        "collected metrics"
    );
    Ok(records)
}

/// Renders every gain table of `config`, reading metrics relative to `root`.
///
/// The output opens with a comment header; `generated` adds a timestamp line.
///
/// # Errors
///
/// Fails if a configured metrics table is missing, empty, or malformed.
pub fn gain_report(
    config: &ReportConfig,
    root: &Path,
    generated: Option<NaiveDateTime>,
) -> Result<String> {
    let mut blocks = Vec::new();
    if let Some(at) = generated {
        blocks.push(format!("% Generated: {}", at.format("%Y-%m-%d %H:%M:%S")));
    }
    blocks.push("% Source: metrics_*.csv".to_owned());
    blocks.push(String::new());

    for job in &config.gain_tables {
        let path = root.join(&job.metrics);
        let records = read_metrics(&path)?;
        let datasets = config.order_datasets(records.iter().map(|r| r.dataset.as_str()));
        for dataset in &datasets {
            let group: Vec<MetricsRecord> = records
                .iter()
                .filter(|r| &r.dataset == dataset)
                .cloned()
                .collect();
            let Some(gains) = gain_table(&group, &job.baseline) else {
                continue;
            };
            if gains.baseline != job.baseline {
                warn!(
                    program = %job.program,
                    dataset = %dataset,
                    requested = %job.baseline,
                    used = %gains.baseline,
                    "baseline size not found, falling back to the smallest"
                );
            }
            blocks.push(latex::gain_table(
                &job.program,
                dataset,
                &job.cpu,
                &gains,
                config.decimal_separator,
            ));
        }
    }

    let mut text = blocks.join("\n").trim_end().to_owned();
    text.push('\n');
    Ok(text)
}

/// IPC by whole-kB L1 size, per dataset, read from one metrics table.
///
/// A missing table yields an empty map. Rows whose size is not in kB or whose IPC
/// is absent are ignored.
///
/// # Errors
///
/// Fails if the table exists but cannot be read.
pub fn ipc_by_size(path: &Path) -> Result<BTreeMap<String, BTreeMap<u64, f64>>> {
    let mut by_dataset: BTreeMap<String, BTreeMap<u64, f64>> = BTreeMap::new();
    let records = match read_metrics(path) {
        Ok(records) => records,
        Err(AnalysisError::MissingInput { .. } | AnalysisError::EmptyTable { .. }) => {
            debug!(path = %path.display(), "no metrics table, leaving columns empty");
            return Ok(by_dataset);
        }
        Err(e) => return Err(e),
    };
    for record in records {
        let (Some(kib), Some(ipc)) = (SizeLabel::parse(&record.l1_size).whole_kib(), record.ipc)
        else {
            continue;
        };
        if record.dataset.is_empty() {
            continue;
        }
        let _ = by_dataset
            .entry(record.dataset)
            .or_default()
            .insert(kib, ipc);
    }
    Ok(by_dataset)
}

/// Renders one energy-efficiency table per configured core.
///
/// # Errors
///
/// As [`ipc_by_size`].
pub fn efficiency_report(config: &ReportConfig, root: &Path) -> Result<String> {
    let titles: Vec<String> = config
        .efficiency
        .columns
        .iter()
        .map(|c| c.title.clone())
        .collect();

    let mut blocks = Vec::new();
    for budget in &config.efficiency.cores {
        let mut tables: BTreeMap<PathBuf, BTreeMap<String, BTreeMap<u64, f64>>> = BTreeMap::new();
        let mut columns = Vec::with_capacity(config.efficiency.columns.len());
        for column in &config.efficiency.columns {
            let path = root.join(column.metrics_for(&budget.core));
            if !tables.contains_key(&path) {
                let table = ipc_by_size(&path)?;
                let _ = tables.insert(path.clone(), table);
            }
            columns.push(
                tables
                    .get(&path)
                    .and_then(|t| t.get(&column.dataset))
                    .cloned()
                    .unwrap_or_default(),
            );
        }

        let sizes: BTreeSet<u64> = columns.iter().flat_map(|c| c.keys().copied()).collect();
        let rows: Vec<EfficiencyRow> = sizes
            .into_iter()
            .map(|kib| EfficiencyRow {
                kib,
                cells: columns
                    .iter()
                    .map(|c| c.get(&kib).map(|ipc| ipc / budget.p_max_mw))
                    .collect(),
            })
            .collect();

        blocks.push(latex::efficiency_table(
            &budget.label,
            budget.p_max_mw,
            &titles,
            &rows,
            config.decimal_separator,
        ));
    }

    let mut text = blocks.join("\n").trim_end().to_owned();
    text.push('\n');
    Ok(text)
}
