//! Baseline selection and relative gains across a configuration axis.
//!
//! Given all runs of one dataset (one row per cache size), this module picks the
//! reference row and expresses every row relative to it:
//! 1. **Selection:** The requested axis value when present, otherwise the smallest
//!    magnitude ([`SizeLabel`] ordering, unparseable labels last).
//! 2. **IPC gain:** `(ipc / base_ipc - 1) * 100`.
//! 3. **Miss reduction:** `(1 - m / base_m) * 100`, positive when the metric dropped.
//!
//! A gain is `None` when either value is absent or the baseline value is zero.

use std::collections::BTreeMap;

use crate::size::SizeLabel;

/// A row that can take part in a gain table.
pub trait GainSource {
    /// Configuration-axis label (cache size).
    fn axis_label(&self) -> &str;
    /// Instructions per cycle.
    fn ipc(&self) -> Option<f64>;
    /// Miss-rate-like metrics, lower is better, in a fixed order.
    fn miss_metrics(&self) -> Vec<Option<f64>>;
}

/// Gains of one row relative to the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct GainRow {
    /// Axis label of this row.
    pub label: String,
    /// Axis label of the baseline row.
    pub baseline: String,
    /// IPC gain in percent.
    pub ipc_gain: Option<f64>,
    /// Reduction of each miss metric in percent, same order as [`GainSource::miss_metrics`].
    pub miss_reductions: Vec<Option<f64>>,
}

/// Gain rows of one group, ordered by axis magnitude.
#[derive(Debug, Clone, PartialEq)]
pub struct GainTable {
    /// Axis label of the baseline actually used.
    pub baseline: String,
    /// One row per distinct axis label.
    pub rows: Vec<GainRow>,
}

/// Collapses rows sharing an axis label (the last one wins) and orders them by magnitude.
fn by_axis<T: GainSource>(group: &[T]) -> BTreeMap<SizeLabel, &T> {
    let mut map = BTreeMap::new();
    for row in group {
        let _ = map.insert(SizeLabel::parse(row.axis_label()), row);
    }
    map
}

/// Picks the baseline row of `group`.
///
/// Returns the row labelled `requested` if there is one, else the row with the
/// smallest axis magnitude, or `None` for an empty group.
pub fn select_baseline<'a, T: GainSource>(group: &'a [T], requested: &str) -> Option<&'a T> {
    let rows = by_axis(group);
    rows.iter()
        .find(|(label, _)| label.as_str() == requested)
        .or_else(|| rows.iter().next())
        .map(|(_, row)| *row)
}

/// Builds the gain table of `group` against `requested`, with fallback as in
/// [`select_baseline`]. Returns `None` for an empty group.
pub fn gain_table<T: GainSource>(group: &[T], requested: &str) -> Option<GainTable> {
    let base = select_baseline(group, requested)?;
    let baseline = base.axis_label().to_owned();
    let base_misses = base.miss_metrics();

    let rows = by_axis(group)
        .into_values()
        .map(|row| GainRow {
            label: row.axis_label().to_owned(),
            baseline: baseline.clone(),
            ipc_gain: ipc_gain(row.ipc(), base.ipc()),
            miss_reductions: row
                .miss_metrics()
                .into_iter()
                .zip(base_misses.iter().copied())
                .map(|(m, b)| reduction(m, b))
                .collect(),
        })
        .collect();

    Some(GainTable { baseline, rows })
}

/// Relative IPC gain in percent.
pub fn ipc_gain(ipc: Option<f64>, base: Option<f64>) -> Option<f64> {
    match (ipc, base) {
        (Some(v), Some(b)) if b != 0.0 => Some((v / b - 1.0) * 100.0),
        _ => None,
    }
}

/// Relative reduction of a lower-is-better metric in percent.
pub fn reduction(value: Option<f64>, base: Option<f64>) -> Option<f64> {
    match (value, base) {
        (Some(v), Some(b)) if b != 0.0 => Some((1.0 - v / b) * 100.0),
        _ => None,
    }
}
