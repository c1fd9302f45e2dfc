//! CPI attribution by memory-hierarchy level.
//!
//! Converts tick-denominated miss latencies into cycles and splits the measured CPI
//! into memory stall contributions. It provides:
//! 1. **Model:** [`CpiModel`], an ordered list of cache levels, first level closest to the core.
//! 2. **Per-level metrics:** MPKI and miss latency in cycles ([`LevelMetrics`]).
//! 3. **Attribution:** Total memory, first-level-only, and deepest-level ΔCPI with
//!    their share of the measured CPI ([`ResultRow`]).
//!
//! The split assumes deeper-level miss latency is nested inside the first level's
//! miss latency, as in a blocking hierarchy without overlapping misses.

use crate::counters::CounterStore;
use crate::error::{AnalysisError, Result};
use crate::schema::{CounterSet, names};

/// Counter names describing one cache level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelCounters {
    /// Short label used in column headers (`l1`, `l2`, ...).
    pub label: String,
    /// Demand-miss count.
    pub misses: String,
    /// Total demand-miss latency in ticks.
    pub miss_latency: String,
    /// Average demand-miss latency in ticks.
    pub avg_miss_latency: String,
}

impl LevelCounters {
    /// Builds the counter names for a gem5-style cache object path such as
    /// `system.l2cache`.
    pub fn for_cache(label: &str, object: &str) -> Self {
        Self {
            label: label.to_owned(),
            misses: format!("{object}.demandMisses::total"),
            miss_latency: format!("{object}.demandMissLatency::total"),
            avg_miss_latency: format!("{object}.demandAvgMissLatency::total"),
        }
    }
}

/// Ordered memory hierarchy for CPI attribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpiModel {
    levels: Vec<LevelCounters>,
}

impl CpiModel {
    /// Creates a model from levels ordered from the core outwards.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::InvalidModel`] if fewer than two levels are given or two
    /// levels share a label.
    pub fn new(levels: Vec<LevelCounters>) -> Result<Self> {
        if levels.len() < 2 {
            return Err(AnalysisError::InvalidModel(format!(
                "need at least two memory levels, got {}",
                levels.len()
            )));
        }
        for (i, level) in levels.iter().enumerate() {
            if levels[..i].iter().any(|l| l.label == level.label) {
                return Err(AnalysisError::InvalidModel(format!(
                    "duplicate level label '{}'",
                    level.label
                )));
            }
        }
        Ok(Self { levels })
    }

    /// L1 data cache followed by the unified L2.
    pub fn l1d_l2() -> Self {
        Self {
            levels: vec![
                LevelCounters {
                    label: "l1".to_owned(),
                    misses: names::DCACHE_DEMAND_MISSES.to_owned(),
                    miss_latency: names::DCACHE_DEMAND_MISS_LATENCY.to_owned(),
                    avg_miss_latency: names::DCACHE_DEMAND_AVG_MISS_LATENCY.to_owned(),
                },
                LevelCounters {
                    label: "l2".to_owned(),
                    misses: names::L2_DEMAND_MISSES.to_owned(),
                    miss_latency: names::L2_DEMAND_MISS_LATENCY.to_owned(),
                    avg_miss_latency: names::L2_DEMAND_AVG_MISS_LATENCY.to_owned(),
                },
            ],
        }
    }

    /// Levels from the core outwards.
    pub fn levels(&self) -> &[LevelCounters] {
        &self.levels
    }

    /// Label of the first level.
    pub fn first_label(&self) -> &str {
        &self.levels[0].label
    }

    /// Label of the deepest level.
    pub fn deepest_label(&self) -> &str {
        &self.levels[self.levels.len() - 1].label
    }

    /// Counters this model reads, all required.
    pub fn counter_set(&self) -> CounterSet {
        let core = [
            names::SIM_TICKS,
            names::SIM_FREQ,
            names::NUM_CYCLES,
            names::CPI,
            names::IPC,
            names::NUM_INSTS,
        ]
        .into_iter()
        .map(str::to_owned);
        let levels = self.levels.iter().flat_map(|l| {
            [
                l.misses.clone(),
                l.miss_latency.clone(),
                l.avg_miss_latency.clone(),
            ]
        });
        CounterSet::new(core.chain(levels))
    }

    /// Derives one [`ResultRow`] from a store parsed with [`CpiModel::counter_set`].
    ///
    /// # Arguments
    ///
    /// * `case` - Label of the run.
    /// * `store` - Parsed counters.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::DivisionDomain`] if the cycle count, instruction count, or
    /// measured CPI is zero; [`AnalysisError::MissingCounter`] if the store lacks a
    /// counter of this model.
    pub fn compute(&self, case: &str, store: &CounterStore) -> Result<ResultRow> {
        let sim_ticks = store.require(names::SIM_TICKS)?;
        let sim_freq = store.require(names::SIM_FREQ)?;
        let num_cycles = store.require(names::NUM_CYCLES)?;
        let num_insts = store.require(names::NUM_INSTS)?;
        let cpi = store.require(names::CPI)?;
        let ipc = store.require(names::IPC)?;

        for (value, name) in [
            (num_cycles, names::NUM_CYCLES),
            (num_insts, names::NUM_INSTS),
            (cpi, names::CPI),
        ] {
            if value == 0.0 {
                return Err(AnalysisError::DivisionDomain {
                    source_name: store.source().to_owned(),
                    denominator: name.to_owned(),
                });
            }
        }

        let ticks_per_cycle = sim_ticks / num_cycles;
        if ticks_per_cycle == 0.0 {
            return Err(AnalysisError::DivisionDomain {
                source_name: store.source().to_owned(),
                denominator: names::SIM_TICKS.to_owned(),
            });
        }

        let mut levels = Vec::with_capacity(self.levels.len());
        for counters in &self.levels {
            let misses = store.require(&counters.misses)?;
            let miss_latency_ticks = store.require(&counters.miss_latency)?;
            let avg_miss_latency_ticks = store.require(&counters.avg_miss_latency)?;
            levels.push(LevelMetrics {
                label: counters.label.clone(),
                misses: misses as u64,
                avg_miss_latency_ticks,
                miss_latency_ticks: miss_latency_ticks as u64,
                avg_miss_latency_cycles: avg_miss_latency_ticks / ticks_per_cycle,
                miss_latency_cycles: miss_latency_ticks / ticks_per_cycle,
                mpki: 1000.0 * misses / num_insts,
            });
        }

        let delta_cpi_mem_total = levels[0].miss_latency_cycles / num_insts;
        let delta_cpi_deepest = levels[levels.len() - 1].miss_latency_cycles / num_insts;
        let delta_cpi_first_only = (delta_cpi_mem_total - delta_cpi_deepest).max(0.0);

        Ok(ResultRow {
            case: case.to_owned(),
            cpi,
            ipc,
            num_insts: num_insts as u64,
            num_cycles: num_cycles as u64,
            sim_ticks: sim_ticks as u64,
            sim_freq: sim_freq as u64,
            ticks_per_cycle,
            levels,
            delta_cpi_mem_total,
            delta_cpi_first_only,
            delta_cpi_deepest,
            pct_cpi_mem_total: 100.0 * delta_cpi_mem_total / cpi,
            pct_cpi_first_only: 100.0 * delta_cpi_first_only / cpi,
            pct_cpi_deepest: 100.0 * delta_cpi_deepest / cpi,
        })
    }
}

impl Default for CpiModel {
    fn default() -> Self {
        Self::l1d_l2()
    }
}

/// Derived metrics for one cache level of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelMetrics {
    /// Level label from the model.
    pub label: String,
    /// Demand misses.
    pub misses: u64,
    /// Average demand-miss latency in ticks.
    pub avg_miss_latency_ticks: f64,
    /// Total demand-miss latency in ticks.
    pub miss_latency_ticks: u64,
    /// Average demand-miss latency in core cycles.
    pub avg_miss_latency_cycles: f64,
    /// Total demand-miss latency in core cycles.
    pub miss_latency_cycles: f64,
    /// Misses per thousand instructions.
    pub mpki: f64,
}

/// All derived metrics for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    /// Run label.
    pub case: String,
    /// Measured cycles per instruction.
    pub cpi: f64,
    /// Measured instructions per cycle.
    pub ipc: f64,
    /// Executed instructions.
    pub num_insts: u64,
    /// Core cycles.
    pub num_cycles: u64,
    /// Simulated ticks.
    pub sim_ticks: u64,
    /// Ticks per simulated second.
    pub sim_freq: u64,
    /// Ticks per core cycle.
    pub ticks_per_cycle: f64,
    /// Per-level metrics, first level first.
    pub levels: Vec<LevelMetrics>,
    /// Stall CPI visible at the first level, deeper levels included.
    pub delta_cpi_mem_total: f64,
    /// Stall CPI attributed to the first level alone, never negative.
    pub delta_cpi_first_only: f64,
    /// Stall CPI attributed to misses of the deepest level.
    pub delta_cpi_deepest: f64,
    /// `delta_cpi_mem_total` as a percentage of measured CPI.
    pub pct_cpi_mem_total: f64,
    /// `delta_cpi_first_only` as a percentage of measured CPI.
    pub pct_cpi_first_only: f64,
    /// `delta_cpi_deepest` as a percentage of measured CPI.
    pub pct_cpi_deepest: f64,
}

impl ResultRow {
    /// Metrics of the level labelled `label`.
    pub fn level(&self, label: &str) -> Option<&LevelMetrics> {
        self.levels.iter().find(|l| l.label == label)
    }
}
