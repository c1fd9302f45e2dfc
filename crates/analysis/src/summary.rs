//! Miss-rate and branch-predictor summary.
//!
//! A lighter computation than CPI attribution: core throughput is required, while
//! cache miss rates and predictor counters are taken when the dump has them.

use crate::counters::CounterStore;
use crate::error::Result;
use crate::schema::{CounterSet, names};

/// Counters read by [`MissSummary::from_store`].
pub fn counter_set() -> CounterSet {
    CounterSet::new([names::CPI, names::IPC, names::NUM_CYCLES]).with_optional([
        names::ICACHE_MISS_RATE,
        names::DCACHE_MISS_RATE,
        names::L2_MISS_RATE,
        names::BTB_HIT_RATIO,
        names::COND_PREDICTED,
        names::COND_INCORRECT,
        names::BP_LOOKUPS,
        names::BRANCH_MISPREDICTS,
    ])
}

/// Summary metrics of one run. Absent counters stay `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MissSummary {
    /// Measured cycles per instruction.
    pub cpi: f64,
    /// Measured instructions per cycle.
    pub ipc: f64,
    /// Core cycles.
    pub num_cycles: f64,
    /// L1 instruction cache miss rate.
    pub icache_miss: Option<f64>,
    /// L1 data cache miss rate.
    pub dcache_miss: Option<f64>,
    /// L2 miss rate.
    pub l2_miss: Option<f64>,
    /// Conditional-branch mispredict rate.
    pub bp_cond_mispredict_rate: Option<f64>,
    /// BTB hit ratio.
    pub btb_hit_ratio: Option<f64>,
    /// Committed mispredicts per predictor lookup.
    pub bp_mispredict_rate: Option<f64>,
}

impl MissSummary {
    /// Builds the summary from a store parsed with [`counter_set`].
    ///
    /// # Errors
    ///
    /// [`AnalysisError::MissingCounter`](crate::AnalysisError::MissingCounter) if a
    /// required counter is absent from `store`.
    pub fn from_store(store: &CounterStore) -> Result<Self> {
        Ok(Self {
            cpi: store.require(names::CPI)?,
            ipc: store.require(names::IPC)?,
            num_cycles: store.require(names::NUM_CYCLES)?,
            icache_miss: store.get(names::ICACHE_MISS_RATE),
            dcache_miss: store.get(names::DCACHE_MISS_RATE),
            l2_miss: store.get(names::L2_MISS_RATE),
            bp_cond_mispredict_rate: ratio(
                store.get(names::COND_INCORRECT),
                store.get(names::COND_PREDICTED),
            ),
            btb_hit_ratio: store.get(names::BTB_HIT_RATIO),
            bp_mispredict_rate: ratio(
                store.get(names::BRANCH_MISPREDICTS),
                store.get(names::BP_LOOKUPS),
            ),
        })
    }
}

/// `num / den`, defined only when both are present and `den` is positive.
pub fn ratio(num: Option<f64>, den: Option<f64>) -> Option<f64> {
    match (num, den) {
        (Some(n), Some(d)) if d > 0.0 => Some(n / d),
        _ => None,
    }
}
