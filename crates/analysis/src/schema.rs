//! Counter name sets.
//!
//! Every computation declares the counters it depends on as a [`CounterSet`] and
//! passes it to [`CounterStore::parse`](crate::counters::CounterStore::parse).
//! Sets are plain values, so several computations with different requirements can
//! run side by side in one process.

use std::collections::BTreeSet;

/// Canonical counter names as emitted by the simulator.
pub mod names {
    /// Total simulated ticks.
    pub const SIM_TICKS: &str = "simTicks";
    /// Ticks per simulated second.
    pub const SIM_FREQ: &str = "simFreq";
    /// Core clock cycles.
    pub const NUM_CYCLES: &str = "system.cpu.numCycles";
    /// Measured cycles per instruction.
    pub const CPI: &str = "system.cpu.cpi";
    /// Measured instructions per cycle.
    pub const IPC: &str = "system.cpu.ipc";
    /// Executed instructions.
    pub const NUM_INSTS: &str = "system.cpu.executeStats0.numInsts";

    /// L1 data cache demand misses.
    pub const DCACHE_DEMAND_MISSES: &str = "system.cpu.dcache.demandMisses::total";
    /// L1 data cache total demand-miss latency (ticks).
    pub const DCACHE_DEMAND_MISS_LATENCY: &str = "system.cpu.dcache.demandMissLatency::total";
    /// L1 data cache average demand-miss latency (ticks).
    pub const DCACHE_DEMAND_AVG_MISS_LATENCY: &str =
        "system.cpu.dcache.demandAvgMissLatency::total";
    /// L2 demand misses.
    pub const L2_DEMAND_MISSES: &str = "system.l2cache.demandMisses::total";
    /// L2 total demand-miss latency (ticks).
    pub const L2_DEMAND_MISS_LATENCY: &str = "system.l2cache.demandMissLatency::total";
    /// L2 average demand-miss latency (ticks).
    pub const L2_DEMAND_AVG_MISS_LATENCY: &str = "system.l2cache.demandAvgMissLatency::total";

    /// L1 instruction cache overall miss rate.
    pub const ICACHE_MISS_RATE: &str = "system.cpu.icache.overallMissRate::total";
    /// L1 data cache overall miss rate.
    pub const DCACHE_MISS_RATE: &str = "system.cpu.dcache.overallMissRate::total";
    /// L2 overall miss rate.
    pub const L2_MISS_RATE: &str = "system.l2cache.overallMissRate::total";
    /// Branch target buffer hit ratio.
    pub const BTB_HIT_RATIO: &str = "system.cpu.branchPred.BTBHitRatio";
    /// Conditional branches predicted.
    pub const COND_PREDICTED: &str = "system.cpu.branchPred.condPredicted";
    /// Conditional branches predicted incorrectly.
    pub const COND_INCORRECT: &str = "system.cpu.branchPred.condIncorrect";
    /// Branch predictor lookups.
    pub const BP_LOOKUPS: &str = "system.cpu.branchPred.lookups";
    /// Branch mispredicts detected at commit.
    pub const BRANCH_MISPREDICTS: &str = "system.cpu.commit.branchMispredicts";
}

/// The counters one computation projects out of a dump.
///
/// `required` names must all be present or parsing fails; `optional` names are
/// kept when present and silently absent otherwise. Anything else in the dump is
/// dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterSet {
    required: Vec<String>,
    optional: Vec<String>,
    lookup: BTreeSet<String>,
}

impl CounterSet {
    /// Creates a set with only required counters.
    ///
    /// Duplicate names are collapsed; declaration order is kept for error reporting.
    pub fn new<I, S>(required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self {
            required: Vec::new(),
            optional: Vec::new(),
            lookup: BTreeSet::new(),
        };
        for name in required {
            let name = name.into();
            if set.lookup.insert(name.clone()) {
                set.required.push(name);
            }
        }
        set
    }

    /// Adds best-effort counters that are projected when present.
    #[must_use]
    pub fn with_optional<I, S>(mut self, optional: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in optional {
            let name = name.into();
            if self.lookup.insert(name.clone()) {
                self.optional.push(name);
            }
        }
        self
    }

    /// Required names in declaration order.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Optional names in declaration order.
    pub fn optional(&self) -> &[String] {
        &self.optional
    }

    /// Returns true if `name` is projected by this set.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains(name)
    }

    /// Total number of projected names.
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    /// Returns true if the set projects nothing.
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }
}
