//! Counter-dump analysis for cycle-level CPU simulations.
//!
//! This crate turns the statistics files written by the simulator into report tables:
//! 1. **Parsing:** Projects a dump onto a declared counter set and validates it.
//! 2. **Metrics:** CPI attribution by memory level, MPKI, miss-rate and predictor summaries.
//! 3. **Comparison:** Baseline selection and relative gains across cache sizes.
//! 4. **Rendering:** Byte-stable CSV and typeset table fragments.
//! 5. **Orchestration:** Multi-run pipelines and atomic artifact writing.

/// Multi-run pipelines (CPI breakdown, metrics collection, gain and efficiency reports).
pub mod aggregate;
/// Baseline selection and relative gains.
pub mod baseline;
/// Report configuration (gain-table jobs, efficiency tables, defaults).
pub mod config;
/// Counter-dump parsing and validation.
pub mod counters;
/// CPI attribution model.
pub mod cpi;
/// Error types.
pub mod error;
/// Atomic artifact writing.
pub mod output;
/// Typed rows of the run and metrics tables.
pub mod records;
/// CSV and typeset table rendering.
pub mod render;
/// Counter name sets.
pub mod schema;
/// Unit-aware configuration-axis labels.
pub mod size;
/// Miss-rate and branch-predictor summary.
pub mod summary;

/// Report layout; use `ReportConfig::default()` or load from JSON.
pub use crate::config::ReportConfig;
/// Parsed projection of one counter dump.
pub use crate::counters::CounterStore;
/// CPI attribution model and its output row.
pub use crate::cpi::{CpiModel, ResultRow};
/// Crate error and result types.
pub use crate::error::{AnalysisError, Result};
/// Declared counter requirements.
pub use crate::schema::CounterSet;
