//! Error definitions for the analysis pipeline.
//!
//! This module defines the failure modes of every stage. It provides:
//! 1. **Validation errors:** Missing counters, degenerate runs, and malformed models.
//! 2. **Input errors:** Missing files and directories, unreadable CSV tables.
//! 3. **I/O errors:** Wrapped `std::io::Error`s tagged with the offending path.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors raised while parsing counter dumps, deriving metrics, or rendering tables.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// One or more required counters were absent from a dump.
    ///
    /// `missing` lists every absent name, in the order the counter set declares them.
    #[error("missing required counters in {source_name}: {}", .missing.join(", "))]
    MissingCounter {
        /// Identifier of the dump (usually its path).
        source_name: String,
        /// All required names that were not found.
        missing: Vec<String>,
    },

    /// A denominator counter was zero, so the run is degenerate.
    #[error("{denominator} is zero in {source_name}; cannot derive metrics from an empty run")]
    DivisionDomain {
        /// Identifier of the dump.
        source_name: String,
        /// Name of the counter that was zero.
        denominator: String,
    },

    /// An expected input file or directory does not exist.
    #[error("input not found: {}", .path.display())]
    MissingInput {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// A CSV table could not be read or written.
    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        /// Table being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: csv::Error,
    },

    /// A report configuration file could not be deserialized.
    #[error("invalid report configuration {}: {source}", .path.display())]
    Config {
        /// Configuration file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// A table had a header but no data rows.
    #[error("table has no rows: {}", .path.display())]
    EmptyTable {
        /// Table being read.
        path: PathBuf,
    },

    /// A CPI model was constructed with an unusable level list.
    #[error("invalid CPI model: {0}")]
    InvalidModel(String),
}

impl AnalysisError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wraps a CSV error with the table it occurred on.
    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}
