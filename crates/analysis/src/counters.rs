//! Counter-dump parsing and validation.
//!
//! A counter dump lists one statistic per line as `<name> <value> [# comment]`.
//! This module provides:
//! 1. **Line parsing:** Recognises counter lines and ignores separators, blanks, and
//!    anything that does not match the pattern (multi-column distributions, headers).
//! 2. **Projection:** Keeps only the names a [`CounterSet`] asks for.
//! 3. **Validation:** Fails with every missing required name at once.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::schema::CounterSet;

/// Immutable projection of one counter dump.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterStore {
    source: String,
    values: BTreeMap<String, f64>,
}

impl CounterStore {
    /// Parses a dump from `reader`, keeping only counters named by `set`.
    ///
    /// Values are parsed as `f64` whatever their logical type. When a name occurs more
    /// than once (several statistics dumps in one file) the last occurrence wins.
    /// Bytes that are not valid UTF-8 are replaced rather than rejected.
    ///
    /// # Arguments
    ///
    /// * `reader` - Source of dump text.
    /// * `source` - Identifier used in error messages, usually the file path.
    /// * `set` - Counters to project.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::MissingCounter`] naming every required counter not found, or
    /// [`AnalysisError::Io`] if reading fails.
    pub fn parse<R: BufRead>(reader: R, source: &str, set: &CounterSet) -> Result<Self> {
        let mut values = BTreeMap::new();
        for raw in reader.split(b'\n') {
            let raw = raw.map_err(|e| AnalysisError::io(source, e))?;
            let line = String::from_utf8_lossy(&raw);
            if let Some((name, value)) = parse_line(&line).filter(|(name, _)| set.contains(name)) {
                let _ = values.insert(name.to_owned(), value);
            }
        }

        let missing: Vec<String> = set
            .required()
            .iter()
            .filter(|name| !values.contains_key(name.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(AnalysisError::MissingCounter {
                source_name: source.to_owned(),
                missing,
            });
        }

        debug!(source, counters = values.len(), "parsed counter dump");
        Ok(Self {
            source: source.to_owned(),
            values,
        })
    }

    /// Opens and parses the dump at `path`.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::MissingInput`] if the file does not exist, otherwise as
    /// [`CounterStore::parse`].
    pub fn from_path(path: &Path, set: &CounterSet) -> Result<Self> {
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => AnalysisError::MissingInput {
                path: path.to_path_buf(),
            },
            _ => AnalysisError::io(path, e),
        })?;
        Self::parse(BufReader::new(file), &path.display().to_string(), set)
    }

    /// Identifier of the dump this store was built from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Value of `name`, if it was projected and present.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Value of a counter the caller declared as required.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::MissingCounter`] if `name` is absent, which only happens when the
    /// caller asks for a name outside the set the store was parsed with.
    pub fn require(&self, name: &str) -> Result<f64> {
        self.get(name).ok_or_else(|| AnalysisError::MissingCounter {
            source_name: self.source.clone(),
            missing: vec![name.to_owned()],
        })
    }

    /// Number of counters held.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no counter was projected.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates counters in name order.
    pub fn counters(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Splits one dump line into a counter name and value.
///
/// Returns `None` for blank lines, `----` separators, and lines whose second field
/// is not a bare number followed by nothing but an optional `#` comment.
pub fn parse_line(line: &str) -> Option<(&str, f64)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with("----") {
        return None;
    }

    let key_end = line.find(char::is_whitespace)?;
    let (name, rest) = line.split_at(key_end);
    let rest = rest.trim_start();

    let value_end = rest
        .find(|c: char| !is_value_char(c))
        .unwrap_or(rest.len());
    if value_end == 0 {
        return None;
    }
    let (value, tail) = rest.split_at(value_end);
    let tail = tail.trim_start();
    if !tail.is_empty() && !tail.starts_with('#') {
        return None;
    }

    value.parse::<f64>().ok().map(|v| (name, v))
}

const fn is_value_char(c: char) -> bool {
    matches!(c, '0'..='9' | '-' | '+' | '.' | 'e' | 'E')
}
