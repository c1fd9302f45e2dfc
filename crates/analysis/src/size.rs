//! Configuration-axis labels with unit-aware ordering.
//!
//! Cache sizes appear in run tables as free text (`1kB`, `512kB`, `2MB`). A
//! [`SizeLabel`] keeps the original text and a magnitude in KiB so that labels
//! order numerically. Labels that do not parse order after every valid one.

use std::cmp::Ordering;
use std::fmt;

const UNITS: [(&str, f64); 3] = [("kb", 1.0), ("mb", 1024.0), ("gb", 1024.0 * 1024.0)];

/// A configuration value such as a cache size.
#[derive(Debug, Clone)]
pub struct SizeLabel {
    text: String,
    kib: f64,
}

impl SizeLabel {
    /// Parses `text`. Never fails: unparseable text gets an infinite magnitude.
    pub fn parse(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            kib: magnitude_kib(text),
        }
    }

    /// The label as written.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Magnitude in KiB, `f64::INFINITY` when the label does not parse.
    pub const fn kib(&self) -> f64 {
        self.kib
    }

    /// Whole number of KiB for labels written in kB, truncating fractions.
    pub fn whole_kib(&self) -> Option<u64> {
        let lower = self.text.trim().to_lowercase();
        let number = lower.strip_suffix("kb")?.trim();
        let value = number.parse::<f64>().ok()?;
        (value.is_finite() && value >= 0.0).then(|| value.trunc() as u64)
    }

    /// Typeset form: `32kB` becomes `32\,kB`; other labels are returned trimmed.
    pub fn typeset(&self) -> String {
        let text = self.text.trim();
        let split = text.len().saturating_sub(2);
        match (text.get(..split), text.get(split..)) {
            (Some(number), Some(unit)) if unit.eq_ignore_ascii_case("kb") => {
                format!("{}\\,kB", number.trim())
            }
            _ => text.to_owned(),
        }
    }
}

/// Magnitude of a size label in KiB. Bare numbers are taken as KiB.
pub fn magnitude_kib(text: &str) -> f64 {
    let lower = text.trim().to_lowercase();
    let (number, factor) = UNITS
        .iter()
        .find_map(|(suffix, factor)| lower.strip_suffix(suffix).map(|n| (n, *factor)))
        .unwrap_or((lower.as_str(), 1.0));
    match number.trim().parse::<f64>() {
        Ok(value) if !value.is_nan() => value * factor,
        _ => f64::INFINITY,
    }
}

impl Ord for SizeLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.kib
            .total_cmp(&other.kib)
            .then_with(|| self.text.cmp(&other.text))
    }
}

impl PartialOrd for SizeLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SizeLabel {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SizeLabel {}

impl fmt::Display for SizeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
