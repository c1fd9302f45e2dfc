//! Table rendering.
//!
//! Two independent representations of the same rows:
//! 1. **Delimited text** ([`csv`]): fixed headers and fixed decimal precision, so
//!    identical input always yields byte-identical output.
//! 2. **Typeset fragments** ([`latex`]): `table` environments ready to `\input`
//!    into a report, with locale-aware decimal separators.
//!
//! Renderers only read their input and return text; writing is left to
//! [`crate::output`].

pub mod csv;
pub mod latex;

use serde::Deserialize;

/// Decimal separator used in typeset numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecimalSeparator {
    /// `12.34`
    #[default]
    Point,
    /// `12,34`
    Comma,
}

impl DecimalSeparator {
    /// The separator character.
    pub const fn as_char(self) -> char {
        match self {
            Self::Point => '.',
            Self::Comma => ',',
        }
    }
}

/// Formats `value` with `decimals` fixed decimals.
pub fn fixed(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

/// Formats with six decimals, then drops trailing zeros and a trailing point.
///
/// `None` renders as an empty string.
pub fn trimmed(value: Option<f64>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    let text = fixed(value, 6);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "-0" => "0".to_owned(),
        _ => text.to_owned(),
    }
}
