//! Typeset table fragments.
//!
//! Each renderer returns a self-contained `table` environment, not a full document.

use super::{DecimalSeparator, fixed};
use crate::baseline::GainTable;
use crate::cpi::ResultRow;
use crate::size::SizeLabel;

/// Rounded values smaller than this are shown as zero.
const ZERO_DEAD_ZONE: f64 = 0.005;

/// Nudge applied before rounding so that halves stored just below .5 round up.
const ROUNDING_NUDGE: f64 = 1e-12;

/// Cell text for an absent value.
const ABSENT: &str = "--";

/// Formats a percentage with two decimals.
///
/// Values that round to less than [`ZERO_DEAD_ZONE`] in magnitude are printed as
/// exactly zero, so cancellation noise never shows up as `-0,00`.
pub fn percent(value: f64, separator: DecimalSeparator) -> String {
    let mut rounded = ((value + ROUNDING_NUDGE) * 100.0).round() / 100.0;
    if rounded.abs() < ZERO_DEAD_ZONE {
        rounded = 0.0;
    }
    localize(&fixed(rounded, 2), separator)
}

/// Formats with fixed decimals and the given separator.
pub fn number(value: f64, decimals: usize, separator: DecimalSeparator) -> String {
    localize(&fixed(value, decimals), separator)
}

fn localize(text: &str, separator: DecimalSeparator) -> String {
    match separator {
        DecimalSeparator::Point => text.to_owned(),
        DecimalSeparator::Comma => text.replace('.', ","),
    }
}

/// Escapes characters that are special in running text.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Common `table` / `tabular` scaffolding.
#[derive(Debug)]
struct Frame<'a> {
    columns: &'a str,
    header: Vec<String>,
    caption: String,
    label: Option<String>,
    tight: bool,
}

impl Frame<'_> {
    fn render(&self, body: &[String]) -> String {
        let mut lines = vec![
            "\\begin{table}[h]".to_owned(),
            "\\centering".to_owned(),
            "\\footnotesize".to_owned(),
        ];
        if self.tight {
            lines.push("\\setlength{\\tabcolsep}{3pt}".to_owned());
        }
        lines.push("\\resizebox{\\linewidth}{!}{%".to_owned());
        lines.push(format!("\\begin{{tabular}}{{{}}}", self.columns));
        lines.push("\\hline".to_owned());
        let header: Vec<String> = self
            .header
            .iter()
            .map(|h| format!("\\textbf{{{h}}}"))
            .collect();
        lines.push(format!("{} \\\\", header.join(" & ")));
        lines.push("\\hline".to_owned());
        lines.extend(body.iter().cloned());
        lines.push("\\hline".to_owned());
        lines.push("\\end{tabular}".to_owned());
        lines.push("}".to_owned());
        lines.push(format!("\\caption{{{}}}", self.caption));
        if let Some(label) = &self.label {
            lines.push(format!("\\label{{{label}}}"));
        }
        lines.push("\\end{table}".to_owned());
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }
}

fn row(cells: &[String]) -> String {
    format!("{} \\\\", cells.join(" & "))
}

/// CPI impact table: one row per run with the memory share of CPI.
///
/// `first` and `deepest` are the level labels of the model the rows come from.
pub fn cpi_table(
    rows: &[ResultRow],
    first: &str,
    deepest: &str,
    caption: &str,
    separator: DecimalSeparator,
) -> String {
    let pct = |v: f64| format!("{}\\%", percent(v, separator));
    let body: Vec<String> = rows
        .iter()
        .map(|r| {
            row(&[
                escape(&r.case),
                number(r.cpi, 3, separator),
                pct(r.pct_cpi_mem_total),
                pct(r.pct_cpi_first_only),
                pct(r.pct_cpi_deepest),
            ])
        })
        .collect();
    Frame {
        columns: "l|c|c|c|c",
        header: vec![
            "Case".to_owned(),
            "CPI".to_owned(),
            "\\%CPI mem total".to_owned(),
            format!("\\%CPI {}-only (approx)", first.to_uppercase()),
            format!("\\%CPI {}-miss", deepest.to_uppercase()),
        ],
        caption: escape(caption),
        label: None,
        tight: true,
    }
    .render(&body)
}

/// Gain table of one program, dataset, and CPU against its baseline size.
pub fn gain_table(
    program: &str,
    dataset: &str,
    cpu: &str,
    gains: &GainTable,
    separator: DecimalSeparator,
) -> String {
    let cell = |v: Option<f64>| v.map_or_else(|| ABSENT.to_owned(), |v| percent(v, separator));
    let body: Vec<String> = gains
        .rows
        .iter()
        .map(|g| {
            let mut cells = vec![SizeLabel::parse(&g.label).typeset(), cell(g.ipc_gain)];
            cells.extend(g.miss_reductions.iter().copied().map(cell));
            row(&cells)
        })
        .collect();
    Frame {
        columns: "l|c|c|c",
        header: vec![
            "L1".to_owned(),
            "IPC gain (\\%)".to_owned(),
            "I-cache miss reduction (\\%)".to_owned(),
            "D-cache miss reduction (\\%)".to_owned(),
        ],
        caption: format!(
            "{} {} ({}): relative gains against {}.",
            escape(program),
            escape(dataset),
            escape(cpu),
            SizeLabel::parse(&gains.baseline).typeset()
        ),
        label: None,
        tight: true,
    }
    .render(&body)
}

/// One row of an energy-efficiency table.
#[derive(Debug, Clone, PartialEq)]
pub struct EfficiencyRow {
    /// L1 size in whole kB.
    pub kib: u64,
    /// IPC per mW for each column; `None` where the run is missing.
    pub cells: Vec<Option<f64>>,
}

/// Energy-efficiency table (IPC / P_max) for one core.
pub fn efficiency_table(
    core: &str,
    p_max_mw: f64,
    columns: &[String],
    rows: &[EfficiencyRow],
    separator: DecimalSeparator,
) -> String {
    let body: Vec<String> = rows
        .iter()
        .map(|r| {
            let mut cells = vec![r.kib.to_string()];
            cells.extend(r.cells.iter().copied().map(|v| {
                v.map_or_else(|| ABSENT.to_owned(), |v| number(v, 5, separator))
            }));
            row(&cells)
        })
        .collect();
    let mut header = vec!["L1 (kB)".to_owned()];
    header.extend(columns.iter().map(|c| escape(c)));
    let spec = vec!["c"; header.len()].join("|");
    let slug: String = core
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_lowercase();
    Frame {
        columns: &spec,
        header,
        caption: format!(
            "Energy efficiency (IPC/mW) for {} ($P_{{\\max}}$ = \\mbox{{{}\\,mW}}).",
            escape(core),
            number(p_max_mw, 0, DecimalSeparator::Point)
        ),
        label: Some(format!("tab:energy-efficiency-{slug}")),
        tight: false,
    }
    .render(&body)
}
