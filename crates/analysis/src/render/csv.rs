//! Delimited-text tables.

use std::io;

use ::csv::{Error, WriterBuilder};

use super::{fixed, trimmed};
use crate::cpi::{CpiModel, ResultRow};
use crate::records::{METRICS_HEADER, MetricsRecord};

/// Header of the CPI breakdown table for `model`.
///
/// For the L1/L2 model this is
/// `case,cpi,ipc,ticks_per_cycle,mpki_l1,avg_l1_miss_cycles,mpki_l2,avg_l2_miss_cycles,
/// deltaCPI_mem_total,pctCPI_mem_total,deltaCPI_l1_only,pctCPI_l1_only,deltaCPI_l2_miss,pctCPI_l2_miss`.
pub fn cpi_header(model: &CpiModel) -> Vec<String> {
    let mut header: Vec<String> = ["case", "cpi", "ipc", "ticks_per_cycle"]
        .into_iter()
        .map(str::to_owned)
        .collect();
    for level in model.levels() {
        header.push(format!("mpki_{}", level.label));
        header.push(format!("avg_{}_miss_cycles", level.label));
    }
    let first = model.first_label();
    let deepest = model.deepest_label();
    header.extend([
        "deltaCPI_mem_total".to_owned(),
        "pctCPI_mem_total".to_owned(),
        format!("deltaCPI_{first}_only"),
        format!("pctCPI_{first}_only"),
        format!("deltaCPI_{deepest}_miss"),
        format!("pctCPI_{deepest}_miss"),
    ]);
    header
}

/// Renders the CPI breakdown table.
///
/// Ratios and latencies carry 6 decimals, ΔCPI values 8, percentages 4. Rows are
/// written in the order given; each row must come from `model`.
///
/// # Errors
///
/// Only if the CSV writer fails, which does not happen for in-memory output.
pub fn cpi_table(rows: &[ResultRow], model: &CpiModel) -> Result<String, Error> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(cpi_header(model))?;
    for row in rows {
        let mut record = vec![
            row.case.clone(),
            fixed(row.cpi, 6),
            fixed(row.ipc, 6),
            fixed(row.ticks_per_cycle, 6),
        ];
        for level in &row.levels {
            record.push(fixed(level.mpki, 6));
            record.push(fixed(level.avg_miss_latency_cycles, 6));
        }
        record.extend([
            fixed(row.delta_cpi_mem_total, 8),
            fixed(row.pct_cpi_mem_total, 4),
            fixed(row.delta_cpi_first_only, 8),
            fixed(row.pct_cpi_first_only, 4),
            fixed(row.delta_cpi_deepest, 8),
            fixed(row.pct_cpi_deepest, 4),
        ]);
        writer.write_record(&record)?;
    }
    finish(writer)
}

/// Renders a metrics table. Absent values are empty cells.
///
/// # Errors
///
/// As [`cpi_table`].
pub fn metrics_table(records: &[MetricsRecord]) -> Result<String, Error> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(METRICS_HEADER)?;
    for record in records {
        let mut cells = vec![record.dataset.clone(), record.l1_size.clone()];
        cells.extend(record.values().into_iter().map(trimmed));
        writer.write_record(&cells)?;
    }
    finish(writer)
}

fn finish(writer: ::csv::Writer<Vec<u8>>) -> Result<String, Error> {
    let bytes = writer
        .into_inner()
        .map_err(|e| Error::from(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| Error::from(io::Error::new(io::ErrorKind::InvalidData, e)))
}
