//! Delimited-text export of aggregate tables.

use std::io::Write;

use lens_core::error::Result;

use crate::table::{GroupKey, Series, Table};

/// Write `table` as CSV: key column(s) first, then one column per value
/// column. Missing values become empty cells.
pub fn write_table<W: Write, K: GroupKey>(writer: W, table: &Table<K>) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(table.header()).map_err(std::io::Error::from)?;

    for (key, row) in table.rows() {
        let record = key
            .key_values()
            .into_iter()
            .chain(row.iter().map(|cell| cell.map(|v| v.to_string()).unwrap_or_default()));
        out.write_record(record).map_err(std::io::Error::from)?;
    }

    out.flush()?;
    Ok(())
}

/// Write a single series: key column(s) and one value column.
pub fn write_series<W: Write, K: GroupKey>(writer: W, series: &Series<K>) -> Result<()> {
    write_table(writer, &series.to_table())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
