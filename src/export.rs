//! CSV export of tables for downstream tooling.

use crate::time_series::{IndexKey, TableError, TimeSeriesTable};
use std::io::Write;

/// Header of the index column in exported CSV.
pub const INDEX_HEADER: &str = "index";

/// Writes `table` as CSV: an `index` column followed by one column per table
/// column. Timestamps are RFC 3339, ordinal positions are plain integers.
///
/// # Errors
/// Returns `TableError::Csv` if the underlying writer fails.
pub fn write_csv<W: Write>(table: &TimeSeriesTable, writer: W) -> Result<(), TableError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(table.num_columns() + 1);
    header.push(INDEX_HEADER);
    header.extend(table.column_names());
    csv_writer.write_record(&header)?;

    for (key, values) in table.rows() {
        let mut record = Vec::with_capacity(values.len() + 1);
        record.push(match key {
            IndexKey::Time(ts) => ts.to_rfc3339(),
            IndexKey::Ordinal(pos) => pos.to_string(),
        });
        record.extend(values.iter().map(|value| value.to_string()));
        csv_writer.write_record(&record)?;
    }

    csv_writer
        .flush()
        .map_err(|err| TableError::Csv(err.to_string()))?;
    Ok(())
}

/// Renders `table` as a CSV string.
pub fn to_csv_string(table: &TimeSeriesTable) -> Result<String, TableError> {
    let mut buffer = Vec::new();
    write_csv(table, &mut buffer)?;
    String::from_utf8(buffer).map_err(|err| TableError::Csv(err.to_string()))
}
