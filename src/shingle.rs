//! Shingling: sliding-window lag features for time series tables.
//!
//! Each output row concatenates, for every input column, the current value and
//! the `w - 1` values before it. Rows too close to the start to hold a full
//! window are dropped; surviving rows keep their original index values.

pub mod lag;
pub mod naming;

use crate::error::ShingleError;
use crate::time_series::{Column, TimeSeriesTable};
use crate::window::{WindowSpec, WindowStrategy};
use lag::FixedLag;
use naming::shingled_names;
use tracing::{debug, trace};

/// Output of `shingle`; a table of the same family as the input.
pub type ShingledTable = TimeSeriesTable;

/// Builds the lagged feature table for `table`.
///
/// Column `c_t-k` of output row `i` holds `c` at input row `i - k`. Columns
/// follow input order, then offset order (`t-0` first).
///
/// # Errors
/// - `EmptyInput` if the table has no rows.
/// - `InvalidWindow` / `NonUniformSampling` if the window cannot be resolved
///   (see [`WindowSpec::resolve`]).
/// - `InsufficientData` if the table has fewer rows than the window.
///
/// # Examples
/// ```
/// use chronos::{shingle, TimeSeriesTable, WindowSpec};
///
/// let table = TimeSeriesTable::from_ordinal(vec![("x", vec![10.0, 20.0, 30.0, 40.0, 50.0])])?;
/// let shingled = shingle(&table, WindowSpec::count(3))?;
///
/// assert_eq!(shingled.column_names(), vec!["x_t-0", "x_t-1", "x_t-2"]);
/// assert_eq!(shingled.row(0).unwrap().1, vec![30.0, 20.0, 10.0]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn shingle(table: &TimeSeriesTable, window: WindowSpec) -> Result<ShingledTable, ShingleError> {
    if table.is_empty() {
        return Err(ShingleError::EmptyInput);
    }

    let length = window.resolve(table.index())?;
    debug!(
        window = %window,
        length = length.get(),
        rows = table.len(),
        "resolved shingle window"
    );

    if table.len() < length.get() {
        return Err(ShingleError::InsufficientData {
            rows: table.len(),
            window: length.get(),
        });
    }

    let burn_in = length.burn_in();
    let mut shifted_columns = Vec::with_capacity(table.num_columns() * length.get());

    for column in table.columns() {
        for offset in 0..length.get() {
            shifted_columns.push(FixedLag::new(offset).shift(&column.values));
        }
        trace!(column = %column.name, offsets = length.get(), "gathered lagged column");
    }

    // Rows below the burn-in are exactly the ones with an undefined lag.
    let columns: Vec<Column> = shingled_names(&table.column_names(), length)
        .into_iter()
        .zip(shifted_columns)
        .map(|(name, shifted)| {
            let values = shifted.into_iter().skip(burn_in).flatten().collect();
            Column::new(name, values)
        })
        .collect();

    let shingled = TimeSeriesTable::from_parts(table.index().skip(burn_in), columns);
    debug!(
        rows_in = table.len(),
        rows_out = shingled.len(),
        columns_in = table.num_columns(),
        columns_out = shingled.num_columns(),
        "shingled table"
    );

    Ok(shingled)
}
