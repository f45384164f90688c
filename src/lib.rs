pub mod error;
pub mod time_series;
pub mod sampling;
pub mod window;
pub mod shingle;
pub mod export;

pub use error::{ParseWindowError, ShingleError};
pub use time_series::{date_range, Column, IndexKey, RowIndex, TableError, TimeSeriesTable};
pub use sampling::uniform_interval;
pub use window::{WindowLength, WindowSpec, WindowStrategy};
pub use shingle::{shingle, ShingledTable};
pub use export::{to_csv_string, write_csv};
