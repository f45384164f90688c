use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A single named column of observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Values in row order
    pub values: Vec<f64>,
}

impl Column {
    /// Creates a new Column.
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Column {
            name: name.into(),
            values,
        }
    }
}

/// Row index of a table: timestamps or ordinal positions, strictly increasing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowIndex {
    /// Wall-clock timestamps
    Time(Vec<DateTime<Utc>>),
    /// Ordinal positions
    Ordinal(Vec<usize>),
}

impl RowIndex {
    /// Number of entries in the index.
    pub fn len(&self) -> usize {
        match self {
            RowIndex::Time(timestamps) => timestamps.len(),
            RowIndex::Ordinal(positions) => positions.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the key at `row`, if any.
    pub fn get(&self, row: usize) -> Option<IndexKey> {
        match self {
            RowIndex::Time(timestamps) => timestamps.get(row).copied().map(IndexKey::Time),
            RowIndex::Ordinal(positions) => positions.get(row).copied().map(IndexKey::Ordinal),
        }
    }

    /// Timestamps, when this is a time index.
    pub fn timestamps(&self) -> Option<&[DateTime<Utc>]> {
        match self {
            RowIndex::Time(timestamps) => Some(timestamps),
            RowIndex::Ordinal(_) => None,
        }
    }

    /// Finds the row holding `key` (binary search, the index is sorted).
    pub fn position(&self, key: &IndexKey) -> Option<usize> {
        match (self, key) {
            (RowIndex::Time(timestamps), IndexKey::Time(ts)) => timestamps.binary_search(ts).ok(),
            (RowIndex::Ordinal(positions), IndexKey::Ordinal(pos)) => {
                positions.binary_search(pos).ok()
            }
            _ => None,
        }
    }

    /// Index without its first `skip` entries.
    pub(crate) fn skip(&self, skip: usize) -> RowIndex {
        match self {
            RowIndex::Time(timestamps) => {
                RowIndex::Time(timestamps.iter().skip(skip).copied().collect())
            }
            RowIndex::Ordinal(positions) => {
                RowIndex::Ordinal(positions.iter().skip(skip).copied().collect())
            }
        }
    }

    fn first_unsorted(&self) -> Option<usize> {
        match self {
            RowIndex::Time(timestamps) => timestamps.windows(2).position(|pair| pair[0] >= pair[1]),
            RowIndex::Ordinal(positions) => positions.windows(2).position(|pair| pair[0] >= pair[1]),
        }
    }
}

/// A single index value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum IndexKey {
    Time(DateTime<Utc>),
    Ordinal(usize),
}

impl std::fmt::Display for IndexKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexKey::Time(ts) => write!(f, "{}", ts.to_rfc3339()),
            IndexKey::Ordinal(pos) => write!(f, "{}", pos),
        }
    }
}

impl From<DateTime<Utc>> for IndexKey {
    fn from(ts: DateTime<Utc>) -> Self {
        IndexKey::Time(ts)
    }
}

impl From<usize> for IndexKey {
    fn from(pos: usize) -> Self {
        IndexKey::Ordinal(pos)
    }
}

/// Errors that can occur when building or exporting a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// A column's length differs from the index length
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
    /// Index entry at `row` is not greater than the one before it
    UnsortedIndex { row: usize },
    /// Two columns share a name
    DuplicateColumn(String),
    /// A column has an empty name
    EmptyColumnName,
    /// The table has no columns
    NoColumns,
    /// Date range step is zero or negative
    InvalidStep,
    /// CSV writer failure
    Csv(String),
}

impl std::fmt::Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableError::LengthMismatch {
                column,
                expected,
                actual,
            } => write!(
                f,
                "Column '{}' has {} values but the index has {} entries",
                column, actual, expected
            ),
            TableError::UnsortedIndex { row } => write!(
                f,
                "Index must be strictly increasing (violated at row {})",
                row
            ),
            TableError::DuplicateColumn(name) => write!(f, "Duplicate column '{}'", name),
            TableError::EmptyColumnName => write!(f, "Column names must not be empty"),
            TableError::NoColumns => write!(f, "Table must have at least one column"),
            TableError::InvalidStep => write!(f, "Date range step must be positive"),
            TableError::Csv(msg) => write!(f, "CSV error: {}", msg),
        }
    }
}

impl std::error::Error for TableError {}

impl From<csv::Error> for TableError {
    fn from(err: csv::Error) -> Self {
        TableError::Csv(err.to_string())
    }
}

/// Time-indexed table of numeric observations, stored column-major.
///
/// Construction validates that the index is strictly increasing, that every
/// column matches the index length and that column names are unique. Values
/// are immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesTable {
    index: RowIndex,
    columns: Vec<Column>,
}

impl TimeSeriesTable {
    /// Creates a table from an index and its columns.
    ///
    /// # Errors
    /// Returns a `TableError` if the index is not strictly increasing, a
    /// column length differs from the index, or column names are empty or
    /// repeated.
    pub fn new(index: RowIndex, columns: Vec<Column>) -> Result<Self, TableError> {
        if columns.is_empty() {
            return Err(TableError::NoColumns);
        }

        if let Some(pair) = index.first_unsorted() {
            return Err(TableError::UnsortedIndex { row: pair + 1 });
        }

        for (position, column) in columns.iter().enumerate() {
            if column.name.is_empty() {
                return Err(TableError::EmptyColumnName);
            }
            if column.values.len() != index.len() {
                return Err(TableError::LengthMismatch {
                    column: column.name.clone(),
                    expected: index.len(),
                    actual: column.values.len(),
                });
            }
            if columns[..position].iter().any(|other| other.name == column.name) {
                return Err(TableError::DuplicateColumn(column.name.clone()));
            }
        }

        Ok(TimeSeriesTable { index, columns })
    }

    /// Creates a time-indexed table from `(name, values)` pairs.
    pub fn from_timestamps<N: Into<String>>(
        timestamps: Vec<DateTime<Utc>>,
        columns: Vec<(N, Vec<f64>)>,
    ) -> Result<Self, TableError> {
        Self::new(RowIndex::Time(timestamps), into_columns(columns))
    }

    /// Creates an ordinally indexed table (positions `0..n`) from
    /// `(name, values)` pairs. The row count is taken from the first column.
    pub fn from_ordinal<N: Into<String>>(columns: Vec<(N, Vec<f64>)>) -> Result<Self, TableError> {
        let rows = columns.first().map(|(_, values)| values.len()).unwrap_or(0);
        Self::new(RowIndex::Ordinal((0..rows).collect()), into_columns(columns))
    }

    /// Assembles a table whose invariants already hold.
    pub(crate) fn from_parts(index: RowIndex, columns: Vec<Column>) -> Self {
        debug_assert!(columns.iter().all(|c| c.values.len() == index.len()));
        TimeSeriesTable { index, columns }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn index(&self) -> &RowIndex {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Values of the named column.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Value at `row` in the named column.
    pub fn value(&self, row: usize, name: &str) -> Option<f64> {
        self.column(name).and_then(|values| values.get(row).copied())
    }

    /// Value at index `key` in the named column (label-based lookup).
    pub fn lookup(&self, key: impl Into<IndexKey>, name: &str) -> Option<f64> {
        let row = self.index.position(&key.into())?;
        self.value(row, name)
    }

    /// The index key and values of row `row`, in column order.
    pub fn row(&self, row: usize) -> Option<(IndexKey, Vec<f64>)> {
        let key = self.index.get(row)?;
        let values = self.columns.iter().map(|c| c.values[row]).collect();
        Some((key, values))
    }

    /// Iterates over `(index, row values)` pairs in index order.
    pub fn rows(&self) -> impl Iterator<Item = (IndexKey, Vec<f64>)> + '_ {
        (0..self.len()).filter_map(move |row| self.row(row))
    }
}

fn into_columns<N: Into<String>>(columns: Vec<(N, Vec<f64>)>) -> Vec<Column> {
    columns
        .into_iter()
        .map(|(name, values)| Column::new(name, values))
        .collect()
}

/// Uniformly spaced timestamps from `start` to `end` inclusive.
///
/// # Errors
/// Returns `TableError::InvalidStep` when `step` is zero or negative.
pub fn date_range(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step: Duration,
) -> Result<Vec<DateTime<Utc>>, TableError> {
    if step <= Duration::zero() {
        return Err(TableError::InvalidStep);
    }

    let mut timestamps = Vec::new();
    let mut current = start;
    while current <= end {
        timestamps.push(current);
        current = match current.checked_add_signed(step) {
            Some(next) => next,
            None => break,
        };
    }

    Ok(timestamps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn hourly(n: i64) -> Vec<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        (0..n).map(|i| base + Duration::hours(i)).collect()
    }

    #[test]
    fn test_table_creation() {
        let table = TimeSeriesTable::from_timestamps(
            hourly(3),
            vec![("a", vec![1.0, 2.0, 3.0]), ("b", vec![4.0, 5.0, 6.0])],
        )
        .unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.num_columns(), 2);
        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(table.column("b"), Some(&[4.0, 5.0, 6.0][..]));
        assert_eq!(table.value(1, "a"), Some(2.0));
        assert_eq!(table.value(3, "a"), None);
        assert_eq!(table.column("missing"), None);
    }

    #[test]
    fn test_empty_table_is_allowed() {
        let table = TimeSeriesTable::from_timestamps(vec![], vec![("a", vec![])]).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.rows().count(), 0);
    }

    #[test]
    fn test_length_mismatch() {
        let result = TimeSeriesTable::from_timestamps(hourly(3), vec![("a", vec![1.0, 2.0])]);
        assert_eq!(
            result.unwrap_err(),
            TableError::LengthMismatch {
                column: "a".to_string(),
                expected: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn test_unsorted_index_rejected() {
        let mut timestamps = hourly(3);
        timestamps.swap(1, 2);
        let result = TimeSeriesTable::from_timestamps(timestamps, vec![("a", vec![1.0, 2.0, 3.0])]);
        assert_eq!(result.unwrap_err(), TableError::UnsortedIndex { row: 2 });
    }

    #[test]
    fn test_duplicate_timestamp_rejected() {
        let mut timestamps = hourly(3);
        timestamps[2] = timestamps[1];
        let result = TimeSeriesTable::from_timestamps(timestamps, vec![("a", vec![1.0, 2.0, 3.0])]);
        assert_eq!(result.unwrap_err(), TableError::UnsortedIndex { row: 2 });
    }

    #[test]
    fn test_duplicate_and_empty_names_rejected() {
        let duplicate =
            TimeSeriesTable::from_ordinal(vec![("a", vec![1.0]), ("a", vec![2.0])]).unwrap_err();
        assert_eq!(duplicate, TableError::DuplicateColumn("a".to_string()));

        let empty = TimeSeriesTable::from_ordinal(vec![("", vec![1.0])]).unwrap_err();
        assert_eq!(empty, TableError::EmptyColumnName);

        let none = TimeSeriesTable::from_ordinal(Vec::<(String, Vec<f64>)>::new()).unwrap_err();
        assert_eq!(none, TableError::NoColumns);
    }

    #[test]
    fn test_ordinal_index_positions() {
        let table = TimeSeriesTable::from_ordinal(vec![("x", vec![10.0, 20.0, 30.0])]).unwrap();
        assert_eq!(table.index(), &RowIndex::Ordinal(vec![0, 1, 2]));
        assert_eq!(table.index().timestamps(), None);
        assert_eq!(table.lookup(2usize, "x"), Some(30.0));
    }

    #[test]
    fn test_rows_iterate_in_order() {
        let timestamps = hourly(2);
        let table = TimeSeriesTable::from_timestamps(
            timestamps.clone(),
            vec![("a", vec![1.0, 2.0]), ("b", vec![3.0, 4.0])],
        )
        .unwrap();
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows[0], (IndexKey::Time(timestamps[0]), vec![1.0, 3.0]));
        assert_eq!(rows[1], (IndexKey::Time(timestamps[1]), vec![2.0, 4.0]));
    }

    #[test]
    fn test_lookup_by_timestamp() {
        let timestamps = hourly(4);
        let table =
            TimeSeriesTable::from_timestamps(timestamps.clone(), vec![("a", vec![1.0, 2.0, 3.0, 4.0])])
                .unwrap();
        assert_eq!(table.lookup(timestamps[3], "a"), Some(4.0));
        assert_eq!(table.lookup(timestamps[3] + Duration::minutes(1), "a"), None);
        assert_eq!(table.lookup(0usize, "a"), None);
    }

    #[test]
    fn test_date_range_inclusive() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap();
        let range = date_range(start, end, Duration::hours(6)).unwrap();
        assert_eq!(range.len(), 5);
        assert_eq!(range[0], start);
        assert_eq!(range[4], end);
    }

    #[test]
    fn test_date_range_rejects_non_positive_step() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            date_range(start, start, Duration::zero()).unwrap_err(),
            TableError::InvalidStep
        );
        assert_eq!(
            date_range(start, start, Duration::hours(-1)).unwrap_err(),
            TableError::InvalidStep
        );
    }
}
