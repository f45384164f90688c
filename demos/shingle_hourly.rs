//! Shingling Example
//!
//! Demonstrates how to:
//! 1. Build an hourly time series table
//! 2. Parse a window from a config string
//! 3. Shingle the table into lag features
//! 4. Export the result as CSV
//!
//! Run with: `RUST_LOG=chronos=debug cargo run --example shingle_hourly -- 3h`

use chronos::export::write_csv;
use chronos::time_series::date_range;
use chronos::{shingle, TimeSeriesTable, WindowSpec};
use chrono::{Duration, TimeZone, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let window: WindowSpec = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "2h".to_string())
        .parse()?;

    println!("📊 Shingling Example\n");

    let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let index = date_range(start, start + Duration::hours(9), Duration::hours(1))?;
    let streamflow: Vec<f64> = (0..index.len()).map(|i| 120.0 + 3.0 * i as f64).collect();
    let precipitation: Vec<f64> = (0..index.len()).map(|i| (i % 3) as f64 * 0.1).collect();

    let table = TimeSeriesTable::from_timestamps(
        index,
        vec![("streamflow", streamflow), ("precipitation", precipitation)],
    )?;
    println!("🔧 Input: {} rows x {} columns", table.len(), table.num_columns());
    println!("🪟 Window: {}\n", window);

    let shingled = shingle(&table, window)?;
    println!(
        "   ✓ Output: {} rows x {} columns\n",
        shingled.len(),
        shingled.num_columns()
    );

    write_csv(&shingled, std::io::stdout())?;

    Ok(())
}
