use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use polars::datatypes::TimeUnit;
use polars::prelude::*;

use crate::aggregation::{LocationAggregator, LocationPerformance};
use crate::catalog::Product;
use crate::error::SynthError;
use crate::schema::{performance, product, read_event};
use crate::simulator::ReadEvent;

// ── Records → frames ────────────────────────────────────────────────────────

pub fn products_frame(products: &[Product]) -> Result<DataFrame, SynthError> {
    let ids: Vec<&str> = products.iter().map(|p| p.product_id.as_str()).collect();
    let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
    let categories: Vec<&str> = products.iter().map(|p| p.category.as_str()).collect();
    let prices: Vec<f64> = products.iter().map(|p| p.price).collect();
    let locations: Vec<&str> = products.iter().map(|p| p.location.as_str()).collect();
    let tags: Vec<&str> = products.iter().map(|p| p.tag_id.as_str()).collect();
    let dates: Vec<i32> = products.iter().map(|p| epoch_days(p.date_added)).collect();

    let df = DataFrame::new(vec![
        Column::new(product::PRODUCT_ID.into(), &ids),
        Column::new(product::PRODUCT_NAME.into(), &names),
        Column::new(product::CATEGORY.into(), &categories),
        Column::new(product::PRICE.into(), &prices),
        Column::new(product::LOCATION.into(), &locations),
        Column::new(product::TAG_ID.into(), &tags),
        Column::new(product::DATE_ADDED.into(), &dates).cast(&DataType::Date)?,
    ])?;
    Ok(df)
}

pub fn events_frame(events: &[ReadEvent]) -> Result<DataFrame, SynthError> {
    let event_ids: Vec<String> = events.iter().map(|e| e.event_id.to_string()).collect();
    let tags: Vec<&str> = events.iter().map(|e| e.tag_id.as_str()).collect();
    let products: Vec<&str> = events.iter().map(|e| e.product_id.as_str()).collect();
    let readers: Vec<&str> = events.iter().map(|e| e.reader_id.as_str()).collect();
    let timestamps: Vec<i64> = events.iter().map(|e| epoch_micros(e.timestamp)).collect();
    let success: Vec<bool> = events.iter().map(|e| e.read_success).collect();
    let signal: Vec<f64> = events.iter().map(|e| e.signal_strength).collect();
    let locations: Vec<&str> = events.iter().map(|e| e.location.as_str()).collect();
    let temperature: Vec<f64> = events.iter().map(|e| e.temperature).collect();
    let humidity: Vec<f64> = events.iter().map(|e| e.humidity).collect();

    let df = DataFrame::new(vec![
        Column::new(read_event::EVENT_ID.into(), &event_ids),
        Column::new(read_event::TAG_ID.into(), &tags),
        Column::new(read_event::PRODUCT_ID.into(), &products),
        Column::new(read_event::READER_ID.into(), &readers),
        Column::new(read_event::TIMESTAMP.into(), &timestamps)
            .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?,
        Column::new(read_event::READ_SUCCESS.into(), &success),
        Column::new(read_event::SIGNAL_STRENGTH.into(), &signal),
        Column::new(read_event::LOCATION.into(), &locations),
        Column::new(read_event::TEMPERATURE.into(), &temperature),
        Column::new(read_event::HUMIDITY.into(), &humidity),
    ])?;
    Ok(df)
}

pub fn performance_frame(rows: &[LocationPerformance]) -> Result<DataFrame, SynthError> {
    let locations: Vec<&str> = rows.iter().map(|r| r.location.as_str()).collect();
    let rates: Vec<f64> = rows.iter().map(|r| r.success_rate).collect();
    let signal: Vec<f64> = rows.iter().map(|r| r.avg_signal_strength).collect();
    let counts: Vec<u64> = rows.iter().map(|r| r.event_count).collect();

    let df = DataFrame::new(vec![
        Column::new(performance::LOCATION.into(), &locations),
        Column::new(performance::SUCCESS_RATE.into(), &rates),
        Column::new(performance::AVG_SIGNAL_STRENGTH.into(), &signal),
        Column::new(performance::EVENT_COUNT.into(), &counts),
    ])?;
    Ok(df)
}

fn epoch_days(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    date.signed_duration_since(epoch).num_days() as i32
}

fn epoch_micros(ts: NaiveDateTime) -> i64 {
    ts.and_utc().timestamp_micros()
}

// ── Frames → summary ────────────────────────────────────────────────────────

/// Read a CSV file with all columns as String dtype.
/// Column names are trimmed of surrounding whitespace.
pub fn read_csv_as_strings(path: &Path) -> Result<DataFrame, SynthError> {
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let trimmed: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    df.set_column_names(trimmed.as_slice())?;
    Ok(df)
}

/// Recompute the location summary from a read-event frame.
///
/// Accepts typed frames as produced by [`events_frame`] as well as all-string
/// frames loaded from CSV.
pub fn summarize_events_frame(df: &DataFrame) -> Result<Vec<LocationPerformance>, SynthError> {
    require_columns(
        df,
        &[
            read_event::LOCATION,
            read_event::READ_SUCCESS,
            read_event::SIGNAL_STRENGTH,
        ],
    )?;

    let locations = df.column(read_event::LOCATION)?.cast(&DataType::String)?;
    let success = df.column(read_event::READ_SUCCESS)?.cast(&DataType::String)?;
    let signal = df
        .column(read_event::SIGNAL_STRENGTH)?
        .cast(&DataType::String)?;
    let (locations, success, signal) = (locations.str()?, success.str()?, signal.str()?);

    let mut agg = LocationAggregator::new();
    for i in 0..df.height() {
        let location = locations
            .get(i)
            .ok_or_else(|| SynthError::InvalidData(format!("Null location at row {i}")))?;
        let read_success = success
            .get(i)
            .and_then(parse_flag)
            .ok_or_else(|| SynthError::InvalidData(format!("Bad read_success at row {i}")))?;
        let signal_strength = signal
            .get(i)
            .and_then(|s| s.trim().parse::<f64>().ok())
            .ok_or_else(|| SynthError::InvalidData(format!("Bad signal_strength at row {i}")))?;
        agg.observe(location.trim(), read_success, signal_strength);
    }
    Ok(agg.finish())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn require_columns(df: &DataFrame, required: &[&str]) -> Result<(), SynthError> {
    for &col_name in required {
        if df.column(col_name).is_err() {
            return Err(SynthError::MissingColumn(col_name.to_string()));
        }
    }
    Ok(())
}
