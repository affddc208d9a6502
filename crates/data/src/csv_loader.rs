use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::io::Read;
use std::path::Path;
use tradeviz_core::{DataError, Series, SeriesColumns};

/// Load a daily OHLCV series from a CSV file. The symbol is the file stem.
///
/// Expected columns (case-insensitive, flexible ordering):
/// `date` (or `timestamp`, `datetime`), `open`, `high`, `low`, `close`
/// (or `adj close`), `volume`. Only the date column is mandatory; absent
/// price columns are left out of the series.
///
/// Rows are sorted by date. Duplicate dates are rejected.
pub fn load_series_from_csv(path: &Path) -> Result<Series, DataError> {
    let symbol = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let file = std::fs::File::open(path)?;
    read_series(&symbol, file)
}

/// Parse CSV content from any reader into a series for `symbol`.
pub fn read_series<R: Read>(symbol: &str, input: R) -> Result<Series, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| DataError::ParseError(format!("Failed to read headers: {}", e)))?
        .clone();

    let col_map = resolve_bar_columns(&headers)?;

    let mut rows: Vec<Row> = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record =
            result.map_err(|e| DataError::ParseError(format!("CSV record error: {}", e)))?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");
        let price = |idx: Option<usize>, field: &str| -> Result<Option<f64>, DataError> {
            idx.map(|i| parse_price(cell(i), field, line)).transpose()
        };

        rows.push(Row {
            date: parse_date(cell(col_map.date))?,
            open: price(col_map.open, "open")?,
            high: price(col_map.high, "high")?,
            low: price(col_map.low, "low")?,
            close: price(col_map.close, "close")?,
            volume: col_map
                .volume
                .map(|i| parse_volume(cell(i), line))
                .transpose()?,
        });
    }

    // Sort by date
    rows.sort_by_key(|r| r.date);

    let index = rows.iter().map(|r| r.date).collect();
    let column = |present: bool, get: fn(&Row) -> Option<f64>| -> Option<Vec<f64>> {
        present.then(|| rows.iter().map(|r| get(r).unwrap_or(f64::NAN)).collect())
    };
    let columns = SeriesColumns {
        open: column(col_map.open.is_some(), |r| r.open),
        high: column(col_map.high.is_some(), |r| r.high),
        low: column(col_map.low.is_some(), |r| r.low),
        close: column(col_map.close.is_some(), |r| r.close),
        volume: col_map
            .volume
            .map(|_| rows.iter().map(|r| r.volume.unwrap_or(0)).collect()),
    };

    let series = Series::from_columns(symbol, index, columns)?;
    tracing::debug!(symbol = %symbol, rows = series.len(), "Parsed CSV series");
    Ok(series)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

struct Row {
    date: NaiveDate,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: Option<u64>,
}

struct BarColumnMap {
    date: usize,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    close: Option<usize>,
    volume: Option<usize>,
}

fn resolve_bar_columns(headers: &csv::StringRecord) -> Result<BarColumnMap, DataError> {
    let date = find_column(headers, &["date", "timestamp", "datetime", "time"])
        .ok_or_else(|| DataError::ParseError("No date column found".into()))?;

    Ok(BarColumnMap {
        date,
        open: find_column(headers, &["open", "o"]),
        high: find_column(headers, &["high", "h"]),
        low: find_column(headers, &["low", "l"]),
        close: find_column(headers, &["close", "c"])
            .or_else(|| find_column(headers, &["adj close", "adj_close", "adjclose"])),
        volume: find_column(headers, &["volume", "vol", "v"]),
    })
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    for (i, header) in headers.iter().enumerate() {
        let h = header.trim().to_lowercase();
        for name in names {
            if h == *name {
                return Some(i);
            }
        }
    }
    None
}

fn parse_price(s: &str, field: &str, line: usize) -> Result<f64, DataError> {
    s.trim().parse::<f64>().map_err(|e| {
        DataError::ParseError(format!(
            "Failed to parse {} '{}' on data row {}: {}",
            field,
            s,
            line + 1,
            e
        ))
    })
}

fn parse_volume(s: &str, line: usize) -> Result<u64, DataError> {
    let s = s.trim();
    if let Ok(v) = s.parse::<u64>() {
        return Ok(v);
    }
    // Some exports write volume as a float ("1234.0")
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v.round() as u64),
        _ => Err(DataError::ParseError(format!(
            "Failed to parse volume '{}' on data row {}",
            s,
            line + 1
        ))),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, DataError> {
    let s = s.trim();

    // RFC 3339 / ISO 8601 with timezone: keep the exchange-local date
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }

    let date_formats = ["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y%m%d"];
    for fmt in &date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
    ];
    for fmt in &datetime_formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.date());
        }
    }

    // Unix timestamp (seconds)
    if let Ok(ts) = s.parse::<i64>() {
        if let Some(dt) = DateTime::from_timestamp(ts, 0) {
            return Ok(dt.date_naive());
        }
    }

    Err(DataError::ParseError(format!("Unable to parse date: '{}'", s)))
}
