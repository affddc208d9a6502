use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Bar
// ---------------------------------------------------------------------------

/// A single daily OHLCV bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    pub fn new(timestamp: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// High minus low.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

/// The OHLCV fields a series may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl Field {
    pub const ALL: [Field; 5] = [Field::Open, Field::High, Field::Low, Field::Close, Field::Volume];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Open => "open",
            Field::High => "high",
            Field::Low => "low",
            Field::Close => "close",
            Field::Volume => "volume",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

/// Errors raised while assembling a [`Series`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    #[error("Column '{field}' has {len} values but the index has {expected}")]
    LengthMismatch {
        field: Field,
        len: usize,
        expected: usize,
    },
    #[error("Timestamps must be strictly ascending: {previous} is followed by {current} at row {row}")]
    Unordered {
        row: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },
    #[error("Invalid {field} value {value} at row {row}")]
    InvalidValue { field: Field, row: usize, value: f64 },
}

/// Raw OHLCV columns handed to [`Series::from_columns`].
///
/// Any column may be absent; a fetcher that only knows closing prices
/// leaves the others as `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesColumns {
    pub open: Option<Vec<f64>>,
    pub high: Option<Vec<f64>>,
    pub low: Option<Vec<f64>>,
    pub close: Option<Vec<f64>>,
    pub volume: Option<Vec<u64>>,
}

/// An ordered daily price history for one symbol.
///
/// Stored column-wise. The index is strictly ascending with no duplicate
/// dates, every present column has exactly one value per index entry, and
/// every price is finite and non-negative. These are checked once at
/// construction; indicator code relies on them and never re-sorts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    symbol: String,
    index: Vec<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    open: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    high: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    low: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    close: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    volume: Option<Vec<u64>>,
}

impl Series {
    /// A series with no rows. All OHLCV columns are present, just empty.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            index: Vec::new(),
            open: Some(Vec::new()),
            high: Some(Vec::new()),
            low: Some(Vec::new()),
            close: Some(Vec::new()),
            volume: Some(Vec::new()),
        }
    }

    /// Build a series from complete bars. Bars must already be sorted.
    pub fn from_bars(symbol: impl Into<String>, bars: &[Bar]) -> Result<Self, SeriesError> {
        let index = bars.iter().map(|b| b.timestamp).collect();
        let columns = SeriesColumns {
            open: Some(bars.iter().map(|b| b.open).collect()),
            high: Some(bars.iter().map(|b| b.high).collect()),
            low: Some(bars.iter().map(|b| b.low).collect()),
            close: Some(bars.iter().map(|b| b.close).collect()),
            volume: Some(bars.iter().map(|b| b.volume).collect()),
        };
        Self::from_columns(symbol, index, columns)
    }

    /// Build a series from an index and whichever columns are available.
    pub fn from_columns(
        symbol: impl Into<String>,
        index: Vec<NaiveDate>,
        columns: SeriesColumns,
    ) -> Result<Self, SeriesError> {
        for (row, pair) in index.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(SeriesError::Unordered {
                    row: row + 1,
                    previous: pair[0],
                    current: pair[1],
                });
            }
        }

        let expected = index.len();
        let prices = [
            (Field::Open, &columns.open),
            (Field::High, &columns.high),
            (Field::Low, &columns.low),
            (Field::Close, &columns.close),
        ];
        for (field, values) in prices {
            let Some(values) = values else { continue };
            if values.len() != expected {
                return Err(SeriesError::LengthMismatch {
                    field,
                    len: values.len(),
                    expected,
                });
            }
            if let Some((row, value)) = values
                .iter()
                .enumerate()
                .find(|(_, v)| !v.is_finite() || **v < 0.0)
            {
                return Err(SeriesError::InvalidValue {
                    field,
                    row,
                    value: *value,
                });
            }
        }
        if let Some(volume) = &columns.volume {
            if volume.len() != expected {
                return Err(SeriesError::LengthMismatch {
                    field: Field::Volume,
                    len: volume.len(),
                    expected,
                });
            }
        }

        Ok(Self {
            symbol: symbol.into(),
            index,
            open: columns.open,
            high: columns.high,
            low: columns.low,
            close: columns.close,
            volume: columns.volume,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.index.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.index.last().copied()
    }

    pub fn open(&self) -> Option<&[f64]> {
        self.open.as_deref()
    }

    pub fn high(&self) -> Option<&[f64]> {
        self.high.as_deref()
    }

    pub fn low(&self) -> Option<&[f64]> {
        self.low.as_deref()
    }

    pub fn close(&self) -> Option<&[f64]> {
        self.close.as_deref()
    }

    pub fn volume(&self) -> Option<&[u64]> {
        self.volume.as_deref()
    }

    /// Price column for `field`. Volume is not a price and always yields `None`.
    pub fn prices(&self, field: Field) -> Option<&[f64]> {
        match field {
            Field::Open => self.open(),
            Field::High => self.high(),
            Field::Low => self.low(),
            Field::Close => self.close(),
            Field::Volume => None,
        }
    }

    pub fn has(&self, field: Field) -> bool {
        match field {
            Field::Volume => self.volume.is_some(),
            _ => self.prices(field).is_some(),
        }
    }

    /// The bar at `row`, if the row exists and every OHLCV column is present.
    pub fn bar(&self, row: usize) -> Option<Bar> {
        Some(Bar {
            timestamp: *self.index.get(row)?,
            open: *self.open.as_ref()?.get(row)?,
            high: *self.high.as_ref()?.get(row)?,
            low: *self.low.as_ref()?.get(row)?,
            close: *self.close.as_ref()?.get(row)?,
            volume: *self.volume.as_ref()?.get(row)?,
        })
    }

    /// All bars, or an empty vec when any OHLCV column is missing.
    pub fn bars(&self) -> Vec<Bar> {
        (0..self.len()).map_while(|row| self.bar(row)).collect()
    }

    /// Rows from `start` to the end, as a new series.
    pub fn tail_from(&self, start: usize) -> Series {
        let start = start.min(self.len());
        let cut_f = |c: &Option<Vec<f64>>| c.as_ref().map(|v| v[start..].to_vec());
        Series {
            symbol: self.symbol.clone(),
            index: self.index[start..].to_vec(),
            open: cut_f(&self.open),
            high: cut_f(&self.high),
            low: cut_f(&self.low),
            close: cut_f(&self.close),
            volume: self.volume.as_ref().map(|v| v[start..].to_vec()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn bars() -> Vec<Bar> {
        vec![
            Bar::new(date(1), 10.0, 11.0, 9.0, 10.5, 1_000),
            Bar::new(date(4), 10.5, 12.0, 10.0, 11.5, 1_200),
            Bar::new(date(5), 11.5, 12.5, 11.0, 12.0, 900),
        ]
    }

    #[test]
    fn test_from_bars_round_trips_rows() {
        let series = Series::from_bars("AAPL", &bars()).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.symbol(), "AAPL");
        assert_eq!(series.close().unwrap(), &[10.5, 11.5, 12.0]);
        assert_eq!(series.bars(), bars());
        assert_eq!(series.last_date(), Some(date(5)));
    }

    #[test]
    fn test_rejects_unordered_and_duplicate_dates() {
        let mut rows = bars();
        rows.swap(0, 1);
        let err = Series::from_bars("AAPL", &rows).unwrap_err();
        assert!(matches!(err, SeriesError::Unordered { row: 1, .. }));

        let mut rows = bars();
        rows[2].timestamp = rows[1].timestamp;
        let err = Series::from_bars("AAPL", &rows).unwrap_err();
        assert!(matches!(err, SeriesError::Unordered { row: 2, .. }));
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let err = Series::from_columns(
            "AAPL",
            vec![date(1), date(4)],
            SeriesColumns {
                close: Some(vec![1.0]),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            SeriesError::LengthMismatch {
                field: Field::Close,
                len: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn test_rejects_nan_and_negative_prices() {
        let mut rows = bars();
        rows[1].low = f64::NAN;
        let err = Series::from_bars("AAPL", &rows).unwrap_err();
        assert!(matches!(err, SeriesError::InvalidValue { field: Field::Low, row: 1, .. }));

        let mut rows = bars();
        rows[0].open = -1.0;
        let err = Series::from_bars("AAPL", &rows).unwrap_err();
        assert!(matches!(err, SeriesError::InvalidValue { field: Field::Open, row: 0, .. }));
    }

    #[test]
    fn test_close_only_series() {
        let series = Series::from_columns(
            "MSFT",
            vec![date(1), date(4)],
            SeriesColumns {
                close: Some(vec![400.0, 401.0]),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(series.has(Field::Close));
        assert!(!series.has(Field::High));
        assert!(!series.has(Field::Volume));
        assert!(series.bar(0).is_none());
        assert!(series.bars().is_empty());
    }

    #[test]
    fn test_tail_from() {
        let series = Series::from_bars("AAPL", &bars()).unwrap();
        let tail = series.tail_from(1);
        assert_eq!(tail.index(), &[date(4), date(5)]);
        assert_eq!(tail.volume().unwrap(), &[1_200, 900]);
        assert!(series.tail_from(10).is_empty());
    }
}
