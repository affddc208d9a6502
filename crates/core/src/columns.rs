use crate::models::Series;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Column naming contract
// ---------------------------------------------------------------------------
//
// Chart renderers key off these names.

pub const BOLLINGER_HIGH: &str = "BollingerHigh";
pub const BOLLINGER_LOW: &str = "BollingerLow";
pub const RSI: &str = "RSI";
pub const MACD: &str = "MACD";
pub const SIGNAL_LINE: &str = "SignalLine";
pub const ATR: &str = "ATR";

/// Name of the simple moving average column for `window`, e.g. `SMA_50`.
pub fn sma_column(window: usize) -> String {
    format!("SMA_{window}")
}

// ---------------------------------------------------------------------------
// IndicatorColumn
// ---------------------------------------------------------------------------

/// A named derived column aligned 1:1 with a series index.
///
/// `None` marks rows where the indicator is undefined (warm-up).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl IndicatorColumn {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `row`, `None` if out of range or undefined.
    pub fn get(&self, row: usize) -> Option<f64> {
        self.values.get(row).copied().flatten()
    }

    /// Value on the last row, if defined.
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }

    /// Defined values in row order.
    pub fn defined(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(|v| *v)
    }

    /// Index of the first row carrying a value.
    pub fn first_defined_row(&self) -> Option<usize> {
        self.values.iter().position(Option::is_some)
    }
}

// ---------------------------------------------------------------------------
// AugmentedSeries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ColumnError {
    #[error("Column '{name}' has {len} values but the series has {expected} rows")]
    Misaligned {
        name: String,
        len: usize,
        expected: usize,
    },
}

/// A series plus the indicator columns derived from it.
///
/// Columns keep insertion order. Writing a column whose name already exists
/// replaces it in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AugmentedSeries {
    series: Series,
    columns: Vec<IndicatorColumn>,
}

impl AugmentedSeries {
    pub fn new(series: Series) -> Self {
        Self {
            series,
            columns: Vec::new(),
        }
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn columns(&self) -> &[IndicatorColumn] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&IndicatorColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn with_column(mut self, column: IndicatorColumn) -> Result<Self, ColumnError> {
        if column.len() != self.series.len() {
            return Err(ColumnError::Misaligned {
                name: column.name,
                len: column.values.len(),
                expected: self.series.len(),
            });
        }
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
        Ok(self)
    }

    pub fn with_columns(
        self,
        columns: impl IntoIterator<Item = IndicatorColumn>,
    ) -> Result<Self, ColumnError> {
        columns
            .into_iter()
            .try_fold(self, |acc, column| acc.with_column(column))
    }

    pub fn into_parts(self) -> (Series, Vec<IndicatorColumn>) {
        (self.series, self.columns)
    }
}

impl From<Series> for AugmentedSeries {
    fn from(series: Series) -> Self {
        Self::new(series)
    }
}
