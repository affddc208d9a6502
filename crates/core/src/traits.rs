use crate::models::{Series, SeriesError};
use crate::period::Period;
use crate::series_set::SeriesSet;
use async_trait::async_trait;

// ---------------------------------------------------------------------------
// Data Provider Trait
// ---------------------------------------------------------------------------

/// Errors that can occur during data operations.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Data not found: {0}")]
    NotFound(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid series: {0}")]
    InvalidSeries(#[from] SeriesError),
}

/// Supplies daily price history for a symbol.
///
/// A provider may return an empty series when it knows the symbol but has
/// no bars in the requested period.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Load the history of `symbol` restricted to `period`.
    async fn load_series(&self, symbol: &str, period: Period) -> Result<Series, DataError>;

    /// List available symbols.
    async fn available_symbols(&self) -> Result<Vec<String>, DataError>;

    /// Load several symbols for side-by-side comparison.
    async fn load_set(&self, symbols: &[String], period: Period) -> Result<SeriesSet, DataError> {
        let mut set = SeriesSet::new();
        for symbol in symbols {
            set.insert(self.load_series(symbol, period).await?);
        }
        Ok(set)
    }
}
