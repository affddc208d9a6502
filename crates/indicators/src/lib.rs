pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod engine;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod study;
pub mod summary;
mod window;

pub use engine::{atr, bollinger_bands, macd, moving_averages, rsi};
pub use study::{
    apply_studies, IndicatorSettings, ParseStudyError, Study, StudyFailure, StudyKind, StudyReport,
};
pub use summary::{describe, ColumnSummary};

use tradeviz_core::{ColumnError, Field};

/// Trait for streaming (incremental) indicators.
/// Feed one value at a time; the indicator maintains internal state.
pub trait Indicator: Send + Sync {
    /// Process the next value and return the indicator output (if ready).
    fn next(&mut self, value: f64) -> Option<f64>;

    /// Reset the indicator to its initial state.
    fn reset(&mut self);

    /// The window length or span the indicator was built with.
    fn period(&self) -> usize;

    /// Whether the indicator has enough data to produce output.
    fn is_ready(&self) -> bool;
}

/// Errors from the batch indicator functions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IndicatorError {
    #[error("Insufficient data: series '{0}' is empty")]
    InsufficientData(String),
    #[error("Missing column: {0}")]
    MissingColumn(Field),
    #[error("Invalid parameter: {name} must be positive (got {value})")]
    InvalidParameter { name: &'static str, value: usize },
    #[error(transparent)]
    Column(#[from] ColumnError),
}
