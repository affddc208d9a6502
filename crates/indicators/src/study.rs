use crate::engine::{
    self, DEFAULT_ATR_WINDOW, DEFAULT_BOLLINGER_WINDOW, DEFAULT_MACD_FAST, DEFAULT_MACD_SIGNAL,
    DEFAULT_MACD_SLOW, DEFAULT_RSI_WINDOW, DEFAULT_SMA_WINDOWS,
};
use crate::IndicatorError;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tradeviz_core::{
    sma_column, AugmentedSeries, IndicatorColumn, Series, ATR, BOLLINGER_HIGH, BOLLINGER_LOW,
    MACD, RSI, SIGNAL_LINE,
};

// ---------------------------------------------------------------------------
// StudyKind
// ---------------------------------------------------------------------------

/// Which indicator family a study belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyKind {
    MovingAverages,
    Bollinger,
    Rsi,
    Macd,
    Atr,
}

impl StudyKind {
    pub const ALL: [StudyKind; 5] = [
        StudyKind::MovingAverages,
        StudyKind::Bollinger,
        StudyKind::Rsi,
        StudyKind::Macd,
        StudyKind::Atr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StudyKind::MovingAverages => "moving_averages",
            StudyKind::Bollinger => "bollinger",
            StudyKind::Rsi => "rsi",
            StudyKind::Macd => "macd",
            StudyKind::Atr => "atr",
        }
    }

    /// Parse a comma-separated list, dropping duplicates but keeping order.
    pub fn parse_list(list: &str) -> Result<Vec<StudyKind>, ParseStudyError> {
        let mut kinds = Vec::new();
        for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let kind: StudyKind = part.parse()?;
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        Ok(kinds)
    }
}

impl fmt::Display for StudyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown indicator '{0}' (expected sma, bollinger, rsi, macd or atr)")]
pub struct ParseStudyError(pub String);

impl FromStr for StudyKind {
    type Err = ParseStudyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sma" | "ma" | "moving_averages" => Ok(StudyKind::MovingAverages),
            "bollinger" | "bb" | "bollinger_bands" => Ok(StudyKind::Bollinger),
            "rsi" => Ok(StudyKind::Rsi),
            "macd" => Ok(StudyKind::Macd),
            "atr" => Ok(StudyKind::Atr),
            _ => Err(ParseStudyError(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Study
// ---------------------------------------------------------------------------

/// One configured indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Study {
    MovingAverages { windows: Vec<usize> },
    Bollinger { window: usize },
    Rsi { window: usize },
    Macd { fast: usize, slow: usize, signal: usize },
    Atr { window: usize },
}

impl Study {
    pub fn kind(&self) -> StudyKind {
        match self {
            Study::MovingAverages { .. } => StudyKind::MovingAverages,
            Study::Bollinger { .. } => StudyKind::Bollinger,
            Study::Rsi { .. } => StudyKind::Rsi,
            Study::Macd { .. } => StudyKind::Macd,
            Study::Atr { .. } => StudyKind::Atr,
        }
    }

    /// Columns this study writes, in output order.
    pub fn column_names(&self) -> Vec<String> {
        match self {
            Study::MovingAverages { windows } => windows.iter().map(|w| sma_column(*w)).collect(),
            Study::Bollinger { .. } => vec![BOLLINGER_HIGH.into(), BOLLINGER_LOW.into()],
            Study::Rsi { .. } => vec![RSI.into()],
            Study::Macd { .. } => vec![MACD.into(), SIGNAL_LINE.into()],
            Study::Atr { .. } => vec![ATR.into()],
        }
    }

    pub fn compute(&self, series: &Series) -> Result<Vec<IndicatorColumn>, IndicatorError> {
        match self {
            Study::MovingAverages { windows } => engine::moving_averages(series, windows),
            Study::Bollinger { window } => engine::bollinger_bands(series, *window),
            Study::Rsi { window } => engine::rsi(series, *window).map(|c| vec![c]),
            Study::Macd { fast, slow, signal } => engine::macd(series, *fast, *slow, *signal),
            Study::Atr { window } => engine::atr(series, *window).map(|c| vec![c]),
        }
    }

    /// A copy of `augmented` with this study's columns attached.
    pub fn apply(&self, augmented: &AugmentedSeries) -> Result<AugmentedSeries, IndicatorError> {
        let columns = self.compute(augmented.series())?;
        Ok(augmented.clone().with_columns(columns)?)
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Window and span parameters used when a study is requested by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorSettings {
    pub sma_windows: Vec<usize>,
    pub bollinger_window: usize,
    pub rsi_window: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub atr_window: usize,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            sma_windows: DEFAULT_SMA_WINDOWS.to_vec(),
            bollinger_window: DEFAULT_BOLLINGER_WINDOW,
            rsi_window: DEFAULT_RSI_WINDOW,
            macd_fast: DEFAULT_MACD_FAST,
            macd_slow: DEFAULT_MACD_SLOW,
            macd_signal: DEFAULT_MACD_SIGNAL,
            atr_window: DEFAULT_ATR_WINDOW,
        }
    }
}

impl IndicatorSettings {
    pub fn study(&self, kind: StudyKind) -> Study {
        match kind {
            StudyKind::MovingAverages => Study::MovingAverages {
                windows: self.sma_windows.clone(),
            },
            StudyKind::Bollinger => Study::Bollinger {
                window: self.bollinger_window,
            },
            StudyKind::Rsi => Study::Rsi {
                window: self.rsi_window,
            },
            StudyKind::Macd => Study::Macd {
                fast: self.macd_fast,
                slow: self.macd_slow,
                signal: self.macd_signal,
            },
            StudyKind::Atr => Study::Atr {
                window: self.atr_window,
            },
        }
    }

    pub fn studies(&self, kinds: &[StudyKind]) -> Vec<Study> {
        kinds.iter().map(|k| self.study(*k)).collect()
    }
}

// ---------------------------------------------------------------------------
// Applying several studies
// ---------------------------------------------------------------------------

/// A study that could not be attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyFailure {
    pub study: StudyKind,
    #[serde(serialize_with = "serialize_display")]
    pub error: IndicatorError,
}

fn serialize_display<S: Serializer>(error: &IndicatorError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(error)
}

/// The augmented series plus any studies that failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyReport {
    pub series: AugmentedSeries,
    pub failures: Vec<StudyFailure>,
}

impl StudyReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Attach every study that succeeds. A failing study is reported and skipped;
/// it does not stop the others.
pub fn apply_studies(series: impl Into<AugmentedSeries>, studies: &[Study]) -> StudyReport {
    let mut augmented = series.into();
    let mut failures = Vec::new();

    for study in studies {
        match study.apply(&augmented) {
            Ok(next) => augmented = next,
            Err(error) => {
                tracing::warn!(
                    symbol = %augmented.series().symbol(),
                    study = %study.kind(),
                    error = %error,
                    "Indicator skipped"
                );
                failures.push(StudyFailure {
                    study: study.kind(),
                    error,
                });
            }
        }
    }

    tracing::debug!(
        symbol = %augmented.series().symbol(),
        columns = augmented.columns().len(),
        failed = failures.len(),
        "Studies applied"
    );

    StudyReport {
        series: augmented,
        failures,
    }
}
