use std::sync::Arc;
use tradeviz_core::{DataProvider, Period};
use tradeviz_indicators::IndicatorSettings;

/// Shared application state accessible by all route handlers.
pub struct AppState {
    pub provider: Arc<dyn DataProvider>,
    /// Windows and spans used when a request names indicators by kind.
    pub settings: IndicatorSettings,
    /// Lookback applied when a request gives no `period`.
    pub default_period: Period,
}

impl AppState {
    pub fn new(provider: Arc<dyn DataProvider>) -> Self {
        Self {
            provider,
            settings: IndicatorSettings::default(),
            default_period: Period::default(),
        }
    }

    pub fn with_settings(mut self, settings: IndicatorSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_default_period(mut self, period: Period) -> Self {
        self.default_period = period;
        self
    }
}
