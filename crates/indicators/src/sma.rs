use crate::window::RollingWindow;
use crate::Indicator;

/// Simple Moving Average (SMA).
///
/// Produces output once `min_periods` values have been seen. Until the window
/// fills, the mean covers every value seen so far.
#[derive(Debug, Clone)]
pub struct Sma {
    len: usize,
    min_periods: usize,
    window: RollingWindow,
}

impl Sma {
    /// SMA that stays undefined until a full window is available.
    pub fn new(period: usize) -> Self {
        Self::with_min_periods(period, period)
    }

    /// SMA defined from the first value, averaging over what is available.
    pub fn relaxed(period: usize) -> Self {
        Self::with_min_periods(period, 1)
    }

    pub fn with_min_periods(period: usize, min_periods: usize) -> Self {
        assert!(period > 0, "SMA period must be > 0");
        Self {
            len: period,
            min_periods: min_periods.clamp(1, period),
            window: RollingWindow::new(period),
        }
    }

    /// Get the current SMA value without feeding new data.
    pub fn value(&self) -> Option<f64> {
        if self.is_ready() {
            self.window.mean()
        } else {
            None
        }
    }
}

impl Indicator for Sma {
    fn next(&mut self, value: f64) -> Option<f64> {
        self.window.push(value);
        self.value()
    }

    fn reset(&mut self) {
        self.window.clear();
    }

    fn period(&self) -> usize {
        self.len
    }

    fn is_ready(&self) -> bool {
        self.window.len() >= self.min_periods
    }
}
