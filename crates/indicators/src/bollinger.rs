use crate::window::RollingWindow;
use crate::Indicator;

/// Rolling sample standard deviation over a full window.
#[derive(Debug, Clone)]
pub struct StdDev {
    len: usize,
    window: RollingWindow,
}

impl StdDev {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "StdDev period must be > 0");
        Self {
            len: period,
            window: RollingWindow::new(period),
        }
    }

    pub fn value(&self) -> Option<f64> {
        if !self.window.is_full() {
            return None;
        }
        self.window.sample_variance().map(f64::sqrt)
    }
}

impl Indicator for StdDev {
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
        self.value().is_some()
    }
}

/// Bollinger Bands.
///
/// Middle band is the full-window SMA; the bands sit `num_std` sample
/// standard deviations either side. Returns the middle band through
/// [`Indicator::next`]; use [`BollingerBands::next_output`] for all of it.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    len: usize,
    num_std: f64,
    window: RollingWindow,
}

/// Bollinger Bands output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerOutput {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub bandwidth: f64,
}

impl BollingerBands {
    pub fn new(period: usize, num_std_dev: f64) -> Self {
        assert!(period > 0, "Bollinger period must be > 0");
        Self {
            len: period,
            num_std: num_std_dev,
            window: RollingWindow::new(period),
        }
    }

    /// Standard Bollinger Bands (20, 2).
    pub fn default_periods() -> Self {
        Self::new(20, 2.0)
    }

    pub fn output(&self) -> Option<BollingerOutput> {
        if !self.window.is_full() {
            return None;
        }
        let middle = self.window.mean()?;
        let sd = self.window.sample_variance()?.sqrt();
        let upper = middle + self.num_std * sd;
        let lower = middle - self.num_std * sd;
        Some(BollingerOutput {
            upper,
            middle,
            lower,
            bandwidth: upper - lower,
        })
    }

    pub fn next_output(&mut self, value: f64) -> Option<BollingerOutput> {
        self.window.push(value);
        self.output()
    }
}

impl Indicator for BollingerBands {
    fn next(&mut self, value: f64) -> Option<f64> {
        self.next_output(value).map(|o| o.middle)
    }

    fn reset(&mut self) {
        self.window.clear();
    }

    fn period(&self) -> usize {
        self.len
    }

    fn is_ready(&self) -> bool {
        self.output().is_some()
    }
}
