use crate::sma::Sma;
use crate::Indicator;

/// Relative Strength Index (RSI).
///
/// Average gain and loss are simple rolling means over `period` changes,
/// defined from the first value (the first change counts as zero).
#[derive(Debug, Clone)]
pub struct Rsi {
    len: usize,
    prev_value: Option<f64>,
    gains: Sma,
    losses: Sma,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "RSI period must be > 0");
        Self {
            len: period,
            prev_value: None,
            gains: Sma::relaxed(period),
            losses: Sma::relaxed(period),
        }
    }

    pub fn value(&self) -> Option<f64> {
        match (self.gains.value(), self.losses.value()) {
            (Some(ag), Some(al)) => Some(rsi_from_averages(ag, al)),
            _ => None,
        }
    }
}

/// RSI from average gain and loss. No losses saturates at 100.
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}

impl Indicator for Rsi {
    fn next(&mut self, value: f64) -> Option<f64> {
        let change = self.prev_value.map_or(0.0, |prev| value - prev);
        let gain = if change > 0.0 { change } else { 0.0 };
        let loss = if change < 0.0 { -change } else { 0.0 };

        self.gains.next(gain);
        self.losses.next(loss);
        self.prev_value = Some(value);
        self.value()
    }

    fn reset(&mut self) {
        self.prev_value = None;
        self.gains.reset();
        self.losses.reset();
    }

    fn period(&self) -> usize {
        self.len
    }

    fn is_ready(&self) -> bool {
        self.prev_value.is_some()
    }
}
