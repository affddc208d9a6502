use crate::Indicator;

/// Exponential Moving Average (EMA).
///
/// Recursive, not bias-adjusted: seeded with the first value, then
/// `ema = (1 - alpha) * prev + alpha * value` with `alpha = 2 / (span + 1)`.
#[derive(Debug, Clone)]
pub struct Ema {
    len: usize,
    alpha: f64,
    current: Option<f64>,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        assert!(span > 0, "EMA span must be > 0");
        Self {
            len: span,
            alpha: 2.0 / (span as f64 + 1.0),
            current: None,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn value(&self) -> Option<f64> {
        self.current
    }
}

impl Indicator for Ema {
    fn next(&mut self, value: f64) -> Option<f64> {
        let ema = match self.current {
            None => value,
            Some(prev) => (1.0 - self.alpha) * prev + self.alpha * value,
        };
        self.current = Some(ema);
        self.current
    }

    fn reset(&mut self) {
        self.current = None;
    }

    fn period(&self) -> usize {
        self.len
    }

    fn is_ready(&self) -> bool {
        self.current.is_some()
    }
}
