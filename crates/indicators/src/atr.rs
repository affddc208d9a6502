use crate::sma::Sma;
use crate::Indicator;

/// True range of one bar: the largest of high − low, |high − prev close| and
/// |low − prev close|. Without a previous close it is high − low.
pub fn true_range(high: f64, low: f64, prev_close: Option<f64>) -> f64 {
    let hl = high - low;
    match prev_close {
        Some(prev_c) => {
            let hc = (high - prev_c).abs();
            let lc = (low - prev_c).abs();
            hl.max(hc).max(lc)
        }
        None => hl,
    }
}

/// Average True Range (ATR).
///
/// Simple mean of true range over a full window; undefined until `period`
/// bars have been fed through [`Atr::next_hlc`].
#[derive(Debug, Clone)]
pub struct Atr {
    len: usize,
    prev_close: Option<f64>,
    tr_mean: Sma,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "ATR period must be > 0");
        Self {
            len: period,
            prev_close: None,
            tr_mean: Sma::new(period),
        }
    }

    /// Feed high, low, close and compute ATR.
    pub fn next_hlc(&mut self, high: f64, low: f64, close: f64) -> Option<f64> {
        let tr = true_range(high, low, self.prev_close);
        self.prev_close = Some(close);
        self.tr_mean.next(tr)
    }

    pub fn value(&self) -> Option<f64> {
        self.tr_mean.value()
    }

    pub fn period(&self) -> usize {
        self.len
    }

    pub fn is_ready(&self) -> bool {
        self.tr_mean.is_ready()
    }

    pub fn reset(&mut self) {
        self.prev_close = None;
        self.tr_mean.reset();
    }
}
