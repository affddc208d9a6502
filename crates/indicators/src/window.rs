use std::collections::VecDeque;

/// Trailing window with running sums for mean and variance.
///
/// Sums are kept as deviations from `shift` to limit cancellation, and are
/// rebuilt from the buffer once every `capacity` pushes so rounding error
/// cannot accumulate over long series. A window holding only zeros reports a
/// mean of exactly zero.
#[derive(Debug, Clone)]
pub(crate) struct RollingWindow {
    capacity: usize,
    buffer: VecDeque<f64>,
    shift: f64,
    sum: f64,
    sum_sq: f64,
    nonzero: usize,
    since_rebase: usize,
}

impl RollingWindow {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            buffer: VecDeque::with_capacity(capacity),
            shift: 0.0,
            sum: 0.0,
            sum_sq: 0.0,
            nonzero: 0,
            since_rebase: 0,
        }
    }

    pub(crate) fn push(&mut self, value: f64) {
        if self.buffer.is_empty() {
            self.shift = value;
        }
        if self.buffer.len() == self.capacity {
            if let Some(removed) = self.buffer.pop_front() {
                let d = removed - self.shift;
                self.sum -= d;
                self.sum_sq -= d * d;
                if removed != 0.0 {
                    self.nonzero -= 1;
                }
            }
        }

        let d = value - self.shift;
        self.sum += d;
        self.sum_sq += d * d;
        if value != 0.0 {
            self.nonzero += 1;
        }
        self.buffer.push_back(value);

        self.since_rebase += 1;
        if self.since_rebase >= self.capacity {
            self.rebase();
        }
    }

    fn rebase(&mut self) {
        self.shift = self.buffer.front().copied().unwrap_or(0.0);
        self.sum = 0.0;
        self.sum_sq = 0.0;
        for v in &self.buffer {
            let d = v - self.shift;
            self.sum += d;
            self.sum_sq += d * d;
        }
        self.since_rebase = 0;
    }

    pub(crate) fn len(&self) -> usize {
        self.buffer.len()
    }

    pub(crate) fn is_full(&self) -> bool {
        self.buffer.len() == self.capacity
    }

    pub(crate) fn mean(&self) -> Option<f64> {
        if self.buffer.is_empty() {
            return None;
        }
        if self.nonzero == 0 {
            return Some(0.0);
        }
        Some(self.shift + self.sum / self.buffer.len() as f64)
    }

    /// Sample variance (n - 1 denominator). Undefined below two values.
    pub(crate) fn sample_variance(&self) -> Option<f64> {
        let n = self.buffer.len();
        if n < 2 {
            return None;
        }
        if self.nonzero == 0 {
            return Some(0.0);
        }
        let n = n as f64;
        let var = (self.sum_sq - self.sum * self.sum / n) / (n - 1.0);
        Some(var.max(0.0))
    }

    pub(crate) fn clear(&mut self) {
        self.buffer.clear();
        self.shift = 0.0;
        self.sum = 0.0;
        self.sum_sq = 0.0;
        self.nonzero = 0;
        self.since_rebase = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_mean(values: &[f64]) -> f64 {
        values.iter().sum::<f64>() / values.len() as f64
    }

    #[test]
    fn test_partial_then_sliding_mean() {
        let mut w = RollingWindow::new(3);
        let mut means = Vec::new();
        for v in [10.0, 11.0, 12.0, 13.0, 14.0, 100.0] {
            w.push(v);
            means.push(w.mean().unwrap());
        }
        assert_eq!(&means[..5], &[10.0, 10.5, 11.0, 12.0, 13.0]);
        assert!((means[5] - 127.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_window_is_exact() {
        let mut w = RollingWindow::new(2);
        for v in [0.1, 0.2, 0.7, 0.0, 0.0] {
            w.push(v);
        }
        assert_eq!(w.mean(), Some(0.0));
        assert_eq!(w.sample_variance(), Some(0.0));
    }

    #[test]
    fn test_sample_variance_matches_naive() {
        let values = [101.5, 99.25, 100.75, 102.0, 98.5, 103.25, 101.0];
        let mut w = RollingWindow::new(4);
        for (i, v) in values.iter().enumerate() {
            w.push(*v);
            if i >= 3 {
                let slice = &values[i - 3..=i];
                let m = naive_mean(slice);
                let var = slice.iter().map(|x| (x - m).powi(2)).sum::<f64>() / 3.0;
                assert!((w.sample_variance().unwrap() - var).abs() < 1e-9);
                assert!((w.mean().unwrap() - m).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_single_value_has_no_variance() {
        let mut w = RollingWindow::new(5);
        w.push(3.0);
        assert_eq!(w.sample_variance(), None);
        assert!(!w.is_full());
        w.clear();
        assert_eq!(w.len(), 0);
        assert_eq!(w.mean(), None);
    }
}
