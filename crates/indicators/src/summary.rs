use serde::Serialize;
use tradeviz_core::{AugmentedSeries, Field};

/// Descriptive statistics of one column over its defined values.
///
/// Quantiles interpolate linearly between order statistics; `std` is the
/// sample standard deviation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub median: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnSummary {
    pub fn from_values(column: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        let mut sorted: Vec<f64> = values.into_iter().collect();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = (count > 0).then(|| sorted.iter().sum::<f64>() / count as f64);
        let std = match (mean, count) {
            (Some(m), n) if n >= 2 => {
                let ss: f64 = sorted.iter().map(|v| (v - m) * (v - m)).sum();
                Some((ss / (n - 1) as f64).sqrt())
            }
            _ => None,
        };

        Self {
            column: column.into(),
            count,
            mean,
            std,
            min: sorted.first().copied(),
            p25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            p75: quantile(&sorted, 0.75),
            max: sorted.last().copied(),
        }
    }
}

fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}

/// Summaries for every OHLCV column present, followed by each indicator column.
pub fn describe(augmented: &AugmentedSeries) -> Vec<ColumnSummary> {
    let series = augmented.series();
    let mut out = Vec::new();

    for field in Field::ALL {
        if let Some(prices) = series.prices(field) {
            out.push(ColumnSummary::from_values(field.name(), prices.iter().copied()));
        }
    }
    if let Some(volume) = series.volume() {
        out.push(ColumnSummary::from_values(
            Field::Volume.name(),
            volume.iter().map(|v| *v as f64),
        ));
    }
    for column in augmented.columns() {
        out.push(ColumnSummary::from_values(column.name.clone(), column.defined()));
    }

    out
}
