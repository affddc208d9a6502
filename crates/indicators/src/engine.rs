//! Batch indicator functions over a whole [`Series`].
//!
//! Each function validates its parameters, rejects an empty series, and
//! returns columns aligned 1:1 with the series index. Warm-up differs per
//! function: moving averages and RSI are defined from the first row over
//! whatever history exists, Bollinger bands and ATR stay undefined until a
//! full window is available. MACD is defined from the first row.

use crate::atr::Atr;
use crate::bollinger::BollingerBands;
use crate::macd::Macd;
use crate::rsi::Rsi;
use crate::sma::Sma;
use crate::{Indicator, IndicatorError};
use tradeviz_core::{
    sma_column, Field, IndicatorColumn, Series, ATR, BOLLINGER_HIGH, BOLLINGER_LOW, MACD, RSI,
    SIGNAL_LINE,
};

pub const DEFAULT_SMA_WINDOWS: [usize; 2] = [50, 200];
pub const DEFAULT_BOLLINGER_WINDOW: usize = 20;
pub const BOLLINGER_NUM_STD: f64 = 2.0;
pub const DEFAULT_RSI_WINDOW: usize = 14;
pub const DEFAULT_MACD_FAST: usize = 12;
pub const DEFAULT_MACD_SLOW: usize = 26;
pub const DEFAULT_MACD_SIGNAL: usize = 9;
pub const DEFAULT_ATR_WINDOW: usize = 14;

fn positive(name: &'static str, value: usize) -> Result<usize, IndicatorError> {
    if value == 0 {
        return Err(IndicatorError::InvalidParameter { name, value });
    }
    Ok(value)
}

fn non_empty(series: &Series) -> Result<(), IndicatorError> {
    if series.is_empty() {
        return Err(IndicatorError::InsufficientData(series.symbol().to_string()));
    }
    Ok(())
}

fn require(series: &Series, field: Field) -> Result<&[f64], IndicatorError> {
    series
        .prices(field)
        .ok_or(IndicatorError::MissingColumn(field))
}

/// `SMA_w` for each window: mean close over the trailing `min(i + 1, w)` bars.
pub fn moving_averages(
    series: &Series,
    windows: &[usize],
) -> Result<Vec<IndicatorColumn>, IndicatorError> {
    if windows.is_empty() {
        return Err(IndicatorError::InvalidParameter {
            name: "windows",
            value: 0,
        });
    }
    for w in windows {
        positive("window", *w)?;
    }
    non_empty(series)?;
    let closes = require(series, Field::Close)?;

    Ok(windows
        .iter()
        .map(|&w| {
            let mut sma = Sma::relaxed(w);
            let values = closes.iter().map(|c| sma.next(*c)).collect();
            IndicatorColumn::new(sma_column(w), values)
        })
        .collect())
}

/// `BollingerHigh` and `BollingerLow`: full-window mean ± 2 sample std of close.
pub fn bollinger_bands(
    series: &Series,
    window: usize,
) -> Result<Vec<IndicatorColumn>, IndicatorError> {
    positive("window", window)?;
    non_empty(series)?;
    let closes = require(series, Field::Close)?;

    let mut bands = BollingerBands::new(window, BOLLINGER_NUM_STD);
    let (upper, lower): (Vec<_>, Vec<_>) = closes
        .iter()
        .map(|c| match bands.next_output(*c) {
            Some(out) => (Some(out.upper), Some(out.lower)),
            None => (None, None),
        })
        .unzip();

    Ok(vec![
        IndicatorColumn::new(BOLLINGER_HIGH, upper),
        IndicatorColumn::new(BOLLINGER_LOW, lower),
    ])
}

/// `RSI` from rolling mean gain and loss of close-to-close changes.
pub fn rsi(series: &Series, window: usize) -> Result<IndicatorColumn, IndicatorError> {
    positive("window", window)?;
    non_empty(series)?;
    let closes = require(series, Field::Close)?;

    let mut rsi = Rsi::new(window);
    let values = closes.iter().map(|c| rsi.next(*c)).collect();
    Ok(IndicatorColumn::new(RSI, values))
}

/// `MACD` (fast EMA − slow EMA of close) and `SignalLine` (EMA of MACD).
pub fn macd(
    series: &Series,
    fast: usize,
    slow: usize,
    signal: usize,
) -> Result<Vec<IndicatorColumn>, IndicatorError> {
    positive("fast", fast)?;
    positive("slow", slow)?;
    positive("signal", signal)?;
    non_empty(series)?;
    let closes = require(series, Field::Close)?;

    let mut macd = Macd::new(fast, slow, signal);
    let (line, signal_line): (Vec<_>, Vec<_>) = closes
        .iter()
        .map(|c| match macd.next_output(*c) {
            Some(out) => (Some(out.macd), Some(out.signal)),
            None => (None, None),
        })
        .unzip();

    Ok(vec![
        IndicatorColumn::new(MACD, line),
        IndicatorColumn::new(SIGNAL_LINE, signal_line),
    ])
}

/// `ATR`: full-window mean of true range.
pub fn atr(series: &Series, window: usize) -> Result<IndicatorColumn, IndicatorError> {
    positive("window", window)?;
    non_empty(series)?;
    let highs = require(series, Field::High)?;
    let lows = require(series, Field::Low)?;
    let closes = require(series, Field::Close)?;

    let mut atr = Atr::new(window);
    let values = highs
        .iter()
        .zip(lows)
        .zip(closes)
        .map(|((h, l), c)| atr.next_hlc(*h, *l, *c))
        .collect();
    Ok(IndicatorColumn::new(ATR, values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ema::Ema;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use tradeviz_core::{Bar, SeriesColumns};

    fn dates(n: usize) -> Vec<NaiveDate> {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .iter_days()
            .take(n)
            .collect()
    }

    fn closes(values: &[f64]) -> Series {
        Series::from_columns(
            "TEST",
            dates(values.len()),
            SeriesColumns {
                close: Some(values.to_vec()),
                ..Default::default()
            },
        )
        .unwrap()
    }

    fn bars(rows: &[(f64, f64, f64)]) -> Series {
        let bars: Vec<Bar> = dates(rows.len())
            .into_iter()
            .zip(rows)
            .map(|(d, (h, l, c))| Bar::new(d, *c, *h, *l, *c, 1_000))
            .collect();
        Series::from_bars("TEST", &bars).unwrap()
    }

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("value should be defined");
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_moving_average_partial_windows() {
        let series = closes(&[10.0, 11.0, 12.0, 13.0, 14.0, 100.0]);
        let cols = moving_averages(&series, &[3]).unwrap();
        assert_eq!(cols.len(), 1);
        assert_eq!(cols[0].name, "SMA_3");
        let expected = [10.0, 10.5, 11.0, 12.0, 13.0, 127.0 / 3.0];
        for (row, e) in expected.iter().enumerate() {
            assert_close(cols[0].get(row), *e);
        }
    }

    #[test]
    fn test_moving_average_default_windows_names() {
        let series = closes(&[1.0, 2.0]);
        let cols = moving_averages(&series, &DEFAULT_SMA_WINDOWS).unwrap();
        let names: Vec<_> = cols.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["SMA_50", "SMA_200"]);
        assert_close(cols[1].get(1), 1.5);
    }

    #[test]
    fn test_bollinger_requires_full_window() {
        let series = closes(&[10.0, 11.0, 12.0, 13.0]);
        let cols = bollinger_bands(&series, 3).unwrap();
        assert_eq!(cols[0].name, BOLLINGER_HIGH);
        assert_eq!(cols[1].name, BOLLINGER_LOW);
        assert_eq!(cols[0].get(0), None);
        assert_eq!(cols[0].get(1), None);
        assert_close(cols[0].get(2), 13.0);
        assert_close(cols[1].get(2), 9.0);
        assert_close(cols[0].get(3), 14.0);
        assert_close(cols[1].get(3), 10.0);
    }

    #[test]
    fn test_short_series_bollinger_and_atr_undefined() {
        let series = bars(&[(10.0, 8.0, 9.0), (11.0, 9.0, 10.0), (12.0, 10.0, 11.0)]);
        let bb = bollinger_bands(&series, 20).unwrap();
        assert!(bb.iter().all(|c| c.values.iter().all(Option::is_none)));
        let atr = atr(&series, 14).unwrap();
        assert!(atr.values.iter().all(Option::is_none));
        assert_eq!(atr.len(), 3);
    }

    #[test]
    fn test_rsi_defined_from_first_row() {
        let series = closes(&[10.0, 12.0, 11.0, 10.0]);
        let col = rsi(&series, 2).unwrap();
        assert_eq!(col.name, RSI);
        assert_eq!(col.get(0), Some(100.0));
        assert_eq!(col.get(1), Some(100.0));
        assert_close(col.get(2), 100.0 - 100.0 / 3.0);
        assert_eq!(col.get(3), Some(0.0));
    }

    #[test]
    fn test_rsi_monotone_rise_is_exactly_100() {
        let series = closes(&[1.0, 1.1, 1.3, 1.3, 1.7, 2.9, 3.0]);
        let col = rsi(&series, 3).unwrap();
        assert!(col.values.iter().all(|v| *v == Some(100.0)));
    }

    #[test]
    fn test_rsi_recovers_100_after_losses_leave_window() {
        let series = closes(&[10.0, 9.9, 9.7, 10.0, 10.3, 10.4, 10.8]);
        let col = rsi(&series, 3).unwrap();
        assert!(col.get(3).unwrap() < 100.0);
        assert_eq!(col.get(5), Some(100.0));
        assert_eq!(col.get(6), Some(100.0));
    }

    #[test]
    fn test_macd_signal_is_ema_of_macd() {
        let series = closes(&[
            22.27, 22.19, 22.08, 22.17, 22.18, 22.13, 22.23, 22.43, 22.24, 22.29, 22.15, 22.39,
            22.38, 22.61, 23.36, 24.05, 23.75, 23.83, 23.95, 23.63, 23.82, 23.87, 23.65, 23.19,
            23.10, 23.33, 22.68, 23.10, 22.40, 22.17,
        ]);
        let cols = macd(
            &series,
            DEFAULT_MACD_FAST,
            DEFAULT_MACD_SLOW,
            DEFAULT_MACD_SIGNAL,
        )
        .unwrap();
        assert_eq!(cols[0].name, MACD);
        assert_eq!(cols[1].name, SIGNAL_LINE);
        assert_eq!(cols[0].get(0), Some(0.0));

        let mut ema = Ema::new(DEFAULT_MACD_SIGNAL);
        for row in 0..series.len() {
            let recomputed = ema.next(cols[0].get(row).unwrap());
            assert_close(cols[1].get(row), recomputed.unwrap());
        }
    }

    #[test]
    fn test_macd_matches_manual_ema_difference() {
        let values = [5.0, 7.0, 6.0, 9.0, 12.0, 11.0];
        let series = closes(&values);
        let cols = macd(&series, 2, 4, 3).unwrap();

        let (a_fast, a_slow) = (2.0 / 3.0, 2.0 / 5.0);
        let (mut fast, mut slow) = (values[0], values[0]);
        for (row, v) in values.iter().enumerate().skip(1) {
            fast = (1.0 - a_fast) * fast + a_fast * v;
            slow = (1.0 - a_slow) * slow + a_slow * v;
            assert_close(cols[0].get(row), fast - slow);
        }
    }

    #[test]
    fn test_atr_true_range_and_window() {
        let series = bars(&[(10.0, 8.0, 9.0), (10.0, 8.0, 9.5), (12.0, 10.5, 11.0)]);
        let col = atr(&series, 2).unwrap();
        assert_eq!(col.name, ATR);
        assert_eq!(col.get(0), None);
        // TR: 2, max(2, 1, 1) = 2, max(1.5, 2.5, 1) = 2.5
        assert_close(col.get(1), 2.0);
        assert_close(col.get(2), 2.25);
    }

    #[test]
    fn test_empty_series_is_insufficient_data() {
        let empty = Series::empty("NONE");
        let expected = IndicatorError::InsufficientData("NONE".to_string());
        assert_eq!(moving_averages(&empty, &DEFAULT_SMA_WINDOWS).unwrap_err(), expected);
        assert_eq!(bollinger_bands(&empty, DEFAULT_BOLLINGER_WINDOW).unwrap_err(), expected);
        assert_eq!(rsi(&empty, DEFAULT_RSI_WINDOW).unwrap_err(), expected);
        assert_eq!(
            macd(&empty, DEFAULT_MACD_FAST, DEFAULT_MACD_SLOW, DEFAULT_MACD_SIGNAL).unwrap_err(),
            expected
        );
        assert_eq!(atr(&empty, DEFAULT_ATR_WINDOW).unwrap_err(), expected);
    }

    #[test]
    fn test_missing_columns() {
        let close_only = closes(&[1.0, 2.0, 3.0]);
        assert_eq!(
            atr(&close_only, 2).unwrap_err(),
            IndicatorError::MissingColumn(Field::High)
        );

        let no_close = Series::from_columns(
            "TEST",
            dates(2),
            SeriesColumns {
                high: Some(vec![2.0, 3.0]),
                low: Some(vec![1.0, 2.0]),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(
            rsi(&no_close, 14).unwrap_err(),
            IndicatorError::MissingColumn(Field::Close)
        );
        assert_eq!(
            atr(&no_close, 14).unwrap_err(),
            IndicatorError::MissingColumn(Field::Close)
        );
    }

    #[test]
    fn test_invalid_parameters() {
        let series = closes(&[1.0, 2.0]);
        assert!(matches!(
            moving_averages(&series, &[50, 0]),
            Err(IndicatorError::InvalidParameter { name: "window", value: 0 })
        ));
        assert!(matches!(
            moving_averages(&series, &[]),
            Err(IndicatorError::InvalidParameter { name: "windows", .. })
        ));
        assert!(matches!(
            macd(&series, 12, 26, 0),
            Err(IndicatorError::InvalidParameter { name: "signal", .. })
        ));
        assert!(bollinger_bands(&series, 0).is_err());
        assert!(atr(&series, 0).is_err());
        assert!(rsi(&series, 0).is_err());
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let series = bars(&[
            (10.0, 8.0, 9.0),
            (11.0, 9.0, 10.0),
            (10.5, 9.5, 9.8),
            (12.0, 9.0, 11.5),
        ]);
        assert_eq!(rsi(&series, 2).unwrap(), rsi(&series, 2).unwrap());
        assert_eq!(atr(&series, 2).unwrap(), atr(&series, 2).unwrap());
        assert_eq!(macd(&series, 2, 3, 2).unwrap(), macd(&series, 2, 3, 2).unwrap());
        assert_eq!(
            bollinger_bands(&series, 2).unwrap(),
            bollinger_bands(&series, 2).unwrap()
        );
    }

    proptest! {
        #[test]
        fn prop_moving_average_is_trailing_mean(
            values in prop::collection::vec(0.01f64..1_000.0, 1..120),
            window in 1usize..30,
        ) {
            let series = closes(&values);
            let col = &moving_averages(&series, &[window]).unwrap()[0];
            for row in 0..values.len() {
                let start = (row + 1).saturating_sub(window);
                let slice = &values[start..=row];
                let expected = slice.iter().sum::<f64>() / slice.len() as f64;
                let actual = col.get(row).unwrap();
                prop_assert!((actual - expected).abs() <= 1e-9 * expected.max(1.0));
            }
        }

        #[test]
        fn prop_rsi_is_bounded(
            values in prop::collection::vec(0.01f64..1_000.0, 1..120),
            window in 1usize..30,
        ) {
            let series = closes(&values);
            let col = rsi(&series, window).unwrap();
            prop_assert_eq!(col.len(), values.len());
            for v in col.values {
                let v = v.unwrap();
                prop_assert!((0.0..=100.0).contains(&v));
            }
        }

        #[test]
        fn prop_short_series_never_fill_window(len in 1usize..20) {
            let values: Vec<f64> = (0..len).map(|i| 50.0 + i as f64).collect();
            let series = bars(&values.iter().map(|c| (c + 1.0, c - 1.0, *c)).collect::<Vec<_>>());
            let bb = bollinger_bands(&series, 20).unwrap();
            let atr = atr(&series, 20).unwrap();
            prop_assert!(bb[0].values.iter().all(Option::is_none));
            prop_assert!(atr.values.iter().all(Option::is_none));
        }
    }
}
