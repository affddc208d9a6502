use crate::columns::IndicatorColumn;
use crate::models::Series;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;

/// Several symbols' series side by side, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct SeriesSet {
    series: IndexMap<String, Series>,
}

/// Closing prices of several symbols on a shared date index.
///
/// One column per symbol, named by the symbol; `None` where that symbol has
/// no bar on the date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloseTable {
    pub index: Vec<NaiveDate>,
    pub columns: Vec<IndicatorColumn>,
}

impl SeriesSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a series keyed by its symbol, returning any series it replaced.
    pub fn insert(&mut self, series: Series) -> Option<Series> {
        self.series.insert(series.symbol().to_string(), series)
    }

    pub fn get(&self, symbol: &str) -> Option<&Series> {
        self.series.get(symbol)
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.series.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Series> {
        self.series.values()
    }

    pub fn close_table(&self) -> CloseTable {
        let index: Vec<NaiveDate> = self
            .series
            .values()
            .flat_map(|s| s.index().iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let columns = self
            .series
            .values()
            .map(|s| {
                let values = index
                    .iter()
                    .map(|date| {
                        let closes = s.close()?;
                        let row = s.index().binary_search(date).ok()?;
                        Some(closes[row])
                    })
                    .collect();
                IndicatorColumn::new(s.symbol(), values)
            })
            .collect();

        CloseTable { index, columns }
    }
}

impl FromIterator<Series> for SeriesSet {
    fn from_iter<I: IntoIterator<Item = Series>>(iter: I) -> Self {
        let mut set = SeriesSet::new();
        for series in iter {
            set.insert(series);
        }
        set
    }
}
