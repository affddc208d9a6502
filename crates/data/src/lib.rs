pub mod csv_loader;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tradeviz_core::{DataError, DataProvider, Period, Series, SeriesSet};

/// A CSV-file-based data provider: one `<SYMBOL>.csv` per symbol.
pub struct CsvDataProvider {
    pub directory: PathBuf,
}

impl CsvDataProvider {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn file_for(&self, symbol: &str) -> Option<PathBuf> {
        [symbol.to_string(), symbol.to_uppercase()]
            .into_iter()
            .map(|name| self.directory.join(format!("{}.csv", name)))
            .find(|p| p.exists())
    }
}

#[async_trait]
impl DataProvider for CsvDataProvider {
    async fn load_series(&self, symbol: &str, period: Period) -> Result<Series, DataError> {
        let file_path = self.file_for(symbol).ok_or_else(|| {
            DataError::NotFound(format!(
                "CSV file not found: {}",
                self.directory.join(format!("{}.csv", symbol)).display()
            ))
        })?;
        let series = csv_loader::load_series_from_csv(&file_path)?;
        let selected = period.select(&series);
        tracing::info!(
            symbol = %symbol,
            period = %period,
            rows = selected.len(),
            file = %file_path.display(),
            "Loaded series"
        );
        Ok(selected)
    }

    async fn available_symbols(&self) -> Result<Vec<String>, DataError> {
        let mut symbols = Vec::new();
        let entries = std::fs::read_dir(&self.directory)?;
        for entry in entries {
            let path = entry?.path();
            if is_csv(&path) {
                if let Some(stem) = path.file_stem() {
                    symbols.push(stem.to_string_lossy().to_string());
                }
            }
        }
        symbols.sort();
        Ok(symbols)
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// Serves series already held in memory.
pub struct InMemoryDataProvider {
    series: SeriesSet,
}

impl InMemoryDataProvider {
    pub fn new(series: SeriesSet) -> Self {
        Self { series }
    }
}

#[async_trait]
impl DataProvider for InMemoryDataProvider {
    async fn load_series(&self, symbol: &str, period: Period) -> Result<Series, DataError> {
        self.series
            .get(symbol)
            .map(|s| period.select(s))
            .ok_or_else(|| DataError::NotFound(format!("No data for symbol: {}", symbol)))
    }

    async fn available_symbols(&self) -> Result<Vec<String>, DataError> {
        Ok(self.series.symbols().into_iter().map(String::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tradeviz_core::{Bar, Series};

    const CSV: &str = "\
Date,Open,High,Low,Close,Volume
2024-01-02,10,11,9,10.5,100
2024-01-03,10.5,12,10,11.5,200
2024-01-04,11.5,12.5,11,12,300
2024-01-05,12,13,11.5,12.5,400
2024-01-08,12.5,13.5,12,13,500
2024-01-09,13,14,12.5,13.5,600
";

    fn data_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("AAPL.csv"), CSV).unwrap();
        std::fs::write(dir.path().join("GOOGL.csv"), "date,close\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_csv_provider_loads_period() {
        let dir = data_dir();
        let provider = CsvDataProvider::new(dir.path());

        let all = provider.load_series("AAPL", Period::Max).await.unwrap();
        assert_eq!(all.len(), 6);

        let recent = provider.load_series("AAPL", Period::FiveDays).await.unwrap();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent.first_date(), NaiveDate::from_ymd_opt(2024, 1, 3));
    }

    #[tokio::test]
    async fn test_csv_provider_symbol_lookup() {
        let dir = data_dir();
        let provider = CsvDataProvider::new(dir.path());

        // lower-case request finds the upper-case file
        assert!(provider.load_series("aapl", Period::Max).await.is_ok());
        let err = provider.load_series("TSLA", Period::Max).await.unwrap_err();
        assert!(matches!(err, DataError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_csv_provider_empty_file_gives_empty_series() {
        let dir = data_dir();
        let provider = CsvDataProvider::new(dir.path());
        let series = provider.load_series("GOOGL", Period::OneMonth).await.unwrap();
        assert!(series.is_empty());
    }

    #[tokio::test]
    async fn test_available_symbols() {
        let dir = data_dir();
        let provider = CsvDataProvider::new(dir.path());
        let symbols = provider.available_symbols().await.unwrap();
        assert_eq!(symbols, vec!["AAPL".to_string(), "GOOGL".to_string()]);
    }

    #[tokio::test]
    async fn test_load_set_keeps_request_order() {
        let dir = data_dir();
        let provider = CsvDataProvider::new(dir.path());
        let set = provider
            .load_set(&["GOOGL".to_string(), "AAPL".to_string()], Period::Max)
            .await
            .unwrap();
        assert_eq!(set.symbols(), vec!["GOOGL", "AAPL"]);
    }

    #[tokio::test]
    async fn test_in_memory_provider() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let series =
            Series::from_bars("META", &[Bar::new(day, 1.0, 2.0, 0.5, 1.5, 10)]).unwrap();
        let provider = InMemoryDataProvider::new(std::iter::once(series).collect());

        assert_eq!(provider.available_symbols().await.unwrap(), vec!["META"]);
        let loaded = provider.load_series("META", Period::OneDay).await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(provider.load_series("AMZN", Period::Max).await.is_err());
    }
}
