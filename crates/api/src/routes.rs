use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tradeviz_core::{CloseTable, Period};
use tradeviz_indicators::{
    apply_studies, describe, ColumnSummary, IndicatorSettings, Study, StudyFailure, StudyKind,
    StudyReport,
};

pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Health
        .route("/health", get(health_check))
        // Symbols
        .route("/symbols", get(list_symbols))
        // Series with indicator columns
        .route("/series/{symbol}", get(get_series))
        .route("/summary/{symbol}", get(get_summary))
        // Multi-symbol close prices
        .route("/compare", get(compare))
}

// ---------------------------------------------------------------------------
// Query parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct SeriesQuery {
    pub period: Option<String>,
    /// Comma-separated indicator names. Absent means every indicator;
    /// an empty value means none.
    pub indicators: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CompareQuery {
    pub symbols: Option<String>,
    pub period: Option<String>,
}

fn parse_period(raw: Option<&str>, default: Period) -> Result<Period, ApiError> {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s.parse()?),
        _ => Ok(default),
    }
}

fn parse_studies(raw: Option<&str>, settings: &IndicatorSettings) -> Result<Vec<Study>, ApiError> {
    let kinds = match raw {
        Some(list) => StudyKind::parse_list(list)?,
        None => StudyKind::ALL.to_vec(),
    };
    Ok(settings.studies(&kinds))
}

async fn load_report(
    state: &AppState,
    symbol: &str,
    query: &SeriesQuery,
) -> Result<(Period, StudyReport), ApiError> {
    let period = parse_period(query.period.as_deref(), state.default_period)?;
    let studies = parse_studies(query.indicators.as_deref(), &state.settings)?;
    let series = state.provider.load_series(symbol, period).await?;
    Ok((period, apply_studies(series, &studies)))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ---------------------------------------------------------------------------
// Symbols
// ---------------------------------------------------------------------------

async fn list_symbols(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let symbols = state.provider.available_symbols().await?;
    Ok(Json(serde_json::json!({ "symbols": symbols })))
}

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SeriesResponse {
    period: Period,
    #[serde(flatten)]
    report: StudyReport,
}

async fn get_series(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<SeriesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (period, report) = load_report(&state, &symbol, &query).await?;
    tracing::debug!(
        symbol = %symbol,
        period = %period,
        rows = report.series.series().len(),
        failed = report.failures.len(),
        "Serving series"
    );
    Ok(Json(SeriesResponse { period, report }))
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SummaryResponse {
    symbol: String,
    period: Period,
    rows: usize,
    first_date: Option<NaiveDate>,
    last_date: Option<NaiveDate>,
    columns: Vec<ColumnSummary>,
    failures: Vec<StudyFailure>,
}

async fn get_summary(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<SeriesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (period, report) = load_report(&state, &symbol, &query).await?;
    let series = report.series.series();
    Ok(Json(SummaryResponse {
        symbol: series.symbol().to_string(),
        period,
        rows: series.len(),
        first_date: series.first_date(),
        last_date: series.last_date(),
        columns: describe(&report.series),
        failures: report.failures,
    }))
}

// ---------------------------------------------------------------------------
// Compare
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct CompareResponse {
    period: Period,
    symbols: Vec<String>,
    #[serde(flatten)]
    table: CloseTable,
}

async fn compare(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CompareQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let period = parse_period(query.period.as_deref(), state.default_period)?;
    let symbols: Vec<String> = query
        .symbols
        .as_deref()
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if symbols.is_empty() {
        return Err(ApiError::BadRequest(
            "Query parameter 'symbols' must name at least one symbol".into(),
        ));
    }

    let set = state.provider.load_set(&symbols, period).await?;
    Ok(Json(CompareResponse {
        period,
        symbols: set.symbols().into_iter().map(String::from).collect(),
        table: set.close_table(),
    }))
}
