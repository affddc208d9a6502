use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tradeviz_core::{DataError, ParsePeriodError};
use tradeviz_indicators::ParseStudyError;

/// Errors a handler can answer with. Rendered as `{ "error": "..." }`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Data(#[from] DataError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Data(DataError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Data(DataError::ParseError(_) | DataError::InvalidSeries(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Data(DataError::IoError(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ParsePeriodError> for ApiError {
    fn from(e: ParsePeriodError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<ParseStudyError> for ApiError {
    fn from(e: ParseStudyError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "Request rejected");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
