use axum::{http::StatusCode, response::IntoResponse, Json};

/// Error kinds surfaced by the derivation core and the storage layer.
///
/// The core functions only ever produce `InvalidInput` and
/// `InvalidRecurrence`; the other two come from the store and the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColonyError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid recurrence: {0}")]
    InvalidRecurrence(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl ColonyError {
    pub fn invalid_date(value: &str) -> Self {
        Self::InvalidInput(format!("'{value}' is not a valid YYYY-MM-DD date"))
    }
}

impl IntoResponse for ColonyError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            Self::InvalidInput(_) | Self::InvalidRecurrence(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        };
        log::warn!("Request rejected: {self}");
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

pub type ColonyResult<T> = Result<T, ColonyError>;

/// Parses a strict `YYYY-MM-DD` date.
pub fn parse_iso_date(value: &str) -> ColonyResult<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ColonyError::invalid_date(value))
}
