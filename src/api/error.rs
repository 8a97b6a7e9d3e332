use axum::Json;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde_json::json;

use super::render;
use crate::ladder::LadderError;
use crate::market::MarketError;
use crate::report::ReportError;

/// Request failure. Renders as the generic failure page.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Unprocessable(String),
    BadGateway(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::Unprocessable(msg)
            | ApiError::BadGateway(msg)
            | ApiError::Internal(msg) => msg.as_str(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Html(render::error_page(status, self.message()))).into_response()
    }
}

/// Same failure, rendered as `{"error": ...}` for the JSON route.
#[derive(Debug)]
pub struct JsonError(pub ApiError);

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        (status, Json(json!({ "error": self.0.message() }))).into_response()
    }
}

impl From<ApiError> for JsonError {
    fn from(err: ApiError) -> Self {
        JsonError(err)
    }
}

impl From<ReportError> for JsonError {
    fn from(err: ReportError) -> Self {
        JsonError(err.into())
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        let msg = err.to_string();
        match err {
            ReportError::Market(MarketError::InvalidTicker(_)) => ApiError::BadRequest(msg),
            ReportError::Market(MarketError::NoData(_))
            | ReportError::Market(MarketError::IndexOutOfRange { .. }) => ApiError::NotFound(msg),
            ReportError::Market(MarketError::Network(_))
            | ReportError::Market(MarketError::Parse(_))
            | ReportError::Market(MarketError::Unauthorized(_)) => ApiError::BadGateway(msg),
            ReportError::Market(MarketError::IO(_)) => ApiError::Internal(msg),
            ReportError::Ladder(
                LadderError::EmptyChain
                | LadderError::DivideByZero(_)
                | LadderError::InvalidPrice(_),
            ) => ApiError::Unprocessable(msg),
        }
    }
}
