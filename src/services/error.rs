use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::envelope::ErrorEnvelope;
use crate::utils::money::AmountError;

/// The request itself is unusable; no upstream call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("action not specified")]
    MissingAction,
    #[error("action not found")]
    UnknownAction(String),
    #[error("missing required parameter(s): {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),
    #[error("malformed query string: {0}")]
    MalformedQuery(String),
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream returned a non-JSON body: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Transport(#[from] UpstreamError),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Request(_) => StatusCode::BAD_REQUEST,
            GatewayError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        match self {
            GatewayError::Request(e) => ErrorEnvelope::new(e.to_string()),
            GatewayError::Transport(e) => ErrorEnvelope::new(format!("internal server error: {}", e)),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.envelope())).into_response()
    }
}
