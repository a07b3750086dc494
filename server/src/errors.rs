//! HTTP error mapping. Every failure leaves the server as `{"error": "message"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use irsim_core::output::ErrorBody;
use irsim_core::IrError;

#[derive(Debug)]
pub enum ApiError {
    /// Input rejected by the engine (400).
    BadRequest(String),
    /// Body is not a valid request (422).
    Unprocessable(String),
    /// Unexpected server error (500).
    Internal(String),
}

impl From<IrError> for ApiError {
    fn from(err: IrError) -> Self { ApiError::BadRequest(err.to_string()) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}
