use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core::errors::Error;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, detail) = if self.is_client_error() {
            (StatusCode::BAD_REQUEST, self.to_string())
        } else {
            tracing::error!(error = %self, "request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            )
        };
        (status, Json(ErrorBody { detail })).into_response()
    }
}
