use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use crate::errors::SiteError;
use crate::verification::VerificationError;

impl SiteError {
    /// Stable code used in JSON error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            SiteError::Config(_) => "feature_disabled",
            SiteError::InvalidRequest(_) | SiteError::Json(_) => "invalid_request",
            SiteError::ScriptLoad(_) | SiteError::Network(_) | SiteError::Timeout(_) => "unavailable",
            SiteError::Verification(_) => "recaptcha_failed",
            _ => "internal_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            SiteError::Config(_) => StatusCode::SERVICE_UNAVAILABLE,
            SiteError::InvalidRequest(_) | SiteError::Json(_) => StatusCode::BAD_REQUEST,
            SiteError::ScriptLoad(_) | SiteError::Network(_) | SiteError::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,
            SiteError::Verification(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SiteError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({"error": self.code(), "message": message}))).into_response()
    }
}

impl IntoResponse for VerificationError {
    fn into_response(self) -> axum::response::Response {
        (
            self.status,
            Json(json!({"error": self.code.as_str(), "message": self.message})),
        )
            .into_response()
    }
}
