use std::sync::Arc;
use axum::http::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use crate::config::RecaptchaConfig;
use super::recaptcha::{RecaptchaVerifier, SiteverifyResponse};

/// Contact form body. Only `token` matters here; the other fields (name,
/// email, phone, message) are passed along untyped and never validated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactSubmission {
    token: Option<Value>,
    action: Option<Value>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ContactSubmission {
    /// Anything other than a JSON object carries no usable token.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_ref()
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_ref().and_then(Value::as_str)
    }
}

/// Stable, machine-readable rejection codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    MethodNotAllowed,
    MissingToken,
    RecaptchaFailed,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed => "method_not_allowed",
            Self::MissingToken => "missing_token",
            Self::RecaptchaFailed => "recaptcha_failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerificationError {
    pub code: ErrorCode,
    pub message: &'static str,
    pub status: StatusCode,
}

impl VerificationError {
    fn method_not_allowed() -> Self {
        Self {
            code: ErrorCode::MethodNotAllowed,
            message: "Method not allowed",
            status: StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    fn missing_token() -> Self {
        Self {
            code: ErrorCode::MissingToken,
            message: "Missing reCAPTCHA token",
            status: StatusCode::BAD_REQUEST,
        }
    }

    fn recaptcha_failed() -> Self {
        Self {
            code: ErrorCode::RecaptchaFailed,
            message: "reCAPTCHA verification failed",
            status: StatusCode::BAD_REQUEST,
        }
    }
}

/// Why a verification was refused. Logged, never returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RejectReason {
    SecretMissing,
    Upstream,
    NotSuccessful,
    LowScore,
    ActionMismatch,
}

impl RejectReason {
    fn as_str(&self) -> &'static str {
        match self {
            Self::SecretMissing => "secret_missing",
            Self::Upstream => "upstream_error",
            Self::NotSuccessful => "not_successful",
            Self::LowScore => "low_score",
            Self::ActionMismatch => "action_mismatch",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Accepted {
    pub score: f64,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenge_ts: Option<String>,
}

/// Single-shot verification of a contact form submission.
///
/// Each call is independent. Every verification failure (secret missing,
/// upstream error, low score, wrong action) surfaces as `recaptcha_failed`.
pub struct ContactVerifier {
    upstream: Arc<dyn RecaptchaVerifier>,
    secret: Option<String>,
    expected_action: String,
    min_score: f64,
}

impl ContactVerifier {
    pub fn new(upstream: Arc<dyn RecaptchaVerifier>, config: &RecaptchaConfig) -> Self {
        Self {
            upstream,
            secret: config.secret().map(str::to_string),
            expected_action: config.expected_action.clone(),
            min_score: config.min_score,
        }
    }

    pub fn expected_action(&self) -> &str {
        &self.expected_action
    }

    pub async fn verify(&self, method: &Method, body: &[u8]) -> Result<Accepted, VerificationError> {
        if method != Method::POST {
            debug!(method = %method, "Rejecting contact request method");
            return Err(VerificationError::method_not_allowed());
        }

        let submission = ContactSubmission::from_body(body);
        let Some(token) = submission.token() else {
            return Err(VerificationError::missing_token());
        };

        if let Some(claimed) = submission.action() {
            if claimed != self.expected_action {
                debug!(claimed, expected = %self.expected_action, "Client-declared action differs");
            }
        }

        let Some(secret) = self.secret.as_deref() else {
            return Err(self.reject(RejectReason::SecretMissing, None));
        };

        let response = match self.upstream.verify(secret, token).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, error_type = e.classify().error_type, "siteverify call failed");
                return Err(self.reject(RejectReason::Upstream, None));
            }
        };

        self.evaluate(response)
    }

    fn evaluate(&self, response: SiteverifyResponse) -> Result<Accepted, VerificationError> {
        if !response.success {
            return Err(self.reject(RejectReason::NotSuccessful, Some(&response)));
        }

        let score = response.score.unwrap_or(0.0);
        if score <= self.min_score {
            return Err(self.reject(RejectReason::LowScore, Some(&response)));
        }

        if response.action.as_deref() != Some(self.expected_action.as_str()) {
            return Err(self.reject(RejectReason::ActionMismatch, Some(&response)));
        }

        info!(score, action = %self.expected_action, "Contact submission verified");
        Ok(Accepted {
            score,
            action: self.expected_action.clone(),
            hostname: response.hostname,
            challenge_ts: response.challenge_ts,
        })
    }

    fn reject(&self, reason: RejectReason, response: Option<&SiteverifyResponse>) -> VerificationError {
        warn!(
            reason = reason.as_str(),
            score = ?response.and_then(|r| r.score),
            action = ?response.and_then(|r| r.action.as_deref()),
            error_codes = ?response.map(|r| &r.error_codes),
            "Contact submission rejected"
        );
        VerificationError::recaptcha_failed()
    }
}
