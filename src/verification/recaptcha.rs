use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use crate::config::credentials::redact_secrets;
use crate::errors::SiteError;

/// Body returned by the siteverify endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteverifyResponse {
    pub success: bool,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub challenge_ts: Option<String>,
    #[serde(default, rename = "error-codes")]
    pub error_codes: Vec<String>,
}

/// Upstream token check.
#[async_trait]
pub trait RecaptchaVerifier: Send + Sync {
    async fn verify(&self, secret: &str, token: &str) -> Result<SiteverifyResponse, SiteError>;
}

pub struct GoogleRecaptchaVerifier {
    client: Client,
    verify_url: String,
}

impl GoogleRecaptchaVerifier {
    pub fn new(verify_url: &str, timeout: Duration) -> Result<Self, SiteError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SiteError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, verify_url: verify_url.to_string() })
    }
}

#[async_trait]
impl RecaptchaVerifier for GoogleRecaptchaVerifier {
    async fn verify(&self, secret: &str, token: &str) -> Result<SiteverifyResponse, SiteError> {
        let resp = self.client
            .post(&self.verify_url)
            .form(&[("secret", secret), ("response", token)])
            .send()
            .await
            .map_err(|e| {
                let detail = redact_secrets(&e.to_string(), &[secret]);
                if e.is_timeout() {
                    SiteError::Timeout(format!("siteverify timed out: {}", detail))
                } else {
                    SiteError::Network(format!("siteverify request failed: {}", detail))
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SiteError::Verification(format!("siteverify returned {}", status)));
        }

        resp.json::<SiteverifyResponse>()
            .await
            .map_err(|e| SiteError::Verification(format!("Invalid siteverify response: {}", e)))
    }
}
