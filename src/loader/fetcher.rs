use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use crate::errors::SiteError;

/// Performs the one network load behind a script key.
#[async_trait]
pub trait ScriptFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, SiteError>;
}

pub struct HttpScriptFetcher {
    client: Client,
}

impl HttpScriptFetcher {
    pub fn new(connect_timeout: Duration) -> Result<Self, SiteError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| SiteError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ScriptFetcher for HttpScriptFetcher {
    async fn fetch(&self, url: &str) -> Result<String, SiteError> {
        let resp = self.client
            .get(url)
            .send()
            .await
            .map_err(|e| SiteError::Network(format!("Script request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SiteError::ScriptLoad(format!("Script endpoint returned {}", status)));
        }

        resp.text()
            .await
            .map_err(|e| SiteError::ScriptLoad(format!("Failed to read script body: {}", e)))
    }
}
