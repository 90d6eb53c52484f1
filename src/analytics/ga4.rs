use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;
use crate::config::{non_empty, AnalyticsConfig};
use crate::errors::SiteError;
use super::events::AnalyticsEvent;
use super::vendor::{AnalyticsVendor, VendorCategory};

const COLLECT_URL: &str = "https://www.google-analytics.com/mp/collect";

/// GA4 through the Measurement Protocol.
pub struct Ga4Vendor {
    client: Client,
    measurement_id: Option<String>,
    api_secret: Option<String>,
    endpoint: String,
}

impl Ga4Vendor {
    pub fn new(client: Client, config: &AnalyticsConfig) -> Self {
        Self {
            client,
            measurement_id: non_empty(&config.ga_measurement_id).map(str::to_string),
            api_secret: non_empty(&config.ga_api_secret).map(str::to_string),
            endpoint: COLLECT_URL.to_string(),
        }
    }

    pub fn payload(event: &AnalyticsEvent) -> Value {
        json!({
            "client_id": event.client_id,
            "events": [{
                "name": event.name,
                "params": event.params,
            }],
        })
    }
}

#[async_trait]
impl AnalyticsVendor for Ga4Vendor {
    fn name(&self) -> &str { "ga4" }

    fn category(&self) -> VendorCategory { VendorCategory::Analytics }

    fn is_available(&self) -> bool {
        self.measurement_id.is_some() && self.api_secret.is_some()
    }

    async fn send(&self, event: &AnalyticsEvent) -> Result<(), SiteError> {
        let (Some(measurement_id), Some(api_secret)) = (&self.measurement_id, &self.api_secret) else {
            return Err(SiteError::Config("GA4 is not configured".into()));
        };

        let resp = self.client
            .post(&self.endpoint)
            .query(&[("measurement_id", measurement_id), ("api_secret", api_secret)])
            .json(&Self::payload(event))
            .send()
            .await
            .map_err(|e| SiteError::Network(format!("GA4 request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SiteError::Vendor(format!("GA4 returned {}", status)));
        }
        debug!(event = %event.name, "GA4 event sent");
        Ok(())
    }
}
