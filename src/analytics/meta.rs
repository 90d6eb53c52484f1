use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;
use crate::config::{non_empty, AnalyticsConfig};
use crate::errors::SiteError;
use super::events::AnalyticsEvent;
use super::vendor::{AnalyticsVendor, VendorCategory};

const GRAPH_URL: &str = "https://graph.facebook.com/v19.0";

/// Meta pixel through the Conversions API.
pub struct MetaPixelVendor {
    client: Client,
    pixel_id: Option<String>,
    access_token: Option<String>,
    base_url: String,
}

impl MetaPixelVendor {
    pub fn new(client: Client, config: &AnalyticsConfig) -> Self {
        Self {
            client,
            pixel_id: non_empty(&config.meta_pixel_id).map(str::to_string),
            access_token: non_empty(&config.meta_access_token).map(str::to_string),
            base_url: GRAPH_URL.to_string(),
        }
    }

    /// Map site events onto Meta standard events where one fits.
    pub fn standard_event_name(name: &str) -> &str {
        match name {
            "contact_form_submit" => "Lead",
            "whatsapp_click" | "phone_click" => "Contact",
            "appointment_cta" => "Schedule",
            "map_interaction" => "FindLocation",
            other => other,
        }
    }

    pub fn payload(event: &AnalyticsEvent) -> Value {
        json!({
            "data": [{
                "event_name": Self::standard_event_name(&event.name),
                "event_time": Utc::now().timestamp(),
                "event_id": uuid::Uuid::new_v4().to_string(),
                "action_source": "website",
                "user_data": { "external_id": event.client_id },
                "custom_data": event.params,
            }],
        })
    }
}

#[async_trait]
impl AnalyticsVendor for MetaPixelVendor {
    fn name(&self) -> &str { "meta_pixel" }

    fn category(&self) -> VendorCategory { VendorCategory::Marketing }

    fn is_available(&self) -> bool {
        self.pixel_id.is_some() && self.access_token.is_some()
    }

    async fn send(&self, event: &AnalyticsEvent) -> Result<(), SiteError> {
        let (Some(pixel_id), Some(token)) = (&self.pixel_id, &self.access_token) else {
            return Err(SiteError::Config("Meta pixel is not configured".into()));
        };

        let resp = self.client
            .post(format!("{}/{}/events", self.base_url, pixel_id))
            .query(&[("access_token", token)])
            .json(&Self::payload(event))
            .send()
            .await
            .map_err(|e| SiteError::Network(format!("Meta request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SiteError::Vendor(format!("Meta returned {}", status)));
        }
        debug!(event = %event.name, "Meta event sent");
        Ok(())
    }
}
