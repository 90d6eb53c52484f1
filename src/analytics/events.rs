use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A logical site interaction, forwarded to every vendor the visitor allows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub name: String,
    #[serde(default)]
    pub params: Map<String, Value>,
    #[serde(default = "new_client_id")]
    pub client_id: String,
}

fn new_client_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl AnalyticsEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Map::new(),
            client_id: new_client_id(),
        }
    }

    pub fn with_param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    pub fn whatsapp_click(location: &str) -> Self {
        Self::new("whatsapp_click").with_param("location", location)
    }

    pub fn phone_click(location: &str) -> Self {
        Self::new("phone_click").with_param("location", location)
    }

    pub fn contact_form_submit(score: f64) -> Self {
        Self::new("contact_form_submit")
            .with_param("form", "contact")
            .with_param("recaptcha_score", score)
    }

    pub fn map_interaction(action: &str) -> Self {
        Self::new("map_interaction").with_param("action", action)
    }

    pub fn appointment_cta(location: &str) -> Self {
        Self::new("appointment_cta").with_param("location", location)
    }
}
