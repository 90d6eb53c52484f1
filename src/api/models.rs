use serde::{Deserialize, Serialize};
use crate::consent::{ConsentDecision, ConsentRecord};
use crate::loader::ScriptStatus;
use crate::site::Locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentPreset {
    AcceptAll,
    RejectAll,
}

/// Either a preset or individual category flags.
#[derive(Debug, Deserialize)]
pub struct SaveConsentRequest {
    pub preset: Option<ConsentPreset>,
    pub functional: Option<bool>,
    pub analytics: Option<bool>,
    pub marketing: Option<bool>,
}

impl SaveConsentRequest {
    pub fn decision(&self) -> ConsentDecision {
        match self.preset {
            Some(ConsentPreset::AcceptAll) => ConsentDecision::accept_all(),
            Some(ConsentPreset::RejectAll) => ConsentDecision::reject_all(),
            None => ConsentDecision {
                functional: self.functional,
                analytics: self.analytics,
                marketing: self.marketing,
            },
        }
    }
}

#[derive(Serialize)]
pub struct ConsentResponse {
    pub decided: bool,
    pub consent: Option<ConsentRecord>,
}

#[derive(Serialize)]
pub struct ScriptResponse {
    pub key: String,
    pub status: ScriptStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StructuredDataQuery {
    pub lang: Option<Locale>,
}
