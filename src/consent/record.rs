use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted consent decision. `timestamp` serializes as RFC 3339.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentRecord {
    pub functional: bool,
    pub analytics: bool,
    pub marketing: bool,
    pub timestamp: DateTime<Utc>,
}

/// A partial decision as submitted by the banner or the settings modal.
/// Unset categories fall back to functional=true, analytics/marketing=false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentDecision {
    pub functional: Option<bool>,
    pub analytics: Option<bool>,
    pub marketing: Option<bool>,
}

impl ConsentDecision {
    pub fn accept_all() -> Self {
        Self {
            functional: Some(true),
            analytics: Some(true),
            marketing: Some(true),
        }
    }

    pub fn reject_all() -> Self {
        Self {
            functional: Some(true),
            analytics: Some(false),
            marketing: Some(false),
        }
    }

    pub fn custom(analytics: bool, marketing: bool) -> Self {
        Self {
            functional: None,
            analytics: Some(analytics),
            marketing: Some(marketing),
        }
    }

    pub fn into_record(self, timestamp: DateTime<Utc>) -> ConsentRecord {
        ConsentRecord {
            functional: self.functional.unwrap_or(true),
            analytics: self.analytics.unwrap_or(false),
            marketing: self.marketing.unwrap_or(false),
            timestamp,
        }
    }
}

/// What the store knows about the visitor. `Undecided` is distinct from an
/// explicit all-false decision: only the former re-opens the banner.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsentState {
    Undecided,
    Decided(ConsentRecord),
}

impl ConsentState {
    pub fn record(&self) -> Option<&ConsentRecord> {
        match self {
            Self::Decided(r) => Some(r),
            Self::Undecided => None,
        }
    }

    pub fn is_decided(&self) -> bool {
        matches!(self, Self::Decided(_))
    }

    pub fn analytics_granted(&self) -> bool {
        self.record().is_some_and(|r| r.analytics)
    }

    pub fn marketing_granted(&self) -> bool {
        self.record().is_some_and(|r| r.marketing)
    }
}
