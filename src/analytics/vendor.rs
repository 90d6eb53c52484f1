use async_trait::async_trait;
use serde::Serialize;
use crate::consent::ConsentState;
use crate::errors::SiteError;
use super::events::AnalyticsEvent;

/// Which consent category gates a vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorCategory {
    Analytics,
    Marketing,
}

impl VendorCategory {
    pub fn granted_by(&self, consent: &ConsentState) -> bool {
        match self {
            Self::Analytics => consent.analytics_granted(),
            Self::Marketing => consent.marketing_granted(),
        }
    }
}

/// An outbound analytics or advertising sink.
#[async_trait]
pub trait AnalyticsVendor: Send + Sync {
    /// Vendor name for logging and reports
    fn name(&self) -> &str;

    fn category(&self) -> VendorCategory;

    /// False when the vendor is not configured; dispatch then skips it quietly.
    fn is_available(&self) -> bool;

    async fn send(&self, event: &AnalyticsEvent) -> Result<(), SiteError>;
}
