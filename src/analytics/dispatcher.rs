use std::sync::Arc;
use futures::future::join_all;
use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use crate::consent::{ConsentState, ConsentStore, SiteEvent};
use super::events::AnalyticsEvent;
use super::vendor::AnalyticsVendor;

/// What happened to one dispatched event, per vendor.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct DispatchReport {
    pub event: String,
    pub delivered: Vec<String>,
    pub skipped_consent: Vec<String>,
    pub skipped_unavailable: Vec<String>,
    pub failed: Vec<String>,
}

impl DispatchReport {
    pub fn vendor_calls(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }
}

/// Consent-gated fan-out of analytics events.
///
/// Consent is read at dispatch time. Events dropped for lack of consent are
/// never resent after consent changes.
#[derive(Clone)]
pub struct Dispatcher {
    consent: ConsentStore,
    vendors: Vec<Arc<dyn AnalyticsVendor>>,
}

impl Dispatcher {
    pub fn new(consent: ConsentStore, vendors: Vec<Arc<dyn AnalyticsVendor>>) -> Self {
        Self { consent, vendors }
    }

    pub async fn dispatch(&self, event: &AnalyticsEvent) -> DispatchReport {
        let consent = self.consent.read();
        let mut report = DispatchReport {
            event: event.name.clone(),
            ..Default::default()
        };

        let mut eligible = Vec::new();
        for vendor in &self.vendors {
            if !vendor.category().granted_by(&consent) {
                report.skipped_consent.push(vendor.name().to_string());
            } else if !vendor.is_available() {
                report.skipped_unavailable.push(vendor.name().to_string());
            } else {
                eligible.push(vendor.clone());
            }
        }

        let sends = eligible.iter().map(|vendor| async move {
            (vendor.name().to_string(), vendor.send(event).await)
        });
        for (name, result) in join_all(sends).await {
            match result {
                Ok(()) => report.delivered.push(name),
                Err(e) => {
                    warn!(vendor = %name, event = %event.name, error = %e, "Vendor send failed");
                    report.failed.push(name);
                }
            }
        }

        debug!(
            event = %event.name,
            delivered = report.delivered.len(),
            skipped = report.skipped_consent.len() + report.skipped_unavailable.len(),
            "Event dispatched"
        );
        report
    }

    /// Follow consent changes for logging. Runs until the store is dropped.
    pub fn watch_consent(&self, mut events: broadcast::Receiver<SiteEvent>) -> JoinHandle<()> {
        let vendors: Vec<(String, bool)> = self.vendors.iter()
            .map(|v| (v.name().to_string(), v.is_available()))
            .collect();
        let categories: Vec<_> = self.vendors.iter().map(|v| v.category()).collect();

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(SiteEvent::ConsentUpdated(record)) => {
                        let state = ConsentState::Decided(record);
                        let active: Vec<&str> = vendors.iter()
                            .zip(&categories)
                            .filter(|((_, available), category)| *available && category.granted_by(&state))
                            .map(|((name, _), _)| name.as_str())
                            .collect();
                        info!(active_vendors = ?active, "Consent changed, vendor routing updated");
                    }
                    Ok(SiteEvent::OpenSettings) => debug!("Consent settings requested"),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Consent listener lagged behind");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}
