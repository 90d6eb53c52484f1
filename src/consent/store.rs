use std::sync::Arc;
use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use super::events::SiteEvent;
use super::record::{ConsentDecision, ConsentRecord, ConsentState};
use super::storage::KeyValueStorage;

/// Fixed storage key for the persisted decision.
pub const CONSENT_STORAGE_KEY: &str = "clinic_consent_v1";

const EVENT_CAPACITY: usize = 32;

/// Reads and writes the visitor's consent decision and announces every save.
///
/// Notifications go out on a broadcast channel: subscribers registered before
/// a save observe it, later subscribers do not see earlier saves.
#[derive(Clone)]
pub struct ConsentStore {
    storage: Arc<dyn KeyValueStorage>,
    events: broadcast::Sender<SiteEvent>,
}

impl ConsentStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { storage, events }
    }

    /// Current decision. Missing, unreadable or corrupt data all mean
    /// `Undecided`; this never fails.
    pub fn read(&self) -> ConsentState {
        let raw = match self.storage.get(CONSENT_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return ConsentState::Undecided,
            Err(e) => {
                warn!(error = %e, "Consent storage unreadable, treating as undecided");
                return ConsentState::Undecided;
            }
        };

        match serde_json::from_str::<ConsentRecord>(&raw) {
            Ok(record) => ConsentState::Decided(record),
            Err(e) => {
                warn!(error = %e, "Stored consent is corrupt, treating as undecided");
                ConsentState::Undecided
            }
        }
    }

    /// Merge `decision` with the defaults, stamp it, persist it and notify
    /// subscribers. A storage failure is logged; the decision still applies
    /// for the running process.
    pub fn save(&self, decision: ConsentDecision) -> ConsentRecord {
        let record = decision.into_record(Utc::now());

        match serde_json::to_string(&record) {
            Ok(json) => {
                if let Err(e) = self.storage.set(CONSENT_STORAGE_KEY, &json) {
                    warn!(error = %e, "Failed to persist consent decision");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize consent decision"),
        }

        info!(
            analytics = record.analytics,
            marketing = record.marketing,
            "Consent decision saved"
        );
        self.publish(SiteEvent::ConsentUpdated(record.clone()));
        record
    }

    /// Ask whoever renders the settings modal to open it.
    pub fn open_settings(&self) {
        self.publish(SiteEvent::OpenSettings);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SiteEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: SiteEvent) {
        // No receivers is fine.
        match self.events.send(event) {
            Ok(n) => debug!(receivers = n, "Site event published"),
            Err(_) => debug!("Site event published with no receivers"),
        }
    }
}
