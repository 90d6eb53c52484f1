pub mod record;
pub mod storage;
pub mod events;
pub mod store;

pub use record::{ConsentDecision, ConsentRecord, ConsentState};
pub use storage::{KeyValueStorage, MemoryStorage};
pub use events::SiteEvent;
pub use store::{ConsentStore, CONSENT_STORAGE_KEY};
