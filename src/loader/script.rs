use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared, TryFutureExt};
use serde::Serialize;
use tracing::{info, warn};
use crate::errors::SiteError;
use super::fetcher::ScriptFetcher;

/// Outcome shared by every caller of one load attempt.
pub type LoadResult = Result<SdkHandle, Arc<SiteError>>;

type PendingLoad = Shared<BoxFuture<'static, LoadResult>>;

/// A loaded SDK. Clones share the script body.
#[derive(Debug, Clone)]
pub struct SdkHandle {
    pub key: String,
    pub url: String,
    pub script: Arc<String>,
    pub loaded_at: DateTime<Utc>,
}

impl SdkHandle {
    /// True when both handles come from the same load.
    pub fn same_load(&self, other: &SdkHandle) -> bool {
        Arc::ptr_eq(&self.script, &other.script)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptStatus {
    Unstarted,
    Loading,
    Ready,
    Failed,
}

enum Slot {
    Loading { attempt: u64, pending: PendingLoad },
    Ready(SdkHandle),
    Failed { error: Arc<SiteError> },
}

/// Single-flight, memoizing loader for third-party scripts.
///
/// At most one fetch is in flight per key and every concurrent caller awaits
/// the same pending result. Success is cached for the life of the loader.
/// A failure is delivered to all callers of that attempt and the key is
/// marked `Failed`; the next `load` starts a new attempt.
pub struct ScriptLoader {
    fetcher: Arc<dyn ScriptFetcher>,
    slots: DashMap<String, Slot>,
    // Never reset, so a stale attempt can never match a newer slot.
    next_attempt: AtomicU64,
    started: AtomicU64,
    timeout: Option<Duration>,
}

impl ScriptLoader {
    pub fn new(fetcher: Arc<dyn ScriptFetcher>, timeout: Option<Duration>) -> Self {
        Self {
            fetcher,
            slots: DashMap::new(),
            next_attempt: AtomicU64::new(0),
            started: AtomicU64::new(0),
            timeout,
        }
    }

    pub async fn load(&self, key: &str, url: &str) -> LoadResult {
        // Check-then-insert happens under the shard lock; the guard is gone
        // before anything is awaited.
        let (attempt, pending) = match self.slots.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                let in_flight = match entry.get() {
                    Slot::Ready(handle) => return Ok(handle.clone()),
                    Slot::Loading { attempt, pending } => Some((*attempt, pending.clone())),
                    Slot::Failed { .. } => None,
                };
                match in_flight {
                    Some(found) => found,
                    None => {
                        let (attempt, pending) = self.start(key, url);
                        entry.insert(Slot::Loading { attempt, pending: pending.clone() });
                        (attempt, pending)
                    }
                }
            }
            Entry::Vacant(entry) => {
                let (attempt, pending) = self.start(key, url);
                entry.insert(Slot::Loading { attempt, pending: pending.clone() });
                (attempt, pending)
            }
        };

        let result = pending.await;
        self.settle(key, attempt, &result);
        result
    }

    pub fn status(&self, key: &str) -> ScriptStatus {
        match self.slots.get(key).as_deref() {
            None => ScriptStatus::Unstarted,
            Some(Slot::Loading { .. }) => ScriptStatus::Loading,
            Some(Slot::Ready(_)) => ScriptStatus::Ready,
            Some(Slot::Failed { .. }) => ScriptStatus::Failed,
        }
    }

    /// Last failure recorded for `key`, if its most recent attempt failed.
    pub fn last_error(&self, key: &str) -> Option<Arc<SiteError>> {
        match self.slots.get(key).as_deref() {
            Some(Slot::Failed { error }) => Some(error.clone()),
            _ => None,
        }
    }

    /// Number of load attempts started since creation or the last reset.
    pub fn loads_started(&self) -> u64 {
        self.started.load(Ordering::SeqCst)
    }

    /// Forget every key. In-flight callers still receive their result but it
    /// is not recorded.
    pub fn reset(&self) {
        self.slots.clear();
        self.started.store(0, Ordering::SeqCst);
    }

    fn start(&self, key: &str, url: &str) -> (u64, PendingLoad) {
        let attempt = self.next_attempt.fetch_add(1, Ordering::SeqCst) + 1;
        self.started.fetch_add(1, Ordering::SeqCst);
        let fetcher = self.fetcher.clone();
        let timeout = self.timeout;
        let key = key.to_string();
        let url = url.to_string();

        let pending = async move {
            info!(script = %key, attempt, "Loading third-party script");
            let fetch = fetcher.fetch(&url);
            let script = match timeout {
                Some(limit) => tokio::time::timeout(limit, fetch)
                    .await
                    .map_err(|_| SiteError::Timeout(format!("Loading {} exceeded {:?}", key, limit)))??,
                None => fetch.await?,
            };
            Ok::<_, SiteError>(SdkHandle {
                key,
                url,
                script: Arc::new(script),
                loaded_at: Utc::now(),
            })
        }
        .map_err(Arc::new)
        .boxed()
        .shared();

        (attempt, pending)
    }

    fn settle(&self, key: &str, attempt: u64, result: &LoadResult) {
        let Some(mut slot) = self.slots.get_mut(key) else {
            return;
        };
        // Only the first caller to finish records the outcome of its attempt.
        if !matches!(&*slot, Slot::Loading { attempt: a, .. } if *a == attempt) {
            return;
        }
        *slot = match result {
            Ok(handle) => {
                info!(script = %key, bytes = handle.script.len(), "Script ready");
                Slot::Ready(handle.clone())
            }
            Err(error) => {
                let class = error.classify();
                warn!(
                    script = %key,
                    error_type = class.error_type,
                    retryable = class.retryable,
                    error = %error,
                    "Script load failed"
                );
                Slot::Failed { error: error.clone() }
            }
        };
    }
}
