//! Progress ledger: resume offsets per media reference, plus the two
//! singleton slots (active session and mini-player snapshot).
//!
//! Both namespaces share one key/value store but never share keys.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::models::{MediaRef, MiniSnapshot, PlaybackSession, SavedSession};
use crate::storage::{KeyValueStore, MemoryStore};
use crate::utils::Result;

const PROGRESS_PREFIX: &str = "progress:";
const SESSION_SLOT: &str = "slot:session";
const MINI_SLOT: &str = "slot:mini";

#[derive(Clone)]
pub struct ProgressLedger {
    store: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for ProgressLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressLedger").finish_non_exhaustive()
    }
}

impl ProgressLedger {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    fn progress_key(media: &MediaRef) -> String {
        format!("{}{}", PROGRESS_PREFIX, media)
    }

    /// Last watched offset in seconds. Unparseable entries read as absent.
    pub fn get(&self, media: &MediaRef) -> Result<Option<f64>> {
        let Some(raw) = self.store.get(&Self::progress_key(media))? else {
            return Ok(None);
        };

        match raw.parse::<f64>() {
            Ok(offset) if offset.is_finite() => Ok(Some(offset)),
            _ => {
                warn!("Ignoring unreadable progress entry for {}: {:?}", media, raw);
                Ok(None)
            }
        }
    }

    pub fn set(&self, media: &MediaRef, offset: f64) -> Result<()> {
        self.store
            .set(&Self::progress_key(media), &offset.to_string())
    }

    pub fn clear(&self, media: &MediaRef) -> Result<()> {
        debug!("Clearing progress for {}", media);
        self.store.remove(&Self::progress_key(media))
    }

    pub fn save_session(&self, session: &PlaybackSession) -> Result<()> {
        self.write_slot(SESSION_SLOT, &SavedSession::from(session))
    }

    pub fn load_session(&self) -> Result<Option<SavedSession>> {
        self.read_slot(SESSION_SLOT)
    }

    pub fn clear_session(&self) -> Result<()> {
        self.store.remove(SESSION_SLOT)
    }

    /// Persist the mini-player snapshot, replacing any earlier one
    pub fn save_mini(&self, snapshot: &MiniSnapshot) -> Result<()> {
        self.write_slot(MINI_SLOT, snapshot)
    }

    pub fn load_mini(&self) -> Result<Option<MiniSnapshot>> {
        self.read_slot(MINI_SLOT)
    }

    pub fn clear_mini(&self) -> Result<()> {
        self.store.remove(MINI_SLOT)
    }

    fn write_slot<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.store.set(key, &json)
    }

    fn read_slot<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Discarding unreadable {} slot: {}", key, e);
                Ok(None)
            }
        }
    }
}
