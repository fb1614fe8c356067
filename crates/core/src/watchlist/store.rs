//! In-memory watchlist mirrored to a single key-value slot.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::types::{
    DuplicatePolicy, WatchedEntry, WatchlistSummary, MAX_USER_RATING, MIN_USER_RATING,
};
use super::WatchlistError;
use crate::storage::{KeyValueStore, StorageError};

/// Result of a successful [`WatchlistStore::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Replaced,
}

/// The watchlist.
///
/// The in-memory collection is the source of truth. Every mutation rewrites
/// the whole collection to storage; a failed write leaves the store dirty and
/// is retried by the next mutation or [`WatchlistStore::flush`].
///
/// If the slot could not be read at startup nothing is written until a later
/// read succeeds; entries added in the meantime are then merged onto what
/// storage holds.
pub struct WatchlistStore {
    storage: Arc<dyn KeyValueStore>,
    key: String,
    policy: DuplicatePolicy,
    entries: Vec<WatchedEntry>,
    dirty: bool,
    load_failed: bool,
}

impl WatchlistStore {
    /// Load the collection stored under `key`.
    ///
    /// A missing slot or an unparsable document starts an empty list. A read
    /// failure also starts empty but keeps the stored document untouched.
    pub fn load(
        storage: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        policy: DuplicatePolicy,
    ) -> Self {
        let key = key.into();

        let (entries, load_failed) = match storage.get(&key) {
            Ok(raw) => (parse_stored(&key, raw), false),
            Err(e) => {
                error!("Failed to read watchlist '{}': {}", key, e);
                (Vec::new(), true)
            }
        };

        info!("Loaded watchlist: {} entries", entries.len());

        Self {
            storage,
            key,
            policy,
            entries,
            dirty: load_failed,
            load_failed,
        }
    }

    /// Add an entry according to the duplicate policy.
    pub fn add(&mut self, entry: WatchedEntry) -> Result<AddOutcome, WatchlistError> {
        if !(MIN_USER_RATING..=MAX_USER_RATING).contains(&entry.user_rating) {
            return Err(WatchlistError::InvalidRating(entry.user_rating));
        }

        let outcome = self.insert(entry)?;
        self.persist();
        Ok(outcome)
    }

    /// Remove every entry with `id`. Returns how many were removed.
    pub fn remove(&mut self, id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        let removed = before - self.entries.len();

        if removed > 0 {
            self.persist();
        } else {
            debug!("remove: '{}' not on watchlist", id);
        }

        removed
    }

    /// Retry writing the collection, surfacing the storage error.
    pub fn flush(&mut self) -> Result<(), WatchlistError> {
        self.write()?;
        Ok(())
    }

    pub fn entries(&self) -> &[WatchedEntry] {
        &self.entries
    }

    /// First entry for `id`.
    pub fn get(&self, id: &str) -> Option<&WatchedEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn summary(&self) -> WatchlistSummary {
        WatchlistSummary::from_entries(&self.entries)
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// True when storage lags memory (failed write or unread slot).
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn insert(&mut self, entry: WatchedEntry) -> Result<AddOutcome, WatchlistError> {
        let existing = self.entries.iter().position(|e| e.id == entry.id);

        match (existing, self.policy) {
            (Some(_), DuplicatePolicy::Reject) => Err(WatchlistError::AlreadyWatched(entry.id)),
            (Some(index), DuplicatePolicy::Replace) => {
                self.entries[index] = entry;
                Ok(AddOutcome::Replaced)
            }
            _ => {
                self.entries.push(entry);
                Ok(AddOutcome::Added)
            }
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.write() {
            error!(
                "Failed to persist watchlist ({} entries kept in memory): {}",
                self.entries.len(),
                e
            );
        }
    }

    fn write(&mut self) -> Result<(), StorageError> {
        let result = self.try_write();
        self.dirty = result.is_err();
        result
    }

    fn try_write(&mut self) -> Result<(), StorageError> {
        if self.load_failed {
            self.merge_stored()?;
        }

        let serialized = serde_json::to_string(&self.entries)
            .map_err(|e| StorageError::Database(format!("serialize watchlist: {}", e)))?;

        self.storage.set(&self.key, &serialized)
    }

    /// Re-read the slot that failed at startup and replay in-memory entries
    /// on top of it.
    fn merge_stored(&mut self) -> Result<(), StorageError> {
        let raw = self.storage.get(&self.key)?;
        let stored = parse_stored(&self.key, raw);
        let pending = std::mem::replace(&mut self.entries, stored);
        self.load_failed = false;

        info!(
            "Recovered stored watchlist ({} entries), merging {} pending",
            self.entries.len(),
            pending.len()
        );

        for entry in pending {
            if let Err(e) = self.insert(entry) {
                warn!("Dropping pending watchlist entry: {}", e);
            }
        }
        Ok(())
    }
}

fn parse_stored(key: &str, raw: Option<String>) -> Vec<WatchedEntry> {
    let Some(raw) = raw else {
        debug!("No stored watchlist under '{}', starting empty", key);
        return Vec::new();
    };

    match serde_json::from_str::<Vec<WatchedEntry>>(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(
                "Stored watchlist under '{}' is unreadable ({}), starting empty",
                key, e
            );
            Vec::new()
        }
    }
}
