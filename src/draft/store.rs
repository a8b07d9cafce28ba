//! Draft Store: debounced auto-save of the form with recovery
//!
//! Every storage failure in here is logged and degrades to "no draft";
//! nothing propagates to the caller.

use crate::draft::age::DraftAge;
use crate::draft::snapshot::FormSnapshot;
use crate::draft::timer::DebounceTimer;
use crate::error::Result;
use crate::storage::keys::{DRAFT_KEY, DRAFT_TIMESTAMP_KEY};
use crate::storage::KeyValueStore;
use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

/// Result of a save attempt once the debounce countdown has elapsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(DateTime<Utc>),
    /// Nothing filled in; storage left untouched
    SkippedEmpty,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct DraftStatus {
    pub exists: bool,
    pub last_saved: Option<DateTime<Utc>>,
    pub age: Option<String>,
}

pub struct DraftStore<S> {
    storage: S,
    timer: DebounceTimer<FormSnapshot>,
    last_saved: Option<DateTime<Utc>>,
    draft_exists: bool,
}

impl<S: KeyValueStore> DraftStore<S> {
    /// Detect a recoverable draft. A snapshot without a readable timestamp
    /// is treated as absent.
    pub fn initialize(storage: S) -> Self {
        let mut store = Self {
            storage,
            timer: DebounceTimer::new(),
            last_saved: None,
            draft_exists: false,
        };

        match store.read_persisted() {
            Ok(Some((_, timestamp))) => {
                store.draft_exists = true;
                store.last_saved = Some(timestamp);
                debug!("Found draft saved at {}", timestamp);
            }
            Ok(None) => debug!("No draft found"),
            Err(e) => warn!("Could not read draft: {}", e),
        }

        store
    }

    pub fn draft_exists(&self) -> bool {
        self.draft_exists
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }

    pub fn has_pending_save(&self) -> bool {
        self.timer.is_pending()
    }

    pub fn pending_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// (Re)start the debounce countdown with the latest snapshot.
    /// A snapshot still waiting from an earlier call is discarded.
    pub fn auto_save(&mut self, snapshot: FormSnapshot, delay: Duration) {
        if self.timer.schedule(snapshot, delay).is_some() {
            debug!("Pending auto-save superseded");
        }
    }

    /// Wait until the countdown elapses, then save. Never resolves while
    /// no save is pending.
    pub async fn wait_for_save(&mut self) -> SaveOutcome {
        let snapshot = self.timer.elapsed().await;
        self.commit(snapshot)
    }

    /// Save the pending snapshot if its countdown has elapsed at `now`
    pub fn fire_due(&mut self, now: Instant) -> Option<SaveOutcome> {
        self.timer.take_due(now).map(|snapshot| self.commit(snapshot))
    }

    /// Save the pending snapshot right away, skipping the rest of the delay
    pub fn flush(&mut self) -> Option<SaveOutcome> {
        self.timer.cancel().map(|snapshot| self.commit(snapshot))
    }

    /// Read the stored snapshot for restoring into the form. Parse or read
    /// failures are logged and leave the stored draft alone.
    pub fn load_draft(&self) -> Option<FormSnapshot> {
        let raw = match self.storage.get(DRAFT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                error!("Failed to load draft: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                error!("Failed to parse draft: {}", e);
                None
            }
        }
    }

    /// Delete the stored draft. Also drops a save that is still counting
    /// down so the draft does not reappear afterwards.
    pub fn clear_draft(&mut self) {
        self.timer.cancel();

        for key in [DRAFT_KEY, DRAFT_TIMESTAMP_KEY] {
            if let Err(e) = self.storage.remove(key) {
                error!("Failed to remove {}: {}", key, e);
            }
        }

        self.draft_exists = false;
        self.last_saved = None;
        info!("Draft cleared");
    }

    /// Age of the stored draft, read from storage at call time
    pub fn draft_age(&self) -> Option<DraftAge> {
        self.draft_age_at(Utc::now())
    }

    pub fn draft_age_at(&self, now: DateTime<Utc>) -> Option<DraftAge> {
        self.read_timestamp().map(|saved| DraftAge::between(saved, now))
    }

    pub fn status(&self) -> DraftStatus {
        DraftStatus {
            exists: self.draft_exists,
            last_saved: self.last_saved,
            age: self.draft_age().map(|age| age.to_string()),
        }
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn commit(&mut self, snapshot: FormSnapshot) -> SaveOutcome {
        if !snapshot.is_populated() {
            debug!("Skipping auto-save of empty form");
            return SaveOutcome::SkippedEmpty;
        }

        let now = Utc::now();
        match self.write(&snapshot, now) {
            Ok(()) => {
                self.last_saved = Some(now);
                self.draft_exists = true;
                debug!("Draft saved at {}", now);
                SaveOutcome::Saved(now)
            }
            Err(e) => {
                error!("Failed to save draft: {}", e);
                SaveOutcome::Failed
            }
        }
    }

    fn write(&mut self, snapshot: &FormSnapshot, at: DateTime<Utc>) -> Result<()> {
        let json = serde_json::to_string(snapshot)?;
        self.storage.set(DRAFT_KEY, &json)?;

        let stamped = self.storage.set(
            DRAFT_TIMESTAMP_KEY,
            &at.to_rfc3339_opts(SecondsFormat::Millis, true),
        );
        if let Err(e) = stamped {
            // The snapshot must never outlive its timestamp pairing
            for key in [DRAFT_KEY, DRAFT_TIMESTAMP_KEY] {
                if let Err(e) = self.storage.remove(key) {
                    warn!("Failed to roll back {}: {}", key, e);
                }
            }
            self.draft_exists = false;
            self.last_saved = None;
            return Err(e);
        }
        Ok(())
    }

    fn read_persisted(&self) -> Result<Option<(String, DateTime<Utc>)>> {
        let draft = self.storage.get(DRAFT_KEY)?;
        let timestamp = self.storage.get(DRAFT_TIMESTAMP_KEY)?;

        Ok(match (draft, timestamp) {
            (Some(draft), Some(raw)) => parse_timestamp(&raw).map(|ts| (draft, ts)),
            _ => None,
        })
    }

    fn read_timestamp(&self) -> Option<DateTime<Utc>> {
        match self.storage.get(DRAFT_TIMESTAMP_KEY) {
            Ok(raw) => raw.as_deref().and_then(parse_timestamp),
            Err(e) => {
                warn!("Could not read draft timestamp: {}", e);
                None
            }
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            warn!("Ignoring unreadable draft timestamp '{}': {}", raw, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    const DELAY: Duration = Duration::from_millis(2000);

    fn snapshot(title: &str) -> FormSnapshot {
        FormSnapshot {
            job_title: title.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_three_rapid_calls_save_once() {
        let mut store = DraftStore::initialize(MemoryStore::new());

        store.auto_save(snapshot("first"), DELAY);
        tokio::time::advance(Duration::from_millis(500)).await;
        store.auto_save(snapshot("second"), DELAY);
        tokio::time::advance(Duration::from_millis(500)).await;
        store.auto_save(snapshot("third"), DELAY);

        assert!(matches!(store.wait_for_save().await, SaveOutcome::Saved(_)));
        assert!(!store.has_pending_save());
        assert!(store.draft_exists());
        assert_eq!(store.draft_age(), Some(DraftAge::JustNow));
        assert_eq!(store.load_draft(), Some(snapshot("third")));

        // One write for the snapshot, one for its timestamp
        assert_eq!(store.into_storage().write_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_due_before_quiet_period() {
        let mut store = DraftStore::initialize(MemoryStore::new());
        store.auto_save(snapshot("title"), DELAY);

        tokio::time::advance(Duration::from_millis(1999)).await;
        assert_eq!(store.fire_due(Instant::now()), None);

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(matches!(store.fire_due(Instant::now()), Some(SaveOutcome::Saved(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_snapshot_never_saved() {
        let mut store = DraftStore::initialize(MemoryStore::new());
        store.auto_save(FormSnapshot { radius: 50, ..Default::default() }, DELAY);

        assert_eq!(store.wait_for_save().await, SaveOutcome::SkippedEmpty);
        assert!(!store.draft_exists());
        assert_eq!(store.last_saved(), None);
        assert_eq!(store.into_storage().write_count(), 0);
    }

    #[test]
    fn test_empty_snapshot_keeps_prior_draft() {
        let mut store = DraftStore::initialize(MemoryStore::new());
        store.auto_save(snapshot("kept"), DELAY);
        store.flush();

        store.auto_save(FormSnapshot::default(), DELAY);
        assert_eq!(store.flush(), Some(SaveOutcome::SkippedEmpty));
        assert_eq!(store.load_draft(), Some(snapshot("kept")));
    }

    #[test]
    fn test_load_after_clear_is_none() {
        let mut store = DraftStore::initialize(MemoryStore::new());
        store.auto_save(snapshot("gone"), DELAY);
        store.flush();

        store.clear_draft();
        assert_eq!(store.load_draft(), None);
        assert_eq!(store.draft_age(), None);
        assert!(!store.draft_exists());

        // Idempotent
        store.clear_draft();
    }

    #[test]
    fn test_clear_cancels_pending_save() {
        let mut store = DraftStore::initialize(MemoryStore::new());
        store.auto_save(snapshot("pending"), DELAY);
        store.clear_draft();
        assert_eq!(store.flush(), None);
    }

    #[test]
    fn test_initialize_detects_existing_draft() {
        let mut storage = MemoryStore::new();
        storage.set(DRAFT_KEY, r#"{"jobTitle":"Dev"}"#).unwrap();
        storage
            .set(DRAFT_TIMESTAMP_KEY, "2026-01-01T10:00:00.000Z")
            .unwrap();

        let store = DraftStore::initialize(storage);
        assert!(store.draft_exists());
        assert_eq!(
            store.last_saved().map(|t| t.to_rfc3339()),
            Some("2026-01-01T10:00:00+00:00".to_string())
        );

        let now = DateTime::parse_from_rfc3339("2026-01-01T13:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(store.draft_age_at(now), Some(DraftAge::Hours(3)));
    }

    #[test]
    fn test_unreadable_timestamp_means_no_draft() {
        let mut storage = MemoryStore::new();
        storage.set(DRAFT_KEY, r#"{"jobTitle":"Dev"}"#).unwrap();
        storage.set(DRAFT_TIMESTAMP_KEY, "yesterday").unwrap();

        let store = DraftStore::initialize(storage);
        assert!(!store.draft_exists());
        assert_eq!(store.draft_age(), None);
        // The snapshot itself is still recoverable
        assert_eq!(store.load_draft(), Some(snapshot("Dev")));
    }

    #[test]
    fn test_corrupt_draft_not_loaded_and_not_cleared() {
        let mut storage = MemoryStore::new();
        storage.set(DRAFT_KEY, "{broken").unwrap();

        let store = DraftStore::initialize(storage);
        assert_eq!(store.load_draft(), None);
        assert!(store.into_storage().contains_key(DRAFT_KEY));
    }

    #[test]
    fn test_failing_storage_degrades() {
        let mut store = DraftStore::initialize(MemoryStore::failing());
        assert!(!store.draft_exists());

        store.auto_save(snapshot("lost"), DELAY);
        assert_eq!(store.flush(), Some(SaveOutcome::Failed));
        assert!(!store.draft_exists());
        assert_eq!(store.load_draft(), None);
        store.clear_draft();
    }

    #[test]
    fn test_timestamp_write_failure_rolls_back_snapshot() {
        let mut store = DraftStore::initialize(MemoryStore::new());
        store.auto_save(snapshot("first"), DELAY);
        assert!(matches!(store.flush(), Some(SaveOutcome::Saved(_))));

        let mut storage = store.into_storage();
        storage.fail_writes_after(1);
        let mut store = DraftStore::initialize(storage);
        assert!(store.draft_exists());

        store.auto_save(snapshot("second"), DELAY);
        assert_eq!(store.flush(), Some(SaveOutcome::Failed));
        assert!(!store.draft_exists());
        assert_eq!(store.last_saved(), None);
        assert_eq!(store.load_draft(), None);
        assert_eq!(store.draft_age(), None);

        let storage = store.into_storage();
        assert!(!storage.contains_key(DRAFT_KEY));
        assert!(!storage.contains_key(DRAFT_TIMESTAMP_KEY));
        assert!(!DraftStore::initialize(storage).draft_exists());
    }
}
