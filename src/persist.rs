//! Persistence adapter.
//!
//! Saves and loads the state snapshot through a narrow key-value
//! interface (the browser embedding backs it with localStorage; tests
//! use [`MemoryStore`]). Loading is tolerant: a missing key or a
//! corrupted payload leaves the prior in-memory state untouched, and
//! partial payloads fill only the sections they carry.
//!
//! After every successful load the seed roster is reconciled in:
//! default instructors absent from the loaded roster are appended,
//! unless the user deleted them (tracked in `deleted_default_ids`).

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{DaySchedule, Instructor};
use crate::state::{default_roster, AppState};

/// Fixed storage key for the snapshot.
pub const STORAGE_KEY: &str = "instructor-scheduler-state";

/// Persistence failure.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The saved payload could not be parsed. Prior state is untouched.
    #[error("corrupted saved state: {0}")]
    Corrupted(#[from] serde_json::Error),
    /// The backing store rejected the write (e.g. storage full).
    #[error("storage write failed: {0}")]
    Store(String),
}

/// Narrow storage interface the adapter writes through.
pub trait KeyValueStore {
    /// Reads the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;
    /// Stores `value` under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
}

/// In-memory store for tests and headless embeddings.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// The persisted snapshot. Every section is optional on read so old or
/// partial payloads still load.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    instructors: Option<Vec<Instructor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    schedule: Option<BTreeMap<NaiveDate, DaySchedule>>,
    #[serde(default, rename = "classDays", skip_serializing_if = "Option::is_none")]
    class_days: Option<Vec<u32>>,
    #[serde(default, rename = "cancelledDays", skip_serializing_if = "Option::is_none")]
    cancelled_days: Option<BTreeSet<NaiveDate>>,
    #[serde(default, rename = "deletedDefaultIds", skip_serializing_if = "Option::is_none")]
    deleted_default_ids: Option<Vec<String>>,
}

/// Saves the state snapshot under [`STORAGE_KEY`].
pub fn save(state: &AppState, store: &mut dyn KeyValueStore) -> Result<(), PersistError> {
    let snapshot = Snapshot {
        instructors: Some(state.instructors.clone()),
        schedule: Some(state.schedule.clone()),
        class_days: Some(state.class_days.clone()),
        cancelled_days: Some(state.cancelled_days.clone()),
        deleted_default_ids: Some(state.deleted_default_ids.clone()),
    };
    let json = serde_json::to_string(&snapshot)?;
    store.set(STORAGE_KEY, &json)?;
    debug!(bytes = json.len(), "saved state");
    Ok(())
}

/// Loads a snapshot into `state`, if one exists.
///
/// Returns `Ok(true)` when a snapshot was applied, `Ok(false)` when the
/// store had nothing. On a corrupted payload the error is returned and
/// `state` is left exactly as it was.
pub fn load(state: &mut AppState, store: &dyn KeyValueStore) -> Result<bool, PersistError> {
    let Some(json) = store.get(STORAGE_KEY) else {
        return Ok(false);
    };

    let snapshot: Snapshot = match serde_json::from_str(&json) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!(%err, "ignoring corrupted saved state");
            return Err(err.into());
        }
    };

    if let Some(instructors) = snapshot.instructors {
        state.instructors = instructors;
    }
    if let Some(deleted) = snapshot.deleted_default_ids {
        state.deleted_default_ids = deleted;
    }
    reconcile_defaults(state);

    if let Some(schedule) = snapshot.schedule {
        state.schedule = schedule;
    }
    if let Some(class_days) = snapshot.class_days {
        state.class_days = class_days;
    }
    if let Some(cancelled) = snapshot.cancelled_days {
        state.cancelled_days = cancelled;
    }

    debug!("loaded state");
    Ok(true)
}

/// Appends seed instructors missing from the roster, skipping ids the
/// user has deleted.
fn reconcile_defaults(state: &mut AppState) {
    for seed in default_roster() {
        let exists = state.instructors.iter().any(|i| i.id == seed.id);
        let was_deleted = state.deleted_default_ids.iter().any(|d| *d == seed.id);
        if !exists && !was_deleted {
            state.instructors.push(seed);
        }
    }
}
