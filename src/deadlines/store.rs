use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::status::parse_date;
use crate::models::Deadline;
use crate::storage::{Storage, StorageError};

/// Storage key holding the serialized deadline collection.
pub const STORAGE_KEY: &str = "deadlines";

/// Largest id a record may carry: the last millisecond a calendar date can
/// represent. Stored ids outside `1..=MAX_ID` are discarded on load.
pub const MAX_ID: i64 = 8_640_000_000_000_000;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Please enter a title")]
    MissingTitle,
    #[error("Please pick a date")]
    MissingDate,
    #[error("Not a valid date (use YYYY-MM-DD): {0}")]
    InvalidDate(String),
    #[error("No deadline ids left")]
    IdsExhausted,
    #[error("Could not save deadlines: {0}")]
    Storage(#[from] StorageError),
    #[error("Could not encode deadlines: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The deadline collection, in insertion order, written through to storage
/// on every mutation.
pub struct DeadlineStore<S: Storage> {
    deadlines: Vec<Deadline>,
    storage: S,
}

impl<S: Storage> DeadlineStore<S> {
    /// Reads the persisted collection. Missing or corrupt data yields an
    /// empty store; records with a blank title, bad date, out-of-range id
    /// or an id already seen earlier in the array are dropped.
    pub fn load(storage: S) -> Self {
        let deadlines = match storage.get(STORAGE_KEY) {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<Deadline>>(&raw) {
                Ok(records) => {
                    let total = records.len();
                    let mut seen = HashSet::new();
                    let valid: Vec<Deadline> = records
                        .into_iter()
                        .filter(|d| {
                            (1..=MAX_ID).contains(&d.id)
                                && !d.title.trim().is_empty()
                                && parse_date(&d.date).is_some()
                        })
                        .filter(|d| seen.insert(d.id))
                        .collect();
                    if valid.len() != total {
                        tracing::warn!(
                            dropped = total - valid.len(),
                            "discarded invalid stored deadlines"
                        );
                    }
                    valid
                }
                Err(e) => {
                    tracing::warn!(error = %e, "stored deadlines are unreadable, starting empty");
                    Vec::new()
                }
            },
        };
        tracing::info!(count = deadlines.len(), "loaded deadlines");
        Self { deadlines, storage }
    }

    pub fn deadlines(&self) -> &[Deadline] {
        &self.deadlines
    }

    pub fn get(&self, id: i64) -> Option<&Deadline> {
        self.deadlines.iter().find(|d| d.id == id)
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Appends a new deadline and persists. Blank fields leave the store
    /// untouched.
    pub fn add(&mut self, title: &str, date: &str, now: DateTime<Utc>) -> Result<i64, StoreError> {
        let title = title.trim();
        let date = date.trim();
        if title.is_empty() {
            return Err(StoreError::MissingTitle);
        }
        if date.is_empty() {
            return Err(StoreError::MissingDate);
        }
        if parse_date(date).is_none() {
            return Err(StoreError::InvalidDate(date.to_string()));
        }

        let id = self.next_id(now)?;
        self.deadlines.push(Deadline {
            id,
            title: title.to_string(),
            date: date.to_string(),
        });
        tracing::info!(id, title, date, "added deadline");
        self.save()?;
        Ok(id)
    }

    /// Removes the deadline with `id`, if any, then persists. Returns
    /// whether anything was removed.
    pub fn remove(&mut self, id: i64) -> Result<bool, StoreError> {
        let before = self.deadlines.len();
        self.deadlines.retain(|d| d.id != id);
        let removed = self.deadlines.len() != before;
        if removed {
            tracing::info!(id, "removed deadline");
        } else {
            tracing::debug!(id, "remove: no such deadline");
        }
        self.save()?;
        Ok(removed)
    }

    /// Overwrites the stored value with the whole collection.
    pub fn save(&mut self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.deadlines)?;
        self.storage.set(STORAGE_KEY, &json)?;
        tracing::debug!(count = self.deadlines.len(), "saved deadlines");
        Ok(())
    }

    /// Millisecond timestamp, bumped past the largest existing id on collision.
    fn next_id(&self, now: DateTime<Utc>) -> Result<i64, StoreError> {
        let candidate = now.timestamp_millis().max(1);
        let id = match self.deadlines.iter().map(|d| d.id).max() {
            Some(max) if max >= candidate => {
                max.checked_add(1).ok_or(StoreError::IdsExhausted)?
            }
            _ => candidate,
        };
        if id > MAX_ID {
            return Err(StoreError::IdsExhausted);
        }
        Ok(id)
    }
}
