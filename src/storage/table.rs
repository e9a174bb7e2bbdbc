//! Generic in-memory table backed by one JSON file
//!
//! The five repositories share the same load/save/upsert/delete mechanics;
//! they wrap a [`JsonTable`] and add their own queries on top. Every read
//! takes the acting [`UserId`] and only returns that user's rows.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::error::{FinsightError, FinsightResult};
use crate::models::UserId;

use super::events::{ChangeEvent, EventBus, Row};
use super::file_io::{read_json, write_json_atomic};

pub struct JsonTable<T: Row> {
    name: &'static str,
    path: PathBuf,
    rows: RwLock<HashMap<T::Key, T>>,
    events: EventBus<T>,
}

impl<T: Row> JsonTable<T> {
    pub fn new(name: &'static str, path: PathBuf) -> Self {
        Self {
            name,
            path,
            rows: RwLock::new(HashMap::new()),
            events: EventBus::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn events(&self) -> &EventBus<T> {
        &self.events
    }

    fn read(&self) -> FinsightResult<RwLockReadGuard<'_, HashMap<T::Key, T>>> {
        self.rows
            .read()
            .map_err(|e| FinsightError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> FinsightResult<RwLockWriteGuard<'_, HashMap<T::Key, T>>> {
        self.rows
            .write()
            .map_err(|e| FinsightError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Replace the in-memory rows with the file contents
    pub fn load(&self) -> FinsightResult<Vec<T>> {
        let file_rows: Vec<T> = read_json(&self.path)?;

        let mut rows = self.write()?;
        rows.clear();
        for row in &file_rows {
            rows.insert(row.key(), row.clone());
        }

        debug!(table = self.name, rows = rows.len(), "loaded table");
        Ok(file_rows)
    }

    /// Write every row back to disk, ordered by key so the file is stable
    pub fn save(&self) -> FinsightResult<()> {
        let mut rows: Vec<T> = self.read()?.values().cloned().collect();
        rows.sort_by_key(|row| row.key());
        write_json_atomic(&self.path, &rows)
    }

    /// A row by key, only if the user owns it
    pub fn get(&self, user_id: UserId, key: T::Key) -> FinsightResult<Option<T>> {
        Ok(self
            .read()?
            .get(&key)
            .filter(|row| row.owner() == user_id)
            .cloned())
    }

    /// The user's rows matching a predicate, ordered by key
    pub fn select<F>(&self, user_id: UserId, predicate: F) -> FinsightResult<Vec<T>>
    where
        F: Fn(&T) -> bool,
    {
        let mut rows: Vec<T> = self
            .read()?
            .values()
            .filter(|row| row.owner() == user_id && predicate(row))
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.key());
        Ok(rows)
    }

    pub fn all_for(&self, user_id: UserId) -> FinsightResult<Vec<T>> {
        self.select(user_id, |_| true)
    }

    pub fn count_for(&self, user_id: UserId) -> FinsightResult<usize> {
        Ok(self
            .read()?
            .values()
            .filter(|row| row.owner() == user_id)
            .count())
    }

    /// Insert or replace a row. Returns the previous version, if any.
    pub fn upsert(&self, row: T) -> FinsightResult<Option<T>> {
        let previous = {
            let mut rows = self.write()?;
            if let Some(existing) = rows.get(&row.key()) {
                if existing.owner() != row.owner() {
                    return Err(FinsightError::Storage(format!(
                        "{} {} belongs to another user",
                        self.name,
                        row.key()
                    )));
                }
            }
            rows.insert(row.key(), row.clone())
        };

        let event = if previous.is_some() {
            ChangeEvent::Updated(row)
        } else {
            ChangeEvent::Inserted(row)
        };
        self.events.publish(&event);

        Ok(previous)
    }

    /// Remove a row the user owns. Returns the removed row.
    pub fn delete(&self, user_id: UserId, key: T::Key) -> FinsightResult<Option<T>> {
        let removed = {
            let mut rows = self.write()?;
            match rows.get(&key) {
                Some(row) if row.owner() == user_id => rows.remove(&key),
                _ => None,
            }
        };

        if removed.is_some() {
            self.events.publish(&ChangeEvent::Deleted { key, owner: user_id });
        }

        Ok(removed)
    }
}
