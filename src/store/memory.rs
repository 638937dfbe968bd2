// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::{ResultKey, ResultStore};
use crate::errors::StoreError;
use crate::types::ScoreMap;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Process-local result store.
#[derive(Debug, Default)]
pub struct InMemoryResultStore {
    entries: Mutex<HashMap<ResultKey, ScoreMap>>,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries. Still counts after a writer panicked.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResultStore for InMemoryResultStore {
    fn load(&self, key: &ResultKey) -> Result<Option<ScoreMap>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &ResultKey, scores: &ScoreMap) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.clone(), scores.clone());
        Ok(())
    }

    fn delete(&self, key: &ResultKey) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.remove(key).is_some())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
