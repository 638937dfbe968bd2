// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::{ResultKey, ResultStore};
use crate::asset::sanitize;
use crate::errors::StoreError;
use crate::types::ScoreMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Result store keeping one JSON document per entry.
///
/// Layout: `{root}/{type_tag}/{version}/{asset_signature}.json`. Entries are
/// written to a temporary sibling and renamed into place, so a concurrent
/// reader sees either the old document or the new one.
#[derive(Debug, Clone)]
pub struct FileSystemResultStore {
    root: PathBuf,
}

impl FileSystemResultStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &ResultKey) -> PathBuf {
        self.root
            .join(sanitize(&key.type_tag))
            .join(sanitize(&key.version))
            .join(format!("{}.json", sanitize(&key.asset_signature)))
    }
}

impl ResultStore for FileSystemResultStore {
    fn load(&self, key: &ResultKey) -> Result<Option<ScoreMap>, StoreError> {
        let path = self.path_for(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, key: &ResultKey, scores: &ScoreMap) -> Result<(), StoreError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let staging = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(scores)?;
        fs::write(&staging, json).map_err(|source| StoreError::Io {
            path: staging.clone(),
            source,
        })?;
        fs::rename(&staging, &path).map_err(|source| StoreError::Io { path, source })
    }

    fn delete(&self, key: &ResultKey) -> Result<bool, StoreError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn name(&self) -> &'static str {
        "filesystem"
    }
}
