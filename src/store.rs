// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Key-value persistence for the session collections.
//!
//! Each key maps to one JSON document. The store is a passive mirror of the
//! in-memory state: reads happen once when a session opens and writes happen
//! after each committed change.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::StoreError;

pub const KEY_USER: &str = "user";
pub const KEY_ACCOUNTS: &str = "accounts";
pub const KEY_TRANSACTIONS: &str = "transactions";
pub const KEY_GOALS: &str = "goals";
pub const KEY_BUDGETS: &str = "budgets";
pub const KEY_DARK_MODE: &str = "dark_mode";

pub const ALL_KEYS: [&str; 6] = [
    KEY_USER,
    KEY_ACCOUNTS,
    KEY_TRANSACTIONS,
    KEY_GOALS,
    KEY_BUDGETS,
    KEY_DARK_MODE,
];

pub trait KeyValueStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn put_raw(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.get_raw(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StoreError::Json {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(|source| StoreError::Json {
            key: key.to_string(),
            source,
        })?;
        self.put_raw(key, &raw)
    }
}

/// One `<namespace>_<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    namespace: String,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            namespace: namespace.into(),
        }
    }

    pub fn open(config: &Config) -> anyhow::Result<Self> {
        config.ensure_data_dir()?;
        Ok(Self::new(&config.data_dir, &config.namespace))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}_{}.json", self.namespace, key))
    }

    fn io_error(&self, key: &str, source: std::io::Error) -> StoreError {
        StoreError::Io {
            key: key.to_string(),
            path: self.path_for(key).display().to_string(),
            source,
        }
    }
}

impl KeyValueStore for FileStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(key, e)),
        }
    }

    fn put_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        // Readers only ever see a complete document.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| self.io_error(key, e))?;
        fs::rename(&tmp, &path).map_err(|e| self.io_error(key, e))?;
        tracing::trace!(key, path = %path.display(), "saved");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(key, e)),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn put_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
