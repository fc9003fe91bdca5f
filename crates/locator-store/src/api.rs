use std::path::{Path, PathBuf};

use locator_core_types::{ElementName, LocatorStrategy};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::errors::StoreError;
use crate::fs::{reader, writer};
use crate::model::StoredLocator;

/// Durable `ElementName -> LocatorStrategy` mapping.
///
/// One instance is constructed per session and shared (behind an `Arc`) by
/// every resolver in that session. The raw JSON document is kept so that
/// entries this crate does not understand are written back untouched.
pub struct LocatorStore {
    path: Option<PathBuf>,
    state: Mutex<StoreState>,
}

struct StoreState {
    document: Map<String, Value>,
    persistent: bool,
}

impl LocatorStore {
    /// Load the store file at `path`.
    ///
    /// A missing or unparsable file starts an empty mapping which is written
    /// back. If the file cannot be read or written the store keeps working as
    /// a memory-only cache for this session.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (document, persistent) = match reader::read_document(&path) {
            Ok(Some(document)) => {
                debug!(path = %path.display(), entries = document.len(), "locator store loaded");
                (document, true)
            }
            Ok(None) => {
                let document = Map::new();
                let persistent = initialize(&path, &document);
                (document, persistent)
            }
            Err(err @ (StoreError::Parse(_) | StoreError::NotAnObject)) => {
                warn!(%err, path = %path.display(), "locator store unreadable; starting empty");
                let document = Map::new();
                let persistent = initialize(&path, &document);
                (document, persistent)
            }
            Err(err) => {
                warn!(%err, path = %path.display(), "locator store io failure; using memory-only cache");
                (Map::new(), false)
            }
        };
        Self {
            path: Some(path),
            state: Mutex::new(StoreState {
                document,
                persistent,
            }),
        }
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: Mutex::new(StoreState {
                document: Map::new(),
                persistent: false,
            }),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether updates currently reach disk.
    pub fn is_persistent(&self) -> bool {
        self.state.lock().persistent
    }

    /// Last strategy recorded for `name`. The strategy is not re-validated.
    pub fn get(&self, name: &ElementName) -> Option<LocatorStrategy> {
        let state = self.state.lock();
        let raw = state.document.get(name.as_str())?;
        decode_entry(name, raw)
    }

    /// Overwrite the entry for `name` and flush the whole store.
    ///
    /// The on-disk document is re-read and merged first so that entries
    /// written by other processes sharing the file are kept.
    pub fn put(&self, name: &ElementName, strategy: &LocatorStrategy) {
        let entry = match serde_json::to_value(StoredLocator::from(strategy)) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(%err, element = %name, "failed to encode locator entry");
                return;
            }
        };

        let mut state = self.state.lock();
        let path = match (&self.path, state.persistent) {
            (Some(path), true) => path,
            _ => {
                state.document.insert(name.as_str().to_string(), entry);
                debug!(element = %name, strategy = %strategy, "memory-only locator update");
                return;
            }
        };

        let mut document = match reader::read_document(path) {
            Ok(Some(on_disk)) => on_disk,
            Ok(None) => state.document.clone(),
            Err(err) => {
                debug!(%err, path = %path.display(), "merge read failed; writing session copy");
                state.document.clone()
            }
        };
        document.insert(name.as_str().to_string(), entry);

        match writer::write_document(path, &document) {
            Ok(()) => info!(element = %name, strategy = %strategy, "locator store updated"),
            Err(err) => warn!(%err, path = %path.display(), "failed to persist locator store"),
        }
        state.document = document;
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names with a decodable entry, sorted.
    pub fn names(&self) -> Vec<ElementName> {
        self.snapshot().into_iter().map(|(name, _)| name).collect()
    }

    /// Every decodable entry, sorted by name.
    pub fn snapshot(&self) -> Vec<(ElementName, LocatorStrategy)> {
        let state = self.state.lock();
        let mut entries: Vec<_> = state
            .document
            .iter()
            .filter_map(|(key, raw)| {
                let name = ElementName::new(key.as_str()).ok()?;
                let strategy = decode_entry(&name, raw)?;
                Some((name, strategy))
            })
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

fn initialize(path: &Path, document: &Map<String, Value>) -> bool {
    match writer::write_document(path, document) {
        Ok(()) => {
            debug!(path = %path.display(), "initialized empty locator store");
            true
        }
        Err(err) => {
            warn!(%err, path = %path.display(), "cannot create locator store; using memory-only cache");
            false
        }
    }
}

fn decode_entry(name: &ElementName, raw: &Value) -> Option<LocatorStrategy> {
    match serde_json::from_value::<StoredLocator>(raw.clone()) {
        Ok(stored) => stored.into_strategy(),
        Err(err) => {
            debug!(%err, element = %name, "ignoring undecodable locator entry");
            None
        }
    }
}
