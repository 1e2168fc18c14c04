// src/store.rs
//! Keyed card store: one JSON object, card identifier → record.
//!
//! Load once, mutate in memory, save once. Saving writes `<path>.tmp` and renames
//! it over the target, so readers never see a half-written file.
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::card::CanonicalCard;
use crate::config::consts::{JSON_INDENT, TMP_SUFFIX};
use crate::error::StoreError;

/// A stored value. Anything that does not decode as a card (legacy layouts,
/// half-written records) is kept verbatim so a load/save cycle loses nothing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoreEntry {
    Card(CanonicalCard),
    Raw(serde_json::Value),
}

impl StoreEntry {
    pub fn has_name(&self) -> bool {
        match self {
            StoreEntry::Card(c) => c.has_name(),
            StoreEntry::Raw(v) => v.get("name").and_then(|n| n.as_str()).is_some_and(|n| !n.trim().is_empty()),
        }
    }

    pub fn as_card(&self) -> Option<&CanonicalCard> {
        match self {
            StoreEntry::Card(c) => Some(c),
            StoreEntry::Raw(_) => None,
        }
    }
}

impl From<CanonicalCard> for StoreEntry {
    fn from(card: CanonicalCard) -> Self {
        StoreEntry::Card(card)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardStore {
    entries: BTreeMap<String, StoreEntry>,
}

impl CardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&StoreEntry> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, entry: impl Into<StoreEntry>) -> Option<StoreEntry> {
        self.entries.insert(key.into(), entry.into())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &StoreEntry)> {
        self.entries.iter()
    }

    /// Missing or zero-length file → empty store.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let io_err = |cause| StoreError::Io { path: path.to_path_buf(), cause };
        if !path.exists() {
            logd!("Store {} missing; starting empty", path.display());
            return Ok(Self::new());
        }
        let text = fs::read_to_string(path).map_err(io_err)?;
        if text.trim().is_empty() {
            return Ok(Self::new());
        }
        let store: Self = serde_json::from_str(&text).map_err(|cause| StoreError::Json { path: path.to_path_buf(), cause })?;
        logf!("Loaded {} records from {}", store.len(), path.display());
        Ok(store)
    }

    /// Pretty JSON (4-space indent, UTF-8 as is), written atomically.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let io_err = |cause| StoreError::Io { path: path.to_path_buf(), cause };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let body = self.to_json_bytes().map_err(|cause| StoreError::Json { path: path.to_path_buf(), cause })?;
        let tmp = tmp_path(path);
        let written = fs::File::create(&tmp)
            .and_then(|mut f| {
                f.write_all(&body)?;
                f.sync_all()
            })
            .and_then(|_| fs::rename(&tmp, path));

        if let Err(cause) = written {
            let _ = fs::remove_file(&tmp);
            loge!("Saving store {} failed: {}", path.display(), cause);
            return Err(io_err(cause));
        }
        logf!("Saved {} records to {}", self.len(), path.display());
        Ok(())
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut buf = Vec::new();
        let fmt = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, fmt);
        self.serialize(&mut ser)?;
        Ok(buf)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push(TMP_SUFFIX);
    PathBuf::from(s)
}
