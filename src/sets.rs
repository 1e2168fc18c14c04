// src/sets.rs
//! Set code → set name lookup for the API source, which only ships set codes.
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::StoreError;

pub trait SetNameResolver {
    fn resolve_set_name(&self, set_code: &str) -> Option<String>;
}

/// Resolves nothing; records keep `set_name: null`.
pub struct NoSetNames;
impl SetNameResolver for NoSetNames {
    fn resolve_set_name(&self, _set_code: &str) -> Option<String> {
        None
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackEntry {
    set_code: String,
    name: String,
}

#[derive(Debug, Default, Clone)]
pub struct SetNameMap {
    names: HashMap<String, String>,
}

impl SetNameMap {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self { names: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }

    /// Parse a `card_packs.json` list: `[{"setCode": "...", "name": "..."}, ...]`.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let packs: Vec<PackEntry> = serde_json::from_str(text)?;
        Ok(Self::from_pairs(packs.into_iter().map(|p| (p.set_code, p.name))))
    }

    /// A missing file is an empty map.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            logw!("Set list {} not found; set names stay empty", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|cause| StoreError::Io { path: path.to_path_buf(), cause })?;
        let map = Self::from_json(&text).map_err(|cause| StoreError::Json { path: path.to_path_buf(), cause })?;
        logf!("Loaded {} set names from {}", map.len(), path.display());
        Ok(map)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl SetNameResolver for SetNameMap {
    fn resolve_set_name(&self, set_code: &str) -> Option<String> {
        self.names.get(set_code).cloned()
    }
}
