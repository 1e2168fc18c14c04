// src/scrape/fetch.rs
//! Where documents come from. The crate ships offline fetchers only; a network
//! fetcher plugs in through the same trait.
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::config::consts::DOC_EXTS;
use crate::engine::types::Source;
use crate::error::FetchError;

pub trait Fetch {
    fn fetch(&self, source: Source, card_id: &str) -> Result<String, FetchError>;
}

/// Saved documents in one directory: `<dir>/<key>.html|.htm|.json`.
pub struct LocalFiles {
    pub dir: PathBuf,
}

impl LocalFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn candidates(&self, source: Source, card_id: &str) -> Vec<PathBuf> {
        let key = source.key_for(card_id);
        DOC_EXTS.iter().map(|ext| self.dir.join(format!("{key}.{ext}"))).collect()
    }
}

impl Fetch for LocalFiles {
    fn fetch(&self, source: Source, card_id: &str) -> Result<String, FetchError> {
        let Some(path) = self.candidates(source, card_id).into_iter().find(|p| p.is_file()) else {
            return Err(FetchError::NotFound { origin: source, card_id: s!(card_id) });
        };
        logd!("{}: reading {}", source, path.display());
        fs::read_to_string(&path).map_err(|cause| FetchError::Io { path, cause })
    }
}

/// In-memory documents keyed by store key.
#[derive(Default)]
pub struct Preloaded {
    docs: HashMap<(Source, String), String>,
}

impl Preloaded {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: Source, card_id: &str, document: impl Into<String>) -> Self {
        self.insert(source, card_id, document);
        self
    }

    pub fn insert(&mut self, source: Source, card_id: &str, document: impl Into<String>) {
        self.docs.insert((source, source.key_for(card_id)), document.into());
    }
}

impl Fetch for Preloaded {
    fn fetch(&self, source: Source, card_id: &str) -> Result<String, FetchError> {
        self.docs
            .get(&(source, source.key_for(card_id)))
            .cloned()
            .ok_or_else(|| FetchError::NotFound { origin: source, card_id: s!(card_id) })
    }
}
