// src/config/options.rs
use std::path::PathBuf;

use super::consts::*;
use crate::engine::types::Source;

/// What to do with a card that already has a named record in the store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverwritePolicy {
    #[default]
    Overwrite,
    Preserve,
}

impl OverwritePolicy {
    pub fn from_overwrite(overwrite: bool) -> Self {
        if overwrite { Self::Overwrite } else { Self::Preserve }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessOptions {
    pub source: Source,
    pub policy: OverwritePolicy,
    database_path: Option<PathBuf>,
    pub sets_path: Option<PathBuf>,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            source: Source::Jp,
            policy: OverwritePolicy::default(),
            database_path: None,
            sets_path: None,
        }
    }
}

impl ProcessOptions {
    pub fn for_source(source: Source) -> Self {
        Self { source, ..Self::default() }
    }

    /// Explicit path, else `.store/database_<source>.json`.
    pub fn database_path(&self) -> PathBuf {
        match &self.database_path {
            Some(p) => p.clone(),
            None => Self::default_database_path(self.source),
        }
    }

    pub fn set_database_path(&mut self, path: impl Into<PathBuf>) {
        self.database_path = Some(path.into());
    }

    pub fn default_database_path(source: Source) -> PathBuf {
        PathBuf::from(STORE_DIR).join(source.database_file())
    }

    /// Set list used to name API sets; only meaningful for the API source.
    pub fn sets_path(&self) -> PathBuf {
        self.sets_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(STORE_DIR).join(CARD_PACKS_FILE))
    }
}
