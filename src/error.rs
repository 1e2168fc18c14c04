// src/error.rs
use std::io;
use std::path::PathBuf;

use crate::engine::types::Source;

/// Failure to turn one document into a card record.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("{origin} document matches no known page layout")]
    UnrecognizedTemplate { origin: Source },

    #[error("required field `{field}` is missing")]
    MissingRequiredField { field: &'static str },

    #[error("malformed input: {detail}")]
    MalformedInput { detail: String },
}

impl ParseError {
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedInput { detail: detail.into() }
    }
}

/// Evolution section present but the current card cannot be located in it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    #[error("no evolution node is marked as the current card")]
    NoCurrent,

    #[error("{count} evolution nodes claim to be the current card")]
    Ambiguous { count: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store i/o on {}: {cause}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        cause: io::Error,
    },

    #[error("store json in {}: {cause}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        cause: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("no {origin} document for card `{card_id}`")]
    NotFound { origin: Source, card_id: String },

    #[error("reading {}: {cause}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        cause: io::Error,
    },
}

/// One card's failure inside a batch.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
