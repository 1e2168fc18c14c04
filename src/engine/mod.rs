// src/engine/mod.rs
//! Source-independent normalization machinery: layout dispatch, icon tables,
//! classification, rule inference and evolution chains. The per-source
//! extractors in `specs` drive these with their own tables.

pub mod classify;
pub mod dispatch;
pub mod evolution;
pub mod icons;
pub mod rules;
pub mod types;

pub use types::Source;
