// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

#[cfg(feature = "cli")]
pub mod cli;
pub mod card;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod specs;

pub mod pipeline;
pub mod progress;
pub mod scrape;
pub mod sets;
pub mod store;

pub use card::CanonicalCard;
pub use engine::types::Source;
pub use pipeline::Pipeline;
