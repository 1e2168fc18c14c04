// src/scrape/mod.rs

pub mod fetch;
pub mod process;

pub use fetch::{Fetch, LocalFiles, Preloaded};
pub use process::{BatchReport, Outcome, Status, process, process_batch};
