// src/progress.rs
use crate::scrape::process::Status;

/// Lightweight progress reporting used by batch processing.
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the number of cards in the batch.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one card is done, whatever the outcome.
    fn item_done(&mut self, _key: &str, _status: Status) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Progress lines on stderr, one per card.
pub struct StderrProgress {
    total: usize,
    done: usize,
}

impl StderrProgress {
    pub fn new() -> Self {
        Self { total: 0, done: 0 }
    }
}

impl Default for StderrProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for StderrProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
    }

    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }

    fn item_done(&mut self, key: &str, status: Status) {
        self.done += 1;
        eprintln!("[{}/{}] {} {}", self.done, self.total, key, status);
    }
}
