// src/scrape/process.rs
//! Per-card processing against an existing store, and batches of it.
use std::fmt;

use crate::config::options::OverwritePolicy;
use crate::engine::types::Source;
use crate::error::ProcessError;
use crate::pipeline::Pipeline;
use crate::progress::Progress;
use crate::scrape::fetch::Fetch;
use crate::store::{CardStore, StoreEntry};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Updated,
    Skipped,
    Failed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Updated => "updated",
            Status::Skipped => "skipped",
            Status::Failed => "failed",
        })
    }
}

#[derive(Debug)]
pub struct Outcome {
    /// Store key of the card.
    pub key: String,
    pub status: Status,
    /// New record when updated; the stored one (if any) otherwise.
    pub record: Option<StoreEntry>,
    pub error: Option<ProcessError>,
}

/// Decide, fetch and parse one card. The store is only read here.
///
/// A stored record without a name counts as corrupted and is always
/// re-extracted, whatever the policy.
pub fn process(
    pipeline: &Pipeline<'_>,
    fetch: &dyn Fetch,
    source: Source,
    card_id: &str,
    store: &CardStore,
    policy: OverwritePolicy,
) -> Outcome {
    let key = source.key_for(card_id);
    let existing = store.get(&key);

    match existing {
        Some(entry) if entry.has_name() => {
            if policy == OverwritePolicy::Preserve {
                logf!("{}: card {} already stored, skipping", source, key);
                return Outcome { key, status: Status::Skipped, record: Some(entry.clone()), error: None };
            }
        }
        Some(_) => logw!("{}: card {} has corrupted data, forcing re-extraction", source, key),
        None => {}
    }

    logf!("{}: processing card {}", source, key);
    let parsed = fetch
        .fetch(source, card_id)
        .map_err(ProcessError::from)
        .and_then(|doc| pipeline.parse(source, &doc, card_id).map_err(ProcessError::from));

    match parsed {
        Ok(card) => Outcome { key, status: Status::Updated, record: Some(card.into()), error: None },
        Err(e) => {
            loge!("{}: card {} failed: {}", source, key, e);
            Outcome { key, status: Status::Failed, record: existing.cloned(), error: Some(e) }
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub updated: Vec<String>,
    pub skipped: Vec<String>,
    /// Key and error message.
    pub failed: Vec<(String, String)>,
}

impl BatchReport {
    /// Whether the store needs saving.
    pub fn changed(&self) -> bool {
        !self.updated.is_empty()
    }
}

/// `process` over many ids; updated records go into `store`. One card's failure
/// never stops the batch. The caller saves the store once afterwards.
pub fn process_batch<S: AsRef<str>>(
    pipeline: &Pipeline<'_>,
    fetch: &dyn Fetch,
    source: Source,
    card_ids: &[S],
    store: &mut CardStore,
    policy: OverwritePolicy,
    progress: &mut dyn Progress,
) -> BatchReport {
    let mut report = BatchReport::default();
    progress.begin(card_ids.len());

    for id in card_ids {
        let outcome = process(pipeline, fetch, source, id.as_ref(), store, policy);
        match outcome.status {
            Status::Updated => {
                if let Some(record) = outcome.record {
                    store.insert(outcome.key.clone(), record);
                }
                report.updated.push(outcome.key.clone());
            }
            Status::Skipped => report.skipped.push(outcome.key.clone()),
            Status::Failed => {
                let msg = outcome.error.map(|e| e.to_string()).unwrap_or_default();
                progress.log(&format!("{}: {}", outcome.key, msg));
                report.failed.push((outcome.key.clone(), msg));
            }
        }
        progress.item_done(&outcome.key, outcome.status);
    }

    logf!(
        "{}: batch done, {} updated, {} skipped, {} failed",
        source,
        report.updated.len(),
        report.skipped.len(),
        report.failed.len()
    );
    progress.finish();
    report
}
