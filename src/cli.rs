// src/cli.rs
use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::{env, process};

use serde_json::{Value, json};

use crate::config::consts::{DECK_FILE_PREFIX, DOC_EXTS, LOG_FILE};
use crate::config::options::{OverwritePolicy, ProcessOptions};
use crate::engine::types::Source;
use crate::pipeline::Pipeline;
use crate::progress::StderrProgress;
use crate::scrape::fetch::{Fetch, LocalFiles, Preloaded};
use crate::scrape::process::{BatchReport, process_batch};
use crate::sets::{NoSetNames, SetNameMap, SetNameResolver};
use crate::specs::deck::{DeckEntry, DeckIdentifier, read_deck};
use crate::store::{CardStore, StoreEntry};

type CliResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

/// What to read the cards from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    /// One saved document; the id defaults to the file stem.
    File { path: PathBuf, id: Option<String> },
    /// Saved documents `<dir>/<id>.html|.json`.
    Dir { dir: PathBuf, ids: Vec<String> },
    /// Every card of a deck, card documents looked up in `dir`. `deck` is a
    /// saved deck file, or a deck URL / id / code saved as `<dir>/deck_<id>.*`.
    Deck { deck: String, dir: PathBuf },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliArgs {
    pub options: ProcessOptions,
    pub input: Input,
}

pub fn run() -> CliResult<()> {
    crate::log::set_log_file(LOG_FILE);
    let args = parse_args(env::args().skip(1))?;
    execute(&args)
}

pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> CliResult<CliArgs> {
    let mut source: Option<Source> = None;
    let mut database_path: Option<PathBuf> = None;
    let mut policy = OverwritePolicy::default();
    let mut sets_path: Option<PathBuf> = None;
    let mut file: Option<PathBuf> = None;
    let mut id: Option<String> = None;
    let mut dir: Option<PathBuf> = None;
    let mut deck: Option<String> = None;
    let mut ids = Vec::new();

    let mut args = args.into_iter();
    while let Some(a) = args.next() {
        match a.as_str() {
            "-s" | "--source" => {
                let v = args.next().ok_or("Missing value for --source")?;
                source = Some(v.parse()?);
            }
            "--database-path" => database_path = Some(PathBuf::from(args.next().ok_or("Missing database path")?)),
            "--keep" => policy = OverwritePolicy::Preserve,
            "--overwrite" => policy = OverwritePolicy::Overwrite,
            "--sets" => sets_path = Some(PathBuf::from(args.next().ok_or("Missing set list path")?)),
            "-f" | "--file" => file = Some(PathBuf::from(args.next().ok_or("Missing value for --file")?)),
            "--id" => id = Some(args.next().ok_or("Missing value for --id")?),
            "-d" | "--dir" => dir = Some(PathBuf::from(args.next().ok_or("Missing value for --dir")?)),
            "--deck" => deck = Some(args.next().ok_or("Missing value for --deck")?),
            "-h" | "--help" => {
                eprintln!("{}", include_str!("cli_help.txt"));
                process::exit(0);
            }
            other if other.starts_with('-') => return Err(format!("Unknown arg: {}", other).into()),
            _ => ids.push(a),
        }
    }

    let source = source.ok_or("Specify --source <jp|cht|chs>")?;
    if id.is_some() && file.is_none() {
        return Err("--id only applies to --file".into());
    }
    let input = match (file, deck, dir) {
        (Some(path), None, None) if ids.is_empty() => Input::File { path, id },
        (None, Some(deck), Some(dir)) if ids.is_empty() => Input::Deck { deck, dir },
        (None, None, Some(dir)) if !ids.is_empty() => Input::Dir { dir, ids },
        (None, None, Some(_)) => return Err("Specify at least one card id after --dir".into()),
        (None, Some(_), None) => return Err("--deck needs --dir for the card documents".into()),
        _ => return Err("Specify one of --file, --dir <DIR> <ID>... or --deck <PATH> --dir <DIR>".into()),
    };

    let mut options = ProcessOptions::for_source(source);
    options.policy = policy;
    options.sets_path = sets_path;
    if let Some(p) = database_path {
        options.set_database_path(p);
    }
    Ok(CliArgs { options, input })
}

fn execute(args: &CliArgs) -> CliResult<()> {
    let opts = &args.options;
    let source = opts.source;

    let set_map;
    let sets: &dyn SetNameResolver = if source == Source::Chs {
        set_map = SetNameMap::load(&opts.sets_path())?;
        &set_map
    } else {
        &NoSetNames
    };
    let pipeline = Pipeline::with_sets(sets);

    let (fetch, ids, deck) = documents(source, &args.input)?;

    let db_path = opts.database_path();
    let mut store = CardStore::load(&db_path)?;
    let mut progress = StderrProgress::new();
    let report = process_batch(&pipeline, &*fetch, source, ids.as_slice(), &mut store, opts.policy, &mut progress);

    if report.changed() {
        store.save(&db_path)?;
    }
    let out = render(source, &ids, &store, deck.as_deref());
    println!("{}", serde_json::to_string_pretty(&out)?);
    summarize(&report, &db_path)
}

/// The fetcher, the card ids to run it over and the deck list, if any.
fn documents(source: Source, input: &Input) -> CliResult<(Box<dyn Fetch>, Vec<String>, Option<Vec<DeckEntry>>)> {
    match input {
        Input::File { path, id } => {
            let id = match id {
                Some(id) => id.clone(),
                None => file_stem(path).ok_or("Cannot derive a card id from the file name; pass --id")?,
            };
            let doc = fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
            Ok((Box::new(Preloaded::new().with(source, &id, doc)), vec![id], None))
        }
        Input::Dir { dir, ids } => Ok((Box::new(LocalFiles::new(dir)), ids.clone(), None)),
        Input::Deck { deck, dir } => {
            let path = deck_path(deck, dir)?;
            let raw = fs::read_to_string(&path).map_err(|e| format!("{}: {}", path.display(), e))?;
            let entries = read_deck(source, &raw)?;
            let ids = entries.iter().map(|e| e.card_id.clone()).collect();
            Ok((Box::new(LocalFiles::new(dir)), ids, Some(entries)))
        }
    }
}

/// A deck file as given, else the saved page of the deck the value identifies.
fn deck_path(deck: &str, dir: &Path) -> CliResult<PathBuf> {
    let given = PathBuf::from(deck);
    if given.is_file() {
        return Ok(given);
    }
    let deck_id = match DeckIdentifier::classify(deck) {
        DeckIdentifier::Url { deck_id: Some(id) } | DeckIdentifier::Id(id) | DeckIdentifier::Code(id) => id,
        DeckIdentifier::Url { deck_id: None } => return Err(format!("No deck id in URL `{}`", deck).into()),
        DeckIdentifier::Unknown(raw) => return Err(format!("`{}` is neither a deck file nor a deck id", raw).into()),
    };
    DOC_EXTS
        .iter()
        .map(|ext| dir.join(format!("{DECK_FILE_PREFIX}{deck_id}.{ext}")))
        .find(|p| p.is_file())
        .ok_or_else(|| format!("No saved deck `{}{}` in {}", DECK_FILE_PREFIX, deck_id, dir.display()).into())
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem().and_then(|s| s.to_str()).map(String::from)
}

/// Records keyed by store key. A deck run wraps them as `{"deck": [{id, quantity}], "cards": {...}}`.
fn render(source: Source, ids: &[String], store: &CardStore, deck: Option<&[DeckEntry]>) -> Value {
    let records: BTreeMap<String, &StoreEntry> = ids
        .iter()
        .map(|id| source.key_for(id))
        .filter_map(|key| store.get(&key).map(|e| (key, e)))
        .collect();
    let cards = json!(records);
    match deck {
        None => cards,
        Some(entries) => {
            let list: Vec<Value> = entries
                .iter()
                .map(|e| json!({ "id": source.key_for(&e.card_id), "quantity": e.quantity }))
                .collect();
            json!({ "deck": list, "cards": cards })
        }
    }
}

fn summarize(report: &BatchReport, db_path: &Path) -> CliResult<()> {
    eprintln!(
        "{} updated, {} skipped, {} failed ({})",
        report.updated.len(),
        report.skipped.len(),
        report.failed.len(),
        db_path.display()
    );
    if report.failed.is_empty() {
        return Ok(());
    }
    for (key, msg) in &report.failed {
        eprintln!("  {}: {}", key, msg);
    }
    Err(format!("{} card(s) failed", report.failed.len()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> CliResult<CliArgs> {
        parse_args(list.iter().map(|a| s!(*a)))
    }

    #[test]
    fn file_mode_with_keep() {
        let a = args(&["--source", "jp", "--keep", "--file", "card.html"]).unwrap();
        assert_eq!(a.options.source, Source::Jp);
        assert_eq!(a.options.policy, OverwritePolicy::Preserve);
        assert_eq!(a.input, Input::File { path: PathBuf::from("card.html"), id: None });
    }

    #[test]
    fn dir_mode_collects_ids() {
        let a = args(&["-s", "chs", "--dir", "docs", "CSV5C/012", "CSV5C/013"]).unwrap();
        assert_eq!(a.input, Input::Dir { dir: PathBuf::from("docs"), ids: svec!["CSV5C/012", "CSV5C/013"] });
        assert_eq!(a.options.database_path(), PathBuf::from(".store/database_chs.json"));
    }

    #[test]
    fn rejects_missing_source_and_mixed_inputs() {
        assert!(args(&["--file", "a.html"]).is_err());
        assert!(args(&["-s", "jp", "--file", "a.html", "--dir", "d"]).is_err());
        assert!(args(&["-s", "jp", "--dir", "d"]).is_err());
        assert!(args(&["-s", "jp", "--deck", "deck.html"]).is_err());
        assert!(args(&["-s", "xx", "--file", "a.html"]).is_err());
    }

    #[test]
    fn database_path_override() {
        let a = args(&["-s", "cht", "--database-path", "db.json", "--deck", "deck.html", "--dir", "docs"]).unwrap();
        assert_eq!(a.options.database_path(), PathBuf::from("db.json"));
        assert!(matches!(a.input, Input::Deck { .. }));
    }

    #[test]
    fn deck_value_resolves_saved_deck_page() {
        let dir = tempfile::tempdir().unwrap();
        let saved = dir.path().join("deck_1234.html");
        fs::write(&saved, "<html></html>").unwrap();
        let deck_file = dir.path().join("mine.html");
        fs::write(&deck_file, "<html></html>").unwrap();

        assert_eq!(deck_path(deck_file.to_str().unwrap(), dir.path()).unwrap(), deck_file);
        assert_eq!(deck_path("1234", dir.path()).unwrap(), saved);
        assert_eq!(deck_path("https://example.com/decks/1234/view", dir.path()).unwrap(), saved);
        assert!(deck_path("https://example.com/decks/", dir.path()).is_err());
        assert!(deck_path("5678", dir.path()).is_err());
        assert!(deck_path("no such deck", dir.path()).is_err());
    }

    #[test]
    fn deck_run_resolves_id_and_keeps_quantities() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("deck_42.html"),
            include_str!("../tests/fixtures/jp_deck.html"),
        )
        .unwrap();
        let input = Input::Deck { deck: s!("42"), dir: dir.path().to_path_buf() };
        let (_, ids, deck) = documents(Source::Jp, &input).unwrap();
        assert_eq!(ids, svec!["44174", "44050", "44049", "43064", "45451"]);

        let mut store = CardStore::new();
        store.insert("44174", StoreEntry::Raw(json!({ "name": "リザードンex" })));
        let out = render(Source::Jp, &ids, &store, deck.as_deref());
        assert_eq!(out["deck"][0], json!({ "id": "44174", "quantity": 2 }));
        assert_eq!(out["deck"][3], json!({ "id": "43064", "quantity": 4 }));
        assert_eq!(out["deck"].as_array().unwrap().len(), 5);
        assert_eq!(out["cards"]["44174"]["name"], "リザードンex");
        assert!(out["cards"].get("44050").is_none());
    }

    #[test]
    fn plain_run_renders_bare_records() {
        let mut store = CardStore::new();
        store.insert("CSV5C-012", StoreEntry::Raw(json!({ "name": "x" })));
        let out = render(Source::Chs, &svec!["CSV5C/012"], &store, None);
        assert_eq!(out, json!({ "CSV5C-012": { "name": "x" } }));
    }
}
