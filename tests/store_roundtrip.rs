// tests/store_roundtrip.rs
// Card store persistence: load(save(store)) gives the same store back.
use std::fs;

use proptest::prelude::*;
use tempfile::tempdir;

use card_scrape::card::{Attack, CardBuilder, EnergyAttrs, Modifier, Supertype};
use card_scrape::store::{CardStore, StoreEntry};

fn creature(name: &str, hp: &str, attacks: &[String]) -> CardBuilder {
    let mut b = CardBuilder::new(name);
    b.supertype = Some(Supertype::Creature);
    b.creature.hp = Some(hp.to_string());
    b.creature.color = vec!["炎".to_string()];
    b.creature.weaknesses = Some(Modifier::weakness("水", "2"));
    b.creature.attacks = attacks
        .iter()
        .map(|n| Attack { name: n.clone(), cost: vec!["無".to_string()], damage: "10".into(), text: String::new(), option: None })
        .collect();
    b
}

fn sample_store() -> CardStore {
    let mut store = CardStore::new();
    store.insert("44174", creature("リザードンex", "330", &["バーニングダーク".to_string()]).build().unwrap());

    let mut trainer = CardBuilder::new("博士的研究");
    trainer.subtype = Some("supporter".into());
    trainer.trainer.text = Some("將自己的手牌全部丟棄，從牌庫抽出7張卡。".into());
    store.insert("4001", trainer.build().unwrap());

    let mut energy = CardBuilder::new("基本火能量");
    energy.supertype = Some(Supertype::Energy);
    energy.energy = Some(EnergyAttrs::Effect { text: None });
    store.insert("CSV1C-002", energy.build().unwrap());
    store
}

#[test]
fn missing_and_empty_files_load_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("database_jp.json");
    assert!(CardStore::load(&path).unwrap().is_empty());

    fs::write(&path, "").unwrap();
    assert!(CardStore::load(&path).unwrap().is_empty());
}

#[test]
fn empty_store_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("db.json");
    CardStore::new().save(&path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    assert!(CardStore::load(&path).unwrap().is_empty());
}

#[test]
fn saved_file_is_pretty_utf8_without_tmp_leftover() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("database_cht.json");
    let store = sample_store();
    store.save(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\n    \"4001\": {"));
    assert!(text.contains("博士的研究"));
    assert!(!text.contains("\\u"));
    assert!(!dir.path().join("nested").join("database_cht.json.tmp").exists());

    assert_eq!(CardStore::load(&path).unwrap(), store);
}

#[test]
fn legacy_entries_are_kept_verbatim() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("db.json");
    fs::write(&path, r#"{"1": {"name": null, "supertype": null, "note": "half written"}}"#).unwrap();

    let store = CardStore::load(&path).unwrap();
    assert!(matches!(store.get("1"), Some(StoreEntry::Raw(_))));
    store.save(&path).unwrap();

    let again: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(again["1"]["note"], "half written");
}

#[test]
fn corrupt_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("db.json");
    fs::write(&path, "{not json").unwrap();
    assert!(CardStore::load(&path).is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn save_then_load_is_identity(
        names in proptest::collection::vec("[a-zA-Zあ-んア-ン一-龥]{1,10}", 0..6),
        hp in "[1-9][0-9]{1,2}",
        attacks in proptest::collection::vec("[ぁ-んa-z ]{1,12}", 0..4),
    ) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");

        let mut store = CardStore::new();
        for (i, name) in names.iter().enumerate() {
            store.insert(format!("{i}"), creature(name, &hp, &attacks).build().unwrap());
        }
        store.save(&path).unwrap();
        prop_assert_eq!(CardStore::load(&path).unwrap(), store);
    }
}
