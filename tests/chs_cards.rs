// tests/chs_cards.rs
// Simplified Chinese API payloads, including set names from a set list.
use card_scrape::card::{EnergyAttrs, EvolutionStage, Modifier, Supertype};
use card_scrape::error::ParseError;
use card_scrape::sets::SetNameMap;
use card_scrape::{Pipeline, Source};

const CHARIZARD: &str = include_str!("fixtures/chs_charizard_ex.json");
const FIRE_ENERGY: &str = include_str!("fixtures/chs_basic_energy.json");

#[test]
fn creature_payload_fields() {
    let card = Pipeline::default().parse(Source::Chs, CHARIZARD, "CSV5C/012").unwrap();

    assert_eq!(card.name.as_deref(), Some("喷火龙ex"));
    assert_eq!(card.supertype(), Supertype::Creature);
    assert_eq!(card.subtype.as_deref(), Some("ex"));
    assert_eq!(card.set_code.as_deref(), Some("CSV5C"));
    assert_eq!(card.card_number.as_deref(), Some("012"));
    assert_eq!(card.set_name, None);
    assert_eq!(card.rarity.as_deref(), Some("RR"));
    assert_eq!(card.image_url.as_deref(), Some("https://tcg.mik.moe/static/img/CSV5C/12.png"));
    assert_eq!(card.add_rule.as_deref(), Some("当宝可梦ex昏厥时，对手将拿取2张奖赏卡。"));

    let c = card.creature().unwrap();
    assert_eq!(c.hp.as_deref(), Some("330"));
    assert_eq!(c.color, vec!["悪"]);
    assert_eq!(c.evolution_stage, Some(EvolutionStage::Stage2));
    assert_eq!(c.evolves_from, vec!["火恐龙"]);
    assert_eq!(c.weaknesses, Some(Modifier::weakness("草", "2")));
    assert_eq!(c.resistances, None);
    assert_eq!(c.retreat_cost, vec!["無", "無"]);

    assert_eq!(c.abilities[0].name, "烈炎支配");
    assert!(!c.abilities[0].text.ends_with(' '));
    assert_eq!(c.attacks[0].cost, vec!["炎", "炎"]);
    assert_eq!(c.attacks[0].damage, "180+");
}

#[test]
fn set_name_from_set_list() {
    let sets = SetNameMap::from_json(r#"[{"setCode": "CSV5C", "name": "黑晶炽诚"}]"#).unwrap();
    let card = Pipeline::with_sets(&sets).parse(Source::Chs, CHARIZARD, "CSV5C-012").unwrap();
    assert_eq!(card.set_name.as_deref(), Some("黑晶炽诚"));
}

#[test]
fn basic_energy_has_no_text() {
    let card = Pipeline::default().parse(Source::Chs, FIRE_ENERGY, "CSV1C/002").unwrap();
    assert_eq!(card.supertype(), Supertype::Energy);
    assert_eq!(card.subtype.as_deref(), Some("basic energy"));
    assert_eq!(card.energy(), Some(&EnergyAttrs::Effect { text: None }));
    assert_eq!(card.image_url.as_deref(), Some("https://tcg.mik.moe/static/img/CSV1C/002.png"));
    assert_eq!(serde_json::to_value(&card).unwrap()["energy"], serde_json::json!({}));
}

#[test]
fn broken_payloads() {
    let p = Pipeline::default();
    assert!(matches!(p.parse(Source::Chs, "<html>", "A/1"), Err(ParseError::MalformedInput { .. })));
    assert!(matches!(p.parse(Source::Chs, CHARIZARD, "CSV5C"), Err(ParseError::MalformedInput { .. })));
    assert!(matches!(
        p.parse(Source::Chs, r#"{"code": 200, "data": null}"#, "A/1"),
        Err(ParseError::MissingRequiredField { field: "data" })
    ));
}

#[test]
fn vstar_power_and_tera_option() {
    let raw = r#"{"code": 200, "data": {"name": "太乐巴戈斯ex", "cardType": "Pokemon", "mechanic": "ex",
        "pokemonAttr": {"stage": "Basic", "ancientTrait": "Tera", "energyType": "c",
            "attack": [{"name": "A", "cost": "xc", "isVStarPower": true}], "retreatCost": 0}}}"#;
    let card = Pipeline::default().parse(Source::Chs, raw, "CSV8C/150").unwrap();
    let c = card.creature().unwrap();
    assert_eq!(c.option.as_deref(), Some("Terastal"));
    assert_eq!(c.evolution_stage, None);
    assert!(c.evolves_from.is_empty());
    assert_eq!(c.attacks[0].option.as_deref(), Some("Vstar"));
    assert_eq!(c.attacks[0].cost, vec!["[x]", "無"]);
    assert!(c.retreat_cost.is_empty());
}
