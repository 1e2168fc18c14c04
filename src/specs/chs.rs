// src/specs/chs.rs
//! Simplified Chinese card API: `card-detail` JSON payloads.
//!
//! The payload is `{code, msg, data}`; `data` is one card. Identifiers are
//! `SET/NUM` (or `SET-NUM`), which also supply set code and collector number.
use serde::Deserialize;
use serde_json::Value;

use crate::card::{Ability, Attack, CanonicalCard, CardBuilder, EnergyAttrs, EvolutionStage, Modifier, Supertype};
use crate::config::consts::{CHS_ID_SEP, CHS_IMAGE_BASE};
use crate::core::sanitize::{normalize_ws, remove_all};
use crate::engine::classify::{self, BASIC_ENERGY, CategoryTable, SPECIAL_ENERGY};
use crate::engine::evolution::{self, EvoNode};
use crate::engine::icons::{CHS_ICONS, IconTable};
use crate::engine::rules::{self, CHS_RULES, RuleInput, RulePolicy, RuleTexts};
use crate::error::ParseError;
use crate::sets::SetNameResolver;

#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    pub code: Option<i64>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiCard {
    pub set_code: Option<String>,
    pub name: Option<String>,
    pub rarity: Option<String>,
    pub artist: Option<String>,
    pub card_index: Option<Value>,
    pub card_type: Option<String>,
    pub mechanic: Option<String>,
    pub label: Option<Vec<String>>,
    pub pokemon_attr: Option<PokemonAttr>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PokemonAttr {
    pub stage: Option<String>,
    pub hp: Option<Value>,
    pub energy_type: Option<String>,
    pub evolves_from: Option<String>,
    pub ancient_trait: Option<String>,
    pub ability: Option<Vec<ApiSkill>>,
    pub attack: Option<Vec<ApiSkill>>,
    pub weakness: Option<ApiModifier>,
    pub resistance: Option<ApiModifier>,
    pub retreat_cost: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApiSkill {
    pub name: Option<String>,
    pub text: Option<String>,
    pub cost: Option<String>,
    pub damage: Option<Value>,
    #[serde(rename = "isVStarPower")]
    pub is_vstar_power: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApiModifier {
    pub energy: Option<String>,
    pub value: Option<Value>,
}

pub static CHS_CATEGORIES: CategoryTable = CategoryTable {
    energy: &[("Basic Energy", BASIC_ENERGY), ("Special Energy", SPECIAL_ENERGY), ("Energy", "energy")],
    trainer: &[
        ("Stadium", "stadium"),
        ("Supporter", "supporter"),
        ("Item", "item"),
        ("Tool", "tool"),
    ],
    energy_name_suffixes: &[],
    energy_name_phrases: &[],
    basic_name_marker: None,
};

/// Generic `Trainer` cards: description phrase → subtype; anything else is an item.
pub const CHS_TRAINER_HINTS: &[(&str, &str)] = &[("宝可梦道具", "tool"), ("支援者", "supporter"), ("竞技场", "stadium")];

pub const CHS_SUBTYPE_SUFFIXES: &[&str] = &["ex", "VSTAR", "VMAX", "V-UNION", "V", "GX", "EX", "BREAK"];

const CREATURE_TYPE: &str = "Pokemon";
const GENERIC_TRAINER: &str = "Trainer";
const BASE_STAGE: &str = "Basic";
const TERA_TRAIT: &str = "Tera";
const COLORLESS: &str = "c";

pub struct ChsSpec {
    pub icons: &'static IconTable,
    pub categories: &'static CategoryTable,
    pub trainer_hints: &'static [(&'static str, &'static str)],
    pub subtype_suffixes: &'static [&'static str],
    pub rules: &'static RuleTexts,
    pub image_base: &'static str,
}

impl Default for ChsSpec {
    fn default() -> Self {
        Self {
            icons: &CHS_ICONS,
            categories: &CHS_CATEGORIES,
            trainer_hints: CHS_TRAINER_HINTS,
            subtype_suffixes: CHS_SUBTYPE_SUFFIXES,
            rules: &CHS_RULES,
            image_base: CHS_IMAGE_BASE,
        }
    }
}

/// `SET/NUM` or `SET-NUM` → (`SET`, `NUM`).
pub fn split_card_id(card_id: &str) -> Result<(String, String), ParseError> {
    let normalized = card_id.trim().replace('/', &CHS_ID_SEP.to_string());
    match normalized.split_once(CHS_ID_SEP) {
        Some((set, num)) if !set.is_empty() && !num.is_empty() => Ok((s!(set), s!(num))),
        _ => Err(ParseError::malformed(format!("card id `{card_id}` is not SET/NUM or SET-NUM"))),
    }
}

impl ChsSpec {
    pub fn parse(&self, raw: &str, card_id: &str, sets: &dyn SetNameResolver) -> Result<CanonicalCard, ParseError> {
        let (set_code, number) = split_card_id(card_id)?;
        if raw.trim().is_empty() {
            return Err(ParseError::malformed("empty payload"));
        }
        let resp: ApiResponse = serde_json::from_str(raw).map_err(|e| ParseError::malformed(format!("payload is not json: {e}")))?;
        if resp.code != Some(200) {
            let code = resp.code.map(|c| c.to_string()).unwrap_or_else(|| s!("none"));
            return Err(ParseError::malformed(format!("api code {code}: {}", resp.msg.unwrap_or_default())));
        }
        let data = match resp.data {
            Some(Value::Object(map)) if !map.is_empty() => Value::Object(map),
            _ => return Err(ParseError::MissingRequiredField { field: "data" }),
        };
        let card: ApiCard = serde_json::from_value(data).map_err(|e| ParseError::malformed(format!("card data: {e}")))?;

        let name = card.name.clone().unwrap_or_default();
        let mut b = CardBuilder::new(name.clone());
        b.set_code = Some(set_code.clone());
        b.card_number = Some(number);
        b.rarity = card.rarity.clone();
        b.author = card.artist.clone();
        let api_set = card.set_code.clone().unwrap_or(set_code);
        b.set_name = sets.resolve_set_name(&api_set);
        if let Some(idx) = card.card_index.as_ref().and_then(value_string) {
            b.image_url = Some(format!("{}/{}/{}.png", self.image_base, api_set, idx));
        }

        let card_type = card.card_type.clone().unwrap_or_default();
        let headings = vec![card_type.clone()];
        let class = classify::classify(card_type == CREATURE_TYPE, &headings, &name, self.categories);
        b.supertype = Some(class.supertype);
        b.subtype = class.subtype;
        let description = card.description.as_deref().map(normalize_ws).filter(|d| !d.is_empty());

        match class.supertype {
            Supertype::Creature => self.creature(&card, &mut b),
            Supertype::Trainer => {
                if b.subtype.is_none() && card_type == GENERIC_TRAINER {
                    let desc = description.as_deref().unwrap_or("");
                    let hint = self.trainer_hints.iter().find(|(phrase, _)| desc.contains(phrase));
                    b.subtype = Some(s!(hint.map(|(_, sub)| *sub).unwrap_or("item")));
                }
                b.trainer.text = description;
            }
            Supertype::Energy => {
                let text = if b.subtype.as_deref() == Some(SPECIAL_ENERGY) { description } else { None };
                b.energy = Some(EnergyAttrs::Effect { text });
            }
        }

        let attr = card.pokemon_attr.as_ref();
        let input = RuleInput {
            name: &name,
            subtype: b.subtype.as_deref(),
            option: b.creature.option.as_deref(),
            is_creature: b.is_creature(),
            is_base_stage: attr.and_then(|a| a.stage.as_deref()) == Some(BASE_STAGE),
            verbatim: None,
        };
        b.add_rule = rules::resolve(&input, Some(self.rules), RulePolicy::Infer);

        b.build()
    }

    fn creature(&self, card: &ApiCard, b: &mut CardBuilder) {
        let attr = card.pokemon_attr.as_ref();
        let stage = attr.and_then(|a| a.stage.as_deref());
        b.subtype = classify::creature_subtype(stage, card.mechanic.as_deref(), &b.name, self.subtype_suffixes);

        let name = b.name.clone();
        let c = &mut b.creature;
        c.option = card
            .label
            .as_ref()
            .and_then(|l| l.first().cloned())
            .or_else(|| attr.and_then(|a| a.ancient_trait.as_deref()).filter(|t| *t == TERA_TRAIT).map(|_| s!("Terastal")));

        let Some(attr) = attr else { return };
        c.hp = attr.hp.as_ref().and_then(value_string);
        c.color = attr.energy_type.iter().map(|t| self.icons.translate(t)).collect();
        c.evolution_stage = stage.and_then(EvolutionStage::from_label);

        let parent = attr.evolves_from.as_deref().map(str::trim).filter(|p| !p.is_empty());
        if let (Some(parent), true) = (parent, stage.is_some_and(|s| s != BASE_STAGE)) {
            let nodes = [
                EvoNode { names: vec![name.clone()], is_current: true, has_arrow: true },
                EvoNode { names: vec![s!(parent)], is_current: false, has_arrow: true },
            ];
            match evolution::resolve(&nodes, &name, false) {
                Ok(chain) => c.evolves_from = chain.evolves_from,
                Err(e) => logw!("chs: evolution chain for {}: {}", name, e),
            }
        }

        c.abilities = attr
            .ability
            .iter()
            .flatten()
            .map(|a| Ability {
                name: a.name.clone().unwrap_or_default(),
                text: s!(a.text.as_deref().unwrap_or("").trim()),
                option: vstar_option(a),
            })
            .collect();
        c.attacks = attr
            .attack
            .iter()
            .flatten()
            .map(|a| Attack {
                name: a.name.clone().unwrap_or_default(),
                cost: a.cost.as_deref().unwrap_or("").chars().map(|ch| self.icons.translate(&ch.to_string())).collect(),
                damage: a.damage.as_ref().and_then(value_string).unwrap_or_default(),
                text: s!(a.text.as_deref().unwrap_or("").trim()),
                option: vstar_option(a),
            })
            .collect();

        c.weaknesses = attr.weakness.as_ref().and_then(|w| {
            let kind = self.icons.translate(w.energy.as_deref()?);
            Some(Modifier::weakness(kind, remove_all(&w.value.as_ref().and_then(value_string)?, &["×"])))
        });
        c.resistances = attr.resistance.as_ref().and_then(|r| {
            let kind = self.icons.translate(r.energy.as_deref()?);
            Some(Modifier::resistance(kind, remove_all(&r.value.as_ref().and_then(value_string)?, &["-"])))
        });
        c.retreat_cost = vec![self.icons.translate(COLORLESS); attr.retreat_cost.unwrap_or(0) as usize];
    }
}

/* ---------- helpers ---------- */

fn vstar_option(skill: &ApiSkill) -> Option<String> {
    skill.is_vstar_power.unwrap_or(false).then(|| s!("Vstar"))
}

/// Strings as is, numbers printed; anything else is absent.
pub(crate) fn value_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sets::NoSetNames;

    #[test]
    fn card_ids() {
        assert_eq!(split_card_id("CSV5C/012").unwrap(), (s!("CSV5C"), s!("012")));
        assert_eq!(split_card_id("CSV5C-012").unwrap(), (s!("CSV5C"), s!("012")));
        assert!(matches!(split_card_id("CSV5C"), Err(ParseError::MalformedInput { .. })));
    }

    #[test]
    fn api_error_code_is_malformed() {
        let err = ChsSpec::default().parse(r#"{"code": 500, "msg": "boom"}"#, "A-1", &NoSetNames).unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn empty_data_is_missing() {
        let err = ChsSpec::default().parse(r#"{"code": 200, "data": {}}"#, "A-1", &NoSetNames).unwrap_err();
        assert!(matches!(err, ParseError::MissingRequiredField { field: "data" }));
    }

    #[test]
    fn generic_trainer_refined_by_description() {
        let raw = r#"{"code": 200, "data": {"name": "森林封印石", "cardType": "Trainer",
            "description": "这张卡可以附着于宝可梦V身上的  宝可梦道具"}}"#;
        let card = ChsSpec::default().parse(raw, "CS5aC/001", &NoSetNames).unwrap();
        assert_eq!(card.subtype.as_deref(), Some("tool"));
        assert_eq!(card.trainer().unwrap().text.as_deref(), Some("这张卡可以附着于宝可梦V身上的 宝可梦道具"));
    }
}
