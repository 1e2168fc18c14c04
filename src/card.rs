// src/card.rs
//! Canonical card model.
//!
//! `CanonicalCard` is what every source pipeline produces and what the store
//! persists. Supertype-specific attributes live in the `CardAttrs` variant, so a
//! creature card cannot carry trainer attributes. On disk the record is flattened
//! into `CardRecord`, which keeps the key layout of the existing card databases
//! (`pokemon` / `trainer` / `energy`, with the unselected two set to `null`).
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Supertype {
    #[serde(rename = "pokemon")]
    Creature,
    Trainer,
    Energy,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "CardRecord", try_from = "CardRecord")]
pub struct CanonicalCard {
    pub name: Option<String>,
    pub set_code: Option<String>,
    pub set_name: Option<String>,
    pub card_number: Option<String>,
    pub image_url: Option<String>,
    pub subtype: Option<String>,
    pub add_rule: Option<String>,
    pub rarity: Option<String>,
    pub author: Option<String>,
    pub attrs: CardAttrs,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CardAttrs {
    Creature(CreatureAttrs),
    Trainer(TrainerAttrs),
    Energy(EnergyAttrs),
}

impl CanonicalCard {
    pub fn supertype(&self) -> Supertype {
        match self.attrs {
            CardAttrs::Creature(_) => Supertype::Creature,
            CardAttrs::Trainer(_) => Supertype::Trainer,
            CardAttrs::Energy(_) => Supertype::Energy,
        }
    }

    /// A record counts as valid store content only once it carries a name.
    pub fn has_name(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.trim().is_empty())
    }

    pub fn creature(&self) -> Option<&CreatureAttrs> {
        match &self.attrs {
            CardAttrs::Creature(c) => Some(c),
            _ => None,
        }
    }

    pub fn trainer(&self) -> Option<&TrainerAttrs> {
        match &self.attrs {
            CardAttrs::Trainer(t) => Some(t),
            _ => None,
        }
    }

    pub fn energy(&self) -> Option<&EnergyAttrs> {
        match &self.attrs {
            CardAttrs::Energy(e) => Some(e),
            _ => None,
        }
    }
}

/* ---------- attribute blocks ---------- */

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatureAttrs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub color: Vec<String>,
    /// `None` for the base form.
    #[serde(rename = "evolves", default, skip_serializing_if = "Option::is_none")]
    pub evolution_stage: Option<EvolutionStage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evolves_from: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evolves_to: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub abilities: Vec<Ability>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attacks: Vec<Attack>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "at_most_one")]
    pub weaknesses: Option<Modifier>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "at_most_one")]
    pub resistances: Option<Modifier>,
    #[serde(rename = "retreats", default, skip_serializing_if = "Vec::is_empty")]
    pub retreat_cost: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attack {
    pub name: String,
    #[serde(default)]
    pub cost: Vec<String>,
    #[serde(default)]
    pub damage: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option: Option<String>,
}

/// Weakness or resistance entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub calc: Calc,
    pub value: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Calc {
    Multiply,
    Minus,
    Plus,
}

impl Modifier {
    pub fn weakness(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self { kind: kind.into(), calc: Calc::Multiply, value: value.into() }
    }

    pub fn resistance(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self { kind: kind.into(), calc: Calc::Minus, value: value.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EvolutionStage {
    Stage1,
    Stage2,
    VEvolved,
    Other(String),
}

/// Base-form labels across the sources; they map to no stage at all.
const BASE_STAGE_LABELS: &[&str] = &["たね", "基礎", "基础", "Basic"];

impl EvolutionStage {
    pub fn label(&self) -> &str {
        match self {
            EvolutionStage::Stage1 => "1 進化",
            EvolutionStage::Stage2 => "2 進化",
            EvolutionStage::VEvolved => "V進化",
            EvolutionStage::Other(s) => s,
        }
    }

    /// `None` for a base form or an empty label.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() || BASE_STAGE_LABELS.contains(&label) {
            return None;
        }
        Some(Self::from(s!(label)))
    }
}

impl From<String> for EvolutionStage {
    fn from(s: String) -> Self {
        match s.as_str() {
            "1 進化" | "1進化" | "1階進化" | "Stage 1" => EvolutionStage::Stage1,
            "2 進化" | "2進化" | "2階進化" | "Stage 2" => EvolutionStage::Stage2,
            "V進化" | "VSTAR" | "VMAX" => EvolutionStage::VEvolved,
            _ => EvolutionStage::Other(s),
        }
    }
}

impl From<EvolutionStage> for String {
    fn from(stage: EvolutionStage) -> Self {
        match stage {
            EvolutionStage::Other(s) => s,
            known => s!(known.label()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerAttrs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Attack-bearing trainer devices only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attacks: Vec<Attack>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnergyAttrs {
    /// Basic energy: bare type label (may be empty).
    Basic(String),
    /// Special energy: `{"text": ...}`; `{}` when the source has no text.
    Effect {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
}

impl EnergyAttrs {
    pub fn text(&self) -> Option<&str> {
        match self {
            EnergyAttrs::Basic(_) => None,
            EnergyAttrs::Effect { text } => text.as_deref(),
        }
    }
}

/* ---------- wire record ---------- */

/// Flat on-disk layout of a card.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CardRecord {
    pub name: Option<String>,
    pub set_code: Option<String>,
    pub set_name: Option<String>,
    pub card_number: Option<String>,
    pub image_url: Option<String>,
    pub supertype: Option<Supertype>,
    pub subtype: Option<String>,
    pub pokemon: Option<CreatureAttrs>,
    pub trainer: Option<TrainerAttrs>,
    pub energy: Option<EnergyAttrs>,
    #[serde(rename = "addRule")]
    pub add_rule: Option<String>,
    pub rarity: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("record has no supertype")]
    MissingSupertype,

    #[error("supertype `{supertype:?}` record also carries `{extra}` attributes")]
    ForeignAttributes { supertype: Supertype, extra: &'static str },
}

impl From<CanonicalCard> for CardRecord {
    fn from(card: CanonicalCard) -> Self {
        let supertype = Some(card.supertype());
        let (pokemon, trainer, energy) = match card.attrs {
            CardAttrs::Creature(c) => (Some(c), None, None),
            CardAttrs::Trainer(t) => (None, Some(t), None),
            CardAttrs::Energy(e) => (None, None, Some(e)),
        };
        Self {
            name: card.name,
            set_code: card.set_code,
            set_name: card.set_name,
            card_number: card.card_number,
            image_url: card.image_url,
            supertype,
            subtype: card.subtype,
            pokemon,
            trainer,
            energy,
            add_rule: card.add_rule,
            rarity: card.rarity,
            author: card.author,
        }
    }
}

impl TryFrom<CardRecord> for CanonicalCard {
    type Error = RecordError;

    fn try_from(r: CardRecord) -> Result<Self, Self::Error> {
        let supertype = r.supertype.ok_or(RecordError::MissingSupertype)?;
        let foreign = |extra| RecordError::ForeignAttributes { supertype, extra };

        let attrs = match supertype {
            Supertype::Creature => {
                if r.trainer.is_some() { return Err(foreign("trainer")); }
                if r.energy.is_some() { return Err(foreign("energy")); }
                CardAttrs::Creature(r.pokemon.unwrap_or_default())
            }
            Supertype::Trainer => {
                if r.pokemon.is_some() { return Err(foreign("pokemon")); }
                if r.energy.is_some() { return Err(foreign("energy")); }
                CardAttrs::Trainer(r.trainer.unwrap_or_default())
            }
            Supertype::Energy => {
                if r.pokemon.is_some() { return Err(foreign("pokemon")); }
                if r.trainer.is_some() { return Err(foreign("trainer")); }
                CardAttrs::Energy(r.energy.unwrap_or(EnergyAttrs::Effect { text: None }))
            }
        };

        Ok(Self {
            name: r.name,
            set_code: r.set_code,
            set_name: r.set_name,
            card_number: r.card_number,
            image_url: r.image_url,
            subtype: r.subtype,
            add_rule: r.add_rule,
            rarity: r.rarity,
            author: r.author,
            attrs,
        })
    }
}

/// `Option<T>` stored as a JSON array of zero or one element.
mod at_most_one {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T: Serialize, S: Serializer>(v: &Option<T>, s: S) -> Result<S::Ok, S::Error> {
        v.as_slice().serialize(s)
    }

    pub fn deserialize<'de, T, D>(d: D) -> Result<Option<T>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let list: Option<Vec<T>> = Option::deserialize(d)?;
        Ok(list.and_then(|l| l.into_iter().next()))
    }
}

/* ---------- builder ---------- */

/// Mutable scratch record filled by one extractor run.
#[derive(Debug, Default)]
pub struct CardBuilder {
    pub name: String,
    pub set_code: Option<String>,
    pub set_name: Option<String>,
    pub card_number: Option<String>,
    pub image_url: Option<String>,
    pub supertype: Option<Supertype>,
    pub subtype: Option<String>,
    pub creature: CreatureAttrs,
    pub trainer: TrainerAttrs,
    pub energy: Option<EnergyAttrs>,
    pub add_rule: Option<String>,
    pub rarity: Option<String>,
    pub author: Option<String>,
}

impl CardBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn is_creature(&self) -> bool {
        self.supertype == Some(Supertype::Creature)
    }

    /// Freeze into a record. Only the attribute block of the final supertype survives.
    pub fn build(self) -> Result<CanonicalCard, ParseError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ParseError::MissingRequiredField { field: "name" });
        }
        let attrs = match self.supertype.unwrap_or(Supertype::Trainer) {
            Supertype::Creature => CardAttrs::Creature(self.creature),
            Supertype::Trainer => CardAttrs::Trainer(self.trainer),
            Supertype::Energy => {
                CardAttrs::Energy(self.energy.unwrap_or(EnergyAttrs::Effect { text: None }))
            }
        };
        Ok(CanonicalCard {
            name: Some(s!(name)),
            set_code: self.set_code,
            set_name: self.set_name,
            card_number: self.card_number,
            image_url: self.image_url,
            subtype: self.subtype,
            add_rule: self.add_rule,
            rarity: self.rarity,
            author: self.author,
            attrs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn creature() -> CanonicalCard {
        let mut b = CardBuilder::new("リザードンex");
        b.supertype = Some(Supertype::Creature);
        b.subtype = Some(s!("ex"));
        b.creature.hp = Some(s!("330"));
        b.creature.evolution_stage = EvolutionStage::from_label("2 進化");
        b.creature.weaknesses = Some(Modifier::weakness("水", "2"));
        b.trainer.text = Some(s!("never persisted"));
        b.build().unwrap()
    }

    #[test]
    fn only_selected_block_is_serialized() {
        let v = serde_json::to_value(creature()).unwrap();
        assert_eq!(v["supertype"], "pokemon");
        assert!(v["trainer"].is_null());
        assert!(v["energy"].is_null());
        assert_eq!(v["pokemon"]["evolves"], "2 進化");
        assert_eq!(v["pokemon"]["weaknesses"], json!([{"type": "水", "calc": "multiply", "value": "2"}]));
        assert!(v["pokemon"].get("resistances").is_none());
    }

    #[test]
    fn mixed_attribute_record_is_rejected() {
        let v = json!({
            "name": "x", "supertype": "pokemon",
            "pokemon": {"hp": "60"}, "trainer": {"text": "t"}
        });
        let err = serde_json::from_value::<CanonicalCard>(v).unwrap_err();
        assert!(err.to_string().contains("trainer"));
    }

    #[test]
    fn base_form_has_no_stage() {
        assert_eq!(EvolutionStage::from_label("たね"), None);
        assert_eq!(EvolutionStage::from_label("基礎"), None);
        assert_eq!(EvolutionStage::from_label("1階進化"), Some(EvolutionStage::Stage1));
        assert_eq!(EvolutionStage::from_label("BREAK進化"), Some(EvolutionStage::Other(s!("BREAK進化"))));
    }

    #[test]
    fn energy_shapes() {
        let basic = serde_json::to_value(EnergyAttrs::Basic(s!("草"))).unwrap();
        assert_eq!(basic, json!("草"));
        let empty = serde_json::to_value(EnergyAttrs::Effect { text: None }).unwrap();
        assert_eq!(empty, json!({}));
        let back: EnergyAttrs = serde_json::from_value(json!({"text": "t"})).unwrap();
        assert_eq!(back.text(), Some("t"));
    }

    #[test]
    fn nameless_builder_fails() {
        let err = CardBuilder::new("  ").build().unwrap_err();
        assert!(matches!(err, ParseError::MissingRequiredField { field: "name" }));
    }

    #[test]
    fn default_supertype_is_trainer() {
        let card = CardBuilder::new("ふしぎなアメ").build().unwrap();
        assert_eq!(card.supertype(), Supertype::Trainer);
        assert!(card.has_name());
    }
}
