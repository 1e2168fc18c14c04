// src/engine/classify.rs
//! Supertype / subtype classification shared by every source.
use crate::card::Supertype;

/// Heading phrase → subtype tables plus the name heuristics of one source.
pub struct CategoryTable {
    /// Checked before `trainer`; longer phrases first.
    pub energy: &'static [(&'static str, &'static str)],
    pub trainer: &'static [(&'static str, &'static str)],
    pub energy_name_suffixes: &'static [&'static str],
    pub energy_name_phrases: &'static [&'static str],
    /// Name marker that turns a name-detected energy into a basic one.
    pub basic_name_marker: Option<&'static str>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    pub supertype: Supertype,
    pub subtype: Option<String>,
}

impl Classification {
    fn new(supertype: Supertype, subtype: Option<&str>) -> Self {
        Self { supertype, subtype: subtype.map(String::from) }
    }
}

pub const SPECIAL_ENERGY: &str = "special energy";
pub const BASIC_ENERGY: &str = "basic energy";

/// First match wins:
/// 1. creature marker present → creature (subtype resolved separately);
/// 2. first heading naming an energy or trainer category;
/// 3. energy-looking name → special (or basic) energy;
/// 4. trainer without subtype.
pub fn classify(creature_marker: bool, headings: &[String], name: &str, table: &CategoryTable) -> Classification {
    if creature_marker {
        return Classification::new(Supertype::Creature, None);
    }

    for heading in headings {
        if let Some((_, sub)) = table.energy.iter().find(|(phrase, _)| heading.contains(phrase)) {
            return Classification::new(Supertype::Energy, Some(*sub));
        }
        if let Some((_, sub)) = table.trainer.iter().find(|(phrase, _)| heading.contains(phrase)) {
            return Classification::new(Supertype::Trainer, Some(*sub));
        }
    }

    let name = name.trim();
    let energy_name = table.energy_name_suffixes.iter().any(|s| name.ends_with(s))
        || table.energy_name_phrases.iter().any(|p| name.contains(p));
    if energy_name {
        let basic = table.basic_name_marker.is_some_and(|m| name.contains(m));
        let sub = if basic { BASIC_ENERGY } else { SPECIAL_ENERGY };
        return Classification::new(Supertype::Energy, Some(sub));
    }

    Classification::new(Supertype::Trainer, None)
}

/// Stage badges that fix the creature subtype outright.
pub const STAGE_BADGES: &[&str] = &["VSTAR", "VMAX"];

/// Stage badge, then the structural mechanic field, then the name suffix list.
pub fn creature_subtype(stage_badge: Option<&str>, mechanic: Option<&str>, name: &str, suffixes: &[&str]) -> Option<String> {
    if let Some(badge) = stage_badge.map(str::trim).filter(|b| STAGE_BADGES.contains(b)) {
        return Some(s!(badge));
    }
    if let Some(m) = mechanic.map(str::trim).filter(|m| !m.is_empty()) {
        return Some(s!(m));
    }
    let name = name.trim();
    suffixes.iter().find(|s| name.ends_with(*s)).map(|s| s!(*s))
}
