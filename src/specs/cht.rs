// src/specs/cht.rs
//! Traditional Chinese official card site: card detail pages.
use crate::card::{Ability, Attack, CanonicalCard, CardBuilder, EnergyAttrs, EvolutionStage, Modifier, Supertype};
use crate::core::html::{Content, Node, strip_text};
use crate::core::sanitize::{basename, bracketed, digits_after, normalize_ws, remove_all, squash_ws, strip_brackets};
use crate::engine::classify::{self, BASIC_ENERGY, CategoryTable, SPECIAL_ENERGY};
use crate::engine::dispatch::{self, Template};
use crate::engine::evolution::{self, EvoNode};
use crate::engine::icons::{CHT_ICONS, IconTable};
use crate::engine::rules::{self, CHT_RULES, RuleInput, RulePolicy, RuleTexts};
use crate::engine::types::Source;
use crate::error::ParseError;

pub const CHT_TEMPLATES: &[Template<()>] = &[Template {
    name: "card-detail",
    fingerprint: &["h1.pageHeader.cardDetail"],
    layout: (),
}];

pub static CHT_CATEGORIES: CategoryTable = CategoryTable {
    energy: &[("基本能量卡", BASIC_ENERGY), ("特殊能量卡", SPECIAL_ENERGY)],
    trainer: &[
        ("物品", "item"),
        ("支援者", "supporter"),
        ("競技場", "stadium"),
        ("寶可夢道具", "tool"),
    ],
    energy_name_suffixes: &["能量"],
    energy_name_phrases: &[],
    basic_name_marker: None,
};

pub const CHT_SUBTYPE_SUFFIXES: &[&str] = &["ex", "VSTAR", "VMAX", "V"];

const MEGA_PREFIX: &str = "超級";
const VSTAR_POWER: &str = "[VSTAR力量]";
const ABILITY_TAG: &str = "[特性]";
const TERASTAL_TAG: &str = "[太晶]";
const TERASTAL_NAME: &str = "太晶";
const TERASTAL_TEXT: &str = "只要這隻寶可夢在備戰區，不會受到招式的傷害。";
const RULE_SUFFIX: &str = "規則]";

pub struct ChtSpec {
    pub templates: &'static [Template<()>],
    pub icons: &'static IconTable,
    pub categories: &'static CategoryTable,
    pub subtype_suffixes: &'static [&'static str],
    pub rules: &'static RuleTexts,
}

impl Default for ChtSpec {
    fn default() -> Self {
        Self {
            templates: CHT_TEMPLATES,
            icons: &CHT_ICONS,
            categories: &CHT_CATEGORIES,
            subtype_suffixes: CHT_SUBTYPE_SUFFIXES,
            rules: &CHT_RULES,
        }
    }
}

/// One `.skill` block, after tag handling.
enum Skill {
    Ability(Ability),
    Attack(Attack),
    Rule(String),
    Terastal,
}

impl ChtSpec {
    pub fn parse<N: Node>(&self, root: &N) -> Result<CanonicalCard, ParseError> {
        dispatch::select(root, self.templates, Source::Cht)?;

        // Name is the heading's last text run; earlier runs are the stage badge.
        let heading = root.find("h1.pageHeader.cardDetail");
        let name = heading
            .and_then(|h| {
                h.contents().into_iter().rev().find_map(|c| match c {
                    Content::Text(t) if !t.trim().is_empty() => Some(s!(t.trim())),
                    _ => None,
                })
            })
            .or_else(|| heading.map(|h| strip_text(&h)))
            .unwrap_or_default();

        let mut b = CardBuilder::new(name.clone());
        b.image_url = root.find(".cardImage img").and_then(|i| i.attr("src"));
        b.set_name = text_of(root, ".expansionLinkColumn a");
        b.card_number = text_of(root, ".expansionColumn .collectorNumber");
        b.set_code = text_of(root, ".expansionColumn .alpha");
        b.author = text_of(root, ".illustrator a");

        let marker = root.find(".evolveMarker");
        let headings: Vec<String> = text_of(root, ".skillInformation .commonHeader").into_iter().collect();
        let class = classify::classify(marker.is_some(), &headings, &name, self.categories);
        b.supertype = Some(class.supertype);
        b.subtype = class.subtype;

        let mut verbatim_rule = None;
        match class.supertype {
            Supertype::Creature => {
                b.subtype = classify::creature_subtype(None, None, &name, self.subtype_suffixes);
                verbatim_rule = self.creature(root, marker, &mut b);
            }
            Supertype::Trainer => {
                b.trainer.text = self.effect_text(root);
            }
            Supertype::Energy => {
                b.energy = Some(if b.subtype.as_deref() == Some(BASIC_ENERGY) {
                    let label = bracketed(&name, '【', '】').into_iter().next();
                    EnergyAttrs::Basic(label.unwrap_or_else(|| remove_all(&name, &["基本", "能量"])))
                } else {
                    EnergyAttrs::Effect { text: self.effect_text(root) }
                });
            }
        }

        let input = RuleInput {
            name: &name,
            subtype: b.subtype.as_deref(),
            option: b.creature.option.as_deref(),
            is_creature: b.is_creature(),
            is_base_stage: b.creature.evolution_stage.is_none(),
            verbatim: verbatim_rule.as_deref(),
        };
        b.add_rule = rules::resolve(&input, Some(self.rules), RulePolicy::PreferVerbatim);

        b.build()
    }

    /// Fills creature attributes; returns the verbatim rule block, if any.
    fn creature<N: Node>(&self, root: &N, marker: Option<N>, b: &mut CardBuilder) -> Option<String> {
        let name = b.name.clone();
        let c = &mut b.creature;

        if name.starts_with(MEGA_PREFIX) && name.ends_with("ex") {
            c.option = Some(s!(rules::OPTION_MEGA));
        }
        c.hp = text_of(root, ".mainInfomation .number");
        c.color = root
            .find(".mainInfomation img")
            .and_then(|i| i.attr("src"))
            .map(|src| vec![self.icons.translate(basename(&src))])
            .unwrap_or_default();

        c.evolution_stage = marker.and_then(|m| EvolutionStage::from_label(&strip_text(&m)));
        if name.ends_with("VSTAR") || name.ends_with("VMAX") {
            c.evolution_stage = Some(EvolutionStage::VEvolved);
        }

        let mut verbatim = None;
        for skill in root.find_all(".skillInformation .skill") {
            match self.skill(&skill) {
                Skill::Ability(a) => c.abilities.push(a),
                Skill::Attack(a) => c.attacks.push(a),
                Skill::Rule(r) => verbatim = Some(r),
                Skill::Terastal => c.option = Some(s!("Terastal")),
            }
        }

        self.sub_information(root, c);

        match evolution::resolve(&evolution_nodes(root), &name, false) {
            Ok(chain) => c.evolves_from = chain.evolves_from,
            Err(e) => logw!("cht: evolution chain for {}: {}", name, e),
        }
        verbatim
    }

    fn skill<N: Node>(&self, skill: &N) -> Skill {
        let mut name = text_of(skill, ".skillName").unwrap_or_default();
        let cost = skill
            .find(".skillCost")
            .map(|c| {
                c.find_all("img")
                    .iter()
                    .filter_map(|i| i.attr("src"))
                    .map(|src| self.icons.translate(basename(&src)))
                    .collect()
            })
            .unwrap_or_default();
        let damage = text_of(skill, ".skillDamage").unwrap_or_default();
        let text = skill.find(".skillEffect").map(|e| self.inline_text(&e)).unwrap_or_default();

        let vstar = name.contains(VSTAR_POWER);
        if vstar {
            name = s!(name.replace(VSTAR_POWER, "").trim());
        }
        let option = vstar.then(|| s!("Vstar"));

        if name.starts_with('[') && name.ends_with(RULE_SUFFIX) {
            return Skill::Rule(text.replace(['【', '】'], ""));
        }
        if name.contains(ABILITY_TAG) {
            return Skill::Ability(Ability { name: strip_brackets(&name), text, option });
        }
        let terastal_name = name.contains(TERASTAL_TAG) || name.trim() == TERASTAL_NAME;
        if terastal_name && squash_ws(&text) == TERASTAL_TEXT {
            return Skill::Terastal;
        }
        Skill::Attack(Attack { name, cost, damage, text, option })
    }

    fn effect_text<N: Node>(&self, root: &N) -> Option<String> {
        root.find(".skillInformation .skillEffect").map(|e| self.inline_text(&e)).filter(|t| !t.is_empty())
    }

    /// Text runs joined by a space, energy `<img>` icons glued in as `【X】` / `[file]`.
    fn inline_text<N: Node>(&self, el: &N) -> String {
        let mut out = String::new();
        let mut glued = false;
        self.push_inline(el, &mut out, &mut glued);
        normalize_ws(&out)
    }

    fn push_inline<N: Node>(&self, el: &N, out: &mut String, glued: &mut bool) {
        for content in el.contents() {
            match content {
                Content::Text(t) => {
                    let t = t.trim();
                    if t.is_empty() {
                        continue;
                    }
                    if !out.is_empty() && !*glued {
                        out.push(' ');
                    }
                    out.push_str(t);
                    *glued = false;
                }
                Content::Element(e) if e.is("img") => {
                    if let Some(src) = e.attr("src") {
                        out.push_str(&self.icons.inline(basename(&src)));
                        *glued = true;
                    }
                }
                Content::Element(e) => self.push_inline(&e, out, glued),
            }
        }
    }

    /// Header → cell table holding weakness, resistance and retreat.
    fn sub_information<N: Node>(&self, root: &N, c: &mut crate::card::CreatureAttrs) {
        let Some(table) = root.find(".subInformation table") else { return };
        let headers: Vec<String> = table.find_all("th").iter().map(strip_text).collect();
        let cells = table.find_all("td");
        if headers.len() != cells.len() {
            logd!("cht: sub information has {} headers, {} cells", headers.len(), cells.len());
            return;
        }
        let cell = |h: &str| headers.iter().position(|x| x == h).map(|i| cells[i]);
        let first_icon = |td: &N| td.find_all("img").iter().find_map(|i| i.attr("src")).map(|s| s!(basename(&s)));

        if let Some(td) = cell("弱點") {
            if let (Some(tok), Some(v)) = (first_icon(&td), digits_after(&strip_text(&td), &['×'])) {
                c.weaknesses = Some(Modifier::weakness(self.icons.translate(&tok), v));
            }
        }
        if let Some(td) = cell("抵抗力") {
            if let (Some(tok), Some(v)) = (first_icon(&td), digits_after(&strip_text(&td), &['－', '-'])) {
                c.resistances = Some(Modifier::resistance(self.icons.translate(&tok), v));
            }
        }
        if let Some(td) = cell("撤退") {
            c.retreat_cost = td
                .find_all("img")
                .iter()
                .filter_map(|i| i.attr("src"))
                .map(|src| self.icons.translate(basename(&src)))
                .collect();
        }
    }
}

/* ---------- helpers ---------- */

fn text_of<N: Node>(scope: &N, selector: &str) -> Option<String> {
    scope.find(selector).map(|n| strip_text(&n)).filter(|t| !t.is_empty())
}


/// Stage heads of the `ul` ancestors of the active entry, innermost first.
/// The innermost head is the card itself; every outer head is a pre-evolution.
fn evolution_nodes<N: Node>(root: &N) -> Vec<EvoNode> {
    let Some(active) = root.find(".evolution li.active") else { return Vec::new() };
    active
        .ancestors()
        .into_iter()
        .filter(|a| a.is("ul"))
        .filter_map(|ul| ul.children().into_iter().find(|li| li.is("li") && li.has_class("step")))
        .filter_map(|li| li.find("a").map(|a| strip_text(&a)))
        .filter(|n| !n.is_empty())
        .enumerate()
        .map(|(i, name)| EvoNode { names: vec![name], is_current: i == 0, has_arrow: i > 0 })
        .collect()
}
