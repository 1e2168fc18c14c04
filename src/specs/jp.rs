// src/specs/jp.rs
//! Japanese official card site: card detail pages.
//!
//! Two layouts exist. The full detail page carries the card name in
//! `h1.Heading1`; the embedded detail fragment (served inside the search
//! results) uses `h2.Heading1`. Everything else lives under `.RightBox-inner`.
use crate::card::{Ability, Attack, CanonicalCard, CardBuilder, EnergyAttrs, EvolutionStage, Modifier, Supertype};
use crate::config::consts::JP_ORIGIN;
use crate::core::html::{Content, Node, strip_text, spaced_text};
use crate::core::sanitize::{digits_after, find_fraction, normalize_entities, remove_all};
use crate::engine::classify::{self, BASIC_ENERGY, CategoryTable};
use crate::engine::dispatch::{self, Template};
use crate::engine::evolution::{self, EvoNode};
use crate::engine::icons::{IconTable, JP_ICONS, placeholder};
use crate::engine::rules::{self, RuleInput, RulePolicy};
use crate::engine::types::Source;
use crate::error::ParseError;

pub struct JpLayout {
    pub name_selector: &'static str,
}

pub const JP_TEMPLATES: &[Template<JpLayout>] = &[
    Template {
        name: "detail-page",
        fingerprint: &["h1.Heading1", ".RightBox-inner"],
        layout: JpLayout { name_selector: "h1.Heading1" },
    },
    Template {
        name: "detail-fragment",
        fingerprint: &["h2.Heading1", ".RightBox-inner"],
        layout: JpLayout { name_selector: "h2.Heading1" },
    },
];

pub static JP_CATEGORIES: CategoryTable = CategoryTable {
    energy: &[("基本エネルギー", BASIC_ENERGY), ("特殊エネルギー", classify::SPECIAL_ENERGY)],
    trainer: &[
        ("グッズ", "item"),
        ("サポート", "supporter"),
        ("スタジアム", "stadium"),
        ("ポケモンのどうぐ", "tool"),
    ],
    energy_name_suffixes: &["エネルギー"],
    energy_name_phrases: &[],
    basic_name_marker: Some("基本"),
};

pub const JP_SUBTYPE_SUFFIXES: &[&str] = &["ex", "VSTAR", "VMAX", "V-UNION", "V", "GX", "EX", "BREAK"];

/// Rarity icon file → label.
pub const JP_RARITIES: &[(&str, &str)] = &[
    ("ic_rare_c.gif", "C"),
    ("ic_rare_u.gif", "U"),
    ("ic_rare_u_c.gif", "U"),
    ("ic_rare_r.gif", "R"),
    ("ic_rare_rr.gif", "RR"),
    ("ic_rare_sr.gif", "SR"),
    ("ic_rare_hr.gif", "HR"),
    ("ic_rare_ur.gif", "UR"),
    ("ic_rare_ar.gif", "AR"),
    ("ic_rare_sar.gif", "SAR"),
    ("ic_rare_k.gif", "K"),
    ("ic_rare_ace.gif", "ACE"),
];

const H_ABILITIES: &str = "特性";
const H_ATTACKS: &str = "ワザ";
const H_SPECIAL_RULE: &str = "特別なルール";
const H_WEAKNESS: &str = "弱点";
const TERASTAL_TEXT: &str = "このポケモンは、ベンチにいるかぎり、ワザのダメージを受けない。";
const MEGA_RULE_MARK: &str = "メガシンカexがきぜつしたとき";
const ACE_SPEC: &str = "ACE SPEC";

pub struct JpSpec {
    pub templates: &'static [Template<JpLayout>],
    pub icons: &'static IconTable,
    pub categories: &'static CategoryTable,
    pub subtype_suffixes: &'static [&'static str],
    pub rarities: &'static [(&'static str, &'static str)],
}

impl Default for JpSpec {
    fn default() -> Self {
        Self {
            templates: JP_TEMPLATES,
            icons: &JP_ICONS,
            categories: &JP_CATEGORIES,
            subtype_suffixes: JP_SUBTYPE_SUFFIXES,
            rarities: JP_RARITIES,
        }
    }
}

impl JpSpec {
    pub fn parse<N: Node>(&self, root: &N) -> Result<CanonicalCard, ParseError> {
        let template = dispatch::select(root, self.templates, Source::Jp)?;
        let heading = root
            .find(template.layout.name_selector)
            .ok_or(ParseError::MissingRequiredField { field: "name" })?;
        let name = s!(strip_text(&heading).trim_matches(|c: char| c == '\'' || c == ' '));

        let mut b = CardBuilder::new(name.clone());
        self.basic_info(root, &mut b);

        let top = root.find("div.TopInfo");
        let stage_span = top.and_then(|t| t.find("span.type"));
        let headings: Vec<String> = root.find_all("h2.mt20").iter().map(strip_text).collect();
        let class = classify::classify(stage_span.is_some(), &headings, &name, self.categories);
        b.supertype = Some(class.supertype);
        b.subtype = class.subtype;

        let right = root.find(".RightBox-inner");
        let attacks = right.map(|r| self.attacks(&r)).unwrap_or_default();
        let rule_block = special_rule(root);

        match class.supertype {
            Supertype::Creature => {
                b.subtype = classify::creature_subtype(None, None, &name, self.subtype_suffixes);
                self.creature(root, top, stage_span, right, &mut b);
                b.creature.attacks = attacks;
                if b.subtype.as_deref() == Some("ex") && root.find_with_text("p.mt20", TERASTAL_TEXT).is_some() {
                    b.creature.option = Some(s!("Terastal"));
                }
                if rule_block.as_deref().is_some_and(|r| r.contains(MEGA_RULE_MARK)) {
                    b.creature.option = Some(s!(rules::OPTION_MEGA));
                }
            }
            Supertype::Trainer => {
                b.trainer.text = right.and_then(|r| self.first_paragraph(&r));
                b.trainer.attacks = attacks;
            }
            Supertype::Energy => {
                b.energy = Some(if b.subtype.as_deref() == Some(BASIC_ENERGY) {
                    EnergyAttrs::Basic(remove_all(&name, &["基本", "エネルギー"]))
                } else {
                    EnergyAttrs::Effect { text: right.and_then(|r| self.first_paragraph(&r)) }
                });
            }
        }

        let input = RuleInput {
            name: &name,
            subtype: b.subtype.as_deref(),
            option: b.creature.option.as_deref(),
            is_creature: b.is_creature(),
            is_base_stage: b.creature.evolution_stage.is_none(),
            verbatim: rule_block.as_deref(),
        };
        b.add_rule = rules::resolve(&input, None, RulePolicy::VerbatimOnly);
        b.rarity = self.rarity(root, b.add_rule.as_deref());

        b.build()
    }

    fn basic_info<N: Node>(&self, root: &N, b: &mut CardBuilder) {
        b.image_url = root.find("img.fit").and_then(|i| i.attr("src")).map(|src| {
            if src.starts_with("http") { src } else { join!(JP_ORIGIN, &src) }
        });

        if let Some(subtext) = root.find("div.subtext") {
            b.set_code = subtext
                .find("img.img-regulation")
                .and_then(|i| i.attr("alt"))
                .map(|a| s!(a.trim()))
                .filter(|a| !a.is_empty());
            b.card_number = find_fraction(&normalize_entities(&spaced_text(&subtext)));
        }
        b.set_name = root.find("a.Link.Link-arrow").map(|a| strip_text(&a)).filter(|s| !s.is_empty());
        b.author = root.find("div.author a").map(|a| strip_text(&a)).filter(|s| !s.is_empty());
    }

    fn creature<N: Node>(&self, root: &N, top: Option<N>, stage_span: Option<N>, right: Option<N>, b: &mut CardBuilder) {
        let c = &mut b.creature;
        c.hp = top.and_then(|t| t.find("span.hp-num")).map(|h| strip_text(&h)).filter(|h| !h.is_empty());

        c.evolution_stage = stage_span.and_then(|s| EvolutionStage::from_label(&normalize_entities(&strip_text(&s))));

        c.color = top
            .and_then(|t| t.find_all("span").into_iter().find_map(|s| icon_token(&s)))
            .map(|tok| vec![self.icons.translate(&tok)])
            .unwrap_or_default();

        if let Some(r) = right {
            c.abilities = section(&r, H_ABILITIES)
                .iter()
                .filter(|e| e.is("h4"))
                .map(|h4| Ability {
                    name: strip_text(h4),
                    text: h4.next_sibling_tag("p").map(|p| self.inline_text(&p)).unwrap_or_default(),
                    option: None,
                })
                .collect();

            let nodes: Vec<EvoNode> = r
                .children()
                .into_iter()
                .filter(|d| d.is("div") && d.has_class("evolution"))
                .map(|d| EvoNode {
                    names: d.find_all("a").iter().map(strip_text).filter(|n| !n.is_empty()).collect(),
                    is_current: d.has_class("ev_on") || d.exists(".ev_on"),
                    has_arrow: d.exists(".arrow_on") || d.exists(".arrow_off"),
                })
                .collect();
            let name = b.name.clone();
            match evolution::resolve(&nodes, &name, true) {
                Ok(chain) => {
                    b.creature.evolves_from = chain.evolves_from;
                    b.creature.evolves_to = chain.evolves_to;
                }
                Err(e) => logw!("jp: evolution chain for {}: {}", name, e),
            }
        }

        self.weakness_row(root, b);
    }

    /// `弱点` header row; the values sit in the next row: weakness, resistance, retreat.
    fn weakness_row<N: Node>(&self, root: &N, b: &mut CardBuilder) {
        let Some(th) = root.find_with_text("th", H_WEAKNESS) else { return };
        let Some(tr) = th.ancestors().into_iter().find(|a| a.is("tr")) else { return };
        let Some(row) = tr.next_sibling_tag("tr") else { return };
        let tds = row.find_all("td");
        if tds.len() != 3 {
            logd!("jp: weakness row has {} cells", tds.len());
            return;
        }

        let first_icon = |td: &N| td.find_all("span").into_iter().find_map(|s| icon_token(&s));
        let c = &mut b.creature;
        if let (Some(tok), Some(v)) = (first_icon(&tds[0]), digits_after(&strip_text(&tds[0]), &['×'])) {
            c.weaknesses = Some(Modifier::weakness(self.icons.translate(&tok), v));
        }
        if let (Some(tok), Some(v)) = (first_icon(&tds[1]), digits_after(&strip_text(&tds[1]), &['－', '-'])) {
            c.resistances = Some(Modifier::resistance(self.icons.translate(&tok), v));
        }
        c.retreat_cost = tds[2]
            .find_all("span")
            .iter()
            .filter_map(icon_token)
            .map(|tok| self.icons.translate(&tok))
            .collect();
    }

    fn attacks<N: Node>(&self, right: &N) -> Vec<Attack> {
        section(right, H_ATTACKS)
            .iter()
            .filter(|e| e.is("h4"))
            .map(|h4| {
                let cost = h4
                    .find_all("span.icon")
                    .iter()
                    .filter_map(icon_token)
                    .map(|tok| self.icons.translate(&tok))
                    .collect();
                let damage = h4.find("span.f_right").map(|d| strip_text(&d)).unwrap_or_default();
                let name: String = h4
                    .contents()
                    .into_iter()
                    .filter_map(|c| match c {
                        Content::Text(t) => Some(s!(t.trim())),
                        Content::Element(_) => None,
                    })
                    .collect();
                let text = h4.next_sibling_tag("p").map(|p| self.inline_text(&p)).unwrap_or_default();
                Attack { name: s!(name.trim()), cost, damage, text, option: None }
            })
            .collect()
    }

    /// First direct `p` of the right box: trainer / special energy effect.
    fn first_paragraph<N: Node>(&self, right: &N) -> Option<String> {
        right
            .children()
            .into_iter()
            .find(|c| c.is("p"))
            .map(|p| self.inline_text(&p))
            .filter(|t| !t.is_empty())
    }

    /// Running text with icon spans rendered as `【label】`.
    fn inline_text<N: Node>(&self, el: &N) -> String {
        let mut out = String::new();
        for content in el.contents() {
            match content {
                Content::Text(t) => out.push_str(t.trim()),
                Content::Element(e) => match icon_token(&e) {
                    Some(tok) => out.push_str(&self.icons.inline(&tok)),
                    None => out.push_str(&self.inline_text(&e)),
                },
            }
        }
        s!(out.trim())
    }

    fn rarity<N: Node>(&self, root: &N, add_rule: Option<&str>) -> Option<String> {
        let icon = root
            .find_all("img")
            .into_iter()
            .filter_map(|i| i.attr("src"))
            .find(|src| src.contains("ic_rare_") && src.ends_with(".gif"));
        if let Some(src) = icon {
            let file = crate::core::sanitize::basename(&src);
            return Some(match self.rarities.iter().find(|(f, _)| *f == file) {
                Some((_, label)) => s!(*label),
                None => placeholder(file),
            });
        }
        if add_rule.is_some_and(|r| r.contains(ACE_SPEC)) {
            return Some(s!("ACE"));
        }
        None
    }
}

/* ---------- helpers ---------- */

fn icon_token<N: Node>(el: &N) -> Option<String> {
    el.classes().into_iter().find(|c| c.starts_with("icon-"))
}

/// Elements between the `h2` titled `title` and the next `h2`.
fn section<N: Node>(scope: &N, title: &str) -> Vec<N> {
    match scope.find_with_text("h2", title) {
        Some(h2) => h2.next_elements().into_iter().take_while(|e| !e.is("h2")).collect(),
        None => Vec::new(),
    }
}

/// First non-empty paragraph after the special-rule heading.
fn special_rule<N: Node>(root: &N) -> Option<String> {
    let h2 = root.find_with_text("h2", H_SPECIAL_RULE)?;
    h2.next_elements()
        .into_iter()
        .filter(|e| e.is("p"))
        .map(|p| strip_text(&p))
        .find(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::html::Document;

    fn parse(html: &str) -> Result<CanonicalCard, ParseError> {
        let doc = Document::parse(html)?;
        JpSpec::default().parse(&doc.root())
    }

    #[test]
    fn unknown_layout_is_rejected() {
        let err = parse("<html><body><h1>not a card</h1></body></html>").unwrap_err();
        assert!(matches!(err, ParseError::UnrecognizedTemplate { origin: Source::Jp }));
    }

    #[test]
    fn inline_icons_and_unknown_tokens() {
        let html = r#"<div class="RightBox-inner"><h2 class="mt20">グッズ</h2>
            <p>自分の<span class="icon icon-fire"></span>エネルギーを<span class="icon icon-plasma"></span>1枚</p></div>
            <h1 class="Heading1">テスト</h1>"#;
        let card = parse(html).unwrap();
        assert_eq!(card.subtype.as_deref(), Some("item"));
        assert_eq!(card.trainer().unwrap().text.as_deref(), Some("自分の【炎】エネルギーを[icon-plasma]1枚"));
    }

    #[test]
    fn rarity_placeholder_and_ace_spec() {
        let html = r#"<h1 class="Heading1">マスターボール</h1><div class="RightBox-inner">
            <h2 class="mt20">グッズ</h2><p>x</p><h2>特別なルール</h2><p></p><p>ACE SPEC：デッキに1枚</p></div>"#;
        let card = parse(html).unwrap();
        assert_eq!(card.add_rule.as_deref(), Some("ACE SPEC：デッキに1枚"));
        assert_eq!(card.rarity.as_deref(), Some("ACE"));

        let odd = r#"<h1 class="Heading1">x</h1><div class="RightBox-inner"><img src="/img/ic_rare_zz.gif"></div>"#;
        assert_eq!(parse(odd).unwrap().rarity.as_deref(), Some("[ic_rare_zz.gif]"));
    }
}
