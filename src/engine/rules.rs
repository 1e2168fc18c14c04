// src/engine/rules.rs
//! Derived rule text (`addRule`).
//!
//! Precedence, first match wins:
//! 1. fusion: name carries the localized mega marker, or option `Mega`, and subtype `ex`
//! 2. option `TAG TEAM`
//! 3. two-prize subtypes (`ex`, `V`, `VSTAR`, plus `GX` where the source knows it)
//! 4. `VMAX`
//! 5. radiant prefix on a base-stage creature
//! 6. the verbatim rule block the page exposes, if any
//!
//! How inference and the verbatim block combine is a per-source [`RulePolicy`].

pub const OPTION_MEGA: &str = "Mega";
pub const OPTION_TAG_TEAM: &str = "TAG TEAM";

/// Localized reward texts of one source.
pub struct RuleTexts {
    pub fusion_marker: &'static str,
    pub fusion: &'static str,
    pub tag_team: &'static str,
    /// `{subtype}` is replaced by the card subtype.
    pub two_prize_template: &'static str,
    pub two_prize_subtypes: &'static [&'static str],
    pub vmax: &'static str,
    pub radiant_prefix: &'static str,
    pub radiant: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RulePolicy {
    /// Inferred text only.
    Infer,
    /// A verbatim block overrides inference.
    PreferVerbatim,
    /// Copy the verbatim block; never infer.
    VerbatimOnly,
}

/// What the rule engine looks at.
#[derive(Clone, Copy, Debug, Default)]
pub struct RuleInput<'a> {
    pub name: &'a str,
    pub subtype: Option<&'a str>,
    pub option: Option<&'a str>,
    pub is_creature: bool,
    pub is_base_stage: bool,
    pub verbatim: Option<&'a str>,
}

pub fn infer(input: &RuleInput<'_>, texts: &RuleTexts) -> Option<String> {
    if !input.is_creature {
        return None;
    }
    let subtype = input.subtype.unwrap_or("");
    let option = input.option.unwrap_or("");

    let fusion = input.name.starts_with(texts.fusion_marker) || option == OPTION_MEGA;
    if fusion && subtype == "ex" {
        return Some(s!(texts.fusion));
    }
    if option == OPTION_TAG_TEAM {
        return Some(s!(texts.tag_team));
    }
    if texts.two_prize_subtypes.contains(&subtype) {
        return Some(texts.two_prize_template.replace("{subtype}", subtype));
    }
    if subtype == "VMAX" {
        return Some(s!(texts.vmax));
    }
    if input.is_base_stage && input.name.starts_with(texts.radiant_prefix) {
        return Some(s!(texts.radiant));
    }
    None
}

/// A source without its own texts can only copy the verbatim block.
pub fn resolve(input: &RuleInput<'_>, texts: Option<&RuleTexts>, policy: RulePolicy) -> Option<String> {
    let verbatim = input.verbatim.map(str::trim).filter(|v| !v.is_empty()).map(String::from);
    let inferred = || texts.and_then(|t| infer(input, t));
    match policy {
        RulePolicy::Infer => inferred(),
        RulePolicy::PreferVerbatim => verbatim.or_else(inferred),
        RulePolicy::VerbatimOnly => verbatim,
    }
}

pub static CHS_RULES: RuleTexts = RuleTexts {
    fusion_marker: "超级",
    fusion: "当超级进化宝可梦ex昏厥时，对手将拿取3张奖赏卡。",
    tag_team: "当TAG TEAM昏厥时，对手将拿取3张奖赏卡。",
    two_prize_template: "当宝可梦{subtype}昏厥时，对手将拿取2张奖赏卡。",
    two_prize_subtypes: &["ex", "V", "VSTAR", "GX"],
    vmax: "当宝可梦VMAX昏厥时，对手将拿取3张奖赏卡。",
    radiant_prefix: "光辉",
    radiant: "1副卡组中只能放入1张光辉宝可梦卡。",
};

pub static CHT_RULES: RuleTexts = RuleTexts {
    fusion_marker: "超級",
    fusion: "超級進化寶可夢ex昏厥時，對手獲得3張獎賞卡。",
    tag_team: "TAG TEAM昏厥時，對手獲得3張獎賞卡。",
    two_prize_template: "寶可夢{subtype}昏厥時，對手獲得2張獎賞卡。",
    two_prize_subtypes: &["ex", "V", "VSTAR", "GX"],
    vmax: "寶可夢VMAX昏厥時，對手獲得3張獎賞卡。",
    radiant_prefix: "光輝",
    radiant: "1副牌組中只能放入1張光輝寶可夢卡。",
};

#[cfg(test)]
mod tests {
    use super::*;

    fn creature<'a>(name: &'a str, subtype: Option<&'a str>, option: Option<&'a str>) -> RuleInput<'a> {
        RuleInput { name, subtype, option, is_creature: true, ..RuleInput::default() }
    }

    #[test]
    fn tag_team_beats_two_prize() {
        let input = creature("ピカチュウ&ゼクロムGX", Some("ex"), Some("TAG TEAM"));
        assert_eq!(infer(&input, &CHS_RULES).as_deref(), Some("当TAG TEAM昏厥时，对手将拿取3张奖赏卡。"));
    }

    #[test]
    fn fusion_needs_ex() {
        let mega_ex = creature("超級噴火龍Xex", Some("ex"), None);
        assert_eq!(infer(&mega_ex, &CHT_RULES).as_deref(), Some(CHT_RULES.fusion));
        let mega_plain = creature("超級噴火龍", None, Some("Mega"));
        assert_eq!(infer(&mega_plain, &CHT_RULES), None);
    }

    #[test]
    fn two_prize_template_is_filled() {
        let input = creature("阿尔宙斯VSTAR", Some("VSTAR"), None);
        assert_eq!(infer(&input, &CHS_RULES).as_deref(), Some("当宝可梦VSTAR昏厥时，对手将拿取2张奖赏卡。"));
        let vmax = creature("x", Some("VMAX"), None);
        assert_eq!(infer(&vmax, &CHS_RULES).as_deref(), Some(CHS_RULES.vmax));
    }

    #[test]
    fn radiant_only_on_base_stage() {
        let mut input = creature("光辉喷火龙", None, None);
        assert_eq!(infer(&input, &CHS_RULES), None);
        input.is_base_stage = true;
        assert_eq!(infer(&input, &CHS_RULES).as_deref(), Some(CHS_RULES.radiant));
    }

    #[test]
    fn policies() {
        let mut input = creature("x", Some("ex"), None);
        input.verbatim = Some(" 規則原文 ");
        assert_eq!(resolve(&input, Some(&CHT_RULES), RulePolicy::PreferVerbatim).as_deref(), Some("規則原文"));
        assert_eq!(resolve(&input, Some(&CHT_RULES), RulePolicy::Infer).as_deref(), Some("寶可夢ex昏厥時，對手獲得2張獎賞卡。"));
        input.verbatim = None;
        assert_eq!(resolve(&input, None, RulePolicy::VerbatimOnly), None);
    }

    #[test]
    fn trainers_get_no_inferred_rule() {
        let input = RuleInput { name: "ハイパーボール", subtype: Some("item"), ..RuleInput::default() };
        assert_eq!(infer(&input, &CHS_RULES), None);
    }
}
