// src/specs/deck.rs
//! Deck lists: which cards (and how many) a saved deck page or deck payload holds.
use serde_json::Value;

use crate::config::consts::{CHS_ID_SEP, DECK_CODE_MIN_LEN};
use crate::core::html::{Document, Node, strip_text};
use crate::engine::types::Source;
use crate::error::ParseError;
use crate::specs::chs::{ApiResponse, value_string};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeckEntry {
    pub card_id: String,
    /// The API deck payload carries no counts.
    pub quantity: Option<u32>,
}

/// Repeated ids keep their first position; the later quantity wins.
fn push_entry(out: &mut Vec<DeckEntry>, card_id: &str, quantity: Option<u32>) {
    match out.iter_mut().find(|e| e.card_id == card_id) {
        Some(e) => e.quantity = quantity.or(e.quantity),
        None => out.push(DeckEntry { card_id: s!(card_id), quantity }),
    }
}

pub fn read_deck(source: Source, raw: &str) -> Result<Vec<DeckEntry>, ParseError> {
    let entries = match source {
        Source::Jp => jp_deck(&Document::parse(raw)?.root())?,
        Source::Cht => cht_deck(&Document::parse(raw)?.root())?,
        Source::Chs => chs_deck(raw)?,
    };
    if entries.is_empty() {
        logw!("{}: deck lists no cards", source);
    } else {
        logf!("{}: deck lists {} unique cards", source, entries.len());
    }
    Ok(entries)
}

/// Hidden `deck_*` inputs of `form#inputArea`; values are `id_qty-id_qty-…`.
pub fn jp_deck<N: Node>(root: &N) -> Result<Vec<DeckEntry>, ParseError> {
    let form = root.find("form#inputArea").ok_or(ParseError::UnrecognizedTemplate { origin: Source::Jp })?;
    let mut out = Vec::new();
    for input in form.find_all(r#"input[type="hidden"]"#) {
        let (Some(name), Some(value)) = (input.attr("name"), input.attr("value")) else { continue };
        if !name.starts_with("deck_") || value.is_empty() {
            continue;
        }
        for entry in value.split('-') {
            let mut parts = entry.split('_');
            if let (Some(id), Some(qty)) = (parts.next(), parts.next()) {
                if !id.is_empty() {
                    push_entry(&mut out, id, qty.trim().parse().ok());
                }
            }
        }
    }
    Ok(out)
}

/// `.graphicList .card a` links to `/detail/<id>/`, each with a `p.count`.
pub fn cht_deck<N: Node>(root: &N) -> Result<Vec<DeckEntry>, ParseError> {
    let list = root.find(".graphicList").ok_or(ParseError::UnrecognizedTemplate { origin: Source::Cht })?;
    let mut out = Vec::new();
    for link in list.find_all(".card a") {
        let Some(href) = link.attr("href") else { continue };
        let Some(id) = detail_id(&href) else { continue };
        let Some(count) = link.find("p.count") else { continue };
        push_entry(&mut out, &id, strip_text(&count).parse().ok());
    }
    Ok(out)
}

fn detail_id(href: &str) -> Option<String> {
    let rest = &href[href.find("/detail/")? + "/detail/".len()..];
    let (digits, tail) = rest.split_at(rest.find(|c: char| !c.is_ascii_digit())?);
    (!digits.is_empty() && tail.starts_with('/')).then(|| s!(digits))
}

/// `data.cards[]` with `setCode` and `cardIndex`; ids come out as `SET-NUM`.
pub fn chs_deck(raw: &str) -> Result<Vec<DeckEntry>, ParseError> {
    let resp: ApiResponse = serde_json::from_str(raw).map_err(|e| ParseError::malformed(format!("deck payload: {e}")))?;
    if resp.code != Some(200) {
        return Err(ParseError::malformed(format!("deck api: {}", resp.msg.unwrap_or_default())));
    }
    let cards = resp
        .data
        .as_ref()
        .and_then(|d| d.get("cards"))
        .and_then(Value::as_array)
        .ok_or(ParseError::MissingRequiredField { field: "cards" })?;

    let mut out = Vec::new();
    for card in cards {
        let set = card.get("setCode").and_then(value_string);
        let idx = card.get("cardIndex").and_then(value_string);
        match (set, idx) {
            (Some(set), Some(idx)) if !set.is_empty() && !idx.is_empty() => {
                push_entry(&mut out, &format!("{set}{CHS_ID_SEP}{idx}"), None)
            }
            _ => logd!("chs: deck card without setCode/cardIndex skipped"),
        }
    }
    Ok(out)
}

/// How a user referred to a deck.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeckIdentifier {
    Url { deck_id: Option<String> },
    Id(String),
    Code(String),
    Unknown(String),
}

impl DeckIdentifier {
    pub fn classify(raw: &str) -> Self {
        let s = raw.trim();
        if s.starts_with("http") {
            let deck_id = s.find("/decks/").and_then(|i| {
                let digits: String = s[i + "/decks/".len()..].chars().take_while(|c| c.is_ascii_digit()).collect();
                (!digits.is_empty()).then_some(digits)
            });
            return DeckIdentifier::Url { deck_id };
        }
        if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
            return DeckIdentifier::Id(s!(s));
        }
        if s.len() >= DECK_CODE_MIN_LEN && s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return DeckIdentifier::Code(s!(s));
        }
        DeckIdentifier::Unknown(s!(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jp_hidden_inputs() {
        let html = r#"<form id="inputArea">
            <input type="hidden" name="deck_pke" value="46011_2-45939_1">
            <input type="hidden" name="deck_gds" value="46011_3">
            <input type="hidden" name="deckID" value="ignored_9">
        </form>"#;
        let deck = jp_deck(&Document::parse(html).unwrap().root()).unwrap();
        assert_eq!(
            deck,
            vec![
                DeckEntry { card_id: s!("46011"), quantity: Some(3) },
                DeckEntry { card_id: s!("45939"), quantity: Some(1) },
            ]
        );
    }

    #[test]
    fn cht_links_need_count() {
        let html = r#"<div class="graphicList">
            <div class="card"><a href="/tw/card-search/detail/12345/"><p class="count">4</p></a></div>
            <div class="card"><a href="/tw/card-search/detail/777/"></a></div>
            <div class="card"><a href="/tw/other/"><p class="count">1</p></a></div>
        </div>"#;
        let deck = cht_deck(&Document::parse(html).unwrap().root()).unwrap();
        assert_eq!(deck, vec![DeckEntry { card_id: s!("12345"), quantity: Some(4) }]);
    }

    #[test]
    fn chs_cards() {
        let raw = r#"{"code": 200, "data": {"cards": [
            {"setCode": "CSV5C", "cardIndex": "012"}, {"setCode": "CSV6C", "cardIndex": 7}, {"setCode": "X"}]}}"#;
        let ids: Vec<String> = chs_deck(raw).unwrap().into_iter().map(|e| e.card_id).collect();
        assert_eq!(ids, vec!["CSV5C-012", "CSV6C-7"]);
    }

    #[test]
    fn identifiers() {
        assert_eq!(
            DeckIdentifier::classify("https://tcg.mik.moe/decks/123?x=1"),
            DeckIdentifier::Url { deck_id: Some(s!("123")) }
        );
        assert_eq!(DeckIdentifier::classify("9876"), DeckIdentifier::Id(s!("9876")));
        assert_eq!(DeckIdentifier::classify("AbC123xyz789"), DeckIdentifier::Code(s!("AbC123xyz789")));
        assert_eq!(DeckIdentifier::classify("short"), DeckIdentifier::Unknown(s!("short")));
    }
}
