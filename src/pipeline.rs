// src/pipeline.rs
//! Single entry point: document in, canonical record out.
use crate::card::CanonicalCard;
use crate::core::html::Document;
use crate::engine::types::Source;
use crate::error::ParseError;
use crate::sets::{NoSetNames, SetNameResolver};
use crate::specs::{chs::ChsSpec, cht::ChtSpec, jp::JpSpec};

static NO_SET_NAMES: NoSetNames = NoSetNames;

pub struct Pipeline<'a> {
    pub jp: JpSpec,
    pub cht: ChtSpec,
    pub chs: ChsSpec,
    pub sets: &'a dyn SetNameResolver,
}

impl Default for Pipeline<'static> {
    fn default() -> Self {
        Self::with_sets(&NO_SET_NAMES)
    }
}

impl<'a> Pipeline<'a> {
    pub fn with_sets(sets: &'a dyn SetNameResolver) -> Self {
        Self { jp: JpSpec::default(), cht: ChtSpec::default(), chs: ChsSpec::default(), sets }
    }

    /// Deterministic: the same document and id always give the same record.
    pub fn parse(&self, source: Source, document: &str, card_id: &str) -> Result<CanonicalCard, ParseError> {
        match source {
            Source::Jp => self.jp.parse(&Document::parse(document)?.root()),
            Source::Cht => self.cht.parse(&Document::parse(document)?.root()),
            Source::Chs => self.chs.parse(document, card_id, self.sets),
        }
    }
}
