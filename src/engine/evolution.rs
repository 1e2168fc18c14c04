// src/engine/evolution.rs
//! Evolution chain reconstruction from flat sibling markup.
//!
//! Pages list the evolution line as sibling nodes, most evolved first. Each node
//! may be flagged as the current card and may carry an arrow meaning "this stage
//! is part of the current card's line". Nodes after the current one are its
//! pre-evolutions; the node right before it is what it evolves into.
use crate::error::ChainError;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvoNode {
    pub names: Vec<String>,
    pub is_current: bool,
    pub has_arrow: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Chain {
    /// Base form first.
    pub evolves_from: Vec<String>,
    pub evolves_to: Vec<String>,
}

fn locate(nodes: &[EvoNode], card_name: &str) -> Result<usize, ChainError> {
    let flagged: Vec<usize> = nodes.iter().enumerate().filter(|(_, n)| n.is_current).map(|(i, _)| i).collect();
    match flagged.len() {
        1 => return Ok(flagged[0]),
        0 => {}
        count => return Err(ChainError::Ambiguous { count }),
    }

    let name = card_name.trim();
    let named: Vec<usize> = nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.names.iter().any(|x| x.trim() == name))
        .map(|(i, _)| i)
        .collect();
    match named.len() {
        1 => Ok(named[0]),
        0 => Err(ChainError::NoCurrent),
        count => Err(ChainError::Ambiguous { count }),
    }
}

/// `forward` also fills `evolves_to` for sources whose markup shows what comes next.
pub fn resolve(nodes: &[EvoNode], card_name: &str, forward: bool) -> Result<Chain, ChainError> {
    if nodes.is_empty() {
        return Ok(Chain::default());
    }
    let cur = locate(nodes, card_name)?;

    let mut evolves_from: Vec<String> = nodes[cur + 1..]
        .iter()
        .filter(|n| n.has_arrow)
        .filter_map(|n| n.names.first().cloned())
        .collect();
    evolves_from.reverse();

    let mut evolves_to = Vec::new();
    if forward && cur > 0 && nodes[cur].has_arrow {
        evolves_to = nodes[cur - 1].names.iter().filter(|n| !n.trim().is_empty()).cloned().collect();
    }

    Ok(Chain { evolves_from, evolves_to })
}
