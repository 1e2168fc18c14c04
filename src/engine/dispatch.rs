// src/engine/dispatch.rs
//! Layout recognition by structural fingerprint.
use crate::core::html::Node;
use crate::engine::types::Source;
use crate::error::ParseError;

/// One known page layout: every fingerprint selector must match.
#[derive(Debug)]
pub struct Template<L> {
    pub name: &'static str,
    pub fingerprint: &'static [&'static str],
    pub layout: L,
}

impl<L> Template<L> {
    pub fn matches<N: Node>(&self, root: &N) -> bool {
        self.fingerprint.iter().all(|sel| root.exists(sel))
    }
}

/// Pick the layout for a document. A lone template is taken as is; otherwise the
/// first template (priority order) whose fingerprint matches wins.
pub fn select<'t, N: Node, L>(root: &N, templates: &'t [Template<L>], origin: Source) -> Result<&'t Template<L>, ParseError> {
    if let [only] = templates {
        logd!("{}: single layout `{}`", origin, only.name);
        return Ok(only);
    }
    match templates.iter().find(|t| t.matches(root)) {
        Some(t) => {
            logd!("{}: layout `{}` selected", origin, t.name);
            Ok(t)
        }
        None => {
            logw!("{}: no layout fingerprint matched", origin);
            Err(ParseError::UnrecognizedTemplate { origin })
        }
    }
}
