// src/core/html.rs
//! Structural query capability over parsed HTML.
//!
//! Extractors are written against the [`Node`] trait only. [`Document`] /
//! [`DomNode`] implement it on top of `scraper`; tests may plug in anything else
//! that can answer the same queries.
use scraper::{ElementRef, Html, Selector};

use crate::core::sanitize::normalize_ws;
use crate::error::ParseError;

/// Direct child of an element: a text run or another element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Content<N> {
    Text(String),
    Element(N),
}

pub trait Node: Copy + Sized {
    /// First descendant matching a CSS selector.
    fn find(&self, selector: &str) -> Option<Self>;
    /// All descendants matching a CSS selector, document order.
    fn find_all(&self, selector: &str) -> Vec<Self>;
    /// Every descendant text run, document order, untrimmed.
    fn texts(&self) -> Vec<String>;
    fn attr(&self, name: &str) -> Option<String>;
    fn tag(&self) -> String;
    fn classes(&self) -> Vec<String>;
    fn contents(&self) -> Vec<Content<Self>>;
    fn parent(&self) -> Option<Self>;
    /// Element siblings after this one, document order.
    fn next_elements(&self) -> Vec<Self>;

    fn text(&self) -> String {
        self.texts().concat()
    }

    fn is(&self, tag: &str) -> bool {
        self.tag().eq_ignore_ascii_case(tag)
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes().iter().any(|c| c == class)
    }

    fn children(&self) -> Vec<Self> {
        self.contents()
            .into_iter()
            .filter_map(|c| match c {
                Content::Element(n) => Some(n),
                Content::Text(_) => None,
            })
            .collect()
    }

    /// Parent first, root last.
    fn ancestors(&self) -> Vec<Self> {
        let mut out = Vec::new();
        let mut cur = self.parent();
        while let Some(p) = cur {
            out.push(p);
            cur = p.parent();
        }
        out
    }

    fn exists(&self, selector: &str) -> bool {
        self.find(selector).is_some()
    }

    /// First descendant matching `selector` whose stripped text equals `text`.
    fn find_with_text(&self, selector: &str, text: &str) -> Option<Self> {
        self.find_all(selector).into_iter().find(|n| strip_text(n) == text)
    }

    /// Next element sibling with the given tag.
    fn next_sibling_tag(&self, tag: &str) -> Option<Self> {
        self.next_elements().into_iter().find(|n| n.is(tag))
    }
}

/// Trimmed text runs glued together (no separator).
pub fn strip_text<N: Node>(node: &N) -> String {
    node.texts().iter().map(|t| t.trim()).collect()
}

/// Text runs joined by a single space, whitespace collapsed.
pub fn spaced_text<N: Node>(node: &N) -> String {
    let texts = node.texts();
    let parts: Vec<&str> = texts.iter().map(|t| t.trim()).filter(|t| !t.is_empty()).collect();
    normalize_ws(&parts.join(" "))
}

/* ---------- scraper backend ---------- */

pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        if raw.trim().is_empty() {
            return Err(ParseError::malformed("empty document"));
        }
        Ok(Self { html: Html::parse_document(raw) })
    }

    pub fn root(&self) -> DomNode<'_> {
        DomNode(self.html.root_element())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct DomNode<'a>(ElementRef<'a>);

fn selector(sel: &str) -> Option<Selector> {
    match Selector::parse(sel) {
        Ok(s) => Some(s),
        Err(e) => {
            logd!("Invalid selector `{}`: {:?}", sel, e);
            None
        }
    }
}

impl<'a> Node for DomNode<'a> {
    fn find(&self, sel: &str) -> Option<Self> {
        let sel = selector(sel)?;
        self.0.select(&sel).next().map(DomNode)
    }

    fn find_all(&self, sel: &str) -> Vec<Self> {
        match selector(sel) {
            Some(sel) => self.0.select(&sel).map(DomNode).collect(),
            None => Vec::new(),
        }
    }

    fn texts(&self) -> Vec<String> {
        self.0.text().map(String::from).collect()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.0.value().attr(name).map(String::from)
    }

    fn tag(&self) -> String {
        s!(self.0.value().name())
    }

    fn classes(&self) -> Vec<String> {
        self.0.value().classes().map(String::from).collect()
    }

    fn contents(&self) -> Vec<Content<Self>> {
        self.0
            .children()
            .filter_map(|child| match child.value() {
                scraper::Node::Text(t) => Some(Content::Text(s!(&**t))),
                scraper::Node::Element(_) => ElementRef::wrap(child).map(|e| Content::Element(DomNode(e))),
                _ => None,
            })
            .collect()
    }

    fn parent(&self) -> Option<Self> {
        self.0.parent().and_then(ElementRef::wrap).map(DomNode)
    }

    fn next_elements(&self) -> Vec<Self> {
        self.0.next_siblings().filter_map(ElementRef::wrap).map(DomNode).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <div class="box main"><h2>特性</h2><p> a <b>b</b>  c </p><h4>x</h4></div>
        <ul><li class="step"><a>A</a><ul><li class="active"><a>B</a></li></ul></li></ul>
    </body></html>"#;

    #[test]
    fn blank_document_is_malformed() {
        assert!(matches!(Document::parse("  \n"), Err(ParseError::MalformedInput { .. })));
    }

    #[test]
    fn text_helpers() {
        let doc = Document::parse(PAGE).unwrap();
        let p = doc.root().find("div.box p").unwrap();
        assert_eq!(strip_text(&p), "abc");
        assert_eq!(spaced_text(&p), "a b c");
        assert_eq!(p.contents().len(), 3);
    }

    #[test]
    fn navigation() {
        let doc = Document::parse(PAGE).unwrap();
        let root = doc.root();
        let div = root.find("div.box").unwrap();
        assert!(div.has_class("main"));
        let h2 = div.find_with_text("h2", "特性").unwrap();
        assert!(h2.next_sibling_tag("h4").is_some());
        let active = root.find("li.active").unwrap();
        let uls = active.ancestors().into_iter().filter(|n| n.is("ul")).count();
        assert_eq!(uls, 2);
    }

    #[test]
    fn bad_selector_finds_nothing() {
        let doc = Document::parse(PAGE).unwrap();
        assert!(doc.root().find("div[").is_none());
        assert!(doc.root().find_all("::").is_empty());
    }
}
