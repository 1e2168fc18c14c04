// src/core/sanitize.rs

/// Non-breaking spaces (literal or entity) become plain spaces.
pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ").replace('\u{a0}', " ").replace("&amp;", "&")
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Remove every whitespace char, including full-width and nbsp.
pub fn squash_ws(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Delete every occurrence of each pattern, then trim.
pub fn remove_all(s: &str, patterns: &[&str]) -> String {
    let mut out = s.to_string();
    for p in patterns {
        out = out.replace(p, "");
    }
    out.trim().to_string()
}

/// First `N/M` collector fraction, spaces dropped: "SV4a 123 / 190" → "123/190".
pub fn find_fraction(s: &str) -> Option<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if !chars[i].is_ascii_digit() { i += 1; continue; }
        let start = i;
        while i < chars.len() && chars[i].is_ascii_digit() { i += 1; }
        let num: String = chars[start..i].iter().collect();

        let mut j = i;
        while j < chars.len() && chars[j].is_whitespace() { j += 1; }
        if j >= chars.len() || chars[j] != '/' { continue; }
        j += 1;
        while j < chars.len() && chars[j].is_whitespace() { j += 1; }
        let den_start = j;
        while j < chars.len() && chars[j].is_ascii_digit() { j += 1; }
        if j > den_start {
            let den: String = chars[den_start..j].iter().collect();
            return Some(join!(&num, "/", &den));
        }
        i = j;
    }
    None
}

/// Digits following the first of `markers`, skipping whitespace: ("×2", ['×']) → "2".
pub fn digits_after(s: &str, markers: &[char]) -> Option<String> {
    let idx = s.find(|c: char| markers.contains(&c))?;
    let rest = &s[idx..];
    let mut chars = rest.chars();
    chars.next();
    let digits: String = chars
        .skip_while(|c| c.is_whitespace())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() { None } else { Some(digits) }
}

/// Contents of every `open…close` pair, in order.
pub fn bracketed(s: &str, open: char, close: char) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur: Option<String> = None;
    for ch in s.chars() {
        if ch == open && cur.is_none() {
            cur = Some(s!());
        } else if ch == close {
            if let Some(v) = cur.take() {
                if !v.is_empty() { out.push(v); }
            }
        } else if let Some(buf) = cur.as_mut() {
            buf.push(ch);
        }
    }
    out
}

/// Remove any `[ ... ]` bracket tags (e.g. `[特性]`, `[VSTAR力量]`).
/// Greedy within each bracket pair, no nesting.
pub fn strip_brackets(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_bracket = false;
    for ch in s.chars() {
        match ch {
            '[' => in_bracket = true,
            ']' => in_bracket = false,
            _ if !in_bracket => out.push(ch),
            _ => {}
        }
    }
    out.trim().to_string()
}

/// Last path segment of a URL or path, query string dropped.
pub fn basename(src: &str) -> &str {
    let src = src.split(['?', '#']).next().unwrap_or(src);
    src.rsplit('/').next().unwrap_or(src)
}
