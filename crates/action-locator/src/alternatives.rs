//! Heuristic alternative locators
//!
//! Rewrites one primary strategy into syntactic variants that may still match
//! after a page change:
//! 1. CSS class token -> `[class*="X"]` and `//*[contains(@class,"X")]`
//! 2. CSS id token -> id strategy and `//*[@id="X"]`
//! 3. XPath `@id="V"` predicate -> `#V` and id strategy
//! 4. XPath `@class="V"` predicate -> `.V` with spaces turned into `.`
//!
//! Output is unverified. A generated expression is only known to be valid
//! once a driver resolves it.

use locator_core_types::{LocatorKind, LocatorStrategy};
use once_cell::sync::Lazy;
use regex::Regex;

static XPATH_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"@id\s*=\s*(?:"([^"]+)"|'([^']+)')"#).unwrap());
static XPATH_CLASS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"@class\s*=\s*(?:"([^"]+)"|'([^']+)')"#).unwrap());

const CSS_DELIMITERS: [char; 12] = [
    '.', '#', '[', ']', ':', '>', '+', '~', ',', ')', '"', '\'',
];

/// Deterministic generator of alternative strategies.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlternativeGenerator;

impl AlternativeGenerator {
    pub fn new() -> Self {
        Self
    }

    /// `primary` first, then its rewrites, without duplicates.
    pub fn generate(&self, primary: &LocatorStrategy) -> Vec<LocatorStrategy> {
        let mut out = vec![primary.clone()];
        let rewrites = match primary.kind() {
            LocatorKind::Css => css_alternatives(primary.expression()),
            LocatorKind::Xpath => xpath_alternatives(primary.expression()),
            LocatorKind::Id | LocatorKind::Name | LocatorKind::Class | LocatorKind::Tag => {
                Vec::new()
            }
        };
        for strategy in rewrites {
            if !out.contains(&strategy) {
                out.push(strategy);
            }
        }
        out
    }
}

/// Shorthand for [`AlternativeGenerator::generate`].
pub fn generate_alternatives(primary: &LocatorStrategy) -> Vec<LocatorStrategy> {
    AlternativeGenerator.generate(primary)
}

fn css_alternatives(selector: &str) -> Vec<LocatorStrategy> {
    let mut out = Vec::new();
    if let Some(class) = css_token_after(selector, '.') {
        out.push(LocatorStrategy::css(format!("[class*=\"{class}\"]")));
        out.push(LocatorStrategy::xpath(format!(
            "//*[contains(@class,\"{class}\")]"
        )));
    }
    if let Some(id) = css_token_after(selector, '#') {
        out.push(LocatorStrategy::id(id));
        out.push(LocatorStrategy::xpath(format!("//*[@id=\"{id}\"]")));
    }
    out
}

fn xpath_alternatives(xpath: &str) -> Vec<LocatorStrategy> {
    let mut out = Vec::new();
    if let Some(id) = predicate_value(&XPATH_ID_RE, xpath) {
        out.push(LocatorStrategy::css(format!("#{id}")));
        out.push(LocatorStrategy::id(id));
    }
    if let Some(class) = predicate_value(&XPATH_CLASS_RE, xpath) {
        let joined = class.split_whitespace().collect::<Vec<_>>().join(".");
        out.push(LocatorStrategy::css(format!(".{joined}")));
    }
    out
}

/// Token following the first `marker`, up to the next CSS delimiter.
fn css_token_after(selector: &str, marker: char) -> Option<&str> {
    let start = marker_position(selector, marker)? + marker.len_utf8();
    let rest = &selector[start..];
    let end = rest
        .find(|c: char| c.is_whitespace() || CSS_DELIMITERS.contains(&c))
        .unwrap_or(rest.len());
    let token = &rest[..end];
    (!token.is_empty()).then_some(token)
}

/// First `marker` outside attribute brackets and quoted strings.
fn marker_position(selector: &str, marker: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (idx, c) in selector.char_indices() {
        match quote {
            Some(open) => {
                if c == open {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => quote = Some(c),
                '[' => depth += 1,
                ']' => depth = depth.saturating_sub(1),
                _ if c == marker && depth == 0 => return Some(idx),
                _ => {}
            },
        }
    }
    None
}

fn predicate_value<'a>(re: &Regex, xpath: &'a str) -> Option<&'a str> {
    let caps = re.captures(xpath)?;
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str())
}
