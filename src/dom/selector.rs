//! CSS selector parsing and matching.
//!
//! Supports the subset of CSS that tagging configurations use in practice:
//!
//! | Syntax | Meaning |
//! |--------|---------|
//! | `button`, `*` | Tag name (ASCII case-insensitive), universal |
//! | `#main` | `id` attribute |
//! | `.hero` | Class token |
//! | `[role]`, `[role=option]`, `[role="option"]` | Attribute presence / equality |
//! | `[class~=a]`, `[href^=a]`, `[href$=a]`, `[href*=a]` | Token, prefix, suffix, substring |
//! | `nav a`, `ul > li` | Descendant and child combinators |
//! | `a, button` | Selector groups (union) |
//!
//! # Example
//!
//! ```ignore
//! use page_tagger::dom::SelectorList;
//!
//! let list = SelectorList::parse("nav a, button.primary")?;
//! assert_eq!(list.groups().len(), 2);
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::identifiers::NodeId;

use super::document::Document;

// ============================================================================
// AttrCondition
// ============================================================================

/// Attribute condition inside a compound selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrCondition {
    /// `[name]`
    Exists {
        /// Attribute name.
        name: String,
    },
    /// `[name=value]`
    Equals {
        /// Attribute name.
        name: String,
        /// Expected value.
        value: String,
    },
    /// `[name~=value]`
    Includes {
        /// Attribute name.
        name: String,
        /// Whitespace-separated token.
        value: String,
    },
    /// `[name^=value]`
    Prefix {
        /// Attribute name.
        name: String,
        /// Expected prefix.
        value: String,
    },
    /// `[name$=value]`
    Suffix {
        /// Attribute name.
        name: String,
        /// Expected suffix.
        value: String,
    },
    /// `[name*=value]`
    Substring {
        /// Attribute name.
        name: String,
        /// Expected substring.
        value: String,
    },
}

impl AttrCondition {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        match self {
            Self::Exists { name } => doc.has_attribute(node, name),
            Self::Equals { name, value } => doc.attribute(node, name) == Some(value.as_str()),
            Self::Includes { name, value } => doc
                .attribute(node, name)
                .is_some_and(|attr| attr.split_whitespace().any(|token| token == value)),
            Self::Prefix { name, value } => doc
                .attribute(node, name)
                .is_some_and(|attr| !value.is_empty() && attr.starts_with(value.as_str())),
            Self::Suffix { name, value } => doc
                .attribute(node, name)
                .is_some_and(|attr| !value.is_empty() && attr.ends_with(value.as_str())),
            Self::Substring { name, value } => doc
                .attribute(node, name)
                .is_some_and(|attr| !value.is_empty() && attr.contains(value.as_str())),
        }
    }
}

// ============================================================================
// Compound
// ============================================================================

/// A compound selector such as `button.primary[type=submit]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    /// Lowercased tag name, `None` for universal or omitted.
    pub tag: Option<String>,
    /// Required `id`.
    pub id: Option<String>,
    /// Required class tokens.
    pub classes: Vec<String>,
    /// Attribute conditions.
    pub attrs: Vec<AttrCondition>,
}

impl Compound {
    /// Returns `true` if `node` is an element satisfying every condition.
    #[must_use]
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some(tag) = doc.tag_name(node) else {
            return false;
        };

        if let Some(expected) = &self.tag
            && !tag.eq_ignore_ascii_case(expected)
        {
            return false;
        }

        if let Some(id) = &self.id
            && doc.attribute(node, "id") != Some(id.as_str())
        {
            return false;
        }

        if self.classes.iter().any(|class| !doc.has_class(node, class)) {
            return false;
        }

        self.attrs.iter().all(|cond| cond.matches(doc, node))
    }
}

// ============================================================================
// Combinator / Part
// ============================================================================

/// Relation between a compound and the one to its left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace: any ancestor.
    Descendant,
    /// `>`: direct parent.
    Child,
}

/// One compound plus its relation to the previous (left) compound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// The compound selector.
    pub compound: Compound,
    /// `None` for the leftmost part.
    pub combinator: Option<Combinator>,
}

// ============================================================================
// Selector
// ============================================================================

/// A complex selector: compounds joined by combinators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    parts: Vec<Part>,
}

impl Selector {
    /// Returns the parts, leftmost first.
    #[inline]
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Returns `true` if `node` matches this selector.
    #[must_use]
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some((last, rest)) = self.parts.split_last() else {
            return false;
        };
        if !last.compound.matches(doc, node) {
            return false;
        }
        Self::matches_left(doc, node, rest, last.combinator)
    }

    /// Right-to-left match of the remaining parts against ancestors of `node`.
    fn matches_left(
        doc: &Document,
        node: NodeId,
        rest: &[Part],
        combinator: Option<Combinator>,
    ) -> bool {
        let Some((prev, before)) = rest.split_last() else {
            return true;
        };

        match combinator.unwrap_or(Combinator::Descendant) {
            Combinator::Child => doc.parent(node).is_some_and(|parent| {
                prev.compound.matches(doc, parent)
                    && Self::matches_left(doc, parent, before, prev.combinator)
            }),
            Combinator::Descendant => {
                let mut cursor = doc.parent(node);
                while let Some(ancestor) = cursor {
                    if prev.compound.matches(doc, ancestor)
                        && Self::matches_left(doc, ancestor, before, prev.combinator)
                    {
                        return true;
                    }
                    cursor = doc.parent(ancestor);
                }
                false
            }
        }
    }
}

// ============================================================================
// SelectorList
// ============================================================================

/// A comma-separated selector list, matched as a union.
///
/// The default list is empty and matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorList {
    source: String,
    groups: Vec<Selector>,
}

impl SelectorList {
    /// Parses a selector list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`] for empty groups, unbalanced
    /// brackets or quotes, dangling combinators and unsupported syntax.
    pub fn parse(source: &str) -> Result<Self> {
        let groups = split_groups(source)?
            .iter()
            .map(|group| parse_selector(source, group))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            source: source.trim().to_string(),
            groups,
        })
    }

    /// Builds one list out of several selector strings.
    ///
    /// # Errors
    ///
    /// Returns the first parse error encountered.
    pub fn from_selectors<I, S>(selectors: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sources = Vec::new();
        let mut groups = Vec::new();
        for selector in selectors {
            let list = Self::parse(selector.as_ref())?;
            sources.push(list.source);
            groups.extend(list.groups);
        }
        if groups.is_empty() {
            return Err(Error::invalid_selector("", "empty selector list"));
        }
        Ok(Self {
            source: sources.join(", "),
            groups,
        })
    }

    /// Returns the parsed groups.
    #[inline]
    #[must_use]
    pub fn groups(&self) -> &[Selector] {
        &self.groups
    }

    /// Returns the normalized source text.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns `true` if any group matches `node`.
    #[must_use]
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.groups.iter().any(|selector| selector.matches(doc, node))
    }
}

impl FromStr for SelectorList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Splits on top-level commas, honoring brackets and quotes.
fn split_groups(source: &str) -> Result<Vec<String>> {
    let mut groups = Vec::new();
    let mut current = String::new();
    let mut scanner = Scanner::default();

    for ch in source.chars() {
        if ch == ',' && scanner.at_top_level() {
            push_group(source, &mut groups, &current)?;
            current.clear();
            continue;
        }
        scanner.feed(source, ch)?;
        current.push(ch);
    }
    scanner.finish(source)?;
    push_group(source, &mut groups, &current)?;
    Ok(groups)
}

fn push_group(source: &str, groups: &mut Vec<String>, current: &str) -> Result<()> {
    let trimmed = current.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_selector(source, "empty selector group"));
    }
    groups.push(trimmed.to_string());
    Ok(())
}

/// Parses one comma-free group into a [`Selector`].
fn parse_selector(source: &str, group: &str) -> Result<Selector> {
    let mut parts: Vec<Part> = Vec::new();
    let mut pending: Option<Combinator> = None;

    for token in tokenize(source, group)? {
        if token == ">" {
            if pending == Some(Combinator::Child) || parts.is_empty() {
                return Err(Error::invalid_selector(source, "misplaced '>'"));
            }
            pending = Some(Combinator::Child);
            continue;
        }

        let compound = parse_compound(source, &token)?;
        let combinator = if parts.is_empty() {
            None
        } else {
            Some(pending.take().unwrap_or(Combinator::Descendant))
        };
        parts.push(Part {
            compound,
            combinator,
        });
    }

    if parts.is_empty() || pending.is_some() {
        return Err(Error::invalid_selector(source, "dangling combinator"));
    }
    Ok(Selector { parts })
}

/// Splits a group into compound tokens and `>` markers.
fn tokenize(source: &str, group: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut scanner = Scanner::default();

    for ch in group.chars() {
        if scanner.at_top_level() && (ch == '>' || ch.is_whitespace()) {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            if ch == '>' {
                tokens.push(">".to_string());
            }
            continue;
        }
        scanner.feed(source, ch)?;
        current.push(ch);
    }
    scanner.finish(source)?;
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Parses a compound such as `a.nav-link[href^=http]`.
fn parse_compound(source: &str, token: &str) -> Result<Compound> {
    let mut compound = Compound::default();
    let mut universal = false;
    let chars: Vec<char> = token.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => {
                if universal || compound.tag.is_some() || i != 0 {
                    return Err(Error::invalid_selector(source, "misplaced '*'"));
                }
                universal = true;
                i += 1;
            }
            '#' => {
                let (ident, next) = read_ident(&chars, i + 1);
                if ident.is_empty() || compound.id.is_some() {
                    return Err(Error::invalid_selector(source, "bad id selector"));
                }
                compound.id = Some(ident);
                i = next;
            }
            '.' => {
                let (ident, next) = read_ident(&chars, i + 1);
                if ident.is_empty() {
                    return Err(Error::invalid_selector(source, "bad class selector"));
                }
                compound.classes.push(ident);
                i = next;
            }
            '[' => {
                let close = chars[i..]
                    .iter()
                    .scan(None::<char>, |quote, &ch| {
                        let done = quote.is_none() && ch == ']';
                        match (*quote, ch) {
                            (None, '"' | '\'') => *quote = Some(ch),
                            (Some(q), c) if q == c => *quote = None,
                            _ => {}
                        }
                        Some(done)
                    })
                    .position(|done| done)
                    .map(|offset| i + offset)
                    .ok_or_else(|| Error::invalid_selector(source, "unclosed attribute"))?;
                let body: String = chars[i + 1..close].iter().collect();
                compound.attrs.push(parse_attr(source, &body)?);
                i = close + 1;
            }
            _ => {
                if i != 0 {
                    return Err(Error::invalid_selector(
                        source,
                        format!("unexpected '{}'", chars[i]),
                    ));
                }
                let (ident, next) = read_ident(&chars, i);
                if ident.is_empty() {
                    return Err(Error::invalid_selector(
                        source,
                        format!("unexpected '{}'", chars[i]),
                    ));
                }
                compound.tag = Some(ident.to_ascii_lowercase());
                i = next;
            }
        }
    }

    Ok(compound)
}

/// Parses the inside of `[...]`.
fn parse_attr(source: &str, body: &str) -> Result<AttrCondition> {
    let body = body.trim();
    let Some(eq) = body.find('=') else {
        if body.is_empty() || !body.chars().all(is_ident_char) {
            return Err(Error::invalid_selector(source, "bad attribute name"));
        }
        return Ok(AttrCondition::Exists {
            name: body.to_ascii_lowercase(),
        });
    };

    let (lhs, rhs) = body.split_at(eq);
    let rhs = rhs[1..].trim();
    let (name, op) = match lhs.trim_end().char_indices().last() {
        Some((idx, op @ ('~' | '^' | '$' | '*'))) => (&lhs[..idx], Some(op)),
        _ => (lhs, None),
    };
    let name = name.trim().to_ascii_lowercase();
    if name.is_empty() || !name.chars().all(is_ident_char) {
        return Err(Error::invalid_selector(source, "bad attribute name"));
    }

    let value = unquote(rhs)
        .ok_or_else(|| Error::invalid_selector(source, "bad attribute value"))?
        .to_string();

    Ok(match op {
        None => AttrCondition::Equals { name, value },
        Some('~') => AttrCondition::Includes { name, value },
        Some('^') => AttrCondition::Prefix { name, value },
        Some('$') => AttrCondition::Suffix { name, value },
        _ => AttrCondition::Substring { name, value },
    })
}

fn unquote(raw: &str) -> Option<&str> {
    let bytes = raw.as_bytes();
    match bytes.first() {
        Some(b'"' | b'\'') => {
            if raw.len() >= 2 && bytes[raw.len() - 1] == bytes[0] {
                Some(&raw[1..raw.len() - 1])
            } else {
                None
            }
        }
        _ if !raw.is_empty() && raw.chars().all(is_ident_char) => Some(raw),
        _ => None,
    }
}

fn read_ident(chars: &[char], start: usize) -> (String, usize) {
    let mut end = start;
    while end < chars.len() && is_ident_char(chars[end]) {
        end += 1;
    }
    (chars[start..end].iter().collect(), end)
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '-' || ch == '_'
}

// ============================================================================
// Scanner
// ============================================================================

/// Tracks bracket and quote nesting while splitting selector text.
#[derive(Debug, Default)]
struct Scanner {
    bracket_depth: usize,
    quote: Option<char>,
}

impl Scanner {
    fn at_top_level(&self) -> bool {
        self.bracket_depth == 0 && self.quote.is_none()
    }

    fn feed(&mut self, source: &str, ch: char) -> Result<()> {
        if let Some(quote) = self.quote {
            if ch == quote {
                self.quote = None;
            }
            return Ok(());
        }
        match ch {
            '"' | '\'' if self.bracket_depth > 0 => self.quote = Some(ch),
            '[' => self.bracket_depth += 1,
            ']' => {
                if self.bracket_depth == 0 {
                    return Err(Error::invalid_selector(source, "unbalanced ']'"));
                }
                self.bracket_depth -= 1;
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(&self, source: &str) -> Result<()> {
        if self.quote.is_some() {
            return Err(Error::invalid_selector(source, "unterminated string"));
        }
        if self.bracket_depth != 0 {
            return Err(Error::invalid_selector(source, "unclosed attribute"));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let nav = doc.append_element(body, "nav", &[("id", "top")]).unwrap();
        let list = doc
            .append_element(nav, "ul", &[("role", "presentation")])
            .unwrap();
        let item = doc.append_element(list, "li", &[]).unwrap();
        let link = doc
            .append_element(
                item,
                "A",
                &[("class", "nav-link active"), ("href", "https://x.test/a")],
            )
            .unwrap();
        let button = doc
            .append_element(body, "button", &[("type", "submit")])
            .unwrap();
        (doc, nav, link, button)
    }

    #[test]
    fn test_parse_groups() {
        let list = SelectorList::parse("a, button , span").unwrap();
        assert_eq!(list.groups().len(), 3);
        assert_eq!(list.as_str(), "a, button , span");
    }

    #[test]
    fn test_parse_compound_parts() {
        let list = SelectorList::parse("a.nav-link#x[href^='https']").unwrap();
        let compound = &list.groups()[0].parts()[0].compound;
        assert_eq!(compound.tag.as_deref(), Some("a"));
        assert_eq!(compound.id.as_deref(), Some("x"));
        assert_eq!(compound.classes, vec!["nav-link".to_string()]);
        assert_eq!(
            compound.attrs,
            vec![AttrCondition::Prefix {
                name: "href".into(),
                value: "https".into()
            }]
        );
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "a,", ",a", "a[", "a > ", "> a", "a >> b", "a[x='y]", "a..b", "a!"] {
            assert!(SelectorList::parse(bad).is_err(), "expected error for {bad:?}");
        }
    }

    #[test]
    fn test_tag_match_is_case_insensitive() {
        let (doc, _, link, _) = page();
        assert!(SelectorList::parse("a").unwrap().matches(&doc, link));
        assert!(SelectorList::parse("A").unwrap().matches(&doc, link));
    }

    #[test]
    fn test_class_and_attribute_match() {
        let (doc, _, link, button) = page();
        assert!(SelectorList::parse(".active").unwrap().matches(&doc, link));
        assert!(!SelectorList::parse(".act").unwrap().matches(&doc, link));
        assert!(SelectorList::parse("[class*=act]").unwrap().matches(&doc, link));
        assert!(SelectorList::parse("[class~=active]").unwrap().matches(&doc, link));
        assert!(SelectorList::parse("[href$='/a']").unwrap().matches(&doc, link));
        assert!(SelectorList::parse("button[type=submit]").unwrap().matches(&doc, button));
        assert!(!SelectorList::parse("button[type=reset]").unwrap().matches(&doc, button));
    }

    #[test]
    fn test_combinators() {
        let (doc, _, link, button) = page();
        assert!(SelectorList::parse("nav a").unwrap().matches(&doc, link));
        assert!(SelectorList::parse("#top a").unwrap().matches(&doc, link));
        assert!(SelectorList::parse("ul[role=presentation] > li > a").unwrap().matches(&doc, link));
        assert!(!SelectorList::parse("nav > a").unwrap().matches(&doc, link));
        assert!(!SelectorList::parse("nav button").unwrap().matches(&doc, button));
    }

    #[test]
    fn test_union_matching() {
        let (doc, nav, link, button) = page();
        let list = SelectorList::from_selectors(["a", "button"]).unwrap();
        assert!(list.matches(&doc, link));
        assert!(list.matches(&doc, button));
        assert!(!list.matches(&doc, nav));
    }

    #[test]
    fn test_non_element_never_matches() {
        let (mut doc, _, link, _) = page();
        let text = doc.append_text(link, "Home").unwrap();
        assert!(!SelectorList::parse("*").unwrap().matches(&doc, text));
    }

    #[test]
    fn test_from_selectors_rejects_empty() {
        let empty: [&str; 0] = [];
        assert!(SelectorList::from_selectors(empty).is_err());
    }
}
