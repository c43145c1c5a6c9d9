//! Heuristic element classification.
//!
//! Every function here reads the document and nothing else, so results
//! only change when the document does.
//!
//! | Role | Function | Fallback |
//! |------|----------|----------|
//! | type | [`infer_type`] | lowercase tag, else `unknown` |
//! | action | [`infer_action`] | `<tag>-element` |
//! | context | [`infer_context`] | `main-content` |
//! | value | [`infer_value`] | none |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::dom::Document;
use crate::error::Result;
use crate::identifiers::NodeId;

// ============================================================================
// Constants
// ============================================================================

/// Share of the page height that counts as "top" for hero and header.
const TOP_QUARTILE: f64 = 0.25;

/// Share of the page height past which an element counts as "bottom".
const BOTTOM_QUARTILE: f64 = 0.75;

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Class substrings checked per ancestor, in priority order.
const CLASS_CONTEXTS: [(&str, PageContext); 5] = [
    ("footer", PageContext::Footer),
    ("hero", PageContext::Hero),
    ("header", PageContext::Header),
    ("sidebar", PageContext::Sidebar),
    ("nav", PageContext::Navigation),
];

static NUMERIC: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").ok());

// ============================================================================
// ElementType
// ============================================================================

/// Semantic element type written to the type attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// `input[type=checkbox]`
    Checkbox,
    /// `input[type=radio]`
    RadioButton,
    /// `input[type=text]`
    TextInput,
    /// Numeric input or quantity widget.
    Stepper,
    /// Range input or `role=slider`.
    Slider,
    /// `input[type=file]`
    FileUpload,
    /// Any other input.
    Input,
    /// `select`
    Dropdown,
    /// `textarea`
    Textarea,
    /// `role=switch`
    Switch,
    /// Toggle widget.
    Toggle,
    /// `a`
    Link,
    /// `button`
    Button,
    /// `span`
    Span,
    /// Lowercase tag name of anything else.
    Other(String),
}

impl ElementType {
    /// Returns the attribute value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Checkbox => "checkbox",
            Self::RadioButton => "radio-button",
            Self::TextInput => "text-input",
            Self::Stepper => "stepper",
            Self::Slider => "slider",
            Self::FileUpload => "file-upload",
            Self::Input => "input",
            Self::Dropdown => "dropdown",
            Self::Textarea => "textarea",
            Self::Switch => "switch",
            Self::Toggle => "toggle",
            Self::Link => "link",
            Self::Button => "button",
            Self::Span => "span",
            Self::Other(tag) => tag,
        }
    }

    fn from_input_type(input_type: Option<&str>) -> Self {
        match input_type {
            Some("checkbox") => Self::Checkbox,
            Some("radio") => Self::RadioButton,
            Some("text") => Self::TextInput,
            Some("number") => Self::Stepper,
            Some("range") => Self::Slider,
            Some("file") => Self::FileUpload,
            _ => Self::Input,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// PageContext
// ============================================================================

/// Page region written to the context attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PageContext {
    /// `header`
    Header,
    /// `footer`
    Footer,
    /// `navigation`
    Navigation,
    /// `sidebar`
    Sidebar,
    /// `hero`
    Hero,
    /// Slug of the nearest section heading.
    Heading(String),
    /// `main-content`
    MainContent,
}

impl PageContext {
    /// Returns the attribute value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Header => "header",
            Self::Footer => "footer",
            Self::Navigation => "navigation",
            Self::Sidebar => "sidebar",
            Self::Hero => "hero",
            Self::Heading(slug) => slug,
            Self::MainContent => "main-content",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "header" => Some(Self::Header),
            "footer" => Some(Self::Footer),
            "nav" => Some(Self::Navigation),
            "aside" => Some(Self::Sidebar),
            _ => None,
        }
    }
}

impl fmt::Display for PageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Classification
// ============================================================================

/// All four inferred roles of one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Semantic type.
    pub element_type: ElementType,
    /// Action label.
    pub action: String,
    /// Page region.
    pub context: PageContext,
    /// Numeric value, if applicable.
    pub value: Option<String>,
}

/// Runs all four inferences.
#[must_use]
pub fn classify(doc: &Document, node: NodeId) -> Classification {
    Classification {
        element_type: infer_type(doc, node),
        action: infer_action(doc, node),
        context: infer_context(doc, node),
        value: infer_value(doc, node),
    }
}

// ============================================================================
// Type
// ============================================================================

/// Infers the semantic type. First matching rule wins.
#[must_use]
pub fn infer_type(doc: &Document, node: NodeId) -> ElementType {
    try_infer_type(doc, node).unwrap_or_else(|e| {
        warn!(node = %node, error = %e, "Type inference failed, using tag name");
        doc.tag_name(node)
            .map_or_else(|| ElementType::Other("unknown".into()), |tag| ElementType::Other(tag.into()))
    })
}

fn try_infer_type(doc: &Document, node: NodeId) -> Result<ElementType> {
    let element = doc.element(node)?;
    let tag = element.tag_name();

    if tag == "input" {
        let input_type = element
            .attribute("type")
            .map(|t| t.trim().to_ascii_lowercase());
        return Ok(ElementType::from_input_type(input_type.as_deref()));
    }

    match tag {
        "select" => return Ok(ElementType::Dropdown),
        "textarea" => return Ok(ElementType::Textarea),
        _ => {}
    }

    match element.attribute("role").map(str::trim) {
        Some("switch") => return Ok(ElementType::Switch),
        Some("slider") => return Ok(ElementType::Slider),
        _ => {}
    }

    let classes = doc.class_name(node).to_lowercase();
    if classes.contains("quantity") {
        return Ok(ElementType::Stepper);
    }
    if classes.contains("toggle") {
        return Ok(ElementType::Toggle);
    }

    Ok(match tag {
        "a" => ElementType::Link,
        "button" => ElementType::Button,
        "span" => ElementType::Span,
        other => ElementType::Other(other.to_string()),
    })
}

// ============================================================================
// Action
// ============================================================================

/// Infers the user-facing action label. First non-empty source wins.
#[must_use]
pub fn infer_action(doc: &Document, node: NodeId) -> String {
    try_infer_action(doc, node).unwrap_or_else(|e| {
        warn!(node = %node, error = %e, "Action inference failed, using fallback");
        fallback_action(doc.tag_name(node).unwrap_or("unknown"))
    })
}

fn try_infer_action(doc: &Document, node: NodeId) -> Result<String> {
    let element = doc.element(node)?;
    let tag = element.tag_name();

    if tag == "select"
        && let Some(text) = selected_option_text(doc, node)
    {
        return Ok(text);
    }

    if let Some(label) = non_empty(element.attribute("aria-label")) {
        return Ok(label.to_string());
    }

    let text = doc.text_content(node);
    if let Some(text) = non_empty(Some(&text)) {
        return Ok(text.to_string());
    }

    if let Some(title) = non_empty(element.attribute("title")) {
        return Ok(title.to_string());
    }

    Ok(fallback_action(tag))
}

/// Trimmed text of a select's current option, if non-empty.
pub(crate) fn selected_option_text(doc: &Document, select: NodeId) -> Option<String> {
    let option = doc.selected_option(select)?;
    let text = doc.option_text(option);
    non_empty(Some(&text)).map(String::from)
}

fn fallback_action(tag: &str) -> String {
    format!("{}-element", tag.to_lowercase())
}

// ============================================================================
// Context
// ============================================================================

/// Infers the page region from the element and its ancestors.
#[must_use]
pub fn infer_context(doc: &Document, node: NodeId) -> PageContext {
    try_infer_context(doc, node).unwrap_or_else(|e| {
        warn!(node = %node, error = %e, "Context inference failed, using main-content");
        PageContext::MainContent
    })
}

fn try_infer_context(doc: &Document, node: NodeId) -> Result<PageContext> {
    doc.element(node)?;

    let Some(signal) = nearest_region(doc, node) else {
        return Ok(PageContext::MainContent);
    };

    match signal {
        PageContext::Hero | PageContext::Header | PageContext::Footer => {
            refine_by_position(doc, node, signal)
        }
        other => Ok(other),
    }
}

/// Walks from `node` up to (not including) `body`; first signal wins.
fn nearest_region(doc: &Document, node: NodeId) -> Option<PageContext> {
    let body = doc.body();
    let mut cursor = Some(node);

    while let Some(current) = cursor {
        if current == body {
            break;
        }
        if let Some(tag) = doc.tag_name(current)
            && let Some(context) = region_signal(doc, current, tag)
        {
            return Some(context);
        }
        cursor = doc.parent(current);
    }
    None
}

fn region_signal(doc: &Document, node: NodeId, tag: &str) -> Option<PageContext> {
    if let Some(context) = PageContext::from_tag(tag) {
        return Some(context);
    }

    let classes = doc.class_name(node).to_lowercase();
    if let Some((_, context)) = CLASS_CONTEXTS
        .iter()
        .find(|(needle, _)| classes.contains(needle))
    {
        return Some(context.clone());
    }

    let heading = doc.first_descendant_matching(node, |doc, id| {
        doc.tag_name(id).is_some_and(|tag| HEADING_TAGS.contains(&tag))
    })?;
    let slug = heading_slug(&doc.text_content(heading));
    (!slug.is_empty()).then_some(PageContext::Heading(slug))
}

/// `"  Featured   Deals "` becomes `"featured-deals"`.
fn heading_slug(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Keeps hero/header only in the top quartile and footer only in the
/// bottom quartile of the page.
fn refine_by_position(doc: &Document, node: NodeId, signal: PageContext) -> Result<PageContext> {
    let rect = doc.bounding_client_rect(node)?;
    let scroll = doc.scroll_y();
    let page_height = doc.scroll_height();
    let top = rect.top + scroll;
    let bottom = rect.bottom + scroll;

    let honored = match signal {
        PageContext::Footer => bottom >= page_height * BOTTOM_QUARTILE,
        _ => top <= page_height * TOP_QUARTILE,
    };

    Ok(if honored { signal } else { PageContext::MainContent })
}

// ============================================================================
// Value
// ============================================================================

/// Infers a numeric value, `None` when not applicable.
#[must_use]
pub fn infer_value(doc: &Document, node: NodeId) -> Option<String> {
    try_infer_value(doc, node).unwrap_or_else(|e| {
        warn!(node = %node, error = %e, "Value inference failed");
        None
    })
}

fn try_infer_value(doc: &Document, node: NodeId) -> Result<Option<String>> {
    let element = doc.element(node)?;
    let tag = element.tag_name();

    if tag == "input" {
        let is_number = element
            .attribute("type")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("number"));
        if !is_number {
            return Ok(None);
        }
        return Ok(numeric(&doc.input_value(node)));
    }

    if tag == "select" {
        let options_numeric = doc.options(node).into_iter().all(|option| {
            let value = doc.option_value(option);
            value.trim().is_empty() || is_numeric(&value)
        });
        if !options_numeric {
            return Ok(None);
        }
        return Ok(doc.select_value(node).and_then(|value| numeric(&value)));
    }

    if tag == "li" {
        let in_presentation_list = doc.parent(node).is_some_and(|parent| {
            doc.tag_name(parent) == Some("ul")
                && doc.attribute(parent, "role").map(str::trim) == Some("presentation")
        });
        if in_presentation_list && is_selected(doc, node) {
            return Ok(element.attribute("data-value").and_then(numeric));
        }
        return Ok(None);
    }

    if matches!(tag, "div" | "span")
        && element.attribute("role").map(str::trim) == Some("option")
        && is_selected(doc, node)
    {
        return Ok(numeric(&doc.text_content(node)));
    }

    Ok(None)
}

/// `aria-selected="true"` or a `selected`/`active` class token.
fn is_selected(doc: &Document, node: NodeId) -> bool {
    doc.attribute(node, "aria-selected").map(str::trim) == Some("true")
        || doc.has_class(node, "selected")
        || doc.has_class(node, "active")
}

// ============================================================================
// Helpers
// ============================================================================

/// Returns `true` if `text` is a decimal number after trimming.
#[must_use]
pub fn is_numeric(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty()
        && NUMERIC
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(trimmed))
}

fn numeric(text: &str) -> Option<String> {
    is_numeric(text).then(|| text.trim().to_string())
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn doc_with(tag: &str, attrs: &[(&str, &str)]) -> (Document, NodeId) {
        let mut doc = Document::new();
        let node = doc.append_element(doc.body(), tag, attrs).unwrap();
        (doc, node)
    }

    fn select_with(values: &[&str], selected: usize) -> (Document, NodeId) {
        let mut doc = Document::new();
        let select = doc.append_element(doc.body(), "select", &[]).unwrap();
        for value in values {
            let option = doc.append_element(select, "option", &[("value", value)]).unwrap();
            doc.append_text(option, &format!("Option {value}")).unwrap();
        }
        doc.select_option(select, selected).unwrap();
        (doc, select)
    }

    // ------------------------------------------------------------------------
    // Type
    // ------------------------------------------------------------------------

    #[test]
    fn test_input_type_table() {
        let table = [
            ("checkbox", "checkbox"),
            ("radio", "radio-button"),
            ("text", "text-input"),
            ("number", "stepper"),
            ("range", "slider"),
            ("file", "file-upload"),
            ("email", "input"),
            ("CHECKBOX", "checkbox"),
        ];
        for (input_type, expected) in table {
            let (doc, node) = doc_with("input", &[("type", input_type)]);
            assert_eq!(infer_type(&doc, node).as_str(), expected, "type={input_type}");
        }

        let (doc, node) = doc_with("input", &[]);
        assert_eq!(infer_type(&doc, node), ElementType::Input);
    }

    #[test]
    fn test_type_rule_order() {
        let (doc, node) = doc_with("select", &[("class", "toggle")]);
        assert_eq!(infer_type(&doc, node), ElementType::Dropdown);

        let (doc, node) = doc_with("textarea", &[]);
        assert_eq!(infer_type(&doc, node), ElementType::Textarea);

        let (doc, node) = doc_with("div", &[("role", "switch"), ("class", "toggle")]);
        assert_eq!(infer_type(&doc, node), ElementType::Switch);

        let (doc, node) = doc_with("div", &[("role", "slider")]);
        assert_eq!(infer_type(&doc, node), ElementType::Slider);

        let (doc, node) = doc_with("button", &[("class", "Product-Quantity")]);
        assert_eq!(infer_type(&doc, node), ElementType::Stepper);

        let (doc, node) = doc_with("a", &[("class", "menu-toggle")]);
        assert_eq!(infer_type(&doc, node), ElementType::Toggle);
    }

    #[test]
    fn test_type_by_tag_and_fallback() {
        let (doc, node) = doc_with("a", &[]);
        assert_eq!(infer_type(&doc, node), ElementType::Link);
        let (doc, node) = doc_with("button", &[]);
        assert_eq!(infer_type(&doc, node), ElementType::Button);
        let (doc, node) = doc_with("span", &[]);
        assert_eq!(infer_type(&doc, node), ElementType::Span);
        let (doc, node) = doc_with("LI", &[]);
        assert_eq!(infer_type(&doc, node).as_str(), "li");
    }

    #[test]
    fn test_type_fallback_for_non_elements() {
        let mut doc = Document::new();
        let text = doc.append_text(doc.body(), "hi").unwrap();
        assert_eq!(infer_type(&doc, text).as_str(), "unknown");
        assert_eq!(infer_type(&doc, NodeId::new(999)).as_str(), "unknown");
    }

    // ------------------------------------------------------------------------
    // Action
    // ------------------------------------------------------------------------

    #[test]
    fn test_action_priority() {
        let (mut doc, node) = doc_with("button", &[("aria-label", "  Close  "), ("title", "t")]);
        doc.append_text(node, "X").unwrap();
        assert_eq!(infer_action(&doc, node), "Close");

        let (mut doc, node) = doc_with("button", &[("aria-label", "   "), ("title", "t")]);
        doc.append_text(node, "  Add to cart ").unwrap();
        assert_eq!(infer_action(&doc, node), "Add to cart");

        let (doc, node) = doc_with("a", &[("title", " Home ")]);
        assert_eq!(infer_action(&doc, node), "Home");

        let (doc, node) = doc_with("SPAN", &[]);
        assert_eq!(infer_action(&doc, node), "span-element");
    }

    #[test]
    fn test_action_from_selected_option() {
        let (doc, select) = select_with(&["1", "2"], 1);
        assert_eq!(infer_action(&doc, select), "Option 2");
    }

    #[test]
    fn test_action_fallback_for_missing_node() {
        let doc = Document::new();
        assert_eq!(infer_action(&doc, NodeId::new(42)), "unknown-element");
    }

    // ------------------------------------------------------------------------
    // Context
    // ------------------------------------------------------------------------

    #[test]
    fn test_context_tags_win_over_classes() {
        let mut doc = Document::new();
        let nav = doc
            .append_element(doc.body(), "nav", &[("class", "footer")])
            .unwrap();
        let link = doc.append_element(nav, "a", &[]).unwrap();
        assert_eq!(infer_context(&doc, link), PageContext::Navigation);

        let aside = doc.append_element(doc.body(), "aside", &[]).unwrap();
        let button = doc.append_element(aside, "button", &[]).unwrap();
        assert_eq!(infer_context(&doc, button), PageContext::Sidebar);
    }

    #[test]
    fn test_context_class_order() {
        let mut doc = Document::new();
        let div = doc
            .append_element(doc.body(), "div", &[("class", "site-nav sidebar")])
            .unwrap();
        let link = doc.append_element(div, "a", &[]).unwrap();
        assert_eq!(infer_context(&doc, link), PageContext::Sidebar);
    }

    #[test]
    fn test_context_nearest_ancestor_wins() {
        let mut doc = Document::new();
        let aside = doc.append_element(doc.body(), "aside", &[]).unwrap();
        let nav = doc.append_element(aside, "div", &[("class", "subnav")]).unwrap();
        let link = doc.append_element(nav, "a", &[]).unwrap();
        assert_eq!(infer_context(&doc, link), PageContext::Navigation);
    }

    #[test]
    fn test_context_from_heading() {
        let mut doc = Document::new();
        let section = doc.append_element(doc.body(), "section", &[]).unwrap();
        let h2 = doc.append_element(section, "h2", &[]).unwrap();
        doc.append_text(h2, "  Featured \n Deals ").unwrap();
        let button = doc.append_element(section, "button", &[]).unwrap();

        assert_eq!(
            infer_context(&doc, button),
            PageContext::Heading("featured-deals".into())
        );
        assert_eq!(infer_context(&doc, button).as_str(), "featured-deals");
    }

    #[test]
    fn test_context_skips_empty_heading() {
        let mut doc = Document::new();
        let outer = doc.append_element(doc.body(), "section", &[]).unwrap();
        let title = doc.append_element(outer, "h1", &[]).unwrap();
        doc.append_text(title, "Shop").unwrap();
        let inner = doc.append_element(outer, "div", &[]).unwrap();
        doc.append_element(inner, "h3", &[]).unwrap();
        let button = doc.append_element(inner, "button", &[]).unwrap();

        assert_eq!(infer_context(&doc, button).as_str(), "shop");
    }

    #[test]
    fn test_context_stops_at_body() {
        let mut doc = Document::new();
        let body = doc.body();
        doc.set_attribute(body, "class", "footer").unwrap();
        let h1 = doc.append_element(body, "h1", &[]).unwrap();
        doc.append_text(h1, "Title").unwrap();
        let button = doc.append_element(body, "button", &[]).unwrap();

        assert_eq!(infer_context(&doc, button), PageContext::MainContent);
    }

    #[test]
    fn test_hero_honored_in_top_quartile_only() {
        let mut doc = Document::new();
        doc.set_scroll_height(1000.0);
        let hero = doc
            .append_element(doc.body(), "div", &[("class", "hero")])
            .unwrap();
        let button = doc.append_element(hero, "button", &[]).unwrap();

        doc.set_layout(button, 100.0, 40.0).unwrap();
        assert_eq!(infer_context(&doc, button), PageContext::Hero);

        doc.set_layout(button, 600.0, 40.0).unwrap();
        assert_eq!(infer_context(&doc, button), PageContext::MainContent);
    }

    #[test]
    fn test_position_accounts_for_scroll() {
        let mut doc = Document::new();
        doc.set_scroll_height(2000.0);
        let header = doc.append_element(doc.body(), "header", &[]).unwrap();
        let link = doc.append_element(header, "a", &[]).unwrap();
        doc.set_layout(link, 300.0, 20.0).unwrap();

        doc.scroll_to(250.0);
        assert_eq!(infer_context(&doc, link), PageContext::Header);

        doc.set_layout(link, 700.0, 20.0).unwrap();
        assert_eq!(infer_context(&doc, link), PageContext::MainContent);
    }

    #[test]
    fn test_footer_honored_in_bottom_quartile_only() {
        let mut doc = Document::new();
        doc.set_scroll_height(1000.0);
        let footer = doc.append_element(doc.body(), "footer", &[]).unwrap();
        let link = doc.append_element(footer, "a", &[]).unwrap();

        doc.set_layout(link, 900.0, 30.0).unwrap();
        assert_eq!(infer_context(&doc, link), PageContext::Footer);

        doc.set_layout(link, 100.0, 30.0).unwrap();
        assert_eq!(infer_context(&doc, link), PageContext::MainContent);
    }

    #[test]
    fn test_navigation_ignores_position() {
        let mut doc = Document::new();
        doc.set_scroll_height(1000.0);
        let nav = doc.append_element(doc.body(), "nav", &[]).unwrap();
        let link = doc.append_element(nav, "a", &[]).unwrap();
        doc.set_layout(link, 900.0, 30.0).unwrap();
        assert_eq!(infer_context(&doc, link), PageContext::Navigation);
    }

    // ------------------------------------------------------------------------
    // Value
    // ------------------------------------------------------------------------

    #[test]
    fn test_number_input_value() {
        let (mut doc, input) = doc_with("input", &[("type", "number"), ("value", " 42 ")]);
        assert_eq!(infer_value(&doc, input).as_deref(), Some("42"));

        doc.set_value(input, "abc").unwrap();
        assert_eq!(infer_value(&doc, input), None);

        let (doc, text) = doc_with("input", &[("type", "text"), ("value", "5")]);
        assert_eq!(infer_value(&doc, text), None);
    }

    #[test]
    fn test_select_value_requires_numeric_options() {
        let (doc, select) = select_with(&["1", "2.5", ""], 1);
        assert_eq!(infer_value(&doc, select).as_deref(), Some("2.5"));

        let (doc, select) = select_with(&["1", "2", "large"], 1);
        assert_eq!(infer_value(&doc, select), None);

        let (doc, select) = select_with(&["1", ""], 1);
        assert_eq!(infer_value(&doc, select), None);
    }

    #[test]
    fn test_list_item_value() {
        let mut doc = Document::new();
        let list = doc
            .append_element(doc.body(), "ul", &[("role", "presentation")])
            .unwrap();
        let picked = doc
            .append_element(list, "li", &[("class", "size active"), ("data-value", " 9 ")])
            .unwrap();
        let other = doc.append_element(list, "li", &[("data-value", "10")]).unwrap();
        let aria = doc
            .append_element(list, "li", &[("aria-selected", "true"), ("data-value", "11")])
            .unwrap();
        let wordy = doc
            .append_element(list, "li", &[("class", "selected"), ("data-value", "XL")])
            .unwrap();

        assert_eq!(infer_value(&doc, picked).as_deref(), Some("9"));
        assert_eq!(infer_value(&doc, other), None);
        assert_eq!(infer_value(&doc, aria).as_deref(), Some("11"));
        assert_eq!(infer_value(&doc, wordy), None);

        let plain = doc.append_element(doc.body(), "ul", &[]).unwrap();
        let item = doc
            .append_element(plain, "li", &[("class", "active"), ("data-value", "3")])
            .unwrap();
        assert_eq!(infer_value(&doc, item), None);
    }

    #[test]
    fn test_option_like_value() {
        let mut doc = Document::new();
        let option = doc
            .append_element(doc.body(), "div", &[("role", "option"), ("aria-selected", "true")])
            .unwrap();
        doc.append_text(option, " 12 ").unwrap();
        assert_eq!(infer_value(&doc, option).as_deref(), Some("12"));

        let idle = doc
            .append_element(doc.body(), "span", &[("role", "option")])
            .unwrap();
        doc.append_text(idle, "3").unwrap();
        assert_eq!(infer_value(&doc, idle), None);
    }

    #[test]
    fn test_is_numeric() {
        for text in ["42", " 4.5 ", "-1", "+2", ".5", "5.", "1e3", "2.5E-2"] {
            assert!(is_numeric(text), "{text}");
        }
        for text in ["", "  ", "abc", "NaN", "Infinity", "1,000", "1.2.3", "--1", "e5"] {
            assert!(!is_numeric(text), "{text}");
        }
    }

    #[test]
    fn test_numeric_pattern_compiles() {
        assert!(NUMERIC.is_some());
    }

    #[test]
    fn test_heading_slug() {
        assert_eq!(heading_slug("  Top   Picks\tToday "), "top-picks-today");
        assert_eq!(heading_slug("   "), "");
    }

    // ------------------------------------------------------------------------
    // Determinism
    // ------------------------------------------------------------------------

    fn tag_strategy() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec!["a", "button", "span", "div", "input", "select", "li"])
    }

    fn class_strategy() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec!["", "hero", "footer", "quantity", "toggle", "nav", "active"])
    }

    proptest! {
        #[test]
        fn test_classification_is_deterministic(
            wrapper_class in class_strategy(),
            tag in tag_strategy(),
            class in class_strategy(),
            text in "[ a-zA-Z0-9]{0,12}",
            top in 0.0f64..2000.0,
        ) {
            let mut doc = Document::new();
            doc.set_scroll_height(2000.0);
            let wrapper = doc
                .append_element(doc.body(), "section", &[("class", wrapper_class)])
                .unwrap();
            let node = doc.append_element(wrapper, tag, &[("class", class)]).unwrap();
            doc.append_text(node, &text).unwrap();
            doc.set_layout(node, top, 10.0).unwrap();

            let first = classify(&doc, node);
            let second = classify(&doc, node);
            prop_assert_eq!(first, second);
        }
    }
}
