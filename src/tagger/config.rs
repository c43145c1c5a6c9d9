//! Tagger configuration.
//!
//! # Example
//!
//! ```
//! use page_tagger::TaggerConfig;
//!
//! # fn example() -> page_tagger::Result<()> {
//! let config = TaggerConfig::builder()
//!     .selectors(["a", "button", "[role=option]"])
//!     .attribute_context("data-region")
//!     .debug(true)
//!     .build()?;
//!
//! assert_eq!(config.attributes().context(), "data-region");
//! assert_eq!(config.attributes().type_name(), "data-type");
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::dom::SelectorList;
use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Selectors tagged when none are configured.
pub const DEFAULT_SELECTORS: [&str; 3] = ["a", "button", "span"];

/// Default attribute for the semantic type.
pub const DEFAULT_TYPE_ATTRIBUTE: &str = "data-type";

/// Default attribute for the action label.
pub const DEFAULT_ACTION_ATTRIBUTE: &str = "data-action";

/// Default attribute for the page context.
pub const DEFAULT_CONTEXT_ATTRIBUTE: &str = "data-context";

/// Default attribute for the numeric value.
pub const DEFAULT_VALUE_ATTRIBUTE: &str = "data-value";

// ============================================================================
// AttributeNames
// ============================================================================

/// Concrete attribute names for the four tag roles.
///
/// Every name is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeNames {
    #[serde(rename = "type")]
    type_name: String,
    action: String,
    context: String,
    value: String,
}

impl AttributeNames {
    /// Attribute holding the semantic type.
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Attribute holding the action label.
    #[inline]
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Attribute holding the page context.
    #[inline]
    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Attribute holding the numeric value.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// All four names: type, action, context, value.
    #[must_use]
    pub fn all(&self) -> [&str; 4] {
        [&self.type_name, &self.action, &self.context, &self.value]
    }

    /// Merges `overrides` key by key. Blank overrides are ignored.
    #[must_use]
    pub fn merged(mut self, overrides: &AttributeOverrides) -> Self {
        fn apply(slot: &mut String, candidate: Option<&String>) {
            if let Some(name) = candidate.map(|name| name.trim())
                && !name.is_empty()
            {
                *slot = name.to_string();
            }
        }

        apply(&mut self.type_name, overrides.type_name.as_ref());
        apply(&mut self.action, overrides.action.as_ref());
        apply(&mut self.context, overrides.context.as_ref());
        apply(&mut self.value, overrides.value.as_ref());
        self
    }
}

impl Default for AttributeNames {
    fn default() -> Self {
        Self {
            type_name: DEFAULT_TYPE_ATTRIBUTE.to_string(),
            action: DEFAULT_ACTION_ATTRIBUTE.to_string(),
            context: DEFAULT_CONTEXT_ATTRIBUTE.to_string(),
            value: DEFAULT_VALUE_ATTRIBUTE.to_string(),
        }
    }
}

// ============================================================================
// AttributeOverrides
// ============================================================================

/// Partial attribute names, as accepted from configuration input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeOverrides {
    /// Type attribute override.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    /// Action attribute override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// Context attribute override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Value attribute override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

// ============================================================================
// TaggerConfig
// ============================================================================

/// Immutable tagger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaggerConfig {
    selectors: Vec<String>,
    attributes: AttributeNames,
    debug: bool,
}

impl TaggerConfig {
    /// Creates a configuration builder.
    #[inline]
    #[must_use]
    pub fn builder() -> TaggerConfigBuilder {
        TaggerConfigBuilder::new()
    }

    /// Parses `{ "selectors"?, "attributes"?, "debug"? }`.
    ///
    /// # Errors
    ///
    /// - [`Error::Json`] if the input is malformed
    /// - [`Error::InvalidSelector`] or [`Error::Config`] from validation
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawConfig = serde_json::from_str(json)?;

        let mut builder = Self::builder().debug(raw.debug.unwrap_or(false));
        if let Some(selectors) = raw.selectors {
            builder = builder.selectors(selectors);
        }
        if let Some(attributes) = raw.attributes {
            builder = builder.attributes(attributes);
        }
        builder.build()
    }

    /// Configured selector strings, in order.
    #[inline]
    #[must_use]
    pub fn selectors(&self) -> &[String] {
        &self.selectors
    }

    /// Resolved attribute names.
    #[inline]
    #[must_use]
    pub fn attributes(&self) -> &AttributeNames {
        &self.attributes
    }

    /// Returns `true` if diagnostics are enabled.
    #[inline]
    #[must_use]
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Compiles the selectors into one list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`] if a selector does not parse.
    pub fn selector_list(&self) -> Result<SelectorList> {
        SelectorList::from_selectors(&self.selectors)
    }

    /// Selector for elements carrying the three mandatory attributes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`] if a configured attribute name
    /// cannot be used in a selector.
    pub fn tagged_selector(&self) -> Result<SelectorList> {
        let names = &self.attributes;
        SelectorList::parse(&format!(
            "[{}][{}][{}]",
            names.type_name, names.action, names.context
        ))
    }
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            selectors: DEFAULT_SELECTORS.iter().map(|s| (*s).to_string()).collect(),
            attributes: AttributeNames::default(),
            debug: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    selectors: Option<Vec<String>>,
    attributes: Option<AttributeOverrides>,
    debug: Option<bool>,
}

// ============================================================================
// TaggerConfigBuilder
// ============================================================================

/// Builder for [`TaggerConfig`].
#[derive(Debug, Default, Clone)]
pub struct TaggerConfigBuilder {
    selectors: Option<Vec<String>>,
    overrides: AttributeOverrides,
    debug: bool,
}

impl TaggerConfigBuilder {
    /// Creates a builder with default settings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one selector.
    ///
    /// The first call replaces the default selectors.
    #[must_use]
    pub fn selector(mut self, selector: impl Into<String>) -> Self {
        self.selectors
            .get_or_insert_with(Vec::new)
            .push(selector.into());
        self
    }

    /// Replaces the selectors.
    #[must_use]
    pub fn selectors(mut self, selectors: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.selectors = Some(selectors.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the type attribute name.
    #[inline]
    #[must_use]
    pub fn attribute_type(mut self, name: impl Into<String>) -> Self {
        self.overrides.type_name = Some(name.into());
        self
    }

    /// Sets the action attribute name.
    #[inline]
    #[must_use]
    pub fn attribute_action(mut self, name: impl Into<String>) -> Self {
        self.overrides.action = Some(name.into());
        self
    }

    /// Sets the context attribute name.
    #[inline]
    #[must_use]
    pub fn attribute_context(mut self, name: impl Into<String>) -> Self {
        self.overrides.context = Some(name.into());
        self
    }

    /// Sets the value attribute name.
    #[inline]
    #[must_use]
    pub fn attribute_value(mut self, name: impl Into<String>) -> Self {
        self.overrides.value = Some(name.into());
        self
    }

    /// Applies several attribute name overrides at once.
    ///
    /// Keys left `None` keep their current setting.
    #[must_use]
    pub fn attributes(mut self, overrides: AttributeOverrides) -> Self {
        let AttributeOverrides {
            type_name,
            action,
            context,
            value,
        } = overrides;
        self.overrides.type_name = type_name.or(self.overrides.type_name);
        self.overrides.action = action.or(self.overrides.action);
        self.overrides.context = context.or(self.overrides.context);
        self.overrides.value = value.or(self.overrides.value);
        self
    }

    /// Enables diagnostic logging.
    #[inline]
    #[must_use]
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Builds the configuration with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the selector list is empty
    /// - [`Error::InvalidSelector`] if a selector does not parse
    /// - [`Error::InvalidSelector`] if an attribute name is unusable in a selector
    pub fn build(self) -> Result<TaggerConfig> {
        let selectors = self.validate_selectors()?;
        let attributes = AttributeNames::default().merged(&self.overrides);

        let config = TaggerConfig {
            selectors,
            attributes,
            debug: self.debug,
        };
        config.tagged_selector()?;
        Ok(config)
    }
}

// ============================================================================
// Validation
// ============================================================================

impl TaggerConfigBuilder {
    fn validate_selectors(&self) -> Result<Vec<String>> {
        let selectors = match &self.selectors {
            Some(selectors) => selectors.clone(),
            None => return Ok(TaggerConfig::default().selectors),
        };

        if selectors.is_empty() {
            return Err(Error::config(
                "At least one selector is required. Use .selector() to add one.\n\
                 Example: TaggerConfig::builder().selector(\"button\")",
            ));
        }

        for selector in &selectors {
            SelectorList::parse(selector)?;
        }

        Ok(selectors)
    }
}

// ============================================================================
// Tests
// ============================================================================
