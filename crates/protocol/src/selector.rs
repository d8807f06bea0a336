//! UI element selectors.
//!
//! A [`Selector`] describes a predicate over UI element attributes. Every
//! attribute carries a bit in [`Selector::mask`] so the agent can tell an
//! unset field from one set to a falsy value; only fields whose bit is set
//! appear in the encoded form. Builder methods set the field and its bit
//! together.

use serde::{Deserialize, Serialize};

/// Presence bits for [`Selector`] fields.
///
/// The values match the agent's dispatch table and must not be reordered.
pub mod mask {
    pub const TEXT: u64 = 0x01;
    pub const TEXT_CONTAINS: u64 = 0x02;
    pub const TEXT_MATCHES: u64 = 0x04;
    pub const TEXT_STARTS_WITH: u64 = 0x08;
    pub const CLASS_NAME: u64 = 0x10;
    pub const CLASS_NAME_MATCHES: u64 = 0x20;
    pub const DESCRIPTION: u64 = 0x40;
    pub const DESCRIPTION_CONTAINS: u64 = 0x80;
    pub const DESCRIPTION_MATCHES: u64 = 0x0100;
    pub const DESCRIPTION_STARTS_WITH: u64 = 0x0200;
    pub const CHECKABLE: u64 = 0x0400;
    pub const CHECKED: u64 = 0x0800;
    pub const CLICKABLE: u64 = 0x1000;
    pub const LONG_CLICKABLE: u64 = 0x2000;
    pub const SCROLLABLE: u64 = 0x4000;
    pub const ENABLED: u64 = 0x8000;
    pub const FOCUSABLE: u64 = 0x01_0000;
    pub const FOCUSED: u64 = 0x02_0000;
    pub const SELECTED: u64 = 0x04_0000;
    pub const PACKAGE_NAME: u64 = 0x08_0000;
    pub const PACKAGE_NAME_MATCHES: u64 = 0x10_0000;
    pub const RESOURCE_ID: u64 = 0x20_0000;
    pub const RESOURCE_ID_MATCHES: u64 = 0x40_0000;
    pub const INDEX: u64 = 0x80_0000;
    pub const INSTANCE: u64 = 0x0100_0000;
}

/// Discriminator for one link in a nested selector chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainKind {
    /// Match among the children of the previous link.
    Child,
    /// Match among the siblings of the previous link.
    Sibling,
}

/// Attribute predicate used to locate UI elements on the device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Selector {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_contains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_matches: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_starts_with: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name_matches: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_contains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_matches: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_starts_with: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clickable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_clickable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrollable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focusable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focused: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name_matches: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id_matches: Option<String>,
    /// Position among all matched elements.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    /// Position among the elements actually matching the predicate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<u32>,
    /// One discriminator per entry in `child_or_sibling_selector`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub child_or_sibling: Vec<ChainKind>,
    /// Nested selectors applied in order after this one matches.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub child_or_sibling_selector: Vec<Selector>,
    /// Presence bitmask; see [`mask`].
    pub mask: u64,
}

impl Selector {
    /// Creates an empty selector matching nothing in particular.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self.mask |= mask::TEXT;
        self
    }

    pub fn text_contains(mut self, text: impl Into<String>) -> Self {
        self.text_contains = Some(text.into());
        self.mask |= mask::TEXT_CONTAINS;
        self
    }

    pub fn text_matches(mut self, regex: impl Into<String>) -> Self {
        self.text_matches = Some(regex.into());
        self.mask |= mask::TEXT_MATCHES;
        self
    }

    pub fn text_starts_with(mut self, prefix: impl Into<String>) -> Self {
        self.text_starts_with = Some(prefix.into());
        self.mask |= mask::TEXT_STARTS_WITH;
        self
    }

    pub fn class_name(mut self, name: impl Into<String>) -> Self {
        self.class_name = Some(name.into());
        self.mask |= mask::CLASS_NAME;
        self
    }

    pub fn class_name_matches(mut self, regex: impl Into<String>) -> Self {
        self.class_name_matches = Some(regex.into());
        self.mask |= mask::CLASS_NAME_MATCHES;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self.mask |= mask::DESCRIPTION;
        self
    }

    pub fn description_contains(mut self, text: impl Into<String>) -> Self {
        self.description_contains = Some(text.into());
        self.mask |= mask::DESCRIPTION_CONTAINS;
        self
    }

    pub fn description_matches(mut self, regex: impl Into<String>) -> Self {
        self.description_matches = Some(regex.into());
        self.mask |= mask::DESCRIPTION_MATCHES;
        self
    }

    pub fn description_starts_with(mut self, prefix: impl Into<String>) -> Self {
        self.description_starts_with = Some(prefix.into());
        self.mask |= mask::DESCRIPTION_STARTS_WITH;
        self
    }

    pub fn checkable(mut self, value: bool) -> Self {
        self.checkable = Some(value);
        self.mask |= mask::CHECKABLE;
        self
    }

    pub fn checked(mut self, value: bool) -> Self {
        self.checked = Some(value);
        self.mask |= mask::CHECKED;
        self
    }

    pub fn clickable(mut self, value: bool) -> Self {
        self.clickable = Some(value);
        self.mask |= mask::CLICKABLE;
        self
    }

    pub fn long_clickable(mut self, value: bool) -> Self {
        self.long_clickable = Some(value);
        self.mask |= mask::LONG_CLICKABLE;
        self
    }

    pub fn scrollable(mut self, value: bool) -> Self {
        self.scrollable = Some(value);
        self.mask |= mask::SCROLLABLE;
        self
    }

    pub fn enabled(mut self, value: bool) -> Self {
        self.enabled = Some(value);
        self.mask |= mask::ENABLED;
        self
    }

    pub fn focusable(mut self, value: bool) -> Self {
        self.focusable = Some(value);
        self.mask |= mask::FOCUSABLE;
        self
    }

    pub fn focused(mut self, value: bool) -> Self {
        self.focused = Some(value);
        self.mask |= mask::FOCUSED;
        self
    }

    pub fn selected(mut self, value: bool) -> Self {
        self.selected = Some(value);
        self.mask |= mask::SELECTED;
        self
    }

    pub fn package_name(mut self, name: impl Into<String>) -> Self {
        self.package_name = Some(name.into());
        self.mask |= mask::PACKAGE_NAME;
        self
    }

    pub fn package_name_matches(mut self, regex: impl Into<String>) -> Self {
        self.package_name_matches = Some(regex.into());
        self.mask |= mask::PACKAGE_NAME_MATCHES;
        self
    }

    pub fn resource_id(mut self, id: impl Into<String>) -> Self {
        self.resource_id = Some(id.into());
        self.mask |= mask::RESOURCE_ID;
        self
    }

    pub fn resource_id_matches(mut self, regex: impl Into<String>) -> Self {
        self.resource_id_matches = Some(regex.into());
        self.mask |= mask::RESOURCE_ID_MATCHES;
        self
    }

    pub fn index(mut self, index: u32) -> Self {
        self.index = Some(index);
        self.mask |= mask::INDEX;
        self
    }

    pub fn instance(mut self, instance: u32) -> Self {
        self.instance = Some(instance);
        self.mask |= mask::INSTANCE;
        self
    }

    /// Appends a nested selector matched among this one's children.
    pub fn child(mut self, selector: Selector) -> Self {
        self.child_or_sibling.push(ChainKind::Child);
        self.child_or_sibling_selector.push(selector);
        self
    }

    /// Appends a nested selector matched among this one's siblings.
    pub fn sibling(mut self, selector: Selector) -> Self {
        self.child_or_sibling.push(ChainKind::Sibling);
        self.child_or_sibling_selector.push(selector);
        self
    }

    /// Returns true if the given presence bit is set.
    pub fn has(&self, bit: u64) -> bool {
        self.mask & bit != 0
    }
}
