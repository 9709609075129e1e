//! Configuration surface consumed from the host table's init options.
//!
//! The host hands over a single value that may take four shapes, all
//! accepted by [`LinkConfig`] (serde untagged):
//!
//! - boolean `true` - enable every applicable condition, attach listeners;
//!   `false` - deep linking off.
//! - a string of key characters, e.g. `"fop"` - enable search, order, page.
//! - an array of condition names, e.g. `["search", "order"]`.
//! - an object: `{ "conditions": ..., "attachEvents": false }`.
//!
//! # Example
//!
//! ```
//! use fraglink::config::LinkConfig;
//!
//! let config: LinkConfig = serde_json::from_str(r#"{"conditions": "fop"}"#).unwrap();
//! let options = config.resolve().expect("enabled");
//! assert!(options.attach_events);
//! ```

use serde::Deserialize;

/// Which conditions the host wants under management.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ConditionSelector {
    /// A string of single key characters, e.g. `"fop"`.
    Keys(String),
    /// A list of condition names, e.g. `["search", "order"]`.
    Names(Vec<String>),
}

impl ConditionSelector {
    /// The individual condition specs (names or single-character keys) this
    /// selector asks for.
    pub fn specs(&self) -> Vec<String> {
        match self {
            Self::Keys(keys) => keys.chars().map(String::from).collect(),
            Self::Names(names) => names.clone(),
        }
    }
}

/// Fully resolved deep-linking options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkOptions {
    /// Conditions to manage; `None` means every applicable condition.
    pub conditions: Option<ConditionSelector>,
    /// Attach change listeners at bind time (default true).
    pub attach_events: bool,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            conditions: None,
            attach_events: true,
        }
    }
}

/// The raw configuration value in any of its four accepted shapes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LinkConfig {
    /// `true` / `false`.
    Enabled(bool),
    /// Shorthand: string of key characters.
    Keys(String),
    /// Shorthand: list of condition names.
    Names(Vec<String>),
    /// The full object form.
    Options(LinkOptions),
}

impl LinkConfig {
    /// Resolve to concrete options; `None` means deep linking is off.
    pub fn resolve(self) -> Option<LinkOptions> {
        match self {
            Self::Enabled(false) => None,
            Self::Enabled(true) => Some(LinkOptions::default()),
            Self::Keys(keys) => Some(LinkOptions {
                conditions: Some(ConditionSelector::Keys(keys)),
                attach_events: true,
            }),
            Self::Names(names) => Some(LinkOptions {
                conditions: Some(ConditionSelector::Names(names)),
                attach_events: true,
            }),
            Self::Options(options) => Some(options),
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self::Enabled(true)
    }
}

impl From<bool> for LinkConfig {
    fn from(enabled: bool) -> Self {
        Self::Enabled(enabled)
    }
}

impl From<&str> for LinkConfig {
    fn from(keys: &str) -> Self {
        Self::Keys(keys.to_string())
    }
}

impl From<Vec<String>> for LinkConfig {
    fn from(names: Vec<String>) -> Self {
        Self::Names(names)
    }
}

impl From<Vec<&str>> for LinkConfig {
    fn from(names: Vec<&str>) -> Self {
        Self::Names(names.into_iter().map(String::from).collect())
    }
}
