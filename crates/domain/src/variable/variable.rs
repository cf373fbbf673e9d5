//! Variable types

use serde::{Deserialize, Serialize};

/// A single named variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    /// Variable name, referenced as `${name}`.
    pub name: String,

    /// The variable value.
    pub value: String,

    /// Disabled variables are invisible to resolution but keep their name slot.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Whether the value should be masked in the UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,

    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

const fn default_enabled() -> bool {
    true
}

impl Variable {
    /// Creates a new enabled variable.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            enabled: true,
            secure: None,
            description: None,
        }
    }

    /// Creates a disabled variable.
    #[must_use]
    pub fn disabled(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            enabled: false,
            ..Self::new(name, value)
        }
    }

    /// Marks the variable as secure.
    #[must_use]
    pub const fn secure(mut self) -> Self {
        self.secure = Some(true);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the value if the variable is enabled.
    #[must_use]
    pub fn enabled_value(&self) -> Option<&str> {
        self.enabled.then_some(self.value.as_str())
    }

    /// Returns true if the value should be masked.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.secure.unwrap_or(false)
    }
}

/// The scope level a variable was resolved from.
///
/// Ordered by precedence: a higher level overrides a lower one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeLevel {
    /// Global variables - lowest precedence.
    Global = 0,
    /// Variables of the active environment (environment selector feature).
    Environment = 1,
    /// Variables of the request's collection.
    Collection = 2,
    /// Variables of a folder on the request's folder chain.
    Folder = 3,
    /// Variables attached to the request itself - highest precedence.
    Request = 4,
}

impl ScopeLevel {
    /// Returns the precedence level (higher = takes priority).
    #[must_use]
    pub const fn precedence(self) -> u8 {
        self as u8
    }

    /// Returns a human-readable name for the level.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Global => "Global",
            Self::Environment => "Environment",
            Self::Collection => "Collection",
            Self::Folder => "Folder",
            Self::Request => "Request",
        }
    }
}

/// A resolved variable with its value and origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVariable {
    /// The variable name (without `${ }`).
    pub name: String,
    /// The resolved value.
    pub value: String,
    /// The level the value came from.
    pub level: ScopeLevel,
    /// Id of the collection, folder or request bucket, if any.
    pub owner_id: Option<String>,
}

impl ResolvedVariable {
    /// Creates a new resolved variable.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        level: ScopeLevel,
        owner_id: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            level,
            owner_id,
        }
    }
}
