//! Environments for the environment selector.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::variable::Variable;
use crate::id::generate_id;
use crate::persistence::Id;

/// A named set of variables keyed by variable name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Unique identifier.
    pub id: Id,
    /// Environment name (e.g., "Development", "Production").
    pub name: String,
    /// Variables keyed by name.
    #[serde(default)]
    pub variables: BTreeMap<String, Variable>,
}

impl Environment {
    /// Creates a new empty environment with a generated id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            variables: BTreeMap::new(),
        }
    }

    /// Adds or replaces a variable, keyed by its name.
    pub fn set_variable(&mut self, variable: Variable) {
        self.variables.insert(variable.name.clone(), variable);
    }

    /// Adds an enabled variable with name and value.
    pub fn add_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.set_variable(Variable::new(name, value));
    }

    /// Removes a variable by name.
    pub fn remove_variable(&mut self, name: &str) -> Option<Variable> {
        self.variables.remove(name)
    }

    /// Resolves a value, only if the variable is enabled.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.variables.get(name).and_then(Variable::enabled_value)
    }
}
