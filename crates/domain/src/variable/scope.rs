//! Four-bucket variable scope (persisted under `reqx_variables`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::name::is_valid_variable_name;
use super::variable::{ScopeLevel, Variable};
use crate::error::{DomainError, DomainResult};
use crate::persistence::Id;

/// Addresses one bucket of a [`VariableScope`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScopeTarget {
    /// The global bucket.
    Global,
    /// The bucket of a collection.
    Collection(Id),
    /// The bucket of a folder.
    Folder(Id),
    /// The bucket of a request.
    Request(Id),
}

impl ScopeTarget {
    /// Returns the scope level of this bucket.
    #[must_use]
    pub const fn level(&self) -> ScopeLevel {
        match self {
            Self::Global => ScopeLevel::Global,
            Self::Collection(_) => ScopeLevel::Collection,
            Self::Folder(_) => ScopeLevel::Folder,
            Self::Request(_) => ScopeLevel::Request,
        }
    }

    /// Returns the owning id, `None` for the global bucket.
    #[must_use]
    pub fn owner_id(&self) -> Option<&str> {
        match self {
            Self::Global => None,
            Self::Collection(id) | Self::Folder(id) | Self::Request(id) => Some(id),
        }
    }
}

/// Variables grouped by the scope they are defined in.
///
/// Names are unique per bucket, not globally: the same name may appear
/// in the global bucket and in a folder bucket, and the folder value
/// shadows the global one during resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableScope {
    /// Global variables.
    #[serde(default)]
    pub global: Vec<Variable>,
    /// Variables keyed by collection id.
    #[serde(default)]
    pub collections: BTreeMap<Id, Vec<Variable>>,
    /// Variables keyed by folder id.
    #[serde(default)]
    pub folders: BTreeMap<Id, Vec<Variable>>,
    /// Variables keyed by request id.
    #[serde(default)]
    pub requests: BTreeMap<Id, Vec<Variable>>,
}

impl VariableScope {
    /// Creates an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the variables of a bucket. A missing bucket is empty.
    #[must_use]
    pub fn bucket(&self, target: &ScopeTarget) -> &[Variable] {
        let found = match target {
            ScopeTarget::Global => return &self.global,
            ScopeTarget::Collection(id) => self.collections.get(id),
            ScopeTarget::Folder(id) => self.folders.get(id),
            ScopeTarget::Request(id) => self.requests.get(id),
        };
        found.map_or(&[][..], Vec::as_slice)
    }

    fn bucket_mut(&mut self, target: &ScopeTarget) -> &mut Vec<Variable> {
        match target {
            ScopeTarget::Global => &mut self.global,
            ScopeTarget::Collection(id) => self.collections.entry(id.clone()).or_default(),
            ScopeTarget::Folder(id) => self.folders.entry(id.clone()).or_default(),
            ScopeTarget::Request(id) => self.requests.entry(id.clone()).or_default(),
        }
    }

    /// Like `bucket_mut`, but never creates a missing bucket.
    fn existing_bucket_mut(&mut self, target: &ScopeTarget) -> Option<&mut Vec<Variable>> {
        match target {
            ScopeTarget::Global => Some(&mut self.global),
            ScopeTarget::Collection(id) => self.collections.get_mut(id),
            ScopeTarget::Folder(id) => self.folders.get_mut(id),
            ScopeTarget::Request(id) => self.requests.get_mut(id),
        }
    }

    /// Finds a variable by name in one bucket, enabled or not.
    #[must_use]
    pub fn find(&self, target: &ScopeTarget, name: &str) -> Option<&Variable> {
        self.bucket(target).iter().rev().find(|v| v.name == name)
    }

    /// Adds a variable to a bucket.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or already used in the bucket.
    /// The scope is left untouched in that case.
    pub fn add_variable(&mut self, target: &ScopeTarget, variable: Variable) -> DomainResult<()> {
        if !is_valid_variable_name(&variable.name) {
            return Err(DomainError::InvalidVariableName(variable.name));
        }
        if self.find(target, &variable.name).is_some() {
            return Err(DomainError::DuplicateVariable(variable.name));
        }
        self.bucket_mut(target).push(variable);
        Ok(())
    }

    /// Replaces the variable currently named `name` in a bucket.
    ///
    /// The replacement may carry a new name, which must be valid and not
    /// collide with another variable of the same bucket.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable does not exist, or the new name is
    /// invalid or taken.
    pub fn update_variable(
        &mut self,
        target: &ScopeTarget,
        name: &str,
        variable: Variable,
    ) -> DomainResult<()> {
        if !is_valid_variable_name(&variable.name) {
            return Err(DomainError::InvalidVariableName(variable.name));
        }
        if variable.name != name && self.find(target, &variable.name).is_some() {
            return Err(DomainError::DuplicateVariable(variable.name));
        }
        let Some(slot) = self
            .existing_bucket_mut(target)
            .and_then(|bucket| bucket.iter_mut().rev().find(|v| v.name == name))
        else {
            return Err(DomainError::VariableNotFound(name.to_string()));
        };
        *slot = variable;
        Ok(())
    }

    /// Removes a variable by name. Returns true if something was removed.
    pub fn remove_variable(&mut self, target: &ScopeTarget, name: &str) -> bool {
        let Some(bucket) = self.existing_bucket_mut(target) else {
            return false;
        };
        let before = bucket.len();
        bucket.retain(|v| v.name != name);
        let removed = bucket.len() != before;
        self.prune(target);
        removed
    }

    /// Enables or disables a variable. Returns true if the variable exists.
    pub fn set_enabled(&mut self, target: &ScopeTarget, name: &str, enabled: bool) -> bool {
        self.existing_bucket_mut(target)
            .and_then(|bucket| bucket.iter_mut().rev().find(|v| v.name == name))
            .map(|v| v.enabled = enabled)
            .is_some()
    }

    /// Drops a whole bucket, e.g. when its folder or request is deleted.
    pub fn remove_bucket(&mut self, target: &ScopeTarget) {
        match target {
            ScopeTarget::Global => self.global.clear(),
            ScopeTarget::Collection(id) => {
                self.collections.remove(id);
            }
            ScopeTarget::Folder(id) => {
                self.folders.remove(id);
            }
            ScopeTarget::Request(id) => {
                self.requests.remove(id);
            }
        }
    }

    fn prune(&mut self, target: &ScopeTarget) {
        if target != &ScopeTarget::Global && self.bucket(target).is_empty() {
            self.remove_bucket(target);
        }
    }
}
