//! Variable store: scoped variables plus the environment selector.

use serde::{Deserialize, Serialize};

use super::environment::Environment;
use super::name::is_valid_variable_name;
use super::scope::{ScopeTarget, VariableScope};
use super::variable::{ResolvedVariable, ScopeLevel, Variable};
use crate::error::{DomainError, DomainResult};
use crate::persistence::Id;

/// Owns all variable data of a session.
///
/// Serializes as the four scope buckets, with the environment selector
/// fields alongside them only when they are in use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableStore {
    /// Scoped variables used by `${name}` resolution.
    #[serde(flatten)]
    pub scope: VariableScope,
    /// Environments available in the selector.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environments: Vec<Environment>,
    /// Id of the selected environment. May dangle after a delete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_environment_id: Option<Id>,
}

impl VariableStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store around an existing scope.
    #[must_use]
    pub fn with_scope(scope: VariableScope) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }

    /// Adds a variable to a scope bucket.
    ///
    /// # Errors
    ///
    /// See [`VariableScope::add_variable`].
    pub fn add_variable(&mut self, target: &ScopeTarget, variable: Variable) -> DomainResult<()> {
        self.scope.add_variable(target, variable)
    }

    /// Replaces a variable in a scope bucket.
    ///
    /// # Errors
    ///
    /// See [`VariableScope::update_variable`].
    pub fn update_variable(
        &mut self,
        target: &ScopeTarget,
        name: &str,
        variable: Variable,
    ) -> DomainResult<()> {
        self.scope.update_variable(target, name, variable)
    }

    /// Removes a variable from a scope bucket.
    pub fn remove_variable(&mut self, target: &ScopeTarget, name: &str) -> bool {
        self.scope.remove_variable(target, name)
    }

    /// Toggles a variable's enabled flag.
    pub fn set_variable_enabled(&mut self, target: &ScopeTarget, name: &str, enabled: bool) -> bool {
        self.scope.set_enabled(target, name, enabled)
    }

    /// Adds an environment and returns its id.
    pub fn add_environment(&mut self, environment: Environment) -> Id {
        let id = environment.id.clone();
        self.environments.push(environment);
        id
    }

    /// Removes an environment. The active id is left as is and simply dangles.
    pub fn remove_environment(&mut self, id: &str) -> Option<Environment> {
        let index = self.environments.iter().position(|e| e.id == id)?;
        Some(self.environments.remove(index))
    }

    /// Returns an environment by id.
    #[must_use]
    pub fn environment(&self, id: &str) -> Option<&Environment> {
        self.environments.iter().find(|e| e.id == id)
    }

    /// Sets a variable inside an environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment is unknown or the name is invalid.
    pub fn set_environment_variable(&mut self, environment_id: &str, variable: Variable) -> DomainResult<()> {
        if !is_valid_variable_name(&variable.name) {
            return Err(DomainError::InvalidVariableName(variable.name));
        }
        let environment = self
            .environments
            .iter_mut()
            .find(|e| e.id == environment_id)
            .ok_or_else(|| DomainError::EnvironmentNotFound(environment_id.to_string()))?;
        environment.set_variable(variable);
        Ok(())
    }

    /// Selects the active environment. `None` clears the selection.
    pub fn set_active_environment(&mut self, id: Option<Id>) {
        self.active_environment_id = id;
    }

    /// Returns the active environment, `None` if unset or dangling.
    #[must_use]
    pub fn active_environment(&self) -> Option<&Environment> {
        self.active_environment_id
            .as_deref()
            .and_then(|id| self.environment(id))
    }

    /// Returns true if an active id is set but points at nothing.
    #[must_use]
    pub fn has_dangling_active_environment(&self) -> bool {
        self.active_environment_id.is_some() && self.active_environment().is_none()
    }

    /// Looks a single name up in the global + active environment view.
    ///
    /// The active environment overrides globals. Disabled entries are
    /// skipped, so a disabled environment variable falls through to an
    /// enabled global one.
    #[must_use]
    pub fn resolve_variable(&self, name: &str) -> Option<ResolvedVariable> {
        if let Some(env) = self.active_environment()
            && let Some(value) = env.resolve(name)
        {
            return Some(ResolvedVariable::new(
                name,
                value,
                ScopeLevel::Environment,
                Some(env.id.clone()),
            ));
        }

        self.scope
            .global
            .iter()
            .rev()
            .find(|v| v.enabled && v.name == name)
            .map(|v| ResolvedVariable::new(name, v.value.clone(), ScopeLevel::Global, None))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store_with_env() -> (VariableStore, Id) {
        let mut store = VariableStore::new();
        store
            .add_variable(&ScopeTarget::Global, Variable::new("host", "global-host"))
            .unwrap();
        store
            .add_variable(&ScopeTarget::Global, Variable::new("port", "80"))
            .unwrap();

        let mut env = Environment::new("Development");
        env.add_variable("host", "dev-host");
        env.set_variable(Variable::disabled("port", "8080"));
        let id = store.add_environment(env);
        (store, id)
    }

    #[test]
    fn test_resolve_without_active_environment() {
        let (store, _) = store_with_env();
        let resolved = store.resolve_variable("host").unwrap();
        assert_eq!(resolved.value, "global-host");
        assert_eq!(resolved.level, ScopeLevel::Global);
    }

    #[test]
    fn test_active_environment_overrides_global() {
        let (mut store, id) = store_with_env();
        store.set_active_environment(Some(id.clone()));

        let resolved = store.resolve_variable("host").unwrap();
        assert_eq!(resolved.value, "dev-host");
        assert_eq!(resolved.level, ScopeLevel::Environment);
        assert_eq!(resolved.owner_id, Some(id));
    }

    #[test]
    fn test_disabled_environment_variable_falls_through() {
        let (mut store, id) = store_with_env();
        store.set_active_environment(Some(id));

        assert_eq!(store.resolve_variable("port").unwrap().value, "80");
    }

    #[test]
    fn test_dangling_active_environment_is_tolerated() {
        let (mut store, id) = store_with_env();
        store.set_active_environment(Some(id.clone()));
        store.remove_environment(&id);

        assert!(store.has_dangling_active_environment());
        assert_eq!(store.resolve_variable("host").unwrap().value, "global-host");
    }

    #[test]
    fn test_disabled_global_is_absent() {
        let mut store = VariableStore::new();
        store
            .add_variable(&ScopeTarget::Global, Variable::disabled("token", "t"))
            .unwrap();
        assert!(store.resolve_variable("token").is_none());
        assert!(store.resolve_variable("unknown").is_none());
    }

    #[test]
    fn test_set_environment_variable_validation() {
        let (mut store, id) = store_with_env();
        assert_eq!(
            store.set_environment_variable(&id, Variable::new("bad name", "x")),
            Err(DomainError::InvalidVariableName("bad name".to_string()))
        );
        assert_eq!(
            store.set_environment_variable("missing", Variable::new("ok", "x")),
            Err(DomainError::EnvironmentNotFound("missing".to_string()))
        );
        store
            .set_environment_variable(&id, Variable::new("ok", "x"))
            .unwrap();
        assert_eq!(store.environment(&id).unwrap().resolve("ok"), Some("x"));
    }

    #[test]
    fn test_serializes_as_scope_buckets() {
        let mut store = VariableStore::new();
        store
            .add_variable(&ScopeTarget::Folder("f1".into()), Variable::new("a", "1"))
            .unwrap();

        let value = serde_json::to_value(&store).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["collections", "folders", "global", "requests"]);

        let back: VariableScope = serde_json::from_value(value).unwrap();
        assert_eq!(back, store.scope);
    }

    #[test]
    fn test_loads_plain_scope_blob() {
        let json = r#"{"global":[{"name":"host","value":"h","enabled":true}],"collections":{},"folders":{},"requests":{}}"#;
        let store: VariableStore = serde_json::from_str(json).unwrap();

        assert!(store.environments.is_empty());
        assert_eq!(store.active_environment_id, None);
        assert_eq!(store.resolve_variable("host").unwrap().value, "h");
    }
}
