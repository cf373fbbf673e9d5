//! Variable resolution engine
//!
//! Resolves `${variable}` references against the layered variable scope.

use std::collections::HashSet;

use reqx_domain::{ResolvedVariable, ScopeTarget, VariableScope, VariableStore};

use super::context::ResolutionContext;
use super::parser::parse_variables;

/// Result of variable resolution for a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    /// The resolved string. Unresolved references are kept verbatim.
    pub resolved: String,

    /// Variables that were successfully resolved, one entry per reference.
    pub resolved_variables: Vec<ResolvedVariable>,

    /// Variable names that could not be resolved, deduplicated, in
    /// first-occurrence order.
    pub unresolved: Vec<String>,

    /// Whether all variables were successfully resolved.
    pub is_complete: bool,
}

impl ResolutionResult {
    /// Creates a result for input with no variables.
    #[must_use]
    pub fn no_variables(input: &str) -> Self {
        Self {
            resolved: input.to_string(),
            resolved_variables: Vec::new(),
            unresolved: Vec::new(),
            is_complete: true,
        }
    }

    /// Returns the count of resolved references.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.resolved_variables.len()
    }

    /// Returns the count of distinct unresolved names.
    #[must_use]
    pub fn unresolved_count(&self) -> usize {
        self.unresolved.len()
    }
}

/// The variable resolution engine.
///
/// Holds the ordered list of scope layers for one context. Lookups walk
/// the layers from highest priority down and return the first enabled
/// definition, which is the same as overwriting a map layer by layer.
#[derive(Debug, Clone)]
pub struct VariableResolver<'a> {
    scope: &'a VariableScope,
    layers: Vec<ScopeTarget>,
}

impl<'a> VariableResolver<'a> {
    /// Creates a resolver over `scope` for the given context.
    #[must_use]
    pub fn new(scope: &'a VariableScope, context: &ResolutionContext) -> Self {
        Self {
            scope,
            layers: context.layers(),
        }
    }

    /// Returns the layers consulted, lowest priority first.
    #[must_use]
    pub fn layers(&self) -> &[ScopeTarget] {
        &self.layers
    }

    /// Looks a single name up across the layers.
    ///
    /// Disabled variables are skipped, so they never shadow an enabled
    /// definition in a lower layer. A missing bucket is simply empty.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<ResolvedVariable> {
        self.layers.iter().rev().find_map(|target| {
            self.scope
                .bucket(target)
                .iter()
                .rev()
                .find(|v| v.enabled && v.name == name)
                .map(|v| {
                    ResolvedVariable::new(
                        name,
                        v.value.clone(),
                        target.level(),
                        target.owner_id().map(str::to_string),
                    )
                })
        })
    }

    /// Returns true if `name` has an enabled definition in some layer.
    #[must_use]
    pub fn is_defined(&self, name: &str) -> bool {
        self.layers.iter().any(|target| {
            self.scope
                .bucket(target)
                .iter()
                .any(|v| v.enabled && v.name == name)
        })
    }

    /// Resolves all variables in the input string.
    #[must_use]
    pub fn resolve(&self, input: &str) -> ResolutionResult {
        let references = parse_variables(input);

        if references.is_empty() {
            return ResolutionResult::no_variables(input);
        }

        let mut resolved_vars = Vec::new();
        let mut unresolved: Vec<String> = Vec::new();
        let mut result = String::with_capacity(input.len());
        let mut last_end = 0;

        for var_ref in &references {
            result.push_str(&input[last_end..var_ref.span.start]);

            if let Some(resolved) = self.lookup(&var_ref.name) {
                result.push_str(&resolved.value);
                resolved_vars.push(resolved);
            } else {
                result.push_str(&input[var_ref.span.clone()]);
                if !unresolved.contains(&var_ref.name) {
                    unresolved.push(var_ref.name.clone());
                }
            }

            last_end = var_ref.span.end;
        }

        result.push_str(&input[last_end..]);

        let is_complete = unresolved.is_empty();
        ResolutionResult {
            resolved: result,
            resolved_variables: resolved_vars,
            unresolved,
            is_complete,
        }
    }

    /// Returns the referenced names with no enabled definition,
    /// deduplicated, in first-occurrence order.
    #[must_use]
    pub fn find_unresolved(&self, input: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        parse_variables(input)
            .into_iter()
            .filter(|r| !self.is_defined(&r.name))
            .filter_map(|r| seen.insert(r.name.clone()).then_some(r.name))
            .collect()
    }
}

/// Resolves every `${name}` in `text` and returns the substituted string.
///
/// Unknown names are left as written.
#[must_use]
pub fn resolve_variables(text: &str, scope: &VariableScope, context: &ResolutionContext) -> String {
    VariableResolver::new(scope, context).resolve(text).resolved
}

/// Returns the names referenced in `text` that no layer defines.
#[must_use]
pub fn get_undefined_variables(
    text: &str,
    scope: &VariableScope,
    context: &ResolutionContext,
) -> Vec<String> {
    VariableResolver::new(scope, context).find_unresolved(text)
}

/// Single-name lookup over globals and the active environment.
///
/// A dangling active environment id is tolerated and behaves as if no
/// environment were selected.
#[must_use]
pub fn resolve_variable(store: &VariableStore, name: &str) -> Option<String> {
    if store.has_dangling_active_environment() {
        tracing::warn!(
            environment_id = ?store.active_environment_id,
            "Active environment not found, ignoring it"
        );
    }
    store.resolve_variable(name).map(|r| r.value)
}
