//! Variable and environment domain types

mod environment;
mod name;
mod scope;
mod store;
#[allow(clippy::module_inception)]
mod variable;

pub use environment::Environment;
pub use name::{VARIABLE_NAME_PATTERN, is_valid_variable_name};
pub use scope::{ScopeTarget, VariableScope};
pub use store::VariableStore;
pub use variable::{ResolvedVariable, ScopeLevel, Variable};
