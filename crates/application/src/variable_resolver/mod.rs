//! Variable resolution module
//!
//! Provides parsing and resolution of `${variable}` syntax in strings.
//!
//! # Usage
//!
//! ```
//! use reqx_application::variable_resolver::{ResolutionContext, resolve_variables};
//! use reqx_domain::{ScopeTarget, Variable, VariableScope};
//!
//! let mut scope = VariableScope::new();
//! scope.add_variable(&ScopeTarget::Global, Variable::new("host", "localhost")).unwrap();
//! scope
//!     .add_variable(&ScopeTarget::Folder("f1".into()), Variable::new("host", "staging"))
//!     .unwrap();
//!
//! let ctx = ResolutionContext::new().with_folder_hierarchy(vec!["f1".to_string()]);
//! assert_eq!(resolve_variables("http://${host}/api", &scope, &ctx), "http://staging/api");
//! ```

pub mod context;
pub mod engine;
pub mod parser;

pub use context::ResolutionContext;
pub use engine::{
    ResolutionResult, VariableResolver, get_undefined_variables, resolve_variable,
    resolve_variables,
};
pub use parser::{
    VariableReference, extract_variable_names, has_variables, parse_variables,
    validate_variable_name,
};
