//! Reqx Domain - Core business types
//!
//! This crate defines the domain model for the Reqx API client core:
//! scoped variables, saved requests and folders, and the sidebar tree.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod id;
pub mod persistence;
pub mod saved;
pub mod tree;
pub mod variable;

pub use error::{DomainError, DomainResult};
pub use id::generate_id;
pub use persistence::{
    HttpMethod, Id, KeyValuePair, RequestHeader, SavedFolder, SavedRequest, SavedRequestsSnapshot,
};
pub use saved::SavedRequestsStore;
pub use tree::{DropPosition, NodeKind, TreeNode, TreeRow, TreeState};
pub use variable::{
    Environment, ResolvedVariable, ScopeLevel, ScopeTarget, Variable, VariableScope,
    VariableStore, is_valid_variable_name,
};
