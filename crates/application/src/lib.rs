//! Reqx Application - Resolution, synchronization and use cases
//!
//! This crate defines the application layer with:
//! - The `${variable}` resolution engine
//! - The sync adapter keeping the sidebar tree and the saved store aligned
//! - Port traits (storage, HTTP transport)
//! - Use case orchestration
//! - Application-level error handling

pub mod error;
pub mod ports;
pub mod sync;
pub mod use_cases;
pub mod variable_resolver;

pub use error::{ApplicationError, ApplicationResult};
pub use ports::{ApiRequest, ApiResponse, Clock, HttpClient, KeyValueStorage};
pub use sync::{Sidebar, TreeSync};
pub use use_cases::{
    LoadSavedRequests, LoadVariables, PreparedRequest, SaveSavedRequests, SaveVariables,
    SendOutcome, SendRequest, prepare_request,
};
pub use variable_resolver::{
    ResolutionContext, ResolutionResult, VariableResolver, get_undefined_variables,
    resolve_variable, resolve_variables, validate_variable_name,
};
