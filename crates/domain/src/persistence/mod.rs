//! Persistence domain types.
//!
//! These types represent the JSON blob stored under the
//! `reqx_saved_requests` key, plus the migration applied on load.

mod common;
mod folder;
mod migration;
mod request;
mod snapshot;

pub use common::*;
pub use folder::*;
pub use migration::*;
pub use request::*;
pub use snapshot::*;
