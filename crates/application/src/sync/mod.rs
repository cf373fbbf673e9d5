//! Synchronization between the saved requests store and the sidebar tree.
//!
//! The saved store is the source of truth. [`TreeSync`] mirrors it into a
//! [`reqx_domain::TreeState`] and translates tree edits back, and
//! [`Sidebar`] bundles the three so UI actions go through one object.

mod adapter;
mod sidebar;

pub use adapter::{SavedRef, SyncReport, TreeSync};
pub use sidebar::Sidebar;
