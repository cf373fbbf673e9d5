//! Sidebar tree of folders and requests.
//!
//! The tree is a derived view: it is rebuilt each session from the
//! saved requests store and never persisted on its own.

mod interaction;
mod node;
mod state;
mod view;

pub use interaction::CompletedDrop;
pub use node::{DropPosition, NodeKind, NodeMetadata, TreeNode};
pub use state::TreeState;
pub use view::TreeRow;
