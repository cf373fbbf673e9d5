//! Flat store of saved requests and folders.

mod store;

pub use store::{DeletedItems, SavedRequestsStore};
