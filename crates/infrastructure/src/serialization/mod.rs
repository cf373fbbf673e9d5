//! Deterministic JSON serialization for the storage files.
//!
//! Output is stable across saves:
//! - Object keys sorted alphabetically
//! - 2-space indentation
//! - Trailing newline

mod json;

pub use json::*;
