//! Shared types used by every lemmings crate.

pub mod types;

pub use types::{EntityId, Transform};
