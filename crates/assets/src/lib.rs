//! Asset side of the prototype: the mesh collaborator seam and template schema.
//!
//! Gameplay code treats nodes opaquely (position, material, clone, dispose)
//! through [`SceneGraph`]. Templates are loaded once, then resolved into a
//! typed [`TemplateSchema`] so spawns never scan node names.
//!
//! # Invariants
//! - A node id is never reused after dispose.
//! - Cloning copies the whole subtree under fresh ids.
//! - Part-slot classification happens once per template; clones reuse the
//!   template's lookup through the clone map.

mod manifest;
mod material;
mod scene;
mod schema;

pub use manifest::{MeshManifest, ROOT_NODE_NAME};
pub use material::{CosmeticVariant, Material, Palette};
pub use scene::{ClonedSubtree, LoadedMesh, MemoryScene, SceneGraph};
pub use schema::{PartSlot, TemplateSchema};

use lemmings_common::EntityId;

/// Errors from asset and scene-graph operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("node not found: {0}")]
    NodeNotFound(EntityId),
    #[error("manifest declares no nodes")]
    EmptyManifest,
    #[error("manifest parse error: {0}")]
    Manifest(#[from] serde_json::Error),
    #[error("glTF parse error: {0}")]
    GltfParse(String),
}

pub fn crate_info() -> &'static str {
    "lemmings-assets v0.1.0"
}
