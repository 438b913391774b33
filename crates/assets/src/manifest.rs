use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::AssetError;

/// Name of the synthetic root node glTF importers create.
pub const ROOT_NODE_NAME: &str = "__root__";

/// Describes a mesh template: its node names and where the root starts.
///
/// The root is the node named [`ROOT_NODE_NAME`] when present, otherwise the
/// first node. Every other node becomes a child of the root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshManifest {
    pub nodes: Vec<String>,
    #[serde(default)]
    pub position: Option<[f32; 3]>,
}

impl MeshManifest {
    pub fn new<I, S>(nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            nodes: nodes.into_iter().map(Into::into).collect(),
            position: None,
        }
    }

    /// Place the template root at `position` when loaded.
    pub fn with_position(mut self, position: [f32; 3]) -> Self {
        self.position = Some(position);
        self
    }

    /// Index of the root node in `nodes`.
    pub fn root_index(&self) -> Option<usize> {
        if self.nodes.is_empty() {
            return None;
        }
        Some(
            self.nodes
                .iter()
                .position(|n| n == ROOT_NODE_NAME)
                .unwrap_or(0),
        )
    }

    /// Parse a manifest from its JSON form.
    pub fn from_json_str(s: &str) -> Result<Self, AssetError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Read a JSON manifest from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&data)
    }

    /// Build a manifest from a glTF document's node names.
    ///
    /// Only the node hierarchy is read; geometry stays with the renderer.
    /// A synthetic root is added the way glTF importers do.
    pub fn from_gltf_str(s: &str) -> Result<Self, AssetError> {
        let json: serde_json::Value =
            serde_json::from_str(s).map_err(|e| AssetError::GltfParse(e.to_string()))?;
        let nodes = json
            .get("nodes")
            .and_then(|n| n.as_array())
            .ok_or_else(|| AssetError::GltfParse("missing nodes array".into()))?;

        let mut names = vec![ROOT_NODE_NAME.to_string()];
        for (i, node) in nodes.iter().enumerate() {
            let name = node
                .get("name")
                .and_then(|n| n.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| format!("node_{i}"));
            names.push(name);
        }
        Ok(Self::new(names))
    }
}
