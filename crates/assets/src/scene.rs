use glam::Vec3;
use std::collections::BTreeMap;

use lemmings_common::{EntityId, Transform};

use crate::manifest::MeshManifest;
use crate::material::Material;
use crate::AssetError;

/// The mesh collaborator as gameplay code sees it.
///
/// Nodes are opaque handles. Implementations own geometry, materials and
/// whatever the renderer needs; the kernel only positions, clones, recolors
/// and disposes them.
pub trait SceneGraph {
    /// Whether the node exists (and has not been disposed).
    fn contains(&self, node: EntityId) -> bool;

    /// Node name, `None` once disposed.
    fn name(&self, node: EntityId) -> Option<&str>;

    /// First node carrying `name`.
    fn find_by_name(&self, name: &str) -> Option<EntityId>;

    /// Direct children, in insertion order.
    fn children(&self, node: EntityId) -> Vec<EntityId>;

    fn position(&self, node: EntityId) -> Option<Vec3>;

    fn set_position(&mut self, node: EntityId, position: Vec3) -> Result<(), AssetError>;

    fn set_material(&mut self, node: EntityId, material: Material) -> Result<(), AssetError>;

    /// Deep-clone `source` and its subtree. The clone root is named
    /// `new_name`; descendants are named `{new_name}.{original}`. The result
    /// maps every source node to its copy.
    fn clone_with_map(&mut self, source: EntityId, new_name: &str) -> Result<ClonedSubtree, AssetError>;

    /// [`SceneGraph::clone_with_map`] when only the new root matters.
    fn clone_node(&mut self, source: EntityId, new_name: &str) -> Result<EntityId, AssetError> {
        Ok(self.clone_with_map(source, new_name)?.root)
    }

    /// Remove a node and its subtree.
    fn dispose(&mut self, node: EntityId) -> Result<(), AssetError>;
}

/// A deep clone: the new root and where each source node was copied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClonedSubtree {
    pub root: EntityId,
    pub nodes: BTreeMap<EntityId, EntityId>,
}

impl ClonedSubtree {
    /// The copy of `source`, if it was part of the cloned subtree.
    pub fn get(&self, source: EntityId) -> Option<EntityId> {
        self.nodes.get(&source).copied()
    }
}

/// Result of loading a template: the root and every node created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedMesh {
    pub root: EntityId,
    pub nodes: Vec<EntityId>,
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<EntityId>,
    children: Vec<EntityId>,
    transform: Transform,
    material: Option<Material>,
}

/// In-memory scene graph. Backs headless runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryScene {
    nodes: BTreeMap<EntityId, Node>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Insert a node under `parent` (or as a root) with a fresh id.
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        parent: Option<EntityId>,
        transform: Transform,
    ) -> EntityId {
        let id = EntityId::new();
        self.nodes.insert(
            id,
            Node {
                name: name.into(),
                parent,
                children: Vec::new(),
                transform,
                material: None,
            },
        );
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            p.children.push(id);
        }
        id
    }

    /// Create the nodes a manifest describes.
    pub fn load_manifest(&mut self, manifest: &MeshManifest) -> Result<LoadedMesh, AssetError> {
        let root_index = manifest.root_index().ok_or(AssetError::EmptyManifest)?;
        let position = manifest.position.map(Vec3::from_array).unwrap_or(Vec3::ZERO);
        let root = self.add_node(
            manifest.nodes[root_index].clone(),
            None,
            Transform::from_position(position),
        );
        let mut nodes = vec![root];
        for (i, name) in manifest.nodes.iter().enumerate() {
            if i != root_index {
                nodes.push(self.add_node(name.clone(), Some(root), Transform::default()));
            }
        }
        tracing::debug!(root = %root, nodes = nodes.len(), "mesh template loaded");
        Ok(LoadedMesh { root, nodes })
    }

    /// Material assigned to `node`, if any.
    pub fn material(&self, node: EntityId) -> Option<&Material> {
        self.nodes.get(&node).and_then(|n| n.material.as_ref())
    }

    /// Rename a node in place. Clones made afterwards derive their names
    /// from the new one.
    pub fn rename(&mut self, node: EntityId, name: impl Into<String>) -> Result<(), AssetError> {
        self.node_mut(node)?.name = name.into();
        Ok(())
    }

    /// Parent of `node`; `None` for roots and unknown nodes.
    pub fn parent(&self, node: EntityId) -> Option<EntityId> {
        self.nodes.get(&node).and_then(|n| n.parent)
    }

    /// `node` and every node below it, depth first.
    pub fn subtree(&self, node: EntityId) -> Vec<EntityId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(n) = self.nodes.get(&id) {
                out.push(id);
                stack.extend(n.children.iter().rev().copied());
            }
        }
        out
    }

    fn node_mut(&mut self, node: EntityId) -> Result<&mut Node, AssetError> {
        self.nodes
            .get_mut(&node)
            .ok_or(AssetError::NodeNotFound(node))
    }

    fn clone_subtree(
        &mut self,
        source: EntityId,
        name: String,
        parent: Option<EntityId>,
        prefix: &str,
        copies: &mut BTreeMap<EntityId, EntityId>,
    ) -> Result<EntityId, AssetError> {
        let src = self
            .nodes
            .get(&source)
            .cloned()
            .ok_or(AssetError::NodeNotFound(source))?;
        let id = self.add_node(name, parent, src.transform);
        self.node_mut(id)?.material = src.material;
        copies.insert(source, id);
        for child in src.children {
            let child_name = self
                .nodes
                .get(&child)
                .map(|n| format!("{prefix}.{}", n.name))
                .ok_or(AssetError::NodeNotFound(child))?;
            self.clone_subtree(child, child_name, Some(id), prefix, copies)?;
        }
        Ok(id)
    }
}

impl SceneGraph for MemoryScene {
    fn contains(&self, node: EntityId) -> bool {
        self.nodes.contains_key(&node)
    }

    fn name(&self, node: EntityId) -> Option<&str> {
        self.nodes.get(&node).map(|n| n.name.as_str())
    }

    fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.nodes
            .iter()
            .find(|(_, n)| n.name == name)
            .map(|(id, _)| *id)
    }

    fn children(&self, node: EntityId) -> Vec<EntityId> {
        self.nodes
            .get(&node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn position(&self, node: EntityId) -> Option<Vec3> {
        self.nodes.get(&node).map(|n| n.transform.position)
    }

    fn set_position(&mut self, node: EntityId, position: Vec3) -> Result<(), AssetError> {
        self.node_mut(node)?.transform.position = position;
        Ok(())
    }

    fn set_material(&mut self, node: EntityId, material: Material) -> Result<(), AssetError> {
        self.node_mut(node)?.material = Some(material);
        Ok(())
    }

    fn clone_with_map(&mut self, source: EntityId, new_name: &str) -> Result<ClonedSubtree, AssetError> {
        let parent = self.parent(source);
        let mut nodes = BTreeMap::new();
        let root = self.clone_subtree(source, new_name.to_string(), parent, new_name, &mut nodes)?;
        tracing::trace!(source = %source, clone = %root, name = new_name, nodes = nodes.len(), "node cloned");
        Ok(ClonedSubtree { root, nodes })
    }

    fn dispose(&mut self, node: EntityId) -> Result<(), AssetError> {
        if !self.nodes.contains_key(&node) {
            return Err(AssetError::NodeNotFound(node));
        }
        if let Some(p) = self.parent(node).and_then(|p| self.nodes.get_mut(&p)) {
            p.children.retain(|c| *c != node);
        }
        for id in self.subtree(node) {
            self.nodes.remove(&id);
        }
        Ok(())
    }
}
