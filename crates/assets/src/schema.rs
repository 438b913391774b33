use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use lemmings_common::EntityId;

use crate::scene::{ClonedSubtree, SceneGraph};
use crate::AssetError;

/// Cosmetic part of an agent mesh that can take its own material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartSlot {
    Head,
    Torso,
    Limbs,
    Wheel,
    Nose,
}

impl PartSlot {
    pub const ALL: [PartSlot; 5] = [
        PartSlot::Head,
        PartSlot::Torso,
        PartSlot::Limbs,
        PartSlot::Wheel,
        PartSlot::Nose,
    ];

    /// Classify a mesh node by name. Matching is case-insensitive on
    /// substrings, checked most-specific first.
    pub fn classify(node_name: &str) -> Option<Self> {
        let name = node_name.to_ascii_lowercase();
        if name.contains("nose") {
            Some(Self::Nose)
        } else if name.contains("head") {
            Some(Self::Head)
        } else if name.contains("wheel") {
            Some(Self::Wheel)
        } else if ["limb", "arm", "leg", "foot", "hand"]
            .iter()
            .any(|p| name.contains(p))
        {
            Some(Self::Limbs)
        } else if name.contains("torso") || name.contains("body") {
            Some(Self::Torso)
        } else {
            None
        }
    }
}

/// Typed lookup from part slot to the template nodes that fill it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSchema {
    root: EntityId,
    parts: BTreeMap<PartSlot, Vec<EntityId>>,
    unclassified: Vec<EntityId>,
}

impl TemplateSchema {
    /// Walk the subtree under `root` once and classify every descendant.
    /// Done per template; clones go through [`TemplateSchema::remap`].
    pub fn resolve(scene: &dyn SceneGraph, root: EntityId) -> Result<Self, AssetError> {
        if !scene.contains(root) {
            return Err(AssetError::NodeNotFound(root));
        }
        let mut parts: BTreeMap<PartSlot, Vec<EntityId>> = BTreeMap::new();
        let mut unclassified = Vec::new();
        let mut stack = scene.children(root);
        stack.reverse();
        while let Some(node) = stack.pop() {
            let slot = scene.name(node).and_then(PartSlot::classify);
            match slot {
                Some(slot) => parts.entry(slot).or_default().push(node),
                None => unclassified.push(node),
            }
            let mut children = scene.children(node);
            children.reverse();
            stack.extend(children);
        }
        tracing::debug!(
            root = %root,
            slots = parts.len(),
            unclassified = unclassified.len(),
            "template schema resolved"
        );
        Ok(Self {
            root,
            parts,
            unclassified,
        })
    }

    /// The same slot layout for a clone of this template. No node names are
    /// read; nodes the clone does not cover are dropped.
    pub fn remap(&self, clone: &ClonedSubtree) -> Self {
        let copy = |nodes: &[EntityId]| -> Vec<EntityId> {
            nodes.iter().filter_map(|n| clone.get(*n)).collect()
        };
        Self {
            root: clone.root,
            parts: self
                .parts
                .iter()
                .map(|(slot, nodes)| (*slot, copy(nodes.as_slice())))
                .filter(|(_, nodes)| !nodes.is_empty())
                .collect(),
            unclassified: copy(self.unclassified.as_slice()),
        }
    }

    /// Root node the schema was resolved or remapped for.
    pub fn root(&self) -> EntityId {
        self.root
    }

    /// Nodes filling `slot`, in walk order. Empty when none do.
    pub fn nodes(&self, slot: PartSlot) -> &[EntityId] {
        self.parts.get(&slot).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Slots that at least one node fills.
    pub fn slots(&self) -> impl Iterator<Item = PartSlot> + '_ {
        self.parts.keys().copied()
    }

    /// Descendants no slot matched.
    pub fn unclassified(&self) -> &[EntityId] {
        &self.unclassified
    }
}
