use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::schema::{PartSlot, TemplateSchema};
use crate::scene::SceneGraph;
use crate::AssetError;

/// A minimal material: a name and a base color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
}

impl Material {
    pub fn new(name: impl Into<String>, base_color: [f32; 4]) -> Self {
        Self {
            name: name.into(),
            base_color,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "default".into(),
            base_color: [0.8, 0.8, 0.8, 1.0],
        }
    }
}

/// Candidate materials for each part slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    slots: BTreeMap<PartSlot, Vec<Material>>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bright body colors, darker limbs, a couple of nose and wheel options.
    pub fn lemming() -> Self {
        let mut p = Self::new();
        for (name, rgb) in [
            ("torso_red", [0.85, 0.2, 0.2]),
            ("torso_blue", [0.2, 0.35, 0.85]),
            ("torso_green", [0.2, 0.7, 0.3]),
            ("torso_yellow", [0.95, 0.8, 0.2]),
        ] {
            p.add(PartSlot::Torso, Material::new(name, [rgb[0], rgb[1], rgb[2], 1.0]));
        }
        for (name, rgb) in [("head_pale", [0.95, 0.85, 0.75]), ("head_tan", [0.8, 0.6, 0.45])] {
            p.add(PartSlot::Head, Material::new(name, [rgb[0], rgb[1], rgb[2], 1.0]));
        }
        for (name, rgb) in [("limbs_grey", [0.35, 0.35, 0.4]), ("limbs_black", [0.1, 0.1, 0.1])] {
            p.add(PartSlot::Limbs, Material::new(name, [rgb[0], rgb[1], rgb[2], 1.0]));
        }
        p.add(PartSlot::Wheel, Material::new("wheel_rubber", [0.15, 0.15, 0.15, 1.0]));
        p.add(PartSlot::Nose, Material::new("nose_pink", [0.95, 0.5, 0.6, 1.0]));
        p.add(PartSlot::Nose, Material::new("nose_orange", [0.95, 0.55, 0.15, 1.0]));
        p
    }

    /// Append a candidate material for `slot`.
    pub fn add(&mut self, slot: PartSlot, material: Material) {
        self.slots.entry(slot).or_default().push(material);
    }

    /// Material at `index` among the options for `slot`.
    pub fn get(&self, slot: PartSlot, index: usize) -> Option<&Material> {
        self.slots.get(&slot).and_then(|m| m.get(index))
    }

    /// How many materials `slot` can choose from.
    pub fn options(&self, slot: PartSlot) -> usize {
        self.slots.get(&slot).map_or(0, Vec::len)
    }
}

/// One palette choice per slot, drawn once per spawned agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CosmeticVariant {
    choices: BTreeMap<PartSlot, usize>,
}

impl CosmeticVariant {
    /// Pick a material index uniformly for every slot the palette covers.
    pub fn random<R: Rng + ?Sized>(palette: &Palette, rng: &mut R) -> Self {
        let choices = PartSlot::ALL
            .iter()
            .filter_map(|slot| match palette.options(*slot) {
                0 => None,
                n => Some((*slot, rng.random_range(0..n))),
            })
            .collect();
        Self { choices }
    }

    /// Pin `slot` to the material at `index`.
    pub fn with_choice(mut self, slot: PartSlot, index: usize) -> Self {
        self.choices.insert(slot, index);
        self
    }

    /// Chosen palette index for `slot`, `None` if the slot is left as is.
    pub fn choice(&self, slot: PartSlot) -> Option<usize> {
        self.choices.get(&slot).copied()
    }

    /// Assign the chosen materials to every node of each slot.
    /// Returns the number of nodes that received a material.
    pub fn apply(
        &self,
        palette: &Palette,
        schema: &TemplateSchema,
        scene: &mut dyn SceneGraph,
    ) -> Result<usize, AssetError> {
        let mut assigned = 0;
        for (slot, index) in &self.choices {
            let Some(material) = palette.get(*slot, *index) else {
                tracing::warn!(?slot, index, "palette has no material at index");
                continue;
            };
            for node in schema.nodes(*slot) {
                scene.set_material(*node, material.clone())?;
                assigned += 1;
            }
        }
        Ok(assigned)
    }
}
