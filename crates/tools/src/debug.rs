use lemmings_common::EntityId;
use lemmings_kernel::PhysicsWorld;

/// Physics debug overlay: which bodies are being drawn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhysicsViewer {
    shown: Vec<EntityId>,
}

impl PhysicsViewer {
    fn show_all(physics: &dyn PhysicsWorld) -> Self {
        Self {
            shown: physics.body_ids(),
        }
    }

    /// Bodies captured when the viewer was turned on.
    pub fn shown(&self) -> &[EntityId] {
        &self.shown
    }

    /// Whether `id` is drawn by the viewer.
    pub fn is_shown(&self, id: EntityId) -> bool {
        self.shown.contains(&id)
    }
}

/// Debug toggles owned by one session and dropped with it.
#[derive(Debug, Default)]
pub struct DebugViewers {
    physics: Option<PhysicsViewer>,
    inspector_visible: bool,
}

impl DebugViewers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle the physics viewer. Turning it on shows every body that
    /// exists right now. Returns whether the viewer is on afterwards.
    pub fn toggle_physics(&mut self, physics: &dyn PhysicsWorld) -> bool {
        match self.physics.take() {
            Some(viewer) => {
                tracing::info!(bodies = viewer.shown.len(), "physics viewer off");
                false
            }
            None => {
                let viewer = PhysicsViewer::show_all(physics);
                tracing::info!(bodies = viewer.shown.len(), "physics viewer on");
                self.physics = Some(viewer);
                true
            }
        }
    }

    /// The physics viewer, when on.
    pub fn physics_viewer(&self) -> Option<&PhysicsViewer> {
        self.physics.as_ref()
    }

    /// Flip inspector visibility. Returns the new state.
    pub fn toggle_inspector(&mut self) -> bool {
        self.inspector_visible = !self.inspector_visible;
        tracing::info!(visible = self.inspector_visible, "inspector toggled");
        self.inspector_visible
    }

    pub fn inspector_visible(&self) -> bool {
        self.inspector_visible
    }
}
