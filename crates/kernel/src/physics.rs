use glam::Vec3;
use std::collections::BTreeMap;

use lemmings_common::EntityId;

/// Errors from the physics collaborator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PhysicsError {
    #[error("no physics body for {0}")]
    MissingBody(EntityId),
}

/// Mass and damping of a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub mass: f32,
    pub linear_damping: f32,
    pub radius: f32,
}

impl BodyDesc {
    /// Sphere used for every lemming.
    pub fn lemming() -> Self {
        Self {
            mass: 1.0,
            linear_damping: 1.0,
            radius: 1.1,
        }
    }

    /// Capsule-ish player body: heavier, strongly damped.
    pub fn player() -> Self {
        Self {
            mass: 5.0,
            linear_damping: 1.0,
            radius: 1.0,
        }
    }
}

impl Default for BodyDesc {
    fn default() -> Self {
        Self::lemming()
    }
}

/// The physics engine as gameplay code sees it.
///
/// Bodies are keyed by the id of the node they belong to. Callers must
/// tolerate a missing body: every mutation reports it instead of panicking.
pub trait PhysicsWorld {
    fn create_body(&mut self, id: EntityId, position: Vec3, desc: BodyDesc);

    /// Returns whether a body existed.
    fn dispose_body(&mut self, id: EntityId) -> bool;

    fn has_body(&self, id: EntityId) -> bool;

    fn body_ids(&self) -> Vec<EntityId>;

    fn body_position(&self, id: EntityId) -> Option<Vec3>;

    /// Apply a force for the next step at world position `at`.
    fn apply_force(&mut self, id: EntityId, force: Vec3, at: Vec3) -> Result<(), PhysicsError>;

    /// Apply an instantaneous change of momentum at world position `at`.
    fn apply_impulse(&mut self, id: EntityId, impulse: Vec3, at: Vec3) -> Result<(), PhysicsError>;

    fn set_angular_velocity(&mut self, id: EntityId, velocity: Vec3) -> Result<(), PhysicsError>;

    /// While pre-step is enabled the body follows its node and is not simulated.
    fn set_pre_step(&mut self, id: EntityId, enabled: bool) -> Result<(), PhysicsError>;

    fn teleport(&mut self, id: EntityId, position: Vec3) -> Result<(), PhysicsError>;

    fn step(&mut self, dt: f32);
}

/// State of one point-mass body.
#[derive(Debug, Clone, PartialEq)]
pub struct PointBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub desc: BodyDesc,
    pub pre_step: bool,
    force: Vec3,
}

/// Reference physics: point masses, no gravity, no contacts.
///
/// Forces accumulate until the next [`PhysicsWorld::step`]; impulses change
/// velocity immediately. Integration is semi-implicit Euler with linear
/// damping. The application point is accepted but produces no torque.
#[derive(Debug, Clone, Default)]
pub struct PointMassWorld {
    bodies: BTreeMap<EntityId, PointBody>,
}

impl PointMassWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full simulation state of one body.
    pub fn body(&self, id: EntityId) -> Option<&PointBody> {
        self.bodies.get(&id)
    }

    /// Linear velocity of a body.
    pub fn velocity(&self, id: EntityId) -> Option<Vec3> {
        self.bodies.get(&id).map(|b| b.velocity)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    fn body_mut(&mut self, id: EntityId) -> Result<&mut PointBody, PhysicsError> {
        self.bodies
            .get_mut(&id)
            .ok_or(PhysicsError::MissingBody(id))
    }
}

impl PhysicsWorld for PointMassWorld {
    fn create_body(&mut self, id: EntityId, position: Vec3, desc: BodyDesc) {
        self.bodies.insert(
            id,
            PointBody {
                position,
                velocity: Vec3::ZERO,
                angular_velocity: Vec3::ZERO,
                desc,
                pre_step: false,
                force: Vec3::ZERO,
            },
        );
    }

    fn dispose_body(&mut self, id: EntityId) -> bool {
        self.bodies.remove(&id).is_some()
    }

    fn has_body(&self, id: EntityId) -> bool {
        self.bodies.contains_key(&id)
    }

    fn body_ids(&self) -> Vec<EntityId> {
        self.bodies.keys().copied().collect()
    }

    fn body_position(&self, id: EntityId) -> Option<Vec3> {
        self.bodies.get(&id).map(|b| b.position)
    }

    fn apply_force(&mut self, id: EntityId, force: Vec3, _at: Vec3) -> Result<(), PhysicsError> {
        self.body_mut(id)?.force += force;
        Ok(())
    }

    fn apply_impulse(&mut self, id: EntityId, impulse: Vec3, _at: Vec3) -> Result<(), PhysicsError> {
        let body = self.body_mut(id)?;
        if body.desc.mass > 0.0 {
            body.velocity += impulse / body.desc.mass;
        }
        Ok(())
    }

    fn set_angular_velocity(&mut self, id: EntityId, velocity: Vec3) -> Result<(), PhysicsError> {
        self.body_mut(id)?.angular_velocity = velocity;
        Ok(())
    }

    fn set_pre_step(&mut self, id: EntityId, enabled: bool) -> Result<(), PhysicsError> {
        self.body_mut(id)?.pre_step = enabled;
        Ok(())
    }

    fn teleport(&mut self, id: EntityId, position: Vec3) -> Result<(), PhysicsError> {
        let body = self.body_mut(id)?;
        body.position = position;
        body.velocity = Vec3::ZERO;
        Ok(())
    }

    fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        for body in self.bodies.values_mut() {
            let force = std::mem::take(&mut body.force);
            if body.pre_step || body.desc.mass <= 0.0 {
                continue;
            }
            body.velocity += force / body.desc.mass * dt;
            body.velocity *= (1.0 - body.desc.linear_damping * dt).max(0.0);
            body.position += body.velocity * dt;
        }
    }
}
