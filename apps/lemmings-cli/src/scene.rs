//! Scene assembly: one session wiring input, population, physics and tools
//! into a single frame loop.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use glam::Vec3;
use lemmings_assets::{MemoryScene, MeshManifest, Palette, SceneGraph};
use lemmings_common::{EntityId, Transform};
use lemmings_input::{InputActionRouter, KeyBindings, TriggerType};
use lemmings_kernel::{BodyDesc, PhysicsWorld, PointMassWorld, PopulationManager, SimConfig, TickReport};
use lemmings_tools::DebugViewers;

/// Player movement speed, in force units before scaling.
pub const SPEED: f32 = 10.0;
/// Multiplier from movement intent to force on the player body.
pub const FORCE_SCALE: f32 = 15.0;
/// Yaw rate per unit of strafe intent.
pub const ANG_SCALE: f32 = 0.3;

const PLAYER_START: Vec3 = Vec3::new(0.0, 5.0, -5.0);
const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 18.0, 8.0);

/// Lemming template used when no manifest is given.
pub fn default_lemming_manifest() -> MeshManifest {
    MeshManifest::new(["__root__", "Torso", "Head", "Nose", "Arm_L", "Arm_R", "Leg_L", "Leg_R"])
}

/// What logical actions ask the session to do.
///
/// Action callbacks only queue commands; the session applies them between
/// input dispatch and the population tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Movement intent for this tick: forward/back on `forward`, strafe on `right`.
    Move { forward: f32, right: f32, dt: f32 },
    ToggleControl,
    TogglePhysicsDebug,
    ToggleInspector,
    ToggleMute,
    SpawnLemming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    /// Movement pushes the player body.
    Player,
    /// Movement flies the free camera.
    Camera,
}

/// Everything one running scene owns. Dropping it tears the scene down.
pub struct Session {
    router: InputActionRouter,
    commands: Rc<RefCell<VecDeque<Command>>>,
    scene: MemoryScene,
    physics: PointMassWorld,
    population: PopulationManager,
    debug: DebugViewers,
    player: EntityId,
    camera: Vec3,
    control: ControlMode,
    muted: bool,
    frames: u64,
}

impl Session {
    /// Load the template, create the base lemming and the player, and wire
    /// every bound action to a command.
    pub fn new(
        config: &SimConfig,
        bindings: KeyBindings,
        manifest: &MeshManifest,
    ) -> anyhow::Result<Self> {
        config.validate()?;
        let mut scene = MemoryScene::new();
        let mut physics = PointMassWorld::new();

        let template = scene.load_manifest(manifest)?;
        let mut population = PopulationManager::new(config, Palette::lemming());
        population.init(template.root, &mut scene, &mut physics)?;

        let player = scene.add_node("player", None, Transform::from_position(PLAYER_START));
        physics.create_body(player, PLAYER_START, BodyDesc::player());

        let commands = Rc::new(RefCell::new(VecDeque::new()));
        let mut router = InputActionRouter::new(bindings);
        register_actions(&mut router, &commands);
        for action in router.unbound_actions() {
            tracing::warn!(action, "bound action has no definition");
        }

        Ok(Self {
            router,
            commands,
            scene,
            physics,
            population,
            debug: DebugViewers::new(),
            player,
            camera: PLAYER_START + CAMERA_OFFSET,
            control: ControlMode::Player,
            muted: false,
            frames: 0,
        })
    }

    /// Feed one keyboard edge from the event source.
    pub fn key(&mut self, key: &str, down: bool, repeat: bool) {
        self.router.on_key_transition(key, down, repeat);
        self.apply_commands();
    }

    /// One render-loop frame.
    pub fn frame(&mut self, dt: f32) -> TickReport {
        self.router.tick(dt);
        self.apply_commands();
        let report = self
            .population
            .tick(dt, &mut self.scene, &mut self.physics);
        self.physics.step(dt);
        self.sync_nodes();
        self.frames += 1;
        report
    }

    fn apply_commands(&mut self) {
        let pending: Vec<Command> = self.commands.borrow_mut().drain(..).collect();
        for command in pending {
            self.apply(command);
        }
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Move { forward, right, dt } => {
                let dir = Vec3::NEG_Z * forward + Vec3::X * right;
                match self.control {
                    ControlMode::Player => self.move_player(dir, right),
                    ControlMode::Camera => self.camera += dir * dt,
                }
            }
            Command::ToggleControl => {
                self.control = match self.control {
                    ControlMode::Player => ControlMode::Camera,
                    ControlMode::Camera => ControlMode::Player,
                };
                tracing::info!(control = ?self.control, "control mode toggled");
            }
            Command::TogglePhysicsDebug => {
                self.debug.toggle_physics(&self.physics);
            }
            Command::ToggleInspector => {
                self.debug.toggle_inspector();
            }
            Command::ToggleMute => {
                self.muted = !self.muted;
                tracing::info!(muted = self.muted, "music toggled");
            }
            Command::SpawnLemming => {
                let at = self
                    .physics
                    .body_position(self.player)
                    .map(|p| p + Vec3::NEG_Z * 3.0);
                match self
                    .population
                    .spawn_lemming(at, &mut self.scene, &mut self.physics)
                {
                    Ok(Some(id)) => tracing::info!(body = %id, "lemming spawned on request"),
                    Ok(None) => tracing::info!("population full"),
                    Err(e) => tracing::warn!(error = %e, "requested spawn failed"),
                }
            }
        }
    }

    /// Push the player body along `dir`; strafing also turns it.
    ///
    /// The force is applied once per held tick and the physics step
    /// integrates it over the frame, so it is not scaled by `dt` here.
    fn move_player(&mut self, dir: Vec3, right: f32) {
        let at = self.physics.body_position(self.player).unwrap_or(PLAYER_START);
        if let Err(e) = self.physics.apply_force(self.player, dir * FORCE_SCALE, at) {
            tracing::warn!(error = %e, "player force dropped");
            return;
        }
        if right != 0.0 {
            let spin = Vec3::Y * right * ANG_SCALE;
            if let Err(e) = self.physics.set_angular_velocity(self.player, spin) {
                tracing::warn!(error = %e, "player turn dropped");
            }
        }
    }

    /// Copy simulated body positions onto their nodes, as a renderer would.
    fn sync_nodes(&mut self) {
        for id in self.physics.body_ids() {
            if let Some(p) = self.physics.body_position(id) {
                if let Err(e) = self.scene.set_position(id, p) {
                    tracing::trace!(body = %id, error = %e, "body without node");
                }
            }
        }
    }

    /// Lemmings owned by this session.
    pub fn population(&self) -> &PopulationManager {
        &self.population
    }

    /// Physics world, for inspection.
    pub fn physics(&self) -> &PointMassWorld {
        &self.physics
    }

    /// Scene graph holding templates, clones and the player node.
    pub fn scene(&self) -> &MemoryScene {
        &self.scene
    }

    /// Debug viewer toggles.
    pub fn debug(&self) -> &DebugViewers {
        &self.debug
    }

    /// Input router with every session action defined.
    pub fn router(&self) -> &InputActionRouter {
        &self.router
    }

    /// Node and body id of the player.
    pub fn player(&self) -> EntityId {
        self.player
    }

    /// Player body position, `None` if the body is gone.
    pub fn player_position(&self) -> Option<Vec3> {
        self.physics.body_position(self.player)
    }

    /// Free camera position.
    pub fn camera(&self) -> Vec3 {
        self.camera
    }

    /// What movement input currently drives.
    pub fn control(&self) -> ControlMode {
        self.control
    }

    /// Whether music is muted.
    pub fn muted(&self) -> bool {
        self.muted
    }

    /// Frames run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

fn register_actions(router: &mut InputActionRouter, commands: &Rc<RefCell<VecDeque<Command>>>) {
    let moves: [(&str, f32, f32); 4] = [
        ("forward", SPEED, 0.0),
        ("back", -SPEED, 0.0),
        ("left", 0.0, -SPEED),
        ("right", 0.0, SPEED),
    ];
    for (name, forward, right) in moves {
        let queue = commands.clone();
        router.define_action(name, TriggerType::Held, move |e| {
            queue.borrow_mut().push_back(Command::Move {
                forward,
                right,
                dt: e.delta_time,
            });
        });
    }

    let toggles = [
        ("toggleControl", Command::ToggleControl),
        ("togglePhysics", Command::TogglePhysicsDebug),
        ("inspector", Command::ToggleInspector),
        ("mute", Command::ToggleMute),
        ("spawnLemming", Command::SpawnLemming),
    ];
    for (name, command) in toggles {
        let queue = commands.clone();
        router.define_action(name, TriggerType::Pressed, move |_| {
            queue.borrow_mut().push_back(command.clone());
        });
    }
}
