use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use lemmings_assets::{AssetError, CosmeticVariant, Palette, SceneGraph, TemplateSchema};
use lemmings_common::EntityId;

use crate::agent::{AgentController, GoalResult};
use crate::config::{AgentTuning, PopulationConfig, SimConfig};
use crate::physics::{BodyDesc, PhysicsError, PhysicsWorld};

/// Errors from a single spawn attempt. The population itself is unaffected.
#[derive(Debug, thiserror::Error)]
pub enum SpawnError {
    #[error("no base template: population not initialized or template disposed")]
    MissingTemplate,
    #[error("population already initialized")]
    AlreadyInitialized,
    #[error("asset error: {0}")]
    Asset(#[from] AssetError),
    #[error("physics error: {0}")]
    Physics(#[from] PhysicsError),
}

/// Where a lemming is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Body exists but is pinned until the next tick, after one render pass.
    PendingActivation,
    /// Simulated and steering.
    Active,
}

/// One member of the population.
#[derive(Debug, Clone)]
pub struct Lemming {
    name: String,
    controller: AgentController,
    phase: Phase,
    variant: CosmeticVariant,
    exempt: bool,
}

impl Lemming {
    /// Scene name, `lemming_{n}` for spawns.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Node id, shared with the physics body.
    pub fn body(&self) -> EntityId {
        self.controller.body()
    }

    /// Steering state and goal progress.
    pub fn controller(&self) -> &AgentController {
        &self.controller
    }

    /// Whether the agent is still pinned or already live.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Cosmetic choices applied at spawn. Empty for the base.
    pub fn variant(&self) -> &CosmeticVariant {
        &self.variant
    }

    /// The base template agent is never removed.
    pub fn is_base(&self) -> bool {
        self.exempt
    }
}

/// Running totals kept across ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopulationStats {
    pub ticks: u64,
    pub spawned_total: u64,
    pub reaped_total: u64,
    pub failed_spawns: u64,
}

/// What one [`PopulationManager::tick`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub activated: usize,
    pub updated: usize,
    /// Names of agents removed after reaching their goal.
    pub removed: Vec<String>,
    pub spawned: Option<EntityId>,
}

/// Owns the lemming population: ticks controllers, reaps finished agents
/// and spawns new ones on a timer under a ceiling.
///
/// Per tick: pending agents go live, live agents update, achieved agents
/// (except the base) are removed, then the spawn timer is checked. Removal
/// precedes the ceiling check so a reaped agent frees its slot that tick.
#[derive(Debug)]
pub struct PopulationManager {
    config: PopulationConfig,
    tuning: AgentTuning,
    palette: Palette,
    /// Base template's part-slot lookup, resolved once in `init`.
    template: Option<TemplateSchema>,
    agents: Vec<Lemming>,
    since_last_spawn: f32,
    next_serial: u64,
    rng: SmallRng,
    stats: PopulationStats,
}

impl PopulationManager {
    /// Empty population; call [`PopulationManager::init`] before ticking.
    pub fn new(config: &SimConfig, palette: Palette) -> Self {
        Self {
            config: config.population.clone(),
            tuning: config.agent.clone(),
            palette,
            template: None,
            agents: Vec::new(),
            since_last_spawn: 0.0,
            next_serial: 0,
            rng: SmallRng::seed_from_u64(config.seed),
            stats: PopulationStats::default(),
        }
    }

    /// Turn the loaded template into the base agent at the spawn anchor.
    ///
    /// The base is live immediately, counts toward the ceiling and is never
    /// removed. Later spawns clone it.
    pub fn init(
        &mut self,
        template: EntityId,
        scene: &mut dyn SceneGraph,
        physics: &mut dyn PhysicsWorld,
    ) -> Result<EntityId, SpawnError> {
        if self.template.is_some() {
            return Err(SpawnError::AlreadyInitialized);
        }
        let name = scene
            .name(template)
            .ok_or(SpawnError::MissingTemplate)?
            .to_string();
        let schema = TemplateSchema::resolve(&*scene, template)?;
        let anchor = self.config.spawn_anchor;
        scene.set_position(template, anchor)?;
        physics.create_body(template, anchor, BodyDesc::lemming());

        let controller =
            AgentController::new(template, self.config.goal, &self.tuning, &mut self.rng);
        tracing::info!(agent = %name, speed = controller.speed(), "base lemming ready");
        self.agents.push(Lemming {
            name,
            controller,
            phase: Phase::Active,
            variant: CosmeticVariant::default(),
            exempt: true,
        });
        self.template = Some(schema);
        Ok(template)
    }

    /// Advance the population by one frame. Faults are logged per agent and
    /// never abort the tick.
    pub fn tick(
        &mut self,
        delta_time: f32,
        scene: &mut dyn SceneGraph,
        physics: &mut dyn PhysicsWorld,
    ) -> TickReport {
        let _span = tracing::info_span!("population_tick").entered();
        let mut report = TickReport::default();
        self.stats.ticks += 1;

        // Agents spawned last tick have been through one render pass.
        for agent in self
            .agents
            .iter_mut()
            .filter(|a| a.phase == Phase::PendingActivation)
        {
            activate(agent, self.config.initial_impulse, &mut self.rng, physics);
            report.activated += 1;
        }

        // The borrow on `agents` rules out spawns or removals mid-iteration.
        for agent in self.agents.iter_mut().filter(|a| a.phase == Phase::Active) {
            let result = agent.controller.update(delta_time, physics);
            if result == GoalResult::Achieved && !agent.exempt {
                tracing::debug!(agent = %agent.name, "lemming reached goal");
            }
            report.updated += 1;
        }

        let (finished, alive): (Vec<Lemming>, Vec<Lemming>) = std::mem::take(&mut self.agents)
            .into_iter()
            .partition(|a| !a.exempt && a.controller.last_result() == GoalResult::Achieved);
        self.agents = alive;
        for agent in finished {
            release(&agent, scene, physics);
            self.stats.reaped_total += 1;
            report.removed.push(agent.name);
        }

        if self.agents.len() < self.config.max_lemmings {
            self.since_last_spawn += delta_time;
            if self.since_last_spawn >= self.config.spawn_interval {
                self.since_last_spawn = 0.0;
                match self.spawn_lemming(None, scene, physics) {
                    Ok(spawned) => report.spawned = spawned,
                    Err(e) => {
                        self.stats.failed_spawns += 1;
                        tracing::warn!(error = %e, "timed spawn failed");
                    }
                }
            }
        }

        tracing::trace!(
            active = self.agents.len(),
            removed = report.removed.len(),
            spawned = report.spawned.is_some(),
            "population tick complete"
        );
        report
    }

    /// Clone the base template into a new lemming near `position` (or the
    /// spawn anchor). Returns `Ok(None)` when the population is full.
    ///
    /// The new body starts pinned; the next tick releases it with a small
    /// random impulse.
    pub fn spawn_lemming(
        &mut self,
        position: Option<Vec3>,
        scene: &mut dyn SceneGraph,
        physics: &mut dyn PhysicsWorld,
    ) -> Result<Option<EntityId>, SpawnError> {
        if self.agents.len() >= self.config.max_lemmings {
            tracing::debug!(max = self.config.max_lemmings, "population full, spawn skipped");
            return Ok(None);
        }
        let template = self
            .template
            .as_ref()
            .filter(|t| scene.contains(t.root()))
            .ok_or(SpawnError::MissingTemplate)?;

        self.next_serial += 1;
        let name = format!("lemming_{}", self.next_serial);
        let cloned = scene.clone_with_map(template.root(), &name)?;
        let schema = template.remap(&cloned);
        let node = cloned.root;

        let position = position.unwrap_or(self.config.spawn_anchor) + self.jitter();
        let variant = CosmeticVariant::random(&self.palette, &mut self.rng);
        if let Err(e) = self.dress(&schema, position, &variant, scene) {
            if let Err(cleanup) = scene.dispose(node) {
                tracing::warn!(error = %cleanup, "failed to dispose half-built clone");
            }
            return Err(e);
        }

        physics.create_body(node, position, BodyDesc::lemming());
        physics.set_pre_step(node, true)?;

        let controller = AgentController::new(node, self.config.goal, &self.tuning, &mut self.rng);
        tracing::debug!(
            agent = %name,
            speed = controller.speed(),
            x = position.x,
            z = position.z,
            "lemming spawned"
        );
        self.agents.push(Lemming {
            name,
            controller,
            phase: Phase::PendingActivation,
            variant,
            exempt: false,
        });
        self.stats.spawned_total += 1;
        Ok(Some(node))
    }

    fn dress(
        &self,
        schema: &TemplateSchema,
        position: Vec3,
        variant: &CosmeticVariant,
        scene: &mut dyn SceneGraph,
    ) -> Result<(), SpawnError> {
        scene.set_position(schema.root(), position)?;
        variant.apply(&self.palette, schema, scene)?;
        Ok(())
    }

    fn jitter(&mut self) -> Vec3 {
        let j = self.config.spawn_jitter;
        if !j.is_finite() || j <= 0.0 {
            return Vec3::ZERO;
        }
        Vec3::new(
            self.rng.random_range(-j..=j),
            0.0,
            self.rng.random_range(-j..=j),
        )
    }

    /// Every agent, base first, then in spawn order.
    pub fn agents(&self) -> &[Lemming] {
        &self.agents
    }

    /// Agent owning `body`.
    pub fn get(&self, body: EntityId) -> Option<&Lemming> {
        self.agents.iter().find(|a| a.body() == body)
    }

    /// The template agent, once initialized.
    pub fn base(&self) -> Option<&Lemming> {
        self.agents.iter().find(|a| a.exempt)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Agents spawned but not yet live.
    pub fn pending(&self) -> usize {
        self.agents
            .iter()
            .filter(|a| a.phase == Phase::PendingActivation)
            .count()
    }

    /// Seconds accumulated toward the next spawn.
    pub fn spawn_timer(&self) -> f32 {
        self.since_last_spawn
    }

    /// Totals since construction.
    pub fn stats(&self) -> PopulationStats {
        self.stats
    }

    /// Spawn settings in effect.
    pub fn config(&self) -> &PopulationConfig {
        &self.config
    }
}

fn activate(agent: &mut Lemming, impulse: f32, rng: &mut SmallRng, physics: &mut dyn PhysicsWorld) {
    agent.phase = Phase::Active;
    let body = agent.body();
    let nudge = Vec3::new(
        rng.random_range(-1.0..=1.0),
        0.0,
        rng.random_range(-1.0..=1.0),
    )
    .normalize_or_zero()
        * impulse;
    match go_live(body, nudge, physics) {
        Ok(()) => tracing::trace!(agent = %agent.name, "lemming activated"),
        Err(e) => tracing::warn!(agent = %agent.name, error = %e, "activation incomplete"),
    }
}

fn go_live(body: EntityId, nudge: Vec3, physics: &mut dyn PhysicsWorld) -> Result<(), PhysicsError> {
    let at = physics
        .body_position(body)
        .ok_or(PhysicsError::MissingBody(body))?;
    physics.set_pre_step(body, false)?;
    physics.set_angular_velocity(body, Vec3::ZERO)?;
    physics.apply_impulse(body, nudge, at)
}

fn release(agent: &Lemming, scene: &mut dyn SceneGraph, physics: &mut dyn PhysicsWorld) {
    let body = agent.body();
    if !physics.dispose_body(body) {
        tracing::warn!(agent = %agent.name, "no body to dispose");
    }
    if let Err(e) = scene.dispose(body) {
        tracing::warn!(agent = %agent.name, error = %e, "node dispose failed");
    }
    tracing::debug!(agent = %agent.name, "lemming removed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::PointMassWorld;
    use lemmings_assets::{MemoryScene, MeshManifest, PartSlot};

    struct Rig {
        scene: MemoryScene,
        physics: PointMassWorld,
        pop: PopulationManager,
    }

    impl Rig {
        fn new(config: SimConfig) -> Self {
            let mut scene = MemoryScene::new();
            let loaded = scene
                .load_manifest(&MeshManifest::new(["__root__", "Head", "Torso", "Arm_L", "Nose"]))
                .unwrap();
            let mut physics = PointMassWorld::new();
            let mut pop = PopulationManager::new(&config, Palette::lemming());
            pop.init(loaded.root, &mut scene, &mut physics).unwrap();
            Self {
                scene,
                physics,
                pop,
            }
        }

        fn tick(&mut self, dt: f32) -> TickReport {
            self.pop.tick(dt, &mut self.scene, &mut self.physics)
        }
    }

    /// Goal on the anchor, no jitter or impulse: every agent sits in goal.
    fn parked(max_lemmings: usize, spawn_interval: f32) -> SimConfig {
        let mut c = SimConfig::default();
        c.population.goal = c.population.spawn_anchor;
        c.population.spawn_jitter = 0.0;
        c.population.initial_impulse = 0.0;
        c.population.max_lemmings = max_lemmings;
        c.population.spawn_interval = spawn_interval;
        c
    }

    /// Goal far away so nobody finishes during a test.
    fn distant(max_lemmings: usize, spawn_interval: f32) -> SimConfig {
        let mut c = parked(max_lemmings, spawn_interval);
        c.population.goal = Vec3::new(500.0, 5.0, 500.0);
        c
    }

    #[test]
    fn init_creates_one_exempt_base() {
        let rig = Rig::new(SimConfig::default());
        assert_eq!(rig.pop.len(), 1);
        let base = rig.pop.base().unwrap();
        assert!(base.is_base());
        assert_eq!(base.phase(), Phase::Active);
        assert!(rig.physics.has_body(base.body()));
        assert_eq!(
            rig.physics.body_position(base.body()),
            Some(SimConfig::default().population.spawn_anchor)
        );
    }

    #[test]
    fn init_twice_is_rejected() {
        let mut rig = Rig::new(SimConfig::default());
        let template = rig.pop.base().unwrap().body();
        let err = rig
            .pop
            .init(template, &mut rig.scene, &mut rig.physics)
            .unwrap_err();
        assert!(matches!(err, SpawnError::AlreadyInitialized));
    }

    #[test]
    fn spawn_without_template_fails() {
        let mut scene = MemoryScene::new();
        let mut physics = PointMassWorld::new();
        let mut pop = PopulationManager::new(&SimConfig::default(), Palette::lemming());
        let err = pop.spawn_lemming(None, &mut scene, &mut physics).unwrap_err();
        assert!(matches!(err, SpawnError::MissingTemplate));
        assert!(pop.is_empty());
    }

    #[test]
    fn spawn_timer_accumulates_then_resets_to_zero() {
        let mut rig = Rig::new(distant(5, 2.0));
        let r = rig.tick(1.5);
        assert!(r.spawned.is_none());
        assert_eq!(rig.pop.spawn_timer(), 1.5);

        let r = rig.tick(1.5);
        assert!(r.spawned.is_some());
        assert_eq!(rig.pop.spawn_timer(), 0.0);
        assert_eq!(rig.pop.len(), 2);

        let r = rig.tick(1.0);
        assert!(r.spawned.is_none());
        assert_eq!(rig.pop.spawn_timer(), 1.0);
    }

    #[test]
    fn one_spawn_per_threshold_crossing() {
        let mut rig = Rig::new(distant(10, 1.0));
        // A single tick worth three intervals still spawns once.
        let r = rig.tick(3.0);
        assert!(r.spawned.is_some());
        assert_eq!(rig.pop.len(), 2);
    }

    #[test]
    fn ceiling_holds_with_base_counted() {
        let mut rig = Rig::new(distant(2, 1.0));
        rig.tick(1.0);
        assert_eq!(rig.pop.len(), 2);
        for _ in 0..20 {
            rig.tick(1.0);
            assert!(rig.pop.len() <= 2);
        }
        assert_eq!(rig.pop.len(), 2);
        // The timer is frozen while full.
        assert_eq!(rig.pop.spawn_timer(), 0.0);
        assert_eq!(
            rig.pop
                .spawn_lemming(None, &mut rig.scene, &mut rig.physics)
                .unwrap(),
            None
        );
    }

    #[test]
    fn new_spawn_is_pinned_until_next_tick() {
        let mut rig = Rig::new(distant(5, 1.0));
        let id = rig.tick(1.0).spawned.unwrap();
        let lemming = rig.pop.get(id).unwrap();
        assert_eq!(lemming.phase(), Phase::PendingActivation);
        assert!(rig.physics.body(id).unwrap().pre_step);
        assert_eq!(rig.pop.pending(), 1);

        let r = rig.tick(0.1);
        assert_eq!(r.activated, 1);
        assert_eq!(rig.pop.get(id).unwrap().phase(), Phase::Active);
        assert!(!rig.physics.body(id).unwrap().pre_step);
    }

    #[test]
    fn activation_applies_initial_impulse() {
        let mut config = distant(5, 1.0);
        config.population.initial_impulse = 2.0;
        let mut rig = Rig::new(config);
        let id = rig.tick(1.0).spawned.unwrap();
        assert_eq!(rig.physics.velocity(id), Some(Vec3::ZERO));
        rig.tick(0.0);
        let v = rig.physics.velocity(id).unwrap();
        assert_eq!(v.y, 0.0);
        assert!(v.length() <= 2.0 + 1e-4);
    }

    #[test]
    fn spawned_lemming_is_a_dressed_clone() {
        let mut rig = Rig::new(distant(5, 1.0));
        let id = rig.tick(1.0).spawned.unwrap();
        let lemming = rig.pop.get(id).unwrap();
        assert_eq!(lemming.name(), "lemming_1");
        assert_eq!(rig.scene.name(id), Some("lemming_1"));

        let head = rig.scene.find_by_name("lemming_1.Head").unwrap();
        let chosen = lemming.variant().choice(PartSlot::Head).unwrap();
        let expected = Palette::lemming().get(PartSlot::Head, chosen).unwrap().clone();
        assert_eq!(rig.scene.material(head), Some(&expected));
        assert!(lemming.controller().speed() >= 5.0);
        assert!(lemming.controller().speed() <= 6.5);
    }

    #[test]
    fn spawns_reuse_the_template_slot_lookup() {
        let mut rig = Rig::new(distant(5, 1.0));
        // After init the template's names no longer matter to dressing.
        let head = rig.scene.find_by_name("Head").unwrap();
        rig.scene.rename(head, "Antenna").unwrap();
        assert_eq!(PartSlot::classify("lemming_1.Antenna"), None);

        let id = rig
            .pop
            .spawn_lemming(None, &mut rig.scene, &mut rig.physics)
            .unwrap()
            .unwrap();
        let copy = rig.scene.find_by_name("lemming_1.Antenna").unwrap();
        let chosen = rig.pop.get(id).unwrap().variant().choice(PartSlot::Head).unwrap();
        let palette = Palette::lemming();
        assert_eq!(rig.scene.material(copy), palette.get(PartSlot::Head, chosen));
    }

    #[test]
    fn nan_jitter_spawns_on_the_anchor() {
        let mut config = distant(5, 1.0);
        config.population.spawn_jitter = f32::NAN;
        let mut rig = Rig::new(config);
        let id = rig.tick(1.0).spawned.unwrap();
        assert_eq!(
            rig.physics.body_position(id),
            Some(rig.pop.config().spawn_anchor)
        );
    }

    #[test]
    fn jitter_stays_within_bounds_on_ground_plane() {
        let mut config = distant(50, 1.0);
        config.population.spawn_jitter = 1.0;
        let mut rig = Rig::new(config);
        let anchor = rig.pop.config().spawn_anchor;
        for _ in 0..20 {
            let id = rig
                .pop
                .spawn_lemming(None, &mut rig.scene, &mut rig.physics)
                .unwrap()
                .unwrap();
            let p = rig.physics.body_position(id).unwrap();
            assert!((p.x - anchor.x).abs() <= 1.0);
            assert!((p.z - anchor.z).abs() <= 1.0);
            assert_eq!(p.y, anchor.y);
            assert_eq!(rig.scene.position(id), Some(p));
        }
    }

    #[test]
    fn explicit_spawn_position_is_used() {
        let mut rig = Rig::new(distant(5, 1.0));
        let at = Vec3::new(-3.0, 1.0, 4.0);
        let id = rig
            .pop
            .spawn_lemming(Some(at), &mut rig.scene, &mut rig.physics)
            .unwrap()
            .unwrap();
        assert_eq!(rig.physics.body_position(id), Some(at));
    }

    #[test]
    fn finished_lemming_is_removed_but_base_stays() {
        let mut rig = Rig::new(parked(5, 1.0));
        let id = rig.tick(1.0).spawned.unwrap();

        let mut removed = Vec::new();
        for _ in 0..10 {
            let r = rig.tick(1.0);
            removed.extend(r.removed);
            if rig.pop.get(id).is_none() {
                break;
            }
        }
        assert_eq!(removed, vec!["lemming_1".to_string()]);
        assert!(!rig.physics.has_body(id));
        assert!(!rig.scene.contains(id));
        assert!(rig.scene.find_by_name("lemming_1.Head").is_none());

        let base = rig.pop.base().unwrap();
        assert_eq!(base.controller().last_result(), GoalResult::Achieved);
        assert!(rig.pop.stats().reaped_total >= 1);
    }

    #[test]
    fn removal_happens_in_the_tick_that_observes_achieved() {
        let mut rig = Rig::new(parked(5, 100.0));
        let id = rig
            .pop
            .spawn_lemming(None, &mut rig.scene, &mut rig.physics)
            .unwrap()
            .unwrap();
        // activate + 1.0 in goal, 2.0, 3.0, then 4.0 > goal_time
        for _ in 0..3 {
            assert!(rig.tick(1.0).removed.is_empty());
            assert_eq!(
                rig.pop.get(id).unwrap().controller().last_result(),
                GoalResult::InGoal
            );
        }
        let r = rig.tick(1.0);
        assert_eq!(r.removed, vec!["lemming_1".to_string()]);
        assert!(rig.pop.get(id).is_none());
    }

    #[test]
    fn reaping_frees_a_slot_in_the_same_tick() {
        let mut rig = Rig::new(parked(2, 1.0));
        let first = rig.tick(1.0).spawned.unwrap();
        let mut replacement = None;
        for _ in 0..10 {
            let r = rig.tick(1.0);
            if !r.removed.is_empty() {
                replacement = r.spawned;
                break;
            }
        }
        assert!(rig.pop.get(first).is_none());
        assert!(replacement.is_some());
        assert_eq!(rig.pop.len(), 2);
    }

    #[test]
    fn disposed_template_fails_only_that_spawn() {
        let mut rig = Rig::new(distant(5, 1.0));
        let base = rig.pop.base().unwrap().body();
        rig.scene.dispose(base).unwrap();
        let r = rig.tick(1.0);
        assert!(r.spawned.is_none());
        assert_eq!(rig.pop.stats().failed_spawns, 1);
        assert_eq!(rig.pop.len(), 1);
        // Ticking carries on.
        rig.tick(1.0);
        assert_eq!(rig.pop.stats().ticks, 2);
    }

    #[test]
    fn agent_without_body_does_not_block_the_others() {
        let mut rig = Rig::new(distant(5, 1.0));
        let broken = rig.tick(1.0).spawned.unwrap();
        let healthy = rig.tick(1.0).spawned.unwrap();
        rig.tick(0.5);
        assert_eq!(rig.pop.pending(), 0);

        assert!(rig.physics.dispose_body(broken));
        let goal = rig.pop.config().goal;
        let base = rig.pop.base().unwrap().body();
        let healthy_start = rig.physics.body_position(healthy).unwrap().distance(goal);
        let base_start = rig.physics.body_position(base).unwrap().distance(goal);

        let r = rig.tick(0.5);
        assert_eq!(r.updated, 3);
        assert!(r.spawned.is_some());
        assert_eq!(rig.pop.stats().ticks, 4);
        let stuck = rig.pop.get(broken).unwrap();
        assert_eq!(stuck.controller().last_result(), GoalResult::None);

        rig.physics.step(0.5);
        assert!(rig.physics.body_position(healthy).unwrap().distance(goal) < healthy_start);
        assert!(rig.physics.body_position(base).unwrap().distance(goal) < base_start);
    }

    #[test]
    fn steering_agents_move_toward_goal() {
        let mut config = SimConfig::default();
        config.population.spawn_jitter = 0.0;
        let goal = config.population.goal;
        let mut rig = Rig::new(config);
        let base = rig.pop.base().unwrap().body();
        let start = rig.physics.body_position(base).unwrap().distance(goal);
        for _ in 0..120 {
            rig.tick(1.0 / 60.0);
            rig.physics.step(1.0 / 60.0);
        }
        let now = rig.physics.body_position(base).unwrap().distance(goal);
        assert!(now < start);
    }

    #[test]
    fn same_seed_same_population() {
        let run = || {
            let mut rig = Rig::new(distant(6, 0.5));
            for _ in 0..8 {
                rig.tick(0.5);
            }
            rig.pop
                .agents()
                .iter()
                .map(|a| (a.name().to_string(), a.controller().speed()))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
