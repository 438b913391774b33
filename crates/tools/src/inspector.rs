use lemmings_common::EntityId;
use lemmings_kernel::{GoalResult, Phase, PhysicsWorld, PopulationManager};

/// Read-only queries against a population for debugging and CLI output.
pub struct PopulationInspector;

impl PopulationInspector {
    /// Counts and totals for the whole population.
    pub fn summary(pop: &PopulationManager) -> PopulationSummary {
        let stats = pop.stats();
        let in_goal = pop
            .agents()
            .iter()
            .filter(|a| a.controller().last_result() == GoalResult::InGoal)
            .count();
        PopulationSummary {
            ticks: stats.ticks,
            active: pop.len(),
            pending: pop.pending(),
            in_goal,
            max: pop.config().max_lemmings,
            spawned_total: stats.spawned_total,
            reaped_total: stats.reaped_total,
            failed_spawns: stats.failed_spawns,
            spawn_timer: pop.spawn_timer(),
        }
    }

    /// Details for one agent, `None` if `id` is not in the population.
    pub fn inspect_agent(
        pop: &PopulationManager,
        physics: &dyn PhysicsWorld,
        id: EntityId,
    ) -> Option<AgentInfo> {
        pop.get(id).map(|a| {
            let c = a.controller();
            AgentInfo {
                id,
                name: a.name().to_string(),
                position: physics.body_position(id).map(|p| p.to_array()),
                distance_to_goal: physics.body_position(id).map(|p| p.distance(c.goal())),
                speed: c.speed(),
                time_in_goal: c.time_in_goal(),
                result: c.last_result(),
                pending: a.phase() == Phase::PendingActivation,
                base: a.is_base(),
            }
        })
    }

    /// Every agent, in spawn order.
    pub fn list_agents(pop: &PopulationManager, physics: &dyn PhysicsWorld) -> Vec<AgentInfo> {
        pop.agents()
            .iter()
            .filter_map(|a| Self::inspect_agent(pop, physics, a.body()))
            .collect()
    }
}

/// Summary of population state for the inspector.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationSummary {
    pub ticks: u64,
    pub active: usize,
    pub pending: usize,
    pub in_goal: usize,
    pub max: usize,
    pub spawned_total: u64,
    pub reaped_total: u64,
    pub failed_spawns: u64,
    pub spawn_timer: f32,
}

impl std::fmt::Display for PopulationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Population: tick={} active={}/{} pending={} in_goal={} spawned={} reaped={} failed={} timer={:.2}s",
            self.ticks,
            self.active,
            self.max,
            self.pending,
            self.in_goal,
            self.spawned_total,
            self.reaped_total,
            self.failed_spawns,
            self.spawn_timer,
        )
    }
}

/// Detailed info about a single lemming.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentInfo {
    pub id: EntityId,
    pub name: String,
    pub position: Option<[f32; 3]>,
    pub distance_to_goal: Option<f32>,
    pub speed: f32,
    pub time_in_goal: f32,
    pub result: GoalResult,
    pub pending: bool,
    pub base: bool,
}

impl std::fmt::Display for AgentInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:<12} [{}]", self.name, self.id.short())?;
        match self.position {
            Some(p) => write!(f, " pos=({:.2}, {:.2}, {:.2})", p[0], p[1], p[2])?,
            None => write!(f, " pos=<no body>")?,
        }
        if let Some(d) = self.distance_to_goal {
            write!(f, " dist={d:.2}")?;
        }
        write!(
            f,
            " speed={:.2} dwell={:.2}s result={}",
            self.speed, self.time_in_goal, self.result
        )?;
        if self.pending {
            write!(f, " (pending)")?;
        }
        if self.base {
            write!(f, " (base)")?;
        }
        Ok(())
    }
}
