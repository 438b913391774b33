use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use lemmings_common::EntityId;

use crate::config::AgentTuning;
use crate::physics::PhysicsWorld;

/// Outcome of the most recent steering update.
///
/// Legal transitions: `None -> InGoal -> Achieved`, and `InGoal -> None`
/// when the agent drifts out of the goal radius. `Achieved` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalResult {
    #[default]
    None,
    InGoal,
    Achieved,
}

impl std::fmt::Display for GoalResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::InGoal => "in_goal",
            Self::Achieved => "achieved",
        })
    }
}

/// Steers one agent toward a fixed goal and tracks dwell time there.
#[derive(Debug, Clone)]
pub struct AgentController {
    body: EntityId,
    goal: Vec3,
    speed: f32,
    time_in_goal: f32,
    last_result: GoalResult,
    tuning: AgentTuning,
}

impl AgentController {
    /// Draw the agent's speed uniformly from
    /// `[min_speed, min_speed + speed_range]`.
    pub fn new<R: Rng + ?Sized>(body: EntityId, goal: Vec3, tuning: &AgentTuning, rng: &mut R) -> Self {
        let upper = tuning.min_speed + tuning.speed_range;
        let speed = if tuning.speed_range > 0.0 && tuning.min_speed.is_finite() && upper.is_finite() {
            rng.random_range(tuning.min_speed..=upper)
        } else {
            tuning.min_speed
        };
        Self::with_speed(body, goal, speed, tuning)
    }

    /// Controller with a fixed speed instead of a random draw.
    pub fn with_speed(body: EntityId, goal: Vec3, speed: f32, tuning: &AgentTuning) -> Self {
        Self {
            body,
            goal,
            speed,
            time_in_goal: 0.0,
            last_result: GoalResult::None,
            tuning: tuning.clone(),
        }
    }

    /// Body this controller steers.
    pub fn body(&self) -> EntityId {
        self.body
    }

    /// World position the agent steers toward.
    pub fn goal(&self) -> Vec3 {
        self.goal
    }

    /// Speed drawn at construction.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Accumulated dwell time inside the goal radius, in seconds.
    pub fn time_in_goal(&self) -> f32 {
        self.time_in_goal
    }

    /// Result of the most recent update.
    pub fn last_result(&self) -> GoalResult {
        self.last_result
    }

    /// Advance one tick.
    ///
    /// Inside the goal radius dwell time accrues; outside it decays at the
    /// same rate (never below zero) and a steering force toward the goal is
    /// applied at the body's position. A tick without a body is skipped and
    /// leaves the state untouched.
    pub fn update(&mut self, delta_time: f32, physics: &mut dyn PhysicsWorld) -> GoalResult {
        if self.last_result == GoalResult::Achieved {
            return GoalResult::Achieved;
        }
        let dt = delta_time.max(0.0);
        let Some(position) = physics.body_position(self.body) else {
            tracing::trace!(body = %self.body, "no body yet, steering skipped");
            return self.last_result;
        };

        let to_goal = self.goal - position;
        let result = if to_goal.length() < self.tuning.goal_dist {
            self.time_in_goal += dt;
            // Finishing requires a tick already spent in goal.
            if self.time_in_goal > self.tuning.goal_time && self.last_result == GoalResult::InGoal {
                GoalResult::Achieved
            } else {
                GoalResult::InGoal
            }
        } else {
            self.time_in_goal = (self.time_in_goal - dt).max(0.0);
            let force = to_goal.normalize_or_zero() * self.speed * self.tuning.force_scale * dt;
            if let Err(e) = physics.apply_force(self.body, force, position) {
                tracing::warn!(body = %self.body, error = %e, "steering force dropped");
            }
            GoalResult::None
        };

        if result != self.last_result {
            tracing::debug!(
                body = %self.body,
                from = %self.last_result,
                to = %result,
                dwell = self.time_in_goal,
                "goal result changed"
            );
        }
        self.last_result = result;
        result
    }
}
