//! Simulation state machine.
//!
//! `RangeSim` owns every piece of mutable simulation state: step and episode
//! counters, the running flag, held observations, and the per-role cumulative
//! reward / last-action ledgers. It is created once at service initialization
//! and logically (never physically) recreated by [`RangeSim::reset`]. All
//! mutation goes through the controller's single lock; see
//! [`crate::controller`].

mod step;

use contracts::{
    AgentReport, AgentSnapshot, PerRole, SimConfig, SimStatus, StepReport, SCHEMA_VERSION_V1,
};
use rand::rngs::StdRng;
use tracing::warn;

use crate::env::{Observations, RangeEnv};
use crate::mock;
use crate::policy::{DoNothingPolicy, PolicyEngine};

pub use step::StepFault;

pub struct RangeSim {
    config: SimConfig,
    policy: Box<dyn PolicyEngine>,
    env: Option<Box<dyn RangeEnv>>,
    rng: StdRng,
    running: bool,
    step_count: u64,
    episode_count: u64,
    observations: Option<Observations>,
    cumulative_reward: PerRole<f64>,
    last_action: PerRole<Option<String>>,
    last_action_id: PerRole<i64>,
}

impl RangeSim {
    pub fn new(config: SimConfig) -> Self {
        let rng = mock::rng_from_seed(config.seed);
        Self {
            config,
            policy: Box::new(DoNothingPolicy),
            env: None,
            rng,
            running: false,
            step_count: 0,
            episode_count: 0,
            observations: None,
            cumulative_reward: PerRole::default(),
            last_action: PerRole::default(),
            last_action_id: PerRole::default(),
        }
    }

    pub fn attach_env(&mut self, env: Box<dyn RangeEnv>) {
        self.env = Some(env);
    }

    pub fn attach_policy(&mut self, policy: Box<dyn PolicyEngine>) {
        self.policy = policy;
    }

    /// Prime observations from the adapter without consuming an episode.
    /// Without an adapter (or when its reset fails) observations stay absent
    /// and stepping runs on the mock path until a reset installs them.
    pub async fn initialize(&mut self) {
        if self.observations.is_some() {
            return;
        }
        if let Some(env) = self.env.as_mut() {
            match env.reset().await {
                Ok(observations) => self.observations = Some(observations),
                Err(error) => {
                    warn!(%error, "environment reset failed during initialization");
                }
            }
        }
    }

    /// Reset the simulation: forces the running flag off, zeroes the step
    /// counter and reward/action ledgers, increments the episode counter, and
    /// re-initializes observations from the adapter (or the mock generator
    /// when none is available or it fails).
    pub async fn reset(&mut self) {
        self.running = false;
        self.step_count = 0;
        self.episode_count += 1;
        self.cumulative_reward = PerRole::default();
        self.last_action = PerRole::default();
        self.last_action_id = PerRole::default();

        self.observations = Some(match self.env.as_mut() {
            Some(env) => match env.reset().await {
                Ok(observations) => observations,
                Err(error) => {
                    warn!(%error, "environment reset failed, using mock observations");
                    mock::mock_observations()
                }
            },
            None => mock::mock_observations(),
        });
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn status(&self) -> SimStatus {
        SimStatus {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            running: self.running,
            step_count: self.step_count,
            episode_count: self.episode_count,
            agents: PerRole {
                attacker: AgentSnapshot {
                    reward: self.cumulative_reward.attacker,
                    last_action: self.last_action.attacker.clone(),
                    last_action_id: self.last_action_id.attacker,
                },
                defender: AgentSnapshot {
                    reward: self.cumulative_reward.defender,
                    last_action: self.last_action.defender.clone(),
                    last_action_id: self.last_action_id.defender,
                },
            },
        }
    }

    fn agent_reports(&self) -> PerRole<AgentReport> {
        PerRole {
            attacker: AgentReport {
                reward: self.cumulative_reward.attacker,
                action: self.last_action.attacker.clone(),
            },
            defender: AgentReport {
                reward: self.cumulative_reward.defender,
                action: self.last_action.defender.clone(),
            },
        }
    }
}
