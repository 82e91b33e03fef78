use std::collections::BTreeMap;
use std::time::Duration;

use contracts::{EventKind, Role, Severity, SimEvent};
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::*;
use crate::actions;
use crate::env::{EnvError, Transition};
use crate::policy::PolicyError;
use crate::severity;

/// Why the real path of a decision cycle was abandoned. Faults never escape
/// the step executor; they select the mock fallback path.
#[derive(Debug, Error)]
pub enum StepFault {
    #[error("no environment adapter attached")]
    NoEnvironment,
    #[error("no observations held")]
    NoObservations,
    #[error("policy inference exceeded {0:?}")]
    PolicyTimeout(Duration),
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error(transparent)]
    Env(#[from] EnvError),
}

impl RangeSim {
    /// Execute one decision cycle. Infallible by contract: any fault on the
    /// real path falls through to the mock generator, so every invocation
    /// yields a [`StepReport`].
    pub async fn step(&mut self) -> StepReport {
        self.step_count += 1;

        if self.env.is_none() || self.observations.is_none() {
            return self.mock_step();
        }

        match self.real_step().await {
            Ok(report) => report,
            Err(fault) => {
                warn!(step = self.step_count, %fault, "step faulted, falling back to mock outcome");
                self.mock_step()
            }
        }
    }

    async fn real_step(&mut self) -> Result<StepReport, StepFault> {
        let observations = self
            .observations
            .clone()
            .ok_or(StepFault::NoObservations)?;

        let deadline = self.config.policy_timeout();
        let actions = match timeout(deadline, self.policy.predict(&observations)).await {
            Ok(result) => result?,
            Err(_) => return Err(StepFault::PolicyTimeout(deadline)),
        };

        for (agent_id, action_id) in &actions {
            let Some(role) = Role::from_agent_id(agent_id) else {
                continue;
            };
            let name = actions::action_name(role, *action_id);
            debug!(agent = %agent_id, %role, action = %name, id = action_id, "resolved action");
            *self.last_action.get_mut(role) = Some(name);
            *self.last_action_id.get_mut(role) = *action_id;
        }

        let env = self.env.as_mut().ok_or(StepFault::NoEnvironment)?;
        let Transition {
            observations,
            rewards,
            dones,
            ..
        } = env.step(&actions).await?.normalize();

        self.observations = Some(observations);

        for (agent_id, reward) in &rewards {
            if let Some(role) = Role::from_agent_id(agent_id) {
                *self.cumulative_reward.get_mut(role) += reward;
            }
        }

        let mut events = Vec::with_capacity(actions.len() + 1);
        for (agent_id, action_id) in &actions {
            let role = Role::from_agent_id(agent_id);
            // Agents outside the two roles resolve through the defender
            // table and report as defense, matching the scenario convention.
            let name = actions::action_name(role.unwrap_or(Role::Defender), *action_id);
            let kind = if role == Some(Role::Attacker) {
                EventKind::Attack
            } else {
                EventKind::Defense
            };
            events.push(SimEvent {
                kind,
                agent: agent_id.clone(),
                action: name.clone(),
                severity: severity::classify(&name),
                description: format!("{agent_id} executed {name}"),
            });
        }

        // Snapshot before any episode reset: the report for the terminal
        // step still carries the rewards and actions that ended it.
        let step = self.step_count;
        let agents = self.agent_reports();

        if dones.get(contracts::ALL_AGENTS_KEY).copied().unwrap_or(false) {
            info!(episode = self.episode_count, step, "episode ended, starting new episode");
            events.push(SimEvent {
                kind: EventKind::System,
                agent: "system".to_string(),
                action: "episode_end".to_string(),
                severity: Severity::Low,
                description: "Episode ended, starting new episode".to_string(),
            });
            self.reset().await;
        }

        Ok(StepReport {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            step,
            agents,
            events,
            node_states: BTreeMap::new(),
        })
    }

    fn mock_step(&mut self) -> StepReport {
        debug!(step = self.step_count, "running mock decision cycle");
        let outcome = mock::sample_outcome(&mut self.rng);

        for role in Role::BOTH {
            *self.cumulative_reward.get_mut(role) += *outcome.rewards.get(role);
            *self.last_action.get_mut(role) = Some(outcome.action_names.get(role).clone());
            *self.last_action_id.get_mut(role) = *outcome.action_ids.get(role);
        }

        StepReport {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            step: self.step_count,
            agents: self.agent_reports(),
            events: outcome.events,
            node_states: BTreeMap::new(),
        }
    }
}
