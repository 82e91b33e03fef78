//! Policy-inference boundary.
//!
//! The orchestration engine does not load or run models itself; it consumes
//! this trait. Implementations are expected to return a benign default action
//! rather than failing when no usable policy is available — the step executor
//! tolerates either outcome by routing failures to the mock fallback path.

use async_trait::async_trait;
use thiserror::Error;

use crate::env::{ActionMap, Observations};

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("inference backend failed: {0}")]
    Backend(String),
}

#[async_trait]
pub trait PolicyEngine: Send + Sync {
    /// Map per-agent observations to per-agent action ids.
    async fn predict(&mut self, observations: &Observations) -> Result<ActionMap, PolicyError>;
}

/// Baseline policy used when no trained backend is wired in: action id 0
/// (`do-nothing`) for every observed agent.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoNothingPolicy;

#[async_trait]
impl PolicyEngine for DoNothingPolicy {
    async fn predict(&mut self, observations: &Observations) -> Result<ActionMap, PolicyError> {
        Ok(observations
            .keys()
            .map(|agent_id| (agent_id.clone(), 0))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn do_nothing_policy_covers_every_observed_agent() {
        let observations: Observations = [
            ("attacker_0".to_string(), json!([0.0, 0.0])),
            ("defender_0".to_string(), json!([0.0, 0.0])),
        ]
        .into_iter()
        .collect();

        let mut policy = DoNothingPolicy;
        let actions = policy.predict(&observations).await.expect("predict");
        assert_eq!(actions.len(), 2);
        assert!(actions.values().all(|id| *id == 0));
    }
}
