//! Environment-adapter boundary and step-result normalization.
//!
//! The simulated network is external to this engine; it is consumed through
//! [`RangeEnv`]. Adapters report transitions in one of two historical shapes
//! (a 4-field and a 5-field layout); [`RawTransition`] admits exactly those
//! two and [`RawTransition::normalize`] collapses them into the canonical
//! [`Transition`] the step executor works with.

use std::collections::BTreeMap;

use async_trait::async_trait;
use contracts::ALL_AGENTS_KEY;
use serde_json::Value;
use thiserror::Error;

pub type Observations = BTreeMap<String, Value>;
pub type ActionMap = BTreeMap<String, i64>;
pub type RewardMap = BTreeMap<String, f64>;
pub type DoneMap = BTreeMap<String, bool>;

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("environment transition failed: {0}")]
    Transition(String),
    #[error("step result payload is not an array")]
    NotAnArray,
    #[error("step result field `{0}` is not an object")]
    FieldNotAnObject(&'static str),
    #[error("non-numeric reward for agent `{0}`")]
    NonNumericReward(String),
    #[error("non-boolean completion flag for key `{0}`")]
    NonBooleanFlag(String),
    #[error("unrecognized step result shape: expected 4 or 5 fields, got {0}")]
    UnexpectedShape(usize),
}

#[async_trait]
pub trait RangeEnv: Send + Sync {
    /// Begin a fresh episode and return the initial per-agent observations.
    async fn reset(&mut self) -> Result<Observations, EnvError>;

    /// Apply one joint action and return the raw transition.
    async fn step(&mut self, actions: &ActionMap) -> Result<RawTransition, EnvError>;
}

/// The two step-result shapes the boundary admits.
#[derive(Debug, Clone, PartialEq)]
pub enum RawTransition {
    Step4 {
        observations: Observations,
        rewards: RewardMap,
        dones: DoneMap,
        infos: Value,
    },
    Step5 {
        observations: Observations,
        rewards: RewardMap,
        terminated: DoneMap,
        truncated: DoneMap,
        infos: Value,
    },
}

/// Canonical transition: observations, per-agent rewards, folded completion
/// flags, and opaque infos.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub observations: Observations,
    pub rewards: RewardMap,
    pub dones: DoneMap,
    pub infos: Value,
}

impl Transition {
    /// Whether the episode as a whole is complete.
    pub fn episode_done(&self) -> bool {
        self.dones.get(ALL_AGENTS_KEY).copied().unwrap_or(false)
    }
}

impl RawTransition {
    /// Decode a JSON step payload. Accepts the 4-field and 5-field layouts;
    /// any other arity is an unrecognized shape, fatal for the invocation.
    pub fn from_value(payload: &Value) -> Result<Self, EnvError> {
        let fields = payload.as_array().ok_or(EnvError::NotAnArray)?;
        match fields.len() {
            4 => Ok(RawTransition::Step4 {
                observations: decode_observations(&fields[0])?,
                rewards: decode_rewards(&fields[1])?,
                dones: decode_flags(&fields[2], "dones")?,
                infos: fields[3].clone(),
            }),
            5 => Ok(RawTransition::Step5 {
                observations: decode_observations(&fields[0])?,
                rewards: decode_rewards(&fields[1])?,
                terminated: decode_flags(&fields[2], "terminated")?,
                truncated: decode_flags(&fields[3], "truncated")?,
                infos: fields[4].clone(),
            }),
            other => Err(EnvError::UnexpectedShape(other)),
        }
    }

    /// Collapse to the canonical transition. The 5-field layout folds
    /// `terminated` and `truncated` into `dones` over the union of their
    /// keys, `__all__` included.
    pub fn normalize(self) -> Transition {
        match self {
            RawTransition::Step4 {
                observations,
                rewards,
                dones,
                infos,
            } => Transition {
                observations,
                rewards,
                dones,
                infos,
            },
            RawTransition::Step5 {
                observations,
                rewards,
                terminated,
                truncated,
                infos,
            } => {
                let mut dones = DoneMap::new();
                for key in terminated.keys().chain(truncated.keys()) {
                    let done = terminated.get(key).copied().unwrap_or(false)
                        || truncated.get(key).copied().unwrap_or(false);
                    dones.insert(key.clone(), done);
                }
                Transition {
                    observations,
                    rewards,
                    dones,
                    infos,
                }
            }
        }
    }
}

/// Decode a JSON reset payload. Adapters report either the observation map
/// itself or a tuple whose first element is that map; both are accepted.
pub fn observations_from_reset_value(payload: &Value) -> Result<Observations, EnvError> {
    match payload {
        Value::Array(fields) => decode_observations(
            fields
                .first()
                .ok_or(EnvError::FieldNotAnObject("observations"))?,
        ),
        other => decode_observations(other),
    }
}

fn decode_observations(value: &Value) -> Result<Observations, EnvError> {
    let map = value
        .as_object()
        .ok_or(EnvError::FieldNotAnObject("observations"))?;
    Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
}

fn decode_rewards(value: &Value) -> Result<RewardMap, EnvError> {
    let map = value
        .as_object()
        .ok_or(EnvError::FieldNotAnObject("rewards"))?;
    let mut rewards = RewardMap::new();
    for (agent_id, raw) in map {
        let reward = raw
            .as_f64()
            .ok_or_else(|| EnvError::NonNumericReward(agent_id.clone()))?;
        rewards.insert(agent_id.clone(), reward);
    }
    Ok(rewards)
}

fn decode_flags(value: &Value, field: &'static str) -> Result<DoneMap, EnvError> {
    let map = value.as_object().ok_or(EnvError::FieldNotAnObject(field))?;
    let mut flags = DoneMap::new();
    for (key, raw) in map {
        let flag = match raw {
            Value::Bool(flag) => *flag,
            // Numeric truthiness, as adapters bridging foreign runtimes emit.
            Value::Number(number) => number.as_f64().map(|v| v != 0.0).unwrap_or(false),
            _ => return Err(EnvError::NonBooleanFlag(key.clone())),
        };
        flags.insert(key.clone(), flag);
    }
    Ok(flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn four_field_payload_decodes_directly() {
        let payload = json!([
            {"attacker_0": [0.0], "defender_0": [0.0]},
            {"attacker_0": 1, "defender_0": -0.25},
            {"attacker_0": false, "defender_0": false, "__all__": false},
            {}
        ]);

        let transition = RawTransition::from_value(&payload)
            .expect("decode")
            .normalize();
        assert_eq!(transition.rewards["attacker_0"], 1.0);
        assert_eq!(transition.rewards["defender_0"], -0.25);
        assert!(!transition.episode_done());
    }

    #[test]
    fn five_field_payload_folds_union_of_keys() {
        let payload = json!([
            {"attacker_0": [0.0]},
            {"attacker_0": 0.5},
            {"attacker_0": false, "__all__": false},
            {"attacker_0": false, "defender_0": true, "__all__": true},
            {}
        ]);

        let transition = RawTransition::from_value(&payload)
            .expect("decode")
            .normalize();
        // defender_0 appears only in `truncated` and must still be folded in.
        assert_eq!(transition.dones["defender_0"], true);
        assert_eq!(transition.dones["attacker_0"], false);
        assert!(transition.episode_done());
    }

    #[test]
    fn other_arities_are_rejected() {
        for arity in [0usize, 1, 2, 3, 6, 7] {
            let payload = Value::Array(vec![json!({}); arity]);
            match RawTransition::from_value(&payload) {
                Err(EnvError::UnexpectedShape(got)) => assert_eq!(got, arity),
                other => panic!("expected shape error for arity {arity}, got {other:?}"),
            }
        }
    }

    #[test]
    fn reset_payloads_accept_bare_maps_and_tuples() {
        let bare = json!({"attacker_0": [0.0], "defender_0": [0.0]});
        let tupled = json!([{"attacker_0": [0.0], "defender_0": [0.0]}, {"info": "reset"}]);

        let from_bare = observations_from_reset_value(&bare).expect("bare map");
        let from_tuple = observations_from_reset_value(&tupled).expect("tuple");
        assert_eq!(from_bare, from_tuple);
        assert!(from_bare.contains_key("attacker_0"));
    }

    #[test]
    fn non_numeric_reward_is_a_shape_error() {
        let payload = json!([
            {},
            {"attacker_0": "high"},
            {},
            {}
        ]);
        assert!(matches!(
            RawTransition::from_value(&payload),
            Err(EnvError::NonNumericReward(agent)) if agent == "attacker_0"
        ));
    }

    #[test]
    fn numeric_completion_flags_coerce_by_truthiness() {
        let payload = json!([
            {},
            {},
            {"attacker_0": 1, "defender_0": 0, "__all__": 1},
            {}
        ]);
        let transition = RawTransition::from_value(&payload)
            .expect("decode")
            .normalize();
        assert!(transition.dones["attacker_0"]);
        assert!(!transition.dones["defender_0"]);
        assert!(transition.episode_done());
    }
}
