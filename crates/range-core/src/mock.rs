//! Synthetic outcome generation for mock mode.
//!
//! When no environment adapter is available, or the real path faults, the
//! step executor draws a plausible outcome from here instead. The generated
//! shape is observationally identical to a real decision cycle so callers
//! cannot distinguish the two paths.

use contracts::{EventKind, PerRole, Role, Severity, SimEvent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

use crate::actions;
use crate::env::Observations;

pub const DEFAULT_ATTACKER_ID: &str = "attacker_0";
pub const DEFAULT_DEFENDER_ID: &str = "defender_0";

/// Inclusive upper bounds of the mock action id ranges.
pub const MAX_MOCK_ATTACKER_ACTION: i64 = 3;
pub const MAX_MOCK_DEFENDER_ACTION: i64 = 5;

const MOCK_OBSERVATION_LEN: usize = 100;

pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Zero observation vectors for the default agent pair, standing in for a
/// real network reset when no adapter is wired.
pub fn mock_observations() -> Observations {
    [DEFAULT_ATTACKER_ID, DEFAULT_DEFENDER_ID]
        .into_iter()
        .map(|agent_id| (agent_id.to_string(), json!(vec![0.0_f64; MOCK_OBSERVATION_LEN])))
        .collect()
}

/// One sampled mock decision cycle, before it is applied to simulation state.
#[derive(Debug, Clone, PartialEq)]
pub struct MockOutcome {
    pub action_ids: PerRole<i64>,
    pub action_names: PerRole<String>,
    pub rewards: PerRole<f64>,
    pub events: Vec<SimEvent>,
}

/// Draw a mock outcome: attacker action uniform in [0, 3], defender action
/// uniform in [0, 5], rewards uniform in [-0.5, 1.0). The attack event's
/// severity is randomized among {low, medium, high} rather than classified —
/// an intentional simplification of the synthetic path only; the defense
/// event is pinned to low.
pub fn sample_outcome(rng: &mut StdRng) -> MockOutcome {
    let attacker_action = rng.gen_range(0..=MAX_MOCK_ATTACKER_ACTION);
    let defender_action = rng.gen_range(0..=MAX_MOCK_DEFENDER_ACTION);

    let attacker_name = actions::action_name(Role::Attacker, attacker_action);
    let defender_name = actions::action_name(Role::Defender, defender_action);

    let rewards = PerRole {
        attacker: rng.gen_range(-0.5..1.0),
        defender: rng.gen_range(-0.5..1.0),
    };

    let attack_severity = [Severity::Low, Severity::Medium, Severity::High][rng.gen_range(0..3)];

    let events = vec![
        SimEvent {
            kind: EventKind::Attack,
            agent: DEFAULT_ATTACKER_ID.to_string(),
            action: attacker_name.clone(),
            severity: attack_severity,
            description: format!("Attacker executed {attacker_name}"),
        },
        SimEvent {
            kind: EventKind::Defense,
            agent: DEFAULT_DEFENDER_ID.to_string(),
            action: defender_name.clone(),
            severity: Severity::Low,
            description: format!("Defender executed {defender_name}"),
        },
    ];

    MockOutcome {
        action_ids: PerRole {
            attacker: attacker_action,
            defender: defender_action,
        },
        action_names: PerRole {
            attacker: attacker_name,
            defender: defender_name,
        },
        rewards,
        events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampled_ids_stay_within_role_ranges() {
        let mut rng = rng_from_seed(Some(7));
        for _ in 0..500 {
            let outcome = sample_outcome(&mut rng);
            assert!((0..=MAX_MOCK_ATTACKER_ACTION).contains(&outcome.action_ids.attacker));
            assert!((0..=MAX_MOCK_DEFENDER_ACTION).contains(&outcome.action_ids.defender));
            assert!((-0.5..1.0).contains(&outcome.rewards.attacker));
            assert!((-0.5..1.0).contains(&outcome.rewards.defender));
        }
    }

    #[test]
    fn outcome_carries_one_attack_and_one_defense_event() {
        let mut rng = rng_from_seed(Some(11));
        for _ in 0..100 {
            let outcome = sample_outcome(&mut rng);
            assert_eq!(outcome.events.len(), 2);
            assert_eq!(outcome.events[0].kind, EventKind::Attack);
            assert_eq!(outcome.events[1].kind, EventKind::Defense);
            assert_eq!(outcome.events[1].severity, Severity::Low);
            assert!(matches!(
                outcome.events[0].severity,
                Severity::Low | Severity::Medium | Severity::High
            ));
        }
    }

    #[test]
    fn mock_observations_cover_the_default_agent_pair() {
        let observations = mock_observations();
        assert_eq!(observations.len(), 2);
        let attacker = observations[DEFAULT_ATTACKER_ID]
            .as_array()
            .expect("vector observation");
        assert_eq!(attacker.len(), MOCK_OBSERVATION_LEN);
    }

    #[test]
    fn seeded_rng_reproduces_outcomes() {
        let mut a = rng_from_seed(Some(1337));
        let mut b = rng_from_seed(Some(1337));
        for _ in 0..20 {
            assert_eq!(sample_outcome(&mut a), sample_outcome(&mut b));
        }
    }
}
