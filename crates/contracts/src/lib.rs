//! v1 cross-boundary contracts for the simulation core, API, and CLI.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SCHEMA_VERSION_V1: &str = "1.0";

/// Key under which an environment transition reports episode-wide completion.
pub const ALL_AGENTS_KEY: &str = "__all__";

/// The substring of an agent identifier preceding the first underscore.
/// Agent identifiers are composed as `<role>_<instance>`; an identifier with
/// no underscore is its own prefix.
pub fn agent_role_prefix(agent_id: &str) -> &str {
    agent_id.split('_').next().unwrap_or(agent_id)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Attacker,
    Defender,
}

impl Role {
    pub const BOTH: [Role; 2] = [Role::Attacker, Role::Defender];

    /// Derive the role from an agent identifier. Identifiers whose prefix is
    /// neither `attacker` nor `defender` have no role; callers decide whether
    /// to skip or degrade.
    pub fn from_agent_id(agent_id: &str) -> Option<Self> {
        match agent_role_prefix(agent_id) {
            "attacker" => Some(Role::Attacker),
            "defender" => Some(Role::Defender),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Attacker => "attacker",
            Role::Defender => "defender",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pair of per-role values keyed by [`Role`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PerRole<T> {
    pub attacker: T,
    pub defender: T,
}

impl<T> PerRole<T> {
    pub fn get(&self, role: Role) -> &T {
        match role {
            Role::Attacker => &self.attacker,
            Role::Defender => &self.defender,
        }
    }

    pub fn get_mut(&mut self, role: Role) -> &mut T {
        match role {
            Role::Attacker => &mut self.attacker,
            Role::Defender => &mut self.defender,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Attack,
    Defense,
    System,
}

/// One observable occurrence within a decision cycle. Events are generated
/// fresh each step and never persisted by the core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub agent: String,
    pub action: String,
    pub severity: Severity,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgentReport {
    pub reward: f64,
    pub action: Option<String>,
}

/// Result of one decision cycle, real or mock. `agents` carries the
/// cumulative per-role rewards as of the end of the cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepReport {
    pub schema_version: String,
    pub step: u64,
    pub agents: PerRole<AgentReport>,
    pub events: Vec<SimEvent>,
    #[serde(default)]
    pub node_states: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgentSnapshot {
    pub reward: f64,
    pub last_action: Option<String>,
    pub last_action_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimStatus {
    pub schema_version: String,
    pub running: bool,
    pub step_count: u64,
    pub episode_count: u64,
    pub agents: PerRole<AgentSnapshot>,
}

impl fmt::Display for SimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "running={} step={} episode={} attacker_reward={:.2} defender_reward={:.2}",
            self.running,
            self.step_count,
            self.episode_count,
            self.agents.attacker.reward,
            self.agents.defender.reward
        )
    }
}

/// Acknowledgement returned by the control operations (start/stop/reset).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ControlAck {
    pub schema_version: String,
    pub success: bool,
    pub message: String,
}

impl ControlAck {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            success: false,
            message: message.into(),
        }
    }
}

fn default_step_delay_ms() -> u64 {
    2000
}

fn default_policy_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimConfig {
    pub schema_version: String,
    /// Inter-step delay of the auto-step loop.
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,
    /// Deadline applied around each policy inference call.
    #[serde(default = "default_policy_timeout_ms")]
    pub policy_timeout_ms: u64,
    /// Seed for the mock fallback generator. Unset draws from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    pub notes: Option<String>,
}

impl SimConfig {
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    pub fn policy_timeout(&self) -> Duration {
        Duration::from_millis(self.policy_timeout_ms)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            step_delay_ms: default_step_delay_ms(),
            policy_timeout_ms: default_policy_timeout_ms(),
            seed: None,
            notes: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ServiceUnavailable,
    InvalidQuery,
    InvalidCommand,
    InternalError,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    pub schema_version: String,
    pub error_code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(error_code: ErrorCode, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            error_code,
            message: message.into(),
            details,
        }
    }
}
