//! Simulation orchestration engine for the attacker/defender cyber range.
//!
//! Drives the simulation one decision cycle at a time: policy inference,
//! environment transition, result normalization, action decoding, severity
//! classification, and episode lifecycle — degrading to a synthetic mock
//! path whenever the real backends are unavailable or fault.

pub mod actions;
pub mod controller;
pub mod env;
pub mod mock;
pub mod policy;
pub mod severity;
pub mod sim;

pub use controller::SimController;
pub use sim::{RangeSim, StepFault};
