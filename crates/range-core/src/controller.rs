//! Simulation controller: the state machine boundary the API layer drives.
//!
//! One controller per process. All simulation state lives behind a single
//! `tokio::sync::Mutex`, so manual steps and the auto-step loop serialize
//! against each other; there is no unguarded mutation path. The auto-step
//! loop is a cancellable background task: `stop` signals it and then joins,
//! so a stop never returns while a step is mid-flight, and cancellation only
//! ever skips the *next* iteration, not one in progress.

use std::sync::Arc;
use std::time::Duration;

use contracts::{ControlAck, SimConfig, SimStatus, StepReport};
use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::env::RangeEnv;
use crate::policy::PolicyEngine;
use crate::sim::RangeSim;

const STREAM_CAPACITY: usize = 256;

struct AutoStepTask {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

pub struct SimController {
    sim: Arc<Mutex<RangeSim>>,
    step_delay: Duration,
    auto_step: Mutex<Option<AutoStepTask>>,
    stream_tx: broadcast::Sender<StepReport>,
}

impl SimController {
    pub fn new(config: SimConfig) -> Self {
        Self::with_sim(RangeSim::new(config))
    }

    pub fn with_sim(sim: RangeSim) -> Self {
        let (stream_tx, _) = broadcast::channel(STREAM_CAPACITY);
        let step_delay = sim.config().step_delay();
        Self {
            sim: Arc::new(Mutex::new(sim)),
            step_delay,
            auto_step: Mutex::new(None),
            stream_tx,
        }
    }

    pub async fn attach_env(&self, env: Box<dyn RangeEnv>) {
        self.sim.lock().await.attach_env(env);
    }

    pub async fn attach_policy(&self, policy: Box<dyn PolicyEngine>) {
        self.sim.lock().await.attach_policy(policy);
    }

    /// Prime observations from the adapter, if one is attached. Called once
    /// at service startup.
    pub async fn initialize(&self) {
        self.sim.lock().await.initialize().await;
    }

    /// Spawn the auto-step loop. Idempotent: calling while a loop is live is
    /// a no-op acknowledged as success.
    pub async fn start(&self) -> ControlAck {
        let mut slot = self.auto_step.lock().await;
        if let Some(running) = slot.as_ref() {
            if !running.task.is_finished() {
                return ControlAck::ok("Simulation already running");
            }
        }
        *slot = None;

        {
            let mut sim = self.sim.lock().await;
            sim.set_running(true);
            info!(status = %sim.status(), "simulation started");
        }

        let (shutdown, shutdown_rx) = watch::channel(false);
        let sim = Arc::clone(&self.sim);
        let stream_tx = self.stream_tx.clone();
        let step_delay = self.step_delay;
        let task = tokio::spawn(async move {
            let loop_task = tokio::spawn(auto_step_loop(
                Arc::clone(&sim),
                stream_tx,
                shutdown_rx,
                step_delay,
            ));
            // Fail-stop: a loop that died abnormally must not leave the
            // controller claiming to run.
            if let Err(join_error) = loop_task.await {
                error!(%join_error, "auto-step loop failed");
                sim.lock().await.set_running(false);
            }
        });

        *slot = Some(AutoStepTask { shutdown, task });
        ControlAck::ok("Simulation started")
    }

    /// Signal the auto-step loop and wait for it to finish. Acquiring the
    /// state lock to clear the running flag waits out any in-flight step, so
    /// no step side effects occur after this returns.
    pub async fn stop(&self) -> ControlAck {
        let mut slot = self.auto_step.lock().await;
        let Some(running) = slot.take() else {
            self.sim.lock().await.set_running(false);
            return ControlAck::ok("Simulation is not running");
        };

        let _ = running.shutdown.send(true);
        self.sim.lock().await.set_running(false);
        if let Err(join_error) = running.task.await {
            error!(%join_error, "auto-step loop terminated abnormally");
        }

        info!("simulation stopped");
        ControlAck::ok("Simulation stopped")
    }

    /// Stop any scheduler, then reset the simulation state. Does not restart
    /// the loop.
    pub async fn reset(&self) -> ControlAck {
        self.stop().await;

        let mut sim = self.sim.lock().await;
        sim.reset().await;
        info!(status = %sim.status(), "simulation reset");
        ControlAck::ok("Simulation reset")
    }

    /// Execute one manual step. Valid whether or not the loop is running;
    /// serialized with scheduled steps through the state lock. Leaves the
    /// running flag untouched.
    pub async fn step(&self) -> StepReport {
        let report = self.sim.lock().await.step().await;
        let _ = self.stream_tx.send(report.clone());
        report
    }

    pub async fn status(&self) -> SimStatus {
        self.sim.lock().await.status()
    }

    /// Subscribe to the stream of step reports (manual and scheduled).
    pub fn subscribe(&self) -> broadcast::Receiver<StepReport> {
        self.stream_tx.subscribe()
    }
}

async fn auto_step_loop(
    sim: Arc<Mutex<RangeSim>>,
    stream_tx: broadcast::Sender<StepReport>,
    mut shutdown: watch::Receiver<bool>,
    step_delay: Duration,
) {
    info!("auto-step loop running");
    loop {
        {
            let mut sim = sim.lock().await;
            // An episode-end reset inside a step clears the flag; the loop
            // observes it here and exits on its own.
            if !sim.is_running() {
                break;
            }
            let report = sim.step().await;
            let _ = stream_tx.send(report);
        }

        tokio::select! {
            _ = shutdown.changed() => break,
            _ = tokio::time::sleep(step_delay) => {}
        }
    }
    info!("auto-step loop exited");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> SimConfig {
        SimConfig {
            step_delay_ms: 5,
            seed: Some(7),
            ..SimConfig::default()
        }
    }

    #[tokio::test]
    async fn start_is_idempotent_while_running() {
        let controller = SimController::new(fast_config());
        let first = controller.start().await;
        let second = controller.start().await;
        assert!(first.success);
        assert!(second.success);
        assert_eq!(second.message, "Simulation already running");
        controller.stop().await;
    }

    #[tokio::test]
    async fn auto_step_loop_advances_the_step_counter() {
        let controller = SimController::new(fast_config());
        controller.start().await;
        tokio::time::sleep(Duration::from_millis(60)).await;
        controller.stop().await;

        let status = controller.status().await;
        assert!(status.step_count > 0, "loop should have stepped");
        assert!(!status.running);
    }

    #[tokio::test]
    async fn no_step_side_effects_after_stop_returns() {
        let controller = SimController::new(fast_config());
        controller.start().await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        controller.stop().await;

        let frozen = controller.status().await;
        assert!(!frozen.running);
        tokio::time::sleep(Duration::from_millis(50)).await;
        let later = controller.status().await;
        assert_eq!(frozen.step_count, later.step_count);
        assert_eq!(
            frozen.agents.attacker.reward,
            later.agents.attacker.reward
        );
    }

    #[tokio::test]
    async fn stop_while_idle_reports_success() {
        let controller = SimController::new(fast_config());
        let ack = controller.stop().await;
        assert!(ack.success);
        assert!(!controller.status().await.running);
    }

    #[tokio::test]
    async fn manual_step_leaves_running_flag_untouched() {
        let controller = SimController::new(fast_config());
        let report = controller.step().await;
        assert_eq!(report.step, 1);
        assert!(!controller.status().await.running);
    }

    #[tokio::test]
    async fn reset_stops_the_loop_and_rolls_the_episode() {
        let controller = SimController::new(fast_config());
        controller.start().await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        controller.reset().await;

        let status = controller.status().await;
        assert!(!status.running);
        assert_eq!(status.step_count, 0);
        assert_eq!(status.episode_count, 1);
        assert_eq!(status.agents.attacker.reward, 0.0);
        assert_eq!(status.agents.defender.reward, 0.0);
    }

    #[tokio::test]
    async fn subscribers_receive_manual_step_reports() {
        let controller = SimController::new(fast_config());
        let mut stream = controller.subscribe();
        let report = controller.step().await;
        let received = stream.recv().await.expect("report broadcast");
        assert_eq!(received.step, report.step);
        assert_eq!(received.events.len(), report.events.len());
    }
}
