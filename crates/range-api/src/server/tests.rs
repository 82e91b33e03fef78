use super::*;

use contracts::SimConfig;

fn test_controller() -> Arc<SimController> {
    Arc::new(SimController::new(SimConfig {
        seed: Some(5),
        ..SimConfig::default()
    }))
}

#[tokio::test]
async fn control_verbs_degrade_without_a_controller() {
    let state = AppState::uninitialized();

    let ack = start_sim(State(state.clone())).await.0;
    assert!(!ack.success);
    assert_eq!(ack.message, "Simulation service not initialized");

    let ack = stop_sim(State(state.clone())).await.0;
    assert!(!ack.success);

    let ack = reset_sim(State(state)).await.0;
    assert!(!ack.success);
}

#[tokio::test]
async fn status_and_step_require_a_controller() {
    let state = AppState::uninitialized();
    assert!(get_status(State(state.clone())).await.is_err());
    assert!(step_sim(State(state)).await.is_err());
}

#[tokio::test]
async fn step_route_returns_a_report_and_status_reflects_it() {
    let state = AppState::new(test_controller());

    let report = step_sim(State(state.clone())).await.expect("report").0;
    assert_eq!(report.step, 1);
    assert_eq!(report.events.len(), 2);

    let status = get_status(State(state)).await.expect("status").0;
    assert_eq!(status.step_count, 1);
    assert!(!status.running);
}

#[tokio::test]
async fn health_reports_degraded_without_a_controller() {
    let healthy = health(State(AppState::new(test_controller()))).await.0;
    assert_eq!(healthy["status"], "healthy");
    assert_eq!(healthy["simulation_running"], false);

    let degraded = health(State(AppState::uninitialized())).await.0;
    assert_eq!(degraded["status"], "degraded");
}

#[test]
fn stream_messages_serialize_with_type_tags() {
    let message = StreamMessage::warning("lagging".to_string());
    let value = serde_json::to_value(&message).expect("serialize");
    assert_eq!(value["type"], "warning");
    assert_eq!(value["payload"]["message"], "lagging");
}
