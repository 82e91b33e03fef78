async fn health(State(state): State<AppState>) -> Json<Value> {
    match state.controller.as_ref() {
        Some(controller) => {
            let status = controller.status().await;
            Json(json!({
                "status": "healthy",
                "simulation_running": status.running,
            }))
        }
        None => Json(json!({
            "status": "degraded",
            "simulation_running": false,
        })),
    }
}

async fn get_status(State(state): State<AppState>) -> Result<Json<SimStatus>, HttpApiError> {
    let controller = require_sim(&state)?;
    Ok(Json(controller.status().await))
}

// Control verbs report failure in-band: an uninitialized service yields a
// failed acknowledgement rather than a transport error.
async fn start_sim(State(state): State<AppState>) -> Json<ControlAck> {
    match require_sim(&state) {
        Ok(controller) => Json(controller.start().await),
        Err(_) => Json(ControlAck::failed("Simulation service not initialized")),
    }
}

async fn stop_sim(State(state): State<AppState>) -> Json<ControlAck> {
    match require_sim(&state) {
        Ok(controller) => Json(controller.stop().await),
        Err(_) => Json(ControlAck::failed("Simulation service not initialized")),
    }
}

async fn reset_sim(State(state): State<AppState>) -> Json<ControlAck> {
    match require_sim(&state) {
        Ok(controller) => Json(controller.reset().await),
        Err(_) => Json(ControlAck::failed("Simulation service not initialized")),
    }
}

async fn step_sim(State(state): State<AppState>) -> Result<Json<StepReport>, HttpApiError> {
    let controller = require_sim(&state)?;
    Ok(Json(controller.step().await))
}
