#[derive(Clone)]
struct AppState {
    controller: Option<Arc<SimController>>,
}

impl AppState {
    fn new(controller: Arc<SimController>) -> Self {
        Self {
            controller: Some(controller),
        }
    }

    #[cfg(test)]
    fn uninitialized() -> Self {
        Self { controller: None }
    }
}

fn require_sim(state: &AppState) -> Result<&Arc<SimController>, HttpApiError> {
    state
        .controller
        .as_ref()
        .ok_or_else(HttpApiError::service_unavailable)
}
