async fn stream_sim(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, HttpApiError> {
    let controller = require_sim(&state)?.clone();
    let initial_message = StreamMessage::sim_status(&controller.status().await);
    let reports = controller.subscribe();

    Ok(ws.on_upgrade(move |socket| stream_socket(socket, reports, initial_message)))
}

async fn stream_socket(
    mut socket: WebSocket,
    mut reports: broadcast::Receiver<StepReport>,
    initial_message: StreamMessage,
) {
    if send_stream_message(&mut socket, &initial_message)
        .await
        .is_err()
    {
        return;
    }

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Ping(payload))) => {
                        if socket.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => {
                        break;
                    }
                    _ => {}
                }
            }
            outgoing = reports.recv() => {
                match outgoing {
                    Ok(report) => {
                        if send_stream_message(&mut socket, &StreamMessage::step_report(&report))
                            .await
                            .is_err()
                        {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "stream client lagged");
                        let warning = StreamMessage::warning(format!(
                            "stream client lagged and skipped {skipped} report(s)"
                        ));

                        if send_stream_message(&mut socket, &warning).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        break;
                    }
                }
            }
        }
    }
}

async fn send_stream_message(
    socket: &mut WebSocket,
    message: &StreamMessage,
) -> Result<(), axum::Error> {
    let payload = serde_json::to_string(message).map_err(axum::Error::new)?;
    socket.send(Message::Text(payload.into())).await
}

#[derive(Debug, Clone, Serialize)]
struct StreamMessage {
    schema_version: String,
    #[serde(rename = "type")]
    message_type: String,
    payload: Value,
}

impl StreamMessage {
    fn sim_status(status: &SimStatus) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            message_type: "sim.status".to_string(),
            payload: json!(status),
        }
    }

    fn step_report(report: &StepReport) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            message_type: "step.report".to_string(),
            payload: json!(report),
        }
    }

    fn warning(warning: String) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            message_type: "warning".to_string(),
            payload: json!({ "message": warning }),
        }
    }
}
