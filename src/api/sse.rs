use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use serde::Deserialize;

use crate::infrastructure::app_state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SseParams {
    /// Room to join. Without it the stream carries every game's events.
    game_id: Option<String>,
}

pub async fn sse_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SseParams>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // Subscribe to events - use new_receiver() to get an active receiver
    let mut receiver = state.event_sender.new_receiver();
    let room = params.game_id;

    let stream = async_stream::stream! {
        tracing::debug!(room = room.as_deref(), "SSE stream started");

        // Send initial connected event
        yield Ok(Event::default()
            .event("connected")
            .data(serde_json::json!({
                "message": "Connected to SSE stream",
                "gameId": room,
                "timestamp": chrono::Utc::now().timestamp_millis()
            }).to_string()));

        let mut heartbeat_interval = tokio::time::interval(Duration::from_secs(20));

        loop {
            tokio::select! {
                _ = heartbeat_interval.tick() => {
                    tracing::trace!("SSE heartbeat");
                    // Send heartbeat comment (not a real event)
                    yield Ok(Event::default().comment("heartbeat"));
                }
                result = receiver.recv() => {
                    match result {
                        Ok(event) => {
                            // Room scoping: drop events for other games.
                            if let Some(room) = room.as_deref() {
                                if event.game_id != room {
                                    continue;
                                }
                            }
                            tracing::debug!("SSE broadcasting event: {:?}", event.event);
                            let json = serde_json::to_string(&event).unwrap_or_default();
                            yield Ok(Event::default()
                                .event(event.event.clone())
                                .data(json));
                        }
                        Err(e) => {
                            tracing::warn!("SSE receiver error: {:?}, closing stream", e);
                            // Channel closed, reconnect
                            break;
                        }
                    }
                }
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
