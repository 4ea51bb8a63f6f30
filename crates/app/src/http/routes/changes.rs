use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::warn;

use crate::state::AppState;
use bugboard_core::domain::changes::{Change, RealtimeEvent};

pub async fn recent_changes(State(state): State<AppState>) -> Json<Vec<Change>> {
    Json(state.changes.recent().await)
}

/// Server-sent events mirroring the realtime change channel.
pub async fn change_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.changes.subscribe()).filter_map(|item| match item {
        Ok(event) => to_sse_event(&event),
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            warn!(skipped, "change stream subscriber lagged");
            None
        }
    });
    Sse::new(stream.map(Ok)).keep_alive(KeepAlive::default())
}

fn to_sse_event(event: &RealtimeEvent) -> Option<Event> {
    let name = match event {
        RealtimeEvent::Open => "open",
        RealtimeEvent::Closed { .. } => "closed",
        RealtimeEvent::Change(_) => "change",
    };
    match Event::default().event(name).json_data(event) {
        Ok(event) => Some(event),
        Err(err) => {
            warn!(error = %err, "failed to encode change event");
            None
        }
    }
}
