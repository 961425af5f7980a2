//! Server-sent lifecycle events for the admin dashboard

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Extension,
};
use futures::Stream;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use menu_core::domain::AuthUser;

use crate::state::AppState;

#[derive(Serialize)]
struct Lagged {
    skipped: u64,
}

/// GET /api/v1/admin/events
pub async fn event_stream(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.lifecycle.events().subscribe();
    info!("Event stream opened for session {}", user.session_id);

    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(event) => yield Ok(create_sse_event(event.name(), &event)),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event stream lagged, {} events skipped", skipped);
                    yield Ok(create_sse_event("lagged", &Lagged { skipped }));
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn create_sse_event<T: Serialize>(event_type: &str, data: &T) -> Event {
    Event::default()
        .event(event_type)
        .data(serde_json::to_string(data).unwrap_or_else(|_| "{}".to_string()))
}
