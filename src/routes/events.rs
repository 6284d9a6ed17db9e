// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Server-sent events stream for realtime tips and goal updates.

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Extension, Router,
};
use futures_util::stream::{self, Stream, StreamExt};
use std::convert::Infallible;
use std::sync::Arc;

use crate::middleware::auth::AuthUser;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/events", get(subscribe))
}

/// Open the realtime event stream for the authenticated user.
///
/// Browsers authenticate this with the session cookie (EventSource cannot
/// set headers). A new stream replaces any previous one for the same
/// user; delivery is best-effort while the stream is open.
async fn subscribe(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let rx = state.realtime.subscribe(&user.user_id);

    let events = stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|event| (event, rx))
    })
    .map(|event| {
        Ok(Event::default()
            .event(event.event)
            .data(event.payload.to_string()))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
