// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Realtime delivery hub.
//!
//! Maps a user ID to their live event stream, if any. Delivery is
//! strictly best-effort: a user without a connection, or whose stream has
//! gone away, just doesn't get the event. Nothing here can fail a
//! caller's request.

use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;

/// One event pushed to a connected client.
#[derive(Debug, Clone, Serialize)]
pub struct RealtimeEvent {
    pub event: String,
    pub payload: Value,
}

/// Concurrency-safe registry of live user connections.
///
/// Shared across all request handlers within this instance; clones share
/// the same registry.
#[derive(Clone, Default)]
pub struct RealtimeHub {
    connections: Arc<DashMap<String, mpsc::UnboundedSender<RealtimeEvent>>>,
}

impl RealtimeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a live connection for a user, returning its event stream.
    ///
    /// A newer connection replaces an older one; the stale stream ends.
    pub fn subscribe(&self, user_id: &str) -> mpsc::UnboundedReceiver<RealtimeEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.connections.insert(user_id.to_string(), tx);
        tracing::debug!(user_id, "Realtime connection registered");
        rx
    }

    /// Drop a user's connection, if registered.
    pub fn disconnect(&self, user_id: &str) {
        self.connections.remove(user_id);
        tracing::debug!(user_id, "Realtime connection removed");
    }

    /// Deliver an event to a user if currently reachable; drop otherwise.
    pub fn notify(&self, user_id: &str, event: &str, payload: Value) {
        let Some(tx) = self.connections.get(user_id).map(|e| e.value().clone()) else {
            tracing::debug!(user_id, event, "No live connection, event dropped");
            return;
        };

        let sent = tx.send(RealtimeEvent {
            event: event.to_string(),
            payload,
        });

        if sent.is_err() {
            // The receiving stream was dropped without an explicit
            // disconnect; clean up the dead entry.
            self.connections.remove(user_id);
            tracing::debug!(user_id, event, "Connection gone, event dropped");
        }
    }

    /// Number of currently registered connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}
