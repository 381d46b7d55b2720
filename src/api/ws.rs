//! WebSocket event stream
//!
//! Bridges the in-process event bus into a `tokio::sync::broadcast` channel
//! so WebSocket clients receive every committed transition live. Each
//! outgoing message carries a monotonically increasing sequence id for gap
//! detection; a client that lags behind the channel capacity is told to
//! refresh.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::bus::EventSubscriber;
use crate::types::FileModelEvent;

use super::AppState;

/// Event message sent to WebSocket clients
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WsMessage {
    /// The domain event
    #[serde(flatten)]
    pub event: FileModelEvent,

    /// Monotonically increasing sequence id for gap detection
    pub sequence_id: u64,

    /// Unix timestamp when the message was broadcast
    pub timestamp: i64,
}

/// Welcome message sent on connection
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub current_sequence_id: u64,
}

impl WelcomeMessage {
    pub fn new(current_sequence_id: u64) -> Self {
        Self {
            msg_type: "connected".to_string(),
            current_sequence_id,
        }
    }
}

/// Bus subscriber fanning events out to WebSocket clients
pub struct EventBroadcaster {
    tx: broadcast::Sender<WsMessage>,
    sequence_counter: AtomicU64,
}

impl EventBroadcaster {
    /// Create a broadcaster with the given channel capacity. Clients slower
    /// than the capacity miss events and are told to refresh.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            sequence_counter: AtomicU64::new(0),
        }
    }

    /// Fan one event out to all connected clients
    pub fn broadcast(&self, event: FileModelEvent) {
        let seq = self.sequence_counter.fetch_add(1, Ordering::SeqCst);
        let msg = WsMessage {
            event,
            sequence_id: seq,
            timestamp: chrono::Utc::now().timestamp(),
        };
        // Ignore errors - just means no receivers are connected
        let _ = self.tx.send(msg);
    }

    /// Sequence id the next broadcast will carry
    pub fn current_sequence_id(&self) -> u64 {
        self.sequence_counter.load(Ordering::SeqCst)
    }

    /// Subscribe to receive broadcast events
    pub fn subscribe(&self) -> broadcast::Receiver<WsMessage> {
        self.tx.subscribe()
    }
}

impl EventSubscriber for EventBroadcaster {
    fn name(&self) -> &str {
        "ws-broadcaster"
    }

    fn on_event(&self, event: &FileModelEvent) {
        self.broadcast(event.clone());
    }
}

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.events.subscribe();
    let welcome = WelcomeMessage::new(state.events.current_sequence_id());

    let mut send_task = tokio::spawn(async move {
        if let Ok(json) = serde_json::to_string(&welcome) {
            if sender.send(Message::Text(json)).await.is_err() {
                return; // Client disconnected immediately
            }
        }

        loop {
            match rx.recv().await {
                Ok(msg) => {
                    if let Ok(json) = serde_json::to_string(&msg) {
                        if sender.send(Message::Text(json)).await.is_err() {
                            break; // Client disconnected
                        }
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    let error_msg = serde_json::json!({
                        "type": "error",
                        "code": "lagged",
                        "message": format!("Missed {} events, please refresh", n)
                    });
                    if sender.send(Message::Text(error_msg.to_string())).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Pings are answered by the protocol layer; we only watch for the close
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if matches!(msg, Message::Close(_)) {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        ColumnType, CsvColumn, CsvFileModel, FileModel, VersionedFileModel,
    };
    use chrono::{NaiveDate, Utc};

    fn created_event() -> FileModelEvent {
        let model = FileModel::Csv(
            CsvFileModel::new(
                0,
                0,
                ",",
                vec![CsvColumn::new("accountId", ColumnType::int(), true).unwrap()],
            )
            .unwrap(),
        );
        FileModelEvent::Created {
            version: VersionedFileModel::new(
                231,
                0,
                true,
                NaiveDate::from_ymd_opt(2018, 1, 31).unwrap(),
                None,
                Utc::now(),
                "dg",
                model,
            ),
        }
    }

    #[test]
    fn test_broadcast_increments_sequence() {
        let broadcaster = EventBroadcaster::new(16);
        assert_eq!(broadcaster.current_sequence_id(), 0);

        broadcaster.broadcast(created_event());
        assert_eq!(broadcaster.current_sequence_id(), 1);
    }

    #[tokio::test]
    async fn test_subscribe_receives_events() {
        let broadcaster = EventBroadcaster::new(16);
        let mut rx = broadcaster.subscribe();

        broadcaster.broadcast(created_event());

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.sequence_id, 0);
        assert!(matches!(msg.event, FileModelEvent::Created { .. }));
    }

    #[test]
    fn test_ws_message_flattens_event() {
        let msg = WsMessage {
            event: created_event(),
            sequence_id: 42,
            timestamp: 1234567890,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"created""#));
        assert!(json.contains(r#""sequence_id":42"#));
    }
}
