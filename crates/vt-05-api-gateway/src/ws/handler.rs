//! WebSocket handler streaming ranked tally snapshots.
//!
//! Each connection holds one [`TallySubscription`]; the server sends a JSON
//! array of `{name, count}` on every tick. The subscription is dropped when
//! the client goes away, which unsubscribes it from the shared ticker.

use crate::service::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};
use vt_04_tally_reporter::{Snapshot, TallySubscription};

/// `GET /ws`
pub async fn push_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let subscription = state.broadcaster.subscribe();
    ws.on_upgrade(move |socket| PushSession::new(subscription).run(socket))
}

/// One push connection.
pub struct PushSession {
    subscription: TallySubscription,
}

impl PushSession {
    pub fn new(subscription: TallySubscription) -> Self {
        Self { subscription }
    }

    /// Forward snapshots until either side closes.
    pub async fn run(mut self, socket: WebSocket) {
        info!("Push connection opened");
        let (mut sender, mut receiver) = socket.split();

        loop {
            tokio::select! {
                snapshot = self.subscription.recv() => {
                    let Some(snapshot) = snapshot else {
                        debug!("Push broadcaster gone");
                        let _ = sender.send(Message::Close(None)).await;
                        break;
                    };
                    let text = match encode(&snapshot) {
                        Ok(text) => text,
                        Err(e) => {
                            warn!(error = %e, "Failed to encode snapshot");
                            continue;
                        }
                    };
                    if let Err(e) = sender.send(Message::Text(text)).await {
                        debug!(error = %e, "Push send failed, closing");
                        break;
                    }
                }
                incoming = receiver.next() => {
                    match incoming {
                        Some(Ok(Message::Close(_))) | None => break,
                        Some(Err(e)) => {
                            debug!(error = %e, "Push connection error");
                            break;
                        }
                        // Pings are answered by the protocol layer; other
                        // client frames are ignored.
                        Some(Ok(_)) => {}
                    }
                }
            }
        }

        info!("Push connection closed");
    }
}

fn encode(snapshot: &Snapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string(snapshot.as_slice())
}
