//! `/ws`: one synthesizer and one interval per connection.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared_types::MessageKind;
use std::sync::Arc;
use tm_03_event_synthesis::{welcome_event, PairSynthesizer};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::info;

use super::{classify, send_frame, send_payload, Incoming};
use crate::domain::session::SessionKind;
use crate::service::AppState;

pub async fn stream_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| run_stream_session(socket, state))
}

/// Drive one `/ws` connection until the peer leaves or the server shuts
/// down. The interval lives on this task's stack and is dropped with it.
pub async fn run_stream_session(mut socket: WebSocket, state: AppState) {
    let guard = state.sessions.open(SessionKind::Stream);
    let id = guard.id();
    info!(connection_id = %id, "Stream session opened");

    let mut shutdown = state.shutdown.subscribe();
    let mut synthesizer =
        PairSynthesizer::new(Arc::clone(&state.categories), StdRng::from_entropy());

    let welcome = welcome_event(Utc::now());
    if !send_payload(&mut socket, id, MessageKind::Welcome, &welcome, state.clock.now()).await {
        info!(connection_id = %id, "Stream session closed before welcome");
        return;
    }

    let period = state.config.stream_interval();
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let event = synthesizer.next_event(Utc::now());
                if !send_payload(&mut socket, id, MessageKind::Update, &event, state.clock.now()).await {
                    break;
                }
            }
            incoming = socket.recv() => {
                match classify(id, incoming, state.config.max_message_size, state.clock.now()) {
                    Incoming::Continue => {}
                    Incoming::Reply(frame) => {
                        if !send_frame(&mut socket, id, &frame).await {
                            break;
                        }
                    }
                    Incoming::Close => break,
                }
            }
            _ = async { let _ = shutdown.wait_for(|stop| *stop).await; } => {
                let _ = socket.send(Message::Close(None)).await;
                break;
            }
        }
    }

    info!(connection_id = %id, "Stream session closed");
}
