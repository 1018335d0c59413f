//! `/sse`: the per-connection stream as Server-Sent Events.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use chrono::Utc;
use futures::stream::{self, Stream, StreamExt};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use shared_types::{MessageKind, Timestamp, WireMessage};
use std::convert::Infallible;
use std::future;
use std::sync::Arc;
use threat_telemetry::FRAMES_SENT;
use tm_03_event_synthesis::{welcome_event, PairSynthesizer};
use tokio::time::Instant;
use tokio_stream::wrappers::IntervalStream;
use tracing::{info, trace, warn};

use crate::domain::session::SessionKind;
use crate::service::AppState;

/// Same sequence as `/ws`: welcome, then one `update` per interval.
///
/// The session guard and interval live inside the response stream, which
/// axum drops as soon as the client disconnects.
pub async fn sse_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let guard = state.sessions.open(SessionKind::Sse);
    info!(connection_id = %guard.id(), "SSE session opened");

    let clock = Arc::clone(&state.clock);
    let welcome = sse_event(MessageKind::Welcome, &welcome_event(Utc::now()), clock.now());

    let mut synthesizer =
        PairSynthesizer::new(Arc::clone(&state.categories), StdRng::from_entropy());
    let period = state.config.stream_interval();
    let updates = IntervalStream::new(tokio::time::interval_at(Instant::now() + period, period))
        .map(move |_| {
            trace!(connection_id = %guard.id(), "SSE update");
            let event = synthesizer.next_event(Utc::now());
            sse_event(MessageKind::Update, &event, clock.now())
        });

    let mut shutdown = state.shutdown.subscribe();
    let stream = stream::once(future::ready(welcome))
        .chain(updates)
        .take_until(async move {
            let _ = shutdown.wait_for(|stop| *stop).await;
        })
        .map(Ok::<_, Infallible>);

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn sse_event<T: Serialize>(kind: MessageKind, payload: &T, now: Timestamp) -> Event {
    let name = kind.as_str().to_string();
    let encoded = WireMessage::from_payload(kind, payload)
        .and_then(|frame| frame.with_timestamp(now).to_json());

    match encoded {
        Ok(json) => {
            FRAMES_SENT.inc();
            Event::default().event(name).data(json)
        }
        Err(error) => {
            warn!(kind = %name, error = %error, "Failed to encode SSE event");
            Event::default().comment("encode error")
        }
    }
}
