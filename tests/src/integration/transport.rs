//! # Transport Integration Tests
//!
//! Stream gateway and resilient client talking over real loopback sockets.
//!
//! ```text
//! ResilientClient ──ws──▶ StreamGateway (/ws, /ws/live)
//!        ▲                      │
//!        └──── welcome, update, snapshot, pong
//! ```

#[cfg(test)]
mod tests {
    use crate::fixtures::RunningGateway;
    use serde_json::json;
    use shared_types::{AttackEvent, ConnectionStatus, MessageKind};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tm_02_event_store::StoreSnapshot;
    use tm_06_resilient_client::{ClientConfig, ClientEvent, ResilientClient};
    use tokio::sync::broadcast;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(5);

    fn client_config(url: String) -> ClientConfig {
        ClientConfig {
            reconnect_delay: 50,
            max_reconnect_delay: 200,
            max_reconnect_attempts: 20,
            heartbeat_interval: 0,
            ..ClientConfig::new(url)
        }
    }

    async fn next_event(
        events: &mut broadcast::Receiver<ClientEvent>,
        pred: impl Fn(&ClientEvent) -> bool,
    ) -> ClientEvent {
        timeout(WAIT, async {
            loop {
                match events.recv().await {
                    Ok(event) if pred(&event) => return event,
                    Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => panic!("client event stream closed"),
                }
            }
        })
        .await
        .expect("timed out waiting for client event")
    }

    async fn next_frame(
        events: &mut broadcast::Receiver<ClientEvent>,
        kind: MessageKind,
    ) -> shared_types::WireMessage {
        match next_event(events, |e| matches!(e, ClientEvent::Message(m) if m.kind == kind)).await
        {
            ClientEvent::Message(message) => message,
            _ => unreachable!(),
        }
    }

    async fn wait_for_sessions(gateway: &RunningGateway, expected: usize) {
        timeout(WAIT, async {
            while gateway.sessions.count() != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("session count never settled");
    }

    // =========================================================================
    // DEMO STREAM (/ws)
    // =========================================================================

    #[tokio::test]
    async fn test_client_receives_welcome_then_updates() {
        let gateway = RunningGateway::start().await;
        let client = ResilientClient::new(client_config(gateway.url("/ws"))).expect("client");
        let mut events = client.events();

        let updates = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&updates);
        client.on(MessageKind::Update, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        client.connect().expect("connect");
        next_event(&mut events, |e| matches!(e, ClientEvent::Connected)).await;
        assert_eq!(client.status(), ConnectionStatus::Connected);

        let welcome = next_frame(&mut events, MessageKind::Welcome).await;
        welcome.payload::<AttackEvent>().expect("welcome carries an attack event");

        let update = next_frame(&mut events, MessageKind::Update).await;
        let attack: AttackEvent = update.payload().expect("update carries an attack event");
        assert_ne!(attack.source.name, attack.destination.name);
        assert!(update.timestamp.is_some());
        assert!(updates.load(Ordering::SeqCst) >= 1);

        client.disconnect().expect("disconnect");
        gateway.stop().await;
    }

    #[tokio::test]
    async fn test_ping_is_answered_with_pong() {
        let gateway = RunningGateway::start().await;
        let client = ResilientClient::new(client_config(gateway.url("/ws"))).expect("client");
        let mut events = client.events();

        client.connect().expect("connect");
        next_event(&mut events, |e| matches!(e, ClientEvent::Connected)).await;
        assert!(client.last_pong().is_none());

        client.send(MessageKind::Ping, json!({})).expect("send ping");
        next_frame(&mut events, MessageKind::Pong).await;
        assert!(client.last_pong().is_some());

        client.disconnect().expect("disconnect");
        gateway.stop().await;
    }

    #[tokio::test]
    async fn test_heartbeat_keeps_last_pong_fresh() {
        let gateway = RunningGateway::start().await;
        let config = ClientConfig {
            heartbeat_interval: 100,
            ..client_config(gateway.url("/ws"))
        };
        let client = ResilientClient::new(config).expect("client");
        let mut events = client.events();

        client.connect().expect("connect");
        next_frame(&mut events, MessageKind::Pong).await;
        let first = client.last_pong().expect("pong recorded");

        next_frame(&mut events, MessageKind::Pong).await;
        let second = client.last_pong().expect("pong recorded");
        assert!(second >= first);

        client.disconnect().expect("disconnect");
        gateway.stop().await;
    }

    #[tokio::test]
    async fn test_disconnect_releases_gateway_session() {
        let gateway = RunningGateway::start().await;
        let client = ResilientClient::new(client_config(gateway.url("/ws"))).expect("client");
        let mut events = client.events();

        client.connect().expect("connect");
        next_event(&mut events, |e| matches!(e, ClientEvent::Connected)).await;
        wait_for_sessions(&gateway, 1).await;

        client.disconnect().expect("disconnect");
        let closed = next_event(&mut events, |e| matches!(e, ClientEvent::Disconnected { .. })).await;
        assert_eq!(
            closed,
            ClientEvent::Disconnected {
                code: Some(1000),
                reason: "client disconnect".to_string(),
            }
        );
        wait_for_sessions(&gateway, 0).await;
        assert_eq!(client.status(), ConnectionStatus::Disconnected);

        gateway.stop().await;
    }

    #[tokio::test]
    async fn test_queued_frames_flush_once_connected() {
        let gateway = RunningGateway::start().await;
        let client = ResilientClient::new(client_config(gateway.url("/ws"))).expect("client");
        let mut events = client.events();

        // Queued before any connection exists; the gateway answers the ping.
        client.send(MessageKind::Ping, json!({})).expect("queue ping");

        client.connect().expect("connect");
        next_frame(&mut events, MessageKind::Pong).await;
        assert_eq!(client.connection_info().queued_messages, 0);

        client.disconnect().expect("disconnect");
        gateway.stop().await;
    }

    #[tokio::test]
    async fn test_client_reconnects_after_gateway_restart() {
        let gateway = RunningGateway::start().await;
        let port = gateway.addr.port();
        let client = ResilientClient::new(client_config(gateway.url("/ws"))).expect("client");
        let mut events = client.events();

        client.connect().expect("connect");
        next_event(&mut events, |e| matches!(e, ClientEvent::Connected)).await;

        gateway.stop().await;
        next_event(&mut events, |e| matches!(e, ClientEvent::Reconnecting { .. })).await;

        let restarted = RunningGateway::start_on(port).await;
        next_event(&mut events, |e| matches!(e, ClientEvent::Connected)).await;
        next_frame(&mut events, MessageKind::Welcome).await;
        assert_eq!(client.connection_info().reconnect_attempts, 0);

        client.disconnect().expect("disconnect");
        restarted.stop().await;
    }

    // =========================================================================
    // LIVE STREAM (/ws/live)
    // =========================================================================

    #[tokio::test]
    async fn test_live_stream_starts_with_snapshot() {
        let gateway = RunningGateway::start().await;
        gateway.dispatcher.tick();

        let client =
            ResilientClient::new(client_config(gateway.url("/ws/live"))).expect("client");
        let mut events = client.events();
        client.connect().expect("connect");

        let snapshot: StoreSnapshot = next_frame(&mut events, MessageKind::Snapshot)
            .await
            .payload()
            .expect("snapshot payload");
        assert_eq!(snapshot.flows.len(), 1);
        assert_eq!(snapshot.features.len(), 2);

        let update = next_frame(&mut events, MessageKind::Update).await;
        update
            .payload::<AttackEvent>()
            .expect("live update carries an attack event");

        client.disconnect().expect("disconnect");
        wait_for_sessions(&gateway, 0).await;
        gateway.stop().await;
    }
}
