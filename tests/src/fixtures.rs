//! Shared builders for integration tests and benchmarks.

use rand::rngs::StdRng;
use rand::SeedableRng;
use shared_types::{Region, SystemTimeSource, TimeSource};
use std::net::SocketAddr;
use std::sync::Arc;
use tm_01_region_catalog::{CategoryTable, RegionCatalog};
use tm_04_local_dispatch::{DispatchConfig, DispatcherContext};
use tm_05_stream_gateway::{GatewayConfig, GatewayError, SessionRegistry, StreamGateway};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// The two-region catalog `[A(10,10), B(20,20)]`.
pub fn two_region_catalog() -> Arc<RegionCatalog> {
    Arc::new(RegionCatalog::from_regions(vec![
        Region::new("A", "", "", 10.0, 10.0),
        Region::new("B", "", "", 20.0, 20.0),
    ]))
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn dispatcher(config: DispatchConfig, clock: Arc<dyn TimeSource>) -> DispatcherContext {
    dispatcher_over(Arc::new(RegionCatalog::builtin()), config, clock)
}

pub fn dispatcher_over(
    catalog: Arc<RegionCatalog>,
    config: DispatchConfig,
    clock: Arc<dyn TimeSource>,
) -> DispatcherContext {
    DispatcherContext::with_rng(
        config,
        catalog,
        Arc::new(CategoryTable::builtin()),
        clock,
        seeded_rng(7),
    )
    .expect("valid dispatch config")
}

/// A gateway serving on an ephemeral (or given) loopback port.
pub struct RunningGateway {
    pub addr: SocketAddr,
    pub sessions: SessionRegistry,
    pub dispatcher: DispatcherContext,
    stop: Option<oneshot::Sender<()>>,
    server: JoinHandle<Result<(), GatewayError>>,
}

impl RunningGateway {
    pub async fn start() -> Self {
        Self::start_on(0).await
    }

    pub async fn start_on(port: u16) -> Self {
        let clock: Arc<dyn TimeSource> = Arc::new(SystemTimeSource);
        let dispatcher = dispatcher(
            DispatchConfig {
                broadcast_interval_ms: 50,
                ..Default::default()
            },
            Arc::clone(&clock),
        );
        let config = GatewayConfig {
            port,
            ..GatewayConfig::for_testing()
        };
        let gateway = StreamGateway::new(
            config,
            dispatcher.clone(),
            Arc::new(CategoryTable::builtin()),
            clock,
        )
        .expect("valid gateway config");

        let sessions = gateway.sessions();
        let listener = gateway.bind().await.expect("bind loopback");
        let addr = listener.local_addr().expect("local addr");
        let (stop, stopped) = oneshot::channel::<()>();
        let server = tokio::spawn(gateway.serve(listener, async move {
            let _ = stopped.await;
        }));

        Self {
            addr,
            sessions,
            dispatcher,
            stop: Some(stop),
            server,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("ws://{}{}", self.addr, path)
    }

    /// Trigger graceful shutdown and wait for the server task.
    pub async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        let _ = (&mut self.server).await;
    }
}
