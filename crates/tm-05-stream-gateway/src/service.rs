//! Stream gateway service: router assembly, bind and graceful shutdown.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use shared_types::TimeSource;
use std::future::Future;
use std::sync::Arc;
use threat_telemetry::gather_text;
use tm_01_region_catalog::CategoryTable;
use tm_02_event_store::StoreSnapshot;
use tm_04_local_dispatch::DispatcherContext;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::domain::config::GatewayConfig;
use crate::domain::error::GatewayError;
use crate::domain::session::SessionRegistry;
use crate::middleware::create_cors_layer;
use crate::sse::sse_handler;
use crate::ws::live::live_handler;
use crate::ws::stream::stream_handler;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub dispatcher: DispatcherContext,
    pub categories: Arc<CategoryTable>,
    pub clock: Arc<dyn TimeSource>,
    pub sessions: SessionRegistry,
    /// Flips to `true` once the server starts draining. Sessions subscribe
    /// and close themselves.
    pub shutdown: Arc<watch::Sender<bool>>,
}

pub struct StreamGateway {
    state: AppState,
}

impl StreamGateway {
    pub fn new(
        config: GatewayConfig,
        dispatcher: DispatcherContext,
        categories: Arc<CategoryTable>,
        clock: Arc<dyn TimeSource>,
    ) -> Result<Self, GatewayError> {
        config.validate()?;

        let (shutdown, _) = watch::channel(false);
        Ok(Self {
            state: AppState {
                config: Arc::new(config),
                dispatcher,
                categories,
                clock,
                sessions: SessionRegistry::new(),
                shutdown: Arc::new(shutdown),
            },
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.state.config
    }

    pub fn sessions(&self) -> SessionRegistry {
        self.state.sessions.clone()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/ws", get(stream_handler))
            .route("/ws/live", get(live_handler))
            .route("/sse", get(sse_handler))
            .route("/snapshot", get(snapshot))
            .route("/health", get(health_check))
            .route("/metrics", get(metrics))
            .layer(create_cors_layer(&self.state.config.cors))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind the configured address.
    pub async fn bind(&self) -> Result<TcpListener, GatewayError> {
        let addr = format!("{}:{}", self.state.config.host, self.state.config.port);
        TcpListener::bind(&addr)
            .await
            .map_err(|source| GatewayError::Bind { addr, source })
    }

    /// Ask every open session to close.
    pub fn shutdown(&self) {
        self.state.shutdown.send_replace(true);
    }

    /// Serve until `signal` resolves, then close sessions and drain.
    pub async fn serve<F>(self, listener: TcpListener, signal: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.router();
        let shutdown = Arc::clone(&self.state.shutdown);

        match listener.local_addr() {
            Ok(addr) => info!(addr = %addr, "Stream gateway listening"),
            Err(e) => error!(error = %e, "Stream gateway listening on unknown address"),
        }

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                signal.await;
                info!("Shutdown requested; closing sessions");
                shutdown.send_replace(true);
            })
            .await
            .map_err(GatewayError::Serve)?;

        info!("Stream gateway stopped");
        Ok(())
    }
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "sessions": state.sessions.count(),
        "dispatcher": {
            "running": state.dispatcher.is_running(),
            "subscribers": state.dispatcher.subscriber_count(),
            "synthesis_enabled": state.dispatcher.is_synthesis_enabled(),
        },
    }))
}

async fn snapshot(State(state): State<AppState>) -> Json<StoreSnapshot> {
    Json(state.dispatcher.snapshot())
}

async fn metrics() -> Response {
    match gather_text() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
