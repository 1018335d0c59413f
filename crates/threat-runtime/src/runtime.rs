//! Process wiring.

use anyhow::{Context, Result};
use shared_types::{SystemTimeSource, TimeSource};
use std::sync::Arc;
use tm_01_region_catalog::{CategoryTable, RegionCatalog};
use tm_04_local_dispatch::DispatcherContext;
use tm_05_stream_gateway::StreamGateway;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::config::RuntimeConfig;

pub struct ThreatRuntime {
    dispatcher: DispatcherContext,
    gateway: StreamGateway,
}

impl ThreatRuntime {
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        let catalog = Arc::new(load_catalog(&config));
        if !catalog.supports_synthesis() {
            warn!(
                regions = catalog.len(),
                "Region catalog too small; dispatcher ticks will be no-ops"
            );
        }

        let categories = Arc::new(CategoryTable::builtin());
        let clock: Arc<dyn TimeSource> = Arc::new(SystemTimeSource);

        let dispatcher = DispatcherContext::new(
            config.dispatch,
            catalog,
            Arc::clone(&categories),
            Arc::clone(&clock),
        )
        .context("invalid dispatcher configuration")?;

        let gateway = StreamGateway::new(config.gateway, dispatcher.clone(), categories, clock)
            .context("invalid gateway configuration")?;

        Ok(Self {
            dispatcher,
            gateway,
        })
    }

    pub fn dispatcher(&self) -> &DispatcherContext {
        &self.dispatcher
    }

    pub fn gateway(&self) -> &StreamGateway {
        &self.gateway
    }

    /// Bind and serve until `shutdown` flips to `true` (or its sender drops).
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let listener = self.gateway.bind().await?;
        self.gateway
            .serve(listener, async move {
                let _ = shutdown.wait_for(|stop| *stop).await;
            })
            .await?;

        info!(
            subscribers = self.dispatcher.subscriber_count(),
            "Runtime stopped"
        );
        Ok(())
    }
}

/// The configured catalog, or the built-in one when unset or unreadable.
fn load_catalog(config: &RuntimeConfig) -> RegionCatalog {
    let Some(path) = &config.region_catalog else {
        return RegionCatalog::builtin();
    };

    match RegionCatalog::load_json(path) {
        Ok(catalog) => {
            info!(
                path = %path.display(),
                regions = catalog.len(),
                rejected = catalog.rejected(),
                "Region catalog loaded"
            );
            catalog
        }
        Err(e) => {
            warn!(error = %e, "Falling back to built-in region catalog");
            RegionCatalog::builtin()
        }
    }
}
