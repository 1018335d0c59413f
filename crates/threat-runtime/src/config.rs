//! Runtime configuration: defaults plus environment overrides.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use threat_telemetry::TelemetryConfig;
use tm_04_local_dispatch::DispatchConfig;
use tm_05_stream_gateway::GatewayConfig;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub dispatch: DispatchConfig,
    pub gateway: GatewayConfig,
    pub telemetry: TelemetryConfig,
    /// JSON region array. The built-in catalog is used when unset.
    pub region_catalog: Option<PathBuf>,
}

impl RuntimeConfig {
    /// Defaults overridden from the process environment.
    ///
    /// - `FEATURE_LIMIT`, `FLOW_LIMIT`, `FLOW_TTL` (ms), `BROADCAST_INTERVAL_MS`
    /// - `TM_HOST`, `TM_PORT`, `TM_STREAM_INTERVAL_MS`
    /// - `TM_REGION_CATALOG`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self {
            telemetry: TelemetryConfig::from_env(),
            ..Default::default()
        };

        override_parsed(&lookup, "FEATURE_LIMIT", &mut config.dispatch.feature_limit);
        override_parsed(&lookup, "FLOW_LIMIT", &mut config.dispatch.flow_limit);
        override_parsed(&lookup, "FLOW_TTL", &mut config.dispatch.flow_ttl_ms);
        override_parsed(
            &lookup,
            "BROADCAST_INTERVAL_MS",
            &mut config.dispatch.broadcast_interval_ms,
        );

        if let Some(host) = lookup("TM_HOST").filter(|h| !h.trim().is_empty()) {
            config.gateway.host = host.trim().to_string();
        }
        override_parsed(&lookup, "TM_PORT", &mut config.gateway.port);
        override_parsed(
            &lookup,
            "TM_STREAM_INTERVAL_MS",
            &mut config.gateway.stream_interval_ms,
        );

        if let Some(path) = lookup("TM_REGION_CATALOG").filter(|p| !p.trim().is_empty()) {
            config.region_catalog = Some(PathBuf::from(path));
        }

        config
    }
}

fn override_parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, target: &mut T)
where
    T: FromStr,
    T::Err: Display,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => *target = value,
        Err(e) => warn!(key, value = %raw, error = %e, "Ignoring unparseable override"),
    }
}
