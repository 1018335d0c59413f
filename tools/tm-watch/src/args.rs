//! Command-line arguments.

use clap::Parser;
use tm_06_resilient_client::ClientConfig;

/// Print live attack events from a threat-map server
#[derive(Parser, Debug)]
#[command(name = "tm-watch")]
#[command(about = "Subscribe to a threat-map stream and print attack events")]
pub struct Args {
    /// WebSocket endpoint (`/ws` for a private stream, `/ws/live` for the shared feed)
    #[arg(short, long, env = "TM_WATCH_URL", default_value = "ws://127.0.0.1:8787/ws")]
    pub url: String,

    /// Bearer token sent in the Authorization header
    #[arg(short, long, env = "TM_WATCH_TOKEN")]
    pub token: Option<String>,

    /// Fixed 5 s retry, no heartbeat, no outbound queue
    #[arg(long)]
    pub basic: bool,

    /// Give up after this many reconnect attempts
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Print raw frames as JSON
    #[arg(long)]
    pub json: bool,
}

impl Args {
    pub fn client_config(&self) -> ClientConfig {
        let mut config = if self.basic {
            ClientConfig::basic(&self.url)
        } else {
            ClientConfig::new(&self.url)
        };
        config.auth_token = self.token.clone();
        if let Some(max) = self.max_attempts {
            config.max_reconnect_attempts = max;
        }
        config
    }
}
