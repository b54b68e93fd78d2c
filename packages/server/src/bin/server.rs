//! fuse-chat server: ephemeral chat rooms that burn out after a period of silence.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin fuse-chat-server
//! cargo run --bin fuse-chat-server -- --host 0.0.0.0 --port 3000 --idle-timeout-secs 120
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use fuse_chat_server::{
    config::ServerConfig,
    domain::RoomConfig,
    infrastructure::{
        identity::CookieClientIdentifier, renderer::HtmlMessageRenderer,
        repository::InMemoryRoomRepository,
    },
    ui::{AppState, Server},
};
use fuse_chat_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "fuse-chat-server")]
#[command(about = "Ephemeral chat server over Server-Sent Events", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Seconds of silence after which a room expires
    #[arg(long, default_value = "60")]
    idle_timeout_secs: u64,

    /// Per-connection delivery queue size
    #[arg(long, default_value = "64")]
    queue_capacity: usize,

    /// Number of messages kept per room (0 = unbounded)
    #[arg(long, default_value = "512")]
    history_limit: usize,

    /// Interval of SSE keep-alive comments
    #[arg(long, default_value = "15")]
    keep_alive_secs: u64,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        ServerConfig {
            host: self.host,
            port: self.port,
            room: RoomConfig {
                idle_timeout: Duration::from_secs(self.idle_timeout_secs),
                queue_capacity: self.queue_capacity,
                history_limit: (self.history_limit > 0).then_some(self.history_limit),
            },
            keep_alive: Duration::from_secs(self.keep_alive_secs),
            ..ServerConfig::default()
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = Args::parse().into_config();
    if config.room.idle_timeout.is_zero() {
        tracing::error!("--idle-timeout-secs must be greater than zero");
        std::process::exit(1);
    }

    // Initialize dependencies in order:
    // 1. Repository
    // 2. Renderer / Identifier
    // 3. AppState (UseCases)
    // 4. Server
    let repository = Arc::new(InMemoryRoomRepository::new(
        config.room,
        Arc::new(SystemClock),
    ));
    let renderer = Arc::new(HtmlMessageRenderer::new());
    let identifier = Arc::new(CookieClientIdentifier::default());

    let state = AppState::new(repository, renderer, identifier, &config);

    let server = Server::new(state);
    if let Err(e) = server.run(&config.bind_addr()).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
