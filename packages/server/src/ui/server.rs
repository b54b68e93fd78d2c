//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::{
    handler::{
        end_page, health_check, index, new_room, post_message, room_events, room_status, view_room,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// fuse-chat HTTP server
///
/// # Example
///
/// ```ignore
/// let state = AppState::new(repository, renderer, identifier, &config);
/// Server::new(state).run(&config.bind_addr()).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// ルーティングを組み立てる
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(index))
            .route("/new", get(new_room))
            .route("/c/{room_id}", get(view_room).post(post_message))
            .route("/c/{room_id}/sse", get(room_events))
            .route("/c/{room_id}/status", get(room_status))
            .route("/end", get(end_page))
            .route("/api/health", get(health_check))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// 指定したアドレスで待ち受け、Ctrl+C / SIGTERM で停止する
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, bind_addr: &str) -> Result<(), Box<dyn std::error::Error>> {
        let listener = TcpListener::bind(bind_addr).await?;

        tracing::info!("fuse-chat server listening on {}", listener.local_addr()?);
        tracing::info!("Open: http://{}/", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;
        Ok(())
    }

    /// bind 済みの listener でサーバーを動かす
    ///
    /// `signal` が完了すると全ての Room を閉じる。開いている SSE ストリームはそれで終わり、
    /// その後 axum が残りの接続の終了を待つ。
    pub async fn serve<F>(self, listener: TcpListener, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        let state = self.state;
        let shutdown = async move {
            signal.await;
            state.close_rooms_usecase.execute().await;
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}
