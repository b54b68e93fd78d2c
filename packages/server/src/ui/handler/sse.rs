//! Server-Sent Events handler.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{
        IntoResponse, Response,
        sse::{KeepAlive, Sse},
    },
};

use super::{identify, set_cookie_headers};
use crate::{infrastructure::event_sink::SseEventSink, ui::state::AppState};

/// `GET /c/{room_id}/sse`
///
/// Room に参加して DeliveryLoop を別タスクで動かし、そのストリームをレスポンスにする。
pub async fn room_events(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let identification = identify(&state, &headers);
    let cookies = set_cookie_headers(&identification);
    let (sink, stream) = SseEventSink::channel(state.sse_buffer);

    let delivery = match state
        .subscribe_room_usecase
        .execute(&room_id, identification.client, sink)
        .await
    {
        Ok(delivery) => delivery,
        Err(e) => {
            tracing::debug!(room_id = %room_id, "sse subscribe rejected: {}", e);
            return StatusCode::NOT_FOUND.into_response();
        }
    };
    tokio::spawn(delivery.run());

    let events = Sse::new(stream).keep_alive(KeepAlive::new().interval(state.keep_alive));
    (cookies, events).into_response()
}
