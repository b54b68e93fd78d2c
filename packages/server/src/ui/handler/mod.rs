//! Request handlers.

mod http;
mod sse;

pub use http::{end_page, health_check, index, new_room, post_message, room_status, view_room};
pub use sse::room_events;

use axum::http::{HeaderMap, HeaderValue, header};

use crate::{domain::Identification, ui::state::AppState};

/// リクエストの `Cookie` ヘッダからクライアントを決める
fn identify(state: &AppState, headers: &HeaderMap) -> Identification {
    let cookie = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok());
    state.identifier.identify(cookie)
}

/// 新しい識別子を発行した場合の `Set-Cookie` ヘッダ
fn set_cookie_headers(identification: &Identification) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some(cookie) = &identification.set_cookie {
        match HeaderValue::from_str(cookie) {
            Ok(value) => {
                headers.insert(header::SET_COOKIE, value);
            }
            Err(e) => tracing::warn!("invalid Set-Cookie value: {}", e),
        }
    }
    headers
}
