//! HTTP endpoint handlers.

use std::sync::Arc;

use axum::{
    Form, Json,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
};

use super::{identify, set_cookie_headers};
use crate::{
    infrastructure::{
        dto::http::{HealthDto, PostMessageForm, RoomStatusDto},
        renderer::html::{ENDED_PAGE, INDEX_PAGE},
    },
    ui::state::AppState,
    usecase::{PostMessageError, ViewRoomError},
};

/// htmx のポーリングを止めるステータスコード
const STOP_POLLING: u16 = 286;
const ENDED_PATH: &str = "/end";

pub async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

pub async fn end_page() -> Html<&'static str> {
    Html(ENDED_PAGE)
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
        rooms: state.get_room_status_usecase.count_rooms().await,
    })
}

/// 新しい Room を作って `302 Found` でチャットページへ送る
pub async fn new_room(State(state): State<Arc<AppState>>) -> Response {
    match state.create_room_usecase.execute().await {
        Ok(room_id) => {
            let location = format!("/c/{}", room_id);
            match HeaderValue::from_str(&location) {
                Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
                Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            }
        }
        Err(e) => {
            tracing::error!("failed to create room: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// チャットページ
pub async fn view_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let identification = identify(&state, &headers);
    let cookies = set_cookie_headers(&identification);

    match state
        .view_room_usecase
        .execute(&room_id, &identification.client)
        .await
    {
        Ok(page) => (cookies, Html(page)).into_response(),
        Err(ViewRoomError::RoomNotFound) => (StatusCode::NOT_FOUND, cookies).into_response(),
        Err(e @ ViewRoomError::RenderFailed(_)) => {
            tracing::error!(room_id = %room_id, "{}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// メッセージ投稿（フォームの `message` フィールド）
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
    Form(form): Form<PostMessageForm>,
) -> Response {
    let identification = identify(&state, &headers);
    let cookies = set_cookie_headers(&identification);

    let status = match state
        .post_message_usecase
        .execute(&room_id, identification.client, form.message)
        .await
    {
        Ok(_) => StatusCode::NO_CONTENT,
        Err(PostMessageError::EmptyMessage) => StatusCode::BAD_REQUEST,
        Err(PostMessageError::RoomNotFound) => StatusCode::NOT_FOUND,
    };
    (status, cookies).into_response()
}

/// Room の状態
///
/// Room が無くなっていれば 286 と `HX-Redirect: /end` を返し、
/// ページ側のポーリングを止めて終了ページへ移動させる。
pub async fn room_status(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Response {
    match state.get_room_status_usecase.execute(&room_id).await {
        Ok(snapshot) => Json(RoomStatusDto::from(&snapshot)).into_response(),
        Err(_) => {
            let status = StatusCode::from_u16(STOP_POLLING).unwrap_or(StatusCode::NO_CONTENT);
            (status, [("HX-Redirect", ENDED_PATH)]).into_response()
        }
    }
}
