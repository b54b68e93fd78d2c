//! HTML を使った MessageRenderer 実装
//!
//! チャットページは htmx の SSE 拡張で `/c/{id}/sse` に接続し、`message` イベントの
//! `data` をメッセージ一覧の末尾に追加する。ステータスは `/c/{id}/status` を 1 秒ごとに
//! ポーリングし、286 が返ってきたら `HX-Redirect` に従って終了ページへ移動する。

use fuse_chat_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::{ChatMessage, Client, MessageRenderer, RenderError, RoomSnapshot};

const HTMX_SCRIPT: &str = r#"<script src="https://unpkg.com/htmx.org@1.9.12"></script>
<script src="https://unpkg.com/htmx.org@1.9.12/dist/ext/sse.js"></script>"#;

pub const INDEX_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>fuse-chat</title></head>
<body>
<main>
<h1>fuse-chat</h1>
<p>Start a chat, share the link. The chat burns out after a minute of silence.</p>
<a href="/new">New chat</a>
</main>
</body>
</html>
"#;

pub const ENDED_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>fuse-chat: chat ended</title></head>
<body>
<main>
<h1>This chat has ended</h1>
<a href="/new">Start a new chat</a>
</main>
</body>
</html>
"#;

/// HTML の特殊文字をエスケープする
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlMessageRenderer;

impl HtmlMessageRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl MessageRenderer for HtmlMessageRenderer {
    fn render_message(
        &self,
        message: &ChatMessage,
        viewer_is_author: bool,
    ) -> Result<String, RenderError> {
        let class = if viewer_is_author {
            "message message--author"
        } else {
            "message message--other"
        };
        // SSE の data 1 行に収まるよう改行は <br> にする
        let text = escape_html(message.content.as_str())
            .replace("\r\n", "<br>")
            .replace('\n', "<br>");

        Ok(format!(
            r#"<div class="{class}"><span class="message__author">{author}</span><p class="message__text">{text}</p><time datetime="{time}"></time></div>"#,
            author = escape_html(message.author.name.as_str()),
            time = timestamp_to_jst_rfc3339(message.created_at.value()),
        ))
    }

    fn render_room_page(
        &self,
        room: &RoomSnapshot,
        viewer: &Client,
    ) -> Result<String, RenderError> {
        let mut history = String::new();
        for message in &room.messages {
            history.push_str(&self.render_message(message, message.is_authored_by(&viewer.id))?);
            history.push('\n');
        }

        let room_id = escape_html(room.id.as_str());
        Ok(format!(
            r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>fuse-chat</title>
{HTMX_SCRIPT}
</head>
<body>
<main>
<p>You are <strong>{viewer}</strong>. Share this page's URL to invite others.</p>
<div id="status" data-status-url="/c/{room_id}/status">Time left: {remaining}s</div>
<div id="messages" hx-ext="sse" sse-connect="/c/{room_id}/sse" sse-swap="message" hx-swap="beforeend">
{history}</div>
<form hx-post="/c/{room_id}" hx-swap="none" hx-on::after-request="this.reset()">
<input name="message" autocomplete="off" autofocus required>
<button type="submit">Send</button>
</form>
</main>
<script>
(function () {{
  const status = document.getElementById("status");
  const timer = setInterval(async () => {{
    const response = await fetch(status.dataset.statusUrl);
    if (response.status === 286) {{
      clearInterval(timer);
      window.location.href = response.headers.get("HX-Redirect") || "/end";
      return;
    }}
    const body = await response.json();
    status.textContent = "Time left: " + body.time_remaining_secs + "s / Connections: " + body.connections;
  }}, 1000);
}})();
</script>
</body>
</html>
"#,
            viewer = escape_html(viewer.name.as_str()),
            remaining = room.time_remaining.as_secs(),
        ))
    }
}
