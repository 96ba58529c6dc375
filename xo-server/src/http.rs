//! HTTP 接口
//!
//! - `GET /health` 健康检查
//! - `GET /`、`/style.css`、`/script.js` 客户端静态文件（编译时嵌入）
//! - `GET /ws` WebSocket 对局通道

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::dispatcher::ServerHandle;
use crate::ws::serve_socket;

const INDEX_HTML: &str = include_str!("../public/index.html");
const STYLE_CSS: &str = include_str!("../public/style.css");
const SCRIPT_JS: &str = include_str!("../public/script.js");

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    /// ISO-8601 UTC 时间，精确到毫秒
    pub timestamp: String,
}

impl HealthStatus {
    pub fn now() -> Self {
        Self {
            status: "OK",
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// 构建路由
pub fn router(handle: ServerHandle) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/index.html", get(index))
        .route("/style.css", get(style))
        .route("/script.js", get(script))
        .route("/health", get(health))
        .route("/ws", get(ws_upgrade))
        .with_state(handle)
}

async fn index() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], INDEX_HTML)
}

async fn style() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLE_CSS)
}

async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        SCRIPT_JS,
    )
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::now())
}

async fn ws_upgrade(ws: WebSocketUpgrade, State(handle): State<ServerHandle>) -> Response {
    ws.on_upgrade(move |socket| serve_socket(socket, handle))
}
