//! 헬스 체크 endpoint.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::state::ServerState;

/// 헬스 체크 응답 구조체.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 서비스 상태 ("healthy" | "shutting_down")
    pub status: String,

    /// 서버 버전
    pub version: String,

    /// 서버 업타임(초)
    pub uptime_secs: i64,

    /// 현재 시간 (ISO 8601)
    pub timestamp: String,

    /// 현재 열린 WebSocket 연결 수
    pub active_connections: usize,

    /// 지금까지 수락한 WebSocket 연결 수
    pub total_connections: u64,
}

/// 헬스 체크.
///
/// GET /health
pub async fn health_check(State(state): State<ServerState>) -> impl IntoResponse {
    let (status, status_code) = if state.shutdown.is_cancelled() {
        ("shutting_down", StatusCode::SERVICE_UNAVAILABLE)
    } else {
        ("healthy", StatusCode::OK)
    };

    let response = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.uptime_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        active_connections: state.connections.active(),
        total_connections: state.connections.total(),
    };

    (status_code, Json(response))
}

/// 헬스 체크 라우터 생성.
pub fn health_router() -> Router<ServerState> {
    Router::new().route("/health", get(health_check))
}
