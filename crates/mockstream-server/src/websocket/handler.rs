//! WebSocket 연결 handler.
//!
//! 업그레이드된 소켓마다 독립된 [`Connection`] 루프를 하나씩 띄웁니다.

use std::net::SocketAddr;

use axum::{
    extract::{
        ws::{WebSocket, WebSocketUpgrade},
        ConnectInfo, State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use futures::StreamExt;
use tracing::{info, Instrument};

use super::connection::Connection;
use crate::state::ServerState;

/// WebSocket 업그레이드 핸들러.
///
/// # 엔드포인트
///
/// `GET /`, `GET /ws`
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<ServerState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, addr, state))
}

/// WebSocket 연결 처리.
async fn handle_socket(socket: WebSocket, addr: SocketAddr, state: ServerState) {
    // 연결 수명 동안 유지, 함수가 끝나면 해제
    let guard = state.connections.open();
    let session_id = uuid::Uuid::new_v4().to_string();
    let span = mockstream_core::connection_span!(addr, session_id);

    async move {
        info!(
            index = guard.index(),
            active = state.connections.active(),
            "New client connected: {}", addr
        );

        let generator = state.generator_for(guard.index());
        let (writer, reader) = socket.split();
        let connection = Connection::new(addr.to_string(), writer, reader, generator, &state.settings);

        tokio::select! {
            summary = connection.run() => summary.log(),
            _ = state.shutdown.cancelled() => {
                info!("Server shutting down, dropping connection with {}", addr);
            }
        }

        drop(guard);
    }
    .instrument(span)
    .await;
}

/// WebSocket 라우터 생성.
///
/// 루트 경로와 `/ws` 모두에서 업그레이드를 받습니다.
pub fn websocket_router() -> Router<ServerState> {
    Router::new()
        .route("/", get(websocket_handler))
        .route("/ws", get(websocket_handler))
}
