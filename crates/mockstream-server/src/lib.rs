//! # Mockstream Server
//!
//! 연결된 모든 클라이언트에게 합성 값을 주기적으로 흘려보내는 WebSocket 서버.
//!
//! - [`websocket`]: 연결 루프와 업그레이드 핸들러
//! - [`routes`]: `/health`, `/metrics` 및 전체 라우터
//! - [`state`]: 공유 상태와 연결 카운터
//! - [`metrics`]: Prometheus 메트릭

pub mod metrics;
pub mod routes;
pub mod state;
pub mod websocket;

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tracing::info;

pub use routes::create_router;
pub use state::{ConnectionGuard, ConnectionTracker, ServerState};

/// 이미 바인딩된 리스너에서 서버를 실행합니다.
///
/// `state.shutdown`이 취소되면 새 연결 수락을 멈추고 열린 연결 루프를 모두 종료합니다.
pub async fn serve(
    listener: TcpListener,
    state: ServerState,
    metrics: Option<PrometheusHandle>,
) -> std::io::Result<()> {
    let shutdown = state.shutdown.clone();
    let app = create_router(state, metrics);

    info!(addr = %listener.local_addr()?, "Mock streaming server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move { shutdown.cancelled().await })
    .await
}
