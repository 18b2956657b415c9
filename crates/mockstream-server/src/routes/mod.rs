//! HTTP 라우트.
//!
//! WebSocket 엔드포인트 외에 운영용 `/health`와 `/metrics`를 제공합니다.

pub mod health;

use axum::{extract::State, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::trace::TraceLayer;

pub use health::{health_check, health_router, HealthResponse};

use crate::state::ServerState;
use crate::websocket::websocket_router;

/// Prometheus 메트릭 핸들러.
async fn metrics_handler(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}

/// 전체 라우터 생성.
///
/// `metrics`가 없으면 `/metrics` 라우트를 등록하지 않습니다.
pub fn create_router(state: ServerState, metrics: Option<PrometheusHandle>) -> Router {
    let mut router = Router::new()
        .merge(websocket_router())
        .merge(health_router())
        .with_state(state);

    if let Some(handle) = metrics {
        let metrics_router = Router::new()
            .route("/metrics", get(metrics_handler))
            .with_state(handle);
        router = router.merge(metrics_router);
    }

    router.layer(TraceLayer::new_for_http())
}
