//! Prometheus 메트릭 설정 및 유틸리티.
//!
//! 연결 수와 메시지 송수신 수를 수집하고 `/metrics` 엔드포인트로 노출합니다.
//! 레코더가 설치되지 않은 경우(테스트 등) 모든 기록은 무시됩니다.

use metrics::{counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Prometheus 메트릭 레코더를 설정하고 핸들을 반환합니다.
///
/// # 패닉
///
/// 레코더가 이미 설치되어 있으면 패닉합니다.
pub fn setup_metrics_recorder() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Prometheus 레코더 설치 실패")
}

/// 새 연결 수락 기록.
pub fn record_connection_opened() {
    counter!("mockstream_connections_total").increment(1);
    gauge!("mockstream_connections_active").increment(1.0);
}

/// 연결 해제 기록.
pub fn record_connection_released() {
    gauge!("mockstream_connections_active").decrement(1.0);
}

/// 연결 종료 사유 기록.
pub fn record_connection_closed(reason: &'static str) {
    counter!("mockstream_connections_closed_total", "reason" => reason).increment(1);
}

/// 송신된 값 기록.
pub fn record_message_sent(kind: &'static str) {
    counter!("mockstream_messages_sent_total", "kind" => kind).increment(1);
}

/// 수신된 메시지 기록.
pub fn record_message_received(kind: &'static str) {
    counter!("mockstream_messages_received_total", "kind" => kind).increment(1);
}
