//! Prometheus 메트릭 설정 및 유틸리티.
//!
//! 폴링 주기, WebSocket 연결, 비행 계획 프록시, HTTP 요청 메트릭을 수집하고
//! `/metrics` 엔드포인트로 노출합니다.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

/// Prometheus 메트릭 레코더를 설정하고 핸들을 반환합니다.
///
/// 레코더가 이미 설치되어 있으면 에러를 반환합니다.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )?
        .install_recorder()
}

// ============================================================================
// HTTP 메트릭
// ============================================================================

/// HTTP 응답 카운터 증가 및 처리 시간 기록.
pub fn record_http_response(method: &str, path: &str, status: u16, duration_secs: f64) {
    counter!(
        "http_responses_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_secs);
}

// ============================================================================
// 도메인 메트릭
// ============================================================================

/// WebSocket 연결 수 증가.
pub fn increment_websocket_connections() {
    gauge!("websocket_connections_active").increment(1.0);
}

/// WebSocket 연결 수 감소.
pub fn decrement_websocket_connections() {
    gauge!("websocket_connections_active").decrement(1.0);
}

/// 폴링 주기 결과 카운터 증가 (`broadcast`, `empty`, `failed`).
pub fn record_poll_cycle(outcome: &'static str) {
    counter!("poll_cycles_total", "outcome" => outcome).increment(1);
}

/// 마지막 스냅샷의 항공기 수.
pub fn set_poll_aircraft(count: usize) {
    gauge!("poll_aircraft").set(count as f64);
}

/// 비행 계획 요청 카운터 증가.
pub fn record_plan_request(status: u16) {
    counter!("plan_requests_total", "status" => status.to_string()).increment(1);
}
