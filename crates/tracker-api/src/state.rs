//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다.

use tracker_feed::PlanClient;

use crate::websocket::SharedRegistry;

/// 애플리케이션 공유 상태.
///
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// 구독자 레지스트리 - WebSocket 연결/해제 시 갱신
    pub registry: SharedRegistry,

    /// 비행 계획 조회 클라이언트
    pub plans: PlanClient,

    /// API 버전
    pub version: String,

    /// 서버 시작 시간
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// 새로운 AppState 생성.
    pub fn new(registry: SharedRegistry, plans: PlanClient) -> Self {
        Self {
            registry,
            plans,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: chrono::Utc::now(),
        }
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// 현재 연결된 구독자 수.
    pub async fn subscriber_count(&self) -> usize {
        self.registry.len().await
    }
}

/// 테스트용 상태 생성.
///
/// 비행 계획 클라이언트는 `plan_url`을 향합니다.
#[cfg(test)]
pub(crate) fn create_test_state(plan_url: &str) -> AppState {
    let client = tracker_feed::UpstreamClient::with_referer(
        "http://localhost/",
        std::time::Duration::from_secs(1),
    )
    .unwrap();
    AppState::new(
        crate::websocket::create_registry(),
        PlanClient::new(client, plan_url),
    )
}
