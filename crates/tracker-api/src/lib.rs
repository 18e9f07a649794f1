//! 항공기 위치 푸시 서버 및 비행 계획 프록시.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 업스트림 위치 피드 폴링 및 WebSocket 브로드캐스트
//! - 비행 계획 프록시 (`/plan`)
//! - 헬스 체크 엔드포인트
//! - Prometheus 메트릭
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: HTTP 엔드포인트
//! - [`websocket`]: 구독자 레지스트리, 브로드캐스터, WebSocket 핸들러
//! - [`services`]: 백그라운드 폴링 서비스
//! - [`metrics`]: Prometheus 메트릭 수집
//! - [`middleware`]: HTTP 미들웨어

pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod websocket;

pub use error::{PlanProxyError, UpstreamErrorBody};
pub use metrics::setup_metrics_recorder;
pub use middleware::metrics_layer;
pub use routes::{create_router, HealthResponse, PlanQuery};
pub use services::{spawn_poller, CycleOutcome, SnapshotPoller};
pub use state::AppState;
pub use websocket::{
    create_registry, websocket_handler, BroadcastError, BroadcastReport, ChannelSubscriber,
    SendError, SharedRegistry, SnapshotBroadcaster, Subscriber, SubscriberId,
    SubscriptionRegistry,
};
