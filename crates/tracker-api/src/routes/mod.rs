//! HTTP 라우트.
//!
//! # 라우트 구조
//!
//! - `/ws`, `/` - 항공기 위치 푸시 채널 (WebSocket)
//! - `/plan?key=<tk>` - 비행 계획 프록시
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//!
//! `/metrics`는 Prometheus 핸들이 필요하므로 `main`에서 붙입니다.

pub mod health;
pub mod plan;

pub use health::{health_router, HealthResponse};
pub use plan::{plan_router, PlanQuery};

use axum::{middleware, routing::get, Router};
use std::sync::Arc;

use crate::middleware::metrics_layer;
use crate::state::AppState;
use crate::websocket::websocket_handler;

/// 전체 라우터 생성.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(websocket_handler))
        .route("/ws", get(websocket_handler))
        .nest("/plan", plan_router())
        .nest("/health", health_router())
        .route_layer(middleware::from_fn(metrics_layer))
        .with_state(state)
}
