//! 비행 계획 프록시 endpoint.
//!
//! `GET /plan?key=<tk>` 요청을 업스트림 비행 계획 서비스로 한 번 전달하고,
//! 성공 본문은 그대로 중계합니다.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::PlanProxyError;
use crate::metrics::record_plan_request;
use crate::state::AppState;

/// 업스트림이 Content-Type을 주지 않았을 때의 기본값.
const DEFAULT_PLAN_CONTENT_TYPE: &str = "application/json";

/// 비행 계획 조회 쿼리.
#[derive(Debug, Deserialize)]
pub struct PlanQuery {
    /// 트랙 키 (`tk`)
    pub key: Option<String>,
}

/// 비행 계획 조회.
///
/// GET /plan?key=<tk>
pub async fn get_plan(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PlanQuery>,
) -> Response {
    let result = proxy_plan(&state, query.key.as_deref()).await;

    let response = match result {
        Ok(response) => response,
        Err(err) => {
            match &err {
                PlanProxyError::MissingKey => debug!("Plan request without key"),
                other => warn!(error = %other, "Plan proxy failed"),
            }
            err.into_response()
        }
    };

    record_plan_request(response.status().as_u16());
    response
}

async fn proxy_plan(state: &AppState, key: Option<&str>) -> Result<Response, PlanProxyError> {
    let key = key
        .filter(|k| !k.is_empty())
        .ok_or(PlanProxyError::MissingKey)?;

    let plan = state.plans.fetch_plan(key).await?;
    let content_type = plan
        .content_type
        .unwrap_or_else(|| DEFAULT_PLAN_CONTENT_TYPE.to_string());

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, content_type)], plan.bytes).into_response())
}

/// 비행 계획 라우터 생성.
pub fn plan_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(get_plan))
}
