//! API 에러 응답 타입.
//!
//! 비행 계획 프록시의 실패는 아래 네 가지 응답 중 하나로만 매핑됩니다.
//!
//! | 상황 | 상태 코드 | 본문 |
//! |------|-----------|------|
//! | `key` 누락 | 400 | 텍스트 |
//! | 업스트림 non-2xx | 업스트림 상태 그대로 | `{"message", "detail"}` JSON |
//! | 업스트림 응답 없음 (타임아웃/연결 실패) | 504 | 텍스트 |
//! | 그 외 | 500 | 텍스트 |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracker_feed::FeedError;

/// `key` 누락 시 응답 메시지.
pub const MISSING_KEY_MESSAGE: &str = "Parameter \"key\" (tk) is required";
/// 업스트림 응답 없음 시 응답 메시지.
pub const GATEWAY_TIMEOUT_MESSAGE: &str = "Gateway Timeout: upstream plan service did not respond";
/// 분류되지 않은 실패 시 응답 메시지.
pub const INTERNAL_ERROR_MESSAGE: &str = "Failed to fetch flight plan from upstream";

/// 업스트림 거부 응답 본문.
///
/// ```json
/// {
///   "message": "Upstream plan request failed (404): Not Found",
///   "detail": {"error": "unknown track"}
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpstreamErrorBody {
    /// 상태 코드를 포함한 실패 요약
    pub message: String,
    /// 업스트림 본문 (JSON이 아니면 문자열)
    pub detail: Value,
}

/// 비행 계획 프록시 에러.
#[derive(Debug, Error)]
pub enum PlanProxyError {
    /// `key` 파라미터 누락
    #[error("missing key parameter")]
    MissingKey,

    /// 업스트림이 non-2xx로 응답
    #[error("upstream rejected plan request ({status}): {reason}")]
    Rejected {
        status: u16,
        reason: String,
        detail: Value,
    },

    /// 업스트림 응답 없음
    #[error("upstream plan service unavailable: {0}")]
    GatewayTimeout(String),

    /// 그 외 실패
    #[error("plan proxy failure: {0}")]
    Internal(String),
}

impl PlanProxyError {
    /// 응답 상태 코드.
    ///
    /// 업스트림 상태가 유효한 HTTP 코드가 아니면 502로 대체합니다.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingKey => StatusCode::BAD_REQUEST,
            Self::Rejected { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FeedError> for PlanProxyError {
    fn from(err: FeedError) -> Self {
        match err {
            FeedError::Rejected {
                status,
                reason,
                body,
            } => Self::Rejected {
                status,
                reason,
                detail: body,
            },
            FeedError::Unavailable(msg) => Self::GatewayTimeout(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for PlanProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self {
            Self::MissingKey => (status, MISSING_KEY_MESSAGE).into_response(),
            Self::Rejected {
                status: upstream_status,
                reason,
                detail,
            } => {
                let body = UpstreamErrorBody {
                    message: format!(
                        "Upstream plan request failed ({}): {}",
                        upstream_status, reason
                    ),
                    detail,
                };
                (status, Json(body)).into_response()
            }
            Self::GatewayTimeout(_) => (status, GATEWAY_TIMEOUT_MESSAGE).into_response(),
            Self::Internal(_) => (status, INTERNAL_ERROR_MESSAGE).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::json;

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_from_feed_error_classification() {
        let rejected = PlanProxyError::from(FeedError::Rejected {
            status: 404,
            reason: "Not Found".to_string(),
            body: json!("nope"),
        });
        assert_eq!(rejected.status_code(), StatusCode::NOT_FOUND);

        let timeout = PlanProxyError::from(FeedError::Unavailable("timed out".to_string()));
        assert_eq!(timeout.status_code(), StatusCode::GATEWAY_TIMEOUT);

        let parse = PlanProxyError::from(FeedError::Parse("bad".to_string()));
        assert_eq!(parse.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let other = PlanProxyError::from(FeedError::Other("boom".to_string()));
        assert_eq!(other.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_rejected_body_contains_status_and_detail() {
        let response = PlanProxyError::Rejected {
            status: 404,
            reason: "Not Found".to_string(),
            detail: json!({"error": "unknown track"}),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body: UpstreamErrorBody = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body.message, "Upstream plan request failed (404): Not Found");
        assert_eq!(body.detail, json!({"error": "unknown track"}));
    }

    #[tokio::test]
    async fn test_fixed_messages() {
        let response = PlanProxyError::MissingKey.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(response).await, MISSING_KEY_MESSAGE);

        let response = PlanProxyError::GatewayTimeout("timed out".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body_string(response).await, GATEWAY_TIMEOUT_MESSAGE);

        let response = PlanProxyError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(response).await, INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn test_invalid_upstream_status_falls_back() {
        let err = PlanProxyError::Rejected {
            status: 1000,
            reason: String::new(),
            detail: Value::Null,
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }
}
