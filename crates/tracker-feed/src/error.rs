//! 업스트림 에러 타입.

use serde_json::Value;
use thiserror::Error;

/// 업스트림 호출 에러.
#[derive(Debug, Error)]
pub enum FeedError {
    /// 연결 실패 또는 타임아웃 (응답을 받지 못함)
    #[error("Upstream unavailable: {0}")]
    Unavailable(String),

    /// 업스트림이 2xx가 아닌 상태로 응답
    #[error("Upstream rejected request ({status}): {reason}")]
    Rejected {
        /// 업스트림 HTTP 상태 코드
        status: u16,
        /// 상태 사유 문구 (예: "Not Found")
        reason: String,
        /// 업스트림 응답 본문 (JSON이 아니면 문자열)
        body: Value,
    },

    /// 파싱/역직렬화 에러
    #[error("Parse error: {0}")]
    Parse(String),

    /// 기타 에러
    #[error("Upstream error: {0}")]
    Other(String),
}

impl FeedError {
    /// 업스트림 상태 코드 (거부된 경우에만).
    pub fn status(&self) -> Option<u16> {
        match self {
            FeedError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 응답 없이 실패했는지 확인 (타임아웃/연결 실패).
    pub fn is_unavailable(&self) -> bool {
        matches!(self, FeedError::Unavailable(_))
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            FeedError::Unavailable(err.to_string())
        } else if err.is_decode() {
            FeedError::Parse(err.to_string())
        } else {
            FeedError::Other(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::Parse(err.to_string())
    }
}

/// 업스트림 작업을 위한 Result 타입.
pub type FeedResult<T> = Result<T, FeedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_only_for_rejected() {
        let rejected = FeedError::Rejected {
            status: 404,
            reason: "Not Found".to_string(),
            body: Value::Null,
        };
        assert_eq!(rejected.status(), Some(404));
        assert!(!rejected.is_unavailable());

        let timeout = FeedError::Unavailable("timed out".to_string());
        assert_eq!(timeout.status(), None);
        assert!(timeout.is_unavailable());
    }

    #[test]
    fn test_display_includes_status() {
        let err = FeedError::Rejected {
            status: 502,
            reason: "Bad Gateway".to_string(),
            body: Value::Null,
        };
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_from_serde_error() {
        let err: FeedError = serde_json::from_str::<Value>("{not json").unwrap_err().into();
        assert!(matches!(err, FeedError::Parse(_)));
    }
}
