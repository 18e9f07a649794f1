//! 업스트림 공용 HTTP 클라이언트.
//!
//! 업스트림은 브라우저에서 온 XHR 요청만 받아주므로 모든 요청에
//! 동일한 브라우저 흉내 헤더를 붙입니다.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, REFERER, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracker_core::UpstreamConfig;

use crate::error::{FeedError, FeedResult};

/// User-Agent 헤더 값.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0";
/// Accept 헤더 값.
pub const BROWSER_ACCEPT: &str = "application/json, text/javascript, */*; q=0.01";
/// X-Requested-With 헤더 값.
pub const BROWSER_REQUESTED_WITH: &str = "XMLHttpRequest";

/// 업스트림 HTTP 클라이언트.
///
/// 내부 `reqwest::Client`는 커넥션 풀을 공유하므로 clone 비용이 작습니다.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    timeout: Duration,
}

impl UpstreamClient {
    /// 설정으로 클라이언트 생성.
    pub fn new(config: &UpstreamConfig) -> FeedResult<Self> {
        Self::with_referer(&config.referer, config.timeout())
    }

    /// Referer와 타임아웃을 직접 지정하여 생성.
    pub fn with_referer(referer: &str, timeout: Duration) -> FeedResult<Self> {
        let client = Client::builder()
            .default_headers(browser_headers(referer)?)
            .timeout(timeout)
            .build()
            .map_err(|e| FeedError::Other(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self { client, timeout })
    }

    /// 내부 reqwest 클라이언트.
    pub fn http(&self) -> &Client {
        &self.client
    }

    /// 요청 타임아웃.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// 브라우저 흉내 헤더 생성.
pub fn browser_headers(referer: &str) -> FeedResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(
        REFERER,
        HeaderValue::from_str(referer)
            .map_err(|e| FeedError::Other(format!("잘못된 Referer 값: {}", e)))?,
    );
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(
        HeaderName::from_static("x-requested-with"),
        HeaderValue::from_static(BROWSER_REQUESTED_WITH),
    );
    Ok(headers)
}

/// 2xx가 아닌 응답을 `FeedError::Rejected`로 변환합니다.
///
/// 본문은 JSON이면 그대로, 아니면 문자열로 보존합니다.
pub(crate) async fn rejection(response: reqwest::Response) -> FeedError {
    let status = response.status();
    let body = match response.bytes().await {
        Ok(bytes) => body_value(&bytes),
        Err(e) => {
            tracing::debug!(error = %e, "Failed to read rejected response body");
            Value::Null
        }
    };

    FeedError::Rejected {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or_default().to_string(),
        body,
    }
}

/// 응답 본문을 JSON 값으로 해석 (실패 시 문자열).
pub(crate) fn body_value(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
