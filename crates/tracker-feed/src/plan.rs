//! 비행 계획 조회 클라이언트.
//!
//! 트랙 키로 업스트림 비행 계획을 한 번 조회합니다. 본문은 해석하지 않고
//! 그대로 돌려주며, 실패는 `FeedError` 분류(거부/응답 없음/기타)로 반환합니다.

use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::client::{rejection, UpstreamClient};
use crate::error::FeedResult;

/// 업스트림 비행 계획 응답 본문.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanBody {
    /// 업스트림 Content-Type (없으면 `None`)
    pub content_type: Option<String>,
    /// 원본 바이트
    pub bytes: Vec<u8>,
}

/// 비행 계획 조회 클라이언트.
#[derive(Debug, Clone)]
pub struct PlanClient {
    client: UpstreamClient,
    base_url: String,
}

impl PlanClient {
    /// 새 클라이언트 생성.
    pub fn new(client: UpstreamClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// 트랙 키로 비행 계획 조회.
    ///
    /// 키는 `key` 쿼리 값으로 인코딩되어 붙습니다.
    pub async fn fetch_plan(&self, key: &str) -> FeedResult<PlanBody> {
        debug!(key, "Requesting flight plan");

        let response = self
            .client
            .http()
            .get(&self.base_url)
            .query(&[("key", key)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();

        Ok(PlanBody {
            content_type,
            bytes,
        })
    }
}
