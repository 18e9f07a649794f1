//! 위치 피드 조회기.
//!
//! 피드를 한 번 조회하고 각 feature를 `AircraftRecord`로 정규화합니다.
//! 전송/상태/파싱 실패는 모두 로그만 남기고 빈 스냅샷으로 대체합니다.
//! 다음 폴링 주기가 재시도 역할을 합니다.

use async_trait::async_trait;
use tracing::{debug, warn};
use tracker_core::{AircraftRecord, Snapshot};

use crate::client::{rejection, UpstreamClient};
use crate::error::FeedResult;
use crate::geojson::{Feature, FeatureCollection};
use crate::popup::{extract, PopupField};
use crate::traits::SnapshotSource;

/// 위치 피드 조회기.
#[derive(Debug, Clone)]
pub struct PositionFetcher {
    client: UpstreamClient,
    url: String,
}

impl PositionFetcher {
    /// 새 조회기 생성.
    pub fn new(client: UpstreamClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// 피드 원본 조회.
    ///
    /// 2xx가 아니거나 본문이 GeoJSON 형태가 아니면 에러를 반환합니다.
    pub async fn fetch_features(&self) -> FeedResult<FeatureCollection> {
        let response = self.client.http().get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl SnapshotSource for PositionFetcher {
    fn name(&self) -> &str {
        "position-feed"
    }

    async fn fetch_snapshot(&self) -> Snapshot {
        match self.fetch_features().await {
            Ok(collection) => snapshot_from_features(collection),
            Err(e) => {
                warn!(url = %self.url, error = %e, "Fetch aircraft data failed");
                Snapshot::new()
            }
        }
    }
}

/// FeatureCollection을 스냅샷으로 변환합니다.
///
/// 좌표나 트랙 키가 없는 feature는 조용히 제외됩니다. 순서는 업스트림 순서를 따릅니다.
pub fn snapshot_from_features(collection: FeatureCollection) -> Snapshot {
    let features = collection.features.unwrap_or_default();
    let total = features.len();

    let snapshot: Snapshot = features.iter().filter_map(record_from_feature).collect();

    if snapshot.len() < total {
        debug!(
            total,
            kept = snapshot.len(),
            dropped = total - snapshot.len(),
            "Dropped features without coordinates or track key"
        );
    }

    snapshot
}

/// feature 하나를 레코드로 변환합니다.
pub fn record_from_feature(feature: &Feature) -> Option<AircraftRecord> {
    let (lng, lat) = feature.lng_lat()?;
    let track_key = feature.track_key()?;

    let props = &feature.properties;
    let popup = props.popup_content.as_deref().unwrap_or_default();

    let record = AircraftRecord::new(track_key, lat, lng)?
        .with_callsign(props.name.clone().unwrap_or_default())
        .with_altitude(extract(popup, PopupField::Altitude))
        .with_speed(extract(popup, PopupField::Speed))
        .with_raw_heading(props.trk);

    Some(record)
}
