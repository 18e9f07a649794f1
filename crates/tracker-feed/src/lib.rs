//! 업스트림 항공기 추적 서비스 연결.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 브라우저 흉내 헤더와 타임아웃이 적용된 공용 HTTP 클라이언트
//! - 팝업 HTML 필드 추출기
//! - 위치 피드 조회 및 정규화 (`SnapshotSource`)
//! - 비행 계획 조회 클라이언트

pub mod client;
pub mod error;
pub mod fetcher;
pub mod geojson;
pub mod plan;
pub mod popup;
pub mod traits;

pub use client::UpstreamClient;
pub use error::*;
pub use fetcher::{record_from_feature, snapshot_from_features, PositionFetcher};
pub use geojson::{Feature, FeatureCollection, FeatureProperties, Geometry};
pub use plan::{PlanBody, PlanClient};
pub use popup::{extract, extract_field, parse_numeric, PopupField};
pub use traits::SnapshotSource;
