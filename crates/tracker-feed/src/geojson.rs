//! 위치 피드의 GeoJSON 응답 타입.
//!
//! 업스트림 스키마는 보장되지 않으므로 모든 필드를 선택적으로 받습니다.
//! feature 하나가 비어 있어도 전체 응답 파싱이 실패하지 않습니다.

use serde::Deserialize;

/// 피드 응답 (FeatureCollection).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureCollection {
    /// GeoJSON 타입 (보통 "FeatureCollection")
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// feature 목록
    #[serde(default)]
    pub features: Option<Vec<Feature>>,
}

/// 항공기 한 대에 대응하는 feature.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: FeatureProperties,
}

/// 좌표 정보. `coordinates = [lng, lat]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Geometry {
    #[serde(default)]
    pub coordinates: Vec<Option<f64>>,
}

/// feature 속성.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureProperties {
    /// 콜사인
    #[serde(default)]
    pub name: Option<String>,
    /// 진행 방향 (도)
    #[serde(default)]
    pub trk: Option<f64>,
    /// `<dt>/<dd>` 쌍이 들어 있는 HTML 조각
    #[serde(rename = "popupContent", default)]
    pub popup_content: Option<String>,
    /// 트랙 키
    #[serde(default)]
    pub tk: Option<String>,
}

impl Feature {
    /// `(lng, lat)` 좌표. 둘 중 하나라도 없거나 유한하지 않으면 `None`.
    pub fn lng_lat(&self) -> Option<(f64, f64)> {
        let coords = &self.geometry.as_ref()?.coordinates;
        let lng = coords.first().copied().flatten()?;
        let lat = coords.get(1).copied().flatten()?;
        (lng.is_finite() && lat.is_finite()).then_some((lng, lat))
    }

    /// 비어 있지 않은 트랙 키.
    pub fn track_key(&self) -> Option<&str> {
        self.properties.tk.as_deref().filter(|tk| !tk.is_empty())
    }
}
