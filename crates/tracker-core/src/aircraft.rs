//! 항공기 레코드 및 스냅샷 정의.
//!
//! 이 모듈은 폴링 한 주기에서 만들어지는 정규화된 데이터 타입을 정의합니다:
//! - `AircraftRecord` - 추적 중인 항공기 한 대의 최신 위치
//! - `Snapshot` - 한 폴링 주기의 항공기 목록 (업스트림 순서 유지)

use serde::{Deserialize, Serialize};

/// 추적 중인 항공기 한 대.
///
/// 클라이언트로 전송되는 JSON 형식:
///
/// ```json
/// {"callsign":"QFA12","lat":-27.47,"lng":153.02,"altitude":5000,"speed":210,"heading":46,"tk":"X1"}
/// ```
///
/// `altitude`, `speed`의 `0`은 "알 수 없음(또는 지상)"을 의미합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftRecord {
    /// 표시용 콜사인 (비어 있을 수 있음)
    pub callsign: String,
    /// 위도 (도)
    pub lat: f64,
    /// 경도 (도)
    pub lng: f64,
    /// 고도 (ft)
    pub altitude: i32,
    /// 속도 (kts)
    pub speed: i32,
    /// 진행 방향 (도, 0..360)
    pub heading: i32,
    /// 비행 계획 조회용 업스트림 트랙 키
    #[serde(rename = "tk")]
    pub track_key: String,
}

impl AircraftRecord {
    /// 새 레코드를 생성합니다.
    ///
    /// 트랙 키가 비어 있거나 좌표가 유한한 값이 아니면 `None`을 반환합니다.
    /// 부분적으로 채워진 레코드는 만들어지지 않습니다.
    pub fn new(track_key: impl Into<String>, lat: f64, lng: f64) -> Option<Self> {
        let track_key = track_key.into();
        if track_key.is_empty() || !lat.is_finite() || !lng.is_finite() {
            return None;
        }

        Some(Self {
            callsign: String::new(),
            lat,
            lng,
            altitude: 0,
            speed: 0,
            heading: 0,
            track_key,
        })
    }

    /// 콜사인을 설정합니다.
    pub fn with_callsign(mut self, callsign: impl Into<String>) -> Self {
        self.callsign = callsign.into();
        self
    }

    /// 고도를 설정합니다.
    pub fn with_altitude(mut self, altitude: i32) -> Self {
        self.altitude = altitude;
        self
    }

    /// 속도를 설정합니다.
    pub fn with_speed(mut self, speed: i32) -> Self {
        self.speed = speed;
        self
    }

    /// 원시 진행 방향 값으로 heading을 설정합니다.
    pub fn with_raw_heading(mut self, raw: Option<f64>) -> Self {
        self.heading = normalize_heading(raw);
        self
    }
}

/// 원시 진행 방향을 가장 가까운 정수 도로 반올림하고 `[0, 360)` 범위로 맞춥니다.
///
/// 값이 없거나 유한하지 않으면 `0`.
pub fn normalize_heading(raw: Option<f64>) -> i32 {
    match raw {
        Some(deg) if deg.is_finite() => (deg.round() as i64).rem_euclid(360) as i32,
        _ => 0,
    }
}

/// 한 폴링 주기에서 생성된 항공기 목록.
///
/// 주기 간 식별/병합은 하지 않습니다. 스냅샷은 브로드캐스트 후 버려집니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(Vec<AircraftRecord>);

impl Snapshot {
    /// 빈 스냅샷을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 레코드 수.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 레코드 슬라이스.
    pub fn records(&self) -> &[AircraftRecord] {
        &self.0
    }

    /// JSON 배열로 직렬화합니다.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<Vec<AircraftRecord>> for Snapshot {
    fn from(records: Vec<AircraftRecord>) -> Self {
        Self(records)
    }
}

impl FromIterator<AircraftRecord> for Snapshot {
    fn from_iter<I: IntoIterator<Item = AircraftRecord>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Snapshot {
    type Item = AircraftRecord;
    type IntoIter = std::vec::IntoIter<AircraftRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
