//! # Tracker Core
//!
//! 항공기 추적 서비스의 핵심 타입을 제공합니다:
//! - 정규화된 항공기 레코드 및 스냅샷
//! - 설정 관리
//! - 로깅 인프라

pub mod aircraft;
pub mod config;
pub mod error;
pub mod logging;

pub use aircraft::{normalize_heading, AircraftRecord, Snapshot};
pub use config::*;
pub use error::*;
pub use logging::*;
