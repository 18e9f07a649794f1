//! 설정 관리.
//!
//! 기본값 → `config/default.toml`(선택) → 환경 변수(`TRACKER__*`) 순으로 적용됩니다.
//! 외부에서 바꿀 수 있는 값은 포트, 폴링 주기, 두 업스트림 URL 정도이며
//! 나머지 동작은 고정입니다.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use crate::error::{CoreError, CoreResult};

/// 위치 피드 기본 URL.
pub const DEFAULT_FEED_URL: &str = "https://tx.ozrunways.com/tx/geo";
/// 비행 계획 조회 기본 URL.
pub const DEFAULT_PLAN_URL: &str = "https://tx.ozrunways.com/tx/plan";
/// 업스트림 Referer 헤더 기본값.
pub const DEFAULT_REFERER: &str = "https://tx.ozrunways.com/";
/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 폴러 설정
    pub poller: PollerConfig,
    /// 업스트림 설정
    pub upstream: UpstreamConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// CORS 설정
    pub cors: CorsConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// 소켓 주소 반환.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// 폴러 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollerConfig {
    /// 주기 종료 후 다음 주기 시작까지의 대기 시간 (밀리초)
    pub interval_ms: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self { interval_ms: 5000 }
    }
}

impl PollerConfig {
    /// 폴링 간격을 Duration으로 반환
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// 업스트림 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// 위치 피드 URL
    pub feed_url: String,
    /// 비행 계획 조회 URL (`?key=`가 붙음)
    pub plan_url: String,
    /// Referer 헤더
    pub referer: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            plan_url: DEFAULT_PLAN_URL.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            timeout_secs: 10,
        }
    }
}

impl UpstreamConfig {
    /// 요청 타임아웃을 Duration으로 반환
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// CORS 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// 허용 origin 목록 (비어 있으면 모든 origin 허용)
    pub origins: Vec<String>,
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없어도 에러가 아닙니다.
    pub fn load<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("TRACKER")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.origins")
                    .try_parsing(true),
            );

        let mut config: AppConfig = builder.build()?.try_deserialize()?;

        // 단일 PORT 변수도 지원 (컨테이너 환경 관례)
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            config.server.port = port;
        }

        config.validate()?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> CoreResult<Self> {
        Self::load(DEFAULT_CONFIG_PATH)
    }

    /// 설정 값 검증.
    pub fn validate(&self) -> CoreResult<()> {
        if self.poller.interval_ms == 0 {
            return Err(CoreError::Config(
                "poller.interval_ms는 0보다 커야 합니다".to_string(),
            ));
        }
        if self.upstream.timeout_secs == 0 {
            return Err(CoreError::Config(
                "upstream.timeout_secs는 0보다 커야 합니다".to_string(),
            ));
        }
        if self.upstream.feed_url.trim().is_empty() || self.upstream.plan_url.trim().is_empty() {
            return Err(CoreError::Config(
                "업스트림 URL이 비어 있습니다".to_string(),
            ));
        }
        Ok(())
    }
}
