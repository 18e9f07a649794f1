//! Flight tracker 서버 진입점.
//!
//! 설정 로드 → 로깅/메트릭 초기화 → 폴러 시작 → HTTP/WebSocket 서버 실행 순으로 동작합니다.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use tracker_api::{
    create_registry, create_router, setup_metrics_recorder, spawn_poller, AppState,
    SnapshotBroadcaster, SnapshotPoller,
};
use tracker_core::{init_logging, AppConfig, CorsConfig, LogConfig};
use tracker_feed::{PlanClient, PositionFetcher, UpstreamClient};

/// 폴러 종료 대기 시간.
const POLLER_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(15);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    let config = AppConfig::load_default().context("Failed to load configuration")?;

    init_logging(LogConfig::from(&config.logging)).context("Failed to initialize logging")?;
    info!("Starting flight tracker server...");

    let metrics_handle = setup_metrics_recorder().context("Failed to install metrics recorder")?;
    info!("Prometheus metrics recorder initialized");

    let addr = config
        .server
        .socket_addr()
        .with_context(|| format!("Invalid listen address {}:{}", config.server.host, config.server.port))?;

    // 위치 피드와 비행 계획 조회가 같은 커넥션 풀을 사용
    let upstream = UpstreamClient::new(&config.upstream).context("Failed to build upstream client")?;
    let fetcher = PositionFetcher::new(upstream.clone(), config.upstream.feed_url.clone());
    let plans = PlanClient::new(upstream, config.upstream.plan_url.clone());

    let registry = create_registry();
    let state = Arc::new(AppState::new(registry.clone(), plans));

    info!(
        version = %state.version,
        feed_url = %config.upstream.feed_url,
        plan_url = %config.upstream.plan_url,
        interval_ms = config.poller.interval_ms,
        "Application state initialized"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    // 전역 종료 토큰 (폴러 종료용)
    let shutdown_token = CancellationToken::new();

    let poller = SnapshotPoller::new(
        Arc::new(fetcher),
        SnapshotBroadcaster::new(registry),
        config.poller.interval(),
    );
    let poller_handle = spawn_poller(poller, shutdown_token.clone());

    let app = Router::new()
        .merge(create_router(state))
        .merge(metrics_router(metrics_handle))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors));

    info!(%addr, "Server listening");
    info!("WebSocket available at ws://{}/ws", addr);
    info!("Metrics available at http://{}/metrics", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_token.clone()))
        .await
        .context("Server error")?;

    info!("Server shutdown initiated, stopping poller...");
    shutdown_token.cancel();

    match tokio::time::timeout(POLLER_SHUTDOWN_TIMEOUT, poller_handle).await {
        Ok(Ok(())) => info!("Poller stopped"),
        Ok(Err(e)) => warn!(error = %e, "Poller task ended abnormally"),
        Err(_) => warn!("Poller shutdown timeout, forcing shutdown"),
    }

    info!("Server stopped gracefully");

    Ok(())
}

/// /metrics 엔드포인트 라우터.
fn metrics_router(handle: PrometheusHandle) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(handle)
}

/// /metrics 엔드포인트 핸들러.
async fn metrics_handler(
    axum::extract::State(handle): axum::extract::State<PrometheusHandle>,
) -> String {
    handle.render()
}

/// CORS 레이어 생성.
///
/// `cors.origins`가 비어 있으면 모든 origin을 허용합니다.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .origins
        .iter()
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let allow_origin = if origins.is_empty() {
        if !config.origins.is_empty() {
            warn!("cors.origins contains no valid origins, allowing any");
        }
        AllowOrigin::any()
    } else {
        info!("CORS configured with {} allowed origins", origins.len());
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE, axum::http::header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 종료 토큰을 취소합니다.
async fn shutdown_signal(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    shutdown_token.cancel();
    info!("Shutdown signal propagated to background tasks");
}
