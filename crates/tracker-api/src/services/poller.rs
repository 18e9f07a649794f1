//! 항공기 위치 폴링 서비스.
//!
//! 위치 피드를 주기적으로 조회하고 비어 있지 않은 스냅샷을 구독자에게 브로드캐스트합니다.
//!
//! # 동작
//!
//! - 한 주기는 조회 → (비어 있지 않으면) 브로드캐스트 순서로 진행됩니다.
//! - 다음 주기는 이전 주기가 끝난 뒤 `interval`만큼 기다린 후 시작합니다.
//!   동시에 진행되는 주기는 없습니다.
//! - 주기 내부의 실패(패닉 포함)는 기록만 하고 루프를 멈추지 않습니다.
//! - 종료 신호는 주기 사이의 대기 지점에서만 확인합니다.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracker_feed::SnapshotSource;

use crate::metrics::{record_poll_cycle, set_poll_aircraft};
use crate::websocket::{BroadcastReport, SnapshotBroadcaster};

/// 한 주기의 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// 스냅샷을 브로드캐스트함
    Broadcast {
        aircraft: usize,
        report: BroadcastReport,
    },
    /// 이번 주기에는 데이터 없음 (브로드캐스트하지 않음)
    Empty,
    /// 주기 내부 실패
    Failed(String),
}

impl CycleOutcome {
    /// 메트릭 라벨.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Broadcast { .. } => "broadcast",
            Self::Empty => "empty",
            Self::Failed(_) => "failed",
        }
    }
}

/// 스냅샷 폴링 서비스.
pub struct SnapshotPoller {
    source: Arc<dyn SnapshotSource>,
    broadcaster: SnapshotBroadcaster,
    interval: Duration,
}

impl SnapshotPoller {
    /// 새 폴러 생성.
    ///
    /// # Arguments
    ///
    /// * `source` - 스냅샷 제공자
    /// * `broadcaster` - 구독자 브로드캐스터
    /// * `interval` - 주기 종료부터 다음 주기 시작까지의 대기 시간
    pub fn new(
        source: Arc<dyn SnapshotSource>,
        broadcaster: SnapshotBroadcaster,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            broadcaster,
            interval,
        }
    }

    /// 한 주기 실행.
    ///
    /// 어떤 실패도 호출자에게 전파되지 않습니다.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let outcome = match AssertUnwindSafe(self.cycle()).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(panic) => CycleOutcome::Failed(panic_message(panic.as_ref())),
        };

        if let CycleOutcome::Failed(reason) = &outcome {
            error!(source = self.source.name(), reason = %reason, "Poll cycle failed");
        }

        record_poll_cycle(outcome.label());
        outcome
    }

    async fn cycle(&self) -> CycleOutcome {
        let snapshot = self.source.fetch_snapshot().await;
        set_poll_aircraft(snapshot.len());

        if snapshot.is_empty() {
            info!(source = self.source.name(), "No data this cycle");
            return CycleOutcome::Empty;
        }

        match self.broadcaster.broadcast(&snapshot).await {
            Ok(report) => {
                info!(
                    aircraft = snapshot.len(),
                    subscribers = report.delivered,
                    "Broadcast aircraft snapshot"
                );
                CycleOutcome::Broadcast {
                    aircraft: snapshot.len(),
                    report,
                }
            }
            Err(e) => CycleOutcome::Failed(e.to_string()),
        }
    }

    /// 서비스 시작 (메인 루프).
    ///
    /// CancellationToken을 통해 graceful shutdown을 지원합니다. 진행 중인 주기는
    /// 중단하지 않고, 주기 사이의 대기 중에만 종료합니다.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            source = self.source.name(),
            interval_ms = self.interval.as_millis() as u64,
            "Snapshot poller started"
        );

        loop {
            self.run_cycle().await;

            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("Snapshot poller stopped");
                    break;
                }

                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }
}

/// SnapshotPoller를 백그라운드 task로 시작.
///
/// # Returns
///
/// 백그라운드 task의 JoinHandle
pub fn spawn_poller(poller: SnapshotPoller, shutdown: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        poller.run(shutdown).await;
    })
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("panic: {}", s)
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("panic: {}", s)
    } else {
        "panic".to_string()
    }
}
