//! 스냅샷 브로드캐스터.
//!
//! 스냅샷을 한 번만 직렬화한 뒤 열린 구독자 모두에게 같은 텍스트를 보냅니다.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};
use tracker_core::Snapshot;

use super::registry::{SendError, SharedRegistry, SubscriberId};

/// 브로드캐스트 에러.
#[derive(Debug, Error)]
pub enum BroadcastError {
    /// 스냅샷 직렬화 실패
    #[error("Snapshot serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// 브로드캐스트 결과 집계.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// 전송 성공
    pub delivered: usize,
    /// 닫혀 있어서 건너뜀
    pub skipped: usize,
    /// 전송 실패
    pub failed: usize,
}

/// 스냅샷 브로드캐스터.
#[derive(Clone)]
pub struct SnapshotBroadcaster {
    registry: SharedRegistry,
}

impl SnapshotBroadcaster {
    /// 새 브로드캐스터 생성.
    pub fn new(registry: SharedRegistry) -> Self {
        Self { registry }
    }

    /// 스냅샷을 열린 구독자 모두에게 전송.
    ///
    /// 한 구독자의 실패는 다른 구독자에게 영향을 주지 않습니다.
    /// 닫힌 채널로 판명된 구독자는 순회가 끝난 뒤 레지스트리에서 제거됩니다.
    pub async fn broadcast(&self, snapshot: &Snapshot) -> Result<BroadcastReport, BroadcastError> {
        let payload: Arc<str> = Arc::from(snapshot.to_json()?);

        let mut report = BroadcastReport::default();
        let mut stale: Vec<SubscriberId> = Vec::new();

        self.registry
            .for_each(|id, subscriber| {
                if !subscriber.is_open() {
                    report.skipped += 1;
                    stale.push(id);
                    return;
                }

                match subscriber.send(Arc::clone(&payload)) {
                    Ok(()) => report.delivered += 1,
                    Err(e) => {
                        warn!(subscriber = %id, error = %e, "Failed to push snapshot");
                        report.failed += 1;
                        if e == SendError::Closed {
                            stale.push(id);
                        }
                    }
                }
            })
            .await;

        for id in &stale {
            self.registry.remove(id).await;
        }

        debug!(
            aircraft = snapshot.len(),
            delivered = report.delivered,
            skipped = report.skipped,
            failed = report.failed,
            removed = stale.len(),
            "Snapshot broadcast complete"
        );

        Ok(report)
    }
}
