//! 스냅샷 제공자 trait 정의.

use async_trait::async_trait;
use tracker_core::Snapshot;

/// 폴러가 의존하는 스냅샷 제공자.
///
/// 구현체는 실패를 호출자에게 전파하지 않습니다. 업스트림 장애는
/// 로그를 남기고 빈 스냅샷으로 대체합니다.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// 제공자 이름 (로그용).
    fn name(&self) -> &str;

    /// 현재 스냅샷 조회.
    async fn fetch_snapshot(&self) -> Snapshot;
}
