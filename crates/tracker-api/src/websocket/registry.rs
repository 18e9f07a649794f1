//! 구독자 레지스트리.
//!
//! 현재 연결된 푸시 채널 목록을 관리합니다. 전송 계층과 무관하게
//! `Subscriber` trait 객체만 보관합니다.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// 구독자 식별자.
pub type SubscriberId = Uuid;

/// 구독자별 대기열 크기. 가득 차면 새 메시지는 버려집니다.
pub const SUBSCRIBER_QUEUE_CAPACITY: usize = 16;

/// 구독자 전송 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    /// 채널이 닫힘
    #[error("subscriber channel closed")]
    Closed,
    /// 대기열이 가득 참 (느린 구독자).
    ///
    /// 이번 메시지만 버리고 구독자는 레지스트리에 남겨 둡니다. 다음 스냅샷이
    /// 최신 위치를 다시 전달합니다.
    #[error("subscriber queue full")]
    Full,
}

/// 스냅샷을 받을 수 있는 푸시 채널.
pub trait Subscriber: Send + Sync {
    /// 채널이 열려 있는지 확인.
    fn is_open(&self) -> bool;

    /// 직렬화된 페이로드 전송. 블로킹하지 않습니다.
    fn send(&self, payload: Arc<str>) -> Result<(), SendError>;
}

/// mpsc 대기열 기반 구독자.
///
/// 수신 측은 연결별 writer 태스크가 소켓으로 흘려보냅니다.
#[derive(Debug, Clone)]
pub struct ChannelSubscriber {
    tx: mpsc::Sender<Arc<str>>,
}

impl ChannelSubscriber {
    /// 새 구독자 생성.
    pub fn new(tx: mpsc::Sender<Arc<str>>) -> Self {
        Self { tx }
    }

    /// 구독자와 수신기 쌍 생성.
    pub fn channel() -> (Self, mpsc::Receiver<Arc<str>>) {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_QUEUE_CAPACITY);
        (Self::new(tx), rx)
    }
}

impl Subscriber for ChannelSubscriber {
    fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }

    fn send(&self, payload: Arc<str>) -> Result<(), SendError> {
        self.tx.try_send(payload).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SendError::Full,
            mpsc::error::TrySendError::Closed(_) => SendError::Closed,
        })
    }
}

/// 구독자 레지스트리.
///
/// 연결/해제는 브로드캐스트와 동시에 일어날 수 있습니다. 순회는 멤버 목록의
/// 복사본에서 이루어지므로 순회 중 추가/제거가 안전합니다.
#[derive(Default)]
pub struct SubscriptionRegistry {
    members: RwLock<HashMap<SubscriberId, Arc<dyn Subscriber>>>,
}

impl SubscriptionRegistry {
    /// 빈 레지스트리 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 구독자 등록.
    pub async fn add(&self, subscriber: Arc<dyn Subscriber>) -> SubscriberId {
        let id = Uuid::new_v4();
        self.members.write().await.insert(id, subscriber);
        id
    }

    /// 구독자 제거. 제거되었으면 `true`.
    pub async fn remove(&self, id: &SubscriberId) -> bool {
        self.members.write().await.remove(id).is_some()
    }

    /// 현재 멤버 각각에 대해 `f` 호출.
    pub async fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(SubscriberId, &Arc<dyn Subscriber>),
    {
        for (id, subscriber) in self.members().await {
            f(id, &subscriber);
        }
    }

    /// 현재 멤버 목록 복사본.
    pub async fn members(&self) -> Vec<(SubscriberId, Arc<dyn Subscriber>)> {
        self.members
            .read()
            .await
            .iter()
            .map(|(id, s)| (*id, Arc::clone(s)))
            .collect()
    }

    /// 등록된 구독자 수.
    pub async fn len(&self) -> usize {
        self.members.read().await.len()
    }

    /// 비어 있는지 확인.
    pub async fn is_empty(&self) -> bool {
        self.members.read().await.is_empty()
    }
}

/// 공유 가능한 레지스트리 타입.
pub type SharedRegistry = Arc<SubscriptionRegistry>;

/// 새로운 공유 레지스트리 생성.
pub fn create_registry() -> SharedRegistry {
    Arc::new(SubscriptionRegistry::new())
}
