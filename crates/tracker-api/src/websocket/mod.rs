//! 항공기 위치 푸시를 위한 WebSocket 서버.
//!
//! 연결된 클라이언트는 폴링 주기마다 전체 스냅샷을 JSON 배열 텍스트 프레임으로 받습니다.
//!
//! ```json
//! [{"callsign": "QFA12", "lat": -27.47, "lng": 153.02, "altitude": 5000, "speed": 210, "heading": 46, "tk": "X1"}]
//! ```
//!
//! 클라이언트 → 서버 메시지는 프로토콜에 정의되어 있지 않으며 무시됩니다.

pub mod broadcaster;
pub mod handler;
pub mod registry;

pub use broadcaster::{BroadcastError, BroadcastReport, SnapshotBroadcaster};
pub use handler::websocket_handler;
pub use registry::{
    create_registry, ChannelSubscriber, SendError, SharedRegistry, Subscriber, SubscriberId,
    SubscriptionRegistry, SUBSCRIBER_QUEUE_CAPACITY,
};
