//! WebSocket 연결 handler.
//!
//! 연결마다 대기열 구독자를 등록하고, writer 태스크가 대기열을 소켓으로 흘려보냅니다.
//! 클라이언트가 보내는 메시지는 기록만 하고 무시합니다.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use super::registry::ChannelSubscriber;
use crate::metrics::{decrement_websocket_connections, increment_websocket_connections};
use crate::state::AppState;

/// WebSocket 업그레이드 핸들러.
///
/// # 엔드포인트
///
/// `GET /ws`, `GET /`
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// WebSocket 연결 처리.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (subscriber, mut queue) = ChannelSubscriber::channel();
    let subscriber_id = state.registry.add(Arc::new(subscriber)).await;

    increment_websocket_connections();
    info!(subscriber = %subscriber_id, "WebSocket connected");

    let (mut sender, mut receiver) = socket.split();

    // 스냅샷 전송 태스크
    let mut send_task = tokio::spawn(async move {
        while let Some(payload) = queue.recv().await {
            if sender
                .send(Message::Text(payload.to_string().into()))
                .await
                .is_err()
            {
                break;
            }
        }
    });

    // 클라이언트 메시지 수신 태스크
    let mut receive_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(text)) => {
                    debug!(subscriber = %subscriber_id, message = %text.as_str(), "Ignoring client message");
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!(subscriber = %subscriber_id, error = %e, "WebSocket receive error");
                    break;
                }
            }
        }
    });

    // 하나의 태스크가 종료되면 다른 것도 종료
    tokio::select! {
        _ = &mut send_task => {
            debug!(subscriber = %subscriber_id, "Send task ended");
            receive_task.abort();
        }
        _ = &mut receive_task => {
            debug!(subscriber = %subscriber_id, "Receive task ended");
            send_task.abort();
        }
    }

    state.registry.remove(&subscriber_id).await;
    decrement_websocket_connections();

    info!(subscriber = %subscriber_id, "WebSocket disconnected");
}
