//! WebSocket 连接
//!
//! 每个连接一个任务：读取文本帧解码后提交给事件循环，
//! 另起一个写任务把事件循环发来的消息编码后写回。

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tracing::{debug, warn};

use protocol::{decode_client, encode_server, ProtocolError};

use crate::dispatcher::ServerHandle;

/// 处理单个 WebSocket 连接，直到对端关闭
pub async fn serve_socket(socket: WebSocket, handle: ServerHandle) {
    let Some((id, mut outbound)) = handle.connect() else {
        warn!("事件循环已停止，拒绝新连接");
        return;
    };

    let (mut sink, mut stream) = socket.split();

    // 写任务：连接从事件循环移除后发送端被丢弃，recv 返回 None
    let writer = tokio::spawn(async move {
        while let Some(msg) = outbound.recv().await {
            let text = match encode_server(&msg) {
                Ok(text) => text,
                Err(err) => {
                    warn!("连接 {} 消息编码失败: {}", id, err);
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => match decode_client(text.as_str()) {
                Ok(msg) => {
                    if !handle.message(id, msg) {
                        break;
                    }
                }
                Err(err) => warn!("连接 {} 消息解析失败: {}", id, err),
            },
            Ok(Message::Binary(_)) => {
                warn!("连接 {}: {}", id, ProtocolError::UnsupportedFrame("binary"))
            }
            Ok(Message::Close(_)) => break,
            // Ping/Pong 由 axum 自动处理
            Ok(_) => {}
            Err(err) => {
                debug!("连接 {} 读取失败: {}", id, err);
                break;
            }
        }
    }

    handle.disconnect(id);
    writer.abort();
}
