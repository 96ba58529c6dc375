//! 事件分发
//!
//! 所有连接的事件汇入同一个通道，由单个任务按到达顺序逐个处理，
//! 因此对局状态不需要加锁。

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use protocol::{ClientMessage, ConnectionId};

use crate::connection::{outbound_channel, ConnectionIdGenerator, OutboundReceiver, OutboundSender};
use crate::server::{MessageHandler, ServerState};

/// 每个连接的非快照消息队列长度
pub const OUTBOUND_QUEUE_SIZE: usize = 32;

/// 服务器事件
#[derive(Debug)]
pub enum ServerEvent {
    /// 新连接
    Connected {
        id: ConnectionId,
        sender: OutboundSender,
    },
    /// 客户端消息
    Message { id: ConnectionId, msg: ClientMessage },
    /// 连接断开
    Disconnected { id: ConnectionId },
}

/// 事件循环句柄，可克隆给每个连接任务
#[derive(Debug, Clone)]
pub struct ServerHandle {
    events: mpsc::UnboundedSender<ServerEvent>,
    ids: Arc<ConnectionIdGenerator>,
}

impl ServerHandle {
    /// 启动事件循环
    ///
    /// 所有句柄被丢弃后事件循环结束，返回最终状态。
    pub fn spawn() -> (Self, JoinHandle<ServerState>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_event_loop(rx, ServerState::new()));
        let handle = Self {
            events: tx,
            ids: Arc::new(ConnectionIdGenerator::new()),
        };
        (handle, task)
    }

    /// 分配连接 ID 并注册发送队列
    pub fn connect(&self) -> Option<(ConnectionId, OutboundReceiver)> {
        let id = self.ids.next();
        let (sender, receiver) = outbound_channel(OUTBOUND_QUEUE_SIZE);
        self.submit(ServerEvent::Connected { id, sender })
            .then_some((id, receiver))
    }

    /// 提交客户端消息
    pub fn message(&self, id: ConnectionId, msg: ClientMessage) -> bool {
        self.submit(ServerEvent::Message { id, msg })
    }

    /// 通知连接断开
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.submit(ServerEvent::Disconnected { id })
    }

    fn submit(&self, event: ServerEvent) -> bool {
        if self.events.send(event).is_err() {
            debug!("事件循环已停止，丢弃事件");
            return false;
        }
        true
    }
}

/// 事件循环：逐个处理事件，每个事件处理完成后才处理下一个
pub async fn run_event_loop(
    mut events: mpsc::UnboundedReceiver<ServerEvent>,
    mut state: ServerState,
) -> ServerState {
    while let Some(event) = events.recv().await {
        match event {
            ServerEvent::Connected { id, sender } => {
                MessageHandler::handle_connect(&mut state, id, sender)
            }
            ServerEvent::Message { id, msg } => MessageHandler::handle(&mut state, id, msg),
            ServerEvent::Disconnected { id } => MessageHandler::handle_disconnect(&mut state, id),
        }
    }

    info!("事件循环退出，剩余对局 {}", state.sessions.count());
    state
}
