//! 连接管理

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::FutureExt;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use tracing::debug;

use protocol::{ConnectionId, GameId, GameSnapshot, ServerMessage};

/// 连接 ID 生成器，可在多个 WebSocket 任务间共享
#[derive(Debug)]
pub struct ConnectionIdGenerator {
    next_id: AtomicU64,
}

impl ConnectionIdGenerator {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
        }
    }

    /// 生成新的连接 ID
    pub fn next(&self) -> ConnectionId {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for ConnectionIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// 创建连接的发送通道
///
/// `gameState` 是完整快照，只保留最新一份；其余消息进入长度为 `capacity` 的队列。
pub fn outbound_channel(capacity: usize) -> (OutboundSender, OutboundReceiver) {
    let (control_tx, control_rx) = mpsc::channel(capacity);
    let (state_tx, state_rx) = watch::channel(None);
    (
        OutboundSender {
            control: control_tx,
            state: state_tx,
        },
        OutboundReceiver {
            control: control_rx,
            state: state_rx,
        },
    )
}

/// 发送端，由事件循环持有
#[derive(Debug)]
pub struct OutboundSender {
    control: mpsc::Sender<ServerMessage>,
    state: watch::Sender<Option<GameSnapshot>>,
}

impl OutboundSender {
    /// 发送消息，新快照覆盖尚未发出的旧快照
    pub fn send(&self, msg: ServerMessage) -> Result<(), &'static str> {
        match msg {
            ServerMessage::GameState(snapshot) => self
                .state
                .send(Some(snapshot))
                .map_err(|_| "connection closed"),
            other => self.control.try_send(other).map_err(|err| match err {
                TrySendError::Full(_) => "queue full",
                TrySendError::Closed(_) => "connection closed",
            }),
        }
    }
}

/// 接收端，由连接的写任务持有
#[derive(Debug)]
pub struct OutboundReceiver {
    control: mpsc::Receiver<ServerMessage>,
    state: watch::Receiver<Option<GameSnapshot>>,
}

impl OutboundReceiver {
    /// 接收下一条消息，发送端丢弃且消息取完后返回 None
    ///
    /// `gameFull` 只会发给尚未加入对局的连接，先于任何快照，因此优先取队列。
    pub async fn recv(&mut self) -> Option<ServerMessage> {
        loop {
            tokio::select! {
                biased;
                Some(msg) = self.control.recv() => return Some(msg),
                Ok(()) = self.state.changed() => {
                    let latest = self.state.borrow_and_update().clone();
                    if let Some(snapshot) = latest {
                        return Some(ServerMessage::GameState(snapshot));
                    }
                }
                else => return None,
            }
        }
    }

    /// 不等待，取出当前可用的消息
    pub fn try_recv(&mut self) -> Option<ServerMessage> {
        self.recv().now_or_never().flatten()
    }
}

/// 单个连接的上下文
#[derive(Debug)]
pub struct ConnectionSession {
    pub id: ConnectionId,
    sender: OutboundSender,
    /// 加入成功后记录，连接存续期间不再改变
    game_id: Option<GameId>,
}

impl ConnectionSession {
    pub fn new(id: ConnectionId, sender: OutboundSender) -> Self {
        Self {
            id,
            sender,
            game_id: None,
        }
    }

    pub fn game_id(&self) -> Option<&str> {
        self.game_id.as_deref()
    }

    /// 绑定对局，已绑定时返回 false
    pub fn bind_game(&mut self, game_id: &str) -> bool {
        if self.game_id.is_some() {
            return false;
        }
        self.game_id = Some(game_id.to_string());
        true
    }

    /// 发送消息，连接已关闭或队列已满时丢弃
    pub fn send(&self, msg: ServerMessage) -> bool {
        match self.sender.send(msg) {
            Ok(()) => true,
            Err(err) => {
                debug!("连接 {} 消息发送失败: {}", self.id, err);
                false
            }
        }
    }
}

/// 连接管理器
#[derive(Debug, Default)]
pub struct ConnectionManager {
    connections: HashMap<ConnectionId, ConnectionSession>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: HashMap::new(),
        }
    }

    /// 注册连接
    pub fn register(&mut self, id: ConnectionId, sender: OutboundSender) {
        self.connections.insert(id, ConnectionSession::new(id, sender));
    }

    /// 移除连接
    pub fn remove(&mut self, id: ConnectionId) -> Option<ConnectionSession> {
        self.connections.remove(&id)
    }

    pub fn get(&self, id: ConnectionId) -> Option<&ConnectionSession> {
        self.connections.get(&id)
    }

    pub fn get_mut(&mut self, id: ConnectionId) -> Option<&mut ConnectionSession> {
        self.connections.get_mut(&id)
    }

    /// 发送消息给单个连接
    pub fn send_to(&self, id: ConnectionId, msg: ServerMessage) {
        if let Some(session) = self.connections.get(&id) {
            session.send(msg);
        }
    }

    /// 获取在线连接数量
    pub fn count(&self) -> usize {
        self.connections.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameState;
    use protocol::Mark;

    #[test]
    fn test_generate_ids() {
        let ids = ConnectionIdGenerator::new();
        let id1 = ids.next();
        let id2 = ids.next();
        assert!(id1 > 0);
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_bind_game_once() {
        let (tx, _rx) = outbound_channel(1);
        let mut session = ConnectionSession::new(1, tx);
        assert_eq!(session.game_id(), None);

        assert!(session.bind_game("abc"));
        assert!(!session.bind_game("other"));
        assert_eq!(session.game_id(), Some("abc"));
    }

    #[test]
    fn test_send_to() {
        let mut manager = ConnectionManager::new();
        let (tx, mut rx) = outbound_channel(4);
        manager.register(7, tx);
        assert_eq!(manager.count(), 1);

        manager.send_to(7, ServerMessage::GameFull);
        manager.send_to(8, ServerMessage::GameFull);
        assert_eq!(rx.try_recv(), Some(ServerMessage::GameFull));
        assert_eq!(rx.try_recv(), None);

        assert!(manager.remove(7).is_some());
        assert!(manager.get(7).is_none());
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let (tx, rx) = outbound_channel(1);
        let session = ConnectionSession::new(1, tx);
        drop(rx);
        assert!(!session.send(ServerMessage::GameFull));
        assert!(!session.send(ServerMessage::GameState(GameState::new().snapshot())));
    }

    fn snapshot_with_move(position: usize) -> GameSnapshot {
        let mut game = GameState::new();
        assert!(game.make_move(position));
        game.snapshot()
    }

    #[test]
    fn test_stalled_client_gets_latest_state() {
        let (tx, mut rx) = outbound_channel(2);
        let session = ConnectionSession::new(1, tx);

        for _ in 0..40 {
            assert!(session.send(ServerMessage::GameState(GameState::new().snapshot())));
        }
        assert!(session.send(ServerMessage::GameState(snapshot_with_move(4))));

        match rx.try_recv() {
            Some(ServerMessage::GameState(snapshot)) => {
                assert_eq!(snapshot.board.get(4), Some(Mark::X));
            }
            other => panic!("expected game state, got {other:?}"),
        }
        assert_eq!(rx.try_recv(), None);
    }

    #[test]
    fn test_game_full_before_state() {
        let (tx, mut rx) = outbound_channel(2);
        let session = ConnectionSession::new(1, tx);

        assert!(session.send(ServerMessage::GameFull));
        assert!(session.send(ServerMessage::GameState(snapshot_with_move(0))));

        assert_eq!(rx.try_recv(), Some(ServerMessage::GameFull));
        assert!(matches!(rx.try_recv(), Some(ServerMessage::GameState(_))));
        assert_eq!(rx.try_recv(), None);
    }

    #[test]
    fn test_pending_state_survives_close() {
        let (tx, mut rx) = outbound_channel(1);
        let session = ConnectionSession::new(1, tx);
        assert!(session.send(ServerMessage::GameState(snapshot_with_move(8))));
        drop(session);

        assert!(matches!(rx.try_recv(), Some(ServerMessage::GameState(_))));
        assert_eq!(rx.try_recv(), None);
    }
}
