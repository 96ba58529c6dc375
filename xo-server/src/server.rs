//! 服务器主逻辑
//!
//! 所有事件都在同一个任务中顺序处理，处理过程中只修改状态、
//! 把待发送消息放入 `PendingMessages`，处理结束后统一发送。

use tracing::{debug, info, warn};

use protocol::{ClientMessage, ConnectionId, GameId, ServerMessage};

use crate::connection::{ConnectionManager, ConnectionSession, OutboundSender};
use crate::registry::{JoinOutcome, LeaveOutcome, SessionRegistry};

/// 服务器状态
#[derive(Debug, Default)]
pub struct ServerState {
    pub sessions: SessionRegistry,
    pub connections: ConnectionManager,
}

impl ServerState {
    pub fn new() -> Self {
        Self {
            sessions: SessionRegistry::new(),
            connections: ConnectionManager::new(),
        }
    }

    /// 发送消息给单个连接
    pub fn send_to_connection(&self, connection_id: ConnectionId, msg: ServerMessage) {
        self.connections.send_to(connection_id, msg);
    }

    /// 广播消息给对局内所有玩家
    pub fn broadcast_to_game(&self, game_id: &str, msg: ServerMessage) {
        if let Some(game) = self.sessions.get(game_id) {
            for &id in game.participants() {
                self.connections.send_to(id, msg.clone());
            }
        }
    }
}

/// 待发送的消息
struct PendingMessages {
    messages: Vec<(ConnectionId, ServerMessage)>,
    broadcasts: Vec<(GameId, ServerMessage)>,
}

impl PendingMessages {
    fn new() -> Self {
        Self {
            messages: Vec::new(),
            broadcasts: Vec::new(),
        }
    }

    fn send(&mut self, connection_id: ConnectionId, msg: ServerMessage) {
        self.messages.push((connection_id, msg));
    }

    fn broadcast(&mut self, game_id: &str, msg: ServerMessage) {
        self.broadcasts.push((game_id.to_string(), msg));
    }

    fn flush(self, state: &ServerState) {
        for (connection_id, msg) in self.messages {
            state.send_to_connection(connection_id, msg);
        }
        for (game_id, msg) in self.broadcasts {
            state.broadcast_to_game(&game_id, msg);
        }
    }
}

/// 消息处理器
pub struct MessageHandler;

impl MessageHandler {
    /// 新连接接入
    pub fn handle_connect(
        state: &mut ServerState,
        connection_id: ConnectionId,
        sender: OutboundSender,
    ) {
        state.connections.register(connection_id, sender);
        info!(
            "连接 {} 已接入，当前连接数 {}",
            connection_id,
            state.connections.count()
        );
    }

    /// 处理客户端消息
    pub fn handle(state: &mut ServerState, connection_id: ConnectionId, msg: ClientMessage) {
        let mut pending = PendingMessages::new();

        let ServerState {
            sessions,
            connections,
        } = &mut *state;
        let Some(conn) = connections.get_mut(connection_id) else {
            debug!("忽略未注册连接 {} 的消息", connection_id);
            return;
        };

        match msg {
            ClientMessage::JoinGame(game_id) => {
                Self::handle_join_game(sessions, conn, &mut pending, &game_id)
            }
            ClientMessage::MakeMove(position) => {
                Self::handle_make_move(sessions, conn, &mut pending, position)
            }
            ClientMessage::ResetGame => Self::handle_reset_game(sessions, conn, &mut pending),
        }

        // 发送待发送的消息
        pending.flush(state);
    }

    /// 处理加入对局
    fn handle_join_game(
        sessions: &mut SessionRegistry,
        conn: &mut ConnectionSession,
        pending: &mut PendingMessages,
        game_id: &str,
    ) {
        // 一个连接只属于一个对局
        if let Some(current) = conn.game_id() {
            if current != game_id {
                warn!(
                    "连接 {} 已在对局 {:?} 中，忽略加入 {:?}",
                    conn.id, current, game_id
                );
                return;
            }
        }

        match sessions.join_or_create(game_id, conn.id) {
            JoinOutcome::Joined(snapshot) => {
                conn.bind_game(game_id);
                info!(
                    "连接 {} 加入对局 {:?} ({}/2)",
                    conn.id, game_id, snapshot.players
                );
                pending.broadcast(game_id, ServerMessage::GameState(snapshot));
            }
            JoinOutcome::Full => {
                info!("对局 {:?} 已满，拒绝连接 {}", game_id, conn.id);
                pending.send(conn.id, ServerMessage::GameFull);
            }
        }
    }

    /// 处理落子
    fn handle_make_move(
        sessions: &mut SessionRegistry,
        conn: &ConnectionSession,
        pending: &mut PendingMessages,
        position: usize,
    ) {
        let Some(game_id) = conn.game_id() else {
            debug!("连接 {} 未加入对局，忽略落子", conn.id);
            return;
        };
        let Some(game) = sessions.get_mut(game_id) else {
            debug!("对局 {:?} 不存在，忽略落子", game_id);
            return;
        };

        // 非法落子不回复，客户端本地已做校验
        if let Err(err) = game.try_move(position) {
            debug!("对局 {:?} 拒绝连接 {} 的落子: {}", game_id, conn.id, err);
            return;
        }

        if let Some(winner) = game.winner() {
            info!("对局 {:?} 结束: {:?}", game_id, winner);
        }
        pending.broadcast(game_id, ServerMessage::GameState(game.snapshot()));
    }

    /// 处理重新开始
    fn handle_reset_game(
        sessions: &mut SessionRegistry,
        conn: &ConnectionSession,
        pending: &mut PendingMessages,
    ) {
        let Some(game_id) = conn.game_id() else {
            debug!("连接 {} 未加入对局，忽略重新开始", conn.id);
            return;
        };
        let Some(game) = sessions.get_mut(game_id) else {
            return;
        };

        game.reset();
        pending.broadcast(game_id, ServerMessage::GameState(game.snapshot()));
    }

    /// 处理连接断开，不通知对手
    pub fn handle_disconnect(state: &mut ServerState, connection_id: ConnectionId) {
        let Some(conn) = state.connections.remove(connection_id) else {
            return;
        };

        if let Some(game_id) = conn.game_id() {
            match state.sessions.leave(game_id, connection_id) {
                LeaveOutcome::Removed => info!("对局 {:?} 已无玩家，删除", game_id),
                LeaveOutcome::Left { remaining } => {
                    debug!("对局 {:?} 剩余 {} 名玩家", game_id, remaining)
                }
                LeaveOutcome::NotFound => {}
            }
        }

        info!(
            "连接 {} 已断开，当前连接数 {}",
            connection_id,
            state.connections.count()
        );
    }
}
