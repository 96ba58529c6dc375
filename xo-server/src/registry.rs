//! 对局注册表
//!
//! 对局 ID → 对局状态。对局在第一次加入时创建，最后一名玩家离开时删除。

use std::collections::HashMap;

use protocol::{ConnectionId, GameId, GameSnapshot};

use crate::game::GameState;

/// 加入对局的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// 加入成功，附带加入后的快照
    Joined(GameSnapshot),
    /// 对局已满，状态未改变
    Full,
}

/// 离开对局的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// 对局仍有玩家
    Left { remaining: usize },
    /// 最后一名玩家离开，对局已删除
    Removed,
    /// 对局不存在或连接不在对局中
    NotFound,
}

/// 对局注册表
#[derive(Debug, Default)]
pub struct SessionRegistry {
    games: HashMap<GameId, GameState>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            games: HashMap::new(),
        }
    }

    /// 加入对局，不存在则创建
    ///
    /// 已在对局中的连接再次加入时不会重复占位，直接返回当前快照。
    pub fn join_or_create(&mut self, game_id: &str, connection_id: ConnectionId) -> JoinOutcome {
        let game = self.games.entry(game_id.to_string()).or_default();

        if game.has_participant(connection_id) || game.add_participant(connection_id) {
            JoinOutcome::Joined(game.snapshot())
        } else {
            JoinOutcome::Full
        }
    }

    /// 获取对局
    pub fn get(&self, game_id: &str) -> Option<&GameState> {
        self.games.get(game_id)
    }

    /// 获取对局（可变）
    pub fn get_mut(&mut self, game_id: &str) -> Option<&mut GameState> {
        self.games.get_mut(game_id)
    }

    /// 离开对局，对局变空时删除
    pub fn leave(&mut self, game_id: &str, connection_id: ConnectionId) -> LeaveOutcome {
        let Some(game) = self.games.get_mut(game_id) else {
            return LeaveOutcome::NotFound;
        };

        if !game.remove_participant(connection_id) {
            return LeaveOutcome::NotFound;
        }

        if game.participants().is_empty() {
            self.games.remove(game_id);
            LeaveOutcome::Removed
        } else {
            LeaveOutcome::Left {
                remaining: game.player_count(),
            }
        }
    }

    pub fn contains(&self, game_id: &str) -> bool {
        self.games.contains_key(game_id)
    }

    /// 获取对局数量
    pub fn count(&self) -> usize {
        self.games.len()
    }
}
