//! 对局控制
//!
//! 一局 XO 的完整状态：棋盘、走子方、结果以及两名玩家的连接。

use protocol::{Board, ConnectionId, GameSnapshot, Mark, MoveError, Winner, BOARD_CELLS, MAX_PLAYERS};

/// 单局对局状态
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    /// 当前走子方，对局结束后无意义
    current_player: Mark,
    game_over: bool,
    /// 仅在 game_over 为 true 时有值
    winner: Option<Winner>,
    /// 按入场顺序排列的玩家连接，第一个为 X
    participants: Vec<ConnectionId>,
}

impl GameState {
    /// 创建新对局
    pub fn new() -> Self {
        Self {
            board: Board::empty(),
            current_player: Mark::X,
            game_over: false,
            winner: None,
            participants: Vec::with_capacity(MAX_PLAYERS),
        }
    }

    /// 落子，成功返回 true
    ///
    /// 对局已结束、格子已占用或越界时返回 false，且状态不变。
    pub fn make_move(&mut self, position: usize) -> bool {
        self.try_move(position).is_ok()
    }

    /// 落子并返回失败原因
    pub fn try_move(&mut self, position: usize) -> Result<(), MoveError> {
        if self.game_over {
            return Err(MoveError::GameOver);
        }
        if position >= BOARD_CELLS {
            return Err(MoveError::OutOfRange { position });
        }
        if !self.board.is_vacant(position) {
            return Err(MoveError::CellOccupied { position });
        }

        self.board.place(position, self.current_player);

        // 先判胜，再判和，最后换手
        if self.board.winner().is_some() {
            self.game_over = true;
            self.winner = Some(self.current_player.into());
        } else if self.board.is_full() {
            self.game_over = true;
            self.winner = Some(Winner::Draw);
        } else {
            self.current_player = self.current_player.opponent();
        }

        Ok(())
    }

    /// 重新开始，不影响玩家列表
    pub fn reset(&mut self) {
        self.board.clear();
        self.current_player = Mark::X;
        self.game_over = false;
        self.winner = None;
    }

    /// 生成当前快照
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board,
            current_player: self.current_player,
            game_over: self.game_over,
            winner: self.winner,
            players: self.participants.len(),
        }
    }

    /// 添加玩家，已满或已在对局中返回 false
    pub fn add_participant(&mut self, connection_id: ConnectionId) -> bool {
        if self.is_full() || self.has_participant(connection_id) {
            return false;
        }
        self.participants.push(connection_id);
        true
    }

    /// 移除玩家
    pub fn remove_participant(&mut self, connection_id: ConnectionId) -> bool {
        let before = self.participants.len();
        self.participants.retain(|&id| id != connection_id);
        self.participants.len() != before
    }

    pub fn has_participant(&self, connection_id: ConnectionId) -> bool {
        self.participants.contains(&connection_id)
    }

    /// 获取玩家按入场顺序对应的标记
    pub fn mark_of(&self, connection_id: ConnectionId) -> Option<Mark> {
        self.participants
            .iter()
            .position(|&id| id == connection_id)
            .and_then(Mark::from_slot)
    }

    pub fn participants(&self) -> &[ConnectionId] {
        &self.participants
    }

    pub fn player_count(&self) -> usize {
        self.participants.len()
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= MAX_PLAYERS
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Mark {
        self.current_player
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
