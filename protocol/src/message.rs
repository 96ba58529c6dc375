//! 消息类型定义
//!
//! 每条消息是一个 JSON 对象 `{"event": <事件名>, "data": <负载>}`，
//! 无负载的事件省略 `data`。

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::mark::Mark;

/// 连接 ID（服务端分配，仅在本进程内有效）
pub type ConnectionId = u64;

/// 对局 ID（客户端生成的任意字符串）
pub type GameId = String;

/// 对局结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    X,
    O,
    /// 和棋
    #[serde(rename = "draw")]
    Draw,
}

impl From<Mark> for Winner {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Winner::X,
            Mark::O => Winner::O,
        }
    }
}

/// 对局快照，每次状态变化后广播给对局内所有玩家
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub board: Board,
    pub current_player: Mark,
    pub game_over: bool,
    pub winner: Option<Winner>,
    /// 当前对局人数 (0..=2)
    pub players: usize,
}

/// 客户端发送给服务端的消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    /// 加入（或创建）对局
    JoinGame(GameId),
    /// 落子，位置 0..=8
    MakeMove(usize),
    /// 重新开始
    ResetGame,
}

/// 服务端发送给客户端的消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    /// 对局状态
    GameState(GameSnapshot),
    /// 对局已满，仅发给被拒绝的连接
    GameFull,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_wire_format() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"event":"joinGame","data":"abc123"}"#).unwrap();
        assert_eq!(msg, ClientMessage::JoinGame("abc123".to_string()));

        let msg: ClientMessage = serde_json::from_str(r#"{"event":"makeMove","data":4}"#).unwrap();
        assert_eq!(msg, ClientMessage::MakeMove(4));

        let msg: ClientMessage = serde_json::from_str(r#"{"event":"resetGame"}"#).unwrap();
        assert_eq!(msg, ClientMessage::ResetGame);
    }

    #[test]
    fn test_invalid_client_messages() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"event":"makeMove","data":-1}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>(r#"{"event":"makeMove","data":"4"}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>(r#"{"event":"chat","data":"hi"}"#).is_err());
    }

    #[test]
    fn test_game_state_payload() {
        let mut board = Board::empty();
        board.place(0, Mark::X);
        let msg = ServerMessage::GameState(GameSnapshot {
            board,
            current_player: Mark::O,
            game_over: false,
            winner: None,
            players: 2,
        });

        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "event": "gameState",
                "data": {
                    "board": ["X", "", "", "", "", "", "", "", ""],
                    "currentPlayer": "O",
                    "gameOver": false,
                    "winner": null,
                    "players": 2
                }
            })
        );
    }

    #[test]
    fn test_winner_names() {
        assert_eq!(serde_json::to_string(&Winner::Draw).unwrap(), "\"draw\"");
        assert_eq!(serde_json::to_string(&Winner::X).unwrap(), "\"X\"");
        assert_eq!(Winner::from(Mark::O), Winner::O);
    }

    #[test]
    fn test_game_full_has_no_payload() {
        let json = serde_json::to_string(&ServerMessage::GameFull).unwrap();
        assert_eq!(json, r#"{"event":"gameFull"}"#);
    }
}
