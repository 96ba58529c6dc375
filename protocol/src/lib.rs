//! XO 对战共享协议库
//!
//! 包含:
//! - 棋子标记、棋盘等核心数据结构
//! - 胜负判定（8 条固定连线）
//! - 消息类型定义 (ClientMessage, ServerMessage)
//! - 文本帧编解码 (JSON)

mod board;
mod codec;
mod constants;
mod error;
mod mark;
mod message;

pub use board::{Board, Cell};
pub use codec::{decode_client, decode_server, encode_client, encode_server};
pub use constants::*;
pub use error::{MoveError, ProtocolError, Result};
pub use mark::Mark;
pub use message::{ClientMessage, ConnectionId, GameId, GameSnapshot, ServerMessage, Winner};
