//! 错误类型定义

use thiserror::Error;

/// 落子规则错误
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// 游戏已结束
    #[error("Game is already over")]
    GameOver,

    /// 格子已被占用
    #[error("Cell {position} is already occupied")]
    CellOccupied { position: usize },

    /// 位置越界
    #[error("Position {position} is outside the board")]
    OutOfRange { position: usize },
}

/// 协议错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// JSON 序列化错误
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// 帧大小超限
    #[error("Frame too large: {size} bytes (max: {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// 不支持的帧类型（例如二进制帧）
    #[error("Unsupported frame type: {0}")]
    UnsupportedFrame(&'static str),
}

/// 协议操作结果类型
pub type Result<T> = std::result::Result<T, ProtocolError>;
