//! 协议常量定义

/// 棋盘边长
pub const BOARD_WIDTH: usize = 3;

/// 棋盘格子总数
pub const BOARD_CELLS: usize = BOARD_WIDTH * BOARD_WIDTH;

/// 每局最多玩家数
pub const MAX_PLAYERS: usize = 2;

/// 8 条获胜连线（3 行、3 列、2 条对角线），按行优先索引
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// 单个文本帧最大字节数
pub const MAX_FRAME_SIZE: usize = 4096;

/// 默认监听端口
pub const DEFAULT_PORT: u16 = 3000;

/// 默认监听地址
pub const DEFAULT_HOST: &str = "0.0.0.0";
