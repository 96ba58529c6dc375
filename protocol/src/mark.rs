//! 玩家标记

use std::fmt;

use serde::{Deserialize, Serialize};

/// 玩家标记（先手为 X）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// 获取对方标记
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// 按入场顺序分配标记：第一个入场为 X，第二个为 O
    pub fn from_slot(slot: usize) -> Option<Self> {
        match slot {
            0 => Some(Mark::X),
            1 => Some(Mark::O),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mark::X => "X",
            Mark::O => "O",
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
