//! 棋盘状态

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_CELLS, WIN_LINES};
use crate::mark::Mark;

/// 单个格子：空或某一方的标记
pub type Cell = Option<Mark>;

/// 3x3 棋盘，索引为 row * 3 + col
///
/// 序列化为 9 个字符串的数组（"" / "X" / "O"），与客户端渲染格式一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Board {
    cells: [Cell; BOARD_CELLS],
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            cells: [None; BOARD_CELLS],
        }
    }

    /// 从格子数组创建
    pub fn from_cells(cells: [Cell; BOARD_CELLS]) -> Self {
        Self { cells }
    }

    /// 获取指定位置的格子，越界返回 None
    pub fn get(&self, index: usize) -> Cell {
        self.cells.get(index).copied().flatten()
    }

    /// 指定位置是否可落子（在棋盘内且为空）
    pub fn is_vacant(&self, index: usize) -> bool {
        matches!(self.cells.get(index), Some(None))
    }

    /// 落子（不检查规则），越界时忽略
    pub fn place(&mut self, index: usize, mark: Mark) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = Some(mark);
        }
    }

    /// 清空棋盘
    pub fn clear(&mut self) {
        self.cells = [None; BOARD_CELLS];
    }

    /// 所有格子都已落子
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// 查找第一条被同一标记占满的连线
    pub fn winning_line(&self) -> Option<(Mark, [usize; 3])> {
        WIN_LINES.iter().find_map(|&line| {
            let [a, b, c] = line;
            match self.cells[a] {
                Some(mark) if self.cells[b] == Some(mark) && self.cells[c] == Some(mark) => {
                    Some((mark, line))
                }
                _ => None,
            }
        })
    }

    /// 获胜方标记（如果有）
    pub fn winner(&self) -> Option<Mark> {
        self.winning_line().map(|(mark, _)| mark)
    }

    /// 已落子数
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Board> for Vec<String> {
    fn from(board: Board) -> Self {
        board
            .cells
            .iter()
            .map(|&cell| cell.map(Mark::as_str).unwrap_or("").to_string())
            .collect()
    }
}

impl TryFrom<Vec<String>> for Board {
    type Error = String;

    fn try_from(values: Vec<String>) -> Result<Self, Self::Error> {
        if values.len() != BOARD_CELLS {
            return Err(format!(
                "board must have {} cells, got {}",
                BOARD_CELLS,
                values.len()
            ));
        }

        let mut cells = [None; BOARD_CELLS];
        for (cell, value) in cells.iter_mut().zip(&values) {
            *cell = match value.as_str() {
                "" => None,
                "X" => Some(Mark::X),
                "O" => Some(Mark::O),
                other => return Err(format!("invalid cell value: {other:?}")),
            };
        }
        Ok(Self { cells })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from(s: &str) -> Board {
        let mut cells = [None; BOARD_CELLS];
        for (cell, c) in cells.iter_mut().zip(s.chars()) {
            *cell = match c {
                'X' => Some(Mark::X),
                'O' => Some(Mark::O),
                _ => None,
            };
        }
        Board::from_cells(cells)
    }

    #[test]
    fn test_empty_board() {
        let board = Board::empty();
        assert_eq!(board.occupied(), 0);
        assert!(!board.is_full());
        assert!(board.winner().is_none());
        assert!((0..BOARD_CELLS).all(|i| board.is_vacant(i)));
    }

    #[test]
    fn test_out_of_range() {
        let mut board = Board::empty();
        assert!(!board.is_vacant(9));
        assert_eq!(board.get(42), None);

        board.place(9, Mark::X);
        assert_eq!(board.occupied(), 0);
    }

    #[test]
    fn test_every_win_line() {
        for line in WIN_LINES {
            let mut board = Board::empty();
            for &i in &line {
                board.place(i, Mark::O);
            }
            assert_eq!(board.winning_line(), Some((Mark::O, line)));
        }
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        let board = board_from("XXO......");
        assert!(board.winner().is_none());
    }

    #[test]
    fn test_full_board_without_winner() {
        let board = board_from("XOXXOOOXX");
        assert!(board.is_full());
        assert!(board.winner().is_none());
    }

    #[test]
    fn test_serialize_as_strings() {
        let board = board_from("X...O....");
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, r#"["X","","","","O","","","",""]"#);

        let decoded: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, board);
    }

    #[test]
    fn test_deserialize_rejects_bad_input() {
        assert!(serde_json::from_str::<Board>(r#"["X","O"]"#).is_err());
        assert!(serde_json::from_str::<Board>(r#"["Z","","","","","","","",""]"#).is_err());
    }
}
