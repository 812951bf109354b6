use super::board::Board;
use super::types::Mark;

pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2], [3, 4, 5], [6, 7, 8], // rows
    [0, 3, 6], [1, 4, 7], [2, 5, 8], // columns
    [0, 4, 8], [2, 4, 6],            // diagonals
];

pub fn has_line(board: &Board, mark: Mark) -> bool {
    if mark == Mark::Empty {
        return false;
    }
    WINNING_LINES
        .iter()
        .any(|line| line.iter().all(|&idx| board.cell(idx) == Some(mark)))
}

pub fn check_win(board: &Board) -> Option<Mark> {
    winning_line(board).map(|line| line.mark)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinningLine {
    pub mark: Mark,
    pub cells: [usize; 3],
}

pub fn winning_line(board: &Board) -> Option<WinningLine> {
    for line in &WINNING_LINES {
        let Some(first) = board.cell(line[0]) else {
            continue;
        };
        if first == Mark::Empty {
            continue;
        }
        if line.iter().all(|&idx| board.cell(idx) == Some(first)) {
            return Some(WinningLine { mark: first, cells: *line });
        }
    }
    None
}
