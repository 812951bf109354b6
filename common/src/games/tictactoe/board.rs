use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::MoveError;
use super::types::{BOARD_SIZE, CELL_COUNT, GameStatus, Mark};
use super::win_detector::{check_win, has_line};

/// A 3x3 tic-tac-toe grid, cells indexed row by row from 0 to 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [Mark; CELL_COUNT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [Mark::Empty; CELL_COUNT],
        }
    }

    pub fn from_cells(cells: [Mark; CELL_COUNT]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Mark; CELL_COUNT] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<Mark> {
        self.cells.get(index).copied()
    }

    pub fn is_empty_cell(&self, index: usize) -> bool {
        self.cell(index) == Some(Mark::Empty)
    }

    pub fn place(&mut self, index: usize, mark: Mark) -> Result<(), MoveError> {
        match self.cells.get_mut(index) {
            None => Err(MoveError::OutOfRange { index }),
            Some(cell) if *cell != Mark::Empty => Err(MoveError::CellOccupied { index }),
            Some(cell) => {
                *cell = mark;
                Ok(())
            }
        }
    }

    /// Undoes a speculative `place`. Out-of-range indices are ignored.
    pub fn clear(&mut self, index: usize) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = Mark::Empty;
        }
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&cell| cell != Mark::Empty)
    }

    pub fn is_win(&self, mark: Mark) -> bool {
        has_line(self, mark)
    }

    pub fn winner(&self) -> Option<Mark> {
        check_win(self)
    }

    pub fn status(&self) -> GameStatus {
        match self.winner() {
            Some(Mark::X) => GameStatus::XWon,
            Some(Mark::O) => GameStatus::OWon,
            _ if self.is_full() => GameStatus::Draw,
            _ => GameStatus::InProgress,
        }
    }

    pub fn available_moves(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Mark::Empty)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Returns `(x_count, o_count)`.
    pub fn mark_counts(&self) -> (usize, usize) {
        self.cells.iter().fold((0, 0), |(x, o), cell| match cell {
            Mark::X => (x + 1, o),
            Mark::O => (x, o + 1),
            Mark::Empty => (x, o),
        })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row_idx, row) in self.cells.chunks(BOARD_SIZE).enumerate() {
            if row_idx > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}
