#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    OutOfRange { index: usize },
    CellOccupied { index: usize },
    GameOver,
}

impl std::fmt::Display for MoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveError::OutOfRange { index } => write!(f, "Cell {} is out of range", index),
            MoveError::CellOccupied { index } => write!(f, "Cell {} is already marked", index),
            MoveError::GameOver => write!(f, "Game is already over"),
        }
    }
}

impl std::error::Error for MoveError {}
