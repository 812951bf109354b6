mod board;
mod bot_controller;
mod error;
mod types;
mod win_detector;

pub use board::Board;
pub use bot_controller::calculate_minimax_move;
pub use error::MoveError;
pub use types::{BOARD_SIZE, BOT_MARK, CELL_COUNT, GameStatus, HUMAN_MARK, Mark};
pub use win_detector::{WINNING_LINES, WinningLine, check_win, winning_line};
