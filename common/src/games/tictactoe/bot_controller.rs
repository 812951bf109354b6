use super::board::Board;
use super::types::Mark;

const WIN_SCORE: i32 = 1;
const LOSS_SCORE: i32 = -1;
const DRAW_SCORE: i32 = 0;

/// Picks the bot's move by exhaustive minimax over every continuation.
///
/// Leaves score +1 for a bot win, -1 for a loss and 0 for a draw, with no
/// preference for quicker wins. Candidates are tried in ascending index order
/// and only a strictly better score replaces the current choice, so ties go
/// to the lowest index.
///
/// Returns `None` when the board has no empty cell. The caller's board is not
/// touched: the search runs on a scratch copy and undoes every placement.
pub fn calculate_minimax_move(board: &Board, bot_mark: Mark) -> Option<usize> {
    let opponent_mark = bot_mark.opponent()?;
    let available_moves = board.available_moves();

    if available_moves.is_empty() {
        return None;
    }

    let mut scratch = *board;
    let mut best_move = None;
    let mut best_score = i32::MIN;

    for index in available_moves {
        if scratch.place(index, bot_mark).is_err() {
            continue;
        }
        let score = minimax(&mut scratch, false, bot_mark, opponent_mark);
        scratch.clear(index);

        if score > best_score {
            best_score = score;
            best_move = Some(index);
        }
    }

    best_move
}

fn minimax(board: &mut Board, is_maximizing: bool, bot_mark: Mark, opponent_mark: Mark) -> i32 {
    if board.is_win(bot_mark) {
        return WIN_SCORE;
    }
    if board.is_win(opponent_mark) {
        return LOSS_SCORE;
    }
    if board.is_full() {
        return DRAW_SCORE;
    }

    let mover = if is_maximizing { bot_mark } else { opponent_mark };
    let mut best = if is_maximizing { i32::MIN } else { i32::MAX };

    for index in board.available_moves() {
        if board.place(index, mover).is_err() {
            continue;
        }
        let eval = minimax(board, !is_maximizing, bot_mark, opponent_mark);
        board.clear(index);

        best = if is_maximizing { best.max(eval) } else { best.min(eval) };
    }

    best
}
