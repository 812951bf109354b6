use std::sync::Arc;

use common::UserId;
use common::games::tictactoe::{
    BOT_MARK, Board, HUMAN_MARK, MoveError, calculate_minimax_move,
};
use common::{log, log_error};

use crate::leaderboard::{Leaderboard, ScoreStore};
use crate::reward::{PrizeDesk, Reward};
use crate::session_store::SessionStore;

#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    Rejected { board: Board, reason: MoveError },
    Continue { board: Board, bot_move: usize },
    HumanWon { board: Board, wins: u32, reward: Reward },
    BotWon { board: Board, bot_move: usize },
    Draw { board: Board },
}

impl MoveOutcome {
    pub fn board(&self) -> &Board {
        match self {
            MoveOutcome::Rejected { board, .. }
            | MoveOutcome::Continue { board, .. }
            | MoveOutcome::HumanWon { board, .. }
            | MoveOutcome::BotWon { board, .. }
            | MoveOutcome::Draw { board } => board,
        }
    }

    pub fn is_terminal(&self) -> bool {
        match self {
            MoveOutcome::Rejected { board, .. } => board.status().is_over(),
            MoveOutcome::Continue { .. } => false,
            MoveOutcome::HumanWon { .. } | MoveOutcome::BotWon { .. } | MoveOutcome::Draw { .. } => true,
        }
    }
}

/// Plays one human move and the bot's reply against the user's stored game.
pub struct GameController<TStore: ScoreStore> {
    sessions: SessionStore,
    leaderboard: Arc<Leaderboard<TStore>>,
    prize_desk: Arc<PrizeDesk>,
}

impl<TStore: ScoreStore> Clone for GameController<TStore> {
    fn clone(&self) -> Self {
        Self {
            sessions: self.sessions.clone(),
            leaderboard: self.leaderboard.clone(),
            prize_desk: self.prize_desk.clone(),
        }
    }
}

impl<TStore: ScoreStore> GameController<TStore> {
    pub fn new(
        sessions: SessionStore,
        leaderboard: Arc<Leaderboard<TStore>>,
        prize_desk: Arc<PrizeDesk>,
    ) -> Self {
        Self {
            sessions,
            leaderboard,
            prize_desk,
        }
    }

    pub fn leaderboard(&self) -> &Leaderboard<TStore> {
        &self.leaderboard
    }

    pub async fn start_game(&self, user_id: &UserId) -> Board {
        log!("[user:{}] Starting new game", user_id);
        self.sessions.start_game(user_id).await
    }

    pub async fn restart(&self, user_id: &UserId) -> Board {
        log!("[user:{}] Restarting game", user_id);
        self.sessions.start_game(user_id).await
    }

    pub async fn submit_move(&self, user_id: &UserId, index: usize) -> MoveOutcome {
        let handle = self.sessions.session(user_id).await;
        let mut session = handle.lock().await;
        session.touch();

        if session.status().is_over() {
            return MoveOutcome::Rejected {
                board: session.board,
                reason: MoveError::GameOver,
            };
        }

        if let Err(reason) = session.board.place(index, HUMAN_MARK) {
            log!("[user:{}] Rejected move at {}: {}", user_id, index, reason);
            return MoveOutcome::Rejected {
                board: session.board,
                reason,
            };
        }

        if session.board.is_win(HUMAN_MARK) {
            let wins = self.leaderboard.record_win(user_id).await;
            let reward = self.claim_reward(user_id, wins);
            log!("[user:{}] Won the game, total wins: {}", user_id, wins);
            return MoveOutcome::HumanWon {
                board: session.board,
                wins,
                reward,
            };
        }

        if session.board.is_full() {
            return MoveOutcome::Draw {
                board: session.board,
            };
        }

        let board = session.board;
        let reply = match tokio::task::spawn_blocking(move || calculate_minimax_move(&board, BOT_MARK)).await {
            Ok(reply) => reply,
            Err(e) => {
                log_error!("[user:{}] Minimax task failed, searching inline: {}", user_id, e);
                calculate_minimax_move(&board, BOT_MARK)
            }
        };

        let Some(bot_move) = reply else {
            return MoveOutcome::Draw {
                board: session.board,
            };
        };

        if let Err(e) = session.board.place(bot_move, BOT_MARK) {
            log_error!("[user:{}] Bot failed to place mark at {}: {}", user_id, bot_move, e);
        }

        if session.board.is_win(BOT_MARK) {
            return MoveOutcome::BotWon {
                board: session.board,
                bot_move,
            };
        }

        MoveOutcome::Continue {
            board: session.board,
            bot_move,
        }
    }

    fn claim_reward(&self, user_id: &UserId, wins: u32) -> Reward {
        match self.prize_desk.claim(wins) {
            Ok(reward) => reward,
            Err(e) => {
                log_error!("[user:{}] Failed to read prize asset: {}", user_id, e);
                Reward::fallback()
            }
        }
    }
}
