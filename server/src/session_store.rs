use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use common::UserId;
use common::games::tictactoe::{Board, GameStatus};
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
pub struct GameSession {
    pub board: Board,
    last_activity: Instant,
}

impl GameSession {
    fn new() -> Self {
        Self {
            board: Board::new(),
            last_activity: Instant::now(),
        }
    }

    pub fn status(&self) -> GameStatus {
        self.board.status()
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_activity.elapsed()
    }
}

pub type SessionHandle = Arc<Mutex<GameSession>>;

/// Owns every live game, one per user. Each game sits behind its own lock so
/// actions from one user run one at a time while different users proceed in
/// parallel.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<UserId, SessionHandle>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the user's session handle, binding an empty game if none exists.
    pub async fn session(&self, user_id: &UserId) -> SessionHandle {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(user_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(GameSession::new())))
            .clone()
    }

    pub async fn start_game(&self, user_id: &UserId) -> Board {
        let handle = self.session(user_id).await;
        let mut session = handle.lock().await;
        *session = GameSession::new();
        session.board
    }

    pub async fn current_board(&self, user_id: &UserId) -> Board {
        let handle = self.session(user_id).await;
        let session = handle.lock().await;
        session.board
    }

    pub async fn apply_and_replace(&self, user_id: &UserId, board: Board) {
        let handle = self.session(user_id).await;
        let mut session = handle.lock().await;
        session.board = board;
        session.touch();
    }

    /// Drops sessions untouched for longer than `timeout`. Sessions whose
    /// handle is held outside the map belong to an in-flight action and are
    /// kept.
    pub async fn evict_idle(&self, timeout: Duration) -> Vec<UserId> {
        let mut sessions = self.sessions.lock().await;
        let mut evicted = Vec::new();

        sessions.retain(|user_id, handle| {
            if Arc::strong_count(handle) > 1 {
                return true;
            }
            let keep = match handle.try_lock() {
                Ok(session) => session.idle_for() < timeout,
                Err(_) => true,
            };
            if !keep {
                evicted.push(user_id.clone());
            }
            keep
        });

        evicted
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::games::tictactoe::{BOT_MARK, HUMAN_MARK};

    fn user(id: &str) -> UserId {
        UserId::from(id)
    }

    #[tokio::test]
    async fn test_current_board_defaults_to_empty() {
        let store = SessionStore::new();
        assert_eq!(store.current_board(&user("alice")).await, Board::new());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_start_game_overwrites_existing_board() {
        let store = SessionStore::new();
        let alice = user("alice");

        let mut board = Board::new();
        board.place(0, HUMAN_MARK).unwrap();
        board.place(4, BOT_MARK).unwrap();
        store.apply_and_replace(&alice, board).await;
        assert_eq!(store.current_board(&alice).await, board);

        assert_eq!(store.start_game(&alice).await, Board::new());
        assert_eq!(store.current_board(&alice).await, Board::new());
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let store = SessionStore::new();
        let mut board = Board::new();
        board.place(8, HUMAN_MARK).unwrap();
        store.apply_and_replace(&user("alice"), board).await;

        assert_eq!(store.current_board(&user("bob")).await, Board::new());
        assert_eq!(store.current_board(&user("alice")).await, board);
    }

    #[tokio::test]
    async fn test_session_handle_is_shared() {
        let store = SessionStore::new();
        let alice = user("alice");
        {
            let handle = store.session(&alice).await;
            let mut session = handle.lock().await;
            session.board.place(3, HUMAN_MARK).unwrap();
        }
        assert_eq!(store.current_board(&alice).await.cell(3), Some(HUMAN_MARK));
    }

    #[tokio::test]
    async fn test_evict_idle_skips_fresh_and_busy_sessions() {
        let store = SessionStore::new();
        store.start_game(&user("idle")).await;
        store.start_game(&user("busy")).await;

        let busy = store.session(&user("busy")).await;
        let _guard = busy.lock().await;

        let evicted = store.evict_idle(Duration::ZERO).await;
        assert_eq!(evicted, vec![user("idle")]);
        assert_eq!(store.len().await, 1);

        assert!(store.evict_idle(Duration::from_secs(3600)).await.is_empty());
    }

    #[tokio::test]
    async fn test_evict_idle_keeps_session_fetched_before_lock() {
        let store = SessionStore::new();
        let alice = user("alice");
        store.start_game(&alice).await;

        let handle = store.session(&alice).await;
        assert!(store.evict_idle(Duration::ZERO).await.is_empty());

        handle.lock().await.board.place(4, HUMAN_MARK).unwrap();
        drop(handle);
        assert_eq!(store.current_board(&alice).await.cell(4), Some(HUMAN_MARK));
    }
}
