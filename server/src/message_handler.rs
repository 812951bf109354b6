use std::path::PathBuf;
use std::sync::Arc;

use common::UserId;
use common::games::tictactoe::{Board, MoveError};
use common::log_warn;
use serde::{Deserialize, Serialize};

use crate::game_controller::{GameController, MoveOutcome};
use crate::leaderboard::{LeaderboardEntry, ScoreStore};
use crate::media::{MediaError, MediaLibrary};
use crate::reward::Reward;

pub const MENU_SOCIALS: &str = "📱 My socials";
pub const MENU_MEME: &str = "🤣 Meme of the day";
pub const MENU_GAME: &str = "🎮 Tic-tac-toe";
pub const MENU_LEADERS: &str = "🏆 Leaders";

const START_TEXT: &str = "Choose a button 👇";
const NEW_GAME_TEXT: &str = "You play ❌. Good luck!";
const HUMAN_WON_TEXT: &str = "You won! 🎉";
const BOT_WON_TEXT: &str = "The bot won! Try again.";
const DRAW_TEXT: &str = "Draw! Try again.";
const NO_MEMES_TEXT: &str = "No memes yet 😢";
const NO_LEADERS_TEXT: &str = "Nobody has won yet 🙃";
const OCCUPIED_ALERT: &str = "Already taken!";
const GAME_OVER_ALERT: &str = "The game is over, press play again.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BotAction {
    Start,
    Socials,
    Meme,
    NewGame,
    Leaders,
    Move { index: usize },
    Restart,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotUpdate {
    pub user_id: UserId,
    pub action: BotAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoReply {
    pub path: PathBuf,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Keyboard {
    MainMenu { buttons: Vec<String> },
    Board { cells: Vec<String>, restart: bool },
}

/// Render instruction handed back to the chat transport.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BotReply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
    /// Sent as its own chat message after the main reply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<PhotoReply>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyboard: Option<Keyboard>,
}

impl BotReply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    fn alert(alert: impl Into<String>) -> Self {
        Self {
            alert: Some(alert.into()),
            ..Self::default()
        }
    }

    fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

pub fn main_menu() -> Keyboard {
    Keyboard::MainMenu {
        buttons: [MENU_SOCIALS, MENU_MEME, MENU_GAME, MENU_LEADERS]
            .iter()
            .map(|label| label.to_string())
            .collect(),
    }
}

pub fn render_board(board: &Board, restart: bool) -> Keyboard {
    Keyboard::Board {
        cells: board.cells().iter().map(|mark| mark.symbol().to_string()).collect(),
        restart,
    }
}

pub fn format_leaders(entries: &[LeaderboardEntry]) -> String {
    let mut text = String::from("🏆 Top players by wins:\n");
    for (position, entry) in entries.iter().enumerate() {
        text.push_str(&format!("{}. {} — {} wins\n", position + 1, entry.user_id, entry.wins));
    }
    text
}

pub struct MessageHandler<TStore: ScoreStore> {
    controller: GameController<TStore>,
    media: Arc<MediaLibrary>,
    socials_text: String,
    leaderboard_size: usize,
}

impl<TStore: ScoreStore> Clone for MessageHandler<TStore> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            media: self.media.clone(),
            socials_text: self.socials_text.clone(),
            leaderboard_size: self.leaderboard_size,
        }
    }
}

impl<TStore: ScoreStore> MessageHandler<TStore> {
    pub fn new(
        controller: GameController<TStore>,
        media: Arc<MediaLibrary>,
        socials_text: String,
        leaderboard_size: usize,
    ) -> Self {
        Self {
            controller,
            media,
            socials_text,
            leaderboard_size,
        }
    }

    pub async fn handle(&self, update: &BotUpdate) -> BotReply {
        let user_id = &update.user_id;
        match update.action {
            BotAction::Start => BotReply::text(START_TEXT).with_keyboard(main_menu()),
            BotAction::Socials => BotReply::text(self.socials_text.clone()),
            BotAction::Meme => self.handle_meme(user_id).await,
            BotAction::NewGame => {
                let board = self.controller.start_game(user_id).await;
                BotReply::text(NEW_GAME_TEXT).with_keyboard(render_board(&board, false))
            }
            BotAction::Restart => {
                let board = self.controller.restart(user_id).await;
                BotReply::text(NEW_GAME_TEXT).with_keyboard(render_board(&board, false))
            }
            BotAction::Leaders => self.handle_leaders().await,
            BotAction::Move { index } => {
                let outcome = self.controller.submit_move(user_id, index).await;
                render_move_outcome(&outcome)
            }
        }
    }

    pub async fn leaders(&self) -> Vec<LeaderboardEntry> {
        self.controller.leaderboard().top(self.leaderboard_size).await
    }

    async fn handle_meme(&self, user_id: &UserId) -> BotReply {
        match self.media.pick_now().await {
            Ok(path) => BotReply {
                photos: vec![PhotoReply { path, caption: None }],
                ..BotReply::default()
            },
            Err(MediaError::NoContentAvailable) => BotReply::text(NO_MEMES_TEXT),
            Err(e) => {
                log_warn!("[user:{}] Failed to pick a meme: {}", user_id, e);
                BotReply::text(NO_MEMES_TEXT)
            }
        }
    }

    async fn handle_leaders(&self) -> BotReply {
        let entries = self.leaders().await;
        if entries.is_empty() {
            return BotReply::text(NO_LEADERS_TEXT);
        }
        BotReply::text(format_leaders(&entries))
    }
}

pub fn render_move_outcome(outcome: &MoveOutcome) -> BotReply {
    let keyboard = render_board(outcome.board(), outcome.is_terminal());
    match outcome {
        MoveOutcome::Rejected { reason, .. } => {
            let alert = match reason {
                MoveError::CellOccupied { .. } => OCCUPIED_ALERT.to_string(),
                MoveError::GameOver => GAME_OVER_ALERT.to_string(),
                MoveError::OutOfRange { .. } => reason.to_string(),
            };
            BotReply::alert(alert).with_keyboard(keyboard)
        }
        MoveOutcome::Continue { .. } => BotReply::default().with_keyboard(keyboard),
        MoveOutcome::HumanWon { reward, .. } => {
            let mut reply = BotReply::text(HUMAN_WON_TEXT).with_keyboard(keyboard);
            match reward {
                Reward::Photo { path, caption } => reply.photos.push(PhotoReply {
                    path: path.clone(),
                    caption: Some(caption.clone()),
                }),
                Reward::Fallback(notice) => reply.notice = Some(notice.clone()),
            }
            reply
        }
        MoveOutcome::BotWon { .. } => BotReply::text(BOT_WON_TEXT).with_keyboard(keyboard),
        MoveOutcome::Draw { .. } => BotReply::text(DRAW_TEXT).with_keyboard(keyboard),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::config::MemoryContentProvider;
    use common::games::tictactoe::Mark;

    use crate::leaderboard::Leaderboard;
    use crate::reward::PrizeDesk;
    use crate::server_config::MediaConfig;
    use crate::session_rng::SessionRng;
    use crate::session_store::SessionStore;

    fn handler(root: &std::path::Path) -> (MessageHandler<MemoryContentProvider>, SessionStore) {
        let sessions = SessionStore::new();
        let leaderboard = Arc::new(Leaderboard::load(MemoryContentProvider::default()).unwrap());
        let prize_desk = Arc::new(PrizeDesk::new(root.join("prize/win.jpg")));
        let controller = GameController::new(sessions.clone(), leaderboard, prize_desk);
        let media = MediaConfig {
            day_dir: root.join("memes"),
            night_dir: root.join("memes_night"),
            ..MediaConfig::default()
        };
        let media = Arc::new(MediaLibrary::new(media, SessionRng::new(3)));
        (
            MessageHandler::new(controller, media, "socials".to_string(), 5),
            sessions,
        )
    }

    fn update(action: BotAction) -> BotUpdate {
        BotUpdate {
            user_id: UserId::from(7_i64),
            action,
        }
    }

    #[test]
    fn test_action_json_shape() {
        let parsed: BotUpdate =
            serde_json::from_str(r#"{"user_id": "7", "action": {"type": "move", "index": 4}}"#).unwrap();
        assert_eq!(parsed, update(BotAction::Move { index: 4 }));

        let parsed: BotUpdate =
            serde_json::from_str(r#"{"user_id": "7", "action": {"type": "new_game"}}"#).unwrap();
        assert_eq!(parsed.action, BotAction::NewGame);
    }

    #[tokio::test]
    async fn test_start_shows_main_menu() {
        let dir = tempfile::tempdir().unwrap();
        let (handler, _) = handler(dir.path());
        let reply = handler.handle(&update(BotAction::Start)).await;
        assert_eq!(reply.keyboard, Some(main_menu()));
    }

    #[tokio::test]
    async fn test_new_game_renders_empty_board() {
        let dir = tempfile::tempdir().unwrap();
        let (handler, _) = handler(dir.path());
        let reply = handler.handle(&update(BotAction::NewGame)).await;
        assert_eq!(reply.text.as_deref(), Some(NEW_GAME_TEXT));
        assert_eq!(reply.keyboard, Some(render_board(&Board::new(), false)));
    }

    #[tokio::test]
    async fn test_win_shows_restart_and_prize_notice() {
        let dir = tempfile::tempdir().unwrap();
        let (handler, sessions) = handler(dir.path());
        let user_id = UserId::from(7_i64);
        sessions
            .apply_and_replace(
                &user_id,
                Board::from_cells([
                    Mark::X, Mark::X, Mark::Empty,
                    Mark::O, Mark::O, Mark::Empty,
                    Mark::Empty, Mark::Empty, Mark::Empty,
                ]),
            )
            .await;

        let reply = handler.handle(&update(BotAction::Move { index: 2 })).await;
        assert_eq!(reply.text.as_deref(), Some(HUMAN_WON_TEXT));
        assert_eq!(reply.notice.as_deref(), Some(crate::reward::PRIZE_MISSING_TEXT));
        assert_eq!(reply.alert, None);
        assert!(matches!(reply.keyboard, Some(Keyboard::Board { restart: true, .. })));

        let leaders = handler.handle(&update(BotAction::Leaders)).await;
        assert_eq!(leaders.text.as_deref(), Some("🏆 Top players by wins:\n1. 7 — 1 wins\n"));
    }

    #[tokio::test]
    async fn test_occupied_cell_alerts() {
        let dir = tempfile::tempdir().unwrap();
        let (handler, _) = handler(dir.path());
        handler.handle(&update(BotAction::Move { index: 4 })).await;
        let reply = handler.handle(&update(BotAction::Move { index: 4 })).await;
        assert_eq!(reply.alert.as_deref(), Some(OCCUPIED_ALERT));
        assert!(matches!(reply.keyboard, Some(Keyboard::Board { restart: false, .. })));
    }

    #[tokio::test]
    async fn test_empty_leaderboard_and_missing_memes() {
        let dir = tempfile::tempdir().unwrap();
        let (handler, _) = handler(dir.path());
        let leaders = handler.handle(&update(BotAction::Leaders)).await;
        assert_eq!(leaders.text.as_deref(), Some(NO_LEADERS_TEXT));

        let meme = handler.handle(&update(BotAction::Meme)).await;
        assert_eq!(meme.text.as_deref(), Some(NO_MEMES_TEXT));
        assert!(meme.photos.is_empty());
    }

    #[tokio::test]
    async fn test_socials_text() {
        let dir = tempfile::tempdir().unwrap();
        let (handler, _) = handler(dir.path());
        let reply = handler.handle(&update(BotAction::Socials)).await;
        assert_eq!(reply.text.as_deref(), Some("socials"));
    }

    #[tokio::test]
    async fn test_prize_photo_replaces_notice() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("prize")).unwrap();
        std::fs::write(dir.path().join("prize/win.jpg"), b"jpeg").unwrap();
        let (handler, sessions) = handler(dir.path());
        sessions
            .apply_and_replace(
                &UserId::from(7_i64),
                Board::from_cells([
                    Mark::X, Mark::X, Mark::Empty,
                    Mark::O, Mark::O, Mark::Empty,
                    Mark::Empty, Mark::Empty, Mark::Empty,
                ]),
            )
            .await;

        let reply = handler.handle(&update(BotAction::Move { index: 2 })).await;
        assert_eq!(reply.notice, None);
        assert_eq!(
            reply.photos,
            vec![PhotoReply {
                path: dir.path().join("prize/win.jpg"),
                caption: Some("Wins so far: 1".to_string()),
            }]
        );
    }

    #[test]
    fn test_notice_serializes_as_separate_field() {
        let reply = render_move_outcome(&MoveOutcome::HumanWon {
            board: Board::new(),
            wins: 1,
            reward: Reward::fallback(),
        });
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["notice"], crate::reward::PRIZE_MISSING_TEXT);
        assert!(json.get("alert").is_none());
    }
}
