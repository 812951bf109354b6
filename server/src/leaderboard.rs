use std::collections::BTreeMap;
use std::sync::Arc;

use common::config::{ConfigContentProvider, ConfigSerializer, JsonConfigSerializer};
use common::{UserId, log, log_warn};
use serde::Serialize;
use tokio::sync::Mutex;

type Scores = BTreeMap<String, u32>;

/// Storage the leaderboard can write from the blocking pool.
pub trait ScoreStore: ConfigContentProvider + Send + Sync + 'static {}

impl<T: ConfigContentProvider + Send + Sync + 'static> ScoreStore for T {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub wins: u32,
}

/// Win counters keyed by user, persisted as a flat JSON object that is
/// rewritten in full after every increment.
pub struct Leaderboard<TStore: ScoreStore> {
    store: Arc<TStore>,
    serializer: JsonConfigSerializer,
    scores: Mutex<Scores>,
}

impl<TStore: ScoreStore> Leaderboard<TStore> {
    /// Reads the store once. A missing store starts empty; unreadable or
    /// malformed content is an error.
    pub fn load(store: TStore) -> Result<Self, String> {
        let serializer = JsonConfigSerializer::new();
        let scores: Scores = match store.get_config_content()? {
            Some(content) if !content.trim().is_empty() => serializer.deserialize(&content)?,
            _ => Scores::new(),
        };

        log!("Loaded leaderboard with {} entries", scores.len());

        Ok(Self {
            store: Arc::new(store),
            serializer,
            scores: Mutex::new(scores),
        })
    }

    /// Increments the user's win count and returns the new total. A failed
    /// write is logged and the in-memory count is kept.
    pub async fn record_win(&self, user_id: &UserId) -> u32 {
        let mut scores = self.scores.lock().await;
        let wins = {
            let entry = scores.entry(user_id.to_string()).or_insert(0);
            *entry += 1;
            *entry
        };

        if let Err(e) = self.persist(&scores).await {
            log_warn!("Failed to persist win #{} for {}: {}", wins, user_id, e);
        }

        wins
    }

    pub async fn wins(&self, user_id: &UserId) -> u32 {
        let scores = self.scores.lock().await;
        scores.get(user_id.as_str()).copied().unwrap_or(0)
    }

    /// Highest counts first; equal counts are ordered by user id.
    pub async fn top(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let scores = self.scores.lock().await;
        let mut entries: Vec<LeaderboardEntry> = scores
            .iter()
            .map(|(user_id, wins)| LeaderboardEntry {
                user_id: user_id.clone(),
                wins: *wins,
            })
            .collect();

        entries.sort_by(|a, b| b.wins.cmp(&a.wins).then_with(|| a.user_id.cmp(&b.user_id)));
        entries.truncate(limit);
        entries
    }

    pub async fn flush(&self) -> Result<(), String> {
        let scores = self.scores.lock().await;
        self.persist(&scores).await
    }

    /// Writes under the caller's lock so stored snapshots never go backwards.
    async fn persist(&self, scores: &Scores) -> Result<(), String> {
        let content = self.serializer.serialize(scores)?;
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.set_config_content(&content))
            .await
            .map_err(|e| format!("Score write task failed: {}", e))?
    }
}
