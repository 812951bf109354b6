use std::time::Duration;

use common::log;

use crate::session_store::SessionStore;

/// Periodically drops games nobody has touched for a while.
pub struct CleanupTask {
    sessions: SessionStore,
    check_interval: Duration,
    inactivity_timeout: Duration,
}

impl CleanupTask {
    pub fn new(sessions: SessionStore, check_interval: Duration, inactivity_timeout: Duration) -> Self {
        Self {
            sessions,
            check_interval,
            inactivity_timeout,
        }
    }

    pub async fn run(&self) {
        let mut interval = tokio::time::interval(self.check_interval);

        loop {
            interval.tick().await;
            self.cleanup_inactive().await;
        }
    }

    async fn cleanup_inactive(&self) -> usize {
        let evicted = self.sessions.evict_idle(self.inactivity_timeout).await;
        for user_id in &evicted {
            log!("Cleaning up inactive session: {}", user_id);
        }
        evicted.len()
    }
}
