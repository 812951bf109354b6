use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{Local, Timelike};

use crate::server_config::MediaConfig;
use crate::session_rng::SessionRng;

#[derive(Debug)]
pub enum MediaError {
    NoContentAvailable,
    Io(std::io::Error),
}

impl std::fmt::Display for MediaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaError::NoContentAvailable => write!(f, "No content available"),
            MediaError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for MediaError {}

impl From<std::io::Error> for MediaError {
    fn from(e: std::io::Error) -> Self {
        MediaError::Io(e)
    }
}

/// Serves a random image from the night pool or the day pool depending on the
/// local hour.
pub struct MediaLibrary {
    config: MediaConfig,
    rng: Mutex<SessionRng>,
}

impl MediaLibrary {
    pub fn new(config: MediaConfig, rng: SessionRng) -> Self {
        Self {
            config,
            rng: Mutex::new(rng),
        }
    }

    pub fn is_night(&self, hour: u32) -> bool {
        let start = self.config.night_start_hour;
        let end = self.config.night_end_hour;
        if start > end {
            hour >= start || hour < end
        } else {
            hour >= start && hour < end
        }
    }

    pub fn pool_for(&self, hour: u32) -> &Path {
        if self.is_night(hour) {
            &self.config.night_dir
        } else {
            &self.config.day_dir
        }
    }

    pub async fn pick_now(&self) -> Result<PathBuf, MediaError> {
        self.pick_at(&Local::now()).await
    }

    /// Lists the pool on the blocking pool, then draws one file.
    pub async fn pick_at<T: Timelike>(&self, now: &T) -> Result<PathBuf, MediaError> {
        let pool = self.pool_for(now.hour()).to_path_buf();
        let files = tokio::task::spawn_blocking(move || list_files(&pool))
            .await
            .map_err(std::io::Error::other)??;

        let index = {
            let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            rng.pick_index(files.len())
        };

        index
            .and_then(|idx| files.into_iter().nth(idx))
            .ok_or(MediaError::NoContentAvailable)
    }
}

fn list_files(dir: &Path) -> Result<Vec<PathBuf>, MediaError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(MediaError::NoContentAvailable),
        Err(e) => return Err(e.into()),
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn library(root: &Path) -> MediaLibrary {
        let config = MediaConfig {
            day_dir: root.join("memes"),
            night_dir: root.join("memes_night"),
            ..MediaConfig::default()
        };
        MediaLibrary::new(config, SessionRng::new(1))
    }

    fn at(hour: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, 30, 0).unwrap()
    }

    #[test]
    fn test_night_window_wraps_midnight() {
        let dir = tempfile::tempdir().unwrap();
        let media = library(dir.path());
        for hour in [22, 23, 0, 3, 5] {
            assert!(media.is_night(hour), "hour {}", hour);
        }
        for hour in [6, 12, 21] {
            assert!(!media.is_night(hour), "hour {}", hour);
        }
    }

    #[tokio::test]
    async fn test_picks_from_pool_matching_hour() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("memes")).unwrap();
        std::fs::create_dir(dir.path().join("memes_night")).unwrap();
        std::fs::write(dir.path().join("memes/day.jpg"), b"day").unwrap();
        std::fs::write(dir.path().join("memes_night/night.jpg"), b"night").unwrap();

        let media = library(dir.path());
        assert_eq!(media.pick_at(&at(12)).await.unwrap(), dir.path().join("memes/day.jpg"));
        assert_eq!(media.pick_at(&at(23)).await.unwrap(), dir.path().join("memes_night/night.jpg"));
    }

    #[tokio::test]
    async fn test_missing_pool_has_no_content() {
        let dir = tempfile::tempdir().unwrap();
        let media = library(dir.path());
        assert!(matches!(media.pick_at(&at(12)).await, Err(MediaError::NoContentAvailable)));
    }

    #[tokio::test]
    async fn test_empty_pool_has_no_content() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("memes_night")).unwrap();
        std::fs::create_dir(dir.path().join("memes_night/subdir")).unwrap();
        let media = library(dir.path());
        assert!(matches!(media.pick_at(&at(1)).await, Err(MediaError::NoContentAvailable)));
    }

    #[tokio::test]
    async fn test_pick_now_reads_current_pool() {
        let dir = tempfile::tempdir().unwrap();
        for pool in ["memes", "memes_night"] {
            std::fs::create_dir(dir.path().join(pool)).unwrap();
            std::fs::write(dir.path().join(pool).join("only.jpg"), b"img").unwrap();
        }

        let picked = library(dir.path()).pick_now().await.unwrap();
        assert_eq!(picked.file_name().and_then(|n| n.to_str()), Some("only.jpg"));
    }
}
