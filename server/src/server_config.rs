use std::path::PathBuf;
use std::time::Duration;

use common::config::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "bot_server_config.yaml";

const DEFAULT_SOCIALS: &str = "🔥 Here are my socials:\n- Telegram: https://t.me/w52andhaunted\n- DM: @flickerovich";

pub fn get_config_manager(
    file_path: &str,
) -> ConfigManager<FileContentConfigProvider, ServerConfig, YamlConfigSerializer> {
    ConfigManager::from_yaml_file(file_path)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_address: String,
    pub score_file: PathBuf,
    pub leaderboard_size: usize,
    pub socials_text: String,
    pub prize_path: PathBuf,
    pub media: MediaConfig,
    pub session: SessionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0:5000".to_string(),
            score_file: PathBuf::from("score.json"),
            leaderboard_size: 5,
            socials_text: DEFAULT_SOCIALS.to_string(),
            prize_path: PathBuf::from("prize/win.jpg"),
            media: MediaConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.listen_address.is_empty() {
            return Err("listen_address must not be empty".to_string());
        }
        if self.score_file.as_os_str().is_empty() {
            return Err("score_file must not be empty".to_string());
        }
        if self.leaderboard_size == 0 {
            return Err("leaderboard_size must be greater than 0".to_string());
        }
        self.media.validate()?;
        self.session.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    pub day_dir: PathBuf,
    pub night_dir: PathBuf,
    pub night_start_hour: u32,
    pub night_end_hour: u32,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            day_dir: PathBuf::from("memes"),
            night_dir: PathBuf::from("memes_night"),
            night_start_hour: 22,
            night_end_hour: 6,
        }
    }
}

impl Validate for MediaConfig {
    fn validate(&self) -> Result<(), String> {
        if self.night_start_hour > 23 || self.night_end_hour > 23 {
            return Err("night window hours must be between 0 and 23".to_string());
        }
        if self.night_start_hour == self.night_end_hour {
            return Err("night window must not be empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub cleanup_interval_secs: u64,
    pub inactivity_timeout_secs: u64,
}

impl SessionConfig {
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }

    pub fn inactivity_timeout(&self) -> Duration {
        Duration::from_secs(self.inactivity_timeout_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cleanup_interval_secs: 300,
            inactivity_timeout_secs: 3600,
        }
    }
}

impl Validate for SessionConfig {
    fn validate(&self) -> Result<(), String> {
        if self.cleanup_interval_secs == 0 {
            return Err("cleanup_interval_secs must be greater than 0".to_string());
        }
        if self.inactivity_timeout_secs < self.cleanup_interval_secs {
            return Err("inactivity_timeout_secs must not be shorter than cleanup_interval_secs".to_string());
        }
        Ok(())
    }
}
