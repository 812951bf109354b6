use std::io::ErrorKind;
use std::path::PathBuf;

pub const PRIZE_MISSING_TEXT: &str = "Prize not found :(";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reward {
    Photo { path: PathBuf, caption: String },
    Fallback(String),
}

impl Reward {
    pub fn fallback() -> Self {
        Reward::Fallback(PRIZE_MISSING_TEXT.to_string())
    }
}

/// Hands out the winner's prize image.
pub struct PrizeDesk {
    prize_path: PathBuf,
}

impl PrizeDesk {
    pub fn new(prize_path: PathBuf) -> Self {
        Self { prize_path }
    }

    /// A missing asset yields the fallback notice; any other I/O failure is
    /// returned to the caller.
    pub fn claim(&self, wins: u32) -> Result<Reward, std::io::Error> {
        match std::fs::metadata(&self.prize_path) {
            Ok(meta) if meta.is_file() => Ok(Reward::Photo {
                path: self.prize_path.clone(),
                caption: format!("Wins so far: {}", wins),
            }),
            Ok(_) => Ok(Reward::fallback()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Reward::fallback()),
            Err(e) => Err(e),
        }
    }
}
