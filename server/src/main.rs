use std::sync::Arc;

use clap::Parser;
use common::config::FileContentConfigProvider;
use common::{log, log_error, log_warn, logger};

use meme_bot_server::cleanup_task::CleanupTask;
use meme_bot_server::game_controller::GameController;
use meme_bot_server::leaderboard::Leaderboard;
use meme_bot_server::media::MediaLibrary;
use meme_bot_server::message_handler::MessageHandler;
use meme_bot_server::reward::PrizeDesk;
use meme_bot_server::session_rng::SessionRng;
use meme_bot_server::session_store::SessionStore;
use meme_bot_server::{server_config, web_server};

#[derive(Parser)]
#[command(name = "meme_bot_server")]
struct Args {
    #[arg(long, default_value = server_config::DEFAULT_CONFIG_FILE)]
    config: String,

    #[arg(long)]
    use_log_prefix: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Bot".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let config = server_config::get_config_manager(&args.config).get_config()?;

    let leaderboard = Arc::new(Leaderboard::load(FileContentConfigProvider::new(
        config.score_file.clone(),
    ))?);
    let sessions = SessionStore::new();
    let prize_desk = Arc::new(PrizeDesk::new(config.prize_path.clone()));
    let controller = GameController::new(sessions.clone(), leaderboard.clone(), prize_desk);
    let media_rng = SessionRng::from_random();
    log!("Media picks seeded with {}", media_rng.seed());
    let media = Arc::new(MediaLibrary::new(config.media.clone(), media_rng));
    let handler = MessageHandler::new(
        controller,
        media,
        config.socials_text.clone(),
        config.leaderboard_size,
    );

    let cleanup_task = CleanupTask::new(
        sessions,
        config.session.cleanup_interval(),
        config.session.inactivity_timeout(),
    );
    let cleanup_handle = tokio::spawn(async move {
        cleanup_task.run().await;
    });

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log_error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        log!("Shutdown signal received");
    };

    web_server::run_web_server(&config.listen_address, handler, shutdown_signal).await?;

    cleanup_handle.abort();
    if let Err(e) = leaderboard.flush().await {
        log_warn!("Failed to flush leaderboard on shutdown: {}", e);
    }

    log!("Server shut down gracefully");

    Ok(())
}
