use std::future::Future;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use common::config::FileContentConfigProvider;
use common::log;
use tower_http::cors::{Any, CorsLayer};

use crate::leaderboard::LeaderboardEntry;
use crate::message_handler::{BotReply, BotUpdate, MessageHandler};

pub type BotHandler = MessageHandler<FileContentConfigProvider>;

#[derive(Clone)]
pub struct WebServerState {
    pub handler: BotHandler,
}

pub fn build_router(handler: BotHandler) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/update", post(update_handler))
        .route("/leaders", get(leaders_handler))
        .layer(cors)
        .with_state(WebServerState { handler })
}

pub async fn run_web_server(
    listen_address: &str,
    handler: BotHandler,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let app = build_router(handler);

    let listener = tokio::net::TcpListener::bind(listen_address).await?;
    log!("Bot server listening on {}", listen_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
}

async fn update_handler(
    State(state): State<WebServerState>,
    Json(update): Json<BotUpdate>,
) -> Json<BotReply> {
    Json(state.handler.handle(&update).await)
}

async fn leaders_handler(State(state): State<WebServerState>) -> Json<Vec<LeaderboardEntry>> {
    Json(state.handler.leaders().await)
}
