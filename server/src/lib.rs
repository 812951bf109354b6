pub mod cleanup_task;
pub mod game_controller;
pub mod leaderboard;
pub mod media;
pub mod message_handler;
pub mod reward;
pub mod server_config;
pub mod session_rng;
pub mod session_store;
pub mod web_server;
