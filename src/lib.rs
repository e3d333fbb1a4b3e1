pub mod archive;
pub mod client;
pub mod game_client;
pub mod game_service;
pub mod hand;
pub mod transcript;
pub mod ui;
pub mod wager;
