pub mod app;
pub mod board;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod gesture;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod state;
pub mod storage;
pub mod timers;
pub mod views;

pub use app::router;
pub use config::Settings;
pub use ledger::OrderLedger;
pub use state::AppState;
pub use storage::{JsonFileStore, OrderStore};
