pub mod config;
pub mod core;
pub mod error;
pub mod events;
pub mod exchange;
pub mod game;
pub mod inventory;
pub mod metrics;
pub mod survivor;
pub mod types;
pub mod ui;

pub use config::GameConfig;
pub use error::GameError;
pub use game::{GameSession, GameState};

#[cfg(test)]
mod exchange_test;
#[cfg(test)]
mod inventory_test;
#[cfg(test)]
mod metrics_test;
