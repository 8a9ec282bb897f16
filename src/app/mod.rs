//! Application state and core logic
pub mod screen;
pub mod state;

pub use screen::{AppCoordinator, MenuOption};
pub use state::{GameOverReason, Phase, Session};
