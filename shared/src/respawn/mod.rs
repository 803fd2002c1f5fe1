mod config;
mod control;
mod error;
mod state;
mod vec2;

pub use config::RespawnConfig;
pub use control::RespawnControl;
pub use error::RespawnError;
pub use state::RespawnState;
pub use vec2::Vec2;
