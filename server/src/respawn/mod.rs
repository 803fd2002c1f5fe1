mod coordinator;
mod forced_move;
mod shuttle;

pub use coordinator::{RespawnCoordinator, RespawnUpdate};
pub use forced_move::ForcedMove;
pub use shuttle::{RespawnCandidate, RespawnShuttle};
