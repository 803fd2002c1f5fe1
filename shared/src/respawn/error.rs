use thiserror::Error;

use ballast_serde::SerdeErr;

/// Errors raised by the respawn cycle on either side
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RespawnError {
    /// The waiting ratio must lie in `0..=1`
    #[error("Minimum respawn ratio {ratio} is outside 0..=1")]
    InvalidRatio { ratio: f32 },

    /// Negative countdowns would expire before they start
    #[error("Respawn interval {interval} must not be negative")]
    InvalidInterval { interval: f32 },

    /// The control body could not be decoded
    #[error("Respawn control message is malformed")]
    Malformed(#[from] SerdeErr),
}
