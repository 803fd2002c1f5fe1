use std::default::Default;

use ballast_shared::RespawnConfig;

/// Contains Config properties which will be used by the Server
#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    /// Runs the respawn cycle when set
    pub respawn: Option<RespawnConfig>,
    /// Upper bound on datagrams drained per `receive` call, so that a flood
    /// cannot stall the tick
    pub max_datagrams_per_receive: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            respawn: None,
            max_datagrams_per_receive: 4096,
        }
    }
}
