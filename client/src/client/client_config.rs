use ballast_shared::PeerKey;

/// Contains Config properties which will be used by a Client
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// The transport's key for the authoritative server. Datagrams from
    /// anyone else are rejected.
    pub server: PeerKey,
    /// Remaining transport time at which the local respawn mirror warns
    /// occupants to get out. Should match the server's respawn config.
    pub leave_warning_time: f32,
    /// Upper bound on datagrams drained by a single `receive` call.
    pub max_datagrams_per_receive: usize,
}

impl ClientConfig {
    pub fn new(server: PeerKey) -> Self {
        Self {
            server,
            leave_warning_time: 15.0,
            max_datagrams_per_receive: 1024,
        }
    }
}
