/// Tuning for the sequenced reliable channel.
#[derive(Clone, Debug, PartialEq)]
pub struct ReliableChannelConfig {
    /// How many sent messages are kept around to answer resend requests.
    pub resend_buffer_capacity: usize,
    /// How many times a missing id is requested before it is given up on.
    /// `None` keeps requesting until the message arrives.
    pub max_resend_attempts: Option<u8>,
    /// Lower bound, in seconds, on the gap between two requests for the same id.
    pub min_resend_interval: f32,
    /// Lower bound, in seconds, on the latest-id broadcast cadence.
    pub min_ack_interval: f32,
}

impl Default for ReliableChannelConfig {
    fn default() -> Self {
        Self {
            resend_buffer_capacity: 100,
            max_resend_attempts: Some(10),
            min_resend_interval: 0.2,
            min_ack_interval: 1.0,
        }
    }
}

impl ReliableChannelConfig {
    pub fn resend_interval(&self, rtt: f32) -> f32 {
        rtt.max(self.min_resend_interval)
    }

    pub fn ack_interval(&self, rtt: f32) -> f32 {
        rtt.max(self.min_ack_interval)
    }
}
