use crate::{RespawnError, Vec2};

/// Tuning for the respawn cycle. Durations are in seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct RespawnConfig {
    /// Countdown length once enough players are waiting.
    pub respawn_interval: f32,
    /// How long the shuttle stays. Zero or less keeps it there for good.
    pub max_transport_time: f32,
    /// Share of players that must be waiting before the countdown starts.
    pub min_respawn_ratio: f32,
    /// Spectators do not count as waiting when this is set.
    pub allow_spectating: bool,
    /// Remaining transport time at which occupants are told to leave.
    pub leave_warning_time: f32,
    /// How long the shuttle must have had no living occupants before it
    /// leaves early.
    pub empty_shuttle_time: f32,
    /// Where the shuttle is parked between trips, off the playing field.
    pub parking_position: Vec2,
    /// Where a dispatched shuttle is driven to.
    pub arrival_position: Vec2,
    /// Distance within which the shuttle counts as arrived.
    pub arrival_tolerance: f32,
    /// Speed the shuttle is driven at, in world units per second.
    pub move_speed: f32,
}

impl Default for RespawnConfig {
    fn default() -> Self {
        Self {
            respawn_interval: 180.0,
            max_transport_time: 180.0,
            min_respawn_ratio: 0.5,
            allow_spectating: true,
            leave_warning_time: 15.0,
            empty_shuttle_time: 1.0,
            parking_position: Vec2::new(0.0, 10000.0),
            arrival_position: Vec2::new(0.0, 8000.0),
            arrival_tolerance: 100.0,
            move_speed: 100.0,
        }
    }
}

impl RespawnConfig {
    pub fn validate(&self) -> Result<(), RespawnError> {
        if !(0.0..=1.0).contains(&self.min_respawn_ratio) {
            return Err(RespawnError::InvalidRatio {
                ratio: self.min_respawn_ratio,
            });
        }
        if self.respawn_interval < 0.0 || self.respawn_interval.is_nan() {
            return Err(RespawnError::InvalidInterval {
                interval: self.respawn_interval,
            });
        }
        Ok(())
    }
}
