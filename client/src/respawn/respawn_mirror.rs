use log::{debug, info};

use ballast_shared::{sequence_greater_than, RespawnControl, RespawnState, SequenceId};

/// Local copy of the server's respawn cycle. Only ever changes state when a
/// control message says so; between messages it just runs the displayed
/// timers down.
pub struct RespawnMirror {
    state: RespawnState,
    countdown_started: bool,
    respawn_timer: f32,
    transport_timer: f32,
    leave_warning_time: f32,
    warned: bool,
    /// Reliable channel id of the newest control applied.
    last_control_id: Option<SequenceId>,
}

impl RespawnMirror {
    pub fn new(leave_warning_time: f32) -> Self {
        Self {
            state: RespawnState::Waiting,
            countdown_started: false,
            respawn_timer: 0.0,
            transport_timer: 0.0,
            leave_warning_time,
            warned: false,
            last_control_id: None,
        }
    }

    pub fn state(&self) -> RespawnState {
        self.state
    }

    pub fn countdown_started(&self) -> bool {
        self.countdown_started
    }

    pub fn respawn_timer(&self) -> f32 {
        self.respawn_timer
    }

    pub fn transport_timer(&self) -> f32 {
        self.transport_timer
    }

    /// Applies a control message that came in on the reliable channel under
    /// `id`. The channel hands over a recovered message late, after newer
    /// ones, so anything not newer than the last applied control is
    /// dropped and `None` returned. Otherwise returns whether the state
    /// changed.
    pub fn apply_sequenced(&mut self, id: SequenceId, control: RespawnControl) -> Option<bool> {
        if let Some(last) = self.last_control_id {
            if !sequence_greater_than(id, last) {
                debug!("Dropping respawn control {id}, already applied {last}");
                return None;
            }
        }
        self.last_control_id = Some(id);
        Some(self.apply(control))
    }

    /// Applies a control message. Returns whether the state changed.
    pub fn apply(&mut self, control: RespawnControl) -> bool {
        let previous = self.state;
        self.state = control.state();
        match control {
            RespawnControl::Waiting {
                countdown_started,
                respawn_timer,
            } => {
                self.countdown_started = countdown_started;
                self.respawn_timer = respawn_timer;
            }
            RespawnControl::Transporting { transport_time } => {
                if previous != RespawnState::Transporting {
                    self.warned = false;
                }
                self.transport_timer = transport_time;
            }
            RespawnControl::Returning => {}
        }
        if previous != self.state {
            info!("Respawn cycle is now {}", self.state);
            return true;
        }
        false
    }

    /// Counts the displayed timers down. Returns `true` on the tick the
    /// transport timer crosses the leave warning.
    pub fn update(&mut self, delta: f32) -> bool {
        match self.state {
            RespawnState::Waiting if self.countdown_started => {
                self.respawn_timer = (self.respawn_timer - delta).max(0.0);
                false
            }
            RespawnState::Transporting if self.transport_timer > 0.0 => {
                let before = self.transport_timer;
                self.transport_timer = (self.transport_timer - delta).max(0.0);
                if !self.warned
                    && before > self.leave_warning_time
                    && self.transport_timer <= self.leave_warning_time
                {
                    self.warned = true;
                    return true;
                }
                false
            }
            _ => false,
        }
    }

    /// Back to an idle Waiting state. Channel ids keep counting across
    /// rounds, so the last applied id is kept.
    pub fn reset(&mut self) {
        let last_control_id = self.last_control_id;
        *self = Self::new(self.leave_warning_time);
        self.last_control_id = last_control_id;
    }
}
