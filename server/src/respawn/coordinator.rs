use log::info;

use ballast_shared::{
    EntityId, EntityKind, PeerKey, RespawnConfig, RespawnControl, RespawnError, RespawnState, Vec2,
};

use crate::{ForcedMove, RespawnCandidate, RespawnShuttle};

/// What one tick of the respawn cycle asks the server to do.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RespawnUpdate {
    /// Control message to broadcast to every peer.
    pub control: Option<RespawnControl>,
    /// Entities to queue for spawning in the lifecycle log.
    pub spawns: Vec<(EntityKind, Vec<u8>)>,
    /// Entities to queue for removal in the lifecycle log.
    pub removals: Vec<EntityId>,
    /// Peers whose characters are in `spawns`.
    pub respawned: Vec<PeerKey>,
    /// The transport timer just crossed the leave warning time.
    pub leave_warning: bool,
}

impl RespawnUpdate {
    pub fn is_empty(&self) -> bool {
        self.control.is_none()
            && self.spawns.is_empty()
            && self.removals.is_empty()
            && !self.leave_warning
    }
}

/// Authoritative respawn cycle: Waiting, Transporting, Returning and back.
/// Only the server runs it. Peers mirror it from the control messages in
/// [`RespawnUpdate::control`].
pub struct RespawnCoordinator {
    config: RespawnConfig,
    state: RespawnState,
    countdown_started: bool,
    respawn_timer: f32,
    transport_timer: f32,
    return_timer: f32,
    /// Seconds the transporting shuttle has been without living occupants.
    empty_timer: f32,
    forced_move: Option<ForcedMove>,
}

impl RespawnCoordinator {
    pub fn new(config: &RespawnConfig) -> Result<Self, RespawnError> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            state: RespawnState::Waiting,
            countdown_started: false,
            respawn_timer: config.respawn_interval,
            transport_timer: config.max_transport_time,
            return_timer: config.max_transport_time,
            empty_timer: 0.0,
            forced_move: None,
        })
    }

    pub fn state(&self) -> RespawnState {
        self.state
    }

    pub fn countdown_started(&self) -> bool {
        self.countdown_started
    }

    /// Seconds until the shuttle is dispatched.
    pub fn respawn_timer(&self) -> f32 {
        self.respawn_timer
    }

    /// Seconds until the shuttle heads back.
    pub fn transport_timer(&self) -> f32 {
        self.transport_timer
    }

    pub fn forced_move(&self) -> Option<&ForcedMove> {
        self.forced_move.as_ref()
    }

    /// The message that brings a peer up to date with the current state,
    /// e.g. one that just connected.
    pub fn control(&self) -> RespawnControl {
        match self.state {
            RespawnState::Waiting => RespawnControl::Waiting {
                countdown_started: self.countdown_started,
                respawn_timer: self.respawn_timer,
            },
            RespawnState::Transporting => RespawnControl::Transporting {
                transport_time: self.transport_timer,
            },
            RespawnState::Returning => RespawnControl::Returning,
        }
    }

    pub fn update(
        &mut self,
        delta: f32,
        candidates: &[RespawnCandidate],
        shuttle: &mut dyn RespawnShuttle,
    ) -> RespawnUpdate {
        let mut update = RespawnUpdate::default();
        match self.state {
            RespawnState::Waiting => self.update_waiting(delta, candidates, shuttle, &mut update),
            RespawnState::Transporting => self.update_transporting(delta, shuttle, &mut update),
            RespawnState::Returning => self.update_returning(delta, shuttle, &mut update),
        }
        update
    }

    /// Round reset. Back to an idle Waiting state without broadcasting.
    pub fn reset(&mut self, shuttle: &mut dyn RespawnShuttle) -> Vec<EntityId> {
        self.state = RespawnState::Waiting;
        self.countdown_started = false;
        self.respawn_timer = self.config.respawn_interval;
        self.transport_timer = self.config.max_transport_time;
        self.return_timer = self.config.max_transport_time;
        self.empty_timer = 0.0;
        self.forced_move = None;
        shuttle.reset(self.config.parking_position)
    }

    fn update_waiting(
        &mut self,
        delta: f32,
        candidates: &[RespawnCandidate],
        shuttle: &mut dyn RespawnShuttle,
        update: &mut RespawnUpdate,
    ) {
        shuttle.set_velocity(Vec2::ZERO);

        let waiting: Vec<PeerKey> = candidates
            .iter()
            .filter(|candidate| candidate.needs_respawn(self.config.allow_spectating))
            .map(|candidate| candidate.peer)
            .collect();
        let threshold = (candidates.len() as f32 * self.config.min_respawn_ratio).max(1.0);
        let enough_waiting = waiting.len() as f32 >= threshold;

        if enough_waiting && !self.countdown_started {
            info!(
                "Respawn countdown started, {} of {} players waiting",
                waiting.len(),
                candidates.len()
            );
            self.countdown_started = true;
            update.control = Some(self.control());
        } else if !enough_waiting && self.countdown_started {
            info!("Respawn countdown cancelled");
            self.countdown_started = false;
            self.respawn_timer = self.config.respawn_interval;
            update.control = Some(self.control());
        }

        if !self.countdown_started {
            return;
        }

        self.respawn_timer -= delta;
        if self.respawn_timer <= 0.0 {
            self.respawn_timer = self.config.respawn_interval;
            self.dispatch(&waiting, shuttle, update);
        }
    }

    fn dispatch(&mut self, waiting: &[PeerKey], shuttle: &mut dyn RespawnShuttle, update: &mut RespawnUpdate) {
        info!("Dispatching the respawn shuttle with {} players", waiting.len());

        self.state = RespawnState::Transporting;
        self.countdown_started = false;
        self.transport_timer = self.config.max_transport_time;
        self.return_timer = self.config.max_transport_time;
        self.empty_timer = 0.0;

        update.removals = shuttle.reset(self.config.parking_position);
        update.spawns = shuttle.spawn_batch(waiting);
        update.respawned = waiting.to_vec();
        update.control = Some(self.control());

        self.forced_move = Some(ForcedMove::new(
            self.config.arrival_position,
            self.config.move_speed,
            self.config.arrival_tolerance,
        ));
    }

    fn update_transporting(&mut self, delta: f32, shuttle: &mut dyn RespawnShuttle, update: &mut RespawnUpdate) {
        if let Some(forced_move) = self.forced_move {
            if forced_move.step(shuttle) {
                self.forced_move = None;
            }
        }

        // a non-positive limit keeps the shuttle in the level for good
        if self.config.max_transport_time <= 0.0 {
            return;
        }

        let previous = self.transport_timer;
        self.transport_timer -= delta;
        let warning_time = self.config.leave_warning_time;
        if previous > warning_time && self.transport_timer <= warning_time {
            update.leave_warning = true;
        }

        if shuttle.has_living_occupants() {
            self.empty_timer = 0.0;
        } else {
            self.empty_timer += delta;
            if self.empty_timer > self.config.empty_shuttle_time {
                self.transport_timer = 0.0;
            }
        }

        if self.transport_timer <= 0.0 {
            info!("The respawn shuttle is leaving");
            self.state = RespawnState::Returning;
            self.transport_timer = self.config.max_transport_time;
            self.return_timer = self.config.max_transport_time;
            self.forced_move = Some(ForcedMove::new(
                self.config.parking_position,
                self.config.move_speed,
                self.config.arrival_tolerance,
            ));
            update.control = Some(self.control());
        }
    }

    fn update_returning(&mut self, delta: f32, shuttle: &mut dyn RespawnShuttle, update: &mut RespawnUpdate) {
        self.return_timer -= delta;

        let arrived = match self.forced_move {
            Some(forced_move) => forced_move.step(shuttle),
            None => true,
        };

        if arrived || self.return_timer <= 0.0 {
            info!("The respawn shuttle has left");
            self.forced_move = None;
            update.removals = shuttle.reset(self.config.parking_position);
            self.state = RespawnState::Waiting;
            self.countdown_started = false;
            self.respawn_timer = self.config.respawn_interval;
            update.control = Some(self.control());
        }
    }
}
