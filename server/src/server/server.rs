use std::collections::HashMap;

use log::{debug, info, warn};

use ballast_shared::{
    read_event_batch, ByteWriter, DeliveryClass, DeliveryMethod, EntityFactory, EntityId,
    EntityKind, EntityLifecycleAuthority, EntityStore, EventQueue, Incoming, NetworkEventType,
    PacketCategory, PacketError, PeerKey, Protocol, RespawnControl, Round, Serde, Transport,
    Watermark,
};

use crate::{
    connection::Connection,
    events::Events,
    respawn::{RespawnCandidate, RespawnCoordinator, RespawnShuttle},
    BallastServerError, ServerConfig,
};

/// A server that keeps connected peers in sync with the authoritative world
/// over a [`Transport`]. Drive it once per tick: [`Server::receive`], then
/// the simulation, then [`Server::update_respawn`] and [`Server::update`].
pub struct Server<T: Transport> {
    // Config
    config: ServerConfig,
    protocol: Protocol,
    // Transport
    transport: T,
    connections: HashMap<PeerKey, Connection>,
    // World
    event_queue: EventQueue,
    lifecycle: EntityLifecycleAuthority,
    respawn: Option<RespawnCoordinator>,
    // Events raised outside of `receive`
    pending_events: Events,
    elapsed: f32,
}

impl<T: Transport> Server<T> {
    /// Create a new Server. The protocol is locked from here on.
    pub fn new(config: ServerConfig, mut protocol: Protocol, transport: T) -> Result<Self, BallastServerError> {
        if !protocol.is_locked() {
            protocol.lock();
        }
        let respawn = config
            .respawn
            .as_ref()
            .map(RespawnCoordinator::new)
            .transpose()?;

        Ok(Self {
            event_queue: EventQueue::new(&protocol.event_policies),
            lifecycle: EntityLifecycleAuthority::new(&protocol.lifecycle),
            config,
            protocol,
            transport,
            connections: HashMap::new(),
            respawn,
            pending_events: Events::new(),
            elapsed: 0.0,
        })
    }

    pub fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Seconds of simulation time driven through [`Server::update`].
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    // Peers

    /// Starts tracking a peer the transport has connected. A running respawn
    /// cycle is replayed to it right away.
    pub fn connect_peer(&mut self, peer: PeerKey) -> Result<(), BallastServerError> {
        if self.connections.contains_key(&peer) {
            return Err(BallastServerError::AlreadyConnected { peer });
        }
        info!("{peer} connected");
        self.connections.insert(peer, Connection::new(peer, &self.protocol));
        self.pending_events.push_connection(peer);

        if let Some(control) = self.respawn.as_ref().map(RespawnCoordinator::control) {
            let payload = control_payload(&control);
            self.send_reliable_to(peer, PacketCategory::Respawn, &payload);
        }
        Ok(())
    }

    pub fn disconnect_peer(&mut self, peer: PeerKey) -> Result<(), BallastServerError> {
        if self.connections.remove(&peer).is_none() {
            return Err(BallastServerError::UnknownPeer { peer });
        }
        info!("{peer} disconnected");
        self.pending_events.push_disconnection(peer);
        Ok(())
    }

    pub fn is_connected(&self, peer: &PeerKey) -> bool {
        self.connections.contains_key(peer)
    }

    pub fn peers(&self) -> impl Iterator<Item = PeerKey> + '_ {
        self.connections.keys().copied()
    }

    pub fn peers_count(&self) -> usize {
        self.connections.len()
    }

    pub fn connection(&self, peer: &PeerKey) -> Option<&Connection> {
        self.connections.get(peer)
    }

    // Network Events

    /// Queues a network event for this tick. Returns `false` when it was
    /// coalesced into an identical queued one.
    pub fn queue_event(&mut self, entity_id: EntityId, event_type: NetworkEventType, data: Vec<u8>) -> bool {
        self.event_queue.enqueue(entity_id, event_type, data)
    }

    pub fn queued_events(&self) -> usize {
        self.event_queue.len()
    }

    // Entity Lifecycle

    /// Reserves an id and queues the spawn for the next [`Server::update`].
    pub fn queue_spawn(&mut self, kind: EntityKind, params: Vec<u8>) -> Result<EntityId, BallastServerError> {
        Ok(self.lifecycle.queue_spawn(kind, params)?)
    }

    pub fn queue_remove(&mut self, entity_id: EntityId) -> Result<(), BallastServerError> {
        Ok(self.lifecycle.queue_remove(entity_id)?)
    }

    pub fn lifecycle(&self) -> &EntityLifecycleAuthority {
        &self.lifecycle
    }

    pub fn watermark(&self) -> Watermark {
        self.lifecycle.watermark()
    }

    /// Starts a new round: clears the lifecycle log, queued events and every
    /// peer's known watermark, and parks the respawn shuttle. The log's round
    /// is bumped, so peers drop sync messages of the old round and start over
    /// on the first message of the new one.
    pub fn reset_round(&mut self, shuttle: Option<&mut dyn RespawnShuttle>) {
        info!("Resetting round");
        self.lifecycle.reset();
        self.event_queue.clear();
        for connection in self.connections.values_mut() {
            connection.reset_round();
        }
        let Some(shuttle) = shuttle else {
            return;
        };
        if let Some(coordinator) = self.respawn.as_mut() {
            // the log was just cleared, nothing left to remove
            coordinator.reset(shuttle);
            let payload = control_payload(&coordinator.control());
            self.broadcast_reliable(PacketCategory::Respawn, &payload);
        }
    }

    // Messages

    /// Sends a raw packet in `category` to one peer.
    pub fn send_packet(
        &mut self,
        peer: PeerKey,
        category: PacketCategory,
        payload: &[u8],
        delivery: DeliveryClass,
    ) -> Result<(), BallastServerError> {
        if !self.connections.contains_key(&peer) {
            return Err(BallastServerError::UnknownPeer { peer });
        }
        match delivery {
            DeliveryClass::ReliableViaChannel => self.send_reliable_to(peer, category, payload),
            _ => {
                let datagram = raw_datagram(category, payload);
                send_datagram(
                    &mut self.transport,
                    &mut self.pending_events,
                    peer,
                    &datagram,
                    delivery.transport_method(),
                );
            }
        }
        Ok(())
    }

    pub fn broadcast_packet(&mut self, category: PacketCategory, payload: &[u8], delivery: DeliveryClass) {
        let peers: Vec<PeerKey> = self.peers().collect();
        for peer in peers {
            // peers were just read from the map
            let _ = self.send_packet(peer, category, payload, delivery);
        }
    }

    // Receiving

    /// Drains the transport and routes every datagram. Network event batches
    /// are applied to `world` straight away.
    pub fn receive<W: EntityStore>(&mut self, world: &mut W) -> Events {
        let mut events = std::mem::take(&mut self.pending_events);

        for _ in 0..self.config.max_datagrams_per_receive {
            match self.transport.receive() {
                Ok(Some((peer, datagram))) => self.process_datagram(peer, &datagram, world, &mut events),
                Ok(None) => break,
                Err(err) => {
                    warn!("Transport receive failed: {err}");
                    events.push_error(err.into());
                    break;
                }
            }
        }

        events
    }

    fn process_datagram<W: EntityStore>(
        &mut self,
        peer: PeerKey,
        datagram: &[u8],
        world: &mut W,
        events: &mut Events,
    ) {
        let Some(connection) = self.connections.get_mut(&peer) else {
            debug!("Dropping datagram from unknown {peer}");
            events.push_error(BallastServerError::UnknownPeer { peer });
            return;
        };

        let incoming = match connection.base.process_incoming(datagram) {
            Ok(incoming) => incoming,
            Err(source) => {
                warn!("Bad packet from {peer}: {source}");
                events.push_error(BallastServerError::Packet { peer, source });
                return;
            }
        };

        match incoming {
            Incoming::Handled => {}
            Incoming::Reply(reply) => {
                send_datagram(&mut self.transport, events, peer, &reply, DeliveryMethod::Unreliable);
            }
            Incoming::LatestId(latest_id) => {
                connection.sync_state.observe_sequence_id(latest_id);
            }
            Incoming::Payload {
                category,
                mut reader,
                ..
            } => match category {
                PacketCategory::NetworkEventBatch => match read_event_batch(&mut reader, world) {
                    Ok(report) => events.push_event_batch(peer, report),
                    Err(err) => {
                        warn!("Dropping event batch from {peer} with a broken header");
                        events.push_error(BallastServerError::Packet {
                            peer,
                            source: PacketError::Malformed(err),
                        });
                    }
                },
                PacketCategory::EntitySyncAck => {
                    let ack = Round::de(&mut reader).and_then(|round| {
                        Watermark::de(&mut reader).map(|watermark| (round, watermark))
                    });
                    match ack {
                        Ok((round, _)) if round != self.lifecycle.round() => {
                            debug!("Ignoring sync ack of round {round} from {peer}");
                        }
                        Ok((_, watermark)) => {
                            connection
                                .sync_state
                                .observe_watermark(watermark, self.lifecycle.watermark());
                            events.push_sync_ack(peer, watermark);
                        }
                        Err(err) => events.push_error(BallastServerError::Packet {
                            peer,
                            source: PacketError::Malformed(err),
                        }),
                    }
                }
                PacketCategory::EntitySync | PacketCategory::Respawn => {
                    warn!("{peer} sent authority-only category {category:?}");
                    events.push_error(BallastServerError::AuthorityOnly {
                        peer,
                        category: category.to_u8(),
                    });
                }
                other => events.push_packet(peer, other, reader.read_remaining().into()),
            },
        }
    }

    // Sending

    /// Materializes queued spawns and removals into `world`, then sends this
    /// tick's event batches, lifecycle sync messages and channel control
    /// packets to every peer.
    pub fn update<W: EntityStore + EntityFactory>(&mut self, delta: f32, world: &mut W) {
        self.elapsed += delta;

        let report = self.lifecycle.materialize_tick(world);
        if report.failed > 0 {
            warn!("{} spawn(s) failed this tick", report.failed);
        }

        // shuffled so no peer is always served first
        let mut peers: Vec<PeerKey> = self.connections.keys().copied().collect();
        fastrand::shuffle(&mut peers);

        self.send_event_batches(&peers, world);
        self.send_sync_messages(&peers, delta);
        self.send_channel_control(&peers, delta);
    }

    fn send_event_batches<W: EntityStore>(&mut self, peers: &[PeerKey], world: &W) {
        for class in DeliveryClass::ALL {
            if !self.event_queue.has_class(class) {
                continue;
            }
            let batches = self.event_queue.compose(class, world, self.elapsed);
            for peer in peers {
                let Some(connection) = self.connections.get_mut(peer) else {
                    continue;
                };
                for batch in &batches {
                    match class {
                        DeliveryClass::ReliableViaChannel => {
                            let message = connection
                                .base
                                .send_reliable(PacketCategory::NetworkEventBatch, batch.payload());
                            send_datagram(
                                &mut self.transport,
                                &mut self.pending_events,
                                *peer,
                                message.bytes(),
                                DeliveryMethod::Unreliable,
                            );
                        }
                        _ => send_datagram(
                            &mut self.transport,
                            &mut self.pending_events,
                            *peer,
                            &batch.to_datagram(),
                            class.transport_method(),
                        ),
                    }
                }
            }
        }

        // cleared whether or not anyone received them
        self.event_queue.clear();
    }

    fn send_sync_messages(&mut self, peers: &[PeerKey], delta: f32) {
        let watermark = self.lifecycle.watermark();
        let interval = self.protocol.lifecycle.sync_interval;

        for peer in peers {
            let Some(connection) = self.connections.get_mut(peer) else {
                continue;
            };
            if !connection.sync_due(delta, interval, watermark) {
                continue;
            }
            let message = self
                .lifecycle
                .compose_sync_message(connection.sync_state.last_known_watermark());
            send_datagram(
                &mut self.transport,
                &mut self.pending_events,
                *peer,
                &message,
                DeliveryMethod::Unreliable,
            );
        }
    }

    fn send_channel_control(&mut self, peers: &[PeerKey], delta: f32) {
        for peer in peers {
            let rtt = self.transport.average_round_trip_time(peer);
            let Some(connection) = self.connections.get_mut(peer) else {
                continue;
            };
            for packet in connection.base.update(delta, rtt) {
                send_datagram(
                    &mut self.transport,
                    &mut self.pending_events,
                    *peer,
                    &packet,
                    DeliveryMethod::Unreliable,
                );
            }
        }
    }

    fn send_reliable_to(&mut self, peer: PeerKey, category: PacketCategory, payload: &[u8]) {
        let Some(connection) = self.connections.get_mut(&peer) else {
            return;
        };
        let message = connection.base.send_reliable(category, payload);
        send_datagram(
            &mut self.transport,
            &mut self.pending_events,
            peer,
            message.bytes(),
            DeliveryMethod::Unreliable,
        );
    }

    fn broadcast_reliable(&mut self, category: PacketCategory, payload: &[u8]) {
        let peers: Vec<PeerKey> = self.peers().collect();
        for peer in peers {
            self.send_reliable_to(peer, category, payload);
        }
    }

    // Respawn

    pub fn respawn(&self) -> Option<&RespawnCoordinator> {
        self.respawn.as_ref()
    }

    /// Advances the respawn cycle. Spawns and removals it asks for go into
    /// the lifecycle log and its control messages go out reliably to every
    /// peer. Returns the ids reserved for this tick's respawned characters.
    pub fn update_respawn(
        &mut self,
        delta: f32,
        candidates: &[RespawnCandidate],
        shuttle: &mut dyn RespawnShuttle,
    ) -> Vec<EntityId> {
        let Some(coordinator) = self.respawn.as_mut() else {
            return Vec::new();
        };
        let previous_state = coordinator.state();
        let update = coordinator.update(delta, candidates, shuttle);

        for entity_id in update.removals {
            if let Err(err) = self.lifecycle.queue_remove(entity_id) {
                debug!("Not removing shuttle entity: {err}");
            }
        }

        let mut spawned = Vec::with_capacity(update.spawns.len());
        for (kind, params) in update.spawns {
            match self.lifecycle.queue_spawn(kind, params) {
                Ok(entity_id) => spawned.push(entity_id),
                Err(err) => {
                    warn!("Could not respawn character: {err}");
                    self.pending_events.push_error(err.into());
                }
            }
        }

        if update.leave_warning {
            self.pending_events.push_leave_warning();
        }

        if let Some(control) = update.control {
            if control.state() != previous_state {
                self.pending_events.push_respawn_state(control.state());
            }
            self.broadcast_reliable(PacketCategory::Respawn, &control_payload(&control));
        }

        spawned
    }
}

fn control_payload(control: &RespawnControl) -> Vec<u8> {
    let mut writer = ByteWriter::with_capacity(6);
    control.ser(&mut writer);
    writer.to_bytes()
}

fn raw_datagram(category: PacketCategory, payload: &[u8]) -> Vec<u8> {
    let mut datagram = Vec::with_capacity(payload.len() + 1);
    datagram.push(category.to_u8());
    datagram.extend_from_slice(payload);
    datagram
}

fn send_datagram<T: Transport>(
    transport: &mut T,
    events: &mut Events,
    peer: PeerKey,
    datagram: &[u8],
    method: DeliveryMethod,
) {
    if let Err(err) = transport.send(&peer, datagram, method) {
        warn!("Failed to send to {peer}: {err}");
        events.push_error(err.into());
    }
}
