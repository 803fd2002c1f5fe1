use log::{debug, warn};

use ballast_shared::{
    read_event_batch, BaseConnection, DeliveryClass, DeliveryMethod, EntityFactory, EntityId,
    EntityStore, EventQueue, Incoming, LifecycleError, LifecycleMirror, NetworkEventType,
    PacketCategory, PacketError, PeerKey, Protocol, RespawnControl, Serde, Transport, Watermark,
};

use crate::{events::Events, BallastClientError, ClientConfig, RespawnMirror};

/// Client can send/receive datagrams to/from the server, and mirrors the
/// server's entities into a local world
pub struct Client<T: Transport> {
    // Config
    config: ClientConfig,
    protocol: Protocol,
    // Connection
    transport: T,
    base: BaseConnection,
    // World
    event_queue: EventQueue,
    lifecycle: LifecycleMirror,
    respawn: RespawnMirror,
    // Events raised outside of `receive`
    pending_events: Events,
    elapsed: f32,
}

impl<T: Transport> Client<T> {
    /// Create a new Client. The protocol is locked from here on.
    pub fn new(config: ClientConfig, mut protocol: Protocol, transport: T) -> Self {
        if !protocol.is_locked() {
            protocol.lock();
        }

        Self {
            base: BaseConnection::new(&protocol.reliable),
            event_queue: EventQueue::new(&protocol.event_policies),
            lifecycle: LifecycleMirror::new(),
            respawn: RespawnMirror::new(config.leave_warning_time),
            config,
            protocol,
            transport,
            pending_events: Events::new(),
            elapsed: 0.0,
        }
    }

    pub fn server(&self) -> PeerKey {
        self.config.server
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

    pub fn connection(&self) -> &BaseConnection {
        &self.base
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// How far into the server's lifecycle log this client has caught up.
    pub fn watermark(&self) -> Watermark {
        self.lifecycle.watermark()
    }

    pub fn lifecycle(&self) -> &LifecycleMirror {
        &self.lifecycle
    }

    pub fn respawn(&self) -> &RespawnMirror {
        &self.respawn
    }

    /// Drops queued events and the mirrored respawn state. Call on the
    /// application's round start. Replicated entities need no reset here:
    /// the first sync message of the server's new round removes the old
    /// round's entities and starts the log over, and sync messages of the
    /// old round still in flight are dropped.
    pub fn reset_round(&mut self) {
        self.event_queue.clear();
        self.respawn.reset();
    }

    // Network Events

    /// Queues a network event for the server. Returns `false` when it was
    /// coalesced into an identical queued one.
    pub fn queue_event(&mut self, entity_id: EntityId, event_type: NetworkEventType, data: Vec<u8>) -> bool {
        self.event_queue.enqueue(entity_id, event_type, data)
    }

    // Messages

    /// Sends a raw packet in `category` to the server.
    pub fn send_packet(&mut self, category: PacketCategory, payload: &[u8], delivery: DeliveryClass) {
        let server = self.config.server;
        match delivery {
            DeliveryClass::ReliableViaChannel => {
                let message = self.base.send_reliable(category, payload);
                send_datagram(
                    &mut self.transport,
                    &mut self.pending_events,
                    server,
                    message.bytes(),
                    DeliveryMethod::Unreliable,
                );
            }
            _ => {
                let mut datagram = Vec::with_capacity(payload.len() + 1);
                datagram.push(category.to_u8());
                datagram.extend_from_slice(payload);
                send_datagram(
                    &mut self.transport,
                    &mut self.pending_events,
                    server,
                    &datagram,
                    delivery.transport_method(),
                );
            }
        }
    }

    // Receiving

    /// Drains the transport. Event batches and lifecycle sync messages are
    /// applied to `world` straight away, and every sync message is acked.
    pub fn receive<W: EntityStore + EntityFactory>(&mut self, world: &mut W) -> Events {
        let mut events = std::mem::take(&mut self.pending_events);

        for _ in 0..self.config.max_datagrams_per_receive {
            match self.transport.receive() {
                Ok(Some((peer, datagram))) => {
                    if peer != self.config.server {
                        debug!("Dropping datagram from {peer}");
                        events.push_error(BallastClientError::UnknownSender { peer });
                        continue;
                    }
                    self.process_datagram(&datagram, world, &mut events);
                }
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

    fn process_datagram<W: EntityStore + EntityFactory>(
        &mut self,
        datagram: &[u8],
        world: &mut W,
        events: &mut Events,
    ) {
        let server = self.config.server;
        let incoming = match self.base.process_incoming(datagram) {
            Ok(incoming) => incoming,
            Err(err) => {
                warn!("Bad packet from server: {err}");
                events.push_error(err.into());
                return;
            }
        };

        let (category, reliable_id, mut reader) = match incoming {
            Incoming::Handled | Incoming::LatestId(_) => return,
            Incoming::Reply(reply) => {
                send_datagram(&mut self.transport, events, server, &reply, DeliveryMethod::Unreliable);
                return;
            }
            Incoming::Payload {
                category,
                reliable_id,
                reader,
            } => (category, reliable_id, reader),
        };

        match category {
            PacketCategory::NetworkEventBatch => match read_event_batch(&mut reader, world) {
                Ok(report) => events.push_event_batch(report),
                Err(err) => {
                    warn!("Dropping event batch with a broken header");
                    events.push_error(PacketError::Malformed(err).into());
                }
            },
            PacketCategory::EntitySync => match self.lifecycle.ingest(&mut reader, world) {
                Ok(report) => {
                    events.push_sync(report);
                    let ack = self.lifecycle.compose_ack();
                    send_datagram(&mut self.transport, events, server, &ack, DeliveryMethod::Unreliable);
                }
                Err(LifecycleError::StaleRound { round, current }) => {
                    debug!("Dropping sync message of round {round}, now on round {current}");
                }
                Err(err) => {
                    warn!("Dropping sync message: {err}");
                    events.push_error(err.into());
                }
            },
            PacketCategory::Respawn => match RespawnControl::de(&mut reader) {
                Ok(control) => {
                    let applied = match reliable_id {
                        Some(id) => self.respawn.apply_sequenced(id, control).is_some(),
                        None => {
                            self.respawn.apply(control);
                            true
                        }
                    };
                    if applied {
                        events.push_respawn_control(control);
                    }
                }
                Err(err) => {
                    warn!("Dropping malformed respawn control message");
                    events.push_error(BallastClientError::MalformedRespawn(err));
                }
            },
            PacketCategory::EntitySyncAck => {
                events.push_error(BallastClientError::PeerOnly {
                    category: category.to_u8(),
                });
            }
            other => events.push_packet(other, reader.read_remaining().into()),
        }
    }

    // Sending

    /// Sends this tick's event batches and channel control packets, and
    /// runs the respawn mirror's displayed timers down.
    pub fn update<W: EntityStore>(&mut self, delta: f32, world: &W) {
        self.elapsed += delta;
        let server = self.config.server;

        for class in DeliveryClass::ALL {
            if !self.event_queue.has_class(class) {
                continue;
            }
            for batch in self.event_queue.compose(class, world, self.elapsed) {
                match class {
                    DeliveryClass::ReliableViaChannel => {
                        let message = self
                            .base
                            .send_reliable(PacketCategory::NetworkEventBatch, batch.payload());
                        send_datagram(
                            &mut self.transport,
                            &mut self.pending_events,
                            server,
                            message.bytes(),
                            DeliveryMethod::Unreliable,
                        );
                    }
                    _ => send_datagram(
                        &mut self.transport,
                        &mut self.pending_events,
                        server,
                        &batch.to_datagram(),
                        class.transport_method(),
                    ),
                }
            }
        }
        self.event_queue.clear();

        if self.respawn.update(delta) {
            self.pending_events.push_leave_warning();
        }

        let rtt = self.transport.average_round_trip_time(&server);
        for packet in self.base.update(delta, rtt) {
            send_datagram(
                &mut self.transport,
                &mut self.pending_events,
                server,
                &packet,
                DeliveryMethod::Unreliable,
            );
        }
    }
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
