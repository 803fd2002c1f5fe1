use ballast_client::{Client, ClientConfig, Events as ClientEvents};
use ballast_server::{Events as ServerEvents, Server, ServerConfig};
use ballast_shared::{PeerKey, Protocol};

use crate::{LocalHub, LocalTransport, TestWorld};

pub const SERVER: PeerKey = PeerKey::new(0);

/// Transport key of the `index`th client of a session.
pub fn client_key(index: usize) -> PeerKey {
    PeerKey::new(index as u64 + 1)
}

pub struct TestClient {
    pub client: Client<LocalTransport>,
    pub world: TestWorld,
}

/// A server and its clients wired together through one [`LocalHub`]
pub struct TestSession {
    pub hub: LocalHub,
    pub server: Server<LocalTransport>,
    pub server_world: TestWorld,
    pub clients: Vec<TestClient>,
}

impl TestSession {
    pub fn new(client_count: usize, server_config: ServerConfig, protocol: Protocol, seed: u64) -> Self {
        let hub = LocalHub::new(seed);
        let mut server = Server::new(server_config, protocol.clone(), hub.transport(SERVER))
            .expect("valid server config");

        let mut clients = Vec::with_capacity(client_count);
        for index in 0..client_count {
            let key = client_key(index);
            let transport = hub.transport(key);
            server.connect_peer(key).expect("fresh peer");
            clients.push(TestClient {
                client: Client::new(ClientConfig::new(SERVER), protocol.clone(), transport),
                world: TestWorld::new(),
            });
        }

        Self {
            hub,
            server,
            server_world: TestWorld::new(),
            clients,
        }
    }

    /// Everyone drains their inbox.
    pub fn receive(&mut self) -> (ServerEvents, Vec<ClientEvents>) {
        let server_events = self.server.receive(&mut self.server_world);
        let client_events = self
            .clients
            .iter_mut()
            .map(|test_client| test_client.client.receive(&mut test_client.world))
            .collect();
        (server_events, client_events)
    }

    /// Everyone flushes what they have queued.
    pub fn update(&mut self, delta: f32) {
        self.server.update(delta, &mut self.server_world);
        for test_client in &mut self.clients {
            test_client.client.update(delta, &test_client.world);
        }
    }

    /// One full tick: receive, then update.
    pub fn tick(&mut self, delta: f32) -> (ServerEvents, Vec<ClientEvents>) {
        let events = self.receive();
        self.update(delta);
        events
    }

    pub fn run(&mut self, ticks: usize, delta: f32) {
        for _ in 0..ticks {
            self.tick(delta);
        }
    }
}
