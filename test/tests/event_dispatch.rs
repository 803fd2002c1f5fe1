use ballast_client::EventBatchEvent as ClientBatchEvent;
use ballast_server::{EventBatchEvent, ServerConfig};
use ballast_shared::{
    DeliveryMethod, EntityId, EntityKind, NetworkEventType, PacketCategory, Protocol, Transport,
    Vec2,
};
use ballast_test::{client_key, spawn_params, TestSession, SERVER};

const TICK: f32 = 0.1;

/// A session where every client already mirrors one character.
fn session_with_character(clients: usize) -> (TestSession, EntityId) {
    let mut session = TestSession::new(clients, ServerConfig::default(), Protocol::default(), 11);
    let entity_id = session
        .server
        .queue_spawn(EntityKind::CHARACTER, spawn_params(Vec2::new(1.0, 2.0)))
        .unwrap();
    session.run(5, TICK);
    for test_client in &session.clients {
        assert!(test_client.world.contains(entity_id));
    }
    (session, entity_id)
}

#[test]
fn unreliable_update_reaches_every_client() {
    let (mut session, entity_id) = session_with_character(3);

    session.server_world.get_mut(entity_id).unwrap().position = Vec2::new(40.0, -8.0);
    assert!(session
        .server
        .queue_event(entity_id, NetworkEventType::EntityUpdate, Vec::new()));
    session.update(TICK);
    let (_, mut client_events) = session.receive();

    for (test_client, events) in session.clients.iter().zip(client_events.iter_mut()) {
        let entity = test_client.world.get(entity_id).unwrap();
        assert_eq!(entity.position, Vec2::new(40.0, -8.0));
        assert_eq!(entity.applied_count(NetworkEventType::EntityUpdate), 1);

        let reports: Vec<_> = events.read::<ClientBatchEvent>().collect();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].applied, 1);
    }
}

#[test]
fn overriding_events_coalesce_within_a_tick() {
    let (mut session, entity_id) = session_with_character(1);

    assert!(session
        .server
        .queue_event(entity_id, NetworkEventType::EntityUpdate, Vec::new()));
    assert!(!session
        .server
        .queue_event(entity_id, NetworkEventType::EntityUpdate, Vec::new()));
    assert!(session
        .server
        .queue_event(entity_id, NetworkEventType::KillCharacter, Vec::new()));
    assert!(session
        .server
        .queue_event(entity_id, NetworkEventType::KillCharacter, Vec::new()));
    session.run(3, TICK);

    let entity = session.clients[0].world.get(entity_id).unwrap();
    assert_eq!(entity.applied_count(NetworkEventType::EntityUpdate), 1);
    assert_eq!(entity.applied_count(NetworkEventType::KillCharacter), 2);
    assert!(!entity.alive);
}

#[test]
fn queue_is_cleared_after_dispatch() {
    let (mut session, entity_id) = session_with_character(1);

    session
        .server
        .queue_event(entity_id, NetworkEventType::ApplyStatusEffect, Vec::new());
    assert_eq!(session.server.queued_events(), 1);
    session.update(TICK);
    assert_eq!(session.server.queued_events(), 0);

    session.run(5, TICK);
    let entity = session.clients[0].world.get(entity_id).unwrap();
    assert_eq!(entity.applied_count(NetworkEventType::ApplyStatusEffect), 1);
}

#[test]
fn client_events_reach_the_server() {
    let (mut session, entity_id) = session_with_character(2);

    let test_client = &mut session.clients[1];
    test_client.world.get_mut(entity_id).unwrap().position = Vec2::new(-3.0, 9.0);
    test_client
        .client
        .queue_event(entity_id, NetworkEventType::ImportantEntityUpdate, Vec::new());
    session.update(TICK);
    let (mut server_events, _) = session.receive();

    let reports: Vec<_> = server_events.read::<EventBatchEvent>().collect();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].0, client_key(1));
    assert_eq!(reports[0].1.applied, 1);
    assert_eq!(
        session.server_world.get(entity_id).unwrap().position,
        Vec2::new(-3.0, 9.0)
    );
}

#[test]
fn events_for_unknown_entities_are_not_sent() {
    let (mut session, entity_id) = session_with_character(1);

    session.clients[0].world.get_mut(entity_id).unwrap().health = 5.0;
    session.clients[0].client.queue_event(
        entity_id.wrapping_add(100),
        NetworkEventType::WallDamage,
        Vec::new(),
    );
    session.clients[0]
        .client
        .queue_event(entity_id, NetworkEventType::WallDamage, Vec::new());
    session.update(TICK);
    session.run(4, TICK);

    // only the known entity was encoded in the first place
    assert_eq!(session.server_world.get(entity_id).unwrap().health, 5.0);
}

#[test]
fn lost_reliable_batch_is_resent() {
    let (mut session, entity_id) = session_with_character(1);

    let mut dropped_once = false;
    session.hub.set_drop_filter(Box::new(move |from, _, bytes| {
        if !dropped_once && from == SERVER && bytes.first() == Some(&PacketCategory::ReliableWrapper.to_u8()) {
            dropped_once = true;
            return true;
        }
        false
    }));

    session
        .server
        .queue_event(entity_id, NetworkEventType::KillCharacter, Vec::new());
    session.update(TICK);
    session.receive();
    assert!(session.clients[0].world.get(entity_id).unwrap().alive);
    assert_eq!(session.hub.dropped(), 1);

    session.run(40, TICK);

    let entity = session.clients[0].world.get(entity_id).unwrap();
    assert!(!entity.alive);
    assert_eq!(entity.applied_count(NetworkEventType::KillCharacter), 1);
}

#[test]
fn malformed_sub_event_does_not_stop_the_batch() {
    let (mut session, entity_id) = session_with_character(1);

    let mut datagram = vec![PacketCategory::NetworkEventBatch.to_u8()];
    datagram.extend_from_slice(&2.5f32.to_le_bytes());
    datagram.push(3);
    // position update
    datagram.push(11);
    datagram.push(NetworkEventType::PhysicsBodyPosition.to_u8());
    datagram.extend_from_slice(&entity_id.to_le_bytes());
    datagram.extend_from_slice(&7.0f32.to_le_bytes());
    datagram.extend_from_slice(&8.0f32.to_le_bytes());
    // unknown event type
    datagram.extend_from_slice(&[3, 200, 0, 0]);
    // status effect
    datagram.push(7);
    datagram.push(NetworkEventType::ApplyStatusEffect.to_u8());
    datagram.extend_from_slice(&entity_id.to_le_bytes());
    datagram.extend_from_slice(&42.0f32.to_le_bytes());

    let mut raw = session.hub.transport(client_key(0));
    raw.send(&SERVER, &datagram, DeliveryMethod::Unreliable).unwrap();
    let (mut server_events, _) = session.receive();

    let (_, report) = server_events.read::<EventBatchEvent>().next().unwrap();
    assert_eq!(report.send_time, 2.5);
    assert_eq!(report.declared, 3);
    assert_eq!(report.applied, 2);
    assert_eq!(report.skipped_malformed, 1);

    let entity = session.server_world.get(entity_id).unwrap();
    assert_eq!(entity.position, Vec2::new(7.0, 8.0));
    assert_eq!(entity.health, 42.0);
}
