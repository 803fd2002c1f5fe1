use ballast_client::SyncEvent;
use ballast_server::{ServerConfig, SyncAckEvent};
use ballast_shared::{
    ByteWriter, DeliveryMethod, EntityKind, LifecycleConfig, PacketCategory, Protocol, Serde,
    Transport, Vec2,
};
use ballast_test::{client_key, spawn_params, TestSession, TestWorld, SERVER};

const TICK: f32 = 0.1;

fn session(clients: usize) -> TestSession {
    let _ = env_logger::builder().is_test(true).try_init();
    TestSession::new(clients, ServerConfig::default(), Protocol::default(), 3)
}

fn is_sync(bytes: &[u8]) -> bool {
    bytes.first() == Some(&PacketCategory::EntitySync.to_u8())
}

#[test]
fn spawns_reach_every_client_with_the_same_ids() {
    let mut session = session(3);

    let item = session
        .server
        .queue_spawn(EntityKind::ITEM, spawn_params(Vec2::new(5.0, 5.0)))
        .unwrap();
    let character = session
        .server
        .queue_spawn(EntityKind::CHARACTER, spawn_params(Vec2::new(-1.0, 0.0)))
        .unwrap();
    assert_ne!(item, character);
    session.run(5, TICK);

    assert_eq!(session.server_world.ids(), vec![item, character]);
    for test_client in &session.clients {
        assert_eq!(test_client.world.ids(), vec![item, character]);
        assert_eq!(test_client.world.get(item).unwrap().kind, EntityKind::ITEM);
        assert_eq!(
            test_client.world.get(character).unwrap().position,
            Vec2::new(-1.0, 0.0)
        );
        assert_eq!(test_client.client.watermark(), 2);
    }
}

#[test]
fn acks_bring_peers_up_to_date() {
    let mut session = session(2);

    session
        .server
        .queue_spawn(EntityKind::ITEM, spawn_params(Vec2::ZERO))
        .unwrap();
    session.update(TICK);
    session.receive();
    session.update(TICK);
    let (mut server_events, _) = session.receive();

    let mut acks: Vec<_> = server_events.read::<SyncAckEvent>().collect();
    acks.sort();
    assert_eq!(acks, vec![(client_key(0), 1), (client_key(1), 1)]);
    for index in 0..2 {
        let connection = session.server.connection(&client_key(index)).unwrap();
        assert_eq!(connection.sync_state.last_known_watermark(), 1);
    }
}

#[test]
fn removals_propagate() {
    let mut session = session(2);

    let first = session
        .server
        .queue_spawn(EntityKind::ITEM, spawn_params(Vec2::ZERO))
        .unwrap();
    let second = session
        .server
        .queue_spawn(EntityKind::ITEM, spawn_params(Vec2::ZERO))
        .unwrap();
    session.run(5, TICK);

    session.server.queue_remove(first).unwrap();
    session.run(5, TICK);

    assert_eq!(session.server_world.ids(), vec![second]);
    for test_client in &session.clients {
        assert_eq!(test_client.world.ids(), vec![second]);
        assert_eq!(test_client.client.watermark(), 3);
    }
}

#[test]
fn peer_that_missed_sync_messages_converges() {
    let mut session = session(1);
    session
        .hub
        .set_drop_filter(Box::new(|from, _, bytes| from == SERVER && is_sync(bytes)));

    let mut spawned = Vec::new();
    for x in 0..4 {
        spawned.push(
            session
                .server
                .queue_spawn(EntityKind::ITEM, spawn_params(Vec2::new(x as f32, 0.0)))
                .unwrap(),
        );
        session.run(3, TICK);
    }
    assert!(session.clients[0].world.is_empty());
    assert_eq!(session.clients[0].client.watermark(), 0);

    session.hub.clear_drop_filter();
    session.run(3, TICK);

    assert_eq!(session.clients[0].world.ids(), spawned);
    assert_eq!(session.clients[0].client.watermark(), 4);
}

#[test]
fn lost_acks_only_cause_duplicate_records() {
    let mut session = session(1);
    let ack = PacketCategory::EntitySyncAck.to_u8();
    session
        .hub
        .set_drop_filter(Box::new(move |_, _, bytes| bytes.first() == Some(&ack)));

    let entity_id = session
        .server
        .queue_spawn(EntityKind::ITEM, spawn_params(Vec2::ZERO))
        .unwrap();
    session.update(TICK);
    let mut duplicates = 0;
    for _ in 0..5 {
        let (_, mut client_events) = session.receive();
        for report in client_events[0].read::<SyncEvent>() {
            duplicates += report.duplicates;
            assert_eq!(report.failed, 0);
        }
        session.update(TICK);
    }

    assert!(duplicates > 0);
    assert_eq!(session.clients[0].world.ids(), vec![entity_id]);
}

#[test]
fn empty_sync_message_still_moves_the_watermark() {
    let mut session = session(1);

    let mut writer = ByteWriter::new();
    PacketCategory::EntitySync.ser(&mut writer);
    0u16.ser(&mut writer);
    7u32.ser(&mut writer);
    0u16.ser(&mut writer);
    let mut raw = session.hub.transport(SERVER);
    raw.send(&client_key(0), &writer.to_bytes(), DeliveryMethod::Unreliable)
        .unwrap();

    let (_, mut client_events) = session.receive();
    let report = client_events[0].read::<SyncEvent>().next().unwrap();
    assert_eq!(report.declared, 7);
    assert_eq!(report.applied, 0);
    assert_eq!(session.clients[0].client.watermark(), 7);
}

#[test]
fn round_reset_starts_a_fresh_log() {
    let mut session = session(1);

    session
        .server
        .queue_spawn(EntityKind::ITEM, spawn_params(Vec2::ZERO))
        .unwrap();
    session.run(5, TICK);
    assert_eq!(session.clients[0].client.watermark(), 1);

    // the application tears its worlds down between rounds
    session.server.reset_round(None);
    session.server_world = TestWorld::new();
    session.clients[0].client.reset_round();
    session.clients[0].world = TestWorld::new();
    assert_eq!(session.server.watermark(), 0);

    let entity_id = session
        .server
        .queue_spawn(EntityKind::CHARACTER, spawn_params(Vec2::new(2.0, 2.0)))
        .unwrap();
    session.run(5, TICK);

    assert_eq!(session.clients[0].client.watermark(), 1);
    assert_eq!(session.clients[0].client.lifecycle().round(), 1);
    assert_eq!(
        session.clients[0].world.get(entity_id).unwrap().kind,
        EntityKind::CHARACTER
    );
}

#[test]
fn sync_of_the_old_round_in_flight_does_not_leak_into_the_new_one() {
    let mut session = session(1);

    session
        .server
        .queue_spawn(EntityKind::ITEM, spawn_params(Vec2::ZERO))
        .unwrap();
    session.run(5, TICK);
    session
        .server
        .queue_spawn(EntityKind::ITEM, spawn_params(Vec2::ZERO))
        .unwrap();
    // this sync message is still on its way when both ends reset
    session.update(TICK);

    session.server.reset_round(None);
    session.server_world = TestWorld::new();
    session.clients[0].client.reset_round();
    session.clients[0].world = TestWorld::new();

    let character = session
        .server
        .queue_spawn(EntityKind::CHARACTER, spawn_params(Vec2::new(3.0, 0.0)))
        .unwrap();
    session.run(30, TICK);

    assert_eq!(session.server.watermark(), 1);
    assert_eq!(session.clients[0].client.watermark(), 1);
    assert_eq!(session.clients[0].world.ids(), vec![character]);
    assert_eq!(
        session.clients[0].world.get(character).unwrap().kind,
        EntityKind::CHARACTER
    );
}

#[test]
fn client_that_skips_its_reset_still_follows_the_new_round() {
    let mut session = session(1);

    for _ in 0..3 {
        session
            .server
            .queue_spawn(EntityKind::ITEM, spawn_params(Vec2::ZERO))
            .unwrap();
    }
    session.run(5, TICK);
    assert_eq!(session.clients[0].world.len(), 3);

    session.server.reset_round(None);
    session.server_world = TestWorld::new();
    let character = session
        .server
        .queue_spawn(EntityKind::CHARACTER, spawn_params(Vec2::ZERO))
        .unwrap();
    session.update(TICK);

    let (_, mut client_events) = session.receive();
    let report = client_events[0].read::<SyncEvent>().next().unwrap();
    assert!(report.new_round);
    assert_eq!(report.cleared, 3);
    session.run(5, TICK);

    assert_eq!(session.clients[0].world.ids(), vec![character]);
    assert_eq!(session.clients[0].client.watermark(), 1);
}

#[test]
fn late_joiner_catches_up_over_several_capped_messages() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut protocol = Protocol::builder();
    protocol.lifecycle(LifecycleConfig {
        max_sync_message_bytes: 100,
        ..Default::default()
    });
    let mut session = TestSession::new(1, ServerConfig::default(), protocol.build(), 3);
    session.hub.set_drop_filter(Box::new(|from, _, bytes| {
        if from == SERVER && is_sync(bytes) {
            assert!(bytes.len() <= 100, "sync message of {} bytes", bytes.len());
        }
        false
    }));

    let mut spawned = Vec::new();
    for x in 0..40 {
        spawned.push(
            session
                .server
                .queue_spawn(EntityKind::ITEM, spawn_params(Vec2::new(x as f32, 0.0)))
                .unwrap(),
        );
    }
    session.run(40, TICK);

    assert_eq!(session.clients[0].world.ids(), spawned);
    assert_eq!(session.clients[0].client.watermark(), 40);
}
