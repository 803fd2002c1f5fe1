use ballast_shared::{
    ByteReader, ByteWrite, CodecError, EntityKind, NetworkEventType, NetworkSerializable, Serde,
    Vec2,
};

/// A replicated entity with just enough state to tell events apart
#[derive(Clone, Debug, PartialEq)]
pub struct TestEntity {
    pub kind: EntityKind,
    pub position: Vec2,
    pub health: f32,
    pub alive: bool,
    /// Every event applied to this entity, with the sender's send time.
    pub applied: Vec<(NetworkEventType, f32)>,
}

impl TestEntity {
    pub fn new(kind: EntityKind, position: Vec2) -> Self {
        Self {
            kind,
            position,
            health: 100.0,
            alive: true,
            applied: Vec::new(),
        }
    }

    pub fn applied_count(&self, event_type: NetworkEventType) -> usize {
        self.applied
            .iter()
            .filter(|(applied, _)| *applied == event_type)
            .count()
    }
}

impl NetworkSerializable for TestEntity {
    fn write_event(
        &self,
        event_type: NetworkEventType,
        data: &[u8],
        writer: &mut dyn ByteWrite,
    ) -> Result<(), CodecError> {
        match event_type {
            NetworkEventType::EntityUpdate
            | NetworkEventType::ImportantEntityUpdate
            | NetworkEventType::PhysicsBodyPosition => self.position.ser(writer),
            NetworkEventType::ApplyStatusEffect | NetworkEventType::WallDamage => {
                self.health.ser(writer)
            }
            NetworkEventType::KillCharacter => {
                if self.kind != EntityKind::CHARACTER {
                    return Err(CodecError::UnsupportedEvent { event_type });
                }
            }
            _ => writer.write_bytes(data),
        }
        Ok(())
    }

    fn read_event(
        &mut self,
        event_type: NetworkEventType,
        reader: &mut ByteReader,
        send_time: f32,
    ) -> Result<(), CodecError> {
        match event_type {
            NetworkEventType::EntityUpdate
            | NetworkEventType::ImportantEntityUpdate
            | NetworkEventType::PhysicsBodyPosition => self.position = Vec2::de(reader)?,
            NetworkEventType::ApplyStatusEffect | NetworkEventType::WallDamage => {
                self.health = f32::de(reader)?
            }
            NetworkEventType::KillCharacter => self.alive = false,
            _ => {
                reader.read_remaining();
            }
        }
        self.applied.push((event_type, send_time));
        Ok(())
    }
}
