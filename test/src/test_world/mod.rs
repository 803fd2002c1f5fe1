mod test_entity;
mod test_shuttle;

pub use test_entity::TestEntity;
pub use test_shuttle::TestShuttle;

use std::collections::BTreeMap;

use ballast_shared::{
    ByteReader, EntityFactory, EntityId, EntityKind, EntityStore, FactoryError,
    NetworkSerializable, Serde, Vec2,
};

/// Minimal simulation world: entities keyed by id
#[derive(Default)]
pub struct TestWorld {
    entities: BTreeMap<EntityId, TestEntity>,
}

impl TestWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, entity_id: EntityId) -> Option<&TestEntity> {
        self.entities.get(&entity_id)
    }

    pub fn get_mut(&mut self, entity_id: EntityId) -> Option<&mut TestEntity> {
        self.entities.get_mut(&entity_id)
    }

    pub fn contains(&self, entity_id: EntityId) -> bool {
        self.entities.contains_key(&entity_id)
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl EntityStore for TestWorld {
    fn entity(&self, id: EntityId) -> Option<&dyn NetworkSerializable> {
        self.entities
            .get(&id)
            .map(|entity| entity as &dyn NetworkSerializable)
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut dyn NetworkSerializable> {
        self.entities
            .get_mut(&id)
            .map(|entity| entity as &mut dyn NetworkSerializable)
    }
}

impl EntityFactory for TestWorld {
    /// Params are the spawn position.
    fn create(&mut self, kind: EntityKind, entity_id: EntityId, params: &[u8]) -> Result<(), FactoryError> {
        if kind != EntityKind::ITEM && kind != EntityKind::CHARACTER {
            return Err(FactoryError::UnknownKind { kind });
        }
        if self.entities.contains_key(&entity_id) {
            return Err(FactoryError::AlreadyExists { entity_id });
        }
        let position = Vec2::de(&mut ByteReader::new(params)).map_err(|_| FactoryError::InvalidParams {
            kind,
            entity_id,
            reason: format!("expected a position, got {} bytes", params.len()),
        })?;
        self.entities.insert(entity_id, TestEntity::new(kind, position));
        Ok(())
    }

    fn remove(&mut self, entity_id: EntityId) -> bool {
        self.entities.remove(&entity_id).is_some()
    }
}

/// Creation params for a [`TestWorld`] spawn.
pub fn spawn_params(position: Vec2) -> Vec<u8> {
    let mut writer = ballast_shared::ByteWriter::new();
    position.ser(&mut writer);
    writer.to_bytes()
}
