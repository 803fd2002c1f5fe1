use thiserror::Error;

use crate::{EntityId, EntityKind};

/// Errors an [`EntityFactory`] reports for a spawn it cannot carry out
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactoryError {
    /// No constructor is registered for the kind tag
    #[error("No factory is registered for {kind}")]
    UnknownKind { kind: EntityKind },

    /// The creation parameters could not be understood
    #[error("Invalid parameters for {kind} entity {entity_id}: {reason}")]
    InvalidParams {
        kind: EntityKind,
        entity_id: EntityId,
        reason: String,
    },

    /// An entity with this id is already live
    #[error("Entity {entity_id} already exists")]
    AlreadyExists { entity_id: EntityId },
}

/// Creates and destroys simulation entities on behalf of the lifecycle log.
pub trait EntityFactory {
    fn create(&mut self, kind: EntityKind, entity_id: EntityId, params: &[u8]) -> Result<(), FactoryError>;

    /// Returns whether the entity existed.
    fn remove(&mut self, entity_id: EntityId) -> bool;
}
