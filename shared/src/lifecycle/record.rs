use ballast_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

use crate::{EntityId, EntityKind};

const REMOVE_TAG: u8 = 0;

/// One entry of the authority's lifecycle log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LifecycleRecord {
    Spawn {
        entity_id: EntityId,
        kind: EntityKind,
        params: Vec<u8>,
    },
    Remove {
        entity_id: EntityId,
    },
}

impl LifecycleRecord {
    pub fn entity_id(&self) -> EntityId {
        match self {
            Self::Spawn { entity_id, .. } | Self::Remove { entity_id } => *entity_id,
        }
    }
}

impl Serde for LifecycleRecord {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        match self {
            Self::Spawn {
                entity_id,
                kind,
                params,
            } => {
                kind.tag().ser(writer);
                entity_id.ser(writer);
                params.ser(writer);
            }
            Self::Remove { entity_id } => {
                REMOVE_TAG.ser(writer);
                entity_id.ser(writer);
            }
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let tag = u8::de(reader)?;
        let entity_id = EntityId::de(reader)?;
        match EntityKind::new(tag) {
            None => Ok(Self::Remove { entity_id }),
            Some(kind) => Ok(Self::Spawn {
                entity_id,
                kind,
                params: Vec::<u8>::de(reader)?,
            }),
        }
    }
}
