use std::fmt;

use ballast_serde::{ByteReader, ByteWrite, ConstByteLength, Serde, SerdeErr};

/// Kind of a replicated gameplay event. The tag goes on the wire as one byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum NetworkEventType {
    EntityUpdate = 0,
    ImportantEntityUpdate = 1,
    KillCharacter = 2,
    SelectCharacter = 3,
    PickItem = 4,
    InventoryUpdate = 5,
    ApplyStatusEffect = 6,
    ComponentUpdate = 7,
    ImportantComponentUpdate = 8,
    PhysicsBodyPosition = 9,
    WallDamage = 10,
}

impl NetworkEventType {
    pub const ALL: [NetworkEventType; 11] = [
        Self::EntityUpdate,
        Self::ImportantEntityUpdate,
        Self::KillCharacter,
        Self::SelectCharacter,
        Self::PickItem,
        Self::InventoryUpdate,
        Self::ApplyStatusEffect,
        Self::ComponentUpdate,
        Self::ImportantComponentUpdate,
        Self::PhysicsBodyPosition,
        Self::WallDamage,
    ];

    pub fn from_u8(tag: u8) -> Option<Self> {
        Self::ALL.get(usize::from(tag)).copied()
    }

    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for NetworkEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Serde for NetworkEventType {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_byte(self.to_u8());
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Self::from_u8(reader.read_byte()?).ok_or(SerdeErr)
    }

    fn byte_length(&self) -> usize {
        1
    }
}

impl ConstByteLength for NetworkEventType {
    fn const_byte_length() -> usize {
        1
    }
}
