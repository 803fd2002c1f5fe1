use std::fmt;

/// Factory tag of a spawn record. Tag 0 is reserved for removals on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKind(u8);

impl EntityKind {
    pub const ITEM: EntityKind = EntityKind(1);
    pub const CHARACTER: EntityKind = EntityKind(2);

    /// `None` for the reserved removal tag.
    pub const fn new(tag: u8) -> Option<Self> {
        if tag == 0 {
            None
        } else {
            Some(Self(tag))
        }
    }

    pub const fn tag(self) -> u8 {
        self.0
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ITEM => f.write_str("item"),
            Self::CHARACTER => f.write_str("character"),
            Self(tag) => write!(f, "kind#{tag}"),
        }
    }
}
