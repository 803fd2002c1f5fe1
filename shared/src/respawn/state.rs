use std::fmt;

/// Phase of the respawn cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RespawnState {
    Waiting = 0,
    Transporting = 1,
    Returning = 2,
}

impl RespawnState {
    pub fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Waiting),
            1 => Some(Self::Transporting),
            2 => Some(Self::Returning),
            _ => None,
        }
    }

    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// The state the cycle moves on to.
    pub fn next(self) -> Self {
        match self {
            Self::Waiting => Self::Transporting,
            Self::Transporting => Self::Returning,
            Self::Returning => Self::Waiting,
        }
    }
}

impl fmt::Display for RespawnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
