use ballast_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

use crate::RespawnState;

/// Body of a `Respawn` packet. Carries enough state for a peer to mirror
/// the authority's cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RespawnControl {
    Waiting {
        countdown_started: bool,
        respawn_timer: f32,
    },
    Transporting {
        transport_time: f32,
    },
    Returning,
}

impl RespawnControl {
    pub fn state(&self) -> RespawnState {
        match self {
            Self::Waiting { .. } => RespawnState::Waiting,
            Self::Transporting { .. } => RespawnState::Transporting,
            Self::Returning => RespawnState::Returning,
        }
    }
}

impl Serde for RespawnControl {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_byte(self.state().to_u8());
        match self {
            Self::Waiting {
                countdown_started,
                respawn_timer,
            } => {
                countdown_started.ser(writer);
                respawn_timer.ser(writer);
            }
            Self::Transporting { transport_time } => transport_time.ser(writer),
            Self::Returning => {}
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let state = RespawnState::from_u8(reader.read_byte()?).ok_or(SerdeErr)?;
        let control = match state {
            RespawnState::Waiting => Self::Waiting {
                countdown_started: bool::de(reader)?,
                respawn_timer: f32::de(reader)?,
            },
            RespawnState::Transporting => Self::Transporting {
                transport_time: f32::de(reader)?,
            },
            RespawnState::Returning => Self::Returning,
        };
        Ok(control)
    }
}
