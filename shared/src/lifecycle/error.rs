use thiserror::Error;

use ballast_serde::SerdeErr;

use crate::{EntityId, Round, Watermark};

/// Errors raised by the entity lifecycle log
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// Every entity id is either live or already reserved
    #[error("No free entity id is left to reserve")]
    EntityIdsExhausted,

    /// Removal was queued for an id that is neither live nor reserved
    #[error("Entity {entity_id} is not known to the lifecycle log")]
    UnknownEntity { entity_id: EntityId },

    /// A sync message claims more records than its watermark allows
    #[error("Sync message declares {count} records but only a watermark of {watermark}")]
    InconsistentSync { watermark: Watermark, count: u16 },

    /// The sync message belongs to a round this peer has already left
    #[error("Sync message of round {round} arrived while following round {current}")]
    StaleRound { round: Round, current: Round },

    /// The sync header ended early
    #[error("Sync message header is truncated")]
    Malformed(#[from] SerdeErr),
}
