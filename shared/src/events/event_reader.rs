use log::{debug, warn};

use ballast_serde::{ByteReader, Serde, SerdeErr};

use crate::{EntityId, EntityStore, NetworkEventType};

/// Outcome of applying one `NetworkEventBatch`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IngestReport {
    pub send_time: f32,
    pub declared: u8,
    pub applied: usize,
    /// Sub-events whose entity does not exist here.
    pub skipped_stale: usize,
    /// Sub-events that failed to decode or apply, including a truncated tail.
    pub skipped_malformed: usize,
}

/// Applies a batch body (the reader sits just past the category byte).
/// Only a broken header is an error. Problems with individual sub-events
/// are logged and counted, and processing moves on to the next one.
pub fn read_event_batch(
    reader: &mut ByteReader,
    store: &mut dyn EntityStore,
) -> Result<IngestReport, SerdeErr> {
    let send_time = f32::de(reader)?;
    let declared = u8::de(reader)?;
    let mut report = IngestReport {
        send_time,
        declared,
        ..Default::default()
    };

    for index in 0..declared {
        let mut sub_reader = match u8::de(reader)
            .and_then(|len| reader.sub_reader(usize::from(len)))
        {
            Ok(sub_reader) => sub_reader,
            Err(_) => {
                warn!(
                    "Event batch truncated at sub-event {index} of {declared}, dropping the rest"
                );
                report.skipped_malformed += 1;
                break;
            }
        };

        let header = NetworkEventType::de(&mut sub_reader)
            .and_then(|event_type| Ok((event_type, EntityId::de(&mut sub_reader)?)));
        let (event_type, entity_id) = match header {
            Ok(header) => header,
            Err(_) => {
                warn!("Skipping sub-event {index} with an unreadable header");
                report.skipped_malformed += 1;
                continue;
            }
        };

        let Some(entity) = store.entity_mut(entity_id) else {
            debug!("Skipping {event_type} event for missing entity {entity_id}");
            report.skipped_stale += 1;
            continue;
        };

        match entity.read_event(event_type, &mut sub_reader, send_time) {
            Ok(()) => report.applied += 1,
            Err(err) => {
                warn!("Failed to apply {event_type} event to entity {entity_id}: {err}");
                report.skipped_malformed += 1;
            }
        }
    }

    Ok(report)
}
