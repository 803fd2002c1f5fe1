mod error;
mod event_queue;
mod event_reader;
mod event_type;
mod network_event;
mod policy;


pub use error::DispatchError;
pub use event_queue::{encode_event, EventBatch, EventQueue, MAX_EVENTS_PER_BATCH, MAX_SUB_EVENT_LEN};
pub use event_reader::{read_event_batch, IngestReport};
pub use event_type::NetworkEventType;
pub use network_event::NetworkEvent;
pub use policy::{DeliveryClass, EventPolicies, EventPolicy};
