mod channel_config;
mod reliable_receiver;
mod reliable_sender;

pub use channel_config::ReliableChannelConfig;
pub use reliable_receiver::{MessageCheck, ReliableReceiver};
pub use reliable_sender::{ReliableMessage, ReliableSender};
