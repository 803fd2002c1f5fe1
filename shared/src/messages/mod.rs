pub mod channels;
pub mod error;
pub mod packet_category;

pub use error::PacketError;
pub use packet_category::PacketCategory;
