pub mod helpers;
pub mod local_transport;
pub mod test_world;

pub use helpers::*;
pub use local_transport::{LocalHub, LocalTransport};
pub use test_world::{spawn_params, TestEntity, TestShuttle, TestWorld};
