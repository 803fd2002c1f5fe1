mod respawn_mirror;

pub use respawn_mirror::RespawnMirror;
