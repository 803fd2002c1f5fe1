mod session;

pub use session::{client_key, TestClient, TestSession, SERVER};
