// Flowline worker assembly
//
// Wires the pieces a worker process needs: validated configuration, the REST
// client, startup key prefetch and the payload codec chain the execution
// runtime applies around every payload. Task activities are thin facades
// over the REST client, registered with the runtime at startup.

pub mod activities;
pub mod config;
pub mod connection;
pub mod keys;

// Re-export main types
pub use activities::{ActivityError, RestTaskActivities, TaskActivities};
pub use config::{ConfigError, EncryptionProperties, WorkerProperties};
pub use connection::WorkerConnection;
pub use keys::load_secret_store;
