//! Test helpers for E2E tests.
//!
//! Provides sessions over in-memory and file-backed stores with the
//! simulated latency turned off.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use clouddrive::config::{Config, StoreBackend};
use clouddrive::{DriveSession, FileStore, MemoryStore, RegistrationRequest};

/// Default password of test accounts.
pub const PASSWORD: &str = "secret123";

/// Configuration for tests: no latency, UTC dates.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.auth.latency_ms = 0;
    config.drive.timezone = "UTC".to_string();
    config
}

/// Configuration for tests using a file store at `path`.
pub fn file_config(path: &Path) -> Config {
    let mut config = test_config();
    config.store.backend = StoreBackend::File;
    config.store.path = path.to_string_lossy().into_owned();
    config
}

/// Create a signed-out session over a fresh shared memory store.
pub fn memory_session() -> (DriveSession<Arc<MemoryStore>>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let session = DriveSession::new(Arc::clone(&store), &test_config());
    (session, store)
}

/// Create a signed-out session over the file store at `path`.
pub fn file_session(path: &Path) -> DriveSession<FileStore> {
    let store = FileStore::open(path).unwrap();
    DriveSession::new(store, &file_config(path))
}

/// Register `email` with the default password and sign it in.
pub async fn register<S: clouddrive::KeyValueStore>(
    session: &mut DriveSession<S>,
    name: &str,
    email: &str,
) {
    session
        .register(RegistrationRequest::new(name, email, PASSWORD))
        .await
        .unwrap();
}
