//! Key-value store abstraction for clouddrive.
//!
//! Account bundles, passwords and session flags all live in a flat
//! string-to-string store, modelled after browser local storage. The
//! [`KeyValueStore`] trait is the only seam the account layer talks to, so a
//! different backend can be substituted without touching drive logic.
//!
//! # Layout
//!
//! ```text
//! <email>                         -> JSON bundle {user, files, folders}
//! USER_PASSWORD_<email>           -> plaintext password
//! fileManager_currentUserEmail    -> email of the signed-in account
//! fileManager_authToken           -> session flag
//! fileManager_refreshToken        -> session flag
//! fileManager_darkMode            -> "true" / "false"
//! ```

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use tracing::info;

use crate::config::{StoreBackend, StoreConfig};
use crate::Result;

/// Well-known keys of the persisted layout.
pub mod keys {
    /// Email of the account currently signed in.
    pub const CURRENT_USER_EMAIL: &str = "fileManager_currentUserEmail";
    /// Access token flag, cleared on logout.
    pub const AUTH_TOKEN: &str = "fileManager_authToken";
    /// Refresh token flag, cleared on logout.
    pub const REFRESH_TOKEN: &str = "fileManager_refreshToken";
    /// Dark mode preference.
    pub const DARK_MODE: &str = "fileManager_darkMode";
    /// Prefix of the per-account password entry.
    pub const PASSWORD_PREFIX: &str = "USER_PASSWORD";

    /// Key holding the password of the account registered under `email`.
    pub fn password_key(email: &str) -> String {
        format!("{PASSWORD_PREFIX}_{email}")
    }

    /// Whether `key` belongs to the store's own entries rather than to an
    /// account bundle.
    pub fn is_reserved(key: &str) -> bool {
        let password_entry = key
            .strip_prefix(PASSWORD_PREFIX)
            .is_some_and(|rest| rest.starts_with('_'));

        password_entry
            || [CURRENT_USER_EMAIL, AUTH_TOKEN, REFRESH_TOKEN, DARK_MODE].contains(&key)
    }
}

/// A flat string key-value store.
///
/// Methods take `&self`; implementations synchronise internally so a single
/// store can be shared between services.
pub trait KeyValueStore: Send + Sync {
    /// Returns the name of the store backend.
    fn backend_name(&self) -> &'static str;

    /// Get the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Create or overwrite the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Returns `true` if an entry was removed.
    fn remove(&self, key: &str) -> Result<bool>;

    /// Check whether `key` holds a value.
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        (**self).remove(key)
    }

    fn contains(&self, key: &str) -> Result<bool> {
        (**self).contains(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        (**self).remove(key)
    }

    fn contains(&self, key: &str) -> Result<bool> {
        (**self).contains(key)
    }
}

/// Open the store backend selected by the configuration.
pub fn open(config: &StoreConfig) -> Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config.backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::File => Arc::new(FileStore::open(&config.path)?),
    };

    info!(backend = store.backend_name(), "Key-value store opened");
    Ok(store)
}
