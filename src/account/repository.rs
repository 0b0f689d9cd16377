//! Account persistence over a key-value store.

use tracing::warn;

use super::model::Bundle;
use crate::store::{keys, KeyValueStore};
use crate::Result;

/// Repository for account bundles, passwords and session keys.
pub struct AccountRepository<S> {
    store: S,
}

impl<S: KeyValueStore> AccountRepository<S> {
    /// Create a new AccountRepository over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Check if an account is registered under `email`.
    pub fn exists(&self, email: &str) -> Result<bool> {
        self.store.contains(email)
    }

    /// Load the bundle stored under `email`.
    pub fn load_bundle(&self, email: &str) -> Result<Option<Bundle>> {
        let Some(raw) = self.store.get(email)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(bundle) => Ok(Some(bundle)),
            Err(e) => {
                warn!(email = email, error = %e, "Stored bundle is not readable");
                Err(e.into())
            }
        }
    }

    /// Store a bundle under its user's email.
    pub fn save_bundle(&self, bundle: &Bundle) -> Result<()> {
        let raw = serde_json::to_string(bundle)?;
        self.store.set(&bundle.user.email, &raw)
    }

    /// Remove the bundle stored under `email`.
    pub fn remove_bundle(&self, email: &str) -> Result<bool> {
        self.store.remove(email)
    }

    /// Get the stored password of `email`.
    pub fn password(&self, email: &str) -> Result<Option<String>> {
        self.store.get(&keys::password_key(email))
    }

    /// Store the password of `email`.
    pub fn set_password(&self, email: &str, password: &str) -> Result<()> {
        self.store.set(&keys::password_key(email), password)
    }

    /// Remove the stored password of `email`.
    pub fn remove_password(&self, email: &str) -> Result<bool> {
        self.store.remove(&keys::password_key(email))
    }

    /// Get the email of the signed-in account.
    pub fn current_email(&self) -> Result<Option<String>> {
        self.store.get(keys::CURRENT_USER_EMAIL)
    }

    /// Record `email` as the signed-in account.
    pub fn set_current_email(&self, email: &str) -> Result<()> {
        self.store.set(keys::CURRENT_USER_EMAIL, email)
    }

    /// Remove the session pointer and token keys.
    pub fn clear_session(&self) -> Result<()> {
        self.store.remove(keys::AUTH_TOKEN)?;
        self.store.remove(keys::REFRESH_TOKEN)?;
        self.store.remove(keys::CURRENT_USER_EMAIL)?;
        Ok(())
    }

    /// Get the dark mode preference. Missing or unreadable values are `false`.
    pub fn dark_mode(&self) -> Result<bool> {
        Ok(self
            .store
            .get(keys::DARK_MODE)?
            .and_then(|v| serde_json::from_str::<bool>(&v).ok())
            .unwrap_or(false))
    }

    /// Store the dark mode preference.
    pub fn set_dark_mode(&self, enabled: bool) -> Result<()> {
        self.store
            .set(keys::DARK_MODE, if enabled { "true" } else { "false" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::model::User;
    use crate::store::MemoryStore;
    use crate::DriveError;

    fn bundle(email: &str) -> Bundle {
        Bundle::new(User {
            id: "1".to_string(),
            name: "Ada".to_string(),
            email: email.to_string(),
            avatar: None,
            join_date: None,
        })
    }

    #[test]
    fn test_save_and_load_bundle() {
        let repo = AccountRepository::new(MemoryStore::new());
        repo.save_bundle(&bundle("ada@example.com")).unwrap();

        assert!(repo.exists("ada@example.com").unwrap());
        let loaded = repo.load_bundle("ada@example.com").unwrap().unwrap();
        assert_eq!(loaded, bundle("ada@example.com"));
        assert!(repo.load_bundle("nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn test_load_corrupt_bundle() {
        let repo = AccountRepository::new(MemoryStore::new());
        repo.store().set("ada@example.com", "{broken").unwrap();

        let result = repo.load_bundle("ada@example.com");
        assert!(matches!(result, Err(DriveError::Serialization(_))));
    }

    #[test]
    fn test_password_entries() {
        let repo = AccountRepository::new(MemoryStore::new());
        repo.set_password("ada@example.com", "secret").unwrap();

        assert_eq!(
            repo.store().get("USER_PASSWORD_ada@example.com").unwrap(),
            Some("secret".to_string())
        );
        assert!(repo.remove_password("ada@example.com").unwrap());
        assert!(repo.password("ada@example.com").unwrap().is_none());
    }

    #[test]
    fn test_clear_session() {
        let repo = AccountRepository::new(MemoryStore::new());
        repo.set_current_email("ada@example.com").unwrap();
        repo.store().set(keys::AUTH_TOKEN, "t").unwrap();
        repo.store().set(keys::REFRESH_TOKEN, "r").unwrap();
        repo.set_dark_mode(true).unwrap();

        repo.clear_session().unwrap();

        assert!(repo.current_email().unwrap().is_none());
        assert!(!repo.store().contains(keys::AUTH_TOKEN).unwrap());
        assert!(!repo.store().contains(keys::REFRESH_TOKEN).unwrap());
        // Preferences survive logout
        assert!(repo.dark_mode().unwrap());
    }

    #[test]
    fn test_dark_mode_defaults_to_false() {
        let repo = AccountRepository::new(MemoryStore::new());
        assert!(!repo.dark_mode().unwrap());

        repo.store().set(keys::DARK_MODE, "garbage").unwrap();
        assert!(!repo.dark_mode().unwrap());

        repo.set_dark_mode(true).unwrap();
        assert_eq!(
            repo.store().get(keys::DARK_MODE).unwrap(),
            Some("true".to_string())
        );
    }
}
