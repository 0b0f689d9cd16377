//! Account lifecycle: registration, sign-in, profile updates and deletion.
//!
//! Every async operation first waits for the configured latency, standing in
//! for a round trip to an account backend.

use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::model::{avatar_url, Bundle, User};
use super::repository::AccountRepository;
use super::validation::{
    validate_email, validate_name, validate_password_change, validate_registration,
    ValidationError,
};
use crate::config::AuthConfig;
use crate::datetime::rfc3339;
use crate::drive::Drive;
use crate::store::{keys, KeyValueStore};
use crate::DriveError;

/// Account-specific errors.
#[derive(Error, Debug)]
pub enum AccountError {
    /// An account is already registered under the email.
    #[error("email is already registered")]
    EmailTaken,

    /// No account is registered under the email.
    #[error("account not found")]
    AccountNotFound,

    /// Email or password is incorrect.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Current password does not match.
    #[error("current password is incorrect")]
    WrongPassword,

    /// The operation needs a signed-in account.
    #[error("not signed in")]
    NotSignedIn,

    /// Validation failed.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Store error.
    #[error("storage error: {0}")]
    Storage(String),
}

fn storage(e: DriveError) -> AccountError {
    AccountError::Storage(e.to_string())
}

/// Registration request data.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    /// Display name.
    pub name: String,
    /// Email address, the account key.
    pub email: String,
    /// Password.
    pub password: String,
}

impl RegistrationRequest {
    /// Create a new registration request.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Account operations over a key-value store.
pub struct AccountService<S> {
    repo: AccountRepository<S>,
    latency: Duration,
    min_password_length: usize,
}

impl<S: KeyValueStore> AccountService<S> {
    /// Create a new AccountService.
    pub fn new(store: S, config: &AuthConfig) -> Self {
        Self {
            repo: AccountRepository::new(store),
            latency: Duration::from_millis(config.latency_ms),
            min_password_length: config.min_password_length,
        }
    }

    /// Get the underlying repository.
    pub fn repository(&self) -> &AccountRepository<S> {
        &self.repo
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// Sign in with email and password.
    ///
    /// Succeeds only when a bundle exists for `email`, the stored password
    /// matches and the bundle belongs to `email`. Records the current-user
    /// pointer on success.
    pub async fn login(&self, email: &str, password: &str) -> Result<Bundle, AccountError> {
        self.simulate_latency().await;
        let email = email.trim();

        if keys::is_reserved(email) {
            warn!(email = email, "Login failed: reserved key");
            return Err(AccountError::InvalidCredentials);
        }

        let Some(bundle) = self.repo.load_bundle(email).map_err(storage)? else {
            warn!(email = email, "Login failed: unknown account");
            return Err(AccountError::InvalidCredentials);
        };

        let stored = self.repo.password(email).map_err(storage)?;
        if stored.as_deref() != Some(password) {
            warn!(email = email, "Login failed: wrong password");
            return Err(AccountError::InvalidCredentials);
        }

        if bundle.user.email != email {
            warn!(email = email, "Login failed: bundle belongs to another email");
            return Err(AccountError::InvalidCredentials);
        }

        self.repo.set_current_email(email).map_err(storage)?;
        info!(email = email, user_id = %bundle.user.id, "User logged in");

        Ok(bundle)
    }

    /// Register a new account and sign it in.
    ///
    /// This function:
    /// 1. Validates all input fields
    /// 2. Checks if the email is already registered
    /// 3. Stores an empty bundle and the password
    /// 4. Records the current-user pointer
    pub async fn register(&self, request: RegistrationRequest) -> Result<Bundle, AccountError> {
        self.simulate_latency().await;

        let email = request.email.trim();
        validate_registration(
            &request.name,
            email,
            &request.password,
            self.min_password_length,
        )?;
        let name = request.name.trim();

        if self.repo.exists(email).map_err(storage)? {
            return Err(AccountError::EmailTaken);
        }

        let now = Utc::now();
        let user = User {
            id: now.timestamp_millis().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            avatar: Some(avatar_url(name)),
            join_date: Some(rfc3339(&now)),
        };
        let bundle = Bundle::new(user);

        self.repo.save_bundle(&bundle).map_err(storage)?;
        self.repo
            .set_password(email, &request.password)
            .map_err(storage)?;
        self.repo.set_current_email(email).map_err(storage)?;

        info!(email = email, user_id = %bundle.user.id, "New user registered");

        Ok(bundle)
    }

    /// Sign out, removing the session pointer and tokens.
    pub async fn logout(&self) -> Result<(), AccountError> {
        self.simulate_latency().await;
        self.repo.clear_session().map_err(storage)?;
        info!("User logged out");
        Ok(())
    }

    /// Load the bundle of the signed-in account, if any.
    ///
    /// A pointer to an email without a bundle yields no session.
    pub fn restore_session(&self) -> Result<Option<Bundle>, AccountError> {
        let Some(email) = self.repo.current_email().map_err(storage)? else {
            return Ok(None);
        };

        let bundle = self.repo.load_bundle(&email).map_err(storage)?;
        match &bundle {
            Some(bundle) => debug!(email = %email, files = bundle.files.len(), "Session restored"),
            None => warn!(email = %email, "Current user pointer has no bundle"),
        }

        Ok(bundle)
    }

    /// Change the display name (and avatar) of an account.
    pub async fn update_name(&self, email: &str, name: &str) -> Result<User, AccountError> {
        self.simulate_latency().await;

        let name = validate_name(name)?;
        let mut bundle = self.load_existing(email)?;
        bundle.user.rename(&name);
        self.repo.save_bundle(&bundle).map_err(storage)?;

        info!(email = email, "Name updated");
        Ok(bundle.user)
    }

    /// Move an account to a new email.
    ///
    /// The bundle and password entries are re-keyed and the session pointer
    /// follows when it pointed at the old email. Changing to the same email
    /// is a no-op.
    pub async fn update_email(&self, current: &str, new: &str) -> Result<User, AccountError> {
        self.simulate_latency().await;

        let new = new.trim();
        validate_email(new)?;

        let mut bundle = self.load_existing(current)?;
        if new == current {
            return Ok(bundle.user);
        }

        if self.repo.exists(new).map_err(storage)? {
            return Err(AccountError::EmailTaken);
        }

        bundle.user.email = new.to_string();
        self.repo.save_bundle(&bundle).map_err(storage)?;
        self.repo.remove_bundle(current).map_err(storage)?;

        if let Some(password) = self.repo.password(current).map_err(storage)? {
            self.repo.set_password(new, &password).map_err(storage)?;
            self.repo.remove_password(current).map_err(storage)?;
        }

        if self.repo.current_email().map_err(storage)?.as_deref() == Some(current) {
            self.repo.set_current_email(new).map_err(storage)?;
        }

        info!(from = current, to = new, "Email updated");
        Ok(bundle.user)
    }

    /// Change the password of an account.
    pub async fn change_password(
        &self,
        email: &str,
        current: &str,
        new: &str,
    ) -> Result<(), AccountError> {
        self.simulate_latency().await;

        validate_password_change(current, new, self.min_password_length)?;

        let stored = self.repo.password(email).map_err(storage)?;
        if stored.as_deref() != Some(current) {
            warn!(email = email, "Password change failed: wrong current password");
            return Err(AccountError::WrongPassword);
        }

        self.repo.set_password(email, new).map_err(storage)?;
        info!(email = email, "Password changed");
        Ok(())
    }

    /// Delete an account and everything stored for it, then sign out.
    pub async fn delete_account(&self, email: &str) -> Result<(), AccountError> {
        self.simulate_latency().await;

        self.repo.remove_bundle(email).map_err(storage)?;
        self.repo.remove_password(email).map_err(storage)?;
        self.repo.clear_session().map_err(storage)?;

        info!(email = email, "Account deleted");
        Ok(())
    }

    /// Mirror a drive snapshot into the user's bundle.
    pub fn save_drive(&self, user: &User, drive: &Drive) -> Result<(), AccountError> {
        self.repo
            .save_bundle(&Bundle::with_drive(user.clone(), drive))
            .map_err(storage)
    }

    /// Get the dark mode preference.
    pub fn dark_mode(&self) -> Result<bool, AccountError> {
        self.repo.dark_mode().map_err(storage)
    }

    /// Store the dark mode preference.
    pub fn set_dark_mode(&self, enabled: bool) -> Result<(), AccountError> {
        self.repo.set_dark_mode(enabled).map_err(storage)
    }

    fn load_existing(&self, email: &str) -> Result<Bundle, AccountError> {
        self.repo
            .load_bundle(email)
            .map_err(storage)?
            .ok_or(AccountError::AccountNotFound)
    }
}
