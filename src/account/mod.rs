//! Account module for clouddrive.
//!
//! This module provides:
//! - Account records (`User`, `Bundle`)
//! - Persistence of bundles, passwords and the session pointer
//! - Registration, sign-in and profile management
//! - Input validation

mod model;
mod repository;
mod service;
pub mod validation;

pub use model::{avatar_url, Bundle, User};
pub use repository::AccountRepository;
pub use service::{AccountError, AccountService, RegistrationRequest};
pub use validation::ValidationError;
