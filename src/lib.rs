//! clouddrive - a personal cloud drive core
//!
//! Accounts, files and folders of a browser file manager, persisted as JSON
//! bundles in a key-value store that stands in for browser local storage.

pub mod account;
pub mod config;
pub mod datetime;
pub mod drive;
pub mod error;
pub mod logging;
pub mod session;
pub mod store;

pub use account::{
    avatar_url, AccountError, AccountRepository, AccountService, Bundle, RegistrationRequest,
    User, ValidationError,
};
pub use config::Config;
pub use drive::{
    compose, format_file_size, ActionEffect, ActionOutcome, AlwaysConfirm, BulkAction,
    BulkOutcome, Confirm, DragPayload, Drive, DriveFile, FileAction, FileKind, Folder,
    FolderAction, FolderColor, Permission, SortKey, StorageUsage, UploadRequest, View, ViewQuery,
};
pub use error::{DriveError, Result};
pub use session::DriveSession;
pub use store::{FileStore, KeyValueStore, MemoryStore};
