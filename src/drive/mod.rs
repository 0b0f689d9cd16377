//! File management module for clouddrive.
//!
//! This module provides the file side of an account:
//! - File and folder records with their persisted JSON layout
//! - Closed action types for file, bulk and folder mutations
//! - The [`Drive`] registry applying those actions
//! - View composition (filter, search, sort) and storage statistics

mod action;
mod format;
mod registry;
mod stats;
mod types;
pub mod view;

pub use action::{
    ActionEffect, ActionOutcome, AlwaysConfirm, BulkAction, BulkOutcome, Confirm, FileAction,
    FolderAction,
};
pub use format::{format_file_size, generate_id, generate_object_url};
pub use registry::{Drive, UploadContext, UploadRequest};
pub use stats::{kind_stats, KindStat, StorageUsage};
pub use types::{DragPayload, DriveFile, FileKind, Folder, FolderColor, Permission};
pub use view::{compose, SortKey, View, ViewQuery};
