//! The in-memory file and folder registry of one account.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::action::{ActionEffect, ActionOutcome, BulkAction, BulkOutcome, Confirm, FileAction};
use super::format::{format_file_size, generate_id, generate_object_url};
use super::types::{DriveFile, FileKind, Folder, FolderColor, Permission};
use crate::account::validation::validate_name;
use crate::datetime::{iso_date, short_date};
use crate::{DriveError, Result};

/// Describes one file handed over for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// File name, including extension.
    pub name: String,
    /// Content size in bytes.
    pub size_bytes: u64,
}

impl UploadRequest {
    /// Create a new upload request.
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
        }
    }
}

/// Context stamped onto uploaded files.
#[derive(Debug, Clone)]
pub struct UploadContext<'a> {
    /// ID of the uploading user.
    pub owner: &'a str,
    /// Folder that receives the files (None for root).
    pub folder: Option<&'a str>,
    /// Upload time.
    pub now: DateTime<Utc>,
    /// Timezone for the short modified label.
    pub timezone: &'a str,
}

/// Files and folders of one account.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Drive {
    files: Vec<DriveFile>,
    folders: Vec<Folder>,
}

impl Drive {
    /// Create a registry from stored records.
    pub fn new(files: Vec<DriveFile>, folders: Vec<Folder>) -> Self {
        Self { files, folders }
    }

    /// All files, in insertion order.
    pub fn files(&self) -> &[DriveFile] {
        &self.files
    }

    /// All folders, in insertion order. Item counts are as stored; see
    /// [`Drive::folders_with_counts`] for live counts.
    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    /// Consume the registry, returning its records.
    pub fn into_parts(self) -> (Vec<DriveFile>, Vec<Folder>) {
        (self.files, self.folders)
    }

    /// Get a file by ID.
    pub fn file(&self, id: &str) -> Option<&DriveFile> {
        self.files.iter().find(|f| f.id == id)
    }

    /// Get a folder by ID.
    pub fn folder(&self, id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    fn file_mut(&mut self, id: &str) -> Result<&mut DriveFile> {
        self.files
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| DriveError::NotFound("file".to_string()))
    }

    /// Add uploaded files and return them.
    pub fn upload(&mut self, requests: &[UploadRequest], ctx: &UploadContext<'_>) -> Vec<DriveFile> {
        let upload_date = iso_date(&ctx.now);
        let modified_date = short_date(&ctx.now, ctx.timezone);

        let added: Vec<DriveFile> = requests
            .iter()
            .map(|req| DriveFile {
                id: generate_id(),
                name: req.name.clone(),
                kind: FileKind::from_name(&req.name),
                size: format_file_size(req.size_bytes),
                size_bytes: req.size_bytes,
                upload_date: upload_date.clone(),
                modified_date: modified_date.clone(),
                favorite: false,
                deleted: false,
                shared: false,
                url: generate_object_url(),
                thumbnail: None,
                owner: ctx.owner.to_string(),
                permissions: Permission::Owner,
                folder: ctx.folder.map(str::to_string),
            })
            .collect();

        debug!(count = added.len(), folder = ?ctx.folder, "Files uploaded");
        self.files.extend(added.iter().cloned());
        added
    }

    /// Apply an action to a single file.
    ///
    /// `DeletePermanently` asks `confirm` first and does nothing if declined.
    pub fn apply(
        &mut self,
        file_id: &str,
        action: FileAction,
        confirm: &dyn Confirm,
    ) -> Result<ActionOutcome> {
        let file = self.file_mut(file_id)?;

        let outcome = match action {
            FileAction::Star => {
                file.favorite = !file.favorite;
                ActionOutcome::Updated
            }
            FileAction::Delete => {
                trash(file);
                ActionOutcome::Updated
            }
            FileAction::Restore => {
                restore(file);
                ActionOutcome::Updated
            }
            FileAction::Rename(name) => {
                let name = validate_name(&name)?;
                file.name = name;
                ActionOutcome::Updated
            }
            FileAction::Download => ActionOutcome::Effect(ActionEffect::download(file)),
            FileAction::Preview => ActionOutcome::Effect(ActionEffect::open(file)),
            FileAction::DeletePermanently => {
                let prompt = format!("Permanently delete {}?", file.name);
                if !confirm.confirm(&prompt) {
                    return Ok(ActionOutcome::Declined);
                }
                self.files.retain(|f| f.id != file_id);
                ActionOutcome::Removed
            }
        };

        debug!(file_id = file_id, outcome = ?outcome, "File action applied");
        Ok(outcome)
    }

    /// Apply an action to every file whose ID is in `selection`.
    ///
    /// IDs that match no file are ignored.
    pub fn apply_bulk(&mut self, selection: &HashSet<String>, action: BulkAction) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();
        if selection.is_empty() {
            return outcome;
        }

        match action {
            BulkAction::DeletePermanently => {
                let before = self.files.len();
                self.files.retain(|f| !selection.contains(&f.id));
                outcome.affected = before - self.files.len();
            }
            _ => {
                for file in self.files.iter_mut().filter(|f| selection.contains(&f.id)) {
                    match action {
                        BulkAction::Download => outcome.effects.push(ActionEffect::download(file)),
                        BulkAction::Delete => trash(file),
                        BulkAction::Restore => restore(file),
                        BulkAction::DeletePermanently => {}
                    }
                    outcome.affected += 1;
                }
            }
        }

        debug!(action = ?action, affected = outcome.affected, "Bulk action applied");
        outcome
    }

    /// Move a file into a folder, as done by a drop onto a folder target.
    ///
    /// Trashed files stay where they are; returns `false` in that case.
    pub fn move_file(&mut self, file_id: &str, folder_id: &str) -> Result<bool> {
        if self.folder(folder_id).is_none() {
            return Err(DriveError::NotFound("folder".to_string()));
        }

        let file = self.file_mut(file_id)?;
        if file.deleted {
            return Ok(false);
        }

        file.folder = Some(folder_id.to_string());
        debug!(file_id = file_id, folder_id = folder_id, "File moved");
        Ok(true)
    }

    /// Create a folder.
    pub fn add_folder(&mut self, name: &str, now: DateTime<Utc>) -> Result<&Folder> {
        let name = validate_name(name)?;

        let folder = Folder {
            id: generate_id(),
            name,
            parent_id: None,
            created_date: iso_date(&now),
            item_count: 0,
            color: Some(FolderColor::default()),
        };

        info!(folder_id = %folder.id, name = %folder.name, "Folder created");
        self.folders.push(folder);
        Ok(&self.folders[self.folders.len() - 1])
    }

    /// Delete a folder. Files inside it move to the root.
    ///
    /// Returns the number of files that were unfiled.
    pub fn delete_folder(&mut self, folder_id: &str) -> Result<usize> {
        let before = self.folders.len();
        self.folders.retain(|f| f.id != folder_id);
        if self.folders.len() == before {
            return Err(DriveError::NotFound("folder".to_string()));
        }

        let mut unfiled = 0;
        for file in self
            .files
            .iter_mut()
            .filter(|f| f.folder.as_deref() == Some(folder_id))
        {
            file.folder = None;
            unfiled += 1;
        }

        info!(folder_id = folder_id, unfiled = unfiled, "Folder deleted");
        Ok(unfiled)
    }

    /// Rename a folder.
    ///
    /// Blank names and names equal to the current one are ignored; returns
    /// whether the name changed.
    pub fn rename_folder(&mut self, folder_id: &str, name: &str) -> Result<bool> {
        let folder = self
            .folders
            .iter_mut()
            .find(|f| f.id == folder_id)
            .ok_or_else(|| DriveError::NotFound("folder".to_string()))?;

        let name = name.trim();
        if name.is_empty() || name == folder.name {
            return Ok(false);
        }

        folder.name = name.to_string();
        Ok(true)
    }

    /// Folders with `item_count` set to the number of non-deleted files
    /// they contain.
    pub fn folders_with_counts(&self) -> Vec<Folder> {
        self.folders
            .iter()
            .map(|folder| Folder {
                item_count: self
                    .files
                    .iter()
                    .filter(|f| !f.deleted && f.folder.as_deref() == Some(folder.id.as_str()))
                    .count(),
                ..folder.clone()
            })
            .collect()
    }
}

fn trash(file: &mut DriveFile) {
    file.deleted = true;
    file.folder = None;
}

fn restore(file: &mut DriveFile) {
    file.deleted = false;
    file.folder = None;
}
