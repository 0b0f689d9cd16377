//! Closed action types for file and folder mutations.

use super::types::DriveFile;

/// An action on a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileAction {
    /// Toggle the favorite flag.
    Star,
    /// Move the file to the trash and unfile it.
    Delete,
    /// Remove the file record. Requires confirmation.
    DeletePermanently,
    /// Take the file out of the trash. It always lands in the root.
    Restore,
    /// Replace the file name.
    Rename(String),
    /// Hand the content URL to the host for download.
    Download,
    /// Hand the content URL to the host for viewing.
    Preview,
}

/// An action applied to every file in the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Download,
    Delete,
    Restore,
    DeletePermanently,
}

/// An action on a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderAction {
    /// Create a folder with the given name.
    Add(String),
    /// Delete a folder and unfile its contents.
    Delete(String),
    /// Rename a folder.
    Rename { id: String, name: String },
}

/// Work the host has to carry out on behalf of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionEffect {
    /// Save the content at `url` under `file_name`.
    Download {
        url: String,
        file_name: String,
        content_type: String,
    },
    /// Open the content at `url` in a new view.
    Open { url: String },
}

impl ActionEffect {
    /// Build a download effect for a file.
    pub fn download(file: &DriveFile) -> Self {
        let content_type = mime_guess::from_path(&file.name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        ActionEffect::Download {
            url: file.url.clone(),
            file_name: file.name.clone(),
            content_type,
        }
    }

    /// Build an open effect for a file.
    pub fn open(file: &DriveFile) -> Self {
        ActionEffect::Open {
            url: file.url.clone(),
        }
    }
}

/// Result of a single-file action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The file record was changed.
    Updated,
    /// The file record was removed.
    Removed,
    /// The user declined the confirmation; nothing changed.
    Declined,
    /// Nothing changed; the host has work to do.
    Effect(ActionEffect),
}

/// Result of a bulk action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    /// Number of files the action was applied to.
    pub affected: usize,
    /// Work for the host, one entry per file, in list order.
    pub effects: Vec<ActionEffect>,
}

/// Asks the user to confirm an irreversible action.
pub trait Confirm {
    /// Returns `true` if the user agrees to `prompt`.
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// A [`Confirm`] that agrees to everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}
