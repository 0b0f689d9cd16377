//! File and folder records as they are persisted inside an account bundle.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Extensions recognised for each file kind, checked in this order.
const EXTENSION_MAP: &[(FileKind, &[&str])] = &[
    (FileKind::Pdf, &["pdf"]),
    (FileKind::Excel, &["xls", "xlsx"]),
    (
        FileKind::Image,
        &["jpg", "jpeg", "png", "gif", "webp", "svg"],
    ),
    (FileKind::Video, &["mp4", "avi", "mov", "mkv"]),
    (FileKind::Audio, &["mp3", "wav", "flac"]),
    (FileKind::Archive, &["zip", "rar", "7z"]),
    (FileKind::Document, &["doc", "docx", "txt"]),
];

/// File kind, inferred from the file name extension at upload time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Excel,
    Image,
    Document,
    Video,
    Audio,
    Archive,
    Other,
}

impl FileKind {
    /// Infer the kind from a file name.
    ///
    /// Only the text after the last `.` is considered, case-insensitively.
    /// A name without a dot is treated as if the whole name were the
    /// extension, so `pdf` is a PDF while `README` is [`FileKind::Other`].
    ///
    /// # Examples
    ///
    /// ```
    /// use clouddrive::drive::FileKind;
    ///
    /// assert_eq!(FileKind::from_name("report.PDF"), FileKind::Pdf);
    /// assert_eq!(FileKind::from_name("archive.tar.gz"), FileKind::Other);
    /// ```
    pub fn from_name(name: &str) -> Self {
        let ext = name.rsplit('.').next().unwrap_or_default().to_lowercase();
        if ext.is_empty() {
            return FileKind::Other;
        }

        EXTENSION_MAP
            .iter()
            .find(|(_, exts)| exts.contains(&ext.as_str()))
            .map(|(kind, _)| *kind)
            .unwrap_or(FileKind::Other)
    }

    /// Returns the persisted name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Excel => "excel",
            FileKind::Image => "image",
            FileKind::Document => "document",
            FileKind::Video => "video",
            FileKind::Audio => "audio",
            FileKind::Archive => "archive",
            FileKind::Other => "other",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access level the current user has on a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    View,
    Edit,
    Owner,
}

/// Folder color tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderColor {
    #[default]
    Blue,
    Green,
    Purple,
    Orange,
}

impl FolderColor {
    /// Returns the persisted name of this color.
    pub fn as_str(&self) -> &'static str {
        match self {
            FolderColor::Blue => "blue",
            FolderColor::Green => "green",
            FolderColor::Purple => "purple",
            FolderColor::Orange => "orange",
        }
    }
}

impl FromStr for FolderColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "blue" => Ok(FolderColor::Blue),
            "green" => Ok(FolderColor::Green),
            "purple" => Ok(FolderColor::Purple),
            "orange" => Ok(FolderColor::Orange),
            _ => Err(format!("unknown folder color: {s}")),
        }
    }
}

/// A file record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    /// Unique file ID.
    pub id: String,
    /// Display name, including extension.
    pub name: String,
    /// Kind inferred from the name at upload time.
    #[serde(rename = "type")]
    pub kind: FileKind,
    /// Human readable size, always `format_file_size(size_bytes)`.
    pub size: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Upload date (`YYYY-MM-DD`).
    pub upload_date: String,
    /// Short "day month" modified label.
    pub modified_date: String,
    /// Starred by the user.
    #[serde(default)]
    pub favorite: bool,
    /// In the trash.
    #[serde(default)]
    pub deleted: bool,
    /// Shared with other users.
    #[serde(default)]
    pub shared: bool,
    /// Object URL holding the content.
    pub url: String,
    /// Optional thumbnail URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// ID of the owning user.
    pub owner: String,
    /// Access level of the current user.
    pub permissions: Permission,
    /// Containing folder (None for the drive root). Always None while deleted.
    #[serde(default)]
    pub folder: Option<String>,
}

impl DriveFile {
    /// Check if the file sits in the given folder (None for root).
    pub fn is_in(&self, folder: Option<&str>) -> bool {
        self.folder.as_deref() == folder
    }
}

/// A folder record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Unique folder ID.
    pub id: String,
    /// Folder name.
    pub name: String,
    /// Parent folder ID (None for root folders).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Creation date (`YYYY-MM-DD`).
    pub created_date: String,
    /// Number of non-deleted files in the folder, derived on read.
    #[serde(default)]
    pub item_count: usize,
    /// Color tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<FolderColor>,
}

/// Payload carried by a drag-and-drop of a file onto a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragPayload {
    /// ID of the dragged file.
    pub file_id: String,
}

impl DragPayload {
    /// Create a payload for the given file.
    pub fn new(file_id: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
        }
    }

    /// Encode the payload for a transfer channel.
    pub fn encode(&self) -> String {
        serde_json::json!({ "fileId": self.file_id }).to_string()
    }

    /// Decode a payload received from a transfer channel.
    pub fn decode(data: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(data)?)
    }
}
