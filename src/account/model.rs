//! Account records as persisted in the key-value store.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::drive::{Drive, DriveFile, Folder};

/// Base URL of the generated initials avatars.
const AVATAR_BASE_URL: &str = "https://api.dicebear.com/7.x/initials/svg";

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address, also the bundle key.
    pub email: String,
    /// Avatar image URL, derived from the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Registration time (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_date: Option<String>,
}

impl User {
    /// Set the name and the avatar derived from it.
    pub fn rename(&mut self, name: &str) {
        self.name = name.to_string();
        self.avatar = Some(avatar_url(name));
    }
}

/// Everything stored under an account's email key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    /// Profile of the account owner.
    pub user: User,
    /// Files of the account.
    #[serde(default)]
    pub files: Vec<DriveFile>,
    /// Folders of the account.
    #[serde(default)]
    pub folders: Vec<Folder>,
}

impl Bundle {
    /// Create an empty bundle for a new user.
    pub fn new(user: User) -> Self {
        Self {
            user,
            files: Vec::new(),
            folders: Vec::new(),
        }
    }

    /// Create a bundle holding a snapshot of a drive.
    pub fn with_drive(user: User, drive: &Drive) -> Self {
        Self {
            user,
            files: drive.files().to_vec(),
            folders: drive.folders().to_vec(),
        }
    }

    /// Split the bundle into the user and a drive registry.
    pub fn into_parts(self) -> (User, Drive) {
        (self.user, Drive::new(self.files, self.folders))
    }
}

/// Build the initials avatar URL for a name.
///
/// # Examples
///
/// ```
/// use clouddrive::account::avatar_url;
///
/// assert_eq!(
///     avatar_url("Ada Lovelace"),
///     "https://api.dicebear.com/7.x/initials/svg?seed=Ada+Lovelace"
/// );
/// ```
pub fn avatar_url(name: &str) -> String {
    match Url::parse_with_params(AVATAR_BASE_URL, &[("seed", name)]) {
        Ok(url) => url.to_string(),
        Err(_) => AVATAR_BASE_URL.to_string(),
    }
}
