//! Session state of the file manager.
//!
//! [`DriveSession`] holds what the UI shows: the signed-in user, the drive,
//! the navigation state and the selection. Every mutation of the drive is
//! mirrored back into the store as the user's bundle.

use std::collections::{BTreeMap, HashSet};

use chrono::Utc;
use tracing::{debug, info};

use crate::account::{AccountError, AccountService, Bundle, RegistrationRequest, User};
use crate::config::Config;
use crate::drive::{
    compose, kind_stats, ActionOutcome, BulkAction, BulkOutcome, Confirm, DragPayload, Drive,
    DriveFile, FileAction, FileKind, Folder, FolderAction, KindStat, SortKey, StorageUsage,
    UploadContext, UploadRequest, View, ViewQuery,
};
use crate::store::KeyValueStore;
use crate::Result;

/// A file manager session over a key-value store.
pub struct DriveSession<S> {
    accounts: AccountService<S>,
    user: Option<User>,
    drive: Drive,
    query: ViewQuery,
    selection: HashSet<String>,
    timezone: String,
    quota_gb: f64,
}

impl<S: KeyValueStore> DriveSession<S> {
    /// Create a signed-out session.
    pub fn new(store: S, config: &Config) -> Self {
        Self {
            accounts: AccountService::new(store, &config.auth),
            user: None,
            drive: Drive::default(),
            query: ViewQuery::default().recent_limit(config.drive.recent_limit),
            selection: HashSet::new(),
            timezone: config.drive.timezone.clone(),
            quota_gb: config.drive.storage_quota_gb,
        }
    }

    /// Get the account service.
    pub fn accounts(&self) -> &AccountService<S> {
        &self.accounts
    }

    /// Pick up the account recorded as signed in, if any.
    ///
    /// Returns whether a session was restored.
    pub fn bootstrap(&mut self) -> Result<bool> {
        match self.accounts.restore_session()? {
            Some(bundle) => {
                self.enter(bundle);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// The signed-in user.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Check if an account is signed in.
    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// The drive of the signed-in user.
    pub fn drive(&self) -> &Drive {
        &self.drive
    }

    /// The current navigation state.
    pub fn query(&self) -> &ViewQuery {
        &self.query
    }

    // ========== Account ==========

    /// Sign in and load the account's drive.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<()> {
        let bundle = self.accounts.login(email, password).await?;
        self.enter(bundle);
        Ok(())
    }

    /// Register a new account and sign it in.
    pub async fn register(&mut self, request: RegistrationRequest) -> Result<()> {
        let bundle = self.accounts.register(request).await?;
        self.enter(bundle);
        Ok(())
    }

    /// Sign out and forget all in-memory state.
    pub async fn logout(&mut self) -> Result<()> {
        self.accounts.logout().await?;
        self.leave();
        Ok(())
    }

    /// Change the display name of the signed-in user.
    pub async fn update_name(&mut self, name: &str) -> Result<()> {
        let email = self.signed_in()?.email.clone();
        let user = self.accounts.update_name(&email, name).await?;
        self.user = Some(user);
        Ok(())
    }

    /// Move the signed-in account to a new email.
    pub async fn update_email(&mut self, new_email: &str) -> Result<()> {
        let email = self.signed_in()?.email.clone();
        let user = self.accounts.update_email(&email, new_email).await?;
        self.user = Some(user);
        Ok(())
    }

    /// Change the password of the signed-in account.
    pub async fn change_password(&mut self, current: &str, new: &str) -> Result<()> {
        let email = self.signed_in()?.email.clone();
        self.accounts.change_password(&email, current, new).await?;
        Ok(())
    }

    /// Delete the signed-in account and sign out.
    pub async fn delete_account(&mut self) -> Result<()> {
        let email = self.signed_in()?.email.clone();
        self.accounts.delete_account(&email).await?;
        self.leave();
        Ok(())
    }

    /// Get the dark mode preference.
    pub fn dark_mode(&self) -> Result<bool> {
        Ok(self.accounts.dark_mode()?)
    }

    /// Store the dark mode preference.
    pub fn set_dark_mode(&self, enabled: bool) -> Result<()> {
        Ok(self.accounts.set_dark_mode(enabled)?)
    }

    /// Flip the dark mode preference and return the new value.
    pub fn toggle_dark_mode(&self) -> Result<bool> {
        let enabled = !self.dark_mode()?;
        self.set_dark_mode(enabled)?;
        Ok(enabled)
    }

    // ========== Navigation ==========

    /// Switch the listing mode.
    pub fn set_view(&mut self, view: View) {
        self.query.view = view;
    }

    /// Open a folder, or the root with `None`.
    pub fn open_folder(&mut self, folder_id: Option<&str>) {
        self.query.folder = folder_id.map(str::to_string);
    }

    /// Set the search string.
    pub fn set_search(&mut self, search: &str) {
        self.query.search = search.to_string();
    }

    /// Set the sort key.
    pub fn set_sort(&mut self, sort: SortKey) {
        self.query.sort = sort;
    }

    /// Files shown for the current navigation state.
    pub fn visible_files(&self) -> Vec<&DriveFile> {
        compose(self.drive.files(), &self.query)
    }

    // ========== Selection ==========

    /// IDs of the selected files.
    pub fn selection(&self) -> &HashSet<String> {
        &self.selection
    }

    /// Add a file to the selection, or remove it if already selected.
    ///
    /// Returns whether the file is selected afterwards.
    pub fn toggle_select(&mut self, file_id: &str) -> bool {
        if self.selection.remove(file_id) {
            false
        } else {
            self.selection.insert(file_id.to_string());
            true
        }
    }

    /// Select every visible file.
    pub fn select_all(&mut self) {
        self.selection = self
            .visible_files()
            .into_iter()
            .map(|f| f.id.clone())
            .collect();
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ========== Files ==========

    /// Upload files into the active folder.
    pub fn upload(&mut self, requests: &[UploadRequest]) -> Result<Vec<DriveFile>> {
        let owner = self.signed_in()?.id.clone();
        let ctx = UploadContext {
            owner: &owner,
            folder: self.query.folder.as_deref(),
            now: Utc::now(),
            timezone: &self.timezone,
        };

        let added = self.drive.upload(requests, &ctx);
        self.persist()?;
        Ok(added)
    }

    /// Apply an action to one file.
    pub fn file_action(
        &mut self,
        file_id: &str,
        action: FileAction,
        confirm: &dyn Confirm,
    ) -> Result<ActionOutcome> {
        self.signed_in()?;
        let outcome = self.drive.apply(file_id, action, confirm)?;

        if matches!(outcome, ActionOutcome::Updated | ActionOutcome::Removed) {
            if outcome == ActionOutcome::Removed {
                self.selection.remove(file_id);
            }
            self.persist()?;
        }
        Ok(outcome)
    }

    /// Apply an action to the selection, then clear it.
    pub fn bulk_action(&mut self, action: BulkAction) -> Result<BulkOutcome> {
        self.signed_in()?;
        if self.selection.is_empty() {
            return Ok(BulkOutcome::default());
        }

        let outcome = self.drive.apply_bulk(&self.selection, action);
        self.selection.clear();
        if action != BulkAction::Download {
            self.persist()?;
        }
        Ok(outcome)
    }

    /// Handle a drag payload dropped onto a folder.
    ///
    /// Returns whether the file moved.
    pub fn drop_on_folder(&mut self, folder_id: &str, payload: &str) -> Result<bool> {
        self.signed_in()?;
        let payload = DragPayload::decode(payload)?;

        let moved = self.drive.move_file(&payload.file_id, folder_id)?;
        if moved {
            self.persist()?;
        }
        Ok(moved)
    }

    // ========== Folders ==========

    /// Folders with live item counts.
    pub fn folders(&self) -> Vec<Folder> {
        self.drive.folders_with_counts()
    }

    /// Create a folder.
    pub fn add_folder(&mut self, name: &str) -> Result<Folder> {
        self.signed_in()?;
        let folder = self.drive.add_folder(name, Utc::now())?.clone();
        self.persist()?;
        Ok(folder)
    }

    /// Delete a folder, unfiling its files. Leaves the folder if it was open.
    pub fn delete_folder(&mut self, folder_id: &str) -> Result<usize> {
        self.signed_in()?;
        let unfiled = self.drive.delete_folder(folder_id)?;

        if self.query.folder.as_deref() == Some(folder_id) {
            self.query.folder = None;
        }
        self.persist()?;
        Ok(unfiled)
    }

    /// Rename a folder. Returns whether the name changed.
    pub fn rename_folder(&mut self, folder_id: &str, name: &str) -> Result<bool> {
        self.signed_in()?;
        let renamed = self.drive.rename_folder(folder_id, name)?;
        if renamed {
            self.persist()?;
        }
        Ok(renamed)
    }

    /// Apply a folder action.
    pub fn folder_action(&mut self, action: FolderAction) -> Result<()> {
        match action {
            FolderAction::Add(name) => self.add_folder(&name).map(|_| ()),
            FolderAction::Delete(id) => self.delete_folder(&id).map(|_| ()),
            FolderAction::Rename { id, name } => self.rename_folder(&id, &name).map(|_| ()),
        }
    }

    // ========== Statistics ==========

    /// Storage used by non-deleted files.
    pub fn storage_usage(&self) -> StorageUsage {
        StorageUsage::of(self.drive.files(), self.quota_gb)
    }

    /// Count and size of non-deleted files per kind.
    pub fn kind_stats(&self) -> BTreeMap<FileKind, KindStat> {
        kind_stats(self.drive.files())
    }

    fn signed_in(&self) -> Result<&User> {
        self.user
            .as_ref()
            .ok_or_else(|| AccountError::NotSignedIn.into())
    }

    fn enter(&mut self, bundle: Bundle) {
        let (user, drive) = bundle.into_parts();
        info!(
            email = %user.email,
            files = drive.files().len(),
            folders = drive.folders().len(),
            "Session started"
        );

        self.user = Some(user);
        self.drive = drive;
        self.selection.clear();
        self.query = ViewQuery::default().recent_limit(self.query.recent_limit);
    }

    fn leave(&mut self) {
        self.user = None;
        self.drive = Drive::default();
        self.selection.clear();
        self.query = ViewQuery::default().recent_limit(self.query.recent_limit);
    }

    fn persist(&self) -> Result<()> {
        if let Some(user) = &self.user {
            self.accounts.save_drive(user, &self.drive)?;
            debug!(email = %user.email, files = self.drive.files().len(), "Bundle saved");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::{AlwaysConfirm, View};
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn config() -> Config {
        let mut config = Config::default();
        config.auth.latency_ms = 0;
        config.drive.timezone = "UTC".to_string();
        config
    }

    async fn signed_in() -> (DriveSession<Arc<MemoryStore>>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let mut session = DriveSession::new(Arc::clone(&store), &config());
        session
            .register(RegistrationRequest::new("Ada", "ada@example.com", "secret1"))
            .await
            .unwrap();
        (session, store)
    }

    fn stored_bundle(store: &MemoryStore, email: &str) -> Bundle {
        let raw = store.get(email).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[tokio::test]
    async fn test_signed_out_session_rejects_mutations() {
        let mut session = DriveSession::new(MemoryStore::new(), &config());

        assert!(!session.bootstrap().unwrap());
        let result = session.upload(&[UploadRequest::new("a.txt", 1)]);
        assert!(matches!(
            result,
            Err(crate::DriveError::Account(AccountError::NotSignedIn))
        ));
        assert!(session.add_folder("Docs").is_err());
    }

    #[tokio::test]
    async fn test_upload_is_mirrored_to_store() {
        let (mut session, store) = signed_in().await;

        let added = session
            .upload(&[UploadRequest::new("report.pdf", 2_097_152)])
            .unwrap();
        assert_eq!(added[0].kind, FileKind::Pdf);
        assert_eq!(added[0].size, "2 MB");
        assert_eq!(added[0].owner, session.user().unwrap().id);

        let bundle = stored_bundle(&store, "ada@example.com");
        assert_eq!(bundle.files, added);
    }

    #[tokio::test]
    async fn test_upload_into_active_folder() {
        let (mut session, _store) = signed_in().await;
        let folder = session.add_folder("Docs").unwrap();

        session.open_folder(Some(folder.id.as_str()));
        let added = session.upload(&[UploadRequest::new("a.txt", 10)]).unwrap();

        assert_eq!(added[0].folder.as_deref(), Some(folder.id.as_str()));
        assert_eq!(session.visible_files().len(), 1);
        assert_eq!(session.folders()[0].item_count, 1);
    }

    #[tokio::test]
    async fn test_bootstrap_restores_drive() {
        let (mut session, store) = signed_in().await;
        session.upload(&[UploadRequest::new("a.txt", 10)]).unwrap();

        let mut restored = DriveSession::new(Arc::clone(&store), &config());
        assert!(restored.bootstrap().unwrap());
        assert_eq!(restored.user(), session.user());
        assert_eq!(restored.drive(), session.drive());
    }

    #[tokio::test]
    async fn test_file_action_star_twice() {
        let (mut session, store) = signed_in().await;
        let file = session.upload(&[UploadRequest::new("a.txt", 10)]).unwrap()[0].clone();

        session
            .file_action(&file.id, FileAction::Star, &AlwaysConfirm)
            .unwrap();
        assert!(stored_bundle(&store, "ada@example.com").files[0].favorite);

        session
            .file_action(&file.id, FileAction::Star, &AlwaysConfirm)
            .unwrap();
        assert_eq!(session.drive().file(&file.id), Some(&file));
    }

    #[tokio::test]
    async fn test_declined_permanent_delete_keeps_file() {
        let (mut session, _store) = signed_in().await;
        let file = session.upload(&[UploadRequest::new("a.txt", 10)]).unwrap()[0].clone();

        let decline = |_: &str| false;
        let outcome = session
            .file_action(&file.id, FileAction::DeletePermanently, &decline)
            .unwrap();

        assert_eq!(outcome, ActionOutcome::Declined);
        assert!(session.drive().file(&file.id).is_some());
    }

    #[tokio::test]
    async fn test_bulk_action_clears_selection() {
        let (mut session, store) = signed_in().await;
        session
            .upload(&[UploadRequest::new("a.txt", 10), UploadRequest::new("b.txt", 20)])
            .unwrap();

        session.select_all();
        assert_eq!(session.selection().len(), 2);

        let outcome = session.bulk_action(BulkAction::Delete).unwrap();
        assert_eq!(outcome.affected, 2);
        assert!(session.selection().is_empty());
        assert!(session.visible_files().is_empty());

        session.set_view(View::Trash);
        assert_eq!(session.visible_files().len(), 2);
        assert!(stored_bundle(&store, "ada@example.com")
            .files
            .iter()
            .all(|f| f.deleted));
    }

    #[tokio::test]
    async fn test_bulk_action_empty_selection() {
        let (mut session, _store) = signed_in().await;
        session.upload(&[UploadRequest::new("a.txt", 10)]).unwrap();

        let outcome = session.bulk_action(BulkAction::DeletePermanently).unwrap();
        assert_eq!(outcome, BulkOutcome::default());
        assert_eq!(session.drive().files().len(), 1);
    }

    #[tokio::test]
    async fn test_toggle_select() {
        let (mut session, _store) = signed_in().await;
        assert!(session.toggle_select("f1"));
        assert!(!session.toggle_select("f1"));
        assert!(session.selection().is_empty());
    }

    #[tokio::test]
    async fn test_delete_open_folder_returns_to_root() {
        let (mut session, store) = signed_in().await;
        let folder = session.add_folder("Docs").unwrap();
        session.open_folder(Some(folder.id.as_str()));
        session.upload(&[UploadRequest::new("a.txt", 10)]).unwrap();

        let unfiled = session.delete_folder(&folder.id).unwrap();

        assert_eq!(unfiled, 1);
        assert!(session.query().folder.is_none());
        assert_eq!(session.visible_files().len(), 1);
        let bundle = stored_bundle(&store, "ada@example.com");
        assert!(bundle.folders.is_empty());
        assert!(bundle.files[0].folder.is_none());
    }

    #[tokio::test]
    async fn test_folder_actions() {
        let (mut session, _store) = signed_in().await;
        session
            .folder_action(FolderAction::Add("Docs".to_string()))
            .unwrap();
        let id = session.folders()[0].id.clone();

        session
            .folder_action(FolderAction::Rename {
                id: id.clone(),
                name: "Papers".to_string(),
            })
            .unwrap();
        assert_eq!(session.folders()[0].name, "Papers");

        session.folder_action(FolderAction::Delete(id)).unwrap();
        assert!(session.folders().is_empty());
    }

    #[tokio::test]
    async fn test_drop_on_folder() {
        let (mut session, _store) = signed_in().await;
        let file = session.upload(&[UploadRequest::new("a.txt", 10)]).unwrap()[0].clone();
        let folder = session.add_folder("Docs").unwrap();

        let payload = DragPayload::new(&file.id).encode();
        assert!(session.drop_on_folder(&folder.id, &payload).unwrap());
        assert_eq!(
            session.drive().file(&file.id).unwrap().folder.as_deref(),
            Some(folder.id.as_str())
        );

        assert!(session.drop_on_folder(&folder.id, "not json").is_err());
    }

    #[tokio::test]
    async fn test_update_name_and_email() {
        let (mut session, store) = signed_in().await;
        session.upload(&[UploadRequest::new("a.txt", 10)]).unwrap();

        session.update_name("Ada Lovelace").await.unwrap();
        session.update_email("lovelace@example.com").await.unwrap();

        let user = session.user().unwrap();
        assert_eq!(user.name, "Ada Lovelace");
        assert_eq!(user.email, "lovelace@example.com");
        let bundle = stored_bundle(&store, "lovelace@example.com");
        assert_eq!(bundle.files.len(), 1);
        assert!(!store.contains("ada@example.com").unwrap());
    }

    #[tokio::test]
    async fn test_logout_resets_state() {
        let (mut session, _store) = signed_in().await;
        session.set_view(View::Starred);
        session.set_search("a");

        session.logout().await.unwrap();

        assert!(!session.is_signed_in());
        assert!(session.drive().files().is_empty());
        assert_eq!(session.query().view, View::MyDrive);
        assert!(session.query().search.is_empty());
        assert_eq!(session.query().recent_limit, 10);
    }

    #[tokio::test]
    async fn test_delete_account() {
        let (mut session, store) = signed_in().await;
        session.delete_account().await.unwrap();

        assert!(!session.is_signed_in());
        assert!(!store.contains("ada@example.com").unwrap());
        assert!(session.delete_account().await.is_err());
    }

    #[tokio::test]
    async fn test_storage_statistics() {
        let (mut session, _store) = signed_in().await;
        let files = session
            .upload(&[
                UploadRequest::new("a.pdf", 1024),
                UploadRequest::new("b.pdf", 2048),
                UploadRequest::new("c.png", 4096),
            ])
            .unwrap();
        session
            .file_action(&files[2].id, FileAction::Delete, &AlwaysConfirm)
            .unwrap();

        assert_eq!(session.storage_usage().used_bytes, 3072);
        let stats = session.kind_stats();
        assert_eq!(stats[&FileKind::Pdf].count, 2);
        assert!(!stats.contains_key(&FileKind::Image));
    }

    #[test]
    fn test_toggle_dark_mode() {
        let session = DriveSession::new(MemoryStore::new(), &config());
        assert!(session.toggle_dark_mode().unwrap());
        assert!(session.dark_mode().unwrap());
        assert!(!session.toggle_dark_mode().unwrap());
    }
}
