//! E2E drive tests for clouddrive.
//!
//! Tests uploads, file and folder actions, and view composition through a
//! signed-in session.

mod common;

use common::{file_session, memory_session, register};
use clouddrive::{
    compose, ActionEffect, ActionOutcome, AlwaysConfirm, BulkAction, DragPayload, FileAction,
    FileKind, SortKey, UploadRequest, View, ViewQuery,
};
use clouddrive::{DriveSession, KeyValueStore};
use tempfile::TempDir;

fn names<S: KeyValueStore>(session: &DriveSession<S>) -> Vec<String> {
    session
        .visible_files()
        .iter()
        .map(|f| f.name.clone())
        .collect()
}

/// Test the kind and size label of an upload.
#[tokio::test]
async fn test_upload_infers_kind_and_size() {
    let (mut session, _store) = memory_session();
    register(&mut session, "Ada", "ada@example.com").await;

    let added = session
        .upload(&[UploadRequest::new("report.pdf", 2_097_152)])
        .unwrap();

    assert_eq!(added[0].kind, FileKind::Pdf);
    assert_eq!(added[0].size, "2 MB");
    assert!(!added[0].deleted);
    assert!(added[0].folder.is_none());
}

/// Test that starring twice restores the original record.
#[tokio::test]
async fn test_star_twice() {
    let (mut session, _store) = memory_session();
    register(&mut session, "Ada", "ada@example.com").await;
    let file = session
        .upload(&[UploadRequest::new("a.txt", 1)])
        .unwrap()
        .remove(0);

    session
        .file_action(&file.id, FileAction::Star, &AlwaysConfirm)
        .unwrap();
    session.set_view(View::Starred);
    assert_eq!(session.visible_files().len(), 1);

    session
        .file_action(&file.id, FileAction::Star, &AlwaysConfirm)
        .unwrap();
    assert!(session.visible_files().is_empty());
    assert_eq!(session.drive().file(&file.id), Some(&file));
}

/// Test trash and restore of a filed document.
#[tokio::test]
async fn test_trash_and_restore() {
    let (mut session, _store) = memory_session();
    register(&mut session, "Ada", "ada@example.com").await;
    let folder = session.add_folder("Docs").unwrap();
    session.open_folder(Some(folder.id.as_str()));
    let file = session
        .upload(&[UploadRequest::new("a.txt", 1)])
        .unwrap()
        .remove(0);

    session
        .file_action(&file.id, FileAction::Delete, &AlwaysConfirm)
        .unwrap();
    let trashed = session.drive().file(&file.id).unwrap();
    assert!(trashed.deleted);
    assert!(trashed.folder.is_none());
    assert!(session.visible_files().is_empty());

    session
        .file_action(&file.id, FileAction::Restore, &AlwaysConfirm)
        .unwrap();
    let restored = session.drive().file(&file.id).unwrap();
    assert!(!restored.deleted);
    // Restored files land in the root, not the folder they came from
    assert!(restored.folder.is_none());
    session.open_folder(None);
    assert_eq!(session.visible_files().len(), 1);
}

/// Test permanent deletion with and without confirmation.
#[tokio::test]
async fn test_delete_permanently() {
    let (mut session, _store) = memory_session();
    register(&mut session, "Ada", "ada@example.com").await;
    let file = session
        .upload(&[UploadRequest::new("a.txt", 1)])
        .unwrap()
        .remove(0);

    let prompts = std::cell::RefCell::new(Vec::new());
    let decline = |prompt: &str| {
        prompts.borrow_mut().push(prompt.to_string());
        false
    };
    let outcome = session
        .file_action(&file.id, FileAction::DeletePermanently, &decline)
        .unwrap();
    assert_eq!(outcome, ActionOutcome::Declined);
    assert_eq!(prompts.borrow().len(), 1);
    assert!(prompts.borrow()[0].contains("a.txt"));

    let outcome = session
        .file_action(&file.id, FileAction::DeletePermanently, &AlwaysConfirm)
        .unwrap();
    assert_eq!(outcome, ActionOutcome::Removed);
    assert!(session.drive().file(&file.id).is_none());
}

/// Test that download hands an effect to the host and changes nothing.
#[tokio::test]
async fn test_download_effect() {
    let (mut session, _store) = memory_session();
    register(&mut session, "Ada", "ada@example.com").await;
    let file = session
        .upload(&[UploadRequest::new("photo.png", 1)])
        .unwrap()
        .remove(0);
    let before = session.drive().clone();

    let outcome = session
        .file_action(&file.id, FileAction::Download, &AlwaysConfirm)
        .unwrap();

    assert_eq!(
        outcome,
        ActionOutcome::Effect(ActionEffect::Download {
            url: file.url.clone(),
            file_name: "photo.png".to_string(),
            content_type: "image/png".to_string(),
        })
    );
    assert_eq!(session.drive(), &before);
}

/// Test bulk permanent deletion of the selection.
#[tokio::test]
async fn test_bulk_delete_permanently() {
    let (mut session, _store) = memory_session();
    register(&mut session, "Ada", "ada@example.com").await;
    let files = session
        .upload(&[
            UploadRequest::new("a.txt", 1),
            UploadRequest::new("b.txt", 2),
            UploadRequest::new("c.txt", 3),
        ])
        .unwrap();

    session.toggle_select(&files[0].id);
    session.toggle_select(&files[2].id);
    let outcome = session.bulk_action(BulkAction::DeletePermanently).unwrap();

    assert_eq!(outcome.affected, 2);
    assert!(session.selection().is_empty());
    let names: Vec<&str> = session
        .drive()
        .files()
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, vec!["b.txt"]);
}

/// Test that deleting a folder unfiles its contents.
#[tokio::test]
async fn test_folder_delete_unfiles_contents() {
    let (mut session, _store) = memory_session();
    register(&mut session, "Ada", "ada@example.com").await;
    let docs = session.add_folder("Docs").unwrap();
    let pics = session.add_folder("Pictures").unwrap();

    session.open_folder(Some(docs.id.as_str()));
    session
        .upload(&[UploadRequest::new("a.txt", 1), UploadRequest::new("b.txt", 1)])
        .unwrap();
    session.open_folder(Some(pics.id.as_str()));
    session.upload(&[UploadRequest::new("c.png", 1)]).unwrap();

    assert_eq!(session.delete_folder(&docs.id).unwrap(), 2);

    assert!(session.drive().folder(&docs.id).is_none());
    assert!(session
        .drive()
        .files()
        .iter()
        .all(|f| f.folder.as_deref() != Some(docs.id.as_str())));
    // The open folder was not the deleted one
    assert_eq!(session.query().folder.as_deref(), Some(pics.id.as_str()));

    session.open_folder(None);
    assert_eq!(session.visible_files().len(), 2);
}

/// Test moving a file by dropping its drag payload on a folder.
#[tokio::test]
async fn test_drag_and_drop_move() {
    let (mut session, _store) = memory_session();
    register(&mut session, "Ada", "ada@example.com").await;
    let file = session
        .upload(&[UploadRequest::new("a.txt", 1)])
        .unwrap()
        .remove(0);
    let folder = session.add_folder("Docs").unwrap();

    let payload = DragPayload::new(file.id.clone()).encode();
    assert!(session.drop_on_folder(&folder.id, &payload).unwrap());

    assert!(session.visible_files().is_empty());
    assert_eq!(session.folders()[0].item_count, 1);
}

/// Test search and sort over the root listing.
#[tokio::test]
async fn test_search_and_sort() {
    let (mut session, _store) = memory_session();
    register(&mut session, "Ada", "ada@example.com").await;
    session
        .upload(&[
            UploadRequest::new("Budget.xlsx", 300),
            UploadRequest::new("avatar.png", 100),
            UploadRequest::new("Notes.txt", 200),
        ])
        .unwrap();

    assert_eq!(names(&session), vec!["avatar.png", "Budget.xlsx", "Notes.txt"]);

    session.set_sort(SortKey::Size);
    assert_eq!(names(&session), vec!["Budget.xlsx", "Notes.txt", "avatar.png"]);

    session.set_search("NOTE");
    assert_eq!(names(&session), vec!["Notes.txt"]);
}

/// Test that composing a listing twice gives the same result.
#[tokio::test]
async fn test_view_composition_is_idempotent() {
    let (mut session, _store) = memory_session();
    register(&mut session, "Ada", "ada@example.com").await;
    session
        .upload(&[
            UploadRequest::new("b.txt", 1),
            UploadRequest::new("a.txt", 2),
            UploadRequest::new("c.txt", 3),
        ])
        .unwrap();

    for view in [View::MyDrive, View::Recent, View::Starred, View::Trash] {
        let query = ViewQuery::new(view).sort(SortKey::Name);
        let first = compose(session.drive().files(), &query);
        let second = compose(session.drive().files(), &query);
        assert_eq!(first, second);
    }
}

/// Test that the drive survives a restart on the file store.
#[tokio::test]
async fn test_file_store_persistence() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("local_storage.json");

    let mut session = file_session(&path);
    register(&mut session, "Ada", "ada@example.com").await;
    let folder = session.add_folder("Docs").unwrap();
    session.open_folder(Some(folder.id.as_str()));
    session
        .upload(&[UploadRequest::new("report.pdf", 2_097_152)])
        .unwrap();
    let drive = session.drive().clone();
    drop(session);

    let mut restored = file_session(&path);
    assert!(restored.bootstrap().unwrap());
    assert_eq!(restored.drive(), &drive);
    assert_eq!(restored.folders()[0].item_count, 1);
}
