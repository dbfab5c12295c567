//! Document-store persistence for taskdeck.
//!
//! Each task is a single JSON document at `<data_dir>/<task-id>.json`.
//! Writes go through a temp file followed by an atomic rename, so a task
//! document is always either the old or the new version on disk. A store-wide
//! write lock serializes read-modify-write cycles; reads take no lock.

mod error;

pub use error::StoreError;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use taskdeck_core::{Task, TaskDraft, TaskId, TaskPatch};
use tempfile::NamedTempFile;
use tracing::{debug, info};

const DOC_EXTENSION: &str = "json";

/// Filesystem-backed task store, one JSON document per task.
#[derive(Debug)]
pub struct JsonStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonStore {
    /// Open (creating if needed) a store rooted at `dir`.
    ///
    /// # Errors
    /// Returns an error when the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        debug!(dir = %dir.display(), "opened task store");
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    /// Directory holding the task documents.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn doc_path(&self, id: TaskId) -> PathBuf {
        self.dir.join(format!("{id}.{DOC_EXTENSION}"))
    }

    fn read_doc(&self, id: TaskId) -> Result<Task, StoreError> {
        let path = self.doc_path(id);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id));
            }
            Err(err) => return Err(err.into()),
        };
        serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
            path: path.display().to_string(),
            source,
        })
    }

    fn write_doc(&self, task: &Task) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(task)
            .map_err(|source| StoreError::Encode(task.id, source))?;
        // Temp file in the same directory so the rename stays on one filesystem.
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&body)?;
        tmp.flush()?;
        tmp.persist(self.doc_path(task.id))
            .map_err(|err| StoreError::Io(err.error))?;
        Ok(())
    }

    /// List every task, newest-created first.
    ///
    /// # Errors
    /// Returns an error when the directory cannot be read or a document fails
    /// to decode.
    pub fn list(&self) -> Result<Vec<Task>, StoreError> {
        let mut tasks = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(DOC_EXTENSION) {
                continue;
            }
            let contents = fs::read_to_string(&path)?;
            let task: Task =
                serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
                    path: path.display().to_string(),
                    source,
                })?;
            tasks.push(task);
        }
        tasks.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(tasks)
    }

    /// Load a single task by identifier.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] when no document exists for `id`.
    pub fn get(&self, id: TaskId) -> Result<Task, StoreError> {
        self.read_doc(id)
    }

    /// Create a task from a draft, assigning identifier and creation timestamp.
    ///
    /// # Errors
    /// Returns a validation error when the draft text is blank, or an I/O
    /// error when the document cannot be written.
    pub fn insert(&self, draft: TaskDraft) -> Result<Task, StoreError> {
        let task = Task::from_draft(draft)?;
        let _guard = self.guard();
        self.write_doc(&task)?;
        info!(task = %task.id, "created task");
        Ok(task)
    }

    /// Apply a partial update to an existing task and return the new version.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] for an unknown identifier and a
    /// validation error when the patch would blank the task text.
    pub fn update(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, StoreError> {
        let _guard = self.guard();
        let mut task = self.read_doc(id)?;
        patch.apply(&mut task)?;
        self.write_doc(&task)?;
        debug!(task = %id, "updated task");
        Ok(task)
    }

    /// Delete a task document.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] when no document exists for `id`,
    /// including the second of two deletes for the same identifier.
    pub fn delete(&self, id: TaskId) -> Result<(), StoreError> {
        let _guard = self.guard();
        match fs::remove_file(self.doc_path(id)) {
            Ok(()) => {
                info!(task = %id, "deleted task");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(id))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdeck_core::Priority;
    use time::macros::date;

    fn store() -> (tempfile::TempDir, JsonStore) {
        let dir = tempfile::tempdir().unwrap_or_else(|err| panic!("tempdir: {err}"));
        let store = JsonStore::open(dir.path()).unwrap_or_else(|err| panic!("open store: {err}"));
        (dir, store)
    }

    fn insert(store: &JsonStore, text: &str) -> Task {
        store
            .insert(TaskDraft::with_text(text))
            .unwrap_or_else(|err| panic!("insert must succeed: {err}"))
    }

    #[test]
    fn insert_then_list_roundtrips_fields() {
        let (_dir, store) = store();
        let created = store
            .insert(TaskDraft {
                text: "Buy milk".into(),
                due_date: Some(date!(2025 - 08 - 14)),
                priority: Some(Priority::High),
                category: Some("Shopping".into()),
            })
            .unwrap_or_else(|err| panic!("insert must succeed: {err}"));

        let listed = store.list().unwrap_or_else(|err| panic!("list must succeed: {err}"));
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], created);
        assert_eq!(listed[0].text, "Buy milk");
        assert_eq!(listed[0].due_date, Some(date!(2025 - 08 - 14)));
        assert!(!listed[0].completed);
    }

    #[test]
    fn list_orders_newest_created_first() {
        let (_dir, store) = store();
        let first = insert(&store, "first");
        let second = insert(&store, "second");
        let third = insert(&store, "third");

        let listed = store.list().unwrap_or_else(|err| panic!("list must succeed: {err}"));
        let ids: Vec<_> = listed.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);
    }

    #[test]
    fn insert_rejects_blank_text() {
        let (_dir, store) = store();
        let err = store
            .insert(TaskDraft::with_text("   "))
            .err()
            .unwrap_or_else(|| panic!("blank text must be rejected"));
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn update_patches_fields_and_persists() {
        let (_dir, store) = store();
        let task = insert(&store, "original");

        let updated = store
            .update(task.id, &TaskPatch::completion(true))
            .unwrap_or_else(|err| panic!("update must succeed: {err}"));
        assert!(updated.completed);
        assert_eq!(updated.text, "original");
        assert_eq!(updated.created_at, task.created_at);

        let reread = store.get(task.id).unwrap_or_else(|err| panic!("get: {err}"));
        assert!(reread.completed);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let (_dir, store) = store();
        let err = store
            .update(TaskId::new(), &TaskPatch::completion(true))
            .err()
            .unwrap_or_else(|| panic!("unknown id must fail"));
        assert!(err.is_not_found());
    }

    #[test]
    fn update_rejects_blank_text_and_keeps_document() {
        let (_dir, store) = store();
        let task = insert(&store, "keep me");
        let patch = TaskPatch {
            text: Some("  ".into()),
            ..TaskPatch::default()
        };
        let err = store
            .update(task.id, &patch)
            .err()
            .unwrap_or_else(|| panic!("blank edit must be rejected"));
        assert!(matches!(err, StoreError::Validation(_)));

        let reread = store.get(task.id).unwrap_or_else(|err| panic!("get: {err}"));
        assert_eq!(reread.text, "keep me");
    }

    #[test]
    fn second_delete_is_not_found_and_leaves_others_alone() {
        let (_dir, store) = store();
        let doomed = insert(&store, "doomed");
        let survivor = insert(&store, "survivor");

        store
            .delete(doomed.id)
            .unwrap_or_else(|err| panic!("first delete must succeed: {err}"));
        let err = store
            .delete(doomed.id)
            .err()
            .unwrap_or_else(|| panic!("second delete must fail"));
        assert!(err.is_not_found());

        let listed = store.list().unwrap_or_else(|err| panic!("list must succeed: {err}"));
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, survivor.id);
    }

    #[test]
    fn store_survives_reopen() {
        let (dir, store) = store();
        let task = insert(&store, "persistent");
        drop(store);

        let reopened =
            JsonStore::open(dir.path()).unwrap_or_else(|err| panic!("reopen must succeed: {err}"));
        let listed = reopened
            .list()
            .unwrap_or_else(|err| panic!("list must succeed: {err}"));
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, task.id);
        assert_eq!(listed[0].text, "persistent");
    }

    #[test]
    fn list_reports_corrupt_documents() {
        let (dir, store) = store();
        insert(&store, "fine");
        std::fs::write(dir.path().join("not-a-task.json"), "{ nope")
            .unwrap_or_else(|err| panic!("write fixture: {err}"));

        let err = store
            .list()
            .err()
            .unwrap_or_else(|| panic!("corrupt document must surface"));
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }
}
