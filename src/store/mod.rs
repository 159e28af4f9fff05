//! The task store: an in-memory task list mirrored to a CSV file.

pub mod file;
pub mod query;
pub mod reconcile;
pub mod stats;
pub mod tasks;

use crate::clock::{Clock, SystemClock};
use crate::error::{StoreError, StoreResult};
use crate::types::Task;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Owns the task collection and its backing file.
///
/// Every mutation rewrites the whole file before returning. If a write fails
/// the change stays in memory and the store is marked dirty; [`TaskStore::close`]
/// retries the write once.
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
    clock: Box<dyn Clock>,
    load_error: Option<StoreError>,
    dirty: bool,
    // Set when an existing file failed to load; cleared once it is backed up.
    needs_backup: bool,
}

impl TaskStore {
    /// Open the tasks file at `path` using the system clock.
    pub fn initialize(path: impl Into<PathBuf>) -> Self {
        Self::initialize_with_clock(path, SystemClock)
    }

    /// Open the tasks file at `path`, creating it if missing.
    ///
    /// A read or parse failure leaves the store empty and is available from
    /// [`TaskStore::load_error`]; the file itself is left untouched.
    pub fn initialize_with_clock(path: impl Into<PathBuf>, clock: impl Clock + 'static) -> Self {
        let path = path.into();
        let mut store = Self {
            path,
            tasks: Vec::new(),
            clock: Box::new(clock),
            load_error: None,
            dirty: false,
            needs_backup: false,
        };

        if !store.path.exists() {
            info!(path = %store.path.display(), "Creating new tasks file");
            if let Err(e) = file::create_empty(&store.path) {
                warn!(path = %store.path.display(), error = %e, "Failed to create tasks file");
                store.load_error = Some(StoreError::load(&store.path, format!("{:#}", e)));
            }
            return store;
        }

        match file::read_tasks(&store.path) {
            Ok(tasks) => {
                info!(path = %store.path.display(), count = tasks.len(), "Loaded tasks");
                store.tasks = tasks;
            }
            Err(e) => {
                warn!(path = %store.path.display(), error = %format!("{:#}", e), "Failed to read tasks file");
                store.load_error = Some(StoreError::load(&store.path, format!("{:#}", e)));
                store.needs_backup = true;
                return store;
            }
        }

        if let Err(e) = store.refresh() {
            store.load_error = Some(e);
        }
        store
    }

    /// End the session. Retries the last write if it failed.
    pub fn close(mut self) -> StoreResult<()> {
        if self.dirty {
            warn!(path = %self.path.display(), "Retrying unsaved changes before close");
            self.save()?;
        }
        debug!(path = %self.path.display(), "Task store closed");
        Ok(())
    }

    /// Rewrite the backing file from the in-memory collection.
    ///
    /// If the file failed to load, it is first copied to [`TaskStore::backup_path`]
    /// so the first write cannot destroy it.
    pub fn save(&mut self) -> StoreResult<()> {
        if self.needs_backup {
            self.backup_unreadable()?;
        }
        match file::write_tasks(&self.path, &self.tasks) {
            Ok(()) => {
                self.dirty = false;
                debug!(path = %self.path.display(), count = self.tasks.len(), "Saved tasks");
                Ok(())
            }
            Err(e) => {
                self.dirty = true;
                warn!(path = %self.path.display(), error = %format!("{:#}", e), "Failed to save tasks");
                Err(StoreError::save(&self.path, format!("{:#}", e)))
            }
        }
    }

    fn backup_unreadable(&mut self) -> StoreResult<()> {
        let backup = self.backup_path();
        if let Err(e) = fs::copy(&self.path, &backup) {
            self.dirty = true;
            warn!(path = %self.path.display(), backup = %backup.display(), error = %e, "Failed to back up unreadable tasks file");
            return Err(StoreError::save(
                &self.path,
                format!("could not back up unreadable file to {}: {}", backup.display(), e),
            ));
        }
        warn!(
            path = %self.path.display(),
            backup = %backup.display(),
            "Overwriting unreadable tasks file; previous contents backed up"
        );
        self.needs_backup = false;
        Ok(())
    }

    /// Where an unreadable tasks file is copied before it is overwritten.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".bak");
        PathBuf::from(name)
    }

    /// Reconcile overdue status against today's date, saving only on change.
    ///
    /// Run this before any read-facing operation.
    pub fn refresh(&mut self) -> StoreResult<bool> {
        let today = self.clock.today();
        let changed = self.reconcile_overdue(today);
        if changed {
            self.save()?;
        }
        Ok(changed)
    }

    /// All tasks in file order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The error raised while loading, if any.
    pub fn load_error(&self) -> Option<&StoreError> {
        self.load_error.as_ref()
    }

    /// True when the file on disk is behind the in-memory state.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn clock() -> FixedClock {
        FixedClock::on(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap())
    }

    #[test]
    fn initialize_creates_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasks.csv");

        let store = TaskStore::initialize_with_clock(&path, clock());

        assert!(path.exists());
        assert!(store.is_empty());
        assert!(store.load_error().is_none());
    }

    #[test]
    fn unreadable_file_yields_empty_store_and_keeps_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasks.csv");
        let garbage = "id,title\nnot-a-number,x\n";
        fs::write(&path, garbage).unwrap();

        let store = TaskStore::initialize_with_clock(&path, clock());

        assert!(store.is_empty());
        assert!(matches!(store.load_error(), Some(StoreError::Load { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), garbage);
    }

    #[test]
    fn first_save_after_failed_load_backs_up_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasks.csv");
        let garbage = "id,title\nnot-a-number,x\n";
        fs::write(&path, garbage).unwrap();
        let mut store = TaskStore::initialize_with_clock(&path, clock());

        store.save().unwrap();
        fs::write(store.backup_path(), "changed\n").unwrap();
        store.save().unwrap();

        // Only the first overwrite is backed up.
        assert_eq!(
            fs::read_to_string(temp.path().join("tasks.csv.bak")).unwrap(),
            "changed\n"
        );
        assert!(file::read_tasks(&path).unwrap().is_empty());
    }

    #[test]
    fn backup_keeps_original_contents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasks.csv");
        let garbage = "id,title\nnot-a-number,x\n";
        fs::write(&path, garbage).unwrap();
        let mut store = TaskStore::initialize_with_clock(&path, clock());

        store.save().unwrap();

        assert_eq!(fs::read_to_string(store.backup_path()).unwrap(), garbage);
    }

    #[test]
    fn load_reconciles_and_persists_overdue() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasks.csv");
        fs::write(
            &path,
            "id,title,description,due_date,priority,status,created_at,completed_at\n\
             1,Late,,2025-01-01,High,Pending,2024-12-20 10:00:00,\n",
        )
        .unwrap();

        let store = TaskStore::initialize_with_clock(&path, clock());

        assert_eq!(store.tasks()[0].status, crate::types::TaskStatus::Overdue);
        let on_disk = fs::read_to_string(&path).unwrap();
        assert!(on_disk.contains(",Overdue,"));
    }

    #[test]
    fn failed_save_marks_store_dirty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasks.csv");
        let mut store = TaskStore::initialize_with_clock(&path, clock());

        // A directory in place of the file makes the write fail.
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        let err = store.save().unwrap_err();
        assert!(err.is_data_loss_risk());
        assert!(store.is_dirty());

        fs::remove_dir(&path).unwrap();
        store.close().unwrap();
        assert!(path.exists());
    }
}
