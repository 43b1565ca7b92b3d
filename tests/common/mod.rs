use std::path::PathBuf;
use std::sync::Mutex;

use fintrack_core::{core::Tracker, storage::JsonFileStore};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a tracker backed by a unique snapshot directory for each test.
pub fn setup_tracker() -> (Tracker, PathBuf) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    (open_tracker_at(base.clone()), base)
}

/// Opens a tracker over an existing snapshot directory.
pub fn open_tracker_at(base: PathBuf) -> Tracker {
    let store = JsonFileStore::new(Some(base)).expect("create json file store");
    Tracker::open(Box::new(store))
}
