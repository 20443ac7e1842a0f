#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use finance_ledger::{
    core::WalletStore,
    identity::UserDirectory,
    storage::JsonStorage,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn storage_at(base: &Path) -> JsonStorage {
    JsonStorage::new(Some(base.to_path_buf())).expect("create json storage backend")
}

/// A store and a directory sharing one isolated data directory.
pub fn setup_test_env() -> (WalletStore, UserDirectory, JsonStorage) {
    let base = temp_base();
    let storage = storage_at(&base);
    let store = WalletStore::new(Box::new(storage.clone()));
    (store, UserDirectory::new(), storage)
}

/// Same as [`setup_test_env`] with `logins` already registered.
pub fn setup_with_users(logins: &[&str]) -> (WalletStore, UserDirectory, JsonStorage) {
    let (store, mut directory, storage) = setup_test_env();
    for login in logins {
        directory
            .register(login, "password")
            .expect("register test user");
    }
    (store, directory, storage)
}
