#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use expense_core::{
    config::{Config, ConfigManager},
    core::{identity::StaticIdentity, time::FixedClock},
    storage::JsonStorage,
    ExpenseStore,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub const OWNER: &str = "0x1234567890abcdef";

/// Creates a fresh base directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Thursday 2024-05-16 12:00 UTC.
pub fn reference_now() -> DateTime<FixedOffset> {
    Utc.with_ymd_and_hms(2024, 5, 16, 12, 0, 0)
        .unwrap()
        .fixed_offset()
}

/// A store over JSON files in `base`, pinned to [`reference_now`].
pub fn json_store(base: &Path) -> ExpenseStore {
    let storage =
        JsonStorage::new(Some(base.to_path_buf()), Some(3)).expect("create json storage");
    ExpenseStore::new(Box::new(storage), Config::default())
        .with_clock(Box::new(FixedClock(reference_now())))
}

/// Isolated store connected as [`OWNER`], plus a config manager for the same directory.
pub fn setup_test_env() -> (ExpenseStore, ConfigManager, PathBuf) {
    let base = temp_base();
    let mut store = json_store(&base);
    store
        .connect(&StaticIdentity::connected(OWNER))
        .expect("connect owner");
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager");
    (store, config_manager, base)
}
