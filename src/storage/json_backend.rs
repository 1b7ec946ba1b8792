use chrono::{DateTime, NaiveDateTime, Utc};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::core::{
    errors::{ExpenseError, Result},
    utils::{canonical_name, ensure_dir, PathResolver},
};
use crate::domain::OwnerId;

use super::{OwnerSnapshot, StorageBackend, SNAPSHOT_SCHEMA_VERSION};

const FILE_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// Stores one JSON document per owner and keeps a rotating set of backups
/// of the previous document on every overwrite.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    owners_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let app_root = PathResolver::resolve_base(root);
        ensure_dir(&app_root)?;
        let owners_dir = PathResolver::owners_dir_in(&app_root);
        let backups_dir = PathResolver::backup_dir_in(&app_root);
        ensure_dir(&owners_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            owners_dir,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn owner_path(&self, owner: &OwnerId) -> PathBuf {
        self.owners_dir.join(format!(
            "{}.{}",
            canonical_name(owner.as_str()),
            FILE_EXTENSION
        ))
    }

    fn backup_dir(&self, owner: &OwnerId) -> PathBuf {
        self.backups_dir.join(canonical_name(owner.as_str()))
    }

    pub fn backup_path(&self, owner: &OwnerId, backup_name: &str) -> PathBuf {
        self.backup_dir(owner).join(backup_name)
    }

    /// Backup file names for the owner, newest first.
    pub fn list_backups(&self, owner: &OwnerId) -> Result<Vec<String>> {
        let dir = self.backup_dir(owner);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(name.to_string());
            }
        }
        entries.sort_by_key(|name| std::cmp::Reverse(backup_order_key(name)));
        Ok(entries)
    }

    /// Copies a backup over the owner's current document and returns it.
    pub fn restore(&self, owner: &OwnerId, backup_name: &str) -> Result<OwnerSnapshot> {
        let backup_path = self.backup_path(owner, backup_name);
        if !backup_path.exists() {
            return Err(ExpenseError::Persistence(format!(
                "backup `{}` not found",
                backup_name
            )));
        }
        let snapshot = read_snapshot(&backup_path, owner)?;
        let target = self.owner_path(owner);
        fs::copy(&backup_path, &target)?;
        Ok(snapshot)
    }

    fn backup_existing_file(&self, owner: &OwnerId, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(owner);
        ensure_dir(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let prefix = format!("{}_{}", canonical_name(owner.as_str()), timestamp);
        let latest_counter = self
            .list_backups(owner)?
            .iter()
            .filter(|name| name.starts_with(&prefix))
            .map(|name| collision_counter(name))
            .max();
        let backup_name = match latest_counter {
            None => format!("{}.{}", prefix, FILE_EXTENSION),
            Some(counter) => format!("{}-{}.{}", prefix, counter + 1, FILE_EXTENSION),
        };
        fs::copy(path, dir.join(backup_name))?;
        self.prune_backups(owner)
    }

    fn prune_backups(&self, owner: &OwnerId) -> Result<()> {
        let backups = self.list_backups(owner)?;
        for entry in backups.iter().skip(self.retention) {
            let path = self.backup_path(owner, entry);
            if let Err(err) = fs::remove_file(&path) {
                debug!(path = %path.display(), error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn load(&self, owner: &OwnerId) -> Result<OwnerSnapshot> {
        let path = self.owner_path(owner);
        if !path.exists() {
            return Ok(OwnerSnapshot::empty(owner.clone()));
        }
        read_snapshot(&path, owner)
    }

    fn save(&self, owner: &OwnerId, snapshot: &OwnerSnapshot) -> Result<()> {
        let path = self.owner_path(owner);
        self.backup_existing_file(owner, &path)?;
        let json = serde_json::to_string_pretty(snapshot)?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        debug!(owner = %owner, path = %path.display(), "saved owner snapshot");
        Ok(())
    }
}

fn read_snapshot(path: &Path, owner: &OwnerId) -> Result<OwnerSnapshot> {
    let data = fs::read_to_string(path)?;
    let snapshot: OwnerSnapshot = serde_json::from_str(&data)?;
    if snapshot.schema_version > SNAPSHOT_SCHEMA_VERSION {
        return Err(ExpenseError::Persistence(format!(
            "`{}` is from a newer schema version ({})",
            path.display(),
            snapshot.schema_version
        )));
    }
    if &snapshot.owner != owner {
        return Err(ExpenseError::Persistence(format!(
            "`{}` belongs to `{}`, not `{}`",
            path.display(),
            snapshot.owner,
            owner
        )));
    }
    Ok(snapshot)
}

// Backups written within the same second carry a `-N` collision counter.
fn backup_order_key(name: &str) -> (Option<DateTime<Utc>>, u32) {
    (parse_backup_timestamp(name), collision_counter(name))
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = name.strip_suffix(&format!(".{}", FILE_EXTENSION))?;
    let mut parts = stem.rsplitn(3, '_');
    let time_part = parts.next()?;
    let date_part = parts.next()?;
    let time_digits = time_part.split('-').next()?;
    let raw = format!("{}{}", date_part, time_digits);
    NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn collision_counter(name: &str) -> u32 {
    name.strip_suffix(&format!(".{}", FILE_EXTENSION))
        .and_then(|stem| stem.rsplit_once('_'))
        .and_then(|(_, time_part)| time_part.split_once('-'))
        .and_then(|(_, counter)| counter.parse().ok())
        .unwrap_or(0)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
