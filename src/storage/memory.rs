use std::{collections::HashMap, sync::Mutex};

use crate::core::errors::{ExpenseError, Result};
use crate::domain::OwnerId;

use super::{OwnerSnapshot, StorageBackend};

/// Keeps snapshots in process memory. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    owners: Mutex<HashMap<OwnerId, OwnerSnapshot>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates the snapshot for an owner.
    pub fn with_snapshot(self, snapshot: OwnerSnapshot) -> Self {
        if let Ok(mut owners) = self.owners.lock() {
            owners.insert(snapshot.owner.clone(), snapshot);
        }
        self
    }
}

impl StorageBackend for MemoryStorage {
    fn load(&self, owner: &OwnerId) -> Result<OwnerSnapshot> {
        let owners = self
            .owners
            .lock()
            .map_err(|_| ExpenseError::Persistence("memory storage lock poisoned".into()))?;
        Ok(owners
            .get(owner)
            .cloned()
            .unwrap_or_else(|| OwnerSnapshot::empty(owner.clone())))
    }

    fn save(&self, owner: &OwnerId, snapshot: &OwnerSnapshot) -> Result<()> {
        let mut owners = self
            .owners
            .lock()
            .map_err(|_| ExpenseError::Persistence("memory storage lock poisoned".into()))?;
        owners.insert(owner.clone(), snapshot.clone());
        Ok(())
    }
}
