//! Persistence of per-owner expense lists and budgets.

pub mod json_backend;
pub mod memory;

use serde::{Deserialize, Serialize};

use crate::core::errors::Result;
use crate::domain::{Budget, Expense, OwnerId};

pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Everything persisted for one owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerSnapshot {
    pub schema_version: u32,
    pub owner: OwnerId,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<Budget>,
}

impl OwnerSnapshot {
    pub fn empty(owner: OwnerId) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            owner,
            expenses: Vec::new(),
            budget: None,
        }
    }

    pub fn new(owner: OwnerId, expenses: Vec<Expense>, budget: Option<Budget>) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            owner,
            expenses,
            budget,
        }
    }
}

/// Abstraction over persistence backends keyed by owner.
///
/// Loading an owner that was never saved yields an empty snapshot.
pub trait StorageBackend: Send + Sync {
    fn load(&self, owner: &OwnerId) -> Result<OwnerSnapshot>;
    fn save(&self, owner: &OwnerId, snapshot: &OwnerSnapshot) -> Result<()>;
}

pub use json_backend::JsonStorage;
pub use memory::MemoryStorage;
