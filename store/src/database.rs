//! Shared handle to the tables.

use std::sync::Arc;

use jolt_core::IdKind;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{Row, StoreResult, Tables};

/// A cloneable handle to one set of tables.
///
/// Writers take the whole database through [`Database::lock`]; a transaction
/// holds that guard until it commits or rolls back, so concurrent batches run
/// one after another and never see each other's uncommitted rows.
#[derive(Debug, Clone, Default)]
pub struct Database {
    tables: Arc<Mutex<Tables>>,
}

impl Database {
    pub fn new(tables: Tables) -> Self {
        Self {
            tables: Arc::new(Mutex::new(tables)),
        }
    }

    /// Create a database with the given empty tables.
    pub fn with_tables<N: Into<String>>(definitions: impl IntoIterator<Item = (N, IdKind)>) -> Self {
        let mut tables = Tables::new();
        for (name, id_kind) in definitions {
            tables.define(name, id_kind);
        }
        Self::new(tables)
    }

    /// Wait for exclusive access.
    pub async fn lock(&self) -> OwnedMutexGuard<Tables> {
        Arc::clone(&self.tables).lock_owned().await
    }

    /// Insert a committed row directly, outside any transaction.
    pub async fn seed(&self, row: Row) -> StoreResult<()> {
        self.tables.lock().await.insert(row)
    }

    pub async fn get(&self, resource_type: &str, id: &str) -> Option<Row> {
        self.tables.lock().await.get(resource_type, id).cloned()
    }

    pub async fn count(&self, resource_type: &str) -> usize {
        self.tables.lock().await.count(resource_type)
    }

    /// A copy of the committed tables.
    pub async fn snapshot(&self) -> Tables {
        self.tables.lock().await.clone()
    }
}
