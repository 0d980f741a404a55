//! A unit of work spanning one batch.

use std::sync::atomic::{AtomicU64, Ordering};

use jolt_store::{Database, Row, RowRef, StoreError, Tables};
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, warn};

use crate::buffer::{UndoEntry, UndoLog};
use crate::error::{TransactionError, TransactionResult};

static NEXT_TRANSACTION_ID: AtomicU64 = AtomicU64::new(1);

/// Transaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Active,
    Committed,
    RolledBack,
}

/// Exclusive, undoable access to a database.
///
/// Changes are applied to the tables immediately and recorded in an undo
/// log. Reads inside the transaction see its own writes. Other transactions
/// wait on the database lock until this one ends, so uncommitted changes are
/// never observed from outside.
pub struct Transaction {
    id: u64,
    tables: OwnedMutexGuard<Tables>,
    undo: UndoLog,
    state: TransactionState,
}

impl std::fmt::Debug for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("pending_changes", &self.undo.len())
            .finish()
    }
}

impl Transaction {
    /// Begin a transaction, waiting for any other to finish.
    pub async fn begin(database: &Database) -> Self {
        let tables = database.lock().await;
        let id = NEXT_TRANSACTION_ID.fetch_add(1, Ordering::Relaxed);
        debug!(txn = id, "transaction started");
        Self {
            id,
            tables,
            undo: UndoLog::new(),
            state: TransactionState::Active,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Number of changes that a rollback would revert.
    pub fn pending_changes(&self) -> usize {
        self.undo.len()
    }

    // ========== Reads (own writes included) ==========

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn get(&self, resource_type: &str, id: &str) -> Option<&Row> {
        self.tables.get(resource_type, id)
    }

    pub fn contains(&self, row_ref: &RowRef) -> bool {
        self.tables.contains(row_ref)
    }

    pub fn referencing(&self, target: &RowRef) -> Vec<RowRef> {
        self.tables.referencing(target)
    }

    // ========== Writes ==========

    /// Allocate an id for a new row of `resource_type`.
    pub fn allocate_id(&mut self, resource_type: &str) -> TransactionResult<String> {
        let previous = self.tables.counter(resource_type)?;
        let id = self.tables.allocate_id(resource_type)?;
        self.track_counter_change(resource_type, previous)?;
        Ok(id)
    }

    pub fn insert(&mut self, row: Row) -> TransactionResult<()> {
        let resource_type = row.resource_type.clone();
        let row_ref = row.row_ref();
        let previous = self.tables.counter(&resource_type)?;
        self.tables.insert(row)?;
        self.undo.track_inserted(row_ref);
        self.track_counter_change(&resource_type, previous)?;
        Ok(())
    }

    pub fn replace(&mut self, row: Row) -> TransactionResult<()> {
        let previous = self.tables.replace(row)?;
        self.undo.track_replaced(previous);
        Ok(())
    }

    pub fn remove(&mut self, resource_type: &str, id: &str) -> TransactionResult<Row> {
        let row = self.tables.remove(resource_type, id)?;
        self.undo.track_removed(row.clone());
        Ok(row)
    }

    fn track_counter_change(&mut self, resource_type: &str, previous: i64) -> TransactionResult<()> {
        if self.tables.counter(resource_type)? != previous {
            self.undo.track_counter(resource_type, previous);
        }
        Ok(())
    }

    // ========== Lifecycle ==========

    /// Keep every change and release the database.
    pub fn commit(mut self) -> TransactionResult<()> {
        debug!(txn = self.id, changes = self.undo.len(), "transaction committed");
        self.undo.clear();
        self.state = TransactionState::Committed;
        Ok(())
    }

    /// Revert every change and release the database.
    pub fn rollback(mut self) -> TransactionResult<()> {
        self.revert()
    }

    fn revert(&mut self) -> TransactionResult<()> {
        let changes = self.undo.len();
        let mut failed = 0;
        for entry in self.undo.drain_reversed() {
            if let Err(e) = apply_undo(&mut self.tables, entry) {
                warn!(txn = self.id, error = %e, "undo step failed");
                failed += 1;
            }
        }
        self.state = TransactionState::RolledBack;
        debug!(txn = self.id, changes, "transaction rolled back");

        if failed == 0 {
            Ok(())
        } else {
            Err(TransactionError::rollback_incomplete(failed))
        }
    }
}

fn apply_undo(tables: &mut Tables, entry: UndoEntry) -> Result<(), StoreError> {
    match entry {
        UndoEntry::Inserted(row_ref) => tables.remove(&row_ref.resource_type, &row_ref.id).map(|_| ()),
        UndoEntry::Replaced(previous) => tables.replace(previous).map(|_| ()),
        UndoEntry::Removed(row) => tables.insert(row),
        UndoEntry::Counter { table, previous } => tables.set_counter(&table, previous),
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if self.state == TransactionState::Active {
            warn!(txn = self.id, "transaction dropped while active, rolling back");
            let _ = self.revert();
        }
    }
}
