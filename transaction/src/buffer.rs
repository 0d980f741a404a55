//! Undo log for tracking applied changes.

use jolt_store::{Row, RowRef};

/// One applied change, with what is needed to revert it.
#[derive(Debug, Clone, PartialEq)]
pub enum UndoEntry {
    /// A row was inserted; revert by removing it.
    Inserted(RowRef),
    /// A row was replaced; holds the previous version.
    Replaced(Row),
    /// A row was removed; holds the removed row.
    Removed(Row),
    /// A table's id counter moved; holds the previous value.
    Counter { table: String, previous: i64 },
}

/// Changes applied in a transaction, oldest first.
#[derive(Debug, Clone, Default)]
pub struct UndoLog {
    entries: Vec<UndoEntry>,
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track_inserted(&mut self, row_ref: RowRef) {
        self.entries.push(UndoEntry::Inserted(row_ref));
    }

    pub fn track_replaced(&mut self, previous: Row) {
        self.entries.push(UndoEntry::Replaced(previous));
    }

    pub fn track_removed(&mut self, row: Row) {
        self.entries.push(UndoEntry::Removed(row));
    }

    pub fn track_counter(&mut self, table: impl Into<String>, previous: i64) {
        self.entries.push(UndoEntry::Counter {
            table: table.into(),
            previous,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take every entry, newest first, leaving the log empty.
    pub fn drain_reversed(&mut self) -> impl Iterator<Item = UndoEntry> {
        let mut entries = std::mem::take(&mut self.entries);
        entries.reverse();
        entries.into_iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
