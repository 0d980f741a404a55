//! Table storage with id allocation and reference indexing.

use std::collections::{BTreeMap, HashMap};

use jolt_core::IdKind;

use crate::{ReferenceIndex, Row, RowRef, StoreError, StoreResult};

/// Rows of one resource type.
#[derive(Debug, Clone)]
pub struct Table {
    id_kind: IdKind,
    /// Highest sequential id handed out or seen so far.
    counter: i64,
    rows: BTreeMap<String, Row>,
}

impl Table {
    fn new(id_kind: IdKind) -> Self {
        Self {
            id_kind,
            counter: 0,
            rows: BTreeMap::new(),
        }
    }

    pub fn id_kind(&self) -> IdKind {
        self.id_kind
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.values()
    }
}

/// All tables of a database.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    tables: HashMap<String, Table>,
    references: ReferenceIndex,
}

impl Tables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table. Redefining a table keeps its rows.
    pub fn define(&mut self, name: impl Into<String>, id_kind: IdKind) {
        self.tables
            .entry(name.into())
            .or_insert_with(|| Table::new(id_kind));
    }

    pub fn table(&self, name: &str) -> StoreResult<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| StoreError::UnknownTable(name.to_string()))
    }

    fn table_mut(&mut self, name: &str) -> StoreResult<&mut Table> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| StoreError::UnknownTable(name.to_string()))
    }

    // ==================== Id Allocation ====================

    pub fn counter(&self, name: &str) -> StoreResult<i64> {
        Ok(self.table(name)?.counter)
    }

    pub fn set_counter(&mut self, name: &str, counter: i64) -> StoreResult<()> {
        self.table_mut(name)?.counter = counter;
        Ok(())
    }

    /// Hand out a fresh id for a new row in `name`.
    pub fn allocate_id(&mut self, name: &str) -> StoreResult<String> {
        let table = self.table_mut(name)?;
        loop {
            let next = if table.id_kind.is_sequential() {
                table.counter + 1
            } else {
                table.counter
            };
            let id = table
                .id_kind
                .allocate(next)
                .ok_or_else(|| StoreError::IdSpaceExhausted(name.to_string()))?;
            if table.id_kind.is_sequential() {
                table.counter = next;
            }
            if !table.rows.contains_key(&id) {
                return Ok(id);
            }
        }
    }

    // ==================== Row Access ====================

    pub fn get(&self, name: &str, id: &str) -> Option<&Row> {
        self.tables.get(name)?.rows.get(id)
    }

    pub fn get_ref(&self, row_ref: &RowRef) -> Option<&Row> {
        self.get(&row_ref.resource_type, &row_ref.id)
    }

    pub fn contains(&self, row_ref: &RowRef) -> bool {
        self.get_ref(row_ref).is_some()
    }

    pub fn count(&self, name: &str) -> usize {
        self.tables.get(name).map_or(0, Table::len)
    }

    /// Rows referencing `target` through any relationship.
    pub fn referencing(&self, target: &RowRef) -> Vec<RowRef> {
        self.references.sources(target)
    }

    // ==================== Row Mutation ====================

    /// Insert a new row. Sequential counters move past explicit ids.
    pub fn insert(&mut self, row: Row) -> StoreResult<()> {
        let table = self.table_mut(&row.resource_type)?;
        if table.rows.contains_key(&row.id) {
            return Err(StoreError::duplicate_id(&row.resource_type, &row.id));
        }
        if table.id_kind.is_sequential() {
            if let Ok(explicit) = row.id.parse::<i64>() {
                table.counter = table.counter.max(explicit);
            }
        }
        table.rows.insert(row.id.clone(), row.clone());
        self.references.insert(&row);
        Ok(())
    }

    /// Replace an existing row, returning the previous version.
    pub fn replace(&mut self, row: Row) -> StoreResult<Row> {
        let table = self.table_mut(&row.resource_type)?;
        let Some(slot) = table.rows.get_mut(&row.id) else {
            return Err(StoreError::row_not_found(&row.resource_type, &row.id));
        };
        let previous = std::mem::replace(slot, row.clone());
        self.references.remove(&previous);
        self.references.insert(&row);
        Ok(previous)
    }

    /// Remove a row, returning it.
    pub fn remove(&mut self, name: &str, id: &str) -> StoreResult<Row> {
        let row = self
            .table_mut(name)?
            .rows
            .remove(id)
            .ok_or_else(|| StoreError::row_not_found(name, id))?;
        self.references.remove(&row);
        Ok(row)
    }
}
