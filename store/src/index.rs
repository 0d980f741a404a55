//! Reverse index over relationships.

use std::collections::{HashMap, HashSet};

use crate::{Row, RowRef};

/// Finds the rows whose relationships point at a given row.
///
/// For each target, maps every referencing row to the names of the
/// relationships that hold the reference.
#[derive(Debug, Default, Clone)]
pub struct ReferenceIndex {
    inbound: HashMap<RowRef, HashMap<RowRef, HashSet<String>>>,
}

impl ReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every reference held by `row`.
    pub fn insert(&mut self, row: &Row) {
        let source = row.row_ref();
        for (name, target) in row.references() {
            self.inbound
                .entry(target.clone())
                .or_default()
                .entry(source.clone())
                .or_default()
                .insert(name.to_string());
        }
    }

    /// Drop every reference held by `row`.
    pub fn remove(&mut self, row: &Row) {
        let source = row.row_ref();
        for (name, target) in row.references() {
            let Some(sources) = self.inbound.get_mut(target) else {
                continue;
            };
            if let Some(names) = sources.get_mut(&source) {
                names.remove(name);
                if names.is_empty() {
                    sources.remove(&source);
                }
            }
            if sources.is_empty() {
                self.inbound.remove(target);
            }
        }
    }

    /// Rows referencing `target`, in a stable order.
    pub fn sources(&self, target: &RowRef) -> Vec<RowRef> {
        let mut sources: Vec<RowRef> = self
            .inbound
            .get(target)
            .map(|s| s.keys().cloned().collect())
            .unwrap_or_default();
        sources.sort();
        sources
    }

    pub fn is_referenced(&self, target: &RowRef) -> bool {
        self.inbound.contains_key(target)
    }
}
