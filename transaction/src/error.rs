//! Transaction error types.

use jolt_store::StoreError;
use thiserror::Error;

/// Transaction errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransactionError {
    /// A store operation failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Some undo steps could not be applied.
    #[error("rollback incomplete: {failed} undo step(s) failed")]
    RollbackIncomplete { failed: usize },
}

impl TransactionError {
    pub fn rollback_incomplete(failed: usize) -> Self {
        Self::RollbackIncomplete { failed }
    }
}

/// Result type for transaction operations.
pub type TransactionResult<T> = Result<T, TransactionError>;
