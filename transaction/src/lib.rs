//! Jolt Transaction
//!
//! Unit of work over a [`jolt_store::Database`].
//!
//! Responsibilities:
//! - Hold exclusive access to the tables for the transaction's lifetime
//! - Apply changes directly and record how to undo them
//! - COMMIT keeps the changes, ROLLBACK replays the undo log in reverse
//! - A transaction dropped before commit rolls back

mod buffer;
mod error;
mod transaction;

pub use buffer::{UndoEntry, UndoLog};
pub use error::{TransactionError, TransactionResult};
pub use transaction::{Transaction, TransactionState};
