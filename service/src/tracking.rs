//! Change detection for write results.

use std::collections::BTreeMap;

use serde_json::Value;

/// How a service decides whether a write reports the stored resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChangeTracking {
    /// Report only changes the client did not send itself.
    #[default]
    Detect,
    /// Report the stored resource after every create and update.
    Always,
}

/// Whether the stored attributes contain anything the request did not set.
///
/// `initial` is the state before the write (empty for creates), `requested`
/// holds the attributes sent by the client and `stored` the state afterwards.
pub fn has_implicit_changes(
    initial: &BTreeMap<String, Value>,
    requested: &BTreeMap<String, Value>,
    stored: &BTreeMap<String, Value>,
) -> bool {
    stored.iter().any(|(name, value)| match requested.get(name) {
        Some(sent) => sent != value,
        None => initial.get(name) != Some(value),
    })
}
