//! Jolt Integration Test Framework
//!
//! Provides a fluent API for writing integration tests against the atomic
//! operations pipeline.
//!
//! # Structure
//!
//! The framework separates concerns into four components:
//!
//! - **catalog** - Resource types of a domain, defined in Rust
//! - **seeds/** - Reusable starting states (atomic operation requests)
//! - **operations/** - Reusable request sequences with step markers
//! - **tests/** - Test orchestration (Rust: seed + operations + assertions)
//!
//! # Example
//!
//! ```ignore
//! use jolt_tests::prelude::*;
//!
//! pub fn scenario() -> Scenario {
//!     Scenario::new("languages")
//!         .catalog(Catalog::Music)
//!         .seed("music/seeds/catalog.ops")
//!         .operations("music/operations/languages.ops")
//!         .step("create_language", |a| a.ok().results(1))
//!         .step("remove_language", |a| a.no_content().count("textLanguages", 0))
//! }
//!
//! #[test]
//! fn test() {
//!     scenario().run().unwrap();
//! }
//! ```

mod catalog;
mod error;
mod scenario;

pub use assertion::{Assertion, AssertionBuilder, Outcome};
pub use catalog::{Catalog, Fixture};
pub use error::{ScenarioError, ScenarioResult};
pub use loader::Operations;
pub use scenario::Scenario;

/// Install a fmt subscriber honouring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::assertion::{Assertion, AssertionBuilder};
    pub use crate::catalog::{Catalog, Fixture};
    pub use crate::error::{ScenarioError, ScenarioResult};
    pub use crate::init_tracing;
    pub use crate::scenario::Scenario;
    pub use jolt_core::{AtomicOptions, CancellationToken};
    pub use serde_json::json;
}
