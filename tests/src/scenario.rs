//! Scenario definition and builder.

use std::path::{Path, PathBuf};

use jolt_core::AtomicOptions;

use crate::assertion::{Assertion, AssertionBuilder};
use crate::catalog::Catalog;
use crate::error::{ScenarioError, ScenarioResult};
use crate::loader::Operations;
use crate::runner::Runner;

/// A step in a scenario with its assertion.
#[derive(Debug)]
pub struct Step {
    /// Step name (matches `--# name` in the operations file).
    pub name: String,
    /// Assertion to verify the result.
    pub assertion: Assertion,
}

/// A complete test scenario.
pub struct Scenario {
    /// Scenario name (for reporting).
    name: String,
    catalog: Catalog,
    options: AtomicOptions,
    /// Path to the seed file (optional).
    seed_path: Option<PathBuf>,
    /// Path to the operations file.
    operations_path: Option<PathBuf>,
    /// Parsed operations (if loaded inline).
    operations: Option<Operations>,
    /// Steps with assertions.
    steps: Vec<Step>,
    /// Base path for resolving relative paths.
    base_path: PathBuf,
}

impl Scenario {
    /// Create a new scenario with the given name, against the music catalog
    /// with default options.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            catalog: Catalog::default(),
            options: AtomicOptions::default(),
            seed_path: None,
            operations_path: None,
            operations: None,
            steps: Vec::new(),
            base_path: data_root(),
        }
    }

    /// Set the base path for resolving relative paths.
    pub fn base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = path.into();
        self
    }

    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn options(mut self, options: AtomicOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the seed file path (relative to data/).
    pub fn seed(mut self, path: impl Into<PathBuf>) -> Self {
        self.seed_path = Some(path.into());
        self
    }

    /// Set the operations file path (relative to data/).
    pub fn operations(mut self, path: impl Into<PathBuf>) -> Self {
        self.operations_path = Some(path.into());
        self
    }

    /// Load operations from a string.
    pub fn operations_source(mut self, source: &str) -> ScenarioResult<Self> {
        self.operations = Some(Operations::parse(source)?);
        Ok(self)
    }

    /// Add a step with an assertion.
    ///
    /// The step name must match a `--# name` marker in the operations file.
    pub fn step<F>(mut self, name: impl Into<String>, assertion_fn: F) -> Self
    where
        F: FnOnce(AssertionBuilder) -> AssertionBuilder,
    {
        let name = name.into();
        let assertion = assertion_fn(AssertionBuilder::new()).build();
        self.steps.push(Step { name, assertion });
        self
    }

    /// Run the scenario and return the result.
    pub fn run(&self) -> ScenarioResult<()> {
        let runner = Runner::new(self)?;
        runner.run()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_catalog(&self) -> Catalog {
        self.catalog
    }

    pub fn get_options(&self) -> &AtomicOptions {
        &self.options
    }

    /// Load the seed, if any.
    pub fn load_seed(&self) -> ScenarioResult<Option<Operations>> {
        self.seed_path
            .as_ref()
            .map(|p| Operations::load(&self.resolve_path(p)))
            .transpose()
    }

    /// Get the operations, loading from file if needed.
    pub fn load_operations(&self) -> ScenarioResult<Operations> {
        if let Some(ref ops) = self.operations {
            return Ok(ops.clone());
        }

        match &self.operations_path {
            Some(p) => Operations::load(&self.resolve_path(p)),
            None => Err(ScenarioError::missing_operations(&self.name)),
        }
    }

    /// Get the steps.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Resolve a path relative to the base path.
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }
}

/// The `data/` directory of this crate.
fn data_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_operations() {
        let scenario = Scenario::new("nothing").step("a", |a| a.ok());

        assert!(matches!(
            scenario.load_operations(),
            Err(ScenarioError::MissingOperations { .. })
        ));
    }

    #[test]
    fn test_paths_resolve_against_data_root() {
        let scenario = Scenario::new("x").seed("music/seeds/catalog.ops");

        let seed = scenario.load_seed().unwrap().unwrap();

        assert!(!seed.step_names().is_empty());
    }

    #[test]
    fn test_library_seed_fits_smallest_operation_limit() {
        // GIVEN the books scenario caps requests at three operations
        let scenario = Scenario::new("x").seed("library/seeds/minimal.ops");

        // WHEN
        let seed = scenario.load_seed().unwrap().unwrap();

        // THEN
        for step in seed.step_names() {
            let body = seed.get_step(step).unwrap().unwrap();
            let request: serde_json::Value = serde_json::from_str(body).unwrap();
            let count = request["atomic:operations"].as_array().map_or(0, Vec::len);
            assert!((1..=3).contains(&count), "seed step '{step}' has {count} operations");
        }
    }
}
