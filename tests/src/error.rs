//! Error types for the scenario framework.

use std::path::PathBuf;

use jolt_operations::ProcessorRegistryError;
use jolt_registry::RegistryError;
use thiserror::Error;

/// Result type for scenario operations.
pub type ScenarioResult<T> = Result<T, ScenarioError>;

/// Errors that can occur when running scenarios.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// Failed to read a file.
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse an operations file.
    #[error("failed to parse operations file '{path}': {message}")]
    OperationsParse { path: PathBuf, message: String },

    /// A seed request did not succeed.
    #[error("seed step '{step}' failed with status {status}: {body}")]
    SeedFailed {
        step: String,
        status: u16,
        body: String,
    },

    /// Assertion failed.
    #[error("assertion failed for step '{step}': {message}")]
    AssertionFailed { step: String, message: String },

    /// Step not found in operations file.
    #[error("step '{step}' not found in operations file")]
    StepNotFound { step: String },

    /// A `${name}` placeholder with no captured value.
    #[error("step '{step}' uses '{name}' before it was captured")]
    UnboundCapture { step: String, name: String },

    /// Missing operations file.
    #[error("operations not specified for scenario '{scenario}'")]
    MissingOperations { scenario: String },

    #[error("failed to start runtime: {0}")]
    Runtime(std::io::Error),

    #[error("invalid catalog: {0}")]
    Catalog(#[from] RegistryError),

    #[error("failed to register processors: {0}")]
    Processors(#[from] ProcessorRegistryError),
}

impl ScenarioError {
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    pub fn operations_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::OperationsParse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn seed_failed(step: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::SeedFailed {
            step: step.into(),
            status,
            body: body.into(),
        }
    }

    pub fn assertion_failed(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            step: step.into(),
            message: message.into(),
        }
    }

    pub fn step_not_found(step: impl Into<String>) -> Self {
        Self::StepNotFound { step: step.into() }
    }

    pub fn unbound_capture(step: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnboundCapture {
            step: step.into(),
            name: name.into(),
        }
    }

    pub fn missing_operations(scenario: impl Into<String>) -> Self {
        Self::MissingOperations {
            scenario: scenario.into(),
        }
    }
}
