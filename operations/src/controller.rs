//! Request/response boundary.
//!
//! Transport agnostic: a request body goes in, a status code and an optional
//! JSON document come out.

use std::sync::Arc;

use jolt_core::messages::TITLE_INTERNAL;
use jolt_core::{
    AtomicOperationObject, AtomicOperationsDocument, AtomicResultObject, CancellationToken,
    ErrorDocument, ErrorObject,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::atomic::AtomicOperationsProcessor;
use crate::error::{BatchError, BatchResult};

/// Outcome of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Option<Value>,
}

impl Response {
    fn no_content() -> Self {
        Self {
            status: 204,
            body: None,
        }
    }

    fn json(status: u16, document: &impl Serialize) -> Self {
        match serde_json::to_value(document) {
            Ok(body) => Self {
                status,
                body: Some(body),
            },
            Err(error) => {
                warn!(%error, "failed to serialize response document");
                let fallback = ErrorDocument::single(ErrorObject::new(500, TITLE_INTERNAL));
                Self {
                    status: 500,
                    body: serde_json::to_value(fallback).ok(),
                }
            }
        }
    }

    fn error(error: &BatchError) -> Self {
        Self::json(error.status(), &error.to_error_document())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Handles `POST /operations` style requests.
pub struct AtomicOperationsController {
    processor: Arc<AtomicOperationsProcessor>,
}

impl AtomicOperationsController {
    pub fn new(processor: Arc<AtomicOperationsProcessor>) -> Self {
        Self { processor }
    }

    /// Handle a raw request body.
    pub async fn handle(&self, body: Option<&str>, cancel: &CancellationToken) -> Response {
        info!(bytes = body.map_or(0, str::len), "atomic operations request received");
        let response = match decode(body) {
            Ok(operations) => self.run(operations, cancel).await,
            Err(error) => {
                warn!(%error, "atomic operations request rejected");
                Response::error(&error)
            }
        };
        info!(status = response.status, "atomic operations response");
        response
    }

    /// Handle an already parsed request document.
    pub async fn handle_document(
        &self,
        document: AtomicOperationsDocument,
        cancel: &CancellationToken,
    ) -> Response {
        let response = match document.operations {
            Some(operations) => self.run(operations, cancel).await,
            None => Response::error(&missing_operations()),
        };
        info!(status = response.status, "atomic operations response");
        response
    }

    async fn run(&self, operations: Vec<AtomicOperationObject>, cancel: &CancellationToken) -> Response {
        match self.processor.process(operations, cancel).await {
            Ok(results) => respond_with_results(results),
            Err(error) => Response::error(&error),
        }
    }
}

fn missing_operations() -> BatchError {
    BatchError::InvalidBody("The 'atomic:operations' element is required.".to_string())
}

fn decode(body: Option<&str>) -> BatchResult<Vec<AtomicOperationObject>> {
    let body = body
        .filter(|body| !body.trim().is_empty())
        .ok_or(BatchError::MissingBody)?;
    let document: AtomicOperationsDocument =
        serde_json::from_str(body).map_err(|error| BatchError::InvalidBody(error.to_string()))?;
    document.operations.ok_or_else(missing_operations)
}

fn respond_with_results(results: Vec<AtomicResultObject>) -> Response {
    if results.iter().any(AtomicResultObject::has_data) {
        Response::json(200, &AtomicOperationsDocument::with_results(results))
    } else {
        Response::no_content()
    }
}
