//! JSON:API error objects and the conversion trait every layer implements.

use serde::{Deserialize, Serialize};

/// Top-level error document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDocument {
    pub errors: Vec<ErrorObject>,
}

impl ErrorDocument {
    pub fn single(error: ErrorObject) -> Self {
        Self {
            errors: vec![error],
        }
    }

    /// The status of the document: the shared status of all errors, or
    /// 400/500 depending on the highest class present.
    pub fn status(&self) -> u16 {
        let mut statuses = self.errors.iter().map(ErrorObject::status_code);
        let Some(first) = statuses.next() else {
            return 500;
        };
        let mut highest = first;
        let mut uniform = true;
        for status in statuses {
            uniform &= status == first;
            highest = highest.max(status);
        }
        match (uniform, highest) {
            (true, _) => first,
            (false, s) if s >= 500 => 500,
            _ => 400,
        }
    }
}

/// A single JSON:API error object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub status: String,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrorSource>,
}

impl ErrorObject {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            status: status.to_string(),
            title: title.into(),
            detail: None,
            source: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_pointer(mut self, pointer: impl Into<String>) -> Self {
        self.source = Some(ErrorSource {
            pointer: Some(pointer.into()),
        });
        self
    }

    /// Point at `member` of the operation at `index`. Without an index the
    /// pointer is `member` itself, and no pointer is set when that is empty.
    pub fn at_operation(self, index: Option<usize>, member: &str) -> Self {
        let pointer = operation_pointer(index, member);
        if pointer.is_empty() {
            self
        } else {
            self.with_pointer(pointer)
        }
    }

    /// Numeric status, 500 when the status member is malformed.
    pub fn status_code(&self) -> u16 {
        self.status.parse().unwrap_or(500)
    }

    pub fn pointer(&self) -> Option<&str> {
        self.source.as_ref().and_then(|s| s.pointer.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,
}

/// Source pointer for a member of the operation at `index`, or a plain
/// document pointer when the error is not tied to an operation.
///
/// `member` is relative, e.g. `/data/id`.
pub fn operation_pointer(index: Option<usize>, member: &str) -> String {
    match index {
        Some(i) => format!("/atomic:operations[{i}]{member}"),
        None => member.to_string(),
    }
}

/// Conversion of a failure into a wire error object.
pub trait ToErrorObject {
    /// Build the error object, embedding `index` in the source pointer when
    /// the failure belongs to an operation of a batch.
    fn to_error_object(&self, index: Option<usize>) -> ErrorObject;
}
