// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Exception metadata: where a source exception keeps its cause, and which
//! string fields of a destination exception receive the cause summary.

use super::ThriftStruct;
use crate::error::{CoercionError, Result};
use crate::value::{StructObject, Value};
use std::fmt;
use std::sync::Arc;

/// Reads the cause attached to an exception instance.
pub type CauseReader = Arc<dyn Fn(&dyn StructObject) -> Result<Option<Cause>> + Send + Sync>;

/// The error that caused an exception.
#[derive(Debug, Clone, PartialEq)]
pub struct Cause {
    /// Qualified type name of the cause.
    pub type_name: String,
    /// Human-readable message.
    pub message: Option<String>,
    /// Rendered stack trace or error chain.
    pub trace: Option<String>,
    /// The cause itself when it is a structured value (usually a struct).
    pub value: Option<Value>,
}

impl Cause {
    /// Create a cause with only a type name.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            message: None,
            trace: None,
            value: None,
        }
    }

    /// Set the message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the trace.
    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    /// Attach the structured cause.
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Describe a Rust error; its `source()` chain becomes the trace.
    pub fn from_error<E: std::error::Error + 'static>(err: &E) -> Self {
        let mut cause = Self::new(std::any::type_name::<E>()).with_message(err.to_string());
        let mut chain = Vec::new();
        let mut next = err.source();
        while let Some(inner) = next {
            chain.push(format!("caused by: {}", inner));
            next = inner.source();
        }
        if !chain.is_empty() {
            cause.trace = Some(chain.join("\n"));
        }
        cause
    }

    /// Describe a generated struct used as a cause.
    pub fn from_struct<T: ThriftStruct>(value: T, message: Option<String>) -> Self {
        Self {
            type_name: T::TYPE_NAME.to_string(),
            message,
            trace: None,
            value: Some(Value::structure(value)),
        }
    }
}

/// Destination fields receiving a flattened cause. Each is optional; a
/// destination with none of them simply drops the cause.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CauseSummaryFields {
    /// Receives the cause message.
    pub message: Option<Arc<str>>,
    /// Receives the cause's qualified type name.
    pub cause_type: Option<Arc<str>>,
    /// Receives the cause's trace.
    pub cause_trace: Option<Arc<str>>,
    /// Receives the cause's fields rendered as a JSON object.
    pub cause_fields: Option<Arc<str>>,
}

impl CauseSummaryFields {
    /// No summary fields.
    pub fn none() -> Self {
        Self::default()
    }

    /// Set the message field.
    pub fn message(mut self, field: &str) -> Self {
        self.message = Some(field.into());
        self
    }

    /// Set the cause-type field.
    pub fn cause_type(mut self, field: &str) -> Self {
        self.cause_type = Some(field.into());
        self
    }

    /// Set the cause-trace field.
    pub fn cause_trace(mut self, field: &str) -> Self {
        self.cause_trace = Some(field.into());
        self
    }

    /// Set the cause-fields field.
    pub fn cause_fields(mut self, field: &str) -> Self {
        self.cause_fields = Some(field.into());
        self
    }

    /// Check if no field is configured.
    pub fn is_empty(&self) -> bool {
        self.targets().is_empty()
    }

    /// Configured field names.
    pub fn targets(&self) -> Vec<&str> {
        [
            &self.message,
            &self.cause_type,
            &self.cause_trace,
            &self.cause_fields,
        ]
        .into_iter()
        .flatten()
        .map(|f| &**f)
        .collect()
    }
}

/// Exception shape of a struct-like type.
#[derive(Clone, Default)]
pub struct ExceptionShape {
    cause: Option<CauseReader>,
    summary: CauseSummaryFields,
}

impl ExceptionShape {
    /// An exception with neither a cause nor summary fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the cause of `S` instances with `read`.
    pub fn cause_reader<S, F>(mut self, read: F) -> Self
    where
        S: ThriftStruct,
        F: Fn(&S) -> Option<Cause> + Send + Sync + 'static,
    {
        self.cause = Some(Arc::new(move |object: &dyn StructObject| {
            let typed = object
                .as_any()
                .downcast_ref::<S>()
                .ok_or_else(|| CoercionError::mismatch(S::TYPE_NAME, object.type_name()))?;
            Ok(read(typed))
        }));
        self
    }

    /// Set the summary fields.
    pub fn summary(mut self, summary: CauseSummaryFields) -> Self {
        self.summary = summary;
        self
    }

    /// Check if the exception can carry a cause.
    pub fn has_cause(&self) -> bool {
        self.cause.is_some()
    }

    /// Summary fields.
    pub fn summary_fields(&self) -> &CauseSummaryFields {
        &self.summary
    }

    /// Read the cause of `object`, if any.
    pub fn read_cause(&self, object: &dyn StructObject) -> Result<Option<Cause>> {
        match &self.cause {
            Some(read) => read(object),
            None => Ok(None),
        }
    }
}

impl fmt::Debug for ExceptionShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExceptionShape")
            .field("has_cause", &self.has_cause())
            .field("summary", &self.summary)
            .finish()
    }
}
