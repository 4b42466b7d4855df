// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Exception cause flattening.
//!
//! The destination never receives the cause object itself. Instead its
//! message, type name, trace and fields (as JSON text) go into the string
//! fields the destination designates. Only the immediate cause is
//! summarized; a cause of the cause stays inside the rendered fields.

use crate::descriptor::{Cause, StructDescriptor};
use crate::engine::CastContext;
use crate::error::Result;
use crate::json;
use crate::types::TypeName;
use crate::value::{StructObject, Value};
use std::sync::Arc;

/// Destination field indices for each part of the summary.
#[derive(Debug)]
pub(super) struct CauseFlattener {
    dest_type: TypeName,
    message: Option<usize>,
    cause_type: Option<usize>,
    cause_trace: Option<usize>,
    cause_fields: Option<usize>,
}

impl CauseFlattener {
    /// `None` unless either side is exception-shaped.
    pub(super) fn new(source: &StructDescriptor, dest: &StructDescriptor) -> Option<Self> {
        let reads_cause = source.exception().is_some_and(|shape| shape.has_cause());
        let summary = dest.exception().map(|shape| shape.summary_fields().clone());
        if !reads_cause && summary.as_ref().map_or(true, |s| s.is_empty()) {
            return None;
        }

        let summary = summary.unwrap_or_default();
        let index = |field: &Option<Arc<str>>| {
            field.as_deref().and_then(|name| dest.field_index(name))
        };
        Some(Self {
            dest_type: dest.type_name().clone(),
            message: index(&summary.message),
            cause_type: index(&summary.cause_type),
            cause_trace: index(&summary.cause_trace),
            cause_fields: index(&summary.cause_fields),
        })
    }

    fn has_targets(&self) -> bool {
        self.message.is_some()
            || self.cause_type.is_some()
            || self.cause_trace.is_some()
            || self.cause_fields.is_some()
    }

    /// Summary values for the cause of `object`, as `(dest index, value)`.
    pub(super) fn summarize(
        &self,
        source: &StructDescriptor,
        object: &dyn StructObject,
        cx: &CastContext<'_>,
    ) -> Result<Vec<(usize, Value)>> {
        let Some(shape) = source.exception() else {
            return Ok(Vec::new());
        };
        let Some(cause) = shape.read_cause(object)? else {
            return Ok(Vec::new());
        };
        if !self.has_targets() {
            log::warn!(
                "[transform] {} has no cause summary fields, dropping cause {}",
                self.dest_type,
                cause.type_name
            );
            return Ok(Vec::new());
        }

        let Cause {
            type_name,
            message,
            trace,
            value,
        } = cause;
        let mut out = Vec::with_capacity(4);
        if let (Some(index), Some(message)) = (self.message, message) {
            out.push((index, Value::String(message)));
        }
        if let Some(index) = self.cause_type {
            out.push((index, Value::String(type_name)));
        }
        if let (Some(index), Some(trace)) = (self.cause_trace, trace) {
            out.push((index, Value::String(trace)));
        }
        if let (Some(index), Some(value)) = (self.cause_fields, value) {
            let rendered = json::to_json(cx.engine(), &value)?;
            out.push((index, Value::String(rendered.to_string())));
        }
        log::trace!(
            "[transform] flattened cause into {} ({} fields)",
            self.dest_type,
            out.len()
        );
        Ok(out)
    }
}
