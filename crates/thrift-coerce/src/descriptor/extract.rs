// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field extraction: struct instance to per-field envelopes.

use super::{Requiredness, StructDescriptor};
use crate::envelope::ValueEnvelope;
use crate::error::{CoercionError, Result};
use crate::value::StructObject;

/// One extracted field.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedField {
    /// Index of the field in the source descriptor.
    pub index: usize,
    /// Declared type and value.
    pub envelope: ValueEnvelope,
}

impl StructDescriptor {
    /// Read every readable, non-null field of `object`.
    ///
    /// Write-only fields are skipped. A null field is omitted unless it is
    /// [`Requiredness::Required`], which fails with
    /// [`CoercionError::MissingRequiredField`].
    pub fn extract(&self, object: &dyn StructObject) -> Result<Vec<ExtractedField>> {
        if object.type_name() != &**self.type_name() {
            return Err(CoercionError::mismatch(
                self.type_name().clone(),
                object.type_name(),
            ));
        }

        let mut extracted = Vec::with_capacity(self.fields().len());
        for (index, field) in self.fields().iter().enumerate() {
            let Some(value) = field.read(object)? else {
                continue;
            };
            if value.is_null() {
                if field.requiredness == Requiredness::Required {
                    return Err(CoercionError::MissingRequiredField {
                        type_name: self.type_name().clone(),
                        field: field.name.to_string(),
                    });
                }
                continue;
            }
            extracted.push(ExtractedField {
                index,
                envelope: ValueEnvelope::new(field.declared_type.clone(), value),
            });
        }

        log::trace!(
            "[extract] {}: {} of {} fields present",
            self.type_name(),
            extracted.len(),
            self.fields().len()
        );
        Ok(extracted)
    }
}
