// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Struct-to-struct conversion.
//!
//! A [`StructTransformer`] is synthesized once per ordered struct pair and
//! memoized in the registry. The field match plan (source field index to
//! destination field index) is computed up front; each conversion then
//! extracts, casts per field and builds a fresh destination.

mod exception;

use crate::descriptor::StructDescriptor;
use crate::engine::CastContext;
use crate::error::{CoercionError, Result};
use crate::registry::Converter;
use crate::value::Value;
use exception::CauseFlattener;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Converter between two struct-like types.
pub struct StructTransformer {
    source: Arc<StructDescriptor>,
    dest: Arc<StructDescriptor>,
    /// Destination field index for every source field.
    plan: Vec<Option<usize>>,
    /// Present for exception pairs.
    causes: Option<CauseFlattener>,
}

impl StructTransformer {
    /// Precompute the match plan for `source -> dest`.
    ///
    /// Fields match by numeric id when both sides carry one, otherwise by
    /// name. Fails when `dest` cannot be constructed.
    pub fn new(source: Arc<StructDescriptor>, dest: Arc<StructDescriptor>) -> Result<Self> {
        if dest.construction().is_none() {
            return Err(CoercionError::invalid_descriptor(
                dest.type_name().clone(),
                "type has no construction strategy",
            ));
        }

        let plan: Vec<Option<usize>> = source
            .fields()
            .iter()
            .map(|field| {
                if field.is_readable() {
                    dest.position_matching(field)
                } else {
                    None
                }
            })
            .collect();
        if let Some((first, second, target)) = ambiguous_match(&plan) {
            return Err(CoercionError::invalid_descriptor(
                dest.type_name().clone(),
                format!(
                    "field '{}' is matched by both '{}' and '{}' of {}",
                    dest.fields()[target].name,
                    source.fields()[first].name,
                    source.fields()[second].name,
                    source.type_name()
                ),
            ));
        }
        let causes = CauseFlattener::new(&source, &dest);

        log::debug!(
            "[transform] {} -> {}: {}/{} fields matched{}",
            source.type_name(),
            dest.type_name(),
            plan.iter().flatten().count(),
            dest.fields().len(),
            if causes.is_some() { ", exception" } else { "" }
        );

        Ok(Self {
            source,
            dest,
            plan,
            causes,
        })
    }

    /// Source descriptor.
    pub fn source(&self) -> &StructDescriptor {
        &self.source
    }

    /// Destination descriptor.
    pub fn dest(&self) -> &StructDescriptor {
        &self.dest
    }

    /// Destination field index matched to each source field.
    pub fn plan(&self) -> &[Option<usize>] {
        &self.plan
    }

    /// Check if this transformer flattens exception causes.
    pub fn is_exception(&self) -> bool {
        self.causes.is_some()
    }
}

/// First pair of source fields that target the same destination field.
fn ambiguous_match(plan: &[Option<usize>]) -> Option<(usize, usize, usize)> {
    let mut claimed: HashMap<usize, usize> = HashMap::with_capacity(plan.len());
    for (index, target) in plan.iter().enumerate() {
        let Some(target) = *target else { continue };
        if let Some(&first) = claimed.get(&target) {
            return Some((first, index, target));
        }
        claimed.insert(target, index);
    }
    None
}

impl Converter for StructTransformer {
    fn convert(&self, value: Value, cx: &CastContext<'_>) -> Result<Value> {
        let object = match value {
            Value::Struct(object) => object,
            Value::Null => return Ok(Value::Null),
            other => {
                return Err(CoercionError::mismatch(
                    self.source.type_name().clone(),
                    other.kind_name(),
                ))
            }
        };

        let extracted = self.source.extract(&*object)?;
        let mut values = Vec::with_capacity(extracted.len());
        for field in extracted {
            let Some(target) = self.plan.get(field.index).copied().flatten() else {
                continue;
            };
            let (declared, value) = field.envelope.into_parts();
            let dest_type = &self.dest.fields()[target].declared_type;
            values.push((target, cx.cast(value, &declared, dest_type)?));
        }

        if let Some(causes) = &self.causes {
            let summary = causes.summarize(&self.source, &*object, cx)?;
            for (target, value) in summary {
                if !values.iter().any(|(filled, _)| *filled == target) {
                    values.push((target, value));
                }
            }
        }

        self.dest.build(values).map(Value::Struct)
    }
}

impl fmt::Debug for StructTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructTransformer")
            .field("source", self.source.type_name())
            .field("dest", self.dest.type_name())
            .field("plan", &self.plan)
            .field("exception", &self.is_exception())
            .finish()
    }
}
