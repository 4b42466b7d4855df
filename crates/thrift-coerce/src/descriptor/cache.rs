// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Process-wide descriptor cache.
//!
//! Each struct type is described at most once: concurrent first requests for
//! the same type block on a per-type cell while one of them runs the
//! describe function. Entries are never evicted.

use super::StructDescriptor;
use crate::error::{CoercionError, Result};
use crate::types::{TypeKind, TypeName, TypeRef};
use dashmap::DashMap;
use std::sync::{Arc, OnceLock};

type Slot = Arc<OnceLock<std::result::Result<Arc<StructDescriptor>, String>>>;

/// Memoizes [`StructDescriptor`]s by type name.
#[derive(Debug, Default)]
pub struct DescriptorCache {
    slots: DashMap<TypeName, Slot>,
}

impl DescriptorCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptor for `ty`, computing and validating it on first use.
    ///
    /// A type whose descriptor fails validation keeps failing with the same
    /// [`CoercionError::InvalidDescriptor`] on every call.
    pub fn describe(&self, ty: &TypeRef) -> Result<Arc<StructDescriptor>> {
        let handle = match &ty.kind {
            TypeKind::Struct(handle) => *handle,
            _ => {
                return Err(CoercionError::invalid_descriptor(
                    ty.name.clone(),
                    "not a struct-like type",
                ))
            }
        };

        // Clone the slot out so the shard lock is not held while describing.
        let slot = self.slots.entry(ty.name.clone()).or_default().clone();
        let outcome = slot.get_or_init(|| {
            let descriptor = handle.describe();
            if descriptor.type_name() != &ty.name {
                return Err(format!(
                    "describe() returned descriptor for {}",
                    descriptor.type_name()
                ));
            }
            if let Some(reason) = descriptor.first_problem() {
                log::warn!("[descriptor] {} rejected: {}", ty.name, reason);
                return Err(reason);
            }
            log::debug!(
                "[descriptor] described {} ({} fields, exception={})",
                ty.name,
                descriptor.fields().len(),
                descriptor.is_exception()
            );
            Ok(Arc::new(descriptor))
        });

        match outcome {
            Ok(descriptor) => Ok(Arc::clone(descriptor)),
            Err(reason) => Err(CoercionError::invalid_descriptor(
                ty.name.clone(),
                reason.clone(),
            )),
        }
    }

    /// Check if a descriptor for `name` has been computed.
    pub fn contains(&self, name: &str) -> bool {
        self.slots
            .get(name)
            .is_some_and(|slot| slot.get().is_some_and(|r| r.is_ok()))
    }

    /// Number of types seen.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
