// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Coercion engine.
//!
//! [`CoercionEngine::cast`] converts a value declared as one type into the
//! equivalent value of another type, recursing through struct fields and
//! container elements. Dispatch order:
//!
//! 1. null (fails only toward a non-nullable primitive)
//! 2. identity, when the destination accepts the source as is
//! 3. exact registry entry (built-in, explicit or previously synthesized)
//! 4. struct pair: memoized [`StructTransformer`](crate::transform::StructTransformer)
//! 5. arrays, lists, sets and maps, element by element
//! 6. registry lookup with enum synthesis
//!
//! The engine owns its registry and descriptor cache; create one and share
//! it (`Arc<CoercionEngine>`) across threads.

mod containers;
mod enums;

pub(crate) use enums::EnumConverter;

use crate::config::EngineConfig;
use crate::descriptor::{DescriptorCache, StructDescriptor, ThriftStruct};
use crate::envelope::{conforms, ValueEnvelope};
use crate::error::{CoercionError, Result};
use crate::registry::{self, builtins, Converter, PairKey, TransformerRegistry};
use crate::transform::StructTransformer;
use crate::types::{TypeKind, TypeRef};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Handle passed to converters so they can cast nested values.
#[derive(Clone, Copy)]
pub struct CastContext<'a> {
    engine: &'a CoercionEngine,
    depth: usize,
}

impl<'a> CastContext<'a> {
    /// Cast a nested value one level deeper.
    pub fn cast(&self, value: Value, source: &TypeRef, dest: &TypeRef) -> Result<Value> {
        self.engine.cast_at(value, source, dest, self.depth + 1)
    }

    /// The engine running the cast.
    pub fn engine(&self) -> &'a CoercionEngine {
        self.engine
    }

    /// Current nesting depth (0 for the outermost cast).
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl fmt::Debug for CastContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CastContext")
            .field("depth", &self.depth)
            .finish()
    }
}

/// Converts values between the two generated type systems.
pub struct CoercionEngine {
    config: EngineConfig,
    registry: TransformerRegistry,
    descriptors: DescriptorCache,
}

impl CoercionEngine {
    /// Engine with the default configuration and all built-ins.
    pub fn new() -> Self {
        Self::build(EngineConfig::default())
    }

    /// Engine with a custom configuration.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        let registry = TransformerRegistry::new();
        if config.seed_builtins {
            builtins::seed(&registry, config.numeric_widening);
        }
        log::debug!(
            "[engine] created (max_depth={}, builtins={}, widening={})",
            config.max_depth,
            config.seed_builtins,
            config.numeric_widening
        );
        Self {
            config,
            registry,
            descriptors: DescriptorCache::new(),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Converter registry.
    pub fn registry(&self) -> &TransformerRegistry {
        &self.registry
    }

    /// Descriptor cache.
    pub fn descriptors(&self) -> &DescriptorCache {
        &self.descriptors
    }

    /// Context for applying a converter outside of [`cast`](Self::cast).
    pub fn context(&self) -> CastContext<'_> {
        CastContext {
            engine: self,
            depth: 0,
        }
    }

    /// Register a converter for `left -> right`, replacing any entry.
    ///
    /// An explicit converter takes precedence over the struct, container
    /// and enum paths for that exact pair.
    pub fn register_converter(&self, left: &TypeRef, right: &TypeRef, converter: Arc<dyn Converter>) {
        self.registry.register(left, right, converter);
    }

    /// Register a context-free closure for `left -> right`.
    pub fn register<F>(&self, left: &TypeRef, right: &TypeRef, convert: F)
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.registry.register_fn(left, right, convert);
    }

    /// Cached descriptor of a struct-like type.
    pub fn describe(&self, ty: &TypeRef) -> Result<Arc<StructDescriptor>> {
        self.descriptors.describe(ty)
    }

    /// Resolve the converter for `left -> right`, synthesizing struct and
    /// enum converters on first use.
    pub fn lookup(&self, left: &TypeRef, right: &TypeRef) -> Result<Arc<dyn Converter>> {
        if right.accepts(left) {
            return Ok(registry::identity());
        }
        if let Some(found) = self.registry.get(&PairKey::new(left, right)) {
            return Ok(found);
        }

        // Describe outside the registry lock; descriptors have their own cells.
        let pending = match (&left.kind, &right.kind) {
            (TypeKind::Struct(_), TypeKind::Struct(_)) => Some(Pending::Struct(
                self.describe(left)?,
                self.describe(right)?,
            )),
            (TypeKind::Enum(_), TypeKind::Enum(_)) => Some(Pending::Enum),
            _ => None,
        };
        self.registry.lookup(left, right, || {
            pending
                .map(|p| p.into_converter(left, right))
                .transpose()
        })
    }

    /// Convert `value`, declared as `source`, into a value of type `dest`.
    pub fn cast(&self, value: Value, source: &TypeRef, dest: &TypeRef) -> Result<Value> {
        self.cast_at(value, source, dest, 0)
    }

    /// Convert an envelope into an envelope declared as `dest`.
    pub fn cast_envelope(&self, envelope: ValueEnvelope, dest: &TypeRef) -> Result<ValueEnvelope> {
        let (source, value) = envelope.into_parts();
        let value = self.cast(value, &source, dest)?;
        Ok(ValueEnvelope::new(dest.clone(), value))
    }

    /// Convert a generated struct into its counterpart `R`.
    pub fn transform<L, R>(&self, value: L) -> Result<Arc<R>>
    where
        L: ThriftStruct,
        R: ThriftStruct,
    {
        let converted = self.cast(
            Value::structure(value),
            &TypeRef::structure::<L>(),
            &TypeRef::structure::<R>(),
        )?;
        match converted {
            Value::Struct(object) => object
                .into_any()
                .downcast::<R>()
                .map_err(|_| CoercionError::mismatch(R::TYPE_NAME, "foreign struct")),
            other => Err(CoercionError::mismatch(R::TYPE_NAME, other.kind_name())),
        }
    }

    pub(crate) fn cast_at(&self, value: Value, source: &TypeRef, dest: &TypeRef, depth: usize) -> Result<Value> {
        if depth > self.config.max_depth {
            return Err(CoercionError::DepthExceeded {
                depth,
                from: source.name.clone(),
                to: dest.name.clone(),
            });
        }

        if value.is_null() {
            if dest.is_primitive() {
                return Err(CoercionError::NullToPrimitive {
                    from: source.name.clone(),
                    to: dest.name.clone(),
                });
            }
            return Ok(Value::Null);
        }

        // A wildcard source is refined to whatever the value says it is.
        let refined = if source.is_any() {
            value.runtime_type()
        } else {
            None
        };
        let source = refined.as_ref().unwrap_or(source);

        if let Value::Struct(object) = &value {
            if object.type_name() == &*dest.name {
                return Ok(value);
            }
        }
        if !conforms(source, &value) {
            return Err(CoercionError::mismatch(source.name.clone(), value.kind_name()));
        }
        if dest.accepts(source) {
            log::trace!("[engine] {} -> {}: identity", source, dest);
            return Ok(value);
        }

        let cx = CastContext {
            engine: self,
            depth,
        };
        if let Some(converter) = self.registry.get(&PairKey::new(source, dest)) {
            log::trace!("[engine] {} -> {}: registry", source, dest);
            return converter.convert(value, &cx);
        }
        if source.is_struct() && dest.is_struct() {
            log::trace!("[engine] {} -> {}: struct", source, dest);
            return self.lookup(source, dest)?.convert(value, &cx);
        }
        if source.is_container() || dest.is_container() {
            log::trace!("[engine] {} -> {}: container", source, dest);
            return containers::cast(value, source, dest, &cx);
        }
        self.lookup(source, dest)?.convert(value, &cx)
    }
}

impl Default for CoercionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CoercionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoercionEngine")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("descriptors", &self.descriptors.len())
            .finish()
    }
}

/// Synthesis prepared outside the registry lock.
enum Pending {
    Struct(Arc<StructDescriptor>, Arc<StructDescriptor>),
    Enum,
}

impl Pending {
    fn into_converter(self, left: &TypeRef, right: &TypeRef) -> Result<Arc<dyn Converter>> {
        match self {
            Self::Struct(source, dest) => Ok(Arc::new(StructTransformer::new(source, dest)?)),
            Self::Enum => Ok(Arc::new(EnumConverter::new(left, right)?)),
        }
    }
}
