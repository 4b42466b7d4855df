// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Construction strategies.
//!
//! One toolchain generates a constructor taking every field (in declaration
//! order), the other generates a mutable builder with one setter per field.
//! Both are driven through [`ConstructionStrategy::build`].

use super::{FieldDescriptor, ThriftStruct};
use crate::error::{BoxError, CoercionError, Result};
use crate::types::TypeName;
use crate::value::{FromValue, StructObject, Value};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

type Construct =
    Arc<dyn Fn(FieldValues) -> std::result::Result<Arc<dyn StructObject>, BoxError> + Send + Sync>;
type Create = Arc<dyn Fn() -> Box<dyn Any + Send> + Send + Sync>;
type Setter =
    Arc<dyn Fn(&mut (dyn Any + Send), Value) -> std::result::Result<(), BoxError> + Send + Sync>;
type Finish = Arc<
    dyn Fn(Box<dyn Any + Send>) -> std::result::Result<Arc<dyn StructObject>, BoxError>
        + Send
        + Sync,
>;

/// How a struct-like type is instantiated.
#[derive(Clone)]
pub enum ConstructionStrategy {
    /// Constructor taking every parameter at once.
    DirectConstructor(DirectConstructor),
    /// Mutable builder with per-field setters.
    Builder(BuilderStrategy),
}

impl ConstructionStrategy {
    /// Field names the strategy writes to.
    pub fn targets(&self) -> Vec<&str> {
        match self {
            Self::DirectConstructor(ctor) => ctor.params.iter().map(|p| &**p).collect(),
            Self::Builder(builder) => builder.setters.iter().map(|(f, _)| &**f).collect(),
        }
    }

    /// Build an instance from `(field index, value)` pairs.
    ///
    /// Indices refer to `fields`. Values for fields the strategy does not
    /// accept are dropped.
    pub fn build(
        &self,
        type_name: &TypeName,
        fields: &[FieldDescriptor],
        values: Vec<(usize, Value)>,
    ) -> Result<Arc<dyn StructObject>> {
        match self {
            Self::DirectConstructor(ctor) => {
                let mut args = vec![Value::Null; ctor.params.len()];
                for (index, value) in values {
                    let Some(field) = fields.get(index) else {
                        continue;
                    };
                    match ctor.params.iter().position(|p| *p == field.name) {
                        Some(pos) => args[pos] = value,
                        None => log::trace!(
                            "[construct] {}: no parameter for field '{}'",
                            type_name,
                            field.name
                        ),
                    }
                }
                let args = FieldValues {
                    type_name: type_name.clone(),
                    params: ctor.params.clone(),
                    values: args,
                };
                (ctor.construct)(args).map_err(|e| CoercionError::construction(type_name.clone(), e))
            }
            Self::Builder(strategy) => {
                let mut builder = (strategy.create)();
                for (index, value) in values {
                    // Unset builder slots already mean "absent".
                    if value.is_null() {
                        continue;
                    }
                    let Some(field) = fields.get(index) else {
                        continue;
                    };
                    match strategy.setters.iter().find(|(name, _)| *name == field.name) {
                        Some((_, set)) => set(&mut *builder, value)
                            .map_err(|e| CoercionError::construction(type_name.clone(), e))?,
                        None => log::trace!(
                            "[construct] {}: no setter for field '{}'",
                            type_name,
                            field.name
                        ),
                    }
                }
                (strategy.finish)(builder)
                    .map_err(|e| CoercionError::construction(type_name.clone(), e))
            }
        }
    }
}

impl fmt::Debug for ConstructionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectConstructor(ctor) => f
                .debug_struct("DirectConstructor")
                .field("params", &ctor.params)
                .finish(),
            Self::Builder(builder) => f
                .debug_struct("Builder")
                .field("builder_type", &builder.builder_type)
                .field("setters", &self.targets())
                .finish(),
        }
    }
}

// ---------------------------------------------------------------------------
// Direct constructor
// ---------------------------------------------------------------------------

/// Constructor strategy: one call receiving every parameter.
#[derive(Clone)]
pub struct DirectConstructor {
    params: Vec<Arc<str>>,
    construct: Construct,
}

impl DirectConstructor {
    /// Create a constructor strategy.
    ///
    /// `params` lists field names in parameter order; fields the source did
    /// not provide arrive as [`Value::Null`].
    pub fn new<S, F>(params: &[&str], construct: F) -> Self
    where
        S: ThriftStruct,
        F: Fn(FieldValues) -> std::result::Result<S, BoxError> + Send + Sync + 'static,
    {
        Self {
            params: params.iter().map(|p| Arc::from(*p)).collect(),
            construct: Arc::new(move |args| {
                construct(args).map(|s| Arc::new(s) as Arc<dyn StructObject>)
            }),
        }
    }

    /// Parameter names, in order.
    pub fn params(&self) -> &[Arc<str>] {
        &self.params
    }
}

/// Positional constructor arguments.
#[derive(Debug)]
pub struct FieldValues {
    type_name: TypeName,
    params: Vec<Arc<str>>,
    values: Vec<Value>,
}

impl FieldValues {
    /// Take the argument at `index`, leaving null in its place.
    pub fn take<T: FromValue>(&mut self, index: usize) -> Result<T> {
        let slot = self.values.get_mut(index).ok_or_else(|| {
            CoercionError::invalid_descriptor(
                self.type_name.clone(),
                format!("constructor has no parameter #{}", index),
            )
        })?;
        T::from_value(std::mem::replace(slot, Value::Null))
    }

    /// Take the argument for parameter `name`.
    pub fn take_named<T: FromValue>(&mut self, name: &str) -> Result<T> {
        match self.params.iter().position(|p| &**p == name) {
            Some(index) => self.take(index),
            None => Err(CoercionError::invalid_descriptor(
                self.type_name.clone(),
                format!("constructor has no parameter '{}'", name),
            )),
        }
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder strategy: create, set per field, finish.
#[derive(Clone)]
pub struct BuilderStrategy {
    builder_type: &'static str,
    create: Create,
    setters: Vec<(Arc<str>, Setter)>,
    finish: Finish,
}

impl BuilderStrategy {
    /// Create a builder strategy around builder type `B`.
    ///
    /// `finish` consumes the populated builder and produces the struct.
    pub fn new<B, S, F>(finish: F) -> Self
    where
        B: Default + Send + 'static,
        S: ThriftStruct,
        F: Fn(B) -> std::result::Result<S, BoxError> + Send + Sync + 'static,
    {
        let builder_type = std::any::type_name::<B>();
        Self {
            builder_type,
            create: Arc::new(|| Box::new(B::default()) as Box<dyn Any + Send>),
            setters: Vec::new(),
            finish: Arc::new(move |raw: Box<dyn Any + Send>| {
                let builder = raw
                    .downcast::<B>()
                    .map_err(|_| CoercionError::mismatch(builder_type, "foreign builder"))?;
                finish(*builder)
                    .map(|s| Arc::new(s) as Arc<dyn StructObject>)
            }),
        }
    }

    /// Register the setter for `field`.
    pub fn setter<B, T, F>(mut self, field: &str, set: F) -> Self
    where
        B: Send + 'static,
        T: FromValue + 'static,
        F: Fn(&mut B, T) + Send + Sync + 'static,
    {
        let builder_type = std::any::type_name::<B>();
        let setter: Setter = Arc::new(move |raw: &mut (dyn Any + Send), value: Value| {
            let builder = raw
                .downcast_mut::<B>()
                .ok_or_else(|| CoercionError::mismatch(builder_type, "foreign builder"))?;
            set(builder, T::from_value(value)?);
            Ok(())
        });
        self.setters.push((Arc::from(field), setter));
        self
    }

    /// Name of the builder type.
    pub fn builder_type(&self) -> &'static str {
        self.builder_type
    }
}
