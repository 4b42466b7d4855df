// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for StructDescriptor.

use super::{
    BuilderStrategy, ConstructionStrategy, DirectConstructor, ExceptionShape, FieldDescriptor,
    FieldValues, Requiredness, StructDescriptor, ThriftStruct,
};
use crate::error::BoxError;
use crate::types::TypeRef;
use crate::value::Value;
use std::marker::PhantomData;

/// Builder for creating the StructDescriptor of `S`.
#[derive(Debug)]
pub struct StructDescriptorBuilder<S> {
    fields: Vec<FieldDescriptor>,
    construction: Option<ConstructionStrategy>,
    exception: Option<ExceptionShape>,
    _marker: PhantomData<fn() -> S>,
}

impl<S: ThriftStruct> StructDescriptorBuilder<S> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            construction: None,
            exception: None,
            _marker: PhantomData,
        }
    }

    /// Add a readable field with a numeric id.
    pub fn field<F>(
        self,
        id: i16,
        name: &str,
        declared_type: TypeRef,
        requiredness: Requiredness,
        read: F,
    ) -> Self
    where
        F: Fn(&S) -> Value + Send + Sync + 'static,
    {
        self.field_descriptor(
            FieldDescriptor::new(name, declared_type)
                .with_id(id)
                .with_requiredness(requiredness)
                .with_reader(read),
        )
    }

    /// Add a readable field identified by name only.
    pub fn named_field<F>(
        self,
        name: &str,
        declared_type: TypeRef,
        requiredness: Requiredness,
        read: F,
    ) -> Self
    where
        F: Fn(&S) -> Value + Send + Sync + 'static,
    {
        self.field_descriptor(
            FieldDescriptor::new(name, declared_type)
                .with_requiredness(requiredness)
                .with_reader(read),
        )
    }

    /// Add a field that can be written but not read.
    pub fn write_only_field(self, id: Option<i16>, name: &str, declared_type: TypeRef) -> Self {
        let field = FieldDescriptor::new(name, declared_type);
        self.field_descriptor(match id {
            Some(id) => field.with_id(id),
            None => field,
        })
    }

    /// Add a field descriptor.
    pub fn field_descriptor(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Instantiate through a constructor taking `params` in order.
    pub fn constructor<F>(mut self, params: &[&str], construct: F) -> Self
    where
        F: Fn(FieldValues) -> Result<S, BoxError> + Send + Sync + 'static,
    {
        self.construction = Some(ConstructionStrategy::DirectConstructor(
            DirectConstructor::new(params, construct),
        ));
        self
    }

    /// Instantiate through a mutable builder.
    pub fn builder(mut self, strategy: BuilderStrategy) -> Self {
        self.construction = Some(ConstructionStrategy::Builder(strategy));
        self
    }

    /// Mark the type as an exception.
    pub fn exception(mut self, shape: ExceptionShape) -> Self {
        self.exception = Some(shape);
        self
    }

    /// Build the StructDescriptor.
    pub fn build(self) -> StructDescriptor {
        let descriptor = StructDescriptor::new(S::TYPE_NAME, self.fields, self.construction);
        match self.exception {
            Some(shape) => descriptor.with_exception(shape),
            None => descriptor,
        }
    }
}

impl<S: ThriftStruct> Default for StructDescriptorBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
