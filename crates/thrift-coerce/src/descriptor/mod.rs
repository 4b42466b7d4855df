// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Struct metadata.
//!
//! Every struct-like type generated by either toolchain implements
//! [`ThriftStruct`] and hands the engine an explicit [`StructDescriptor`]:
//! its fields (numeric id and/or name, declared type, read accessor,
//! requiredness), the strategy used to build a new instance, and, for
//! exceptions, where the cause lives and where its summary goes.
//!
//! Descriptors are computed once per type and cached by the
//! [`DescriptorCache`].
//!
//! # Example
//!
//! ```ignore
//! impl ThriftStruct for User {
//!     const TYPE_NAME: &'static str = "apache.User";
//!
//!     fn describe() -> StructDescriptor {
//!         StructDescriptorBuilder::<User>::new()
//!             .field(1, "name", TypeRef::string(), Requiredness::Required, |u| u.name.clone().into())
//!             .field(2, "age", TypeRef::i32(), Requiredness::Unspecified, |u| u.age.into())
//!             .constructor(&["name", "age"], |mut args| {
//!                 Ok(User { name: args.take(0)?, age: args.take(1)? })
//!             })
//!             .build()
//!     }
//! }
//! ```

mod builder;
mod cache;
mod construction;
mod exception;
mod extract;

pub use builder::StructDescriptorBuilder;
pub use cache::DescriptorCache;
pub use construction::{BuilderStrategy, ConstructionStrategy, DirectConstructor, FieldValues};
pub use exception::{Cause, CauseReader, CauseSummaryFields, ExceptionShape};
pub use extract::ExtractedField;

use crate::error::{CoercionError, Result};
use crate::types::{TypeKind, TypeName, TypeRef};
use crate::value::{StructObject, Value};
use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// A struct or exception generated by one of the Thrift toolchains.
pub trait ThriftStruct: Any + Send + Sync + fmt::Debug + PartialEq {
    /// Qualified type name, unique across both toolchains.
    const TYPE_NAME: &'static str;

    /// Describe the type's fields and construction strategy.
    ///
    /// Called at most once per engine; the result is cached.
    fn describe() -> StructDescriptor;
}

/// Per-field policy for null/absent values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Requiredness {
    /// Null is a hard error on extraction.
    Required,
    /// Null is omitted.
    Optional,
    /// Null is omitted (no annotation in the IDL).
    #[default]
    Unspecified,
}

/// Reads one field's value from a type-erased struct instance.
pub type FieldReader = Arc<dyn Fn(&dyn StructObject) -> Result<Value> + Send + Sync>;

/// Field descriptor for struct members.
#[derive(Clone)]
pub struct FieldDescriptor {
    /// Numeric field id (id-keyed toolchain).
    pub id: Option<i16>,
    /// Field name.
    pub name: Arc<str>,
    /// Declared field type.
    pub declared_type: TypeRef,
    /// Null policy.
    pub requiredness: Requiredness,
    reader: Option<FieldReader>,
}

impl FieldDescriptor {
    /// Create a write-only field descriptor (no reader).
    pub fn new(name: impl Into<Arc<str>>, declared_type: TypeRef) -> Self {
        Self {
            id: None,
            name: name.into(),
            declared_type,
            requiredness: Requiredness::Unspecified,
            reader: None,
        }
    }

    /// Set field id.
    pub fn with_id(mut self, id: i16) -> Self {
        self.id = Some(id);
        self
    }

    /// Set requiredness.
    pub fn with_requiredness(mut self, requiredness: Requiredness) -> Self {
        self.requiredness = requiredness;
        self
    }

    /// Attach a typed read accessor.
    pub fn with_reader<S, F>(mut self, read: F) -> Self
    where
        S: ThriftStruct,
        F: Fn(&S) -> Value + Send + Sync + 'static,
    {
        self.reader = Some(Arc::new(move |object: &dyn StructObject| {
            let typed = object
                .as_any()
                .downcast_ref::<S>()
                .ok_or_else(|| CoercionError::mismatch(S::TYPE_NAME, object.type_name()))?;
            Ok(read(typed))
        }));
        self
    }

    /// Attach a type-erased read accessor.
    pub fn with_raw_reader(mut self, reader: FieldReader) -> Self {
        self.reader = Some(reader);
        self
    }

    /// Check if the field can be extracted (write-only fields cannot).
    pub fn is_readable(&self) -> bool {
        self.reader.is_some()
    }

    /// Read the field; `None` for write-only fields.
    pub fn read(&self, object: &dyn StructObject) -> Result<Option<Value>> {
        match &self.reader {
            Some(reader) => reader(object).map(Some),
            None => Ok(None),
        }
    }

    /// Check if `other` denotes the same logical field.
    ///
    /// Fields match by numeric id when both carry one, otherwise by name.
    pub fn matches(&self, other: &FieldDescriptor) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => self.name == other.name,
        }
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("declared_type", &self.declared_type)
            .field("requiredness", &self.requiredness)
            .field("readable", &self.is_readable())
            .finish()
    }
}

/// Complete metadata for one struct-like type.
#[derive(Debug)]
pub struct StructDescriptor {
    type_name: TypeName,
    fields: Vec<FieldDescriptor>,
    construction: Option<ConstructionStrategy>,
    exception: Option<ExceptionShape>,
}

impl StructDescriptor {
    /// Create a descriptor. Types that are only ever a conversion source may
    /// pass `None` for the construction strategy.
    pub fn new(
        type_name: impl Into<TypeName>,
        fields: Vec<FieldDescriptor>,
        construction: Option<ConstructionStrategy>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
            construction,
            exception: None,
        }
    }

    /// Mark the type as an exception.
    pub fn with_exception(mut self, shape: ExceptionShape) -> Self {
        self.exception = Some(shape);
        self
    }

    /// Qualified type name.
    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| &*f.name == name)
    }

    /// Get field by numeric id.
    pub fn field_by_id(&self, id: i16) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.id == Some(id))
    }

    /// Get field index by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| &*f.name == name)
    }

    /// Index of the field matching `other` (see [`FieldDescriptor::matches`]).
    pub fn position_matching(&self, other: &FieldDescriptor) -> Option<usize> {
        self.fields.iter().position(|f| f.matches(other))
    }

    /// Construction strategy, if the type can be built.
    pub fn construction(&self) -> Option<&ConstructionStrategy> {
        self.construction.as_ref()
    }

    /// Exception shape, if the type is an exception.
    pub fn exception(&self) -> Option<&ExceptionShape> {
        self.exception.as_ref()
    }

    /// Check if the type is an exception.
    pub fn is_exception(&self) -> bool {
        self.exception.is_some()
    }

    /// Build a new instance from `(field index, value)` pairs.
    pub fn build(&self, values: Vec<(usize, Value)>) -> Result<Arc<dyn StructObject>> {
        let construction = self.construction.as_ref().ok_or_else(|| {
            CoercionError::invalid_descriptor(
                self.type_name.clone(),
                "type has no construction strategy",
            )
        })?;
        construction.build(&self.type_name, &self.fields, values)
    }

    /// Check the descriptor for internal consistency.
    pub fn validate(&self) -> Result<()> {
        match self.first_problem() {
            Some(reason) => Err(CoercionError::invalid_descriptor(
                self.type_name.clone(),
                reason,
            )),
            None => Ok(()),
        }
    }

    pub(crate) fn first_problem(&self) -> Option<String> {
        let mut names = HashSet::new();
        let mut ids = HashSet::new();
        for field in &self.fields {
            if !names.insert(field.name.clone()) {
                return Some(format!("duplicate field name '{}'", field.name));
            }
            if let Some(id) = field.id {
                if !ids.insert(id) {
                    return Some(format!("duplicate field id {}", id));
                }
            }
        }

        if let Some(construction) = &self.construction {
            for target in construction.targets() {
                if self.field(target).is_none() {
                    return Some(format!("construction refers to unknown field '{}'", target));
                }
            }
            if let ConstructionStrategy::DirectConstructor(ctor) = construction {
                let mut seen = HashSet::new();
                for param in ctor.params() {
                    if !seen.insert(param.clone()) {
                        return Some(format!("constructor parameter '{}' repeated", param));
                    }
                }
            }
        }

        if let Some(shape) = &self.exception {
            for target in shape.summary_fields().targets() {
                match self.field(target) {
                    None => return Some(format!("cause summary refers to unknown field '{}'", target)),
                    Some(field) if !matches!(field.declared_type.kind, TypeKind::String) => {
                        return Some(format!("cause summary field '{}' must be a string", target));
                    }
                    Some(_) => {}
                }
            }
        }

        None
    }
}
