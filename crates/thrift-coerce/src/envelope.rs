// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declared type plus value.

use crate::types::{PrimitiveKind, TypeDescriptor, TypeKind, TypeRef};
use crate::value::{ArrayValue, Value};

/// A value tagged with the type its field was declared as.
///
/// The declared type may be more general than the runtime value (for
/// instance `any` holding a string). A primitive declared type never holds
/// null.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueEnvelope {
    /// Declared type.
    pub declared_type: TypeRef,
    /// Runtime value.
    pub value: Value,
}

impl ValueEnvelope {
    /// Create an envelope.
    pub fn new(declared_type: TypeRef, value: Value) -> Self {
        Self {
            declared_type,
            value,
        }
    }

    /// Null of the given declared type.
    pub fn null(declared_type: TypeRef) -> Self {
        Self::new(declared_type, Value::Null)
    }

    /// Check if the value is null.
    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    /// Check if the value's runtime shape fits the declared type.
    pub fn conforms(&self) -> bool {
        conforms(&self.declared_type, &self.value)
    }

    /// Split into declared type and value.
    pub fn into_parts(self) -> (TypeRef, Value) {
        (self.declared_type, self.value)
    }
}

/// Check if `value`'s runtime shape fits `ty` (top level only).
pub fn conforms(ty: &TypeDescriptor, value: &Value) -> bool {
    match (&ty.kind, value) {
        (TypeKind::Primitive(_), Value::Null) => false,
        (_, Value::Null) | (TypeKind::Any, _) => true,
        (TypeKind::Primitive(kind) | TypeKind::Boxed(kind), v) => primitive_matches(*kind, v),
        (TypeKind::String, Value::String(_))
        | (TypeKind::Binary, Value::Binary(_))
        | (TypeKind::Buffer, Value::Buffer(_))
        | (TypeKind::Date, Value::Date(_))
        | (TypeKind::Url, Value::Url(_))
        | (TypeKind::List(_), Value::List(_))
        | (TypeKind::Set(_), Value::Set(_))
        | (TypeKind::Map(_, _), Value::Map(_)) => true,
        (TypeKind::Array(element), Value::Array(array)) => match element.kind {
            TypeKind::Primitive(kind) => array.primitive_kind() == Some(kind),
            _ => matches!(array, ArrayValue::Object(_)),
        },
        (TypeKind::Enum(_), Value::Enum(e)) => e.enum_type.name == ty.name,
        // Raw ordinal of the enum.
        (TypeKind::Enum(_), Value::I32(_)) => true,
        (TypeKind::Struct(_), Value::Struct(s)) => s.type_name() == &*ty.name,
        _ => false,
    }
}

fn primitive_matches(kind: PrimitiveKind, value: &Value) -> bool {
    matches!(
        (kind, value),
        (PrimitiveKind::Bool, Value::Bool(_))
            | (PrimitiveKind::I8, Value::I8(_))
            | (PrimitiveKind::I16, Value::I16(_))
            | (PrimitiveKind::I32, Value::I32(_))
            | (PrimitiveKind::I64, Value::I64(_))
            | (PrimitiveKind::F32, Value::F32(_))
            | (PrimitiveKind::F64, Value::F64(_))
    )
}
