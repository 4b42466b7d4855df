// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Element-wise conversion of arrays, lists, sets and maps.

use super::CastContext;
use crate::error::{CoercionError, Result};
use crate::types::{PrimitiveKind, TypeKind, TypeRef};
use crate::value::{dedup, dedup_entries, ArrayValue, Value};

/// Convert a container value. Pairs with no element-wise path (list to map,
/// container to scalar, nested wildcards) are unsupported.
pub(super) fn cast(value: Value, source: &TypeRef, dest: &TypeRef, cx: &CastContext<'_>) -> Result<Value> {
    if source.has_nested_wildcard() || dest.has_nested_wildcard() {
        return Err(unsupported(source, dest));
    }

    match (&source.kind, &dest.kind) {
        (TypeKind::Array(from) | TypeKind::List(from) | TypeKind::Set(from), TypeKind::Array(to)) => {
            to_array(value, source, from, to, cx)
        }
        (TypeKind::Array(from) | TypeKind::List(from) | TypeKind::Set(from), TypeKind::List(to)) => {
            let items = elements(value, source)?;
            Ok(Value::List(cast_elements(items, from, to, cx)?))
        }
        (TypeKind::Array(from) | TypeKind::List(from) | TypeKind::Set(from), TypeKind::Set(to)) => {
            let items = cast_elements(elements(value, source)?, from, to, cx)?;
            if cx.engine().config().dedup_sets {
                Ok(Value::Set(dedup(items)))
            } else {
                Ok(Value::Set(items))
            }
        }
        (TypeKind::Map(from_key, from_value), TypeKind::Map(to_key, to_value)) => {
            let entries = match value {
                Value::Map(entries) => entries,
                other => return Err(CoercionError::mismatch(source.name.clone(), other.kind_name())),
            };
            if passes_through(from_key, to_key) && passes_through(from_value, to_value) {
                return Ok(Value::Map(entries));
            }
            let converted = entries
                .into_iter()
                .map(|(k, v)| -> Result<(Value, Value)> {
                    Ok((cx.cast(k, from_key, to_key)?, cx.cast(v, from_value, to_value)?))
                })
                .collect::<Result<Vec<_>>>()?;
            // Converted keys may collide; the later entry replaces the earlier one.
            if passes_through(from_key, to_key) {
                Ok(Value::Map(converted))
            } else {
                Ok(Value::Map(dedup_entries(converted)))
            }
        }
        _ => Err(unsupported(source, dest)),
    }
}

fn unsupported(source: &TypeRef, dest: &TypeRef) -> CoercionError {
    CoercionError::UnsupportedCoercion {
        from: source.name.clone(),
        to: dest.name.clone(),
    }
}

/// Elements can be reused without conversion. A boxed element never passes
/// through into a primitive slot, since it may hold null.
fn passes_through(from: &TypeRef, to: &TypeRef) -> bool {
    to.accepts(from) && !(to.is_primitive() && !from.is_primitive())
}

fn elements(value: Value, source: &TypeRef) -> Result<Vec<Value>> {
    match value {
        Value::Array(array) => Ok(array.into_values()),
        Value::List(items) | Value::Set(items) => Ok(items),
        other => Err(CoercionError::mismatch(source.name.clone(), other.kind_name())),
    }
}

fn cast_elements(items: Vec<Value>, from: &TypeRef, to: &TypeRef, cx: &CastContext<'_>) -> Result<Vec<Value>> {
    if passes_through(from, to) {
        return Ok(items);
    }
    items
        .into_iter()
        .map(|item| cx.cast(item, from, to))
        .collect()
}

fn to_array(value: Value, source: &TypeRef, from: &TypeRef, to: &TypeRef, cx: &CastContext<'_>) -> Result<Value> {
    let items = match (value, to.kind.clone()) {
        (Value::Array(array), TypeKind::Primitive(kind)) if array.primitive_kind().is_some() => {
            match bulk(array, kind, cx.engine().config().numeric_widening) {
                Ok(converted) => return Ok(Value::Array(converted)),
                Err(array) => array.into_values(),
            }
        }
        (other, _) => elements(other, source)?,
    };
    let converted = cast_elements(items, from, to, cx)?;
    Ok(Value::Array(ArrayValue::from_values(to, converted)?))
}

/// Convert a primitive array without boxing its elements. Hands the array
/// back when no bulk path exists for the kind pair.
fn bulk(array: ArrayValue, to: PrimitiveKind, widening: bool) -> std::result::Result<ArrayValue, ArrayValue> {
    use ArrayValue as A;
    use PrimitiveKind as P;

    match (array, to) {
        (array, kind) if array.primitive_kind() == Some(kind) => Ok(array),
        (A::F32(v), P::F64) => Ok(A::F64(v.into_iter().map(f64::from).collect())),
        (A::F64(v), P::F32) => Ok(A::F32(v.into_iter().map(|x| x as f32).collect())),
        (A::I8(v), P::I16) if widening => Ok(A::I16(v.into_iter().map(i16::from).collect())),
        (A::I8(v), P::I32) if widening => Ok(A::I32(v.into_iter().map(i32::from).collect())),
        (A::I8(v), P::I64) if widening => Ok(A::I64(v.into_iter().map(i64::from).collect())),
        (A::I16(v), P::I32) if widening => Ok(A::I32(v.into_iter().map(i32::from).collect())),
        (A::I16(v), P::I64) if widening => Ok(A::I64(v.into_iter().map(i64::from).collect())),
        (A::I32(v), P::I64) if widening => Ok(A::I64(v.into_iter().map(i64::from).collect())),
        (A::I32(v), P::F64) if widening => Ok(A::F64(v.into_iter().map(f64::from).collect())),
        (array, _) => Err(array),
    }
}
