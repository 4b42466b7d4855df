// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Built-in converters seeded into every engine.
//!
//! All of them are null-safe: null maps to null, except toward a primitive
//! destination where it fails with [`CoercionError::NullToPrimitive`].

use super::{Converter, FnConverter, TransformerRegistry};
use crate::error::{CoercionError, Result};
use crate::types::{PrimitiveKind, TypeRef};
use crate::value::{ArrayValue, Value};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use url::Url;

/// Primitive element kinds with a bulk array/list path.
const ARRAY_KINDS: [PrimitiveKind; 6] = [
    PrimitiveKind::I32,
    PrimitiveKind::I64,
    PrimitiveKind::F64,
    PrimitiveKind::F32,
    PrimitiveKind::I16,
    PrimitiveKind::Bool,
];

/// Seed every built-in converter.
pub(crate) fn seed(registry: &TransformerRegistry, numeric_widening: bool) {
    seed_bytes(registry);
    seed_floats(registry);
    seed_dates(registry);
    seed_urls(registry);
    seed_arrays(registry);
    seed_unboxing(registry);
    if numeric_widening {
        seed_widening(registry);
    }
    log::debug!("[registry] seeded {} built-in converters", registry.len());
}

fn converter<F>(from: &TypeRef, to: &TypeRef, convert: F) -> Arc<dyn Converter>
where
    F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
{
    let (from, to) = (from.clone(), to.clone());
    Arc::new(FnConverter::new(move |value: Value| {
        if !value.is_null() {
            return convert(value);
        }
        if to.is_primitive() {
            return Err(CoercionError::NullToPrimitive {
                from: from.name.clone(),
                to: to.name.clone(),
            });
        }
        Ok(Value::Null)
    }))
}

fn add<F>(registry: &TransformerRegistry, from: &TypeRef, to: &TypeRef, convert: F)
where
    F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
{
    registry.seed(from, to, converter(from, to, convert));
}

fn unexpected(declared: &'static str, value: &Value) -> CoercionError {
    CoercionError::mismatch(declared, value.kind_name())
}

/// Both nullability forms of a primitive.
fn forms(kind: PrimitiveKind) -> [TypeRef; 2] {
    [TypeRef::primitive(kind), TypeRef::boxed(kind)]
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

fn seed_bytes(registry: &TransformerRegistry) {
    let (binary, buffer) = (TypeRef::binary(), TypeRef::buffer());
    add(registry, &binary, &buffer, |value| match value {
        Value::Binary(bytes) => Ok(Value::Buffer(Bytes::from(bytes))),
        other => Err(unexpected("binary", &other)),
    });
    add(registry, &buffer, &binary, |value| match value {
        Value::Buffer(bytes) => Ok(Value::Binary(Vec::from(bytes))),
        other => Err(unexpected("buffer", &other)),
    });
}

fn seed_floats(registry: &TransformerRegistry) {
    for from in forms(PrimitiveKind::F32) {
        for to in forms(PrimitiveKind::F64) {
            add(registry, &from, &to, |value| match value {
                Value::F32(v) => Ok(Value::F64(f64::from(v))),
                other => Err(unexpected("f32", &other)),
            });
            // Narrowing is lossy: out-of-range doubles become infinities.
            add(registry, &to, &from, |value| match value {
                Value::F64(v) => Ok(Value::F32(v as f32)),
                other => Err(unexpected("f64", &other)),
            });
        }
    }
}

fn seed_dates(registry: &TransformerRegistry) {
    let date = TypeRef::date();
    for millis in forms(PrimitiveKind::I64) {
        add(registry, &date, &millis, |value| match value {
            Value::Date(d) => Ok(Value::I64(d.timestamp_millis())),
            other => Err(unexpected("date", &other)),
        });
        add(registry, &millis, &date, |value| match value {
            Value::I64(ms) => DateTime::<Utc>::from_timestamp_millis(ms)
                .map(Value::Date)
                .ok_or_else(|| {
                    CoercionError::failed("i64", "date", format!("{} ms is out of range", ms))
                }),
            other => Err(unexpected("i64", &other)),
        });
    }
}

fn seed_urls(registry: &TransformerRegistry) {
    let (url, string) = (TypeRef::url(), TypeRef::string());
    add(registry, &url, &string, |value| match value {
        Value::Url(u) => Ok(Value::String(u.into())),
        other => Err(unexpected("url", &other)),
    });
    add(registry, &string, &url, |value| match value {
        Value::String(s) => Url::parse(&s)
            .map(Value::Url)
            .map_err(|e| CoercionError::failed("string", "url", format!("'{}': {}", s, e))),
        other => Err(unexpected("string", &other)),
    });
}

// ---------------------------------------------------------------------------
// Arrays
// ---------------------------------------------------------------------------

fn seed_arrays(registry: &TransformerRegistry) {
    for kind in ARRAY_KINDS {
        let element = TypeRef::primitive(kind);
        let array = TypeRef::array(element.clone());
        for list_element in forms(kind) {
            let list = TypeRef::list(list_element);
            add(registry, &array, &list, move |value| match value {
                Value::Array(items) if items.primitive_kind() == Some(kind) => {
                    Ok(Value::List(items.into_values()))
                }
                other => Err(unexpected("array", &other)),
            });
            let element = element.clone();
            add(registry, &list, &array, move |value| match value {
                Value::List(items) => ArrayValue::from_values(&element, items).map(Value::Array),
                other => Err(unexpected("list", &other)),
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Numeric
// ---------------------------------------------------------------------------

/// Boxed to primitive of the same kind. `cast` resolves these pairs through
/// `accepts` plus its null check; the entries serve callers that apply
/// registry converters directly.
fn seed_unboxing(registry: &TransformerRegistry) {
    for kind in PrimitiveKind::ALL {
        let [primitive, boxed] = forms(kind);
        add(registry, &boxed, &primitive, Ok);
    }
}

fn seed_widening(registry: &TransformerRegistry) {
    for from in PrimitiveKind::ALL {
        for to in PrimitiveKind::ALL {
            if !from.widens_to(to) {
                continue;
            }
            for source in forms(from) {
                for dest in forms(to) {
                    add(registry, &source, &dest, move |value| widen(value, to));
                }
            }
        }
    }
}

fn widen(value: Value, to: PrimitiveKind) -> Result<Value> {
    let from = value.kind_name();
    let wide: i64 = match value {
        Value::I8(v) => v.into(),
        Value::I16(v) => v.into(),
        Value::I32(v) => v.into(),
        other => return Err(CoercionError::mismatch(to.name(), other.kind_name())),
    };
    let widened = match to {
        PrimitiveKind::I16 => i16::try_from(wide).ok().map(Value::I16),
        PrimitiveKind::I32 => i32::try_from(wide).ok().map(Value::I32),
        PrimitiveKind::I64 => Some(Value::I64(wide)),
        PrimitiveKind::F64 => i32::try_from(wide).ok().map(|v| Value::F64(v.into())),
        _ => None,
    };
    widened.ok_or_else(|| CoercionError::failed(from, to.name(), "not a widening conversion"))
}
