// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::float_cmp)] // Test assertions with constants
#![allow(clippy::unreadable_literal)] // Large test constants

//! Scalar, container and null handling through the public cast API.

use bytes::Bytes;
use chrono::{TimeZone, Utc};
use thrift_coerce::{
    ArrayValue, CoercionEngine, CoercionError, PrimitiveKind, TypeRef, Value, ValueEnvelope,
};

fn boxed(kind: PrimitiveKind) -> TypeRef {
    TypeRef::boxed(kind)
}

#[test]
fn test_identity_returns_value_unchanged() {
    let engine = CoercionEngine::new();
    let samples = [
        (TypeRef::string(), Value::from("hello")),
        (TypeRef::i32(), Value::I32(-7)),
        (TypeRef::binary(), Value::Binary(vec![0, 1, 2])),
        (TypeRef::list(TypeRef::i64()), Value::list([1i64, 2])),
    ];
    for (ty, value) in samples {
        assert_eq!(engine.cast(value.clone(), &ty, &ty).unwrap(), value);
    }
}

#[test]
fn test_boxed_and_primitive_are_interchangeable() {
    let engine = CoercionEngine::new();
    let out = engine
        .cast(Value::I64(5), &TypeRef::i64(), &boxed(PrimitiveKind::I64))
        .unwrap();
    assert_eq!(out, Value::I64(5));
    let out = engine
        .cast(Value::I64(5), &boxed(PrimitiveKind::I64), &TypeRef::i64())
        .unwrap();
    assert_eq!(out, Value::I64(5));
}

#[test]
fn test_null_rules() {
    let engine = CoercionEngine::new();
    assert_eq!(
        engine
            .cast(Value::Null, &TypeRef::string(), &TypeRef::url())
            .unwrap(),
        Value::Null
    );
    assert_eq!(
        engine
            .cast(Value::Null, &boxed(PrimitiveKind::F64), &boxed(PrimitiveKind::F32))
            .unwrap(),
        Value::Null
    );
    assert!(matches!(
        engine.cast(Value::Null, &boxed(PrimitiveKind::F64), &TypeRef::f32()),
        Err(CoercionError::NullToPrimitive { .. })
    ));
    assert!(matches!(
        engine.cast(Value::Null, &boxed(PrimitiveKind::I64), &TypeRef::date()),
        Ok(Value::Null)
    ));
}

#[test]
fn test_bytes_round_trip() {
    let engine = CoercionEngine::new();
    let buffer = engine
        .cast(Value::Binary(vec![9, 8, 7]), &TypeRef::binary(), &TypeRef::buffer())
        .unwrap();
    assert_eq!(buffer, Value::Buffer(Bytes::from_static(&[9, 8, 7])));
    let binary = engine
        .cast(buffer, &TypeRef::buffer(), &TypeRef::binary())
        .unwrap();
    assert_eq!(binary, Value::Binary(vec![9, 8, 7]));
}

#[test]
fn test_double_to_float_overflow_is_infinite() {
    let engine = CoercionEngine::new();
    let out = engine
        .cast(Value::F64(1e300), &TypeRef::f64(), &TypeRef::f32())
        .unwrap();
    assert_eq!(out, Value::F32(f32::INFINITY));

    let out = engine
        .cast(Value::F64(-1e300), &boxed(PrimitiveKind::F64), &TypeRef::f32())
        .unwrap();
    assert_eq!(out, Value::F32(f32::NEG_INFINITY));
}

#[test]
fn test_date_round_trip() {
    let engine = CoercionEngine::new();
    let when = Utc.timestamp_millis_opt(86_400_000).unwrap();
    let millis = engine
        .cast(Value::Date(when), &TypeRef::date(), &boxed(PrimitiveKind::I64))
        .unwrap();
    assert_eq!(millis, Value::I64(86_400_000));
    let back = engine
        .cast(millis, &boxed(PrimitiveKind::I64), &TypeRef::date())
        .unwrap();
    assert_eq!(back, Value::Date(when));
}

#[test]
fn test_array_list_round_trip() {
    let engine = CoercionEngine::new();
    let array_type = TypeRef::array(TypeRef::f32());
    let list_type = TypeRef::list(boxed(PrimitiveKind::F32));
    let array = Value::Array(ArrayValue::F32(vec![0.25, -1.0, 8.0]));

    let list = engine.cast(array.clone(), &array_type, &list_type).unwrap();
    assert_eq!(list, Value::list([0.25f32, -1.0, 8.0]));
    let back = engine.cast(list, &list_type, &array_type).unwrap();
    assert_eq!(back, array);
}

#[test]
fn test_list_with_null_into_primitive_array_fails() {
    let engine = CoercionEngine::new();
    let err = engine
        .cast(
            Value::List(vec![Value::I32(1), Value::Null]),
            &TypeRef::list(boxed(PrimitiveKind::I32)),
            &TypeRef::array(TypeRef::i32()),
        )
        .unwrap_err();
    assert!(matches!(err, CoercionError::NullToPrimitive { .. }));
}

#[test]
fn test_nested_containers_convert_elementwise() {
    let engine = CoercionEngine::new();
    let source = TypeRef::map(TypeRef::string(), TypeRef::list(TypeRef::i32()));
    let dest = TypeRef::map(TypeRef::string(), TypeRef::set(TypeRef::i64()));
    let value = Value::Map(vec![(
        Value::from("k"),
        Value::list([3i32, 3, 4]),
    )]);
    let out = engine.cast(value, &source, &dest).unwrap();
    assert_eq!(
        out,
        Value::Map(vec![(Value::from("k"), Value::Set(vec![Value::I64(3), Value::I64(4)]))])
    );
}

#[test]
fn test_wildcard_elements() {
    let engine = CoercionEngine::new();
    let out = engine
        .cast(
            Value::List(vec![Value::from("a"), Value::I32(1)]),
            &TypeRef::list(TypeRef::string()),
            &TypeRef::list(TypeRef::any()),
        )
        .unwrap();
    assert_eq!(out.as_elements().map(<[Value]>::len), Some(2));

    let err = engine
        .cast(
            Value::List(vec![]),
            &TypeRef::list(TypeRef::set(TypeRef::any())),
            &TypeRef::list(TypeRef::set(TypeRef::string())),
        )
        .unwrap_err();
    assert!(matches!(err, CoercionError::UnsupportedCoercion { .. }));
}

#[test]
fn test_uri_and_url_share_a_kind() {
    let engine = CoercionEngine::new();
    let url = engine
        .cast(
            Value::from("urn:isbn:0451450523"),
            &TypeRef::string(),
            &TypeRef::url(),
        )
        .unwrap();
    let text = engine.cast(url, &TypeRef::url(), &TypeRef::string()).unwrap();
    assert_eq!(text, Value::from("urn:isbn:0451450523"));
}

#[test]
fn test_envelope_cast() {
    let engine = CoercionEngine::new();
    let envelope = ValueEnvelope::new(TypeRef::i16(), Value::I16(300));
    assert!(envelope.conforms());
    let out = engine.cast_envelope(envelope, &TypeRef::i64()).unwrap();
    assert_eq!(out.declared_type, TypeRef::i64());
    assert_eq!(out.value, Value::I64(300));
}

#[test]
fn test_value_contradicting_declared_type() {
    let engine = CoercionEngine::new();
    assert!(matches!(
        engine.cast(Value::I64(1), &TypeRef::i32(), &TypeRef::i64()),
        Err(CoercionError::TypeMismatch { .. })
    ));
}
