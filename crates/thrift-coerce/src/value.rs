// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic value types.

use crate::descriptor::ThriftStruct;
use crate::error::{CoercionError, Result};
use crate::types::{EnumDescriptor, PrimitiveKind, ThriftEnum, TypeKind, TypeRef};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::any::Any;
use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};
use std::sync::Arc;
use url::Url;

/// A dynamic value of any kind the engine can coerce.
#[derive(Debug, Clone)]
pub enum Value {
    // Primitives (also used for boxed wrappers)
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),

    // Scalars
    String(String),
    Binary(Vec<u8>),
    Buffer(Bytes),
    Date(DateTime<Utc>),
    Url(Url),

    // Composites
    Array(ArrayValue),
    List(Vec<Value>),
    Set(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Enum(EnumValue),
    Struct(Arc<dyn StructObject>),

    // Special
    Null,
}

impl Value {
    /// Wrap a generated struct.
    pub fn structure<T: ThriftStruct>(value: T) -> Self {
        Self::Struct(Arc::new(value))
    }

    /// Wrap a generated enum member.
    pub fn enumeration<E: ThriftEnum>(member: E) -> Self {
        Self::Enum(EnumValue::of(member))
    }

    /// Build a list from anything convertible to values.
    pub fn list<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a set, dropping duplicates while keeping first-seen order.
    pub fn set<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::Set(dedup(items.into_iter().map(Into::into).collect()))
    }

    /// Check if value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the value's shape, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::String(_) => "string",
            Self::Binary(_) => "binary",
            Self::Buffer(_) => "buffer",
            Self::Date(_) => "date",
            Self::Url(_) => "url",
            Self::Array(_) => "array",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Map(_) => "map",
            Self::Enum(_) => "enum",
            Self::Struct(_) => "struct",
            Self::Null => "null",
        }
    }

    /// Type the value carries at runtime, when it is self-describing.
    ///
    /// Lists, sets, maps and object arrays do not record their element type
    /// and return `None`, as does `Null`.
    pub fn runtime_type(&self) -> Option<TypeRef> {
        let ty = match self {
            Self::Bool(_) => TypeRef::bool(),
            Self::I8(_) => TypeRef::i8(),
            Self::I16(_) => TypeRef::i16(),
            Self::I32(_) => TypeRef::i32(),
            Self::I64(_) => TypeRef::i64(),
            Self::F32(_) => TypeRef::f32(),
            Self::F64(_) => TypeRef::f64(),
            Self::String(_) => TypeRef::string(),
            Self::Binary(_) => TypeRef::binary(),
            Self::Buffer(_) => TypeRef::buffer(),
            Self::Date(_) => TypeRef::date(),
            Self::Url(_) => TypeRef::url(),
            Self::Array(arr) => TypeRef::array(TypeRef::primitive(arr.primitive_kind()?)),
            Self::Enum(e) => e.enum_type.clone(),
            Self::Struct(s) => s.struct_type(),
            Self::List(_) | Self::Set(_) | Self::Map(_) | Self::Null => return None,
        };
        Some(ty)
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i32.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::I32(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as f32.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::F32(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get list or set elements.
    pub fn as_elements(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) | Self::Set(v) => Some(v),
            _ => None,
        }
    }

    /// Get enum member name.
    pub fn enum_name(&self) -> Option<&str> {
        match self {
            Self::Enum(e) => Some(&e.name),
            _ => None,
        }
    }

    /// Try to get the struct object.
    pub fn as_struct(&self) -> Option<&Arc<dyn StructObject>> {
        match self {
            Self::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the wrapped struct as its concrete type.
    pub fn downcast_struct<T: ThriftStruct>(&self) -> Option<&T> {
        self.as_struct()?.as_any().downcast_ref::<T>()
    }

    /// Take the wrapped struct as its concrete type.
    pub fn into_struct<T: ThriftStruct>(self) -> Result<Arc<T>> {
        match self {
            Self::Struct(object) => {
                let found = object.type_name();
                object
                    .into_any()
                    .downcast::<T>()
                    .map_err(|_| CoercionError::mismatch(T::TYPE_NAME, found))
            }
            other => Err(CoercionError::mismatch(T::TYPE_NAME, other.kind_name())),
        }
    }

    /// Convert an enum member into the generated Rust enum.
    pub fn into_enum<E: ThriftEnum>(self) -> Result<E> {
        match self {
            Self::Enum(member) => member.to_enum(),
            other => Err(CoercionError::mismatch(E::TYPE_NAME, other.kind_name())),
        }
    }

    /// Unpack the elements of a list, set or array.
    pub fn into_vec<T: FromValue>(self) -> Result<Vec<T>> {
        let items = match self {
            Self::List(items) | Self::Set(items) => items,
            Self::Array(array) => array.into_values(),
            other => return Err(CoercionError::mismatch("list", other.kind_name())),
        };
        items.into_iter().map(T::from_value).collect()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::I8(a), Self::I8(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a == b,
            (Self::F64(a), Self::F64(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Binary(a), Self::Binary(b)) => a == b,
            (Self::Buffer(a), Self::Buffer(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Url(a), Self::Url(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::List(a), Self::List(b)) | (Self::Set(a), Self::Set(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Enum(a), Self::Enum(b)) => a == b,
            (Self::Struct(a), Self::Struct(b)) => Arc::ptr_eq(a, b) || a.dyn_eq(&**b),
            (Self::Null, Self::Null) => true,
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Deduplication
// ---------------------------------------------------------------------------

/// Hash agreeing with `PartialEq`: equal values always hash alike. Floats
/// fold `-0.0` onto `0.0`; struct contents are compared, not hashed.
fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    std::mem::discriminant(value).hash(state);
    match value {
        Value::Bool(v) => v.hash(state),
        Value::I8(v) => v.hash(state),
        Value::I16(v) => v.hash(state),
        Value::I32(v) => v.hash(state),
        Value::I64(v) => v.hash(state),
        Value::F32(v) => (*v + 0.0).to_bits().hash(state),
        Value::F64(v) => (*v + 0.0).to_bits().hash(state),
        Value::String(v) => v.hash(state),
        Value::Binary(v) => v.hash(state),
        Value::Buffer(v) => v.hash(state),
        Value::Date(v) => v.hash(state),
        Value::Url(v) => v.hash(state),
        Value::Array(array) => {
            std::mem::discriminant(array).hash(state);
            array.len().hash(state);
        }
        Value::List(items) | Value::Set(items) => {
            items.len().hash(state);
            items.iter().for_each(|item| hash_value(item, state));
        }
        Value::Map(entries) => {
            entries.len().hash(state);
            entries.iter().for_each(|(k, v)| {
                hash_value(k, state);
                hash_value(v, state);
            });
        }
        Value::Enum(member) => member.name.hash(state),
        Value::Struct(object) => object.type_name().hash(state),
        Value::Null => {}
    }
}

/// Index from value hash to positions already kept.
struct SeenIndex {
    hasher: RandomState,
    buckets: HashMap<u64, Vec<usize>>,
}

impl SeenIndex {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            hasher: RandomState::new(),
            buckets: HashMap::with_capacity(capacity),
        }
    }

    /// Position of a kept value equal to `value`, registering `next` as its
    /// position when there is none.
    fn find_or_insert(&mut self, value: &Value, next: usize, kept: impl Fn(usize) -> bool) -> Option<usize> {
        let mut state = self.hasher.build_hasher();
        hash_value(value, &mut state);
        let bucket = self.buckets.entry(state.finish()).or_default();
        match bucket.iter().copied().find(|&i| kept(i)) {
            Some(i) => Some(i),
            None => {
                bucket.push(next);
                None
            }
        }
    }
}

/// Remove duplicates, keeping the first occurrence of each element.
pub(crate) fn dedup(items: Vec<Value>) -> Vec<Value> {
    let mut seen = SeenIndex::with_capacity(items.len());
    let mut out: Vec<Value> = Vec::with_capacity(items.len());
    for item in items {
        if seen.find_or_insert(&item, out.len(), |i| out[i] == item).is_none() {
            out.push(item);
        }
    }
    out
}

/// Collapse entries with equal keys. The key keeps its first position and
/// the last value written for it wins.
pub(crate) fn dedup_entries(entries: Vec<(Value, Value)>) -> Vec<(Value, Value)> {
    let mut seen = SeenIndex::with_capacity(entries.len());
    let mut out: Vec<(Value, Value)> = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        match seen.find_or_insert(&key, out.len(), |i| out[i].0 == key) {
            Some(i) => out[i].1 = value,
            None => out.push((key, value)),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Arrays
// ---------------------------------------------------------------------------

/// Array storage; primitive element kinds are kept unboxed.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayValue {
    Bool(Vec<bool>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    /// Non-primitive elements (strings, structs, nested containers).
    Object(Vec<Value>),
}

impl ArrayValue {
    /// Primitive element kind, `None` for object arrays.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        let kind = match self {
            Self::Bool(_) => PrimitiveKind::Bool,
            Self::I8(_) => PrimitiveKind::I8,
            Self::I16(_) => PrimitiveKind::I16,
            Self::I32(_) => PrimitiveKind::I32,
            Self::I64(_) => PrimitiveKind::I64,
            Self::F32(_) => PrimitiveKind::F32,
            Self::F64(_) => PrimitiveKind::F64,
            Self::Object(_) => return None,
        };
        Some(kind)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            Self::Bool(v) => v.len(),
            Self::I8(v) => v.len(),
            Self::I16(v) => v.len(),
            Self::I32(v) => v.len(),
            Self::I64(v) => v.len(),
            Self::F32(v) => v.len(),
            Self::F64(v) => v.len(),
            Self::Object(v) => v.len(),
        }
    }

    /// Check if the array is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Box every element into a [`Value`].
    pub fn into_values(self) -> Vec<Value> {
        match self {
            Self::Bool(v) => v.into_iter().map(Value::Bool).collect(),
            Self::I8(v) => v.into_iter().map(Value::I8).collect(),
            Self::I16(v) => v.into_iter().map(Value::I16).collect(),
            Self::I32(v) => v.into_iter().map(Value::I32).collect(),
            Self::I64(v) => v.into_iter().map(Value::I64).collect(),
            Self::F32(v) => v.into_iter().map(Value::F32).collect(),
            Self::F64(v) => v.into_iter().map(Value::F64).collect(),
            Self::Object(v) => v,
        }
    }

    /// Pack values into an array whose element type is `element`.
    ///
    /// Primitive element types unbox every value; a null element fails with
    /// [`CoercionError::NullToPrimitive`] since the slot cannot hold it.
    pub fn from_values(element: &TypeRef, values: Vec<Value>) -> Result<Self> {
        let kind = match element.kind {
            TypeKind::Primitive(kind) => kind,
            _ => return Ok(Self::Object(values)),
        };

        fn unbox<T>(
            element: &TypeRef,
            values: Vec<Value>,
            pick: impl Fn(Value) -> std::result::Result<T, Value>,
        ) -> Result<Vec<T>> {
            values
                .into_iter()
                .map(|value| match pick(value) {
                    Ok(v) => Ok(v),
                    Err(Value::Null) => Err(CoercionError::NullToPrimitive {
                        from: "null".into(),
                        to: element.name.clone(),
                    }),
                    Err(other) => Err(CoercionError::mismatch(
                        element.name.clone(),
                        other.kind_name(),
                    )),
                })
                .collect()
        }

        let array = match kind {
            PrimitiveKind::Bool => Self::Bool(unbox(element, values, |v| match v {
                Value::Bool(x) => Ok(x),
                other => Err(other),
            })?),
            PrimitiveKind::I8 => Self::I8(unbox(element, values, |v| match v {
                Value::I8(x) => Ok(x),
                other => Err(other),
            })?),
            PrimitiveKind::I16 => Self::I16(unbox(element, values, |v| match v {
                Value::I16(x) => Ok(x),
                other => Err(other),
            })?),
            PrimitiveKind::I32 => Self::I32(unbox(element, values, |v| match v {
                Value::I32(x) => Ok(x),
                other => Err(other),
            })?),
            PrimitiveKind::I64 => Self::I64(unbox(element, values, |v| match v {
                Value::I64(x) => Ok(x),
                other => Err(other),
            })?),
            PrimitiveKind::F32 => Self::F32(unbox(element, values, |v| match v {
                Value::F32(x) => Ok(x),
                other => Err(other),
            })?),
            PrimitiveKind::F64 => Self::F64(unbox(element, values, |v| match v {
                Value::F64(x) => Ok(x),
                other => Err(other),
            })?),
        };
        Ok(array)
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// An enumeration member tagged with its enum type.
#[derive(Debug, Clone)]
pub struct EnumValue {
    /// Enumeration the member belongs to.
    pub enum_type: TypeRef,
    /// Symbolic member name.
    pub name: Arc<str>,
    /// Numeric member value.
    pub value: i32,
}

impl EnumValue {
    /// Member of a generated Rust enum.
    pub fn of<E: ThriftEnum>(member: E) -> Self {
        Self {
            enum_type: TypeRef::enum_of::<E>(),
            name: member.name().into(),
            value: member.value(),
        }
    }

    /// Member of `enum_type` looked up by name.
    pub fn named(enum_type: &TypeRef, name: &str) -> Result<Self> {
        let descriptor = enum_descriptor(enum_type)?;
        let variant = descriptor
            .variant(name)
            .ok_or_else(|| CoercionError::NoSuchEnumMember {
                enum_type: enum_type.name.clone(),
                member: name.to_string(),
            })?;
        Ok(Self {
            enum_type: enum_type.clone(),
            name: variant.name.clone(),
            value: variant.value,
        })
    }

    /// Convert back to the generated Rust enum.
    pub fn to_enum<E: ThriftEnum>(&self) -> Result<E> {
        E::from_name(&self.name).ok_or_else(|| CoercionError::NoSuchEnumMember {
            enum_type: E::TYPE_NAME.into(),
            member: self.name.to_string(),
        })
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.enum_type == other.enum_type && self.name == other.name && self.value == other.value
    }
}

pub(crate) fn enum_descriptor(ty: &TypeRef) -> Result<&EnumDescriptor> {
    ty.enum_descriptor()
        .map(|d| &**d)
        .ok_or_else(|| CoercionError::mismatch(ty.name.clone(), "enum"))
}

// ---------------------------------------------------------------------------
// Struct objects
// ---------------------------------------------------------------------------

/// Type-erased instance of a generated struct.
///
/// Implemented for every [`ThriftStruct`]; the engine only ever sees
/// `Arc<dyn StructObject>`.
pub trait StructObject: Any + Send + Sync + fmt::Debug {
    /// Qualified type name.
    fn type_name(&self) -> &'static str;

    /// Runtime type of this instance.
    fn struct_type(&self) -> TypeRef;

    /// Borrow as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Convert into an `Arc<dyn Any>` for owned downcasting.
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    /// Structural equality against another object.
    fn dyn_eq(&self, other: &dyn StructObject) -> bool;
}

impl<T: ThriftStruct> StructObject for T {
    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn struct_type(&self) -> TypeRef {
        TypeRef::structure::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn dyn_eq(&self, other: &dyn StructObject) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }
}

// ---------------------------------------------------------------------------
// Conversions to and from Value
// ---------------------------------------------------------------------------

/// Trait for extracting a typed value out of a [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self>;
}

macro_rules! impl_from_value {
    ($ty:ty, $variant:ident, $name:expr) => {
        impl FromValue for $ty {
            fn from_value(value: Value) -> Result<Self> {
                match value {
                    Value::$variant(v) => Ok(v),
                    Value::Null => Err(CoercionError::NullToPrimitive {
                        from: "null".into(),
                        to: $name.into(),
                    }),
                    other => Err(CoercionError::mismatch($name, other.kind_name())),
                }
            }
        }
    };
}

impl_from_value!(bool, Bool, "bool");
impl_from_value!(i8, I8, "i8");
impl_from_value!(i16, I16, "i16");
impl_from_value!(i32, I32, "i32");
impl_from_value!(i64, I64, "i64");
impl_from_value!(f32, F32, "f32");
impl_from_value!(f64, F64, "f64");

macro_rules! impl_from_value_object {
    ($ty:ty, $variant:ident, $name:expr) => {
        impl FromValue for $ty {
            fn from_value(value: Value) -> Result<Self> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(CoercionError::mismatch($name, other.kind_name())),
                }
            }
        }
    };
}

impl_from_value_object!(String, String, "string");
impl_from_value_object!(Vec<u8>, Binary, "binary");
impl_from_value_object!(Bytes, Buffer, "buffer");
impl_from_value_object!(DateTime<Utc>, Date, "date");
impl_from_value_object!(Url, Url, "url");
impl_from_value_object!(ArrayValue, Array, "array");
impl_from_value_object!(EnumValue, Enum, "enum");
impl_from_value_object!(Arc<dyn StructObject>, Struct, "struct");

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

macro_rules! impl_into_value {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Self::$variant(v)
            }
        }
    };
}

impl_into_value!(bool, Bool);
impl_into_value!(i8, I8);
impl_into_value!(i16, I16);
impl_into_value!(i32, I32);
impl_into_value!(i64, I64);
impl_into_value!(f32, F32);
impl_into_value!(f64, F64);
impl_into_value!(String, String);
impl_into_value!(Vec<u8>, Binary);
impl_into_value!(Bytes, Buffer);
impl_into_value!(DateTime<Utc>, Date);
impl_into_value!(Url, Url);
impl_into_value!(ArrayValue, Array);
impl_into_value!(EnumValue, Enum);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
