// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type descriptors.
//!
//! A [`TypeRef`] names a declared type on one side of a conversion. Identity
//! is the canonical name: two `TypeRef`s built independently for `list<i64>`
//! are the same type, and two struct types are the same type only when their
//! qualified names match. Generated types from the two toolchains therefore
//! carry distinct qualified names (`apache.User` vs `swift.User`).
//!
//! Canonical names:
//!
//! | Kind | Name |
//! |------|------|
//! | primitive | `bool`, `i8`, `i16`, `i32`, `i64`, `f32`, `f64` |
//! | boxed primitive | `i32?` (nullable wrapper) |
//! | scalars | `string`, `binary`, `buffer`, `date`, `url`, `any` |
//! | containers | `array<T>`, `list<T>`, `set<T>`, `map<K,V>` |
//! | enum / struct | qualified type name |

use crate::descriptor::{StructDescriptor, ThriftStruct};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Canonical type identity.
pub type TypeName = Arc<str>;

/// Primitive type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl PrimitiveKind {
    /// All primitive kinds, in declaration order.
    pub const ALL: [PrimitiveKind; 7] = [
        Self::Bool,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::F32,
        Self::F64,
    ];

    /// Canonical name of the primitive.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }

    /// Check if `self` converts to `target` without losing information.
    ///
    /// Only strict widenings are listed; `F64 -> F32` is handled by the
    /// float/double built-ins and is lossy.
    pub fn widens_to(self, target: PrimitiveKind) -> bool {
        use PrimitiveKind::*;
        matches!(
            (self, target),
            (I8, I16) | (I8, I32) | (I8, I64) | (I16, I32) | (I16, I64) | (I32, I64) | (I32, F64)
        )
    }
}

/// Type kind enumeration.
#[derive(Debug, Clone)]
pub enum TypeKind {
    /// Non-nullable primitive.
    Primitive(PrimitiveKind),
    /// Nullable wrapper around a primitive.
    Boxed(PrimitiveKind),
    /// UTF-8 string.
    String,
    /// Owned byte array.
    Binary,
    /// Shared byte buffer.
    Buffer,
    /// UTC timestamp.
    Date,
    /// Absolute URL (also used for URIs).
    Url,
    /// Wildcard: accepts any value.
    Any,
    /// Fixed-shape array; primitive elements are stored unboxed.
    Array(TypeRef),
    /// Ordered list.
    List(TypeRef),
    /// Set (unique elements, insertion ordered).
    Set(TypeRef),
    /// Map of key to value.
    Map(TypeRef, TypeRef),
    /// Enumeration.
    Enum(Arc<EnumDescriptor>),
    /// Struct-like type (struct or exception).
    Struct(StructHandle),
}

/// Entry point to a struct type's descriptor.
///
/// Holds the function that produces the [`StructDescriptor`]; the engine
/// calls it at most once per type and caches the result.
#[derive(Clone, Copy)]
pub struct StructHandle {
    describe: fn() -> StructDescriptor,
}

impl StructHandle {
    /// Create a handle from a describe function.
    pub fn new(describe: fn() -> StructDescriptor) -> Self {
        Self { describe }
    }

    /// Produce a fresh descriptor (uncached).
    pub fn describe(&self) -> StructDescriptor {
        (self.describe)()
    }
}

impl fmt::Debug for StructHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StructHandle")
    }
}

/// A complete type descriptor.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    /// Canonical type name.
    pub name: TypeName,
    /// Type kind.
    pub kind: TypeKind,
}

impl TypeDescriptor {
    /// Check if this is a non-nullable primitive.
    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive(_))
    }

    /// Primitive kind of a primitive or boxed type.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self.kind {
            TypeKind::Primitive(p) | TypeKind::Boxed(p) => Some(p),
            _ => None,
        }
    }

    /// Check if this is a struct-like type.
    pub fn is_struct(&self) -> bool {
        matches!(self.kind, TypeKind::Struct(_))
    }

    /// Check if this is an enumeration.
    pub fn is_enum(&self) -> bool {
        matches!(self.kind, TypeKind::Enum(_))
    }

    /// Check if this is the wildcard type.
    pub fn is_any(&self) -> bool {
        matches!(self.kind, TypeKind::Any)
    }

    /// Check if this is an array, list, set or map.
    pub fn is_container(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Array(_) | TypeKind::List(_) | TypeKind::Set(_) | TypeKind::Map(_, _)
        )
    }

    /// Element type of an array, list or set.
    pub fn element_type(&self) -> Option<&TypeRef> {
        match &self.kind {
            TypeKind::Array(e) | TypeKind::List(e) | TypeKind::Set(e) => Some(e),
            _ => None,
        }
    }

    /// Enum descriptor if this is an enumeration.
    pub fn enum_descriptor(&self) -> Option<&Arc<EnumDescriptor>> {
        match &self.kind {
            TypeKind::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Check if a value declared as `source` can be used where `self` is
    /// declared, without any conversion.
    ///
    /// True for identical types, for the wildcard destination, and across
    /// primitive/boxed duality of the same kind (null is checked earlier by
    /// the engine).
    pub fn accepts(&self, source: &TypeDescriptor) -> bool {
        if self.is_any() || self.name == source.name {
            return true;
        }
        match (&self.kind, &source.kind) {
            (TypeKind::Primitive(a), TypeKind::Boxed(b))
            | (TypeKind::Boxed(a), TypeKind::Primitive(b)) => a == b,
            _ => false,
        }
    }

    /// Check if a container type nests a wildcard below its first level
    /// (`list<list<any>>`, `map<string, set<any>>`).
    pub fn has_nested_wildcard(&self) -> bool {
        fn contains_any(ty: &TypeDescriptor) -> bool {
            match &ty.kind {
                TypeKind::Any => true,
                TypeKind::Array(e) | TypeKind::List(e) | TypeKind::Set(e) => contains_any(e),
                TypeKind::Map(k, v) => contains_any(k) || contains_any(v),
                _ => false,
            }
        }
        match &self.kind {
            TypeKind::Array(e) | TypeKind::List(e) | TypeKind::Set(e) => {
                e.is_container() && contains_any(e)
            }
            TypeKind::Map(k, v) => {
                (k.is_container() && contains_any(k)) || (v.is_container() && contains_any(v))
            }
            _ => false,
        }
    }
}

/// Shared handle to a [`TypeDescriptor`]; equality and hashing use the
/// canonical name.
#[derive(Clone)]
pub struct TypeRef(Arc<TypeDescriptor>);

impl TypeRef {
    /// Create a type reference from a name and kind.
    pub fn new(name: impl Into<TypeName>, kind: TypeKind) -> Self {
        Self(Arc::new(TypeDescriptor {
            name: name.into(),
            kind,
        }))
    }

    /// Non-nullable primitive type.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::new(kind.name(), TypeKind::Primitive(kind))
    }

    /// Nullable wrapper of a primitive type.
    pub fn boxed(kind: PrimitiveKind) -> Self {
        Self::new(format!("{}?", kind.name()), TypeKind::Boxed(kind))
    }

    pub fn bool() -> Self {
        Self::primitive(PrimitiveKind::Bool)
    }

    pub fn i8() -> Self {
        Self::primitive(PrimitiveKind::I8)
    }

    pub fn i16() -> Self {
        Self::primitive(PrimitiveKind::I16)
    }

    pub fn i32() -> Self {
        Self::primitive(PrimitiveKind::I32)
    }

    pub fn i64() -> Self {
        Self::primitive(PrimitiveKind::I64)
    }

    pub fn f32() -> Self {
        Self::primitive(PrimitiveKind::F32)
    }

    pub fn f64() -> Self {
        Self::primitive(PrimitiveKind::F64)
    }

    pub fn string() -> Self {
        Self::new("string", TypeKind::String)
    }

    pub fn binary() -> Self {
        Self::new("binary", TypeKind::Binary)
    }

    pub fn buffer() -> Self {
        Self::new("buffer", TypeKind::Buffer)
    }

    pub fn date() -> Self {
        Self::new("date", TypeKind::Date)
    }

    pub fn url() -> Self {
        Self::new("url", TypeKind::Url)
    }

    pub fn any() -> Self {
        Self::new("any", TypeKind::Any)
    }

    /// Array of `element`.
    pub fn array(element: TypeRef) -> Self {
        Self::new(format!("array<{}>", element.name), TypeKind::Array(element))
    }

    /// List of `element`.
    pub fn list(element: TypeRef) -> Self {
        Self::new(format!("list<{}>", element.name), TypeKind::List(element))
    }

    /// Set of `element`.
    pub fn set(element: TypeRef) -> Self {
        Self::new(format!("set<{}>", element.name), TypeKind::Set(element))
    }

    /// Map from `key` to `value`.
    pub fn map(key: TypeRef, value: TypeRef) -> Self {
        Self::new(
            format!("map<{},{}>", key.name, value.name),
            TypeKind::Map(key, value),
        )
    }

    /// Enumeration with an explicit variant table.
    pub fn enumeration(name: impl Into<TypeName>, descriptor: EnumDescriptor) -> Self {
        Self::new(name, TypeKind::Enum(Arc::new(descriptor)))
    }

    /// Enumeration backed by a Rust enum.
    pub fn enum_of<E: ThriftEnum>() -> Self {
        Self::enumeration(E::TYPE_NAME, EnumDescriptor::new(E::variants()))
    }

    /// Struct-like type backed by a Rust struct.
    pub fn structure<T: ThriftStruct>() -> Self {
        Self::new(T::TYPE_NAME, TypeKind::Struct(StructHandle::new(T::describe)))
    }

    /// Struct-like type with a free-standing describe function.
    pub fn struct_with(name: impl Into<TypeName>, describe: fn() -> StructDescriptor) -> Self {
        Self::new(name, TypeKind::Struct(StructHandle::new(describe)))
    }
}

impl Deref for TypeRef {
    type Target = TypeDescriptor;

    fn deref(&self) -> &TypeDescriptor {
        &self.0
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({})", self.name)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Enumeration type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDescriptor {
    /// Enum variants, in declaration order.
    pub variants: Vec<EnumVariant>,
}

impl EnumDescriptor {
    /// Create enum descriptor.
    pub fn new(variants: Vec<EnumVariant>) -> Self {
        Self { variants }
    }

    /// Get variant by name.
    pub fn variant(&self, name: &str) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| &*v.name == name)
    }

    /// Get variant by value.
    pub fn variant_by_value(&self, value: i32) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| v.value == value)
    }
}

/// Enum variant.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumVariant {
    /// Variant name.
    pub name: Arc<str>,
    /// Variant value (ordinal or explicit Thrift value).
    pub value: i32,
}

impl EnumVariant {
    /// Create enum variant.
    pub fn new(name: impl Into<Arc<str>>, value: i32) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A Rust enum generated for one of the Thrift toolchains.
pub trait ThriftEnum: Copy + Send + Sync + 'static {
    /// Qualified type name.
    const TYPE_NAME: &'static str;

    /// Variant table.
    fn variants() -> Vec<EnumVariant>;

    /// Symbolic name of this member.
    fn name(self) -> &'static str;

    /// Numeric value of this member.
    fn value(self) -> i32;

    /// Member with the given symbolic name.
    fn from_name(name: &str) -> Option<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_names() {
        assert_eq!(&*TypeRef::i32().name, "i32");
        assert_eq!(&*TypeRef::boxed(PrimitiveKind::I64).name, "i64?");
        assert_eq!(&*TypeRef::list(TypeRef::string()).name, "list<string>");
        assert_eq!(
            &*TypeRef::map(TypeRef::string(), TypeRef::set(TypeRef::f64())).name,
            "map<string,set<f64>>"
        );
        assert_eq!(&*TypeRef::array(TypeRef::bool()).name, "array<bool>");
    }

    #[test]
    fn test_identity_by_name() {
        assert_eq!(TypeRef::list(TypeRef::i64()), TypeRef::list(TypeRef::i64()));
        assert_ne!(TypeRef::list(TypeRef::i64()), TypeRef::set(TypeRef::i64()));
    }

    #[test]
    fn test_accepts_boxed_duality() {
        let prim = TypeRef::i32();
        let boxed = TypeRef::boxed(PrimitiveKind::I32);
        assert!(prim.accepts(&boxed));
        assert!(boxed.accepts(&prim));
        assert!(!TypeRef::i64().accepts(&prim));
        assert!(TypeRef::any().accepts(&TypeRef::string()));
        assert!(!TypeRef::string().accepts(&TypeRef::any()));
    }

    #[test]
    fn test_nested_wildcard() {
        assert!(!TypeRef::list(TypeRef::any()).has_nested_wildcard());
        assert!(TypeRef::list(TypeRef::list(TypeRef::any())).has_nested_wildcard());
        assert!(TypeRef::map(TypeRef::string(), TypeRef::set(TypeRef::any())).has_nested_wildcard());
        assert!(!TypeRef::map(TypeRef::string(), TypeRef::any()).has_nested_wildcard());
    }

    #[test]
    fn test_widening() {
        assert!(PrimitiveKind::I32.widens_to(PrimitiveKind::I64));
        assert!(PrimitiveKind::I8.widens_to(PrimitiveKind::I32));
        assert!(!PrimitiveKind::I64.widens_to(PrimitiveKind::I32));
        assert!(!PrimitiveKind::F64.widens_to(PrimitiveKind::F32));
    }

    #[test]
    fn test_enum_descriptor() {
        let desc = EnumDescriptor::new(vec![
            EnumVariant::new("RED", 0),
            EnumVariant::new("GREEN", 1),
            EnumVariant::new("BLUE", 2),
        ]);
        assert_eq!(desc.variant("GREEN").map(|v| v.value), Some(1));
        assert_eq!(desc.variant_by_value(2).map(|v| &*v.name), Some("BLUE"));
        assert!(desc.variant("PURPLE").is_none());
    }
}
