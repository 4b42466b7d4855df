// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Name-based enum conversion.
//!
//! Members are matched by symbolic name, so renumbering between the two
//! toolchains is tolerated but renaming is not.

use super::CastContext;
use crate::error::{CoercionError, Result};
use crate::registry::Converter;
use crate::types::{EnumVariant, TypeRef};
use crate::value::{enum_descriptor, EnumValue, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Converts members of one enum into the same-named members of another.
pub(crate) struct EnumConverter {
    source: TypeRef,
    dest: TypeRef,
    /// Source ordinal -> source name, for raw ordinals.
    ordinals: HashMap<i32, Arc<str>>,
    /// Name -> destination member.
    members: HashMap<Arc<str>, EnumVariant>,
}

impl EnumConverter {
    pub(crate) fn new(source: &TypeRef, dest: &TypeRef) -> Result<Self> {
        let ordinals = enum_descriptor(source)?
            .variants
            .iter()
            .map(|v| (v.value, v.name.clone()))
            .collect();
        let members: HashMap<_, _> = enum_descriptor(dest)?
            .variants
            .iter()
            .map(|v| (v.name.clone(), v.clone()))
            .collect();
        log::debug!(
            "[engine] enum converter {} -> {} ({} members)",
            source,
            dest,
            members.len()
        );
        Ok(Self {
            source: source.clone(),
            dest: dest.clone(),
            ordinals,
            members,
        })
    }

    fn member_name(&self, value: Value) -> Result<Arc<str>> {
        match value {
            Value::Enum(member) => Ok(member.name),
            Value::I32(ordinal) => {
                self.ordinals
                    .get(&ordinal)
                    .cloned()
                    .ok_or_else(|| CoercionError::NoSuchEnumMember {
                        enum_type: self.source.name.clone(),
                        member: ordinal.to_string(),
                    })
            }
            other => Err(CoercionError::mismatch(
                self.source.name.clone(),
                other.kind_name(),
            )),
        }
    }
}

impl Converter for EnumConverter {
    fn convert(&self, value: Value, _cx: &CastContext<'_>) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        let name = self.member_name(value)?;
        let variant = self
            .members
            .get(&name)
            .ok_or_else(|| CoercionError::NoSuchEnumMember {
                enum_type: self.dest.name.clone(),
                member: name.to_string(),
            })?;
        Ok(Value::Enum(EnumValue {
            enum_type: self.dest.clone(),
            name: variant.name.clone(),
            value: variant.value,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CoercionEngine;
    use crate::types::EnumDescriptor;

    fn palette(name: &str, variants: &[(&str, i32)]) -> TypeRef {
        TypeRef::enumeration(
            name,
            EnumDescriptor::new(
                variants
                    .iter()
                    .map(|(n, v)| EnumVariant::new(*n, *v))
                    .collect(),
            ),
        )
    }

    #[test]
    fn test_renumbered_member() {
        let engine = CoercionEngine::new();
        let left = palette("a.Color", &[("RED", 0), ("GREEN", 1)]);
        let right = palette("b.Color", &[("GREEN", 0), ("BLUE", 1), ("RED", 2)]);
        let converter = EnumConverter::new(&left, &right).unwrap();

        let red = Value::Enum(EnumValue::named(&left, "RED").unwrap());
        let out = converter.convert(red, &engine.context()).unwrap();
        match out {
            Value::Enum(e) => {
                assert_eq!(&*e.name, "RED");
                assert_eq!(e.value, 2);
                assert_eq!(e.enum_type, right);
            }
            other => panic!("unexpected value: {other:?}"),
        }
    }

    #[test]
    fn test_raw_ordinal_uses_source_table() {
        let engine = CoercionEngine::new();
        let left = palette("a.Color", &[("RED", 0), ("GREEN", 1)]);
        let right = palette("b.Color", &[("GREEN", 0), ("RED", 2)]);
        let converter = EnumConverter::new(&left, &right).unwrap();

        let out = converter.convert(Value::I32(1), &engine.context()).unwrap();
        assert_eq!(out.enum_name(), Some("GREEN"));
        assert!(matches!(
            converter.convert(Value::I32(9), &engine.context()),
            Err(CoercionError::NoSuchEnumMember { .. })
        ));
    }

    #[test]
    fn test_missing_member() {
        let engine = CoercionEngine::new();
        let left = palette("a.Color", &[("PURPLE", 0)]);
        let right = palette("b.Color", &[("RED", 0)]);
        let converter = EnumConverter::new(&left, &right).unwrap();
        let purple = Value::Enum(EnumValue::named(&left, "PURPLE").unwrap());
        match converter.convert(purple, &engine.context()) {
            Err(CoercionError::NoSuchEnumMember { enum_type, member }) => {
                assert_eq!(&*enum_type, "b.Color");
                assert_eq!(member, "PURPLE");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
