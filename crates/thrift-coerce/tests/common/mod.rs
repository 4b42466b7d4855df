// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared fixtures: the same IDL generated by two toolchains.
//!
//! `apache.*` types carry numeric field ids and are built through mutable
//! builders. `swift.*` types are built through constructors; some of their
//! fields only have names. Enum members are numbered differently on each side.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use std::sync::Arc;
use thrift_coerce::{
    BoxError, BuilderStrategy, Cause, CauseSummaryFields, EnumVariant, ExceptionShape, PrimitiveKind,
    Requiredness, StructDescriptor, StructDescriptorBuilder, ThriftEnum, ThriftStruct, TypeRef,
    Value,
};
use url::Url;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApacheColor {
    Red,
    Green,
    Blue,
}

impl ThriftEnum for ApacheColor {
    const TYPE_NAME: &'static str = "apache.Color";

    fn variants() -> Vec<EnumVariant> {
        vec![
            EnumVariant::new("RED", 0),
            EnumVariant::new("GREEN", 1),
            EnumVariant::new("BLUE", 2),
        ]
    }

    fn name(self) -> &'static str {
        match self {
            Self::Red => "RED",
            Self::Green => "GREEN",
            Self::Blue => "BLUE",
        }
    }

    fn value(self) -> i32 {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "RED" => Some(Self::Red),
            "GREEN" => Some(Self::Green),
            "BLUE" => Some(Self::Blue),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwiftColor {
    Green,
    Blue,
    Red,
    Purple,
}

impl ThriftEnum for SwiftColor {
    const TYPE_NAME: &'static str = "swift.Color";

    fn variants() -> Vec<EnumVariant> {
        vec![
            EnumVariant::new("GREEN", 0),
            EnumVariant::new("BLUE", 1),
            EnumVariant::new("RED", 2),
            EnumVariant::new("PURPLE", 3),
        ]
    }

    fn name(self) -> &'static str {
        match self {
            Self::Green => "GREEN",
            Self::Blue => "BLUE",
            Self::Red => "RED",
            Self::Purple => "PURPLE",
        }
    }

    fn value(self) -> i32 {
        match self {
            Self::Green => 0,
            Self::Blue => 1,
            Self::Red => 2,
            Self::Purple => 3,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "GREEN" => Some(Self::Green),
            "BLUE" => Some(Self::Blue),
            "RED" => Some(Self::Red),
            "PURPLE" => Some(Self::Purple),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Apache side (ids, builders)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ApacheAddress {
    pub street: String,
    pub zip: Option<i32>,
}

#[derive(Default)]
pub struct ApacheAddressBuilder {
    street: Option<String>,
    zip: Option<i32>,
}

impl ThriftStruct for ApacheAddress {
    const TYPE_NAME: &'static str = "apache.Address";

    fn describe() -> StructDescriptor {
        StructDescriptorBuilder::<ApacheAddress>::new()
            .field(1, "street", TypeRef::string(), Requiredness::Required, |a| {
                a.street.clone().into()
            })
            .field(2, "zip", TypeRef::boxed(PrimitiveKind::I32), Requiredness::Optional, |a| {
                a.zip.into()
            })
            .builder(
                BuilderStrategy::new(|b: ApacheAddressBuilder| {
                    Ok(ApacheAddress {
                        street: b.street.ok_or("street is required")?,
                        zip: b.zip,
                    })
                })
                .setter("street", |b: &mut ApacheAddressBuilder, v: String| {
                    b.street = Some(v)
                })
                .setter("zip", |b: &mut ApacheAddressBuilder, v: i32| b.zip = Some(v)),
            )
            .build()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApacheUser {
    pub id: i32,
    pub name: Option<String>,
    pub email: Option<String>,
    pub color: ApacheColor,
    pub tags: Vec<String>,
    pub scores: Vec<f64>,
    pub address: Option<ApacheAddress>,
    pub created_ms: Option<i64>,
    pub homepage: Option<String>,
    pub ratio: f64,
}

#[derive(Default)]
pub struct ApacheUserBuilder {
    id: Option<i32>,
    name: Option<String>,
    email: Option<String>,
    color: Option<Value>,
    tags: Option<Value>,
    scores: Option<Value>,
    address: Option<Value>,
    created_ms: Option<i64>,
    homepage: Option<String>,
    ratio: f64,
}

fn finish_apache_user(b: ApacheUserBuilder) -> Result<ApacheUser, BoxError> {
    Ok(ApacheUser {
        id: b.id.ok_or("id is required")?,
        name: b.name,
        email: b.email,
        color: match b.color {
            Some(v) => v.into_enum()?,
            None => ApacheColor::Red,
        },
        tags: b.tags.map(Value::into_vec).transpose()?.unwrap_or_default(),
        scores: b.scores.map(Value::into_vec).transpose()?.unwrap_or_default(),
        address: b
            .address
            .map(Value::into_struct::<ApacheAddress>)
            .transpose()?
            .map(Arc::unwrap_or_clone),
        created_ms: b.created_ms,
        homepage: b.homepage,
        ratio: b.ratio,
    })
}

impl ThriftStruct for ApacheUser {
    const TYPE_NAME: &'static str = "apache.User";

    fn describe() -> StructDescriptor {
        StructDescriptorBuilder::<ApacheUser>::new()
            .field(1, "id", TypeRef::i32(), Requiredness::Required, |u| u.id.into())
            .field(2, "name", TypeRef::string(), Requiredness::Required, |u| {
                u.name.clone().into()
            })
            .field(3, "email", TypeRef::string(), Requiredness::Optional, |u| {
                u.email.clone().into()
            })
            .field(4, "color", TypeRef::enum_of::<ApacheColor>(), Requiredness::Unspecified, |u| {
                Value::enumeration(u.color)
            })
            .field(5, "tags", TypeRef::list(TypeRef::string()), Requiredness::Unspecified, |u| {
                Value::list(u.tags.clone())
            })
            .field(6, "scores", TypeRef::array(TypeRef::f64()), Requiredness::Unspecified, |u| {
                thrift_coerce::ArrayValue::F64(u.scores.clone()).into()
            })
            .field(
                7,
                "address",
                TypeRef::structure::<ApacheAddress>(),
                Requiredness::Optional,
                |u| u.address.clone().map(Value::structure).into(),
            )
            .field(8, "createdMs", TypeRef::boxed(PrimitiveKind::I64), Requiredness::Optional, |u| {
                u.created_ms.into()
            })
            .field(9, "homepage", TypeRef::string(), Requiredness::Optional, |u| {
                u.homepage.clone().into()
            })
            .field(10, "ratio", TypeRef::f64(), Requiredness::Unspecified, |u| u.ratio.into())
            .builder(
                BuilderStrategy::new(finish_apache_user)
                    .setter("id", |b: &mut ApacheUserBuilder, v: i32| b.id = Some(v))
                    .setter("name", |b: &mut ApacheUserBuilder, v: String| b.name = Some(v))
                    .setter("email", |b: &mut ApacheUserBuilder, v: String| b.email = Some(v))
                    .setter("color", |b: &mut ApacheUserBuilder, v: Value| b.color = Some(v))
                    .setter("tags", |b: &mut ApacheUserBuilder, v: Value| b.tags = Some(v))
                    .setter("scores", |b: &mut ApacheUserBuilder, v: Value| b.scores = Some(v))
                    .setter("address", |b: &mut ApacheUserBuilder, v: Value| {
                        b.address = Some(v)
                    })
                    .setter("createdMs", |b: &mut ApacheUserBuilder, v: i64| {
                        b.created_ms = Some(v)
                    })
                    .setter("homepage", |b: &mut ApacheUserBuilder, v: String| {
                        b.homepage = Some(v)
                    })
                    .setter("ratio", |b: &mut ApacheUserBuilder, v: f64| b.ratio = v),
            )
            .build()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApacheNotFound {
    pub message: String,
    pub cause: Option<Cause>,
}

#[derive(Default)]
pub struct ApacheNotFoundBuilder {
    message: Option<String>,
}

impl ThriftStruct for ApacheNotFound {
    const TYPE_NAME: &'static str = "apache.NotFound";

    fn describe() -> StructDescriptor {
        StructDescriptorBuilder::<ApacheNotFound>::new()
            .field(1, "message", TypeRef::string(), Requiredness::Unspecified, |e| {
                e.message.clone().into()
            })
            .builder(
                BuilderStrategy::new(|b: ApacheNotFoundBuilder| {
                    Ok(ApacheNotFound {
                        message: b.message.unwrap_or_default(),
                        cause: None,
                    })
                })
                .setter("message", |b: &mut ApacheNotFoundBuilder, v: String| {
                    b.message = Some(v)
                }),
            )
            .exception(ExceptionShape::new().cause_reader(|e: &ApacheNotFound| e.cause.clone()))
            .build()
    }
}

// ---------------------------------------------------------------------------
// Swift side (constructors, partly name-keyed)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SwiftAddress {
    pub street: String,
    pub zip: Option<i32>,
}

impl ThriftStruct for SwiftAddress {
    const TYPE_NAME: &'static str = "swift.Address";

    fn describe() -> StructDescriptor {
        StructDescriptorBuilder::<SwiftAddress>::new()
            .named_field("street", TypeRef::string(), Requiredness::Required, |a| {
                a.street.clone().into()
            })
            .named_field("zip", TypeRef::boxed(PrimitiveKind::I32), Requiredness::Optional, |a| a.zip.into())
            .constructor(&["street", "zip"], |mut args| {
                Ok(SwiftAddress {
                    street: args.take(0)?,
                    zip: args.take(1)?,
                })
            })
            .build()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwiftUser {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub color: SwiftColor,
    pub tags: Vec<String>,
    pub scores: Vec<f64>,
    pub address: Option<SwiftAddress>,
    pub created: Option<DateTime<Utc>>,
    pub homepage: Option<Url>,
    pub ratio: f32,
}

impl ThriftStruct for SwiftUser {
    const TYPE_NAME: &'static str = "swift.User";

    fn describe() -> StructDescriptor {
        StructDescriptorBuilder::<SwiftUser>::new()
            .field(1, "id", TypeRef::i64(), Requiredness::Required, |u| u.id.into())
            .field(2, "name", TypeRef::string(), Requiredness::Required, |u| {
                u.name.clone().into()
            })
            .field(3, "email", TypeRef::string(), Requiredness::Optional, |u| {
                u.email.clone().into()
            })
            .field(4, "color", TypeRef::enum_of::<SwiftColor>(), Requiredness::Unspecified, |u| {
                Value::enumeration(u.color)
            })
            .field(5, "tags", TypeRef::set(TypeRef::string()), Requiredness::Unspecified, |u| {
                Value::set(u.tags.clone())
            })
            .field(6, "scores", TypeRef::list(TypeRef::boxed(PrimitiveKind::F64)), Requiredness::Unspecified, |u| {
                Value::list(u.scores.clone())
            })
            .field(
                7,
                "address",
                TypeRef::structure::<SwiftAddress>(),
                Requiredness::Optional,
                |u| u.address.clone().map(Value::structure).into(),
            )
            .field(8, "created", TypeRef::date(), Requiredness::Optional, |u| u.created.into())
            .field(9, "homepage", TypeRef::url(), Requiredness::Optional, |u| {
                u.homepage.clone().into()
            })
            .field(10, "ratio", TypeRef::f32(), Requiredness::Unspecified, |u| u.ratio.into())
            .constructor(
                &[
                    "id", "name", "email", "color", "tags", "scores", "address", "created",
                    "homepage", "ratio",
                ],
                |mut args| {
                    Ok(SwiftUser {
                        id: args.take(0)?,
                        name: args.take(1)?,
                        email: args.take(2)?,
                        color: args.take::<Value>(3)?.into_enum()?,
                        tags: args.take::<Option<Value>>(4)?.map(Value::into_vec).transpose()?.unwrap_or_default(),
                        scores: args.take::<Option<Value>>(5)?.map(Value::into_vec).transpose()?.unwrap_or_default(),
                        address: args
                            .take::<Option<Value>>(6)?
                            .map(Value::into_struct::<SwiftAddress>)
                            .transpose()?
                            .map(Arc::unwrap_or_clone),
                        created: args.take(7)?,
                        homepage: args.take(8)?,
                        ratio: args.take::<Option<f32>>(9)?.unwrap_or_default(),
                    })
                },
            )
            .build()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwiftNotFound {
    pub message: Option<String>,
    pub cause_type: Option<String>,
    pub cause_trace: Option<String>,
    pub cause_fields: Option<String>,
}

impl ThriftStruct for SwiftNotFound {
    const TYPE_NAME: &'static str = "swift.NotFound";

    fn describe() -> StructDescriptor {
        StructDescriptorBuilder::<SwiftNotFound>::new()
            .named_field("message", TypeRef::string(), Requiredness::Optional, |e| {
                e.message.clone().into()
            })
            .named_field("causeType", TypeRef::string(), Requiredness::Optional, |e| {
                e.cause_type.clone().into()
            })
            .named_field("causeTrace", TypeRef::string(), Requiredness::Optional, |e| {
                e.cause_trace.clone().into()
            })
            .named_field("causeFields", TypeRef::string(), Requiredness::Optional, |e| {
                e.cause_fields.clone().into()
            })
            .constructor(
                &["message", "causeType", "causeTrace", "causeFields"],
                |mut args| {
                    Ok(SwiftNotFound {
                        message: args.take(0)?,
                        cause_type: args.take(1)?,
                        cause_trace: args.take(2)?,
                        cause_fields: args.take(3)?,
                    })
                },
            )
            .exception(
                ExceptionShape::new().summary(
                    CauseSummaryFields::none()
                        .message("message")
                        .cause_type("causeType")
                        .cause_trace("causeTrace")
                        .cause_fields("causeFields"),
                ),
            )
            .build()
    }
}

// ---------------------------------------------------------------------------
// Samples
// ---------------------------------------------------------------------------

pub fn sample_apache_user() -> ApacheUser {
    ApacheUser {
        id: 42,
        name: Some("x".into()),
        email: None,
        color: ApacheColor::Red,
        tags: vec!["admin".into(), "ops".into()],
        scores: vec![1.5, 2.25],
        address: Some(ApacheAddress {
            street: "1 Main St".into(),
            zip: Some(12345),
        }),
        created_ms: Some(1_700_000_000_000),
        homepage: Some("https://example.com/x".into()),
        ratio: 0.5,
    }
}

/// Engine that can also narrow `i64` ids back to `i32`.
pub fn round_trip_engine() -> thrift_coerce::CoercionEngine {
    let engine = thrift_coerce::CoercionEngine::new();
    engine.register(&TypeRef::i64(), &TypeRef::i32(), |value| match value {
        Value::I64(v) => i32::try_from(v).map(Value::I32).map_err(|e| {
            thrift_coerce::CoercionError::failed("i64", "i32", e.to_string())
        }),
        other => Err(thrift_coerce::CoercionError::mismatch("i64", other.kind_name())),
    });
    engine
}
