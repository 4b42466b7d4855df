// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # thrift-coerce
//!
//! Runtime value coercion between the types generated by two Thrift code
//! generators for the same IDL. Both toolchains emit their own structs,
//! enums, exceptions and container conventions; the engine converts a
//! value of one into the equivalent value of the other, recursing through
//! fields and container elements.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use thrift_coerce::{CoercionEngine, Result};
//!
//! fn bridge(user: apache::User) -> Result<std::sync::Arc<swift::User>> {
//!     let engine = CoercionEngine::new();
//!     engine.transform::<apache::User, swift::User>(user)
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------+
//! |  CoercionEngine::cast(value, source type, dest type)          |
//! +---------------------------------------------------------------+
//! |  TransformerRegistry   PairKey -> Converter (copy-on-write)   |
//! |    built-ins | explicit | synthesized (struct, enum)          |
//! +---------------------------------------------------------------+
//! |  DescriptorCache       TypeRef -> StructDescriptor (once)     |
//! |    fields | construction strategy | exception shape           |
//! +---------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`CoercionEngine`] | Entry point: cast, lookup, register, transform |
//! | [`TypeRef`] | Runtime type identity shared by both toolchains |
//! | [`Value`] | Dynamic value of any supported kind |
//! | [`ThriftStruct`] | Implemented by generated structs to describe themselves |
//! | [`TransformerRegistry`] | Converters keyed by ordered type pair |
//!
//! ## Modules Overview
//!
//! - [`engine`] - Cast dispatch (start here)
//! - [`descriptor`] - Struct metadata and construction
//! - [`registry`] - Converter registry and built-ins
//! - [`types`] / [`value`] - Type identities and dynamic values

/// Engine configuration (depth limit, built-ins, YAML/env loading).
pub mod config;
/// Struct descriptors, construction strategies and the descriptor cache.
pub mod descriptor;
/// Cast dispatch and container/enum conversion.
pub mod engine;
/// Declared type plus value.
pub mod envelope;
/// Error types.
pub mod error;
/// JSON rendering of dynamic values.
pub mod json;
/// Converter registry keyed by ordered type pair.
pub mod registry;
/// Struct-to-struct conversion.
pub mod transform;
/// Runtime type identities.
pub mod types;
/// Dynamic values.
pub mod value;

pub use config::EngineConfig;
pub use descriptor::{
    BuilderStrategy, Cause, CauseSummaryFields, DescriptorCache, ExceptionShape, FieldDescriptor,
    FieldValues, Requiredness, StructDescriptor, StructDescriptorBuilder, ThriftStruct,
};
pub use engine::{CastContext, CoercionEngine};
pub use envelope::ValueEnvelope;
pub use error::{BoxError, CoercionError, Result};
pub use registry::{Converter, FnConverter, Origin, PairKey, TransformerRegistry};
pub use transform::StructTransformer;
pub use types::{EnumDescriptor, EnumVariant, PrimitiveKind, ThriftEnum, TypeKind, TypeRef};
pub use value::{ArrayValue, EnumValue, FromValue, StructObject, Value};
