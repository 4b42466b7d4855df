// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for coercion operations.
//!
//! Every variant describes a programmer or schema error: two types that have
//! no conversion path, a value that breaks its declared type, a descriptor
//! that contradicts itself. None of them is transient, so callers should
//! surface them rather than retry.

use crate::types::TypeName;
use thiserror::Error;

/// Result type for coercion operations.
pub type Result<T> = std::result::Result<T, CoercionError>;

/// Boxed error raised by user-supplied constructor, setter or build closures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while resolving or applying a conversion.
#[derive(Debug, Error)]
pub enum CoercionError {
    // ========================================================================
    // Resolution Errors
    // ========================================================================
    /// No converter exists (or can be synthesized) for the ordered pair.
    #[error("no converter from {left} to {right}")]
    NoConverter { left: TypeName, right: TypeName },

    /// Container shapes were recognized but cannot be reduced to a conversion
    /// (e.g. nested wildcard element types, list to map).
    #[error("unsupported coercion from {from} to {to}")]
    UnsupportedCoercion { from: TypeName, to: TypeName },

    // ========================================================================
    // Value Errors
    // ========================================================================
    /// A null value was routed to a non-nullable primitive destination.
    #[error("cannot convert null {from} to primitive {to}")]
    NullToPrimitive { from: TypeName, to: TypeName },

    /// A REQUIRED field held null during extraction.
    #[error("required field '{field}' of {type_name} is null")]
    MissingRequiredField { type_name: TypeName, field: String },

    /// Destination enumeration has no member with the source member's name.
    #[error("enum {enum_type} has no member named '{member}'")]
    NoSuchEnumMember { enum_type: TypeName, member: String },

    /// Runtime value shape contradicts its declared type.
    #[error("value of kind {found} does not match declared type {declared}")]
    TypeMismatch { declared: TypeName, found: String },

    /// A built-in converter rejected its input (malformed url, date out of range).
    #[error("cannot convert {from} to {to}: {reason}")]
    ConversionFailed {
        from: TypeName,
        to: TypeName,
        reason: String,
    },

    // ========================================================================
    // Struct Errors
    // ========================================================================
    /// A struct descriptor is inconsistent (duplicate ids, unknown fields).
    #[error("invalid descriptor for {type_name}: {reason}")]
    InvalidDescriptor { type_name: TypeName, reason: String },

    /// A constructor, setter or build step failed.
    #[error("failed to construct {type_name}: {source}")]
    Construction {
        type_name: TypeName,
        #[source]
        source: BoxError,
    },

    /// Nested casts went deeper than the configured limit.
    #[error("recursion depth {depth} exceeded converting {from} to {to}")]
    DepthExceeded {
        depth: usize,
        from: TypeName,
        to: TypeName,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Engine configuration is invalid or could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CoercionError {
    /// Wrap a failure raised by a construction closure.
    ///
    /// If the closure already returned a `CoercionError` (typically from a
    /// nested cast or a `FieldValues::take`), it is passed through unchanged
    /// so the caller sees the real failure instead of a wrapper.
    pub fn construction(type_name: impl Into<TypeName>, err: impl Into<BoxError>) -> Self {
        match err.into().downcast::<CoercionError>() {
            Ok(inner) => *inner,
            Err(other) => Self::Construction {
                type_name: type_name.into(),
                source: other,
            },
        }
    }

    /// Shorthand for [`CoercionError::TypeMismatch`].
    pub fn mismatch(declared: impl Into<TypeName>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            declared: declared.into(),
            found: found.into(),
        }
    }

    /// Shorthand for [`CoercionError::ConversionFailed`].
    pub fn failed(
        from: impl Into<TypeName>,
        to: impl Into<TypeName>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ConversionFailed {
            from: from.into(),
            to: to.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`CoercionError::InvalidDescriptor`].
    pub fn invalid_descriptor(type_name: impl Into<TypeName>, reason: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }
}
