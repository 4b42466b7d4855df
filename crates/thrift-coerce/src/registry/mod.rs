// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Transformer registry.
//!
//! Concurrent map from an ordered [`PairKey`] to the converter for that
//! direction. Reads are lock-free (`ArcSwap` snapshot of the whole map);
//! writers serialize on a mutex and publish a new snapshot.
//!
//! # Performance
//!
//! - **Lookup**: atomic load + HashMap probe, no lock
//! - **Register / synthesize**: copy-on-write of the map, O(n), rare
//!
//! Entries are never removed. Explicit registration always overwrites;
//! synthesis only fills an absent key, and at most one synthesized
//! converter is ever published per key.

pub(crate) mod builtins;

use crate::engine::CastContext;
use crate::error::{CoercionError, Result};
use crate::types::TypeRef;
use crate::value::Value;
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Ordered pair of types: conversion from `left` to `right`.
///
/// `(A, B)` and `(B, A)` are distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey {
    pub left: TypeRef,
    pub right: TypeRef,
}

impl PairKey {
    /// Create a key for converting `left` to `right`.
    pub fn new(left: &TypeRef, right: &TypeRef) -> Self {
        Self {
            left: left.clone(),
            right: right.clone(),
        }
    }

    /// The opposite direction.
    pub fn reversed(&self) -> Self {
        Self::new(&self.right, &self.left)
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.left, self.right)
    }
}

// ---------------------------------------------------------------------------
// Converters
// ---------------------------------------------------------------------------

/// Value-to-value conversion for one ordered type pair.
///
/// Converters that need to convert nested values (struct fields, container
/// elements) go back through the engine via `cx`.
pub trait Converter: Send + Sync {
    fn convert(&self, value: Value, cx: &CastContext<'_>) -> Result<Value>;
}

impl<F> Converter for F
where
    F: Fn(Value, &CastContext<'_>) -> Result<Value> + Send + Sync,
{
    fn convert(&self, value: Value, cx: &CastContext<'_>) -> Result<Value> {
        self(value, cx)
    }
}

/// Adapts a context-free closure into a [`Converter`].
pub struct FnConverter<F>(F);

impl<F> FnConverter<F>
where
    F: Fn(Value) -> Result<Value> + Send + Sync,
{
    pub fn new(convert: F) -> Self {
        Self(convert)
    }
}

impl<F> Converter for FnConverter<F>
where
    F: Fn(Value) -> Result<Value> + Send + Sync,
{
    fn convert(&self, value: Value, _cx: &CastContext<'_>) -> Result<Value> {
        (self.0)(value)
    }
}

struct Identity;

impl Converter for Identity {
    fn convert(&self, value: Value, _cx: &CastContext<'_>) -> Result<Value> {
        Ok(value)
    }
}

/// The shared identity converter.
pub fn identity() -> Arc<dyn Converter> {
    static IDENTITY: OnceLock<Arc<dyn Converter>> = OnceLock::new();
    Arc::clone(IDENTITY.get_or_init(|| Arc::new(Identity)))
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Where a registry entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Seeded at engine construction.
    Builtin,
    /// Registered by the caller.
    Explicit,
    /// Synthesized on first use (struct or enum pairs).
    Synthesized,
}

#[derive(Clone)]
struct Entry {
    converter: Arc<dyn Converter>,
    origin: Origin,
}

/// Concurrent map from [`PairKey`] to converter.
pub struct TransformerRegistry {
    entries: ArcSwap<HashMap<PairKey, Entry>>,
    write_lock: Mutex<()>,
}

impl TransformerRegistry {
    /// Create an empty registry (no built-ins).
    pub fn new() -> Self {
        Self {
            entries: ArcSwap::from_pointee(HashMap::new()),
            write_lock: Mutex::new(()),
        }
    }

    /// Converter registered for `key`.
    pub fn get(&self, key: &PairKey) -> Option<Arc<dyn Converter>> {
        self.entries
            .load()
            .get(key)
            .map(|e| Arc::clone(&e.converter))
    }

    /// Origin of the entry for `key`.
    pub fn origin(&self, key: &PairKey) -> Option<Origin> {
        self.entries.load().get(key).map(|e| e.origin)
    }

    /// Check if `key` has an entry.
    pub fn contains(&self, key: &PairKey) -> bool {
        self.entries.load().contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }

    /// Register `converter` for `left -> right`, replacing any entry.
    pub fn register(&self, left: &TypeRef, right: &TypeRef, converter: Arc<dyn Converter>) {
        let key = PairKey::new(left, right);
        let replaced = self.insert(key.clone(), converter, Origin::Explicit);
        match replaced {
            Some(origin) => log::debug!("[registry] {} replaced ({:?} entry)", key, origin),
            None => log::debug!("[registry] {} registered", key),
        }
    }

    /// Register a context-free closure for `left -> right`.
    pub fn register_fn<F>(&self, left: &TypeRef, right: &TypeRef, convert: F)
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.register(left, right, Arc::new(FnConverter::new(convert)));
    }

    pub(crate) fn seed(&self, left: &TypeRef, right: &TypeRef, converter: Arc<dyn Converter>) {
        self.insert(PairKey::new(left, right), converter, Origin::Builtin);
    }

    /// Converter for `key`, synthesizing and publishing one if absent.
    ///
    /// `synthesize` runs under the write lock, at most once per key across
    /// all threads, and must not touch the registry. `Ok(None)` from it
    /// means no converter exists and nothing is published.
    pub fn get_or_synthesize<F>(&self, key: &PairKey, synthesize: F) -> Result<Option<Arc<dyn Converter>>>
    where
        F: FnOnce() -> Result<Option<Arc<dyn Converter>>>,
    {
        if let Some(found) = self.get(key) {
            return Ok(Some(found));
        }

        let _guard = self.write_lock.lock();
        let current = self.entries.load_full();
        if let Some(entry) = current.get(key) {
            return Ok(Some(Arc::clone(&entry.converter)));
        }

        let Some(converter) = synthesize()? else {
            return Ok(None);
        };
        let mut next = HashMap::clone(&current);
        next.insert(
            key.clone(),
            Entry {
                converter: Arc::clone(&converter),
                origin: Origin::Synthesized,
            },
        );
        self.entries.store(Arc::new(next));
        log::debug!("[registry] {} synthesized", key);
        Ok(Some(converter))
    }

    /// Resolve the converter for `left -> right`.
    ///
    /// Identity when `right` accepts `left` as is, otherwise the registered
    /// entry, otherwise whatever `synthesize` produces. Fails with
    /// [`CoercionError::NoConverter`] when all three come up empty.
    pub fn lookup<F>(&self, left: &TypeRef, right: &TypeRef, synthesize: F) -> Result<Arc<dyn Converter>>
    where
        F: FnOnce() -> Result<Option<Arc<dyn Converter>>>,
    {
        if right.accepts(left) {
            return Ok(identity());
        }
        let key = PairKey::new(left, right);
        self.get_or_synthesize(&key, synthesize)?
            .ok_or_else(|| CoercionError::NoConverter {
                left: left.name.clone(),
                right: right.name.clone(),
            })
    }

    fn insert(&self, key: PairKey, converter: Arc<dyn Converter>, origin: Origin) -> Option<Origin> {
        let _guard = self.write_lock.lock();
        let mut next = HashMap::clone(&self.entries.load());
        let replaced = next
            .insert(key, Entry { converter, origin })
            .map(|e| e.origin);
        self.entries.store(Arc::new(next));
        replaced
    }
}

impl Default for TransformerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TransformerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerRegistry")
            .field("entries", &self.len())
            .finish()
    }
}
