// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Engine configuration.
//!
//! Defaults can be overridden from the environment or, with the
//! `config-loaders` feature, from a YAML document.
//!
//! # Example YAML
//!
//! ```yaml
//! max_depth: 32
//! numeric_widening: false
//! ```
//!
//! # Environment
//!
//! - `THRIFT_COERCE_MAX_DEPTH`: maximum nesting of recursive casts
//! - `THRIFT_COERCE_NUMERIC_WIDENING`: `true`/`false`

use crate::error::{CoercionError, Result};

/// Default maximum nesting depth of recursive casts.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config-loaders", derive(serde::Deserialize))]
#[cfg_attr(feature = "config-loaders", serde(default, deny_unknown_fields))]
pub struct EngineConfig {
    /// Maximum nesting depth of recursive casts (struct fields, elements).
    pub max_depth: usize,
    /// Seed the built-in converters at construction.
    pub seed_builtins: bool,
    /// Seed the lossless numeric widening converters (i32 -> i64, ...).
    pub numeric_widening: bool,
    /// De-duplicate set elements after conversion.
    pub dedup_sets: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            seed_builtins: true,
            numeric_widening: true,
            dedup_sets: true,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `THRIFT_COERCE_*` environment variables.
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_depth: std::env::var("THRIFT_COERCE_MAX_DEPTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_depth),
            numeric_widening: std::env::var("THRIFT_COERCE_NUMERIC_WIDENING")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.numeric_widening),
            ..defaults
        }
    }

    /// Set maximum nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enable or disable built-in converters.
    pub fn with_builtins(mut self, enabled: bool) -> Self {
        self.seed_builtins = enabled;
        self
    }

    /// Enable or disable numeric widening.
    pub fn with_numeric_widening(mut self, enabled: bool) -> Self {
        self.numeric_widening = enabled;
        self
    }

    /// Enable or disable set de-duplication.
    pub fn with_dedup_sets(mut self, enabled: bool) -> Self {
        self.dedup_sets = enabled;
        self
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(CoercionError::Config("max_depth must be at least 1".into()));
        }
        if self.numeric_widening && !self.seed_builtins {
            return Err(CoercionError::Config(
                "numeric_widening requires seed_builtins".into(),
            ));
        }
        Ok(())
    }

    /// Parse from a YAML document; missing keys keep their defaults.
    #[cfg(feature = "config-loaders")]
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| CoercionError::Config(format!("failed to parse YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file.
    #[cfg(feature = "config-loaders")]
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoercionError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }
}
