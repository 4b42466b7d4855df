// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Engine configuration from YAML files and the environment.

#![cfg(feature = "config-loaders")]

use std::io::Write;
use thrift_coerce::{CoercionEngine, CoercionError, EngineConfig, TypeRef, Value};

#[test]
fn test_yaml_file_configures_engine() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "max_depth: 4").unwrap();
    writeln!(file, "numeric_widening: false").unwrap();

    let config = EngineConfig::from_yaml_file(file.path()).unwrap();
    assert_eq!(config.max_depth, 4);
    assert!(!config.numeric_widening);

    let engine = CoercionEngine::with_config(config).unwrap();
    assert!(matches!(
        engine.cast(Value::I32(1), &TypeRef::i32(), &TypeRef::i64()),
        Err(CoercionError::NoConverter { .. })
    ));
}

#[test]
fn test_depth_limit_applies_to_nesting() {
    let config = EngineConfig::default().with_max_depth(2);
    let engine = CoercionEngine::with_config(config).unwrap();
    let source = TypeRef::list(TypeRef::list(TypeRef::list(TypeRef::i32())));
    let dest = TypeRef::list(TypeRef::list(TypeRef::list(TypeRef::i64())));
    let value = Value::List(vec![Value::List(vec![Value::list([1i32])])]);

    assert!(matches!(
        engine.cast(value, &source, &dest),
        Err(CoercionError::DepthExceeded { .. })
    ));
}

#[test]
fn test_missing_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = EngineConfig::from_yaml_file(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, CoercionError::Config(_)));
}

#[test]
fn test_invalid_yaml_combination() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "seed_builtins: false").unwrap();
    let err = EngineConfig::from_yaml_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("numeric_widening requires seed_builtins"));
}

#[test]
fn test_from_env_defaults() {
    // Only checks the unset path; setting process env races other tests.
    if std::env::var("THRIFT_COERCE_MAX_DEPTH").is_err() {
        assert_eq!(EngineConfig::from_env().max_depth, EngineConfig::default().max_depth);
    }
}
