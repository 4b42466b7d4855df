// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! JSON rendering of dynamic values.
//!
//! Used to carry an exception cause's fields across as text. Structs render
//! as objects keyed by field name (readable fields only, nulls omitted),
//! enums as their member name, dates as RFC 3339, binary data as an array of
//! byte values. Maps with string keys become objects; any other map becomes
//! an array of `[key, value]` pairs. Non-finite floats render as `null`.

use crate::engine::CoercionEngine;
use crate::error::{CoercionError, Result};
use crate::value::{ArrayValue, Value};
use chrono::SecondsFormat;
use serde_json::{Map, Number, Value as Json};

/// Render `value` as JSON, describing nested structs through `engine`.
pub fn to_json(engine: &CoercionEngine, value: &Value) -> Result<Json> {
    render(engine, value, 0)
}

impl CoercionEngine {
    /// Render `value` as JSON text.
    pub fn to_json_string(&self, value: &Value) -> Result<String> {
        to_json(self, value).map(|json| json.to_string())
    }
}

fn render(engine: &CoercionEngine, value: &Value, depth: usize) -> Result<Json> {
    if depth > engine.config().max_depth {
        return Err(CoercionError::DepthExceeded {
            depth,
            from: value.kind_name().into(),
            to: "json".into(),
        });
    }

    let json = match value {
        Value::Null => Json::Null,
        Value::Bool(v) => Json::Bool(*v),
        Value::I8(v) => Json::from(*v),
        Value::I16(v) => Json::from(*v),
        Value::I32(v) => Json::from(*v),
        Value::I64(v) => Json::from(*v),
        Value::F32(v) => float(f64::from(*v)),
        Value::F64(v) => float(*v),
        Value::String(v) => Json::String(v.clone()),
        Value::Binary(v) => bytes(v),
        Value::Buffer(v) => bytes(v),
        Value::Date(v) => Json::String(v.to_rfc3339_opts(SecondsFormat::Millis, true)),
        Value::Url(v) => Json::String(v.to_string()),
        Value::Enum(e) => Json::String(e.name.to_string()),
        Value::Array(array) => array_json(engine, array, depth)?,
        Value::List(items) | Value::Set(items) => Json::Array(
            items
                .iter()
                .map(|item| render(engine, item, depth + 1))
                .collect::<Result<_>>()?,
        ),
        Value::Map(entries) => map_json(engine, entries, depth)?,
        Value::Struct(object) => {
            let descriptor = engine.describe(&object.struct_type())?;
            let mut fields = Map::new();
            for extracted in descriptor.extract(&**object)? {
                let name = &descriptor.fields()[extracted.index].name;
                fields.insert(
                    name.to_string(),
                    render(engine, &extracted.envelope.value, depth + 1)?,
                );
            }
            Json::Object(fields)
        }
    };
    Ok(json)
}

fn float(v: f64) -> Json {
    Number::from_f64(v).map_or(Json::Null, Json::Number)
}

fn bytes(data: &[u8]) -> Json {
    Json::Array(data.iter().map(|b| Json::from(*b)).collect())
}

fn array_json(engine: &CoercionEngine, array: &ArrayValue, depth: usize) -> Result<Json> {
    let items = match array {
        ArrayValue::Bool(v) => v.iter().map(|x| Json::Bool(*x)).collect(),
        ArrayValue::I8(v) => v.iter().map(|x| Json::from(*x)).collect(),
        ArrayValue::I16(v) => v.iter().map(|x| Json::from(*x)).collect(),
        ArrayValue::I32(v) => v.iter().map(|x| Json::from(*x)).collect(),
        ArrayValue::I64(v) => v.iter().map(|x| Json::from(*x)).collect(),
        ArrayValue::F32(v) => v.iter().map(|x| float(f64::from(*x))).collect(),
        ArrayValue::F64(v) => v.iter().map(|x| float(*x)).collect(),
        ArrayValue::Object(v) => v
            .iter()
            .map(|item| render(engine, item, depth + 1))
            .collect::<Result<_>>()?,
    };
    Ok(Json::Array(items))
}

fn map_json(engine: &CoercionEngine, entries: &[(Value, Value)], depth: usize) -> Result<Json> {
    if entries.iter().all(|(k, _)| matches!(k, Value::String(_))) {
        let mut object = Map::new();
        for (key, value) in entries {
            if let Value::String(key) = key {
                object.insert(key.clone(), render(engine, value, depth + 1)?);
            }
        }
        return Ok(Json::Object(object));
    }
    entries
        .iter()
        .map(|(key, value)| {
            Ok(Json::Array(vec![
                render(engine, key, depth + 1)?,
                render(engine, value, depth + 1)?,
            ]))
        })
        .collect::<Result<Vec<_>>>()
        .map(Json::Array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_scalars() {
        let engine = CoercionEngine::new();
        assert_eq!(to_json(&engine, &Value::I32(3)).unwrap(), json!(3));
        assert_eq!(to_json(&engine, &Value::F64(f64::NAN)).unwrap(), Json::Null);
        assert_eq!(to_json(&engine, &Value::Binary(vec![1, 255])).unwrap(), json!([1, 255]));
        let date = Utc.timestamp_millis_opt(0).unwrap();
        assert_eq!(
            to_json(&engine, &Value::Date(date)).unwrap(),
            json!("1970-01-01T00:00:00.000Z")
        );
    }

    #[test]
    fn test_maps() {
        let engine = CoercionEngine::new();
        let keyed = Value::Map(vec![(Value::from("a"), Value::I64(1))]);
        assert_eq!(to_json(&engine, &keyed).unwrap(), json!({"a": 1}));

        let numeric = Value::Map(vec![(Value::I32(1), Value::from("one"))]);
        assert_eq!(to_json(&engine, &numeric).unwrap(), json!([[1, "one"]]));
    }

    #[test]
    fn test_depth_limit() {
        let engine = CoercionEngine::with_config(EngineConfig::default().with_max_depth(2)).unwrap();
        let nested = Value::List(vec![Value::List(vec![Value::List(vec![Value::I32(1)])])]);
        assert!(matches!(
            to_json(&engine, &nested),
            Err(CoercionError::DepthExceeded { .. })
        ));
        assert_eq!(
            engine.to_json_string(&Value::list([1i32, 2])).unwrap(),
            "[1,2]"
        );
    }
}
