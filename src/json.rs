//! JSON bridge for values
//!
//! JSON objects become `stdClass` entities, JSON arrays become zero-indexed
//! keyed collections. Going back, a collection whose keys are exactly
//! `0..n` in order (the empty collection included) is written as a JSON
//! array, any other collection and every entity as a JSON object.

use crate::core::{BagError, Key, Result, Value};
use crate::storage::{Collection, Entity, HasFields, Shared};
use serde_json::{Map, Number, Value as JsonValue};

pub const JSON_OBJECT_CLASS: &str = "stdClass";

impl Value {
    pub fn from_json(json: &JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Boolean(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => Value::Text(s.clone()),
            JsonValue::Array(items) => {
                let collection = Collection::from_values(items.iter().map(Value::from_json));
                Value::Array(collection.into_shared())
            }
            JsonValue::Object(map) => {
                let mut entity = Entity::new(JSON_OBJECT_CLASS);
                for (name, value) in map {
                    entity.set(name.clone(), Value::from_json(value));
                }
                Value::Object(entity.into_shared())
            }
        }
    }

    /// Parse a JSON document
    pub fn parse_json(text: &str) -> Result<Self> {
        let json: JsonValue = serde_json::from_str(text)
            .map_err(|e| BagError::TypeMismatch(format!("invalid JSON: {}", e)))?;
        Ok(Self::from_json(&json))
    }

    /// Fails on cycles and on non-finite floats.
    pub fn to_json(&self) -> Result<JsonValue> {
        let mut path = Vec::new();
        to_json_inner(self, &mut path)
    }
}

fn to_json_inner(value: &Value, path: &mut Vec<usize>) -> Result<JsonValue> {
    match value {
        Value::Null => Ok(JsonValue::Null),
        Value::Boolean(b) => Ok(JsonValue::Bool(*b)),
        Value::Integer(i) => Ok(JsonValue::from(*i)),
        Value::Float(f) => Number::from_f64(*f).map(JsonValue::Number).ok_or_else(|| {
            BagError::UnsupportedOperation(format!("{} cannot be represented in JSON", f))
        }),
        Value::Text(s) => Ok(JsonValue::String(s.clone())),
        Value::Array(collection) => container_to_json(collection, false, path),
        Value::Object(entity) => container_to_json(entity, true, path),
    }
}

fn container_to_json<T: HasFields>(
    handle: &Shared<T>,
    is_entity: bool,
    path: &mut Vec<usize>,
) -> Result<JsonValue> {
    let addr = handle.addr();
    if path.contains(&addr) {
        return Err(BagError::UnsupportedOperation(
            "recursive structure cannot be encoded as JSON".into(),
        ));
    }

    path.push(addr);
    let pairs = handle.read()?.fields().pairs();
    let is_list = !is_entity
        && pairs
            .iter()
            .enumerate()
            .all(|(i, (key, _))| *key == Key::Int(i as i64));

    let json = if is_list {
        let mut items = Vec::with_capacity(pairs.len());
        for (_, v) in &pairs {
            items.push(to_json_inner(v, path)?);
        }
        JsonValue::Array(items)
    } else {
        let mut map = Map::new();
        for (k, v) in &pairs {
            map.insert(k.to_string(), to_json_inner(v, path)?);
        }
        JsonValue::Object(map)
    };
    path.pop();

    Ok(json)
}
