use crate::error::ScriptError;
use mlua::Lua;
use serde_json::{Map, Number, Value};
use std::collections::HashMap;

/// Marshals a host value onto the VM. Mappings become tables keyed as-is,
/// sequences become tables with 1-based integer keys.
pub fn push(lua: &Lua, value: &Value) -> mlua::Result<mlua::Value> {
    Ok(match value {
        Value::Null => mlua::Value::Nil,
        Value::Bool(b) => mlua::Value::Boolean(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                mlua::Value::Integer(i)
            } else {
                // u64 beyond i64::MAX or a float either way
                mlua::Value::Number(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => mlua::Value::String(lua.create_string(s)?),
        Value::Array(items) => {
            let table = lua.create_table_with_capacity(items.len(), 0)?;
            for (i, item) in items.iter().enumerate() {
                table.set(i as i64 + 1, push(lua, item)?)?;
            }
            mlua::Value::Table(table)
        }
        Value::Object(map) => {
            let table = lua.create_table_with_capacity(0, map.len())?;
            for (key, item) in map {
                table.set(key.as_str(), push(lua, item)?)?;
            }
            mlua::Value::Table(table)
        }
    })
}

/// Extracts a script value back into the host domain.
///
/// Numbers with no fractional part come back as integers. A table whose
/// keys are all positive integers becomes a sequence of length `max(key)`
/// with missing indices null; any other table becomes a string-keyed
/// mapping. Empty tables extract as empty sequences.
pub fn pull(value: &mlua::Value) -> Result<Value, ScriptError> {
    match value {
        mlua::Value::Nil => Ok(Value::Null),
        mlua::Value::Boolean(b) => Ok(Value::Bool(*b)),
        mlua::Value::Integer(i) => Ok(Value::Number((*i).into())),
        mlua::Value::Number(f) => Ok(number(*f)),
        mlua::Value::String(s) => Ok(Value::String(s.to_str()?.to_string())),
        mlua::Value::Table(t) => pull_table(t),
        other => Err(ScriptError::Extract(other.type_name())),
    }
}

fn number(f: f64) -> Value {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Value::Number((f as i64).into())
    } else {
        Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
    }
}

fn pull_table(table: &mlua::Table) -> Result<Value, ScriptError> {
    let mut entries: HashMap<String, Value> = HashMap::new();
    // length of the extracted sequence; None once a non-index key is seen
    let mut seq_len: Option<i64> = Some(0);

    for pair in table.clone().pairs::<mlua::Value, mlua::Value>() {
        let (key, value) = pair?;
        let value = pull(&value)?;
        match index_key(&key) {
            Some(i) if i >= 1 => {
                if let Some(len) = seq_len.as_mut() {
                    *len = (*len).max(i);
                }
                entries.insert(i.to_string(), value);
            }
            _ => {
                seq_len = None;
                entries.insert(string_key(&key)?, value);
            }
        }
    }

    match seq_len {
        Some(len) => Ok(Value::Array(
            (1..=len)
                .map(|i| entries.remove(&i.to_string()).unwrap_or(Value::Null))
                .collect(),
        )),
        None => Ok(Value::Object(Map::from_iter(entries))),
    }
}

fn index_key(key: &mlua::Value) -> Option<i64> {
    match key {
        mlua::Value::Integer(i) => Some(*i),
        mlua::Value::Number(f) if f.fract() == 0.0 => Some(*f as i64),
        _ => None,
    }
}

fn string_key(key: &mlua::Value) -> Result<String, ScriptError> {
    match key {
        mlua::Value::String(s) => Ok(s.to_str()?.to_string()),
        mlua::Value::Integer(i) => Ok(i.to_string()),
        mlua::Value::Number(f) => Ok(f.to_string()),
        mlua::Value::Boolean(b) => Ok(b.to_string()),
        other => Err(ScriptError::Extract(other.type_name())),
    }
}
