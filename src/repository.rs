use reqwest::Method;
use serde::Serialize;
use serde::de::{DeserializeOwned, Error as _, Unexpected};
use serde_json::Value;

use crate::error::TogglError;
use crate::toggl::RestRequester;

pub(crate) fn send(
    requester: &dyn RestRequester,
    method: Method,
    route: &str,
    payload: Option<Vec<u8>>,
    operation: &'static str,
) -> Result<Vec<u8>, TogglError> {
    requester
        .request(method, route, payload)
        .map_err(|source| TogglError::Request { operation, source })
}

pub(crate) fn encode<T: Serialize>(value: &T, operation: &'static str) -> Result<Vec<u8>, TogglError> {
    serde_json::to_vec(value).map_err(|source| TogglError::Serialization { operation, source })
}

pub(crate) fn parse_json(content: &[u8], operation: &'static str) -> Result<Value, TogglError> {
    serde_json::from_slice(content).map_err(|source| TogglError::Deserialization { operation, source })
}

/// Decodes a list response. A literal `null` counts as an empty list; every
/// element has to be a JSON object.
pub(crate) fn decode_list<T: DeserializeOwned>(
    content: &[u8],
    operation: &'static str,
) -> Result<Vec<T>, TogglError> {
    let failed = |source: serde_json::Error| TogglError::Deserialization { operation, source };
    match parse_json(content, operation)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| record(item).map_err(failed))
            .collect(),
        other => Err(failed(unexpected_shape(&other, "a JSON array"))),
    }
}

/// Decodes a create response. A literal `null` yields the zero-value record.
pub(crate) fn decode_created<T: DeserializeOwned + Default>(
    content: &[u8],
    operation: &'static str,
) -> Result<T, TogglError> {
    created_record(parse_json(content, operation)?, operation)
}

pub(crate) fn created_record<T: DeserializeOwned + Default>(
    value: Value,
    operation: &'static str,
) -> Result<T, TogglError> {
    if value.is_null() {
        return Ok(T::default());
    }
    record(value).map_err(|source| TogglError::Deserialization { operation, source })
}

// Derived record decoders also accept sequences and would fill fields by
// position, so the object shape is checked up front.
fn record<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    if !value.is_object() {
        return Err(unexpected_shape(&value, "a JSON object"));
    }
    serde_json::from_value(value)
}

fn unexpected_shape(value: &Value, expected: &'static str) -> serde_json::Error {
    let unexpected = match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(flag) => Unexpected::Bool(*flag),
        Value::Number(_) => Unexpected::Other("number"),
        Value::String(text) => Unexpected::Str(text),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    };
    serde_json::Error::invalid_type(unexpected, &expected)
}
