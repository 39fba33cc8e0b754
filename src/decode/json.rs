use serde_json::Value;

use super::error::{DecodeError, DecodeResult};

/// Read-only view over a JSON document node.
///
/// The decoders only need key lookup, a handful of scalar accessors and
/// arrays, so they are written against this trait rather than a concrete
/// JSON library.
pub trait JsonNode: Sized {
    fn get(&self, key: &str) -> Option<&Self>;
    fn as_str(&self) -> Option<&str>;
    fn as_bool(&self) -> Option<bool>;
    fn as_u64(&self) -> Option<u64>;
    fn as_array(&self) -> Option<&[Self]>;
    fn is_null(&self) -> bool;
}

impl JsonNode for Value {
    fn get(&self, key: &str) -> Option<&Self> {
        self.as_object()?.get(key)
    }

    fn as_str(&self) -> Option<&str> {
        Value::as_str(self)
    }

    fn as_bool(&self) -> Option<bool> {
        Value::as_bool(self)
    }

    fn as_u64(&self) -> Option<u64> {
        Value::as_u64(self)
    }

    fn as_array(&self) -> Option<&[Self]> {
        Value::as_array(self).map(Vec::as_slice)
    }

    fn is_null(&self) -> bool {
        Value::is_null(self)
    }
}

/// Look up a key, treating an explicit `null` the same as absence
pub(crate) fn optional<'a, V: JsonNode>(node: &'a V, key: &str) -> Option<&'a V> {
    node.get(key).filter(|v| !v.is_null())
}

pub(crate) fn required<'a, V: JsonNode>(node: &'a V, key: &str) -> DecodeResult<&'a V> {
    optional(node, key).ok_or_else(|| DecodeError::MissingField(key.to_string()))
}

pub(crate) fn str_field<'a, V: JsonNode>(node: &'a V, key: &str) -> DecodeResult<&'a str> {
    required(node, key)?
        .as_str()
        .ok_or_else(|| DecodeError::wrong_type(key, "string"))
}

pub(crate) fn opt_str_field<'a, V: JsonNode>(
    node: &'a V,
    key: &str,
) -> DecodeResult<Option<&'a str>> {
    match optional(node, key) {
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| DecodeError::wrong_type(key, "string")),
        None => Ok(None),
    }
}

pub(crate) fn u64_field<V: JsonNode>(node: &V, key: &str) -> DecodeResult<u64> {
    required(node, key)?
        .as_u64()
        .ok_or_else(|| DecodeError::wrong_type(key, "non-negative integer"))
}

pub(crate) fn array_field<'a, V: JsonNode>(node: &'a V, key: &str) -> DecodeResult<&'a [V]> {
    required(node, key)?
        .as_array()
        .ok_or_else(|| DecodeError::wrong_type(key, "array"))
}

/// Absent arrays decode to an empty slice
pub(crate) fn opt_array_field<'a, V: JsonNode>(node: &'a V, key: &str) -> DecodeResult<&'a [V]> {
    match optional(node, key) {
        Some(value) => value
            .as_array()
            .ok_or_else(|| DecodeError::wrong_type(key, "array")),
        None => Ok(&[]),
    }
}

/// Read a string nested one object deep, e.g. `text.text`
pub(crate) fn nested_str_field<'a, V: JsonNode>(
    node: &'a V,
    outer: &str,
    inner: &str,
) -> DecodeResult<&'a str> {
    let path = format!("{}.{}", outer, inner);
    let nested = required(node, outer).map_err(|_| DecodeError::MissingField(path.clone()))?;
    match optional(nested, inner) {
        Some(value) => value
            .as_str()
            .ok_or_else(|| DecodeError::wrong_type(&path, "string")),
        None => Err(DecodeError::MissingField(path)),
    }
}

/// The discriminating `type` field every block and element carries
pub(crate) fn node_type<V: JsonNode>(node: &V) -> DecodeResult<&str> {
    str_field(node, "type")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_optional_treats_null_as_absent() {
        let value = json!({"edited": null, "ts": "1"});
        assert!(optional(&value, "edited").is_none());
        assert!(optional(&value, "missing").is_none());
        assert!(optional(&value, "ts").is_some());
    }

    #[test]
    fn test_get_on_non_object_is_none() {
        let value = json!(["a", "b"]);
        assert!(JsonNode::get(&value, "a").is_none());
    }

    #[test]
    fn test_str_field_reports_missing_and_wrong_type() {
        let value = json!({"name": 3});
        assert_eq!(
            str_field(&value, "text").unwrap_err(),
            DecodeError::MissingField("text".to_string())
        );
        assert_eq!(
            str_field(&value, "name").unwrap_err(),
            DecodeError::wrong_type("name", "string")
        );
    }

    #[test]
    fn test_opt_array_field_absent_is_empty() {
        let value = json!({});
        assert!(opt_array_field(&value, "reactions").unwrap().is_empty());

        let value = json!({"reactions": "nope"});
        assert!(opt_array_field(&value, "reactions").is_err());
    }

    #[test]
    fn test_nested_str_field_reports_full_path() {
        let value = json!({"text": {"type": "plain_text"}});
        assert_eq!(
            nested_str_field(&value, "text", "text").unwrap_err(),
            DecodeError::MissingField("text.text".to_string())
        );

        let value = json!({"text": {"text": "Title"}});
        assert_eq!(nested_str_field(&value, "text", "text").unwrap(), "Title");
    }

    #[test]
    fn test_u64_field_rejects_negative() {
        let value = json!({"size": -1});
        assert!(u64_field(&value, "size").is_err());

        let value = json!({"size": 1024});
        assert_eq!(u64_field(&value, "size").unwrap(), 1024);
    }
}
