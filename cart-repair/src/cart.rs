//! Cart blob parsing and serialization

use serde::Serialize;
use serde_json::Value;

use crate::error::{CartError, CartResult};
use crate::item::CartItem;

/// One element of a stored cart array
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CartEntry {
    /// A JSON object, repaired as a line item
    Item(CartItem),
    /// Anything else found in the array, kept as stored
    Other(Value),
}

/// Ordered list of cart entries as held under the storage key
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Parse a raw stored blob.
    ///
    /// Fails with `CartError::Format` on invalid JSON and
    /// `CartError::Shape` when the document is not an array.
    pub fn parse(raw: &str) -> CartResult<Self> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> CartResult<Self> {
        let elements = match value {
            Value::Array(elements) => elements,
            other => {
                return Err(CartError::Shape {
                    found: value_kind(&other),
                })
            }
        };

        let entries = elements
            .into_iter()
            .map(|element| match element {
                Value::Object(fields) => CartEntry::Item(CartItem::new(fields)),
                other => CartEntry::Other(other),
            })
            .collect();

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [CartEntry] {
        &mut self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = &CartItem> {
        self.entries.iter().filter_map(|entry| match entry {
            CartEntry::Item(item) => Some(item),
            CartEntry::Other(_) => None,
        })
    }

    /// Compact JSON, the form written back to storage
    pub fn to_json(&self) -> CartResult<String> {
        serde_json::to_string(self)
            .map_err(|e| CartError::Storage(format!("failed to serialize cart: {e}")))
    }
}

/// JSON type name used in shape diagnostics
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_array() {
        let cart = Cart::parse(r#"[{"name":"A"},"loose",3]"#).unwrap();
        assert_eq!(cart.len(), 3);
        assert_eq!(cart.items().count(), 1);
        assert_eq!(cart.entries().get(1), Some(&CartEntry::Other(Value::from("loose"))));
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let err = Cart::parse(r#"{"name":"A"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
        assert!(err.to_string().contains("found object"));

        let err = Cart::parse("42").unwrap_err();
        assert!(err.to_string().contains("found number"));
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = Cart::parse("[{name:").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_to_json_preserves_layout() {
        let raw = r#"[{"quantity":2,"name":"A","image_url":"/a.png","sku":"x-1"},null]"#;
        let cart = Cart::parse(raw).unwrap();
        assert_eq!(cart.to_json().unwrap(), raw);
    }
}
