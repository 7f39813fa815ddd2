//! Cart line items
//!
//! A `CartItem` keeps every field it was stored with; only `image_url` and
//! `quantity` are ever rewritten.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const NAME_FIELD: &str = "name";
pub const IMAGE_URL_FIELD: &str = "image_url";
pub const QUANTITY_FIELD: &str = "quantity";

/// Image references left behind by earlier serialization bugs
const PLACEHOLDER_IMAGE_URLS: [&str; 2] = ["null", "undefined"];

/// Field rewritten during a repair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairedField {
    ImageUrl,
    Quantity,
}

impl RepairedField {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepairedField::ImageUrl => IMAGE_URL_FIELD,
            RepairedField::Quantity => QUANTITY_FIELD,
        }
    }
}

/// One field change applied to one cart item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRepair {
    /// Position of the item in the cart
    pub index: usize,

    /// Item label, if the item had a string name
    pub name: Option<String>,

    /// Field that was replaced
    pub field: RepairedField,

    /// Value before the repair (`null` when the field was missing)
    pub previous: Value,
}

/// One line item of a cart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartItem {
    fields: Map<String, Value>,
}

impl CartItem {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn name(&self) -> Option<&str> {
        self.fields.get(NAME_FIELD).and_then(Value::as_str)
    }

    pub fn image_url(&self) -> Option<&Value> {
        self.fields.get(IMAGE_URL_FIELD)
    }

    pub fn quantity(&self) -> Option<&Value> {
        self.fields.get(QUANTITY_FIELD)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    /// True when the image reference is a non-empty, non-placeholder string
    pub fn has_valid_image(&self) -> bool {
        match self.image_url() {
            Some(Value::String(url)) => {
                !url.is_empty() && !PLACEHOLDER_IMAGE_URLS.contains(&url.as_str())
            }
            _ => false,
        }
    }

    /// True when the quantity coerces to a number of at least one
    pub fn has_valid_quantity(&self) -> bool {
        self.quantity()
            .and_then(coerce_quantity)
            .is_some_and(|quantity| quantity >= 1.0)
    }

    /// Replace an invalid image reference and an invalid quantity in place.
    ///
    /// Returns the fields that changed with their previous values.
    pub fn repair(&mut self, default_image_url: &str) -> Vec<(RepairedField, Value)> {
        let mut changed = Vec::new();

        if !self.has_valid_image() {
            let previous = self
                .fields
                .insert(IMAGE_URL_FIELD.to_string(), Value::String(default_image_url.to_string()));
            changed.push((RepairedField::ImageUrl, previous.unwrap_or(Value::Null)));
        }

        if !self.has_valid_quantity() {
            let previous = self
                .fields
                .insert(QUANTITY_FIELD.to_string(), Value::from(1));
            changed.push((RepairedField::Quantity, previous.unwrap_or(Value::Null)));
        }

        changed
    }
}

/// Numeric reading of a stored quantity, `None` when it has none.
///
/// Numbers are taken as is, `true`/`false` read as 1/0, and strings are
/// trimmed and parsed as decimal floats (blank reads as 0). Non-finite
/// results, arrays, objects and `null` have no numeric reading.
pub fn coerce_quantity(value: &Value) -> Option<f64> {
    let quantity = match value {
        Value::Number(number) => number.as_f64()?,
        Value::Bool(flag) => f64::from(u8::from(*flag)),
        Value::String(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().ok()?
            }
        }
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };

    quantity.is_finite().then_some(quantity)
}

impl From<Map<String, Value>> for CartItem {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}
