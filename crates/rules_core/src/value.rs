//! Value model read by the validator.
//!
//! The validator never sees concrete model types. It reads named fields
//! through [`FieldAccess`], which each model type implements with an explicit
//! name-to-getter table, and inspects the resulting [`FieldValue`]s.
//! [`DataValue`] is an owned, dynamically typed value (decoded from JSON, YAML
//! or TOML payloads) that implements the same trait.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// Reads named fields off a value at runtime.
///
/// # Example
///
/// ```rust
/// use rules_core::{FieldAccess, FieldValue};
///
/// struct Customer {
///     name: String,
///     email: Option<String>,
/// }
///
/// impl FieldAccess for Customer {
///     fn field(&self, name: &str) -> Option<FieldValue<'_>> {
///         match name {
///             "name" => Some(FieldValue::from(&self.name)),
///             "email" => Some(FieldValue::from(self.email.as_deref())),
///             _ => None,
///         }
///     }
///
///     fn type_name(&self) -> &str {
///         "Customer"
///     }
/// }
///
/// let customer = Customer { name: "Ada".into(), email: None };
/// assert!(customer.field("email").is_some_and(|v| v.is_null()));
/// assert!(customer.field("phone").is_none());
/// ```
pub trait FieldAccess {
    /// Returns the value of the named field, or `None` if the type has no
    /// such field.
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;

    /// Name of the type, used in error messages.
    fn type_name(&self) -> &str {
        "object"
    }
}

/// A borrowed view of a field's value.
#[derive(Clone)]
pub enum FieldValue<'a> {
    /// Null/missing value
    Null,
    /// String value
    String(Cow<'a, str>),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Nested object
    Object(&'a dyn FieldAccess),
    /// List of values
    List(Vec<FieldValue<'a>>),
}

impl<'a> FieldValue<'a> {
    /// Wraps an optional model value as a nested object.
    pub fn object<T: FieldAccess>(value: Option<&'a T>) -> Self {
        match value {
            Some(v) => FieldValue::Object(v),
            None => FieldValue::Null,
        }
    }

    /// Wraps an optional slice of model values as a list of objects.
    pub fn list_of<T: FieldAccess>(items: Option<&'a [T]>) -> Self {
        match items {
            Some(items) => FieldValue::List(
                items
                    .iter()
                    .map(|item| FieldValue::Object(item as &dyn FieldAccess))
                    .collect(),
            ),
            None => FieldValue::Null,
        }
    }

    /// Builds a list from any sequence of values.
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<FieldValue<'a>>,
    {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }

    /// Returns true if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &str {
        match self {
            FieldValue::Null => "null",
            FieldValue::String(_) => "string",
            FieldValue::Int(_) => "int64",
            FieldValue::Float(_) => "float64",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Object(o) => o.type_name(),
            FieldValue::List(_) => "list",
        }
    }

    /// Attempts to get this value as a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to get this value as a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Attempts to get this value as a list.
    pub fn as_list(&self) -> Option<&[FieldValue<'a>]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Attempts to get this value as a nested object.
    pub fn as_object(&self) -> Option<&'a dyn FieldAccess> {
        match self {
            FieldValue::Object(o) => Some(*o),
            _ => None,
        }
    }

    /// String representation of a scalar value.
    ///
    /// Returns `None` for null, objects and lists.
    pub fn to_text(&self) -> Option<Cow<'_, str>> {
        match self {
            FieldValue::String(s) => Some(Cow::Borrowed(&**s)),
            FieldValue::Int(i) => Some(Cow::Owned(i.to_string())),
            FieldValue::Float(f) => Some(Cow::Owned(float_text(*f))),
            FieldValue::Bool(b) => Some(Cow::Owned(b.to_string())),
            FieldValue::Null | FieldValue::Object(_) | FieldValue::List(_) => None,
        }
    }
}

/// Whole floats keep a trailing `.0` so they never read as integers.
fn float_text(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("Null"),
            FieldValue::String(s) => f.debug_tuple("String").field(s).finish(),
            FieldValue::Int(i) => f.debug_tuple("Int").field(i).finish(),
            FieldValue::Float(v) => f.debug_tuple("Float").field(v).finish(),
            FieldValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            FieldValue::Object(o) => f.debug_tuple("Object").field(&o.type_name()).finish(),
            FieldValue::List(items) => f.debug_tuple("List").field(items).finish(),
        }
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(s: &'a str) -> Self {
        FieldValue::String(Cow::Borrowed(s))
    }
}

impl<'a> From<&'a String> for FieldValue<'a> {
    fn from(s: &'a String) -> Self {
        FieldValue::String(Cow::Borrowed(s.as_str()))
    }
}

impl From<String> for FieldValue<'_> {
    fn from(s: String) -> Self {
        FieldValue::String(Cow::Owned(s))
    }
}

impl From<i64> for FieldValue<'_> {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue<'_> {
    fn from(i: i32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<u32> for FieldValue<'_> {
    fn from(i: u32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<f64> for FieldValue<'_> {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue<'_> {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl<'a, T: Into<FieldValue<'a>>> From<Option<T>> for FieldValue<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

impl<'a> From<&'a DataValue> for FieldValue<'a> {
    fn from(value: &'a DataValue) -> Self {
        value.as_field_value()
    }
}

/// An owned, dynamically typed value.
///
/// Deserializes from any self-describing format, so request and response
/// payloads can be validated without a Rust model type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum DataValue {
    /// Null/missing value
    #[default]
    Null,
    /// String value
    String(String),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Map/struct value
    Map(HashMap<String, DataValue>),
    /// List/array value
    List(Vec<DataValue>),
}

impl DataValue {
    /// Returns true if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::Null => "null",
            DataValue::String(_) => "string",
            DataValue::Int(_) => "int64",
            DataValue::Float(_) => "float64",
            DataValue::Bool(_) => "boolean",
            DataValue::Map(_) => "map",
            DataValue::List(_) => "list",
        }
    }

    /// Attempts to get this value as a string.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            DataValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to get this value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            DataValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Attempts to get this value as a float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            DataValue::Float(f) => Some(*f),
            DataValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Attempts to get this value as a map.
    pub fn as_map(&self) -> Option<&HashMap<String, DataValue>> {
        match self {
            DataValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Attempts to get this value as a list.
    pub fn as_list(&self) -> Option<&[DataValue]> {
        match self {
            DataValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Looks up a key of a map value.
    pub fn get(&self, key: &str) -> Option<&DataValue> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Borrows this value as a [`FieldValue`].
    pub fn as_field_value(&self) -> FieldValue<'_> {
        match self {
            DataValue::Null => FieldValue::Null,
            DataValue::String(s) => FieldValue::String(Cow::Borrowed(s)),
            DataValue::Int(i) => FieldValue::Int(*i),
            DataValue::Float(f) => FieldValue::Float(*f),
            DataValue::Bool(b) => FieldValue::Bool(*b),
            DataValue::Map(_) => FieldValue::Object(self),
            DataValue::List(items) => {
                FieldValue::List(items.iter().map(DataValue::as_field_value).collect())
            }
        }
    }
}

/// Map values expose their keys as fields; an absent key reads as null.
impl FieldAccess for DataValue {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match self {
            DataValue::Map(map) => Some(
                map.get(name)
                    .map_or(FieldValue::Null, DataValue::as_field_value),
            ),
            _ => None,
        }
    }

    fn type_name(&self) -> &str {
        DataValue::type_name(self)
    }
}

impl From<serde_json::Value> for DataValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => DataValue::Null,
            Value::Bool(b) => DataValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => DataValue::Int(i),
                None => DataValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => DataValue::String(s),
            Value::Array(items) => DataValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                DataValue::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<DataValue> for serde_json::Value {
    fn from(value: DataValue) -> Self {
        use serde_json::Value;

        match value {
            DataValue::Null => Value::Null,
            DataValue::String(s) => Value::String(s),
            DataValue::Int(i) => Value::from(i),
            DataValue::Float(f) => Value::from(f),
            DataValue::Bool(b) => Value::Bool(b),
            DataValue::Map(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
            DataValue::List(items) => Value::Array(items.into_iter().map(Into::into).collect()),
        }
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::String(s)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::String(s.to_string())
    }
}

impl From<i64> for DataValue {
    fn from(i: i64) -> Self {
        DataValue::Int(i)
    }
}

impl From<f64> for DataValue {
    fn from(f: f64) -> Self {
        DataValue::Float(f)
    }
}

impl From<bool> for DataValue {
    fn from(b: bool) -> Self {
        DataValue::Bool(b)
    }
}

impl From<Vec<DataValue>> for DataValue {
    fn from(items: Vec<DataValue>) -> Self {
        DataValue::List(items)
    }
}

impl From<HashMap<String, DataValue>> for DataValue {
    fn from(map: HashMap<String, DataValue>) -> Self {
        DataValue::Map(map)
    }
}
