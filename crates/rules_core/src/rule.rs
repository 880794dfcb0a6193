//! Rule tree types.
//!
//! A rule tree is an ordered list of [`FieldRule`]s describing one level of an
//! object. Each field rule names a field, carries its own constraint rules and,
//! depending on its [`FieldKind`], the rules for a nested object or for the
//! items of a list.
//!
//! The serialized shape is the one rule files use:
//!
//! ```yaml
//! - field: customer
//!   type: object          # absent for scalar fields
//!   rules:
//!     - type: required
//!   fields:               # only for `type: object`
//!     - field: email
//!       rules:
//!         - type: pattern
//!           value: "^[A-Za-z0-9+_.-]+@(.+)$"
//!           message: must be a valid email address
//! - field: items
//!   type: list
//!   itemValidations:      # only for `type: list`
//!     - field: quantity
//!       rules:
//!         - type: min
//!           value: 1
//! ```

use crate::{Result, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Name of the constraint type that marks a field as required.
pub const REQUIRED: &str = "required";

/// Validation rules for a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFieldRule", into = "RawFieldRule")]
pub struct FieldRule {
    /// Name of the field to read from the current value
    pub field: String,

    /// Constraint rules applied to the field, in order
    pub rules: Vec<ConstraintRule>,

    /// Scalar, nested object or list, with kind-specific child rules
    pub kind: FieldKind,
}

/// What a field holds, and the child rules that only make sense for it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldKind {
    /// A plain value checked by its constraint rules
    #[default]
    Scalar,

    /// A nested object validated against its own rule tree
    Object {
        /// Rule tree for the nested object
        fields: Vec<FieldRule>,
    },

    /// A list whose elements are optionally validated one by one
    List {
        /// Rule tree applied to each element, if any
        items: Option<Vec<FieldRule>>,
    },
}

impl FieldKind {
    /// Returns the kind name used in rule files.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Scalar => "scalar",
            FieldKind::Object { .. } => "object",
            FieldKind::List { .. } => "list",
        }
    }
}

impl FieldRule {
    /// Creates a scalar field rule.
    pub fn scalar(field: impl Into<String>, rules: Vec<ConstraintRule>) -> Self {
        Self {
            field: field.into(),
            rules,
            kind: FieldKind::Scalar,
        }
    }

    /// Creates a nested-object field rule.
    pub fn object(
        field: impl Into<String>,
        rules: Vec<ConstraintRule>,
        fields: Vec<FieldRule>,
    ) -> Self {
        Self {
            field: field.into(),
            rules,
            kind: FieldKind::Object { fields },
        }
    }

    /// Creates a list field rule.
    pub fn list(
        field: impl Into<String>,
        rules: Vec<ConstraintRule>,
        items: Option<Vec<FieldRule>>,
    ) -> Self {
        Self {
            field: field.into(),
            rules,
            kind: FieldKind::List { items },
        }
    }

    /// Returns true if any of the field's rules is a `required` rule.
    ///
    /// The position of the rule within the list does not matter.
    pub fn is_required(&self) -> bool {
        self.rules.iter().any(ConstraintRule::is_required)
    }

    /// Rule tree of a nested object field.
    pub fn nested_fields(&self) -> Option<&[FieldRule]> {
        match &self.kind {
            FieldKind::Object { fields } => Some(fields),
            _ => None,
        }
    }

    /// Per-item rule tree of a list field.
    pub fn item_rules(&self) -> Option<&[FieldRule]> {
        match &self.kind {
            FieldKind::List { items } => items.as_deref(),
            _ => None,
        }
    }
}

/// A single named check with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintRule {
    /// Checker name looked up in the registry
    #[serde(rename = "type")]
    pub rule_type: String,

    /// Every other key of the rule (`value`, `message`, ...)
    #[serde(flatten)]
    pub parameters: RuleParameters,
}

impl ConstraintRule {
    /// Creates a rule of the given type without parameters.
    pub fn new(rule_type: impl Into<String>) -> Self {
        Self {
            rule_type: rule_type.into(),
            parameters: RuleParameters::default(),
        }
    }

    /// Creates a `required` rule.
    pub fn required() -> Self {
        Self::new(REQUIRED)
    }

    /// Creates a `pattern` rule.
    pub fn pattern(expression: impl Into<String>) -> Self {
        Self::new("pattern").with_value(expression.into())
    }

    /// Creates a `minLength` rule.
    pub fn min_length(length: i64) -> Self {
        Self::new("minLength").with_value(length)
    }

    /// Creates a `maxLength` rule.
    pub fn max_length(length: i64) -> Self {
        Self::new("maxLength").with_value(length)
    }

    /// Creates a `min` rule.
    pub fn min(bound: i64) -> Self {
        Self::new("min").with_value(bound)
    }

    /// Sets the `value` parameter.
    pub fn with_value(self, value: impl Into<Value>) -> Self {
        self.with_param("value", value)
    }

    /// Sets the `message` parameter.
    pub fn with_message(self, message: impl Into<String>) -> Self {
        self.with_param("message", message.into())
    }

    /// Sets an arbitrary parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name, value);
        self
    }

    /// Returns true if this is a `required` rule.
    pub fn is_required(&self) -> bool {
        self.rule_type == REQUIRED
    }
}

/// Named parameters of a constraint rule.
///
/// Meaning is defined per checker; the typed accessors turn a missing or
/// mistyped parameter into [`ValidationError::InvalidRule`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleParameters(BTreeMap<String, Value>);

impl RuleParameters {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a parameter by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Inserts or replaces a parameter.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `value` parameter, if present.
    pub fn value(&self) -> Option<&Value> {
        self.get("value")
    }

    /// The `message` parameter, if present and a string.
    pub fn message(&self) -> Option<&str> {
        self.get("message").and_then(Value::as_str)
    }

    /// Reads a required string parameter.
    pub fn string(&self, rule: &str, name: &str) -> Result<&str> {
        match self.get(name) {
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(ValidationError::invalid_rule(
                rule,
                format!("parameter '{}' must be a string, found {}", name, other),
            )),
            None => Err(missing_parameter(rule, name)),
        }
    }

    /// Reads a required integer parameter.
    ///
    /// Fractional numbers are truncated toward zero.
    pub fn integer(&self, rule: &str, name: &str) -> Result<i64> {
        match self.get(name) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
                .ok_or_else(|| {
                    ValidationError::invalid_rule(
                        rule,
                        format!("parameter '{}' is out of range: {}", name, n),
                    )
                }),
            Some(other) => Err(ValidationError::invalid_rule(
                rule,
                format!("parameter '{}' must be an integer, found {}", name, other),
            )),
            None => Err(missing_parameter(rule, name)),
        }
    }
}

impl FromIterator<(String, Value)> for RuleParameters {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn missing_parameter(rule: &str, name: &str) -> ValidationError {
    ValidationError::invalid_rule(rule, format!("missing parameter '{}'", name))
}

/// Errors raised while turning a serialized rule into a [`FieldRule`].
#[derive(Debug, Error)]
pub enum RuleTreeError {
    /// The `field` key is empty
    #[error("field rule has an empty 'field' name")]
    EmptyFieldName,

    /// The `type` key names no known field kind
    #[error("field '{field}' has unknown type '{kind}' (expected 'object' or 'list')")]
    UnknownKind { field: String, kind: String },

    /// A kind-specific key appears on a rule of another kind
    #[error("field '{field}' of type '{kind}' cannot declare '{key}'")]
    MisplacedKey {
        field: String,
        kind: &'static str,
        key: &'static str,
    },
}

/// Serialized form of a field rule, before kind-specific keys are checked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFieldRule {
    field: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    rules: Option<Vec<ConstraintRule>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    fields: Option<Vec<FieldRule>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    item_validations: Option<Vec<FieldRule>>,
}

impl TryFrom<RawFieldRule> for FieldRule {
    type Error = RuleTreeError;

    fn try_from(raw: RawFieldRule) -> std::result::Result<Self, Self::Error> {
        if raw.field.trim().is_empty() {
            return Err(RuleTreeError::EmptyFieldName);
        }

        let misplaced = |kind: &'static str, key: &'static str| RuleTreeError::MisplacedKey {
            field: raw.field.clone(),
            kind,
            key,
        };

        let kind = match raw.kind.as_deref() {
            None | Some("scalar") => {
                if raw.fields.is_some() {
                    return Err(misplaced("scalar", "fields"));
                }
                if raw.item_validations.is_some() {
                    return Err(misplaced("scalar", "itemValidations"));
                }
                FieldKind::Scalar
            }
            Some("object") => {
                if raw.item_validations.is_some() {
                    return Err(misplaced("object", "itemValidations"));
                }
                FieldKind::Object {
                    fields: raw.fields.unwrap_or_default(),
                }
            }
            Some("list") => {
                if raw.fields.is_some() {
                    return Err(misplaced("list", "fields"));
                }
                FieldKind::List {
                    items: raw.item_validations,
                }
            }
            Some(other) => {
                return Err(RuleTreeError::UnknownKind {
                    field: raw.field.clone(),
                    kind: other.to_string(),
                });
            }
        };

        Ok(FieldRule {
            field: raw.field,
            rules: raw.rules.unwrap_or_default(),
            kind,
        })
    }
}

impl From<FieldRule> for RawFieldRule {
    fn from(rule: FieldRule) -> Self {
        let rules = (!rule.rules.is_empty()).then_some(rule.rules);
        match rule.kind {
            FieldKind::Scalar => RawFieldRule {
                field: rule.field,
                kind: None,
                rules,
                fields: None,
                item_validations: None,
            },
            FieldKind::Object { fields } => RawFieldRule {
                field: rule.field,
                kind: Some("object".to_string()),
                rules,
                fields: Some(fields),
                item_validations: None,
            },
            FieldKind::List { items } => RawFieldRule {
                field: rule.field,
                kind: Some("list".to_string()),
                rules,
                fields: None,
                item_validations: items,
            },
        }
    }
}
