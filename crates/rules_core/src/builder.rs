//! Builder pattern for creating rule trees.
//!
//! Rule trees are normally produced by a rule-file loader; the builders here
//! give the same trees a fluent API for code and tests.

use crate::{ConstraintRule, FieldKind, FieldRule};

/// Builder for creating a `FieldRule`.
///
/// # Example
///
/// ```rust
/// use rules_core::FieldRuleBuilder;
///
/// let rules = vec![
///     FieldRuleBuilder::scalar("orderId")
///         .required()
///         .pattern("^ORD-[0-9]{6}$")
///         .max_length(10)
///         .build(),
///     FieldRuleBuilder::list("items")
///         .required()
///         .items(vec![FieldRuleBuilder::scalar("quantity").min(1).build()])
///         .build(),
/// ];
///
/// assert!(rules[0].is_required());
/// assert_eq!(rules[1].item_rules().map(<[_]>::len), Some(1));
/// ```
#[derive(Debug)]
pub struct FieldRuleBuilder {
    field: String,
    rules: Vec<ConstraintRule>,
    kind: FieldKind,
}

impl FieldRuleBuilder {
    /// Creates a builder for a scalar field.
    pub fn scalar(field: impl Into<String>) -> Self {
        Self::with_kind(field, FieldKind::Scalar)
    }

    /// Creates a builder for a nested object field with an empty rule tree.
    pub fn object(field: impl Into<String>) -> Self {
        Self::with_kind(field, FieldKind::Object { fields: Vec::new() })
    }

    /// Creates a builder for a list field without item rules.
    pub fn list(field: impl Into<String>) -> Self {
        Self::with_kind(field, FieldKind::List { items: None })
    }

    fn with_kind(field: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            field: field.into(),
            rules: Vec::new(),
            kind,
        }
    }

    /// Adds a constraint rule.
    pub fn rule(mut self, rule: ConstraintRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds a `required` rule.
    pub fn required(self) -> Self {
        self.rule(ConstraintRule::required())
    }

    /// Adds a `pattern` rule with the default message.
    pub fn pattern(self, expression: impl Into<String>) -> Self {
        self.rule(ConstraintRule::pattern(expression))
    }

    /// Adds a `pattern` rule with a custom message.
    pub fn pattern_with_message(
        self,
        expression: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.rule(ConstraintRule::pattern(expression).with_message(message))
    }

    /// Adds a `minLength` rule.
    pub fn min_length(self, length: i64) -> Self {
        self.rule(ConstraintRule::min_length(length))
    }

    /// Adds a `maxLength` rule.
    pub fn max_length(self, length: i64) -> Self {
        self.rule(ConstraintRule::max_length(length))
    }

    /// Adds a `min` rule.
    pub fn min(self, bound: i64) -> Self {
        self.rule(ConstraintRule::min(bound))
    }

    /// Sets the nested rule tree.
    ///
    /// Turns the builder into an object builder if it was not one already.
    pub fn fields(mut self, fields: Vec<FieldRule>) -> Self {
        self.kind = FieldKind::Object { fields };
        self
    }

    /// Sets the per-item rule tree.
    ///
    /// Turns the builder into a list builder if it was not one already.
    pub fn items(mut self, items: Vec<FieldRule>) -> Self {
        self.kind = FieldKind::List { items: Some(items) };
        self
    }

    /// Builds the field rule.
    pub fn build(self) -> FieldRule {
        FieldRule {
            field: self.field,
            rules: self.rules,
            kind: self.kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scalar_builder_keeps_rule_order() {
        let rule = FieldRuleBuilder::scalar("name")
            .min_length(2)
            .required()
            .max_length(50)
            .build();

        let types: Vec<&str> = rule.rules.iter().map(|r| r.rule_type.as_str()).collect();
        assert_eq!(types, vec!["minLength", "required", "maxLength"]);
        assert!(rule.is_required());
        assert_eq!(rule.kind, FieldKind::Scalar);
    }

    #[test]
    fn test_object_builder() {
        let rule = FieldRuleBuilder::object("customer")
            .required()
            .fields(vec![FieldRuleBuilder::scalar("email").build()])
            .build();

        assert_eq!(rule.nested_fields().map(<[_]>::len), Some(1));
    }

    #[test]
    fn test_list_builder() {
        let rule = FieldRuleBuilder::list("items").build();
        assert_eq!(rule.kind, FieldKind::List { items: None });

        let rule = FieldRuleBuilder::list("items")
            .items(vec![FieldRuleBuilder::scalar("quantity").min(1).build()])
            .build();
        assert_eq!(rule.item_rules().map(<[_]>::len), Some(1));
    }

    #[test]
    fn test_pattern_with_message() {
        let rule = FieldRuleBuilder::scalar("orderId")
            .pattern_with_message("^ORD-[0-9]{6}$", "must match format ORD-XXXXXX")
            .build();

        let pattern = &rule.rules[0];
        assert_eq!(pattern.rule_type, "pattern");
        assert_eq!(
            pattern.parameters.value().and_then(|v| v.as_str()),
            Some("^ORD-[0-9]{6}$")
        );
        assert_eq!(
            pattern.parameters.message(),
            Some("must match format ORD-XXXXXX")
        );
    }
}
