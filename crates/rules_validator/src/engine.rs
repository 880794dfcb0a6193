//! Main validation engine.
//!
//! This module provides the [`ObjectValidator`], which walks a value graph
//! along a rule tree and stops at the first violated constraint.
//!
//! For every field rule, in order, the validator:
//! 1. reads the field through [`FieldAccess`];
//! 2. works out whether the field is required (a `required` rule anywhere in
//!    its rule list);
//! 3. dispatches on the field kind:
//!    - **scalar**: runs each constraint rule through the registry;
//!    - **object**: fails if a required object is null, skips an optional null
//!      one, and otherwise validates the object against its nested rule tree;
//!    - **list**: fails if a required list is null or empty, skips an optional
//!      null or empty one, and otherwise runs the list-level rules (with the
//!      field name `list`) and then validates every element against the item
//!      rule tree.
//!
//! There is no cycle detection. A value graph with a reference cycle along a
//! path the rule tree follows recurses without bound; callers must not
//! validate such graphs.

use crate::ValidatorRegistry;
use rules_core::{
    ConstraintRule, FieldAccess, FieldKind, FieldRule, FieldValue, Result, ValidationError,
};
use tracing::{debug, trace};

/// Field name handed to checkers for list-level rules.
pub const LIST_FIELD: &str = "list";

/// Validates values against rule trees.
///
/// The validator owns its [`ValidatorRegistry`]; register custom checkers
/// through [`ObjectValidator::registry_mut`] before sharing the validator.
/// Validation itself only needs `&self`, so a validator can be shared between
/// threads.
///
/// # Example
///
/// ```rust
/// use rules_core::{DataValue, FieldRuleBuilder};
/// use rules_validator::ObjectValidator;
/// use serde_json::json;
///
/// let rules = vec![
///     FieldRuleBuilder::scalar("orderId")
///         .required()
///         .pattern_with_message("^ORD-[0-9]{6}$", "must match format ORD-XXXXXX")
///         .build(),
/// ];
///
/// let validator = ObjectValidator::new();
///
/// let order = DataValue::from(json!({ "orderId": "ORD-123456" }));
/// assert!(validator.validate(&order.as_field_value(), &rules).is_ok());
///
/// let order = DataValue::from(json!({ "orderId": "INVALID" }));
/// let err = validator.validate(&order.as_field_value(), &rules).unwrap_err();
/// assert_eq!(err.to_string(), "orderId must match format ORD-XXXXXX");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ObjectValidator {
    registry: ValidatorRegistry,
}

impl ObjectValidator {
    /// Creates a validator backed by the builtin checkers.
    pub fn new() -> Self {
        Self::with_registry(ValidatorRegistry::new())
    }

    /// Creates a validator backed by the given registry.
    pub fn with_registry(registry: ValidatorRegistry) -> Self {
        Self { registry }
    }

    /// Returns the checker registry.
    pub fn registry(&self) -> &ValidatorRegistry {
        &self.registry
    }

    /// Returns the checker registry for registration.
    pub fn registry_mut(&mut self) -> &mut ValidatorRegistry {
        &mut self.registry
    }

    /// Validates `target` against `rules`.
    ///
    /// Returns the first violation in rule order. A null target fails with
    /// [`ValidationError::NullTarget`] even when `rules` is empty.
    pub fn validate(&self, target: &FieldValue<'_>, rules: &[FieldRule]) -> Result<()> {
        self.validate_tree(target, rules).inspect_err(|err| {
            debug!(kind = ?err.kind(), "Validation failed: {}", err);
        })
    }

    /// Validates an optional model value against `rules`.
    pub fn validate_object<T: FieldAccess>(
        &self,
        target: Option<&T>,
        rules: &[FieldRule],
    ) -> Result<()> {
        self.validate(&FieldValue::object(target), rules)
    }

    fn validate_tree(&self, target: &FieldValue<'_>, rules: &[FieldRule]) -> Result<()> {
        if target.is_null() {
            return Err(ValidationError::NullTarget);
        }

        for rule in rules {
            let value = read_field(target, &rule.field)?;
            let required = rule.is_required();
            trace!(
                field = %rule.field,
                kind = rule.kind.name(),
                required,
                "Validating field"
            );

            match &rule.kind {
                FieldKind::Scalar => self.apply_rules(&rule.field, &value, &rule.rules)?,
                FieldKind::Object { fields } => {
                    self.validate_nested_object(rule, &value, fields, required)?
                }
                FieldKind::List { items } => {
                    self.validate_list(rule, &value, items.as_deref(), required)?
                }
            }
        }

        Ok(())
    }

    /// Validates a nested object field.
    ///
    /// A present object is always validated against its rule tree, whether or
    /// not the object itself is required.
    fn validate_nested_object(
        &self,
        rule: &FieldRule,
        value: &FieldValue<'_>,
        fields: &[FieldRule],
        required: bool,
    ) -> Result<()> {
        if value.is_null() {
            if required {
                return Err(ValidationError::RequiredObjectNull {
                    field: rule.field.clone(),
                });
            }
            return Ok(());
        }

        self.validate_tree(value, fields)
    }

    /// Validates a list field.
    ///
    /// A required list must be non-null and non-empty. List-level rules and
    /// item rules only run on a non-empty list.
    fn validate_list(
        &self,
        rule: &FieldRule,
        value: &FieldValue<'_>,
        items: Option<&[FieldRule]>,
        required: bool,
    ) -> Result<()> {
        if value.is_null() {
            if required {
                return Err(ValidationError::RequiredListNull {
                    field: rule.field.clone(),
                });
            }
            return Ok(());
        }

        let elements = value
            .as_list()
            .ok_or_else(|| ValidationError::type_mismatch(&rule.field, "list", value.type_name()))?;

        if elements.is_empty() {
            if required {
                return Err(ValidationError::RequiredListEmpty {
                    field: rule.field.clone(),
                });
            }
            return Ok(());
        }

        self.apply_rules(LIST_FIELD, value, &rule.rules)?;

        if let Some(items) = items {
            for element in elements {
                self.validate_tree(element, items)?;
            }
        }

        Ok(())
    }

    /// Runs constraint rules in order, stopping at the first failure.
    fn apply_rules(
        &self,
        field: &str,
        value: &FieldValue<'_>,
        rules: &[ConstraintRule],
    ) -> Result<()> {
        for rule in rules {
            self.registry
                .lookup(&rule.rule_type)?
                .check(field, value, &rule.parameters)?;
        }
        Ok(())
    }
}

/// Reads a named field off the current value.
fn read_field<'a>(target: &FieldValue<'a>, field: &str) -> Result<FieldValue<'a>> {
    match target {
        FieldValue::Object(object) => {
            let object: &'a dyn FieldAccess = *object;
            object
                .field(field)
                .ok_or_else(|| ValidationError::field_access(field, object.type_name()))
        }
        other => Err(ValidationError::field_access(field, other.type_name())),
    }
}
