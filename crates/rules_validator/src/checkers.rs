//! Builtin constraint checkers.
//!
//! This module provides the checkers every registry starts with:
//! - `required`: the value must not be null
//! - `pattern`: the value's string form must fully match a regular expression
//! - `minLength` / `maxLength`: bounds on the length of the value's string form
//! - `min`: lower bound on a numeric value
//!
//! Every checker except `required` treats a null value as nothing to check.

use regex::Regex;
use rules_core::{FieldValue, Result, RuleParameters, ValidationError};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// A named check applied to one field value.
///
/// Checkers may be invoked from several threads at once; a check's outcome
/// depends only on its arguments.
/// Plain functions and closures with the matching signature implement this
/// trait, so custom checkers can be registered without a dedicated type.
pub trait ConstraintChecker: Send + Sync {
    /// Checks `value`, read from `field`, against the rule's parameters.
    fn check(
        &self,
        field: &str,
        value: &FieldValue<'_>,
        parameters: &RuleParameters,
    ) -> Result<()>;
}

impl<F> ConstraintChecker for F
where
    F: Fn(&str, &FieldValue<'_>, &RuleParameters) -> Result<()> + Send + Sync,
{
    fn check(
        &self,
        field: &str,
        value: &FieldValue<'_>,
        parameters: &RuleParameters,
    ) -> Result<()> {
        self(field, value, parameters)
    }
}

/// Returns the builtin checkers, keyed by rule type.
pub fn builtin_checkers() -> Vec<(&'static str, Arc<dyn ConstraintChecker>)> {
    vec![
        entry(RequiredChecker::NAME, RequiredChecker),
        entry(PatternChecker::NAME, PatternChecker::new()),
        entry(MinLengthChecker::NAME, MinLengthChecker),
        entry(MaxLengthChecker::NAME, MaxLengthChecker),
        entry(MinChecker::NAME, MinChecker),
    ]
}

fn entry<C: ConstraintChecker + 'static>(
    name: &'static str,
    checker: C,
) -> (&'static str, Arc<dyn ConstraintChecker>) {
    (name, Arc::new(checker))
}

/// Fails when the value is null.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredChecker;

impl RequiredChecker {
    pub const NAME: &'static str = "required";
}

impl ConstraintChecker for RequiredChecker {
    fn check(&self, field: &str, value: &FieldValue<'_>, _: &RuleParameters) -> Result<()> {
        if value.is_null() {
            return Err(ValidationError::required(field));
        }
        Ok(())
    }
}

/// Fails unless the value's string form fully matches `value`.
///
/// The optional `message` parameter replaces the default
/// `must match pattern: <expr>` text. Compiled expressions are cached per
/// checker, keyed by the expression text.
#[derive(Debug, Default)]
pub struct PatternChecker {
    cache: RwLock<HashMap<String, Regex>>,
}

impl PatternChecker {
    pub const NAME: &'static str = "pattern";

    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a compiled regex from cache or compiles and caches it.
    fn get_or_compile_regex(&self, expression: &str) -> Result<Regex> {
        if let Some(regex) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(expression)
        {
            return Ok(regex.clone());
        }

        // Anchored so the whole string has to match, not just a substring.
        let regex = Regex::new(&format!("^(?:{})$", expression))
            .map_err(|e| ValidationError::invalid_rule(Self::NAME, e.to_string()))?;

        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(expression.to_string(), regex.clone());
        Ok(regex)
    }

    #[cfg(test)]
    fn cached_len(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl ConstraintChecker for PatternChecker {
    fn check(
        &self,
        field: &str,
        value: &FieldValue<'_>,
        parameters: &RuleParameters,
    ) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }

        let expression = parameters.string(Self::NAME, "value")?;
        let regex = self.get_or_compile_regex(expression)?;

        let text = scalar_text(field, value)?;
        if !regex.is_match(&text) {
            let message = parameters
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| format!("must match pattern: {}", expression));
            return Err(ValidationError::PatternMismatch {
                field: field.to_string(),
                message,
            });
        }

        Ok(())
    }
}

/// Fails when the value's string form has fewer than `value` characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinLengthChecker;

impl MinLengthChecker {
    pub const NAME: &'static str = "minLength";
}

impl ConstraintChecker for MinLengthChecker {
    fn check(
        &self,
        field: &str,
        value: &FieldValue<'_>,
        parameters: &RuleParameters,
    ) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }

        let min_length = parameters.integer(Self::NAME, "value")?;
        if text_length(field, value)? < min_length {
            return Err(ValidationError::LengthViolation {
                field: field.to_string(),
                message: format!("must be at least {} characters", min_length),
            });
        }

        Ok(())
    }
}

/// Fails when the value's string form has more than `value` characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxLengthChecker;

impl MaxLengthChecker {
    pub const NAME: &'static str = "maxLength";
}

impl ConstraintChecker for MaxLengthChecker {
    fn check(
        &self,
        field: &str,
        value: &FieldValue<'_>,
        parameters: &RuleParameters,
    ) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }

        let max_length = parameters.integer(Self::NAME, "value")?;
        if text_length(field, value)? > max_length {
            return Err(ValidationError::LengthViolation {
                field: field.to_string(),
                message: format!("must not exceed {} characters", max_length),
            });
        }

        Ok(())
    }
}

/// Fails when a numeric value is below `value`.
///
/// Both the bound and the value are compared by their integer part.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinChecker;

impl MinChecker {
    pub const NAME: &'static str = "min";
}

impl ConstraintChecker for MinChecker {
    fn check(
        &self,
        field: &str,
        value: &FieldValue<'_>,
        parameters: &RuleParameters,
    ) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }

        let min = parameters.integer(Self::NAME, "value")? as f64;
        let actual = value
            .as_f64()
            .ok_or_else(|| ValidationError::type_mismatch(field, "number", value.type_name()))?;

        if actual.trunc() < min {
            return Err(ValidationError::RangeViolation {
                field: field.to_string(),
                min,
                actual,
            });
        }

        Ok(())
    }
}

fn scalar_text<'v>(field: &str, value: &'v FieldValue<'_>) -> Result<Cow<'v, str>> {
    value
        .to_text()
        .ok_or_else(|| ValidationError::type_mismatch(field, "scalar", value.type_name()))
}

fn text_length(field: &str, value: &FieldValue<'_>) -> Result<i64> {
    let length = scalar_text(field, value)?.chars().count();
    Ok(i64::try_from(length).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rules_core::{ConstraintRule, ErrorKind};

    fn params(rule: ConstraintRule) -> RuleParameters {
        rule.parameters
    }

    #[test]
    fn test_required() {
        let none = RuleParameters::new();
        assert!(RequiredChecker.check("name", &"Ada".into(), &none).is_ok());
        assert!(RequiredChecker.check("name", &"".into(), &none).is_ok());

        let err = RequiredChecker
            .check("name", &FieldValue::Null, &none)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequiredFieldMissing);
        assert_eq!(err.to_string(), "name is required");
    }

    #[test]
    fn test_pattern_full_match() {
        let p = params(ConstraintRule::pattern("^ORD-[0-9]{6}$"));
        assert!(PatternChecker::new().check("orderId", &"ORD-123456".into(), &p).is_ok());

        let err = PatternChecker::new()
            .check("orderId", &"INVALID".into(), &p)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PatternMismatch);
        assert_eq!(
            err.to_string(),
            "orderId must match pattern: ^ORD-[0-9]{6}$"
        );

        // Unanchored expressions still have to match the whole value.
        let p = params(ConstraintRule::pattern("[0-9]+"));
        assert!(PatternChecker::new().check("code", &"123".into(), &p).is_ok());
        assert!(PatternChecker::new().check("code", &"a123".into(), &p).is_err());
    }

    #[test]
    fn test_pattern_custom_message() {
        let p = params(
            ConstraintRule::pattern("^[A-Za-z0-9+_.-]+@(.+)$")
                .with_message("must be a valid email address"),
        );
        let err = PatternChecker::new()
            .check("email", &"invalid-email".into(), &p)
            .unwrap_err();
        assert_eq!(err.to_string(), "email must be a valid email address");
    }

    #[test]
    fn test_pattern_matches_string_form_of_numbers() {
        let p = params(ConstraintRule::pattern("[0-9]{3}"));
        assert!(PatternChecker::new().check("code", &FieldValue::Int(123), &p).is_ok());
        assert!(PatternChecker::new().check("code", &FieldValue::Int(12), &p).is_err());
    }

    #[test]
    fn test_pattern_null_and_bad_rules() {
        let p = params(ConstraintRule::pattern("^x$"));
        assert!(PatternChecker::new().check("f", &FieldValue::Null, &p).is_ok());

        let p = params(ConstraintRule::pattern("[invalid(regex"));
        let err = PatternChecker::new().check("f", &"x".into(), &p).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRule);

        let p = params(ConstraintRule::new("pattern"));
        let err = PatternChecker::new().check("f", &"x".into(), &p).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRule);

        let p = params(ConstraintRule::pattern(".*"));
        let err = PatternChecker::new()
            .check("f", &FieldValue::list(vec!["a"]), &p)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_pattern_compiles_each_expression_once() {
        let checker = PatternChecker::new();
        let p = params(ConstraintRule::pattern("PROD-[0-9]{3}"));

        assert!(checker.check("productId", &"PROD-001".into(), &p).is_ok());
        assert!(checker.check("productId", &"PROD-002".into(), &p).is_ok());
        assert!(checker.check("productId", &"SKU-1".into(), &p).is_err());
        assert_eq!(checker.cached_len(), 1);

        let p = params(ConstraintRule::pattern("[0-9]+"));
        assert!(checker.check("quantity", &FieldValue::Int(7), &p).is_ok());
        assert_eq!(checker.cached_len(), 2);
    }

    #[test]
    fn test_whole_floats_keep_decimal_point() {
        let p = params(ConstraintRule::pattern("[0-9]+\\.[0-9]+"));
        assert!(
            PatternChecker::new()
                .check("price", &FieldValue::Float(10.0), &p)
                .is_ok()
        );

        let p = params(ConstraintRule::max_length(3));
        let err = MaxLengthChecker
            .check("price", &FieldValue::Float(10.0), &p)
            .unwrap_err();
        assert_eq!(err.to_string(), "price must not exceed 3 characters");

        let p = params(ConstraintRule::min_length(4));
        assert!(MinLengthChecker.check("price", &FieldValue::Float(10.0), &p).is_ok());
    }

    #[test]
    fn test_min_length() {
        let p = params(ConstraintRule::min_length(2));
        assert!(MinLengthChecker.check("name", &"Al".into(), &p).is_ok());
        assert!(MinLengthChecker.check("name", &FieldValue::Null, &p).is_ok());

        let err = MinLengthChecker.check("name", &"A".into(), &p).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LengthViolation);
        assert_eq!(err.to_string(), "name must be at least 2 characters");
    }

    #[test]
    fn test_length_counts_characters() {
        let p = params(ConstraintRule::max_length(3));
        assert!(MaxLengthChecker.check("name", &"äöü".into(), &p).is_ok());
    }

    #[test]
    fn test_max_length() {
        let p = params(ConstraintRule::max_length(20));
        assert!(MaxLengthChecker.check("productId", &"PROD-001".into(), &p).is_ok());

        let err = MaxLengthChecker
            .check("productId", &"P".repeat(21).into(), &p)
            .unwrap_err();
        assert_eq!(err.to_string(), "productId must not exceed 20 characters");
    }

    #[test]
    fn test_min() {
        let p = params(ConstraintRule::min(1));
        assert!(MinChecker.check("quantity", &FieldValue::Int(1), &p).is_ok());
        assert!(MinChecker.check("quantity", &FieldValue::Float(1.7), &p).is_ok());
        assert!(MinChecker.check("quantity", &FieldValue::Null, &p).is_ok());

        let err = MinChecker
            .check("quantity", &FieldValue::Int(0), &p)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RangeViolation);
        assert_eq!(err.to_string(), "quantity must be at least 1");

        let err = MinChecker
            .check("quantity", &FieldValue::Float(0.9), &p)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RangeViolation);
    }

    #[test]
    fn test_min_rejects_non_numeric() {
        let p = params(ConstraintRule::min(1));
        let err = MinChecker.check("quantity", &"2".into(), &p).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_builtin_table() {
        let names: Vec<&str> = builtin_checkers().into_iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            vec!["required", "pattern", "minLength", "maxLength", "min"]
        );
    }
}
