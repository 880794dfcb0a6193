//! Registry mapping rule types to constraint checkers.

use crate::{ConstraintChecker, builtin_checkers};
use rules_core::{FieldValue, Result, RuleParameters, ValidationError};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Name-to-checker lookup table.
///
/// A registry created with [`ValidatorRegistry::new`] holds the builtin
/// checkers; more can be registered at startup. Registration needs `&mut self`,
/// so a registry shared across validation threads cannot change underneath
/// them.
///
/// # Example
///
/// ```rust
/// use rules_core::{FieldValue, RuleParameters, ValidationError};
/// use rules_validator::ValidatorRegistry;
///
/// let mut registry = ValidatorRegistry::new();
/// registry.register_fn(
///     "notBlank",
///     |field: &str, value: &FieldValue<'_>, _: &RuleParameters| match value.as_str() {
///         Some(s) if s.trim().is_empty() => {
///             Err(ValidationError::constraint(field, "must not be blank"))
///         }
///         _ => Ok(()),
///     },
/// );
///
/// assert!(registry.contains("notBlank"));
/// assert!(registry.lookup("required").is_ok());
/// ```
#[derive(Clone)]
pub struct ValidatorRegistry {
    checkers: HashMap<String, Arc<dyn ConstraintChecker>>,
}

impl ValidatorRegistry {
    /// Creates a registry holding the builtin checkers.
    pub fn new() -> Self {
        let mut registry = Self::empty();

        for (rule_type, checker) in builtin_checkers() {
            registry.register(rule_type, checker);
        }

        info!("Registered {} builtin constraint checkers", registry.len());
        registry
    }

    /// Creates a registry without any checkers.
    pub fn empty() -> Self {
        Self {
            checkers: HashMap::new(),
        }
    }

    /// Binds `checker` to `rule_type`, replacing any previous binding.
    pub fn register(&mut self, rule_type: impl Into<String>, checker: Arc<dyn ConstraintChecker>) {
        let rule_type = rule_type.into();
        debug!("Registering constraint checker: {}", rule_type);
        if self.checkers.insert(rule_type.clone(), checker).is_some() {
            debug!("Replaced existing checker for '{}'", rule_type);
        }
    }

    /// Binds a closure or function to `rule_type`.
    pub fn register_fn<F>(&mut self, rule_type: impl Into<String>, checker: F)
    where
        F: Fn(&str, &FieldValue<'_>, &RuleParameters) -> Result<()> + Send + Sync + 'static,
    {
        self.register(rule_type, Arc::new(checker));
    }

    /// Returns the checker bound to `rule_type`.
    pub fn lookup(&self, rule_type: &str) -> Result<&Arc<dyn ConstraintChecker>> {
        self.checkers
            .get(rule_type)
            .ok_or_else(|| ValidationError::UnknownValidatorType(rule_type.to_string()))
    }

    /// Returns true if a checker is bound to `rule_type`.
    pub fn contains(&self, rule_type: &str) -> bool {
        self.checkers.contains_key(rule_type)
    }

    /// Returns all registered rule types, sorted.
    pub fn registered_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.checkers.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Returns the number of registered checkers.
    pub fn len(&self) -> usize {
        self.checkers.len()
    }

    /// Returns true if no checker is registered.
    pub fn is_empty(&self) -> bool {
        self.checkers.is_empty()
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("types", &self.registered_types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rules_core::ErrorKind;

    fn reject_all(field: &str, _: &FieldValue<'_>, _: &RuleParameters) -> Result<()> {
        Err(ValidationError::constraint(field, "rejected"))
    }

    #[test]
    fn test_builtins_registered() {
        let registry = ValidatorRegistry::new();
        assert_eq!(
            registry.registered_types(),
            vec!["maxLength", "min", "minLength", "pattern", "required"]
        );
    }

    #[test]
    fn test_empty_registry() {
        let registry = ValidatorRegistry::empty();
        assert!(registry.is_empty());
        assert!(!registry.contains("required"));
    }

    #[test]
    fn test_unknown_type() {
        let registry = ValidatorRegistry::new();
        let err = registry.lookup("email").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::UnknownValidatorType);
        assert_eq!(err.to_string(), "Unknown validation type: email");
    }

    #[test]
    fn test_register_then_lookup_returns_same_checker() {
        let mut registry = ValidatorRegistry::empty();
        let checker: Arc<dyn ConstraintChecker> = Arc::new(reject_all);

        registry.register("rejectAll", Arc::clone(&checker));

        let found = registry.lookup("rejectAll").unwrap();
        assert!(Arc::ptr_eq(found, &checker));
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = ValidatorRegistry::new();
        let first: Arc<dyn ConstraintChecker> = Arc::new(reject_all);
        let second: Arc<dyn ConstraintChecker> = Arc::new(reject_all);

        registry.register("custom", Arc::clone(&first));
        registry.register("custom", Arc::clone(&second));

        let found = registry.lookup("custom").unwrap();
        assert!(Arc::ptr_eq(found, &second));
        assert!(!Arc::ptr_eq(found, &first));
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn test_builtin_can_be_overridden() {
        let mut registry = ValidatorRegistry::new();
        registry.register_fn("required", reject_all);

        let err = registry
            .lookup("required")
            .unwrap()
            .check("name", &"present".into(), &RuleParameters::new())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
    }
}
