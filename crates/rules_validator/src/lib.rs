//! # Rules Validator
//!
//! Validation engine for rule trees. This crate provides:
//!
//! - The [`ValidatorRegistry`], mapping rule types to [`ConstraintChecker`]s
//! - The builtin checkers (`required`, `pattern`, `minLength`, `maxLength`, `min`)
//! - The [`ObjectValidator`], which walks a value along a rule tree and fails fast
//!
//! ## Example
//!
//! ```rust
//! use rules_core::{ErrorKind, FieldRuleBuilder, FieldValue};
//! use rules_validator::ObjectValidator;
//!
//! let validator = ObjectValidator::new();
//! let rules = vec![FieldRuleBuilder::scalar("id").required().build()];
//!
//! let err = validator.validate(&FieldValue::Null, &rules).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::NullTarget);
//! ```

mod checkers;
mod engine;
mod registry;

pub use checkers::*;
pub use engine::*;
pub use registry::*;
