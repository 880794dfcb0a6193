//! # Rules Core
//!
//! Core data structures and types for the rule-driven object validator.
//!
//! This crate provides the building blocks shared by the validation engine and
//! the rule-file loader. It does not validate anything by itself.
//!
//! ## Key Concepts
//!
//! - **Rule tree**: an ordered list of [`FieldRule`]s describing one level of an object
//! - **Constraint rule**: a single named check with parameters, resolved by name at validation time
//! - **Field access**: the [`FieldAccess`] trait that lets the validator read named fields
//!   off any value without knowing its concrete type
//! - **Errors**: the fail-fast [`ValidationError`] taxonomy
//!
//! ## Example
//!
//! ```rust
//! use rules_core::{ConstraintRule, FieldRule, FieldRuleBuilder};
//!
//! let rules = vec![
//!     FieldRuleBuilder::scalar("orderId")
//!         .required()
//!         .pattern_with_message("^ORD-[0-9]{6}$", "must match format ORD-XXXXXX")
//!         .build(),
//!     FieldRule::object(
//!         "customer",
//!         vec![ConstraintRule::required()],
//!         vec![FieldRuleBuilder::scalar("name").min_length(2).build()],
//!     ),
//! ];
//!
//! assert!(rules.iter().all(FieldRule::is_required));
//! ```

pub mod builder;
pub mod error;
pub mod rule;
pub mod value;

pub use builder::*;
pub use error::*;
pub use rule::*;
pub use value::*;
