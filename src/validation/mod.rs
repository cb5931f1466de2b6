//! Validation functionality
//!
//! Provides validation logic for target table specs (names, projected
//! columns, key invariant). Data rows are never validated against each other:
//! dangling fact → dimension references are allowed.

pub mod specs;

pub use specs::{SpecValidationError, SpecValidator, validate_table_name};
