#![forbid(unsafe_code)]

//! Core decision engine for the studio training method.
//!
//! This crate provides:
//! - Domain types (assessments, exercises, blocks, plans)
//! - The built-in exercise catalog
//! - Condition evaluation and the block-routing rule engine
//! - The workout assembler
//! - Structural schedule validation
//!
//! Everything here is pure and synchronous: rule sets and the catalog are
//! loaded by the caller and passed in read-only, so concurrent invocations
//! need no locking.

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod condition;
pub mod rules;
pub mod assembler;
pub mod validator;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, default_catalog, Catalog};
pub use config::Config;
pub use condition::{evaluate, evaluate_all, Condition, ConditionTrace, ConditionValue};
pub use rules::{explain_all, select_block, BlockSelection, Rule, RuleSet, RuleTrace};
pub use assembler::{assemble_workout, AssemblyParams};
pub use validator::{validate_schedule, ValidationReport};
