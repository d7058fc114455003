//! Core types and utilities for the cfn2cdk synthesizer.
//!
//! This crate provides the fundamental types shared by the template model,
//! the stack IR and every language backend.

mod file;
mod language;
mod types;
mod utils;

// File operations
pub use file::{File, FileRules, GeneratedFile, Overwrite, WriteResult};
// Fundamental types
pub use language::TargetLanguage;
pub use types::{DeletionPolicy, PseudoParameter, ResourceType, ResourceTypeError, StackKind};
// String utilities
pub use utils::{split_words, to_camel_case, to_kebab_case, to_pascal_case, to_snake_case};
