//! Language-specific abstractions.
//!
//! This module provides traits and types for language-specific code generation:
//! - [`LanguageEmitter`] - Strategy rendering the stack IR in one language
//! - [`LanguageCodegen`] - Main trait for language code generators
//! - [`NamingConvention`] - Language-specific naming rules
//! - [`GenerateResult`] - Result of code generation
//! - [`PreviewFile`] - Generated file preview

mod naming;
mod traits;

pub use naming::NamingConvention;
pub use traits::{
    CfnOption, ConditionFunction, GenerateResult, LanguageCodegen, LanguageEmitter, PreviewFile,
    write_files,
};
