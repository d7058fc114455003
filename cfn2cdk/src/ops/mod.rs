//! Core operations.
//!
//! This module contains the business logic for cfn2cdk commands,
//! separated from CLI argument parsing and output rendering.

pub mod check;
pub mod synth;

pub use check::check;
pub use synth::{SynthOptions, synth};

use cfn2cdk_codegen::pipeline::{CompilationContext, StackSettings};
use cfn2cdk_template::Template;

use crate::config::Settings;

/// Build the pipeline input from a parsed template and resolved settings.
fn context(template: Template, settings: Settings) -> CompilationContext {
    let stack = StackSettings::new(settings.stack_name).with_kind(settings.kind);
    CompilationContext::new(template, stack).with_resolution(settings.resolution)
}

/// A diagnostic message with its template location on a second line.
fn diagnostic_text(diagnostic: &cfn2cdk_codegen::pipeline::Diagnostic) -> String {
    match &diagnostic.location {
        Some(location) => format!("{}\n  --> {}", diagnostic.message, location),
        None => diagnostic.message.clone(),
    }
}
