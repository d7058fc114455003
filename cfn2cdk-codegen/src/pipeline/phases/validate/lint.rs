//! Lint trait for template validation.

use cfn2cdk_template::Template;

use crate::pipeline::Diagnostic;

/// A lint that checks the template for issues.
pub trait Lint: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Check the template and add any diagnostics.
    fn check(&self, template: &Template, diagnostics: &mut Vec<Diagnostic>);
}
