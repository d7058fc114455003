//! Validate phase - runs lints over the template.

mod lint;
pub mod lints;

use eyre::{Result, bail};
pub use lint::Lint;
pub use lints::{UnusedConditionLint, UnusedMappingLint, UnusedParameterLint};

use crate::pipeline::{CompilationContext, Phase};

/// Phase that checks the template with configurable lints.
///
/// Structural problems are rejected while parsing; lints report things that
/// are legal but probably unintended.
pub struct ValidatePhase {
    lints: Vec<Box<dyn Lint>>,
}

impl ValidatePhase {
    /// Create a validate phase with the default lints.
    pub fn new() -> Self {
        Self {
            lints: vec![
                Box::new(UnusedParameterLint),
                Box::new(UnusedMappingLint),
                Box::new(UnusedConditionLint),
            ],
        }
    }

    /// Create a validate phase with no lints.
    pub fn empty() -> Self {
        Self { lints: Vec::new() }
    }

    pub fn with_lint(mut self, lint: impl Lint + 'static) -> Self {
        self.lints.push(Box::new(lint));
        self
    }

    pub fn lint_names(&self) -> Vec<&'static str> {
        self.lints.iter().map(|l| l.name()).collect()
    }
}

impl Default for ValidatePhase {
    fn default() -> Self {
        Self::new()
    }
}

impl Phase for ValidatePhase {
    fn name(&self) -> &'static str {
        "validate"
    }

    fn description(&self) -> &'static str {
        "Lint the template and collect diagnostics"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        for lint in &self.lints {
            lint.check(&ctx.template, &mut ctx.diagnostics);
        }

        // Warnings are allowed.
        if ctx.has_errors() {
            bail!("Validation failed with {} error(s)", ctx.error_count());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use cfn2cdk_template::Template;

    use super::*;
    use crate::pipeline::{Diagnostic, StackSettings};

    fn make_context(yaml: &str) -> CompilationContext {
        let template = cfn2cdk_template::parse_template(yaml, "test.yaml")
            .expect("Failed to parse test template");
        CompilationContext::new(template, StackSettings::new("TestStack"))
    }

    const TEMPLATE: &str = r#"
Parameters:
  Unused:
    Type: String
    Default: x
Resources:
  Topic:
    Type: AWS::SNS::Topic
"#;

    #[test]
    fn test_with_errors() {
        struct AlwaysErrorLint;
        impl Lint for AlwaysErrorLint {
            fn name(&self) -> &'static str {
                "always-error"
            }
            fn description(&self) -> &'static str {
                "Always produces an error"
            }
            fn check(&self, _template: &Template, diagnostics: &mut Vec<Diagnostic>) {
                diagnostics.push(Diagnostic::error("test", "forced error"));
            }
        }

        let mut ctx = make_context(TEMPLATE);
        let phase = ValidatePhase::empty().with_lint(AlwaysErrorLint);

        assert!(phase.run(&mut ctx).is_err());
        assert!(ctx.has_errors());
    }

    #[test]
    fn test_warnings_allowed() {
        let mut ctx = make_context(TEMPLATE);

        let result = ValidatePhase::new().run(&mut ctx);

        assert!(result.is_ok());
        assert!(ctx.has_warnings());
        assert!(!ctx.has_errors());
    }

    #[test]
    fn test_lint_names() {
        assert_eq!(
            ValidatePhase::new().lint_names(),
            vec!["unused-parameter", "unused-mapping", "unused-condition"]
        );
        assert!(ValidatePhase::empty().lint_names().is_empty());
    }
}
