//! Compilation context passed through pipeline phases.

use cfn2cdk_core::StackKind;
use cfn2cdk_ir::StackIr;
use cfn2cdk_template::Template;
use eyre::{OptionExt, Result};

use super::diagnostic::{Diagnostic, Severity};
use crate::resolve::ResolutionContext;

/// Name and shape of the class being generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSettings {
    /// Class name (PascalCase).
    pub name: String,
    pub kind: StackKind,
}

impl StackSettings {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: StackKind::default(),
        }
    }

    pub fn with_kind(mut self, kind: StackKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Context passed through all pipeline phases.
///
/// Carries the template, the per-run [`ResolutionContext`] and every
/// intermediate result, accumulating diagnostics along the way.
#[derive(Debug)]
pub struct CompilationContext {
    /// The template being synthesized.
    pub template: Template,
    /// Parameter overrides, pseudo parameters and evaluation caches.
    pub resolution: ResolutionContext,
    pub settings: StackSettings,
    /// Resource logical IDs in instantiation order (populated by OrderPhase).
    pub order: Option<Vec<String>>,
    /// The lowered stack IR (populated by LowerPhase).
    pub ir: Option<StackIr>,
    /// Diagnostics collected during synthesis.
    pub diagnostics: Vec<Diagnostic>,
}

impl CompilationContext {
    /// Create a context with a fresh [`ResolutionContext`].
    pub fn new(template: Template, settings: StackSettings) -> Self {
        Self {
            template,
            resolution: ResolutionContext::new(),
            settings,
            order: None,
            ir: None,
            diagnostics: Vec::new(),
        }
    }

    /// Replace the resolution context (parameter overrides, pseudo parameters).
    pub fn with_resolution(mut self, resolution: ResolutionContext) -> Self {
        self.resolution = resolution;
        self
    }

    /// Check if any error diagnostics have been recorded.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_error())
    }

    /// Check if any warning diagnostics have been recorded.
    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_warning())
    }

    /// Count the number of error diagnostics.
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// Count the number of warning diagnostics.
    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn add_error(&mut self, phase: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::error(phase, message));
    }

    pub fn add_warning(&mut self, phase: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::warning(phase, message));
    }

    pub fn add_info(&mut self, phase: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::info(phase, message));
    }

    /// Add a diagnostic with a location.
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d.severity, Severity::Error))
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d.severity, Severity::Warning))
    }

    /// Take the IR out of the context.
    ///
    /// # Errors
    ///
    /// Fails if LowerPhase has not run.
    pub fn take_ir(&mut self) -> Result<StackIr> {
        self.ir.take().ok_or_eyre("stack IR not set - did LowerPhase run?")
    }
}
