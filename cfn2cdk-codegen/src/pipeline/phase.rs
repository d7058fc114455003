//! Pipeline phase trait.

use eyre::Result;

use super::CompilationContext;

/// A phase in the synthesis pipeline.
///
/// Built-in phases:
/// - `ValidatePhase` - runs lints over the template
/// - `ConditionsPhase` - resolves every declared condition
/// - `OrderPhase` - prunes resources and fixes instantiation order
/// - `LowerPhase` - evaluates resources and outputs into the stack IR
///
/// Custom phases run after the built-in ones.
pub trait Phase: Send + Sync {
    /// The name of this phase (used in diagnostics and plugin hooks).
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Run this phase on the compilation context.
    ///
    /// # Errors
    ///
    /// Returns an error if the phase fails fatally. Non-fatal issues are
    /// recorded as diagnostics instead.
    fn run(&self, ctx: &mut CompilationContext) -> Result<()>;
}
