//! Pipeline orchestrator.

use eyre::Result;

use super::{
    CompilationContext, Phase, Plugin,
    phases::{ConditionsPhase, LowerPhase, OrderPhase, ValidatePhase},
};

/// The synthesis pipeline orchestrator.
///
/// Runs the built-in phases (validate, conditions, order, lower) followed by
/// any custom phases, calling plugin hooks before and after each one.
///
/// # Example
///
/// ```ignore
/// let pipeline = Pipeline::new()
///     .plugin(SnapshotPlugin::with_output_dir("debug"))
///     .phase(MyCustomPhase);
///
/// let ctx = pipeline.run(ctx)?;
/// ```
pub struct Pipeline {
    phases: Vec<Box<dyn Phase>>,
    plugins: Vec<Box<dyn Plugin>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            phases: Vec::new(),
            plugins: Vec::new(),
        }
    }

    /// Add a phase to run after the built-in phases.
    pub fn phase(mut self, phase: impl Phase + 'static) -> Self {
        self.phases.push(Box::new(phase));
        self
    }

    /// Add a plugin to receive phase lifecycle hooks.
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Run every phase over `ctx`.
    ///
    /// # Errors
    ///
    /// Returns the first fatal phase error. Typed synthesis errors stay
    /// downcastable to [`SynthError`](crate::SynthError).
    pub fn run(&self, mut ctx: CompilationContext) -> Result<CompilationContext> {
        let builtin_phases: Vec<Box<dyn Phase>> = vec![
            Box::new(ValidatePhase::new()),
            Box::new(ConditionsPhase),
            Box::new(OrderPhase),
            Box::new(LowerPhase),
        ];

        for phase in builtin_phases.iter().chain(self.phases.iter()) {
            self.run_phase(phase.as_ref(), &mut ctx)?;
        }

        log::info!(
            "synthesized {} ({} warning(s))",
            ctx.settings.name,
            ctx.warning_count()
        );
        Ok(ctx)
    }

    fn run_phase(&self, phase: &dyn Phase, ctx: &mut CompilationContext) -> Result<()> {
        let phase_name = phase.name();
        log::debug!("running phase {phase_name}: {}", phase.description());

        for plugin in &self.plugins {
            plugin.on_before_phase(phase_name, ctx)?;
        }

        phase.run(ctx)?;

        for plugin in &self.plugins {
            plugin.on_after_phase(phase_name, ctx)?;
        }

        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
