//! Synthesis pipeline.
//!
//! A [`Pipeline`] runs the synthesis phases over one template:
//!
//! - explicit phase boundaries (validate → conditions → order → lower)
//! - plugin hooks before and after each phase
//! - diagnostics collected in one place
//! - state shared through a [`CompilationContext`]
//!
//! # Example
//!
//! ```ignore
//! use cfn2cdk_codegen::pipeline::{CompilationContext, Pipeline, StackSettings};
//!
//! let ctx = CompilationContext::new(template, StackSettings::new("NetworkStack"));
//! let mut ctx = Pipeline::new().run(ctx)?;
//!
//! for diag in ctx.warnings() {
//!     eprintln!("{diag}");
//! }
//!
//! let ir = ctx.take_ir()?;
//! ```

mod context;
mod diagnostic;
mod phase;
pub mod phases;
mod plugin;
mod runner;
mod snapshot;

pub use context::{CompilationContext, StackSettings};
pub use diagnostic::{Diagnostic, Severity};
pub use phase::Phase;
pub use plugin::Plugin;
pub use runner::Pipeline;
pub use snapshot::{PhaseSnapshot, SnapshotPlugin};
