//! Built-in pipeline phases.
//!
//! - [`ValidatePhase`] - runs lints over the template
//! - [`ConditionsPhase`] - resolves every declared condition
//! - [`OrderPhase`] - prunes resources and fixes instantiation order
//! - [`LowerPhase`] - evaluates resources and outputs into the stack IR

mod conditions;
mod lower;
mod order;
mod validate;

pub use conditions::ConditionsPhase;
pub use lower::LowerPhase;
pub use order::OrderPhase;
pub use validate::{
    Lint, UnusedConditionLint, UnusedMappingLint, UnusedParameterLint, ValidatePhase,
};
