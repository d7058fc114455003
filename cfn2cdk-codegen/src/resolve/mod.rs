//! Template evaluation: intrinsic functions and conditions.

mod conditions;
mod context;
mod evaluator;

pub use conditions::{ConditionState, Truth};
pub use context::ResolutionContext;
pub use evaluator::Evaluator;

pub(crate) use evaluator::mapping_value;
