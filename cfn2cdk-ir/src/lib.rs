//! Intermediate representation for the cfn2cdk pipeline.
//!
//! ```text
//! template (JSON/YAML) → cfn2cdk-template → evaluation → cfn2cdk-ir → emitters
//! ```
//!
//! The IR holds only what survives synthesis: resources whose condition is
//! not false, in dependency order, with every intrinsic either folded to a
//! literal or kept as a [`Deferred`] expression the emitted code performs.
//! Conditions that hinge on deploy-time values become [`DeployCondition`]s.

mod condition;
mod stack;
mod value;

pub use condition::{ConditionExpr, DeployCondition};
pub use stack::{
    ConstructIr, MappingTable, OutputIr, ResolvedCondition, StackIr, StackMeta,
};
pub use value::{Deferred, ObjectKind, Value};
