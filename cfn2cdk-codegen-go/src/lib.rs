//! Go code generator for cfn2cdk.
//!
//! Renders a synthesized stack as an `awscdk/v2` constructor function in
//! `package main`.
//!
//! # Generated Output
//!
//! - `<stack_name>.go` - the stack (or construct) constructor

mod emitter;
mod generator;
mod naming;

pub use cfn2cdk_codegen::language::{GenerateResult, LanguageCodegen, PreviewFile};
pub use emitter::GoEmitter;
pub use generator::Generator;
pub use naming::GO_NAMING;
