//! Python code generator for cfn2cdk.
//!
//! Renders a synthesized stack as an `aws_cdk` class.
//!
//! # Generated Output
//!
//! - `<stack_name>.py` - the stack (or construct) class

mod emitter;
mod generator;
mod naming;

pub use cfn2cdk_codegen::language::{GenerateResult, LanguageCodegen, PreviewFile};
pub use emitter::PythonEmitter;
pub use generator::Generator;
pub use naming::PY_NAMING;
