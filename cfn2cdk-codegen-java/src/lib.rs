//! Java code generator for cfn2cdk.
//!
//! Renders a synthesized stack as a `software.amazon.awscdk` class in the
//! `com.myorg` package, using the generated builders for every construct.
//!
//! # Generated Output
//!
//! - `src/main/java/com/myorg/<StackName>.java` - the stack (or construct) class

mod emitter;
mod generator;
mod naming;

pub use cfn2cdk_codegen::language::{GenerateResult, LanguageCodegen, PreviewFile};
pub use emitter::JavaEmitter;
pub use generator::{Generator, PACKAGE};
pub use naming::JAVA_NAMING;
