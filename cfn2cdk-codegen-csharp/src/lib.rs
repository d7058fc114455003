//! C# code generator for cfn2cdk.
//!
//! Renders a synthesized stack as an `Amazon.CDK` class in the `MyOrg`
//! namespace.
//!
//! # Generated Output
//!
//! - `<StackName>.cs` - the stack (or construct) class

mod emitter;
mod generator;
mod naming;

pub use cfn2cdk_codegen::language::{GenerateResult, LanguageCodegen, PreviewFile};
pub use emitter::CSharpEmitter;
pub use generator::{Generator, NAMESPACE};
pub use naming::CSHARP_NAMING;
