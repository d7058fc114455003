//! TypeScript code generator for cfn2cdk.
//!
//! Renders a synthesized stack as an `aws-cdk-lib` class.
//!
//! ```ignore
//! use cfn2cdk_codegen::pipeline::{CompilationContext, Pipeline, StackSettings};
//! use cfn2cdk_codegen_typescript::{Generator, LanguageCodegen};
//! use cfn2cdk_template::Template;
//! use std::path::Path;
//!
//! let template = Template::from_file("template.yaml")?;
//! let ctx = Pipeline::new().run(CompilationContext::new(template, StackSettings::new("MyStack")))?;
//! let generator = Generator::from_context(ctx)?;
//!
//! // Preview files without writing
//! let files = generator.preview();
//!
//! // Generate files to disk
//! let result = generator.generate(Path::new("lib"))?;
//! ```
//!
//! # Generated Output
//!
//! - `<StackName>.ts` - the stack (or construct) class

mod emitter;
mod generator;
mod naming;

pub use cfn2cdk_codegen::language::{GenerateResult, LanguageCodegen, PreviewFile};
pub use emitter::TypeScriptEmitter;
pub use generator::Generator;
pub use naming::TS_NAMING;
