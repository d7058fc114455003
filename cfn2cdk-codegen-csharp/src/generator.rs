//! C# stack generator.

use std::path::Path;

use cfn2cdk_codegen::{
    emit::emit_stack,
    language::{GenerateResult, LanguageCodegen, PreviewFile, write_files},
    pipeline::CompilationContext,
};
use cfn2cdk_core::TargetLanguage;
use cfn2cdk_ir::StackIr;
use eyre::Result;

use crate::{CSHARP_NAMING, CSharpEmitter};

/// Namespace every generated class is declared in.
pub const NAMESPACE: &str = "MyOrg";

/// C# code generator that renders one CDK class per stack.
pub struct Generator {
    ir: StackIr,
}

impl LanguageCodegen for Generator {
    fn language(&self) -> TargetLanguage {
        TargetLanguage::CSharp
    }

    fn file_extension(&self) -> &'static str {
        "cs"
    }

    fn preview(&self) -> Vec<PreviewFile> {
        self.preview_files()
    }

    fn generate(&self, output_dir: &Path) -> Result<GenerateResult> {
        write_files(output_dir, self.preview_files())
    }
}

impl Generator {
    pub fn new(ir: StackIr) -> Self {
        Self { ir }
    }

    /// Take the stack IR out of a finished pipeline run.
    pub fn from_context(mut ctx: CompilationContext) -> Result<Self> {
        Ok(Self::new(ctx.take_ir()?))
    }

    /// Path of the class file relative to the output directory.
    pub fn file_path(&self) -> String {
        let class = CSHARP_NAMING.type_name(&self.ir.meta.name);
        format!("{}.{}", CSHARP_NAMING.file_name(&class), self.file_extension())
    }

    /// Render the class source.
    pub fn render(&self) -> String {
        emit_stack(&CSharpEmitter, &self.ir)
    }

    fn preview_files(&self) -> Vec<PreviewFile> {
        vec![PreviewFile {
            path: self.file_path(),
            content: self.render(),
        }]
    }
}
