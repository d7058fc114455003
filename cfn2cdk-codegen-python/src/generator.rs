//! Python stack generator.

use std::path::Path;

use cfn2cdk_codegen::{
    emit::emit_stack,
    language::{GenerateResult, LanguageCodegen, PreviewFile, write_files},
    pipeline::CompilationContext,
};
use cfn2cdk_core::TargetLanguage;
use cfn2cdk_ir::StackIr;
use eyre::Result;

use crate::{PY_NAMING, PythonEmitter};

/// Python code generator that renders one `aws_cdk` class per stack.
pub struct Generator {
    ir: StackIr,
}

impl LanguageCodegen for Generator {
    fn language(&self) -> TargetLanguage {
        TargetLanguage::Python
    }

    fn file_extension(&self) -> &'static str {
        "py"
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

    /// Path of the stack file relative to the output directory.
    pub fn file_path(&self) -> String {
        let class = PY_NAMING.type_name(&self.ir.meta.name);
        format!("{}.{}", PY_NAMING.file_name(&class), self.file_extension())
    }

    /// Render the stack source.
    pub fn render(&self) -> String {
        emit_stack(&PythonEmitter, &self.ir)
    }

    fn preview_files(&self) -> Vec<PreviewFile> {
        vec![PreviewFile {
            path: self.file_path(),
            content: self.render(),
        }]
    }
}
