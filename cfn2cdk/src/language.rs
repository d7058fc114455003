//! Unified language dispatch.
//!
//! Centralizes generator creation so commands never branch on the target
//! language themselves.

use cfn2cdk_codegen::{language::LanguageCodegen, pipeline::CompilationContext};
use cfn2cdk_codegen_csharp::Generator as CSharpGenerator;
use cfn2cdk_codegen_go::Generator as GoGenerator;
use cfn2cdk_codegen_java::Generator as JavaGenerator;
use cfn2cdk_codegen_python::Generator as PythonGenerator;
use cfn2cdk_codegen_typescript::Generator as TypeScriptGenerator;
use cfn2cdk_core::TargetLanguage;
use eyre::Result;

/// Create the generator for `language` from a finished pipeline run.
pub fn generator(
    language: TargetLanguage,
    ctx: CompilationContext,
) -> Result<Box<dyn LanguageCodegen>> {
    Ok(match language {
        TargetLanguage::TypeScript => Box::new(TypeScriptGenerator::from_context(ctx)?),
        TargetLanguage::Python => Box::new(PythonGenerator::from_context(ctx)?),
        TargetLanguage::Go => Box::new(GoGenerator::from_context(ctx)?),
        TargetLanguage::Java => Box::new(JavaGenerator::from_context(ctx)?),
        TargetLanguage::CSharp => Box::new(CSharpGenerator::from_context(ctx)?),
    })
}

#[cfg(test)]
mod tests {
    use cfn2cdk_codegen::pipeline::{Pipeline, StackSettings};

    use super::*;

    fn context() -> CompilationContext {
        let template = cfn2cdk_template::parse_template(
            "Resources:\n  Topic:\n    Type: AWS::SNS::Topic\n",
            "topic.yaml",
        )
        .unwrap();
        Pipeline::new()
            .run(CompilationContext::new(
                template,
                StackSettings::new("TopicStack"),
            ))
            .unwrap()
    }

    #[test]
    fn test_every_language_has_a_generator() {
        let expected = [
            (TargetLanguage::TypeScript, "TopicStack.ts"),
            (TargetLanguage::Python, "topic_stack.py"),
            (TargetLanguage::Go, "topic_stack.go"),
            (TargetLanguage::Java, "src/main/java/com/myorg/TopicStack.java"),
            (TargetLanguage::CSharp, "TopicStack.cs"),
        ];
        for (language, path) in expected {
            let generator = generator(language, context()).unwrap();
            assert_eq!(generator.language(), language);
            let files = generator.preview();
            assert_eq!(files.len(), 1);
            assert_eq!(files[0].path, path);
        }
    }
}
