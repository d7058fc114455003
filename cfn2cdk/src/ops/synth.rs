//! Synth operation - code generation from a template.

use std::path::{Path, PathBuf};

use cfn2cdk_codegen::pipeline::{Pipeline, Severity, SnapshotPlugin};
use cfn2cdk_template::Template;
use eyre::{Context, Result};

use super::{context, diagnostic_text};
use crate::{
    config::Settings,
    language,
    reports::{GenerationResult, PreviewFile, PreviewResult, SynthReport, WrittenResult},
};

/// Options for the synth operation.
#[derive(Debug, Default)]
pub struct SynthOptions<'a> {
    /// Whether to preview without writing files.
    pub dry_run: bool,
    /// Directory for per-phase pipeline snapshots.
    pub visualize: Option<&'a Path>,
}

/// Execute the synth operation.
///
/// Runs the pipeline on the template and renders the stack in the target
/// language. Nothing is written unless every phase succeeded.
pub fn synth(template: Template, settings: Settings, opts: SynthOptions) -> Result<SynthReport> {
    let language = settings.language;
    let output_dir = settings.output.clone();
    let stack_name = settings.stack_name.clone();
    let kind = settings.kind;

    let mut pipeline = Pipeline::new();
    if let Some(dir) = opts.visualize {
        pipeline = pipeline.plugin(SnapshotPlugin::with_output_dir(dir));
    }
    let ctx = pipeline
        .run(context(template, settings))
        .wrap_err("Synthesis failed")?;

    let warnings: Vec<String> = ctx
        .diagnostics
        .iter()
        .filter(|d| matches!(d.severity, Severity::Warning))
        .map(diagnostic_text)
        .collect();
    let construct_count = ctx.ir.as_ref().map_or(0, |ir| ir.constructs.len());

    let generator = language::generator(language, ctx)?;
    let preview = || -> Vec<PreviewFile> {
        generator
            .preview()
            .into_iter()
            .map(|f| PreviewFile {
                path: f.path,
                content: f.content,
            })
            .collect()
    };

    let result = match output_dir {
        _ if opts.dry_run => GenerationResult::Preview(PreviewResult { files: preview() }),
        None => GenerationResult::Stdout(PreviewResult { files: preview() }),
        Some(output_dir) => {
            let generated = generator
                .generate(&output_dir)
                .wrap_err("Failed to write generated code")?;
            GenerationResult::Written(WrittenResult {
                output_dir,
                written: generated.written,
                unchanged: generated.unchanged,
                debug_dir: opts.visualize.map(PathBuf::from),
            })
        }
    };

    Ok(SynthReport {
        stack_name,
        language,
        kind,
        construct_count,
        warnings,
        result,
    })
}

#[cfg(test)]
mod tests {
    use cfn2cdk_core::{StackKind, TargetLanguage};

    use super::*;
    use crate::config::{Config, Overrides};

    const TEMPLATE: &str = r#"
Parameters:
  Unused:
    Type: String
    Default: x
Resources:
  Bucket:
    Type: AWS::S3::Bucket
"#;

    fn settings(output: Option<PathBuf>, language: TargetLanguage) -> Settings {
        Settings::resolve(
            Path::new("bucket.yaml"),
            Config::default(),
            Overrides {
                language: Some(language),
                output,
                ..Overrides::default()
            },
        )
    }

    fn template() -> Template {
        cfn2cdk_template::parse_template(TEMPLATE, "bucket.yaml").unwrap()
    }

    #[test]
    fn test_synth_to_stdout() {
        let report = synth(
            template(),
            settings(None, TargetLanguage::TypeScript),
            SynthOptions::default(),
        )
        .unwrap();

        assert_eq!(report.stack_name, "BucketStack");
        assert_eq!(report.kind, StackKind::Stack);
        assert_eq!(report.construct_count, 1);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("Unused"));
        let GenerationResult::Stdout(preview) = report.result else {
            panic!("expected stdout output");
        };
        assert_eq!(preview.files[0].path, "BucketStack.ts");
        assert!(preview.files[0].content.contains("new s3.CfnBucket(this, 'Bucket');"));
    }

    #[test]
    fn test_synth_writes_files_and_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let debug = dir.path().join("debug");
        let report = synth(
            template(),
            settings(Some(dir.path().to_path_buf()), TargetLanguage::Python),
            SynthOptions {
                dry_run: false,
                visualize: Some(debug.as_path()),
            },
        )
        .unwrap();

        let GenerationResult::Written(written) = report.result else {
            panic!("expected written output");
        };
        assert_eq!(written.written, vec!["bucket_stack.py"]);
        assert!(dir.path().join("bucket_stack.py").exists());
        assert!(debug.join("lower.json").exists());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let report = synth(
            template(),
            settings(Some(dir.path().to_path_buf()), TargetLanguage::Java),
            SynthOptions {
                dry_run: true,
                visualize: None,
            },
        )
        .unwrap();

        assert!(matches!(report.result, GenerationResult::Preview(_)));
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_synth_error_is_downcastable() {
        let template = cfn2cdk_template::parse_template(
            r#"
Resources:
  A:
    Type: AWS::SNS::Topic
    DependsOn: B
  B:
    Type: AWS::SNS::Topic
    DependsOn: A
"#,
            "cycle.yaml",
        )
        .unwrap();
        let err = synth(
            template,
            settings(None, TargetLanguage::Go),
            SynthOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<cfn2cdk_codegen::SynthError>(),
            Some(cfn2cdk_codegen::SynthError::Cycle { .. })
        ));
    }
}
