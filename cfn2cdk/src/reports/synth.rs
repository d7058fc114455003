//! Synth command report data structures.

use std::path::PathBuf;

use cfn2cdk_core::{StackKind, TargetLanguage};

use super::output::{Output, Report};

/// Report data from code generation.
#[derive(Debug)]
pub struct SynthReport {
    /// Name of the generated class.
    pub stack_name: String,
    pub language: TargetLanguage,
    pub kind: StackKind,
    /// Number of constructs emitted.
    pub construct_count: usize,
    /// Warning messages from the pipeline.
    pub warnings: Vec<String>,
    /// Generation result (files written, preview, or source on stdout).
    pub result: GenerationResult,
}

/// Result of code generation.
#[derive(Debug)]
pub enum GenerationResult {
    /// Files were written to disk.
    Written(WrittenResult),
    /// Dry-run preview.
    Preview(PreviewResult),
    /// Source printed as is, for piping.
    Stdout(PreviewResult),
}

/// Result when files were written to disk.
#[derive(Debug)]
pub struct WrittenResult {
    pub output_dir: PathBuf,
    /// Files whose content changed.
    pub written: Vec<String>,
    /// Files that already had the generated content.
    pub unchanged: Vec<String>,
    /// Path to pipeline snapshots, if visualization was enabled.
    pub debug_dir: Option<PathBuf>,
}

/// Result of a preview.
#[derive(Debug)]
pub struct PreviewResult {
    pub files: Vec<PreviewFile>,
}

/// A file in preview mode.
#[derive(Debug)]
pub struct PreviewFile {
    pub path: String,
    pub content: String,
}

impl Report for SynthReport {
    fn render(&self, out: &mut dyn Output) {
        for warning in &self.warnings {
            out.warning(warning);
        }

        match &self.result {
            GenerationResult::Written(written) => self.render_written(out, written),
            GenerationResult::Preview(preview) => self.render_preview(out, preview),
            GenerationResult::Stdout(preview) => {
                for file in &preview.files {
                    out.preformatted(&file.content);
                }
            }
        }
    }
}

impl SynthReport {
    fn render_written(&self, out: &mut dyn Output, written: &WrittenResult) {
        if let Some(debug_dir) = &written.debug_dir {
            out.key_value(
                "Pipeline snapshots written to",
                &debug_dir.display().to_string(),
            );
            out.newline();
        }

        out.preformatted(&format!(
            "{} ({} {}, {} construct{})",
            self.stack_name,
            self.language,
            self.kind,
            self.construct_count,
            if self.construct_count == 1 { "" } else { "s" }
        ));
        out.key_value("Generated", &written.output_dir.display().to_string());
        for file in &written.written {
            out.added_item(file);
        }
        for file in &written.unchanged {
            out.unchanged_item(file);
        }
    }

    fn render_preview(&self, out: &mut dyn Output, preview: &PreviewResult) {
        for file in &preview.files {
            out.divider(&file.path);
            out.preformatted(&file.content);
        }

        out.divider("Summary");
        out.preformatted(&format!("{} files would be generated", preview.files.len()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::RecordingOutput;

    fn report(result: GenerationResult) -> SynthReport {
        SynthReport {
            stack_name: "Ec2Stack".to_string(),
            language: TargetLanguage::Go,
            kind: StackKind::Stack,
            construct_count: 2,
            warnings: vec!["parameter 'Unused' is never referenced".to_string()],
            result,
        }
    }

    #[test]
    fn test_render_written() {
        let mut out = RecordingOutput::default();
        report(GenerationResult::Written(WrittenResult {
            output_dir: PathBuf::from("cdk-out"),
            written: vec!["ec2_stack.go".to_string()],
            unchanged: Vec::new(),
            debug_dir: None,
        }))
        .render(&mut out);

        assert_eq!(
            out.stdout,
            vec![
                "Ec2Stack (go stack, 2 constructs)",
                "Generated: cdk-out",
                "  + ec2_stack.go",
            ]
        );
        assert_eq!(
            out.stderr,
            vec!["warning: parameter 'Unused' is never referenced"]
        );
    }

    #[test]
    fn test_render_stdout_is_bare_source() {
        let mut out = RecordingOutput::default();
        report(GenerationResult::Stdout(PreviewResult {
            files: vec![PreviewFile {
                path: "ec2_stack.go".to_string(),
                content: "package main".to_string(),
            }],
        }))
        .render(&mut out);

        assert_eq!(out.stdout, vec!["package main"]);
    }
}
