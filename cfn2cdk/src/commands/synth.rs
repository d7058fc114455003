use std::path::PathBuf;

use cfn2cdk_core::{StackKind, TargetLanguage};
use cfn2cdk_template::Template;
use clap::Args;
use eyre::Result;

use super::{ExitOnSynthError, ResolutionArgs, UnwrapOrExit};
use crate::{
    config::{Config, Overrides, Settings},
    ops::{self, SynthOptions},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct SynthCommand {
    /// CloudFormation template (JSON or YAML)
    pub template: PathBuf,

    /// Target language: typescript, python, go, java or csharp
    #[arg(short, long)]
    pub language: Option<TargetLanguage>,

    /// Output directory, or - for stdout (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Name of the generated class (defaults to the template file name)
    #[arg(long)]
    pub stack_name: Option<String>,

    /// Generate a Stack subclass or a reusable Construct
    #[arg(long)]
    pub kind: Option<StackKind>,

    #[command(flatten)]
    pub resolution: ResolutionArgs,

    /// Preview generated code without writing to disk
    #[arg(long)]
    pub dry_run: bool,

    /// Write a JSON snapshot of the pipeline state after each phase to DIR
    #[arg(long, value_name = "DIR")]
    pub visualize: Option<PathBuf>,
}

impl SynthCommand {
    /// Run the synth command
    pub fn run(&self) -> Result<()> {
        let config = Config::load(self.resolution.config.as_deref())?;
        let settings = Settings::resolve(&self.template, config, self.overrides());
        let template = Template::from_file(&self.template).unwrap_or_exit();

        let opts = SynthOptions {
            dry_run: self.dry_run,
            visualize: self.visualize.as_deref(),
        };
        let report = ops::synth(template, settings, opts).exit_on_synth_error()?;

        report.render(&mut TerminalOutput::new());
        Ok(())
    }

    pub(super) fn overrides(&self) -> Overrides {
        Overrides {
            language: self.language,
            stack_name: self.stack_name.clone(),
            kind: self.kind,
            output: self.output.clone(),
            ..self.resolution.overrides()
        }
    }
}
