use std::path::PathBuf;

use cfn2cdk_template::Template;
use clap::Args;
use eyre::Result;

use super::{ExitOnSynthError, ResolutionArgs, UnwrapOrExit};
use crate::{
    config::{Config, Settings},
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    /// CloudFormation template (JSON or YAML)
    pub template: PathBuf,

    #[command(flatten)]
    pub resolution: ResolutionArgs,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let config = Config::load(self.resolution.config.as_deref())?;
        let settings = Settings::resolve(&self.template, config, self.resolution.overrides());
        let template = Template::from_file(&self.template).unwrap_or_exit();

        let report = ops::check(template, settings, &self.template).exit_on_synth_error()?;
        report.render(&mut TerminalOutput::new());

        if !report.is_valid() {
            std::process::exit(1);
        }
        Ok(())
    }
}
