mod check;
mod completions;
mod synth;

use std::path::PathBuf;

use cfn2cdk_codegen::SynthError;
use check::CheckCommand;
use clap::{Args, Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::Result;
use synth::SynthCommand;

use crate::config::Overrides;

/// Extension trait for exiting on template errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for cfn2cdk_template::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

/// Extension trait rendering synthesis errors as miette diagnostics.
///
/// Any other error is passed on to the installed eyre handler.
pub(crate) trait ExitOnSynthError<T> {
    fn exit_on_synth_error(self) -> Result<T>;
}

impl<T> ExitOnSynthError<T> for Result<T> {
    fn exit_on_synth_error(self) -> Result<T> {
        self.map_err(|report| {
            if let Some(e) = report.downcast_ref::<SynthError>() {
                eprintln!("{:?}", miette::Report::new(e.clone()));
                std::process::exit(1);
            }
            report
        })
    }
}

#[derive(Parser)]
#[command(name = "cfn2cdk")]
#[command(version)]
#[command(about = "Synthesize AWS CDK source code from CloudFormation templates")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Synth(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate CDK source from a template
    Synth(SynthCommand),

    /// Validate a template and show its resolved order without generating code
    Check(CheckCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

/// Values the template is resolved against.
#[derive(Args)]
pub(crate) struct ResolutionArgs {
    /// Path to cfn2cdk.toml (defaults to ./cfn2cdk.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Template parameter value (repeatable)
    #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_parameter)]
    pub params: Vec<(String, String)>,

    /// Value of AWS::Region
    #[arg(long)]
    pub region: Option<String>,

    /// Value of AWS::AccountId
    #[arg(long)]
    pub account: Option<String>,
}

impl ResolutionArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            region: self.region.clone(),
            account: self.account.clone(),
            parameters: self.params.clone(),
            ..Overrides::default()
        }
    }
}

fn parse_parameter(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_parameter() {
        assert_eq!(
            parse_parameter("Env=prod").unwrap(),
            ("Env".to_string(), "prod".to_string())
        );
        assert_eq!(
            parse_parameter("Url=a=b").unwrap(),
            ("Url".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_parameter("Empty=").unwrap(),
            ("Empty".to_string(), String::new())
        );
        assert!(parse_parameter("=x").is_err());
        assert!(parse_parameter("novalue").is_err());
    }

    #[test]
    fn test_synth_arguments() {
        let cli = Cli::try_parse_from([
            "cfn2cdk",
            "synth",
            "template.yaml",
            "-l",
            "c#",
            "--kind",
            "construct",
            "-p",
            "Env=prod",
            "--param",
            "Size=3",
            "--region",
            "eu-west-1",
            "-o",
            "-",
        ])
        .unwrap();
        let Commands::Synth(cmd) = cli.command else {
            panic!("expected synth");
        };
        let overrides = cmd.overrides();
        assert_eq!(
            overrides.language,
            Some(cfn2cdk_core::TargetLanguage::CSharp)
        );
        assert_eq!(overrides.kind, Some(cfn2cdk_core::StackKind::Construct));
        assert_eq!(overrides.parameters.len(), 2);
        assert_eq!(overrides.region.as_deref(), Some("eu-west-1"));
        assert_eq!(overrides.output, Some(PathBuf::from("-")));
    }
}
