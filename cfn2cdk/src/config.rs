//! `cfn2cdk.toml` project configuration.
//!
//! Every setting is optional. Command-line flags win over the file, and the
//! file wins over the built-in defaults.

use std::path::{Path, PathBuf};

use cfn2cdk_codegen::resolve::ResolutionContext;
use cfn2cdk_core::{PseudoParameter, StackKind, TargetLanguage, to_pascal_case};
use eyre::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;

/// File looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE: &str = "cfn2cdk.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub synth: SynthConfig,
    #[serde(default)]
    pub environment: EnvironmentConfig,
    /// Template parameter values, keyed by logical ID.
    #[serde(default)]
    pub parameters: IndexMap<String, toml::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SynthConfig {
    pub language: Option<TargetLanguage>,
    pub stack_name: Option<String>,
    pub kind: Option<StackKind>,
    pub output: Option<PathBuf>,
}

/// Pseudo parameter values known ahead of deployment.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct EnvironmentConfig {
    pub region: Option<String>,
    pub account: Option<String>,
    pub partition: Option<String>,
    pub url_suffix: Option<String>,
}

impl Config {
    /// Load `path`, or `cfn2cdk.toml` from the working directory if present.
    ///
    /// An explicitly named file must exist; the implicit one is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::open(path),
            None => {
                let path = Path::new(CONFIG_FILE);
                if path.exists() {
                    Self::open(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn open(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read '{}'", path.display()))?;
        let config = Self::parse(&content)
            .wrap_err_with(|| format!("invalid configuration in '{}'", path.display()))?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parameter values as the strings CloudFormation would receive.
    pub fn parameter_values(&self) -> impl Iterator<Item = (&str, String)> {
        self.parameters
            .iter()
            .map(|(name, value)| (name.as_str(), parameter_text(value)))
    }
}

fn parameter_text(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Array(items) => items
            .iter()
            .map(parameter_text)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

/// Settings given on the command line; `None` defers to the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub language: Option<TargetLanguage>,
    pub stack_name: Option<String>,
    pub kind: Option<StackKind>,
    pub output: Option<PathBuf>,
    pub region: Option<String>,
    pub account: Option<String>,
    pub parameters: Vec<(String, String)>,
}

/// Fully resolved synthesis settings.
#[derive(Debug)]
pub struct Settings {
    pub language: TargetLanguage,
    pub stack_name: String,
    pub kind: StackKind,
    /// `None` prints the generated source to stdout.
    pub output: Option<PathBuf>,
    pub resolution: ResolutionContext,
}

impl Settings {
    /// Merge flags, config and defaults for the template at `template_path`.
    pub fn resolve(template_path: &Path, config: Config, overrides: Overrides) -> Self {
        let Config {
            synth,
            environment,
            ..
        } = &config;

        let mut resolution = ResolutionContext::new();
        for (name, value) in config.parameter_values() {
            resolution = resolution.with_parameter(name, value);
        }
        for (name, value) in &overrides.parameters {
            resolution = resolution.with_parameter(name.as_str(), value.as_str());
        }

        let pseudo = [
            (
                PseudoParameter::Region,
                overrides.region.clone().or_else(|| environment.region.clone()),
            ),
            (
                PseudoParameter::AccountId,
                overrides
                    .account
                    .clone()
                    .or_else(|| environment.account.clone()),
            ),
            (PseudoParameter::Partition, environment.partition.clone()),
            (PseudoParameter::UrlSuffix, environment.url_suffix.clone()),
        ];
        for (parameter, value) in pseudo {
            if let Some(value) = value {
                resolution = resolution.with_pseudo(parameter, value);
            }
        }

        let output = overrides
            .output
            .or_else(|| synth.output.clone())
            .filter(|path| path.as_os_str() != "-");

        Self {
            language: overrides.language.or(synth.language).unwrap_or_default(),
            stack_name: overrides
                .stack_name
                .or_else(|| synth.stack_name.clone())
                .unwrap_or_else(|| default_stack_name(template_path)),
            kind: overrides.kind.or(synth.kind).unwrap_or_default(),
            output,
            resolution,
        }
    }
}

/// `network-template.yaml` becomes `NetworkTemplateStack`.
pub fn default_stack_name(template_path: &Path) -> String {
    let stem = template_path
        .file_stem()
        .map(|stem| to_pascal_case(&stem.to_string_lossy()))
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "Cdk".to_string());
    if stem.ends_with("Stack") {
        stem
    } else {
        format!("{stem}Stack")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[synth]
language = "python"
stack-name = "NetworkStack"
kind = "construct"
output = "cdk-out"

[environment]
region = "eu-west-1"
account = "123456789012"
partition = "aws-cn"

[parameters]
Environment = "prod"
Port = 8080
Zones = ["a", "b"]
"#;

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(FULL).unwrap();
        assert_eq!(config.synth.language, Some(TargetLanguage::Python));
        assert_eq!(config.synth.kind, Some(StackKind::Construct));
        assert_eq!(config.environment.partition.as_deref(), Some("aws-cn"));

        let parameters: Vec<_> = config.parameter_values().collect();
        assert_eq!(
            parameters,
            vec![
                ("Environment", "prod".to_string()),
                ("Port", "8080".to_string()),
                ("Zones", "a,b".to_string()),
            ]
        );
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(Config::parse("[synth]\nlanguage = \"python\"\nfoo = 1\n").is_err());
        assert!(Config::parse("[synth]\nlanguage = \"cobol\"\n").is_err());
    }

    #[test]
    fn test_defaults_without_config() {
        let settings = Settings::resolve(
            Path::new("templates/network-template.yaml"),
            Config::default(),
            Overrides::default(),
        );
        assert_eq!(settings.language, TargetLanguage::TypeScript);
        assert_eq!(settings.kind, StackKind::Stack);
        assert_eq!(settings.stack_name, "NetworkTemplateStack");
        assert!(settings.output.is_none());
        assert_eq!(settings.resolution.pseudo_value(PseudoParameter::Region), None);
    }

    #[test]
    fn test_flags_override_config() {
        let settings = Settings::resolve(
            Path::new("template.json"),
            Config::parse(FULL).unwrap(),
            Overrides {
                language: Some(TargetLanguage::Go),
                region: Some("us-east-1".to_string()),
                parameters: vec![("Environment".to_string(), "dev".to_string())],
                ..Overrides::default()
            },
        );
        assert_eq!(settings.language, TargetLanguage::Go);
        assert_eq!(settings.stack_name, "NetworkStack");
        assert_eq!(settings.kind, StackKind::Construct);
        assert_eq!(settings.output, Some(PathBuf::from("cdk-out")));
        assert_eq!(
            settings.resolution.pseudo_value(PseudoParameter::Region),
            Some("us-east-1")
        );
        assert_eq!(
            settings.resolution.pseudo_value(PseudoParameter::AccountId),
            Some("123456789012")
        );
        assert_eq!(
            settings.resolution.parameter_override("Environment"),
            Some("dev")
        );
        assert_eq!(settings.resolution.parameter_override("Port"), Some("8080"));
    }

    #[test]
    fn test_dash_output_means_stdout() {
        let settings = Settings::resolve(
            Path::new("template.yaml"),
            Config::default(),
            Overrides {
                output: Some(PathBuf::from("-")),
                ..Overrides::default()
            },
        );
        assert!(settings.output.is_none());
    }

    #[test]
    fn test_default_stack_name() {
        assert_eq!(default_stack_name(Path::new("ec2.yaml")), "Ec2Stack");
        assert_eq!(default_stack_name(Path::new("my_stack.json")), "MyStack");
        assert_eq!(default_stack_name(Path::new("")), "CdkStack");
    }
}
