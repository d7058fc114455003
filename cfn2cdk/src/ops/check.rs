//! Check operation - template validation without generating code.

use std::path::Path;

use cfn2cdk_codegen::pipeline::{Pipeline, Severity};
use cfn2cdk_template::Template;
use eyre::{Context, Result};

use super::{context, diagnostic_text};
use crate::{config::Settings, reports::CheckReport};

/// Execute the check operation.
///
/// Runs every pipeline phase and reports diagnostics along with the
/// resolved instantiation order.
pub fn check(template: Template, settings: Settings, template_path: &Path) -> Result<CheckReport> {
    let stack_name = settings.stack_name.clone();
    let ctx = Pipeline::new()
        .run(context(template, settings))
        .wrap_err("Validation failed")?;

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut infos = Vec::new();

    for diag in &ctx.diagnostics {
        let msg = diagnostic_text(diag);
        match diag.severity {
            Severity::Error => errors.push(msg),
            Severity::Warning => warnings.push(msg),
            Severity::Info => infos.push(msg),
        }
    }

    let (mapping_count, output_count) = ctx
        .ir
        .as_ref()
        .map_or((0, 0), |ir| (ir.mappings.len(), ir.outputs.len()));

    Ok(CheckReport {
        template_path: template_path.to_path_buf(),
        stack_name,
        order: ctx.order.clone().unwrap_or_default(),
        mapping_count,
        output_count,
        errors,
        warnings,
        infos,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Overrides};

    #[test]
    fn test_check_reports_order_and_conditions() {
        let path = Path::new("app.yaml");
        let template = cfn2cdk_template::parse_template(
            r#"
Parameters:
  Env:
    Type: String
    Default: dev
Conditions:
  IsProd: !Equals [!Ref Env, prod]
Resources:
  Service:
    Type: AWS::ECS::Service
    Properties:
      Cluster: !Ref Cluster
  Cluster:
    Type: AWS::ECS::Cluster
  Alarm:
    Type: AWS::CloudWatch::Alarm
    Condition: IsProd
"#,
            "app.yaml",
        )
        .unwrap();
        let settings = Settings::resolve(path, Config::default(), Overrides::default());

        let report = check(template, settings, path).unwrap();

        assert!(report.is_valid());
        assert_eq!(report.stack_name, "AppStack");
        assert_eq!(report.order, vec!["Cluster", "Service"]);
        assert!(report.infos.iter().any(|i| i.contains("condition 'IsProd' is false")));
        assert!(report.infos.iter().any(|i| i.starts_with("resource 'Alarm' skipped")));
    }
}
