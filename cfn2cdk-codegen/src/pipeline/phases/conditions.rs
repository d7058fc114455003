//! Conditions phase - resolves every declared condition.

use eyre::Result;

use crate::{
    pipeline::{CompilationContext, Diagnostic, Phase},
    resolve::{Evaluator, Truth},
};

/// Phase that evaluates each declared condition once.
///
/// Every condition is evaluated, used or not, so a cyclic definition fails
/// the run even when nothing depends on it. Conditions that depend on
/// deploy-time values are left for CloudFormation to decide.
pub struct ConditionsPhase;

impl Phase for ConditionsPhase {
    fn name(&self) -> &'static str {
        "conditions"
    }

    fn description(&self) -> &'static str {
        "Resolve every condition, deferring those that need deploy-time values"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        let mut evaluator = Evaluator::new(&ctx.template, &mut ctx.resolution);
        let mut resolved = Vec::with_capacity(ctx.template.conditions.len());
        for name in ctx.template.conditions.keys() {
            let message = match evaluator.evaluate_condition(name)? {
                Truth::Known(value) => format!("condition '{name}' is {value}"),
                Truth::Deferred(_) => format!("condition '{name}' is decided at deploy time"),
            };
            resolved.push(Diagnostic::info(self.name(), message).at(format!("Conditions.{name}")));
        }

        ctx.diagnostics.extend(resolved);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SynthError, pipeline::StackSettings, resolve::ResolutionContext};

    fn make_context(yaml: &str) -> CompilationContext {
        let template = cfn2cdk_template::parse_template(yaml, "test.yaml").unwrap();
        CompilationContext::new(template, StackSettings::new("TestStack"))
    }

    #[test]
    fn test_resolves_all_conditions() {
        let mut ctx = make_context(
            r#"
Parameters:
  Env:
    Type: String
    Default: dev
Conditions:
  IsProd: !Equals [!Ref Env, prod]
  IsDev: !Not [!Condition IsProd]
Resources:
  Topic:
    Type: AWS::SNS::Topic
"#,
        )
        .with_resolution(ResolutionContext::new().with_parameter("Env", "prod"));

        ConditionsPhase.run(&mut ctx).unwrap();

        assert_eq!(ctx.resolution.condition_value("IsProd"), Some(true));
        assert_eq!(ctx.resolution.condition_value("IsDev"), Some(false));
        assert_eq!(ctx.diagnostics.len(), 2);
        assert_eq!(ctx.diagnostics[0].message, "condition 'IsProd' is true");
    }

    #[test]
    fn test_deploy_time_condition_is_reported() {
        let mut ctx = make_context(
            r#"
Conditions:
  IsUsEast1: !Equals [!Ref AWS::Region, us-east-1]
Resources:
  Topic:
    Type: AWS::SNS::Topic
    Condition: IsUsEast1
"#,
        );

        ConditionsPhase.run(&mut ctx).unwrap();

        assert_eq!(ctx.resolution.condition_value("IsUsEast1"), None);
        assert_eq!(
            ctx.diagnostics[0].message,
            "condition 'IsUsEast1' is decided at deploy time"
        );
    }

    #[test]
    fn test_unused_cycle_is_fatal() {
        let mut ctx = make_context(
            r#"
Conditions:
  A: !Not [!Condition B]
  B: !Not [!Condition A]
Resources:
  Topic:
    Type: AWS::SNS::Topic
"#,
        );

        let err = ConditionsPhase.run(&mut ctx).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SynthError>(),
            Some(SynthError::CyclicCondition { .. })
        ));
    }
}
