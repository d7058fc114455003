//! Lint for conditions nothing uses.

use std::collections::HashSet;

use cfn2cdk_template::{Reference, Template};

use super::{super::Lint, for_each_reference};
use crate::pipeline::Diagnostic;

/// Warns about conditions no resource, output or other condition uses.
pub struct UnusedConditionLint;

impl Lint for UnusedConditionLint {
    fn name(&self) -> &'static str {
        "unused-condition"
    }

    fn description(&self) -> &'static str {
        "Warn about conditions that gate nothing"
    }

    fn check(&self, template: &Template, diagnostics: &mut Vec<Diagnostic>) {
        let mut used: HashSet<&str> = template
            .resources
            .values()
            .filter_map(|r| r.condition.as_deref())
            .chain(template.outputs.values().filter_map(|o| o.condition.as_deref()))
            .collect();
        for_each_reference(template, |reference| {
            if let Reference::Condition(name) = reference {
                used.insert(name);
            }
        });

        for name in template.conditions.keys() {
            if !used.contains(name.as_str()) {
                diagnostics.push(
                    Diagnostic::warning("validate", format!("condition '{name}' is never used"))
                        .at(format!("Conditions.{name}")),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unused_condition() {
        let template = cfn2cdk_template::parse_template(
            r#"
Parameters:
  Env:
    Type: String
    Default: dev
Conditions:
  IsProd: !Equals [!Ref Env, prod]
  IsNotProd: !Not [!Condition IsProd]
  ForOutput: !Equals [!Ref Env, dev]
  ForIf: !Equals [!Ref Env, qa]
  Orphan: !Equals [!Ref Env, test]
Resources:
  Topic:
    Type: AWS::SNS::Topic
    Condition: IsNotProd
    Properties:
      TopicName: !If [ForIf, a, b]
Outputs:
  TopicArn:
    Condition: ForOutput
    Value: !Ref Topic
"#,
            "test.yaml",
        )
        .unwrap();

        let mut diagnostics = Vec::new();
        UnusedConditionLint.check(&template, &mut diagnostics);

        let flagged: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(flagged, vec!["condition 'Orphan' is never used"]);
    }
}
