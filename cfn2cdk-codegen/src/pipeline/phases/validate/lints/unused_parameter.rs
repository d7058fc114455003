//! Lint for parameters nothing refers to.

use std::collections::HashSet;

use cfn2cdk_template::{Reference, Template};

use super::{super::Lint, for_each_reference};
use crate::pipeline::Diagnostic;

/// Warns about parameters that are never referenced.
pub struct UnusedParameterLint;

impl Lint for UnusedParameterLint {
    fn name(&self) -> &'static str {
        "unused-parameter"
    }

    fn description(&self) -> &'static str {
        "Warn about parameters that no Ref or Fn::Sub uses"
    }

    fn check(&self, template: &Template, diagnostics: &mut Vec<Diagnostic>) {
        let mut used = HashSet::new();
        for_each_reference(template, |reference| {
            if let Reference::Ref(name) | Reference::SubVariable(name) = reference {
                used.insert(name);
            }
        });

        for name in template.parameters.keys() {
            if !used.contains(name.as_str()) {
                diagnostics.push(
                    Diagnostic::warning(
                        "validate",
                        format!("parameter '{name}' is never referenced"),
                    )
                    .at(format!("Parameters.{name}")),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unused_parameter() {
        let template = cfn2cdk_template::parse_template(
            r#"
Parameters:
  Used:
    Type: String
    Default: a
  InSub:
    Type: String
    Default: b
  Unused:
    Type: String
    Default: c
Resources:
  Topic:
    Type: AWS::SNS::Topic
    Properties:
      TopicName: !Ref Used
      DisplayName: !Sub "${InSub}-topic"
"#,
            "test.yaml",
        )
        .unwrap();

        let mut diagnostics = Vec::new();
        UnusedParameterLint.check(&template, &mut diagnostics);

        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("'Unused'"));
        assert!(diagnostics[0].severity.is_warning());
        assert_eq!(diagnostics[0].location.as_deref(), Some("Parameters.Unused"));
    }
}
