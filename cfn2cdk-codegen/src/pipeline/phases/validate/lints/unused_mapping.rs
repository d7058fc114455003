//! Lint for mappings nothing looks up.

use std::collections::HashSet;

use cfn2cdk_template::{Reference, Template};

use super::{super::Lint, for_each_reference};
use crate::pipeline::Diagnostic;

/// Warns about mappings that no `Fn::FindInMap` names.
pub struct UnusedMappingLint;

impl Lint for UnusedMappingLint {
    fn name(&self) -> &'static str {
        "unused-mapping"
    }

    fn description(&self) -> &'static str {
        "Warn about mappings that no Fn::FindInMap names"
    }

    fn check(&self, template: &Template, diagnostics: &mut Vec<Diagnostic>) {
        let mut used = HashSet::new();
        for_each_reference(template, |reference| {
            if let Reference::Mapping(name) = reference {
                used.insert(name);
            }
        });

        for name in template.mappings.keys() {
            if !used.contains(name.as_str()) {
                diagnostics.push(
                    Diagnostic::warning("validate", format!("mapping '{name}' is never used"))
                        .at(format!("Mappings.{name}")),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unused_mapping() {
        let template = cfn2cdk_template::parse_template(
            r#"
Mappings:
  RegionToAmi:
    us-east-1:
      AMI: ami-1
  Stale:
    us-east-1:
      AMI: ami-2
Resources:
  Instance:
    Type: AWS::EC2::Instance
    Properties:
      ImageId: !FindInMap [RegionToAmi, !Ref AWS::Region, AMI]
"#,
            "test.yaml",
        )
        .unwrap();

        let mut diagnostics = Vec::new();
        UnusedMappingLint.check(&template, &mut diagnostics);

        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("'Stale'"));
    }
}
