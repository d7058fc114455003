// miette's derive macro generates code that triggers this lint
#![allow(unused_assignments)]

//! CloudFormation template model for cfn2cdk.
//!
//! Parses JSON or YAML templates (long-form and short-form intrinsics) into a
//! typed [`Template`] and rejects undeclared references, malformed intrinsic
//! calls and duplicate logical IDs before any synthesis happens.

mod error;
mod expr;
mod parse;
mod sub;
mod template;
mod validate;

pub use error::{Error, Result, SourceContext};
pub use expr::{Expr, Intrinsic, Reference, SubPart};
pub use sub::parse_sub_template;
pub use template::{
    Condition, EntityKind, Mapping, MappingValue, Output, Parameter, ParameterType, Resource,
    Template,
};

/// Parse and validate a template.
///
/// Parsing is pure: the same input always yields a structurally identical
/// [`Template`].
pub fn parse_template(content: &str, filename: &str) -> Result<Template> {
    let source = SourceContext::new(content, filename);
    let document = parse::load_document(&source)?;
    let template = parse::TemplateParser::new(&source).parse(&document)?;
    validate::validate(&template, &source)?;

    log::debug!(
        "parsed {}: {} parameters, {} mappings, {} conditions, {} resources, {} outputs",
        filename,
        template.parameters.len(),
        template.mappings.len(),
        template.conditions.len(),
        template.resources.len(),
        template.outputs.len()
    );
    Ok(template)
}

#[cfg(test)]
mod tests {
    use cfn2cdk_core::{DeletionPolicy, ResourceType};

    use super::*;

    fn parse(content: &str) -> Result<Template> {
        parse_template(content, "template.yaml")
    }

    const EC2_YAML: &str = r#"
AWSTemplateFormatVersion: "2010-09-09"
Description: VPC with a security group
Resources:
  TestVPC:
    Type: AWS::EC2::VPC
    Properties:
      CidrBlock: 10.0.0.0/16
  SG1:
    Type: AWS::EC2::SecurityGroup
    DependsOn: TestVPC
    DeletionPolicy: Retain
    Properties:
      GroupDescription: SG2
      VpcId: !Ref TestVPC
      SecurityGroupEgress:
        - IpProtocol: TCP
          FromPort: 10000
          ToPort: 10000
          CidrIp: 0.0.0.0/0
"#;

    #[test]
    fn test_parse_yaml_short_form() {
        let template = parse(EC2_YAML).unwrap();

        assert_eq!(template.description.as_deref(), Some("VPC with a security group"));
        assert_eq!(
            template.resources.keys().collect::<Vec<_>>(),
            vec!["TestVPC", "SG1"]
        );

        let sg = template.resource("SG1").unwrap();
        assert_eq!(
            sg.resource_type,
            ResourceType::Aws {
                service: "EC2".into(),
                type_name: "SecurityGroup".into()
            }
        );
        assert_eq!(sg.depends_on, vec!["TestVPC"]);
        assert_eq!(sg.deletion_policy, Some(DeletionPolicy::Retain));
        assert_eq!(
            sg.properties["VpcId"],
            Expr::intrinsic(Intrinsic::Ref("TestVPC".into()))
        );
        let Expr::List(egress) = &sg.properties["SecurityGroupEgress"] else {
            panic!("expected list");
        };
        let Expr::Object(rule) = &egress[0] else {
            panic!("expected object");
        };
        assert_eq!(rule["FromPort"], Expr::Number(10000));
    }

    #[test]
    fn test_parse_json_long_form() {
        let template = parse(
            r#"{
  "Parameters": {
    "Env": { "Type": "String", "Default": "dev", "AllowedValues": ["dev", "prod"] }
  },
  "Resources": {
    "Bucket": {
      "Type": "AWS::S3::Bucket",
      "Properties": {
        "BucketName": { "Fn::Join": ["-", [{ "Ref": "Env" }, "data"]] },
        "Arn": { "Fn::GetAtt": "Bucket2.Arn" }
      }
    },
    "Bucket2": { "Type": "AWS::S3::Bucket" }
  }
}"#,
        )
        .unwrap();

        let bucket = template.resource("Bucket").unwrap();
        assert_eq!(
            bucket.properties["BucketName"],
            Expr::intrinsic(Intrinsic::Join {
                delimiter: "-".into(),
                items: Expr::List(vec![
                    Expr::intrinsic(Intrinsic::Ref("Env".into())),
                    Expr::string("data"),
                ]),
            })
        );
        assert_eq!(
            bucket.properties["Arn"],
            Expr::intrinsic(Intrinsic::GetAtt {
                logical_id: "Bucket2".into(),
                attribute: "Arn".into()
            })
        );
        assert_eq!(template.parameter("Env").unwrap().allowed_values, vec!["dev", "prod"]);
    }

    #[test]
    fn test_parse_is_deterministic() {
        assert_eq!(parse(EC2_YAML).unwrap(), parse(EC2_YAML).unwrap());
    }

    #[test]
    fn test_parse_conditions_and_mappings() {
        let template = parse(
            r#"
Parameters:
  Environment:
    Type: String
    Default: dev
Mappings:
  RegionToAmi:
    us-east-1:
      AMI: ami-0c02fb55956c7d316
Conditions:
  IsProduction: !Equals [!Ref Environment, prod]
  UseEncryption: !And [!Condition IsProduction, {"Condition": IsProduction}]
Resources:
  Instance:
    Type: AWS::EC2::Instance
    Condition: UseEncryption
    Properties:
      ImageId: !FindInMap [RegionToAmi, !Ref AWS::Region, AMI]
"#,
        )
        .unwrap();

        assert_eq!(
            template.condition("UseEncryption").unwrap().expr,
            Expr::intrinsic(Intrinsic::And(vec![
                Expr::intrinsic(Intrinsic::Condition("IsProduction".into())),
                Expr::intrinsic(Intrinsic::Condition("IsProduction".into())),
            ]))
        );
        assert_eq!(
            template.mapping("RegionToAmi").unwrap().get("us-east-1", "AMI"),
            Some(&MappingValue::String("ami-0c02fb55956c7d316".into()))
        );
        assert_eq!(
            template.resource("Instance").unwrap().condition.as_deref(),
            Some("UseEncryption")
        );
    }

    #[test]
    fn test_parse_long_form_if_inside_condition() {
        let template = parse(
            r#"{
  "Conditions": {
    "A": { "Fn::Equals": ["x", "x"] },
    "B": { "Fn::Equals": ["x", "y"] },
    "Either": { "Fn::If": ["A", { "Condition": "B" }, false] }
  },
  "Resources": {
    "Topic": {
      "Type": "AWS::SNS::Topic",
      "Properties": {
        "Tags": { "Fn::If": ["A", { "Condition": "B" }, { "Ref": "AWS::NoValue" }] }
      }
    }
  }
}"#,
        )
        .unwrap();

        assert_eq!(
            template.condition("Either").unwrap().expr,
            Expr::intrinsic(Intrinsic::If {
                condition: "A".into(),
                when_true: Expr::intrinsic(Intrinsic::Condition("B".into())),
                when_false: Expr::Bool(false),
            })
        );

        // Outside a condition body a "Condition" key is an ordinary property.
        let Some(Intrinsic::If { when_true, .. }) =
            template.resource("Topic").unwrap().properties["Tags"].as_intrinsic()
        else {
            panic!("expected Fn::If");
        };
        assert!(matches!(when_true, Expr::Object(entries) if entries.contains_key("Condition")));
    }

    #[test]
    fn test_parse_sub_forms() {
        let template = parse(
            r#"
Resources:
  Topic:
    Type: AWS::SNS::Topic
    Properties:
      TopicName: !Sub "${AWS::StackName}-topic"
      DisplayName: !Sub
        - "${Prefix}-${!Literal}"
        - Prefix: app
"#,
        )
        .unwrap();

        let topic = template.resource("Topic").unwrap();
        let Some(Intrinsic::Sub { parts, variables }) = topic.properties["DisplayName"].as_intrinsic()
        else {
            panic!("expected Fn::Sub");
        };
        assert_eq!(
            parts,
            &vec![
                SubPart::Variable("Prefix".into()),
                SubPart::Text("-${Literal}".into()),
            ]
        );
        assert_eq!(variables["Prefix"], Expr::string("app"));
    }

    #[test]
    fn test_rejects_undeclared_ref() {
        let err = parse(
            r#"
Resources:
  SG:
    Type: AWS::EC2::SecurityGroup
    Properties:
      VpcId: !Ref MissingVpc
"#,
        )
        .unwrap_err();
        assert!(matches!(
            *err,
            Error::UnresolvedReference { ref name, ref logical_id, .. }
                if name == "MissingVpc" && logical_id == "SG"
        ));
    }

    #[test]
    fn test_rejects_undeclared_condition() {
        let err = parse(
            r#"
Resources:
  Bucket:
    Type: AWS::S3::Bucket
    Condition: Nope
"#,
        )
        .unwrap_err();
        assert!(matches!(*err, Error::UnresolvedReference { ref name, .. } if name == "Nope"));
    }

    #[test]
    fn test_rejects_malformed_arity() {
        let err = parse(
            r#"
Resources:
  Bucket:
    Type: AWS::S3::Bucket
    Properties:
      BucketName: !Select [0]
"#,
        )
        .unwrap_err();
        assert!(matches!(
            *err,
            Error::MalformedIntrinsic { ref function, .. } if function == "Fn::Select"
        ));
    }

    #[test]
    fn test_rejects_unknown_function() {
        let err = parse(
            r#"
Resources:
  Bucket:
    Type: AWS::S3::Bucket
    Properties:
      BucketName: { "Fn::Length": [1, 2] }
"#,
        )
        .unwrap_err();
        assert!(matches!(*err, Error::UnsupportedFunction { .. }));
    }

    #[test]
    fn test_rejects_duplicate_resource_ids() {
        let result = parse(
            r#"{
  "Resources": {
    "Bucket": { "Type": "AWS::S3::Bucket" },
    "Bucket": { "Type": "AWS::S3::Bucket" }
  }
}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_parameter_resource_clash() {
        let err = parse(
            r#"
Parameters:
  Bucket:
    Type: String
Resources:
  Bucket:
    Type: AWS::S3::Bucket
"#,
        )
        .unwrap_err();
        assert!(matches!(*err, Error::DuplicateLogicalId { .. }));
    }

    #[test]
    fn test_rejects_resource_ref_in_condition() {
        let err = parse(
            r#"
Conditions:
  HasBucket: !Equals [!Ref Bucket, ""]
Resources:
  Bucket:
    Type: AWS::S3::Bucket
"#,
        )
        .unwrap_err();
        assert!(matches!(*err, Error::Validation { .. }));
    }

    #[test]
    fn test_rejects_bad_resource_type() {
        let err = parse(
            r#"
Resources:
  Bucket:
    Type: S3Bucket
"#,
        )
        .unwrap_err();
        assert!(matches!(*err, Error::InvalidResourceType { .. }));
    }

    #[test]
    fn test_rejects_default_outside_allowed_values() {
        let err = parse(
            r#"
Parameters:
  Env:
    Type: String
    Default: qa
    AllowedValues: [dev, prod]
Resources:
  Bucket:
    Type: AWS::S3::Bucket
"#,
        )
        .unwrap_err();
        assert!(matches!(*err, Error::Validation { .. }));
    }

    #[test]
    fn test_missing_resources_section() {
        let err = parse("Description: empty\n").unwrap_err();
        assert!(matches!(*err, Error::MissingSection { .. }));
    }

    #[test]
    fn test_syntax_error_has_span() {
        let err = parse("Resources: [unclosed\n").unwrap_err();
        assert!(matches!(*err, Error::Syntax { .. }));
    }
}
