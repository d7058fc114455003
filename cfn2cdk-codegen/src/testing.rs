//! Test utilities for language generators.
//!
//! This module is only available when the `testing` feature is enabled
//! or during tests.

use cfn2cdk_core::StackKind;
use cfn2cdk_ir::StackIr;
use eyre::{Result, WrapErr};

use crate::{
    pipeline::{CompilationContext, Pipeline, StackSettings},
    resolve::ResolutionContext,
};

/// A VPC and a security group that references it.
pub const EC2_STACK: &str = r#"
AWSTemplateFormatVersion: "2010-09-09"
Description: A VPC with a web security group
Resources:
  WebSecurityGroup:
    Type: AWS::EC2::SecurityGroup
    Properties:
      GroupDescription: Allow HTTP
      VpcId: !Ref TestVPC
      SecurityGroupIngress:
        - IpProtocol: tcp
          FromPort: 80
          ToPort: 80
          CidrIp: 0.0.0.0/0
  TestVPC:
    Type: AWS::EC2::VPC
    Properties:
      CidrBlock: 10.0.0.0/16
      EnableDnsSupport: true
Outputs:
  VpcId:
    Description: The VPC
    Value: !Ref TestVPC
"#;

/// An instance whose AMI, tags and security group depend on parameters,
/// a region mapping and combined conditions.
pub const EC2_ENCRYPTION: &str = r#"
Parameters:
  Environment:
    Type: String
    Default: dev
    AllowedValues: [dev, prod]
  DatabaseType:
    Type: String
    Default: postgresql
    AllowedValues: [mysql, postgresql]
  SubnetType:
    Type: String
    Default: Private1
    AllowedValues: [Private1, Private2, Public1, Public2]
  EncryptedAmi:
    Type: String
    Default: ami-1234567890abcdef0
Mappings:
  RegionToAmi:
    us-east-1:
      AMI: ami-0c02fb55956c7d316
    us-west-2:
      AMI: ami-008fe2fc65df48dac
Conditions:
  HasDatabase: !Equals [!Ref DatabaseType, mysql]
  IsProduction: !Equals [!Ref Environment, prod]
  UsePrivateSecurityGroup: !Or
    - !Equals [!Ref SubnetType, Private1]
    - !Equals [!Ref SubnetType, Private2]
  KeyPairProd: !Not [!Condition IsProduction]
  UseEncryption: !And [!Condition IsProduction, !Condition HasDatabase]
Resources:
  PrivateSecurityGroup:
    Type: AWS::EC2::SecurityGroup
    Properties:
      GroupDescription: Private security group
  PublicSecurityGroup:
    Type: AWS::EC2::SecurityGroup
    Properties:
      GroupDescription: Public security group
  MyApp:
    Type: AWS::EC2::Instance
    Properties:
      ImageId: !If
        - UseEncryption
        - !Ref EncryptedAmi
        - !FindInMap [RegionToAmi, !Ref AWS::Region, AMI]
      InstanceType: t3.micro
      Tags:
        - Key: Name
          Value: !Select [1, !Split ["-", My-EC2-Instance]]
      SecurityGroups:
        - !If
          - UsePrivateSecurityGroup
          - !Ref PrivateSecurityGroup
          - !Ref PublicSecurityGroup
"#;

/// A topic, an output and a queue name gated on the deploy region, which
/// stays unknown unless the region is supplied.
pub const REGION_GATED: &str = r#"
Conditions:
  IsUsEast1: !Equals [!Ref AWS::Region, us-east-1]
  NotUsEast1: !Not [!Condition IsUsEast1]
Resources:
  Topic:
    Type: AWS::SNS::Topic
    Condition: IsUsEast1
  Queue:
    Type: AWS::SQS::Queue
    Properties:
      QueueName: !If [IsUsEast1, primary, !Ref AWS::NoValue]
Outputs:
  TopicArn:
    Condition: IsUsEast1
    Value: !Ref Topic
"#;

/// Run the whole pipeline on a template.
pub fn synth_with(
    template: &str,
    settings: StackSettings,
    resolution: ResolutionContext,
) -> Result<StackIr> {
    let template = cfn2cdk_template::parse_template(template, "template.yaml")
        .wrap_err("failed to parse test template")?;
    let ctx = CompilationContext::new(template, settings).with_resolution(resolution);
    Pipeline::new().run(ctx)?.take_ir()
}

/// Run the whole pipeline with default settings.
pub fn synth(template: &str, name: &str, kind: StackKind) -> Result<StackIr> {
    synth_with(
        template,
        StackSettings::new(name).with_kind(kind),
        ResolutionContext::new(),
    )
}

#[cfg(test)]
mod tests {
    use cfn2cdk_ir::{Deferred, ObjectKind, Value};

    use super::*;

    #[test]
    fn test_ec2_stack_orders_vpc_first() {
        let ir = synth(EC2_STACK, "Ec2Stack", StackKind::Stack).unwrap();
        let ids: Vec<_> = ir.constructs.iter().map(|c| c.logical_id.as_str()).collect();

        assert_eq!(ids, vec!["TestVPC", "WebSecurityGroup"]);
        assert_eq!(
            ir.construct("WebSecurityGroup").unwrap().properties["VpcId"],
            Value::deferred(Deferred::Ref {
                logical_id: "TestVPC".into()
            })
        );
    }

    #[test]
    fn test_ec2_encryption_selects_private_group() {
        let ir = synth(EC2_ENCRYPTION, "Ec2EncryptionConstruct", StackKind::Construct).unwrap();
        let app = ir.construct("MyApp").unwrap();

        assert_eq!(
            app.properties["SecurityGroups"],
            Value::List(vec![Value::deferred(Deferred::Ref {
                logical_id: "PrivateSecurityGroup".into()
            })])
        );
        assert!(ir.construct("PrivateSecurityGroup").unwrap().referenced);
        assert!(!ir.construct("PublicSecurityGroup").unwrap().referenced);

        let conditions: Vec<_> = ir
            .conditions
            .iter()
            .map(|c| (c.logical_id.as_str(), c.value))
            .collect();
        assert_eq!(
            conditions,
            vec![
                ("HasDatabase", false),
                ("IsProduction", false),
                ("UsePrivateSecurityGroup", true),
                ("KeyPairProd", true),
                ("UseEncryption", false),
            ]
        );
    }

    #[test]
    fn test_ec2_encryption_tag_is_folded() {
        let ir = synth(EC2_ENCRYPTION, "Ec2EncryptionConstruct", StackKind::Construct).unwrap();
        let Value::List(tags) = &ir.construct("MyApp").unwrap().properties["Tags"] else {
            panic!("expected a tag list");
        };
        let Value::Object { kind, entries } = &tags[0] else {
            panic!("expected a tag object");
        };

        assert_eq!(*kind, ObjectKind::Tag);
        assert_eq!(entries["Value"], Value::String("EC2".into()));
    }

    #[test]
    fn test_ec2_encryption_production_database() {
        let ir = synth_with(
            EC2_ENCRYPTION,
            StackSettings::new("Ec2EncryptionConstruct"),
            ResolutionContext::new()
                .with_parameter("Environment", "prod")
                .with_parameter("DatabaseType", "mysql"),
        )
        .unwrap();

        assert_eq!(
            ir.construct("MyApp").unwrap().properties["ImageId"],
            Value::String("ami-1234567890abcdef0".into())
        );
        assert!(ir.mappings.is_empty());
    }

    #[test]
    fn test_region_gated_conditions_stay_deploy_time() {
        let ir = synth(REGION_GATED, "RegionStack", StackKind::Stack).unwrap();

        assert_eq!(ir.deploy_conditions.len(), 2);
        assert_eq!(
            ir.construct("Topic").unwrap().condition.as_deref(),
            Some("IsUsEast1")
        );
        assert_eq!(ir.outputs[0].condition.as_deref(), Some("IsUsEast1"));
    }
}
