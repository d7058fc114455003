//! Snapshot tests for Java code generation.
//!
//! Run `cargo insta review` to update snapshots when making intentional changes.

use cfn2cdk_codegen::testing::{EC2_ENCRYPTION, EC2_STACK, REGION_GATED, synth};
use cfn2cdk_codegen_java::{Generator, LanguageCodegen};
use cfn2cdk_core::StackKind;

fn generate(template: &str, name: &str, kind: StackKind) -> (String, String) {
    let ir = synth(template, name, kind).expect("Pipeline failed");
    let mut files = Generator::new(ir).preview();
    assert_eq!(files.len(), 1);
    let file = files.remove(0);
    (file.path, file.content)
}

#[test]
fn test_ec2_stack() {
    let (path, content) = generate(EC2_STACK, "Ec2Stack", StackKind::Stack);
    assert_eq!(path, "src/main/java/com/myorg/Ec2Stack.java");
    insta::assert_snapshot!("ec2_stack", content);
}

#[test]
fn test_ec2_encryption_construct() {
    let (path, content) = generate(
        EC2_ENCRYPTION,
        "Ec2EncryptionConstruct",
        StackKind::Construct,
    );
    assert_eq!(path, "src/main/java/com/myorg/Ec2EncryptionConstruct.java");
    assert!(content.contains("public class Ec2EncryptionConstruct extends Construct {"));
    assert!(content.contains("        super(scope, id);\n"));
    assert!(content.contains(
        "        CfnMapping regionToAmi = CfnMapping.Builder.create(this, \"RegionToAmi\")\n                .mapping(Map.ofEntries(\n"
    ));
    assert!(content.contains(
        ".imageId(regionToAmi.findInMap(Stack.of(this).getRegion(), \"AMI\"))"
    ));
    assert!(content.contains(".securityGroups(Arrays.asList(privateSecurityGroup.getRef()))"));
    assert!(content.contains(concat!(
        "                .tags(Arrays.asList(\n",
        "                    CfnTag.builder()\n",
        "                        .key(\"Name\")\n",
        "                        .value(\"EC2\")\n",
        "                        .build()\n",
        "                ))\n",
    )));
    assert!(!content.contains("Map.entry(\"key\""));
    assert!(content.contains("        // Condition UseEncryption resolved to false\n"));
    assert!(!content.contains("publicSecurityGroup.getRef()"));
    insta::assert_snapshot!("ec2_encryption_construct", content);
}

#[test]
fn test_options_dependencies_and_custom_resources() {
    let (_, content) = generate(
        r#"
Resources:
  Queue:
    Type: AWS::SQS::Queue
    DeletionPolicy: Retain
    UpdateReplacePolicy: Snapshot
  Seeder:
    Type: Custom::Seeder
    DependsOn: Queue
    Properties:
      ServiceToken: !Sub "arn:${AWS::Partition}:lambda:${AWS::Region}:${AWS::AccountId}:function:seed"
      QueueUrl: !Ref Queue
Outputs:
  SeedResult:
    Value: !GetAtt Seeder.Result
    Export:
      Name: !Sub "${AWS::StackName}-seed"
"#,
        "SeedStack",
        StackKind::Stack,
    );

    assert!(content.contains("import software.amazon.awscdk.services.sqs.*;"));
    assert!(content.contains(
        "        CfnQueue queue = CfnQueue.Builder.create(this, \"Queue\")\n                .build();\n"
    ));
    assert!(content.contains("queue.getCfnOptions().setDeletionPolicy(CfnDeletionPolicy.RETAIN);"));
    assert!(content.contains(
        "queue.getCfnOptions().setUpdateReplacePolicy(CfnDeletionPolicy.SNAPSHOT);"
    ));
    assert!(content.contains("CfnResource seeder = CfnResource.Builder.create(this, \"Seeder\")"));
    assert!(content.contains(".type(\"Custom::Seeder\")"));
    assert!(content.contains("Map.entry(\"QueueUrl\", queue.getRef())"));
    assert!(content.contains("seeder.addDependency(queue);"));
    assert!(content.contains("Stack.of(this).getPartition()"));
    assert!(content.contains(".value(seeder.getAtt(\"Result\").toString())"));
    assert!(content.contains(
        ".exportName(Fn.join(\"\", Arrays.asList(Stack.of(this).getStackName(), \"-seed\")))"
    ));
}

#[test]
fn test_deploy_time_functions() {
    let (_, content) = generate(
        r#"
Resources:
  Subnet:
    Type: AWS::EC2::Subnet
    Properties:
      VpcId: !ImportValue shared-vpc
      AvailabilityZone: !Select [0, !GetAZs ""]
      CidrBlock: !Select [1, !Cidr ["10.0.0.0/16", "4", 8]]
"#,
        "SubnetStack",
        StackKind::Stack,
    );

    assert!(content.contains(".vpcId(Fn.importValue(\"shared-vpc\"))"));
    assert!(content.contains(".availabilityZone(Fn.select(0, Fn.getAzs(\"\")))"));
    assert!(content.contains(".cidrBlock(Fn.select(1, Fn.cidr(\"10.0.0.0/16\", 4, \"8\")))"));
    assert!(!content.contains("import java.util"));
}

#[test]
fn test_deploy_time_condition() {
    let (_, content) = generate(REGION_GATED, "RegionStack", StackKind::Stack);

    assert!(content.contains(concat!(
        "        CfnCondition isUsEast1 = CfnCondition.Builder.create(this, \"IsUsEast1\")\n",
        "                .expression(Fn.conditionEquals(Stack.of(this).getRegion(), \"us-east-1\"))\n",
        "                .build();\n"
    )));
    assert!(content.contains(".expression(Fn.conditionNot(isUsEast1))"));
    assert!(content.contains("topic.getCfnOptions().setCondition(isUsEast1);"));
    assert!(content.contains(
        ".queueName(Fn.conditionIf(isUsEast1.getLogicalId(), \"primary\", Aws.NO_VALUE).toString())"
    ));
    assert!(content.contains("                .condition(isUsEast1)\n"));
}

#[test]
fn test_generate_writes_once() {
    let temp = tempfile::TempDir::new().unwrap();
    let ir = synth(EC2_STACK, "Ec2Stack", StackKind::Stack).unwrap();
    let generator = Generator::new(ir);

    let first = generator.generate(temp.path()).unwrap();
    assert_eq!(first.written, vec!["src/main/java/com/myorg/Ec2Stack.java"]);
    assert!(
        temp.path()
            .join("src/main/java/com/myorg/Ec2Stack.java")
            .exists()
    );

    let second = generator.generate(temp.path()).unwrap();
    assert!(second.written.is_empty());
}
