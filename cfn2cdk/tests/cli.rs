//! End-to-end tests running the `cfn2cdk` binary.

use std::{
    fs,
    path::Path,
    process::{Command, Output},
};

const TEMPLATE: &str = r#"
Description: Queue with an alarm in production
Parameters:
  Env:
    Type: String
    Default: dev
    AllowedValues: [dev, prod]
Conditions:
  IsProd: !Equals [!Ref Env, prod]
Resources:
  Queue:
    Type: AWS::SQS::Queue
    Properties:
      QueueName: !Sub "${Env}-jobs"
  Alarm:
    Type: AWS::CloudWatch::Alarm
    Condition: IsProd
    Properties:
      ComparisonOperator: GreaterThanThreshold
      EvaluationPeriods: 1
      Threshold: 100
      Dimensions:
        - Name: QueueName
          Value: !GetAtt Queue.QueueName
Outputs:
  QueueUrl:
    Value: !Ref Queue
"#;

fn cfn2cdk(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cfn2cdk"))
        .current_dir(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run cfn2cdk")
}

fn workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("jobs.yaml"), TEMPLATE).unwrap();
    dir
}

#[test]
fn test_synth_prints_to_stdout_by_default() {
    let dir = workspace();
    let output = cfn2cdk(dir.path(), &["synth", "jobs.yaml"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("export class JobsStack extends cdk.Stack {"));
    assert!(stdout.contains("queueName: 'dev-jobs',"));
    assert!(!stdout.contains("CfnAlarm"));
}

#[test]
fn test_synth_with_parameters_writes_output_dir() {
    let dir = workspace();
    let output = cfn2cdk(
        dir.path(),
        &[
            "synth",
            "jobs.yaml",
            "-l",
            "python",
            "-p",
            "Env=prod",
            "-o",
            "out",
        ],
    );

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let source = fs::read_to_string(dir.path().join("out/jobs_stack.py")).unwrap();
    assert!(source.contains("queue_name=\"prod-jobs\""));
    assert!(source.contains("cloudwatch.CfnAlarm("));
}

#[test]
fn test_config_file_supplies_defaults() {
    let dir = workspace();
    fs::write(
        dir.path().join("cfn2cdk.toml"),
        r#"
[synth]
language = "java"
stack-name = "JobQueue"
output = "cdk"

[parameters]
Env = "prod"
"#,
    )
    .unwrap();

    let output = cfn2cdk(dir.path(), &["synth", "jobs.yaml"]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let source =
        fs::read_to_string(dir.path().join("cdk/src/main/java/com/myorg/JobQueue.java")).unwrap();
    assert!(source.contains("public class JobQueue extends Stack {"));
    assert!(source.contains(".queueName(\"prod-jobs\")"));
}

#[test]
fn test_disallowed_parameter_fails() {
    let dir = workspace();
    let output = cfn2cdk(dir.path(), &["synth", "jobs.yaml", "-p", "Env=staging"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("staging"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_check_reports_order() {
    let dir = workspace();
    let output = cfn2cdk(dir.path(), &["check", "jobs.yaml"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("✓ jobs.yaml is valid"));
    assert!(stdout.contains("info: condition 'IsProd' is false"));
    assert!(stdout.contains("  1. Queue"));
}

#[test]
fn test_invalid_template_reports_diagnostic() {
    let dir = workspace();
    fs::write(
        dir.path().join("broken.yaml"),
        "Resources:\n  Queue:\n    Properties: {}\n",
    )
    .unwrap();

    let output = cfn2cdk(dir.path(), &["check", "broken.yaml"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Queue"));
}
