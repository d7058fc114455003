//! Fundamental CloudFormation types shared across crates.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A pseudo parameter provided by CloudFormation at deploy time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum PseudoParameter {
    AccountId,
    NotificationArns,
    NoValue,
    Partition,
    Region,
    StackId,
    StackName,
    UrlSuffix,
}

impl PseudoParameter {
    /// Every pseudo parameter, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::AccountId,
        Self::NotificationArns,
        Self::NoValue,
        Self::Partition,
        Self::Region,
        Self::StackId,
        Self::StackName,
        Self::UrlSuffix,
    ];

    /// Look up a pseudo parameter by its `AWS::` name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// The name as written in a template.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AccountId => "AWS::AccountId",
            Self::NotificationArns => "AWS::NotificationARNs",
            Self::NoValue => "AWS::NoValue",
            Self::Partition => "AWS::Partition",
            Self::Region => "AWS::Region",
            Self::StackId => "AWS::StackId",
            Self::StackName => "AWS::StackName",
            Self::UrlSuffix => "AWS::URLSuffix",
        }
    }

    /// The `Stack` property exposing this value (`region`, `account`, ...).
    pub fn stack_property(&self) -> &'static str {
        match self {
            Self::AccountId => "account",
            Self::NotificationArns => "notificationArns",
            Self::NoValue => "noValue",
            Self::Partition => "partition",
            Self::Region => "region",
            Self::StackId => "stackId",
            Self::StackName => "stackName",
            Self::UrlSuffix => "urlSuffix",
        }
    }

    /// Whether the value is a list rather than a string.
    pub fn is_list(&self) -> bool {
        matches!(self, Self::NotificationArns)
    }
}

impl fmt::Display for PseudoParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed resource type string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ResourceType {
    /// `AWS::<Service>::<Type>`
    Aws { service: String, type_name: String },
    /// `Custom::<Name>` or `AWS::CloudFormation::CustomResource`
    Custom { name: String },
}

impl ResourceType {
    /// The service segment (`EC2`, `S3`), if this is an AWS type.
    pub fn service(&self) -> Option<&str> {
        match self {
            Self::Aws { service, .. } => Some(service),
            Self::Custom { .. } => None,
        }
    }

    /// Whether this is a custom resource.
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom { .. })
    }

    /// The L1 construct class name (`CfnSecurityGroup`).
    pub fn class_name(&self) -> String {
        match self {
            Self::Aws { type_name, .. } => format!("Cfn{type_name}"),
            Self::Custom { .. } => "CfnResource".to_string(),
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aws { service, type_name } => write!(f, "AWS::{service}::{type_name}"),
            Self::Custom { name } if name == "AWS::CloudFormation::CustomResource" => {
                f.write_str(name)
            }
            Self::Custom { name } => write!(f, "Custom::{name}"),
        }
    }
}

/// Error returned when a resource type string is malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTypeError {
    pub value: String,
}

impl fmt::Display for ResourceTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid resource type '{}', expected AWS::<Service>::<Type> or Custom::<Name>",
            self.value
        )
    }
}

impl std::error::Error for ResourceTypeError {}

impl FromStr for ResourceType {
    type Err = ResourceTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ResourceTypeError {
            value: s.to_string(),
        };
        if s == "AWS::CloudFormation::CustomResource" {
            return Ok(Self::Custom {
                name: s.to_string(),
            });
        }

        let segments: Vec<&str> = s.split("::").collect();
        match segments.as_slice() {
            ["Custom", name] if !name.is_empty() => Ok(Self::Custom {
                name: name.to_string(),
            }),
            ["AWS", service, type_name]
                if !service.is_empty() && !type_name.is_empty() =>
            {
                Ok(Self::Aws {
                    service: service.to_string(),
                    type_name: type_name.to_string(),
                })
            }
            _ => Err(err()),
        }
    }
}

/// `DeletionPolicy` / `UpdateReplacePolicy` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeletionPolicy {
    Delete,
    Retain,
    Snapshot,
    RetainExceptOnDelete,
}

impl DeletionPolicy {
    /// The `CfnDeletionPolicy` enum member name.
    pub fn constant(&self) -> &'static str {
        match self {
            Self::Delete => "DELETE",
            Self::Retain => "RETAIN",
            Self::Snapshot => "SNAPSHOT",
            Self::RetainExceptOnDelete => "RETAIN_EXCEPT_ON_DELETE",
        }
    }
}

impl FromStr for DeletionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Delete" => Ok(Self::Delete),
            "Retain" => Ok(Self::Retain),
            "Snapshot" => Ok(Self::Snapshot),
            "RetainExceptOnDelete" => Ok(Self::RetainExceptOnDelete),
            _ => Err(format!(
                "unknown policy '{s}', expected Delete, Retain, Snapshot or RetainExceptOnDelete"
            )),
        }
    }
}

/// Whether the generated class is a whole stack or a reusable construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackKind {
    #[default]
    Stack,
    Construct,
}

impl fmt::Display for StackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stack => write!(f, "stack"),
            Self::Construct => write!(f, "construct"),
        }
    }
}

impl FromStr for StackKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stack" => Ok(Self::Stack),
            "construct" => Ok(Self::Construct),
            _ => Err(format!("unknown kind '{s}', expected 'stack' or 'construct'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pseudo_parameter_lookup() {
        assert_eq!(
            PseudoParameter::from_name("AWS::Region"),
            Some(PseudoParameter::Region)
        );
        assert_eq!(
            PseudoParameter::from_name("AWS::URLSuffix"),
            Some(PseudoParameter::UrlSuffix)
        );
        assert_eq!(PseudoParameter::from_name("AWS::Nope"), None);
        assert!(PseudoParameter::NotificationArns.is_list());
    }

    #[test]
    fn test_resource_type_parse() {
        let ty: ResourceType = "AWS::EC2::SecurityGroup".parse().unwrap();
        assert_eq!(ty.service(), Some("EC2"));
        assert_eq!(ty.class_name(), "CfnSecurityGroup");
        assert_eq!(ty.to_string(), "AWS::EC2::SecurityGroup");

        let custom: ResourceType = "Custom::Seeder".parse().unwrap();
        assert!(custom.is_custom());
        assert_eq!(custom.to_string(), "Custom::Seeder");

        let cfn_custom: ResourceType = "AWS::CloudFormation::CustomResource".parse().unwrap();
        assert!(cfn_custom.is_custom());
    }

    #[test]
    fn test_resource_type_rejects_malformed() {
        assert!("EC2::Instance".parse::<ResourceType>().is_err());
        assert!("AWS::EC2".parse::<ResourceType>().is_err());
        assert!("AWS::::Instance".parse::<ResourceType>().is_err());
        assert!("Custom::".parse::<ResourceType>().is_err());
    }

    #[test]
    fn test_deletion_policy_parse() {
        assert_eq!("Retain".parse::<DeletionPolicy>(), Ok(DeletionPolicy::Retain));
        assert_eq!(DeletionPolicy::Snapshot.constant(), "SNAPSHOT");
        assert!("Keep".parse::<DeletionPolicy>().is_err());
    }

    #[test]
    fn test_stack_kind_parse() {
        assert_eq!("Construct".parse::<StackKind>(), Ok(StackKind::Construct));
        assert_eq!(StackKind::default(), StackKind::Stack);
        assert!("app".parse::<StackKind>().is_err());
    }
}
