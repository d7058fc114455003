//! Template parameters.

use serde::Serialize;

/// Declared parameter type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ParameterType {
    String,
    Number,
    /// `List<Number>`
    NumberList,
    /// `CommaDelimitedList` and `List<AWS::...>` types
    CommaDelimitedList,
    /// AWS-specific string-valued type such as `AWS::EC2::KeyPair::KeyName`
    AwsSpecific(String),
    /// `AWS::SSM::Parameter::Value<...>`, resolved by CloudFormation at deploy time
    Ssm(String),
}

impl ParameterType {
    /// Classify a `Type` string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "String" => Some(Self::String),
            "Number" => Some(Self::Number),
            "List<Number>" => Some(Self::NumberList),
            "CommaDelimitedList" => Some(Self::CommaDelimitedList),
            _ if s.starts_with("AWS::SSM::Parameter::") => Some(Self::Ssm(s.to_string())),
            _ if s.starts_with("List<AWS::") && s.ends_with('>') => Some(Self::CommaDelimitedList),
            _ if s.starts_with("AWS::") => Some(Self::AwsSpecific(s.to_string())),
            _ => None,
        }
    }

    /// Whether values of this type are lists.
    pub fn is_list(&self) -> bool {
        matches!(self, Self::NumberList | Self::CommaDelimitedList)
    }
}

/// A declared template parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub logical_id: String,
    pub parameter_type: ParameterType,
    /// Default value in its textual form.
    pub default: Option<String>,
    pub allowed_values: Vec<String>,
    pub description: Option<String>,
    pub no_echo: bool,
}

impl Parameter {
    /// Whether `value` satisfies the `AllowedValues` constraint.
    ///
    /// List-typed parameters check every element.
    pub fn allows(&self, value: &str) -> bool {
        if self.allowed_values.is_empty() {
            return true;
        }
        if self.parameter_type.is_list() {
            value
                .split(',')
                .map(str::trim)
                .all(|item| self.allowed_values.iter().any(|a| a == item))
        } else {
            self.allowed_values.iter().any(|a| a == value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_type_parse() {
        assert_eq!(ParameterType::parse("String"), Some(ParameterType::String));
        assert_eq!(ParameterType::parse("List<Number>"), Some(ParameterType::NumberList));
        assert_eq!(
            ParameterType::parse("List<AWS::EC2::Subnet::Id>"),
            Some(ParameterType::CommaDelimitedList)
        );
        assert!(matches!(
            ParameterType::parse("AWS::SSM::Parameter::Value<String>"),
            Some(ParameterType::Ssm(_))
        ));
        assert!(matches!(
            ParameterType::parse("AWS::EC2::KeyPair::KeyName"),
            Some(ParameterType::AwsSpecific(_))
        ));
        assert_eq!(ParameterType::parse("Boolean"), None);
    }

    #[test]
    fn test_allows() {
        let param = Parameter {
            logical_id: "Environment".into(),
            parameter_type: ParameterType::String,
            default: Some("dev".into()),
            allowed_values: vec!["dev".into(), "prod".into()],
            description: None,
            no_echo: false,
        };
        assert!(param.allows("prod"));
        assert!(!param.allows("staging"));

        let list = Parameter {
            parameter_type: ParameterType::CommaDelimitedList,
            ..param
        };
        assert!(list.allows("dev, prod"));
        assert!(!list.allows("dev,qa"));
    }
}
