//! Errors raised while synthesizing a parsed template.
//!
//! Every variant is fatal: synthesis either completes or produces nothing.

use miette::Diagnostic;
use thiserror::Error;

/// Result type for evaluation and ordering.
pub type SynthResult<T> = std::result::Result<T, SynthError>;

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum SynthError {
    #[error("'{logical_id}' references '{target}', which is {reason}")]
    #[diagnostic(code(cfn2cdk::unresolved_reference))]
    UnresolvedReference {
        logical_id: String,
        target: String,
        reason: String,
    },

    #[error("parameter '{parameter}' has no default and no value was supplied")]
    #[diagnostic(
        code(cfn2cdk::unresolved_parameter),
        help("pass --param {parameter}=<value> or add it under [parameters] in cfn2cdk.toml")
    )]
    UnresolvedParameter { parameter: String },

    #[error("value '{value}' for parameter '{parameter}' is not one of: {allowed}")]
    #[diagnostic(code(cfn2cdk::parameter_not_allowed))]
    ParameterValueNotAllowed {
        parameter: String,
        value: String,
        allowed: String,
    },

    #[error("Fn::FindInMap in '{logical_id}': mapping '{mapping}' has no key '{key}'")]
    #[diagnostic(code(cfn2cdk::mapping_key_not_found))]
    MappingKeyNotFound {
        logical_id: String,
        mapping: String,
        key: String,
    },

    #[error("Fn::Select in '{logical_id}': index {index} is out of range for a list of {len}")]
    #[diagnostic(code(cfn2cdk::index_out_of_range))]
    IndexOutOfRange {
        logical_id: String,
        index: usize,
        len: usize,
    },

    #[error("condition '{condition}' depends on itself: {}", .cycle.join(" -> "))]
    #[diagnostic(code(cfn2cdk::cyclic_condition))]
    CyclicCondition {
        condition: String,
        cycle: Vec<String>,
    },

    #[error("resources form a dependency cycle: {}", .cycle.join(" -> "))]
    #[diagnostic(
        code(cfn2cdk::dependency_cycle),
        help("remove a Ref, Fn::GetAtt or DependsOn edge to break the cycle")
    )]
    Cycle { cycle: Vec<String> },

    #[error("{function} in '{logical_id}' cannot be synthesized: {reason}")]
    #[diagnostic(code(cfn2cdk::unsupported_intrinsic))]
    UnsupportedIntrinsic {
        logical_id: String,
        function: String,
        reason: String,
    },
}

impl SynthError {
    /// The logical ID the error is about.
    pub fn logical_id(&self) -> &str {
        match self {
            Self::UnresolvedReference { logical_id, .. }
            | Self::MappingKeyNotFound { logical_id, .. }
            | Self::IndexOutOfRange { logical_id, .. }
            | Self::UnsupportedIntrinsic { logical_id, .. } => logical_id,
            Self::UnresolvedParameter { parameter }
            | Self::ParameterValueNotAllowed { parameter, .. } => parameter,
            Self::CyclicCondition { condition, .. } => condition,
            Self::Cycle { cycle } => cycle.first().map(String::as_str).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_lists_ids() {
        let err = SynthError::Cycle {
            cycle: vec!["A".into(), "B".into(), "A".into()],
        };
        assert_eq!(err.to_string(), "resources form a dependency cycle: A -> B -> A");
        assert_eq!(err.logical_id(), "A");
    }

    #[test]
    fn test_select_message() {
        let err = SynthError::IndexOutOfRange {
            logical_id: "Instance".into(),
            index: 3,
            len: 2,
        };
        assert!(err.to_string().contains("index 3"));
        assert_eq!(err.logical_id(), "Instance");
    }
}
