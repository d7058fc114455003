use serde::Serialize;

use crate::Value;

/// A condition CloudFormation decides at deploy time, emitted as a `CfnCondition`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeployCondition {
    pub logical_id: String,
    pub expression: ConditionExpr,
}

/// The part of a condition that could not be folded during synthesis.
///
/// Operands already known to be true or false are folded away, so an
/// expression never holds a literal boolean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ConditionExpr {
    /// `Fn::Equals` with at least one deploy-time side.
    Equals(Value, Value),
    And(Vec<ConditionExpr>),
    Or(Vec<ConditionExpr>),
    Not(Box<ConditionExpr>),
    /// Another deploy-time condition.
    Condition(String),
}

impl ConditionExpr {
    /// Names of the deploy-time conditions this expression refers to.
    pub fn referenced_conditions(&self) -> Vec<&str> {
        match self {
            Self::Equals(..) => Vec::new(),
            Self::And(operands) | Self::Or(operands) => operands
                .iter()
                .flat_map(ConditionExpr::referenced_conditions)
                .collect(),
            Self::Not(operand) => operand.referenced_conditions(),
            Self::Condition(name) => vec![name.as_str()],
        }
    }
}
