//! Condition evaluation.
//!
//! A condition folds to true or false when every operand is known during
//! synthesis. Otherwise the unresolved remainder is kept as a
//! [`ConditionExpr`] and the condition is emitted as a `CfnCondition`.

use cfn2cdk_ir::{ConditionExpr, Value};
use cfn2cdk_template::{Expr, Intrinsic};

use super::Evaluator;
use super::evaluator::unsupported;
use crate::{SynthError, SynthResult};

/// Where a condition is in its evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionState {
    Unevaluated,
    /// On the evaluation stack; reaching it again means a cycle.
    Evaluating,
    Resolved(bool),
    /// Decided by CloudFormation at deploy time.
    Deferred,
}

/// The outcome of a boolean expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Truth {
    Known(bool),
    Deferred(ConditionExpr),
}

impl Truth {
    /// `false` only when the expression is known to be false.
    pub fn is_possible(&self) -> bool {
        !matches!(self, Self::Known(false))
    }

    fn negate(self) -> Self {
        match self {
            Self::Known(value) => Self::Known(!value),
            Self::Deferred(ConditionExpr::Not(inner)) => Self::Deferred(*inner),
            Self::Deferred(expr) => Self::Deferred(ConditionExpr::Not(Box::new(expr))),
        }
    }
}

/// Combine operands of `Fn::And` (`all`) or `Fn::Or`, dropping the known ones.
///
/// A known operand equal to `!all` decides the result on its own.
fn combine(all: bool, operands: Vec<Truth>) -> Truth {
    let mut pending = Vec::new();
    for operand in operands {
        match operand {
            Truth::Known(value) if value != all => return Truth::Known(value),
            Truth::Known(_) => {}
            Truth::Deferred(expr) => pending.push(expr),
        }
    }
    match pending.len() {
        0 => Truth::Known(all),
        1 => Truth::Deferred(pending.remove(0)),
        _ if all => Truth::Deferred(ConditionExpr::And(pending)),
        _ => Truth::Deferred(ConditionExpr::Or(pending)),
    }
}

impl Evaluator<'_> {
    /// Evaluate a named condition, memoizing the result.
    ///
    /// A deploy-time condition yields a reference to itself; its expression
    /// is recorded in the context.
    pub fn evaluate_condition(&mut self, name: &str) -> SynthResult<Truth> {
        match self.ctx.condition_state(name) {
            ConditionState::Resolved(value) => return Ok(Truth::Known(value)),
            ConditionState::Deferred => {
                return Ok(Truth::Deferred(ConditionExpr::Condition(name.to_string())));
            }
            ConditionState::Evaluating => {
                return Err(SynthError::CyclicCondition {
                    condition: name.to_string(),
                    cycle: self.ctx.condition_cycle(name),
                });
            }
            ConditionState::Unevaluated => {}
        }

        let condition = self
            .template
            .condition(name)
            .ok_or_else(|| SynthError::UnresolvedReference {
                logical_id: name.to_string(),
                target: name.to_string(),
                reason: "not a declared condition".to_string(),
            })?;

        self.ctx.begin_condition(name);
        let result = self.evaluate_boolean(name, &condition.expr);
        self.ctx.finish_condition(name, result.as_ref().ok().cloned());
        match result? {
            Truth::Known(value) => {
                log::trace!("condition {name} = {value}");
                Ok(Truth::Known(value))
            }
            Truth::Deferred(_) => {
                log::trace!("condition {name} is decided at deploy time");
                Ok(Truth::Deferred(ConditionExpr::Condition(name.to_string())))
            }
        }
    }

    /// Evaluate a boolean expression found in `owner`.
    pub fn evaluate_boolean(&mut self, owner: &str, expr: &Expr) -> SynthResult<Truth> {
        match expr {
            Expr::Bool(value) => Ok(Truth::Known(*value)),
            Expr::String(s) if s == "true" => Ok(Truth::Known(true)),
            Expr::String(s) if s == "false" => Ok(Truth::Known(false)),
            Expr::Intrinsic(intrinsic) => self.evaluate_boolean_intrinsic(owner, intrinsic),
            _ => Err(unsupported(
                owner,
                "Condition",
                "expected a boolean expression",
            )),
        }
    }

    pub(super) fn evaluate_boolean_intrinsic(
        &mut self,
        owner: &str,
        intrinsic: &Intrinsic,
    ) -> SynthResult<Truth> {
        match intrinsic {
            Intrinsic::Equals(left, right) => self.equals(owner, left, right),
            Intrinsic::And(operands) | Intrinsic::Or(operands) => {
                let all = matches!(intrinsic, Intrinsic::And(_));
                let mut truths = Vec::with_capacity(operands.len());
                for operand in operands {
                    let truth = self.evaluate_boolean(owner, operand)?;
                    // Later operands are not evaluated once the result is known.
                    if truth == Truth::Known(!all) {
                        return Ok(truth);
                    }
                    truths.push(truth);
                }
                Ok(combine(all, truths))
            }
            Intrinsic::Not(operand) => Ok(self.evaluate_boolean(owner, operand)?.negate()),
            Intrinsic::Condition(name) => self.evaluate_condition(name),
            Intrinsic::If {
                condition,
                when_true,
                when_false,
            } => match self.evaluate_condition(condition)? {
                Truth::Known(true) => self.evaluate_boolean(owner, when_true),
                Truth::Known(false) => self.evaluate_boolean(owner, when_false),
                deferred => {
                    let when_true = self.evaluate_boolean(owner, when_true)?;
                    let when_false = self.evaluate_boolean(owner, when_false)?;
                    Ok(combine(
                        false,
                        vec![
                            combine(true, vec![deferred.clone(), when_true]),
                            combine(true, vec![deferred.negate(), when_false]),
                        ],
                    ))
                }
            },
            other => Err(unsupported(
                owner,
                other.name(),
                "not valid in a boolean context",
            )),
        }
    }

    /// `Fn::Equals` compares the canonical text of both sides.
    fn equals(&mut self, owner: &str, left: &Expr, right: &Expr) -> SynthResult<Truth> {
        let left = self.resolve(owner, left)?;
        let right = self.resolve(owner, right)?;
        if left.is_concrete() && right.is_concrete() {
            return Ok(Truth::Known(match (left.scalar_text(), right.scalar_text()) {
                (Some(l), Some(r)) => l == r,
                _ => left == right,
            }));
        }

        let comparable = |value: &Value| value.scalar_text().is_some() || value.is_string_like();
        if comparable(&left) && comparable(&right) {
            Ok(Truth::Deferred(ConditionExpr::Equals(left, right)))
        } else {
            Err(unsupported(
                owner,
                "Fn::Equals",
                "deploy-time operands must be strings",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use cfn2cdk_core::PseudoParameter;
    use cfn2cdk_ir::Deferred;
    use cfn2cdk_template::{Template, parse_template};

    use super::*;
    use crate::resolve::ResolutionContext;

    const TEMPLATE: &str = r#"
Parameters:
  Environment:
    Type: String
    Default: dev
  DatabaseType:
    Type: String
    Default: postgresql
  Replicas:
    Type: Number
    Default: "1"
Conditions:
  IsProduction: !Equals [!Ref Environment, prod]
  HasDatabase: !Not [!Equals [!Ref DatabaseType, none]]
  UseEncryption: !And [!Condition IsProduction, !Condition HasDatabase]
  AnyOf: !Or [!Condition HasDatabase, !Equals [!ImportValue Shared, x]]
  AllOf: !And [!Condition IsProduction, !Equals [!ImportValue Shared, x]]
  Imported: !Equals [!ImportValue Shared, x]
  NumericEquals: !Equals ["1", !Ref Replicas]
  ViaIf: !If [IsProduction, !Condition HasDatabase, false]
  IsUsEast1: !Equals [!Ref AWS::Region, us-east-1]
  NotUsEast1: !Not [!Condition IsUsEast1]
  UsEast1Database: !And [!Condition HasDatabase, !Condition IsUsEast1]
  UsEast1Production: !And [!Condition IsProduction, !Condition IsUsEast1]
  EitherRegion: !Or
    - !Condition IsUsEast1
    - !Equals [!Ref AWS::Region, us-west-2]
  RegionalIf: !If [IsUsEast1, !Condition HasDatabase, false]
  ListEquals: !Equals [!GetAZs "", [a]]
  LoopA: !Condition LoopB
  LoopB: !Not [!Condition LoopC]
  LoopC: !Condition LoopA
Resources:
  Topic:
    Type: AWS::SNS::Topic
"#;

    fn template() -> Template {
        parse_template(TEMPLATE, "conditions.yaml").unwrap()
    }

    fn evaluate(ctx: &mut ResolutionContext, name: &str) -> SynthResult<Truth> {
        let template = template();
        Evaluator::new(&template, ctx).evaluate_condition(name)
    }

    fn known(ctx: &mut ResolutionContext, name: &str) -> bool {
        match evaluate(ctx, name).unwrap() {
            Truth::Known(value) => value,
            Truth::Deferred(expr) => panic!("{name} was deferred: {expr:?}"),
        }
    }

    fn region() -> Value {
        Value::deferred(Deferred::Pseudo(PseudoParameter::Region))
    }

    fn condition(name: &str) -> ConditionExpr {
        ConditionExpr::Condition(name.to_string())
    }

    #[test]
    fn test_combined_conditions() {
        let mut ctx = ResolutionContext::new();
        assert!(!known(&mut ctx, "IsProduction"));
        assert!(known(&mut ctx, "HasDatabase"));
        assert!(!known(&mut ctx, "UseEncryption"));

        let mut ctx = ResolutionContext::new().with_parameter("Environment", "prod");
        assert!(known(&mut ctx, "UseEncryption"));
        assert!(known(&mut ctx, "ViaIf"));
    }

    #[test]
    fn test_short_circuit() {
        let mut ctx = ResolutionContext::new();
        assert!(known(&mut ctx, "AnyOf"));
        assert!(!known(&mut ctx, "AllOf"));
    }

    #[test]
    fn test_deploy_time_equals_is_deferred() {
        let mut ctx = ResolutionContext::new();
        assert_eq!(
            evaluate(&mut ctx, "IsUsEast1").unwrap(),
            Truth::Deferred(condition("IsUsEast1"))
        );
        assert_eq!(ctx.condition_state("IsUsEast1"), ConditionState::Deferred);
        assert_eq!(
            ctx.deferred_conditions().collect::<Vec<_>>(),
            vec![(
                "IsUsEast1",
                &ConditionExpr::Equals(region(), Value::String("us-east-1".into()))
            )]
        );

        let mut ctx = ResolutionContext::new();
        assert!(matches!(
            evaluate(&mut ctx, "Imported").unwrap(),
            Truth::Deferred(ConditionExpr::Condition(name)) if name == "Imported"
        ));
    }

    #[test]
    fn test_supplied_region_folds_statically() {
        let mut ctx = ResolutionContext::new().with_region("us-east-1");
        assert!(known(&mut ctx, "IsUsEast1"));
        assert!(!known(&mut ctx, "NotUsEast1"));
        assert!(known(&mut ctx, "EitherRegion"));
        assert_eq!(ctx.deferred_conditions().count(), 0);
    }

    #[test]
    fn test_known_operands_fold_away() {
        let mut ctx = ResolutionContext::new();
        // HasDatabase is true, so only the region check is left.
        known(&mut ctx, "HasDatabase");
        evaluate(&mut ctx, "UsEast1Database").unwrap();
        // IsProduction is false, which decides the conjunction.
        assert!(!known(&mut ctx, "UsEast1Production"));
        evaluate(&mut ctx, "NotUsEast1").unwrap();
        evaluate(&mut ctx, "EitherRegion").unwrap();
        evaluate(&mut ctx, "RegionalIf").unwrap();

        let expressions: Vec<_> = ctx.deferred_conditions().collect();
        assert_eq!(
            expressions,
            vec![
                (
                    "IsUsEast1",
                    &ConditionExpr::Equals(region(), Value::String("us-east-1".into()))
                ),
                ("UsEast1Database", &condition("IsUsEast1")),
                (
                    "NotUsEast1",
                    &ConditionExpr::Not(Box::new(condition("IsUsEast1")))
                ),
                (
                    "EitherRegion",
                    &ConditionExpr::Or(vec![
                        condition("IsUsEast1"),
                        ConditionExpr::Equals(region(), Value::String("us-west-2".into())),
                    ])
                ),
                ("RegionalIf", &condition("IsUsEast1")),
            ]
        );
    }

    #[test]
    fn test_deploy_time_list_equals_is_unsupported() {
        let err = evaluate(&mut ResolutionContext::new(), "ListEquals").unwrap_err();
        assert!(matches!(
            err,
            SynthError::UnsupportedIntrinsic { logical_id, function, .. }
                if logical_id == "ListEquals" && function == "Fn::Equals"
        ));
    }

    #[test]
    fn test_equals_compares_canonical_text() {
        assert!(known(&mut ResolutionContext::new(), "NumericEquals"));
    }

    #[test]
    fn test_memoized() {
        let mut ctx = ResolutionContext::new();
        assert_eq!(ctx.condition_state("UseEncryption"), ConditionState::Unevaluated);
        known(&mut ctx, "UseEncryption");

        assert_eq!(ctx.condition_state("UseEncryption"), ConditionState::Resolved(false));
        assert_eq!(ctx.condition_state("IsProduction"), ConditionState::Resolved(false));
        assert!(!known(&mut ctx, "UseEncryption"));
    }

    #[test]
    fn test_cycle() {
        let mut ctx = ResolutionContext::new();
        let err = evaluate(&mut ctx, "LoopA").unwrap_err();
        assert_eq!(
            err,
            SynthError::CyclicCondition {
                condition: "LoopA".into(),
                cycle: vec![
                    "LoopA".into(),
                    "LoopB".into(),
                    "LoopC".into(),
                    "LoopA".into()
                ],
            }
        );
        assert_eq!(ctx.condition_state("LoopB"), ConditionState::Unevaluated);
    }
}
