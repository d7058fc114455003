//! Per-run resolution state.

use std::collections::{BTreeMap, HashMap};

use cfn2cdk_core::PseudoParameter;
use cfn2cdk_ir::{ConditionExpr, Value};
use indexmap::{IndexMap, IndexSet};

use super::{ConditionState, Truth};

/// Parameter overrides, pseudo parameter values and memo caches for one
/// synthesis run.
///
/// A context is created fresh per run and must not be shared between
/// concurrent runs.
#[derive(Debug, Clone, Default)]
pub struct ResolutionContext {
    overrides: IndexMap<String, String>,
    pseudo: BTreeMap<PseudoParameter, String>,
    pub(super) conditions: HashMap<String, ConditionState>,
    pub(super) evaluating: Vec<String>,
    deferred_conditions: IndexMap<String, ConditionExpr>,
    pub(super) parameter_values: HashMap<String, Value>,
    pub(super) lookups: HashMap<(String, String, String), Value>,
    pub(super) deferred_mappings: IndexSet<String>,
}

impl ResolutionContext {
    /// Create an empty context: no overrides, every pseudo parameter deferred.
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply a parameter value, overriding the declared default.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert(name.into(), value.into());
        self
    }

    /// Supply a pseudo parameter value.
    pub fn with_pseudo(mut self, pseudo: PseudoParameter, value: impl Into<String>) -> Self {
        self.pseudo.insert(pseudo, value.into());
        self
    }

    /// Supply `AWS::Region`.
    pub fn with_region(self, region: impl Into<String>) -> Self {
        self.with_pseudo(PseudoParameter::Region, region)
    }

    /// Supply `AWS::AccountId`.
    pub fn with_account(self, account: impl Into<String>) -> Self {
        self.with_pseudo(PseudoParameter::AccountId, account)
    }

    /// Parameter override supplied by the caller.
    pub fn parameter_override(&self, name: &str) -> Option<&str> {
        self.overrides.get(name).map(String::as_str)
    }

    /// Names of all overridden parameters.
    pub fn overridden_parameters(&self) -> impl Iterator<Item = &str> {
        self.overrides.keys().map(String::as_str)
    }

    /// Pseudo parameter value supplied by the caller.
    pub fn pseudo_value(&self, pseudo: PseudoParameter) -> Option<&str> {
        self.pseudo.get(&pseudo).map(String::as_str)
    }

    /// Evaluation state of a condition.
    pub fn condition_state(&self, name: &str) -> ConditionState {
        self.conditions
            .get(name)
            .copied()
            .unwrap_or(ConditionState::Unevaluated)
    }

    /// Resolved value of a condition, if it has been evaluated and is known.
    pub fn condition_value(&self, name: &str) -> Option<bool> {
        match self.condition_state(name) {
            ConditionState::Resolved(value) => Some(value),
            _ => None,
        }
    }

    /// Deploy-time conditions and their expressions, each after the
    /// conditions it refers to.
    pub fn deferred_conditions(&self) -> impl Iterator<Item = (&str, &ConditionExpr)> {
        self.deferred_conditions
            .iter()
            .map(|(name, expr)| (name.as_str(), expr))
    }

    /// Mappings that a deploy-time `Fn::FindInMap` still needs, in first-use order.
    pub fn deferred_mappings(&self) -> impl Iterator<Item = &str> {
        self.deferred_mappings.iter().map(String::as_str)
    }

    pub(super) fn begin_condition(&mut self, name: &str) {
        self.conditions
            .insert(name.to_string(), ConditionState::Evaluating);
        self.evaluating.push(name.to_string());
    }

    /// Record the outcome of a condition; `None` means evaluation failed.
    pub(super) fn finish_condition(&mut self, name: &str, outcome: Option<Truth>) {
        self.evaluating.pop();
        match outcome {
            Some(Truth::Known(value)) => {
                self.conditions
                    .insert(name.to_string(), ConditionState::Resolved(value));
            }
            Some(Truth::Deferred(expr)) => {
                self.conditions
                    .insert(name.to_string(), ConditionState::Deferred);
                self.deferred_conditions.insert(name.to_string(), expr);
            }
            None => {
                self.conditions.remove(name);
            }
        }
    }

    /// Conditions on the evaluation stack from `name` onwards, closed with `name`.
    pub(super) fn condition_cycle(&self, name: &str) -> Vec<String> {
        let start = self
            .evaluating
            .iter()
            .position(|n| n == name)
            .unwrap_or_default();
        let mut cycle = self.evaluating[start..].to_vec();
        cycle.push(name.to_string());
        cycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let ctx = ResolutionContext::new()
            .with_parameter("Environment", "prod")
            .with_region("us-east-1")
            .with_account("123456789012");

        assert_eq!(ctx.parameter_override("Environment"), Some("prod"));
        assert_eq!(ctx.parameter_override("Other"), None);
        assert_eq!(ctx.pseudo_value(PseudoParameter::Region), Some("us-east-1"));
        assert_eq!(
            ctx.pseudo_value(PseudoParameter::AccountId),
            Some("123456789012")
        );
        assert_eq!(ctx.pseudo_value(PseudoParameter::Partition), None);
    }

    #[test]
    fn test_condition_states() {
        let mut ctx = ResolutionContext::new();
        assert_eq!(ctx.condition_state("A"), ConditionState::Unevaluated);

        ctx.begin_condition("A");
        ctx.begin_condition("B");
        assert_eq!(ctx.condition_state("B"), ConditionState::Evaluating);
        assert_eq!(ctx.condition_cycle("A"), vec!["A", "B", "A"]);

        ctx.finish_condition("B", Some(Truth::Known(true)));
        ctx.finish_condition("A", None);
        assert_eq!(ctx.condition_value("B"), Some(true));
        assert_eq!(ctx.condition_state("A"), ConditionState::Unevaluated);

        ctx.begin_condition("C");
        ctx.finish_condition(
            "C",
            Some(Truth::Deferred(ConditionExpr::Condition("Other".into()))),
        );
        assert_eq!(ctx.condition_state("C"), ConditionState::Deferred);
        assert_eq!(ctx.condition_value("C"), None);
        assert_eq!(ctx.deferred_conditions().count(), 1);
    }
}
