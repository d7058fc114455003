//! Order phase - prunes conditional resources and fixes instantiation order.

use eyre::Result;

use crate::{
    graph::DependencyGraph,
    pipeline::{CompilationContext, Diagnostic, Phase},
    resolve::Evaluator,
};

/// Phase that drops resources whose condition is false and sorts the rest.
pub struct OrderPhase;

impl Phase for OrderPhase {
    fn name(&self) -> &'static str {
        "order"
    }

    fn description(&self) -> &'static str {
        "Drop disabled resources and order the rest by dependency"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        let mut evaluator = Evaluator::new(&ctx.template, &mut ctx.resolution);
        let mut included = Vec::with_capacity(ctx.template.resources.len());
        let mut skipped = Vec::new();

        for resource in ctx.template.resources.values() {
            match resource.condition.as_deref() {
                Some(condition) if !evaluator.evaluate_condition(condition)?.is_possible() => {
                    skipped.push(
                        Diagnostic::info(
                            self.name(),
                            format!(
                                "resource '{}' skipped: condition '{condition}' is false",
                                resource.logical_id
                            ),
                        )
                        .at(format!("Resources.{}", resource.logical_id)),
                    );
                }
                _ => included.push(resource),
            }
        }

        let order = DependencyGraph::from_resources(included).order()?;
        log::debug!("instantiation order: {}", order.join(", "));

        ctx.diagnostics.extend(skipped);
        ctx.order = Some(order);
        Ok(())
    }
}
