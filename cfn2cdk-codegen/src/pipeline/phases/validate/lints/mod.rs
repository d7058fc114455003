//! Built-in lints.

mod unused_condition;
mod unused_mapping;
mod unused_parameter;

use cfn2cdk_template::{Reference, Template};
pub use unused_condition::UnusedConditionLint;
pub use unused_mapping::UnusedMappingLint;
pub use unused_parameter::UnusedParameterLint;

/// Visit every reference in the template's conditions, resources and outputs.
fn for_each_reference<'a>(template: &'a Template, mut f: impl FnMut(Reference<'a>)) {
    let conditions = template.conditions.values().map(|c| &c.expr);
    let resources = template.resources.values().flat_map(|r| r.expressions());
    let outputs = template.outputs.values().flat_map(|o| o.expressions());

    for expr in conditions.chain(resources).chain(outputs) {
        expr.visit_references(&mut f);
    }
}
