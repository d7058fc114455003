//! Lower phase - evaluates resources and outputs into the stack IR.

use std::collections::{BTreeSet, HashSet};

use cfn2cdk_ir::{
    ConstructIr, Deferred, DeployCondition, MappingTable, ObjectKind, OutputIr,
    ResolvedCondition, StackIr, StackMeta, Value,
};
use cfn2cdk_template::{Output, Resource, Template};
use eyre::{OptionExt, Result};

use crate::{
    SynthError, SynthResult,
    pipeline::{CompilationContext, Diagnostic, Phase},
    resolve::{Evaluator, Truth, mapping_value},
};

/// Properties whose values are free-form JSON documents rather than typed
/// property structs. Their keys are emitted verbatim.
const FREE_FORM_PROPERTIES: &[&str] = &[
    "AccessPolicies",
    "AssumeRolePolicyDocument",
    "Definition",
    "DefinitionSubstitutions",
    "EventPattern",
    "KeyPolicy",
    "Metadata",
    "PolicyDocument",
    "RedriveAllowPolicy",
    "RedrivePolicy",
    "Variables",
];

fn is_free_form(key: &str) -> bool {
    FREE_FORM_PROPERTIES.contains(&key)
}

/// Tag objects as property structs or free-form JSON, recursively.
fn shape(value: Value, json: bool) -> Value {
    match value {
        Value::Object { entries, .. } => Value::Object {
            kind: if json {
                ObjectKind::Json
            } else {
                ObjectKind::Struct
            },
            entries: entries
                .into_iter()
                .map(|(key, value)| {
                    let value = shape_entry(&key, value, json);
                    (key, value)
                })
                .collect(),
        },
        Value::List(items) => Value::List(items.into_iter().map(|v| shape(v, json)).collect()),
        other => other,
    }
}

/// Shape the value of the property `key` inside an object that is JSON when `json` is set.
fn shape_entry(key: &str, value: Value, json: bool) -> Value {
    let json = json || is_free_form(key);
    match value {
        Value::List(items) if !json && key == "Tags" && items.iter().all(is_tag) => {
            Value::List(items.into_iter().map(tag).collect())
        }
        value => shape(value, json),
    }
}

/// A `{Key, Value}` object and nothing else.
fn is_tag(value: &Value) -> bool {
    matches!(
        value,
        Value::Object { entries, .. }
            if entries.len() == 2 && entries.contains_key("Key") && entries.contains_key("Value")
    )
}

fn tag(value: Value) -> Value {
    match value {
        Value::Object { entries, .. } => Value::Object {
            kind: ObjectKind::Tag,
            entries: entries
                .into_iter()
                .map(|(key, value)| (key, shape(value, false)))
                .collect(),
        },
        other => other,
    }
}

/// Phase that turns the ordered, pruned resources into a [`StackIr`].
pub struct LowerPhase;

impl Phase for LowerPhase {
    fn name(&self) -> &'static str {
        "lower"
    }

    fn description(&self) -> &'static str {
        "Evaluate resources and outputs into the stack IR"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        let order = ctx
            .order
            .clone()
            .ok_or_eyre("instantiation order not set - did OrderPhase run?")?;

        let mut evaluator = Evaluator::new(&ctx.template, &mut ctx.resolution);
        let mut constructs = Vec::with_capacity(order.len());
        for logical_id in &order {
            let resource = ctx
                .template
                .resource(logical_id)
                .ok_or_eyre("ordered resource missing from template")?;
            constructs.push(lower_construct(&mut evaluator, resource, &order)?);
        }

        let mut outputs = Vec::with_capacity(ctx.template.outputs.len());
        let mut skipped = Vec::new();
        for output in ctx.template.outputs.values() {
            match lower_output(&mut evaluator, output)? {
                Some(lowered) => outputs.push(lowered),
                None => skipped.push(
                    Diagnostic::info(
                        self.name(),
                        format!("output '{}' skipped: its condition is false", output.logical_id),
                    )
                    .at(format!("Outputs.{}", output.logical_id)),
                ),
            }
        }

        mark_referenced(&mut constructs, &outputs);

        let services: BTreeSet<String> = constructs
            .iter()
            .filter_map(|c| c.resource_type.service())
            .map(str::to_string)
            .collect();

        let ir = StackIr {
            meta: StackMeta {
                name: ctx.settings.name.clone(),
                description: ctx.template.description.clone(),
                kind: ctx.settings.kind,
            },
            services: services.into_iter().collect(),
            mappings: lower_mappings(&ctx.template, ctx.resolution.deferred_mappings()),
            conditions: ctx
                .template
                .conditions
                .keys()
                .filter_map(|name| {
                    ctx.resolution
                        .condition_value(name)
                        .map(|value| ResolvedCondition {
                            logical_id: name.clone(),
                            value,
                        })
                })
                .collect(),
            deploy_conditions: ctx
                .resolution
                .deferred_conditions()
                .map(|(name, expression)| DeployCondition {
                    logical_id: name.to_string(),
                    expression: expression.clone(),
                })
                .collect(),
            constructs,
            outputs,
        };

        log::debug!(
            "lowered {} construct(s), {} output(s), {} deploy-time condition(s)",
            ir.constructs.len(),
            ir.outputs.len(),
            ir.deploy_conditions.len()
        );
        ctx.diagnostics.extend(skipped);
        ctx.ir = Some(ir);
        Ok(())
    }
}

fn lower_construct(
    evaluator: &mut Evaluator<'_>,
    resource: &Resource,
    created: &[String],
) -> SynthResult<ConstructIr> {
    let id = &resource.logical_id;
    let custom = resource.resource_type.is_custom();

    let properties = evaluator
        .resolve_entries(id, &resource.properties)?
        .into_iter()
        .map(|(key, value)| {
            let value = shape_entry(&key, value, custom);
            (key, value)
        })
        .collect();

    for dependency in &resource.depends_on {
        if !created.contains(dependency) {
            return Err(SynthError::UnresolvedReference {
                logical_id: id.clone(),
                target: dependency.clone(),
                reason: "the DependsOn target is not created because its condition is false"
                    .to_string(),
            });
        }
    }

    let condition = deploy_time_condition(evaluator, resource.condition.as_deref())?;

    let metadata = match &resource.metadata {
        Some(expr) => match evaluator.resolve(id, expr)? {
            Value::Null => None,
            value => Some(shape(value, true)),
        },
        None => None,
    };

    log::trace!("lowered resource {id} ({})", resource.resource_type);
    Ok(ConstructIr {
        logical_id: id.clone(),
        resource_type: resource.resource_type.clone(),
        properties,
        depends_on: resource.depends_on.clone(),
        deletion_policy: resource.deletion_policy,
        update_replace_policy: resource.update_replace_policy,
        metadata,
        condition,
        referenced: false,
    })
}

/// The condition's name when CloudFormation decides it at deploy time.
fn deploy_time_condition(
    evaluator: &mut Evaluator<'_>,
    condition: Option<&str>,
) -> SynthResult<Option<String>> {
    match condition {
        Some(name) => Ok(match evaluator.evaluate_condition(name)? {
            Truth::Deferred(_) => Some(name.to_string()),
            Truth::Known(_) => None,
        }),
        None => Ok(None),
    }
}

/// `None` when the output's condition is false.
fn lower_output(evaluator: &mut Evaluator<'_>, output: &Output) -> SynthResult<Option<OutputIr>> {
    let id = &output.logical_id;
    if let Some(condition) = &output.condition
        && !evaluator.evaluate_condition(condition)?.is_possible()
    {
        return Ok(None);
    }
    let condition = deploy_time_condition(evaluator, output.condition.as_deref())?;

    let export_name = match &output.export_name {
        Some(expr) => Some(evaluator.resolve(id, expr)?),
        None => None,
    };

    Ok(Some(OutputIr {
        logical_id: id.clone(),
        value: output_string(evaluator.resolve(id, &output.value)?),
        description: output.description.clone(),
        export_name,
        condition,
    }))
}

/// Output values are strings; lists are joined with commas.
fn output_string(value: Value) -> Value {
    match value {
        Value::Number(_) | Value::Double(_) | Value::Bool(_) => {
            Value::String(value.scalar_text().unwrap_or_default())
        }
        Value::List(items) if items.iter().all(Value::is_concrete) => Value::String(
            items
                .iter()
                .filter_map(Value::scalar_text)
                .collect::<Vec<_>>()
                .join(","),
        ),
        value if value.is_list_like() => Value::deferred(Deferred::Join {
            delimiter: ",".to_string(),
            items: value,
        }),
        value => shape(value, false),
    }
}

fn mark_referenced(constructs: &mut [ConstructIr], outputs: &[OutputIr]) {
    let referenced: HashSet<String> = {
        let construct_values = constructs
            .iter()
            .flat_map(|c| c.properties.values().chain(c.metadata.iter()));
        let output_values = outputs
            .iter()
            .flat_map(|o| std::iter::once(&o.value).chain(o.export_name.iter()));

        let dependencies = constructs
            .iter()
            .flat_map(|c| c.depends_on.iter().map(String::as_str));

        construct_values
            .chain(output_values)
            .flat_map(Value::referenced_resources)
            .chain(dependencies)
            .map(str::to_string)
            .collect()
    };

    for construct in constructs {
        construct.referenced = referenced.contains(&construct.logical_id);
    }
}

fn lower_mappings<'a>(
    template: &Template,
    names: impl Iterator<Item = &'a str>,
) -> Vec<MappingTable> {
    names
        .filter_map(|name| template.mapping(name))
        .map(|mapping| MappingTable {
            logical_id: mapping.logical_id.clone(),
            entries: mapping
                .entries
                .iter()
                .map(|(top, row)| {
                    let row = row
                        .iter()
                        .map(|(key, value)| (key.clone(), mapping_value(value)))
                        .collect();
                    (top.clone(), row)
                })
                .collect(),
        })
        .collect()
}
