//! Shared emit driver.
//!
//! [`emit_stack`] decides what is emitted and in which order; the
//! [`LanguageEmitter`] decides how each statement reads. The constructor
//! body is laid out as:
//!
//! 1. `CfnMapping` tables for lookups that stay deploy-time
//! 2. comments recording the resolved conditions
//! 3. one `CfnCondition` per condition decided at deploy time
//! 4. one block per construct, in dependency order, followed by its
//!    `addDependency` calls and `cfnOptions` assignments
//! 5. one `CfnOutput` per output

use std::collections::{HashMap, HashSet};

use cfn2cdk_core::StackKind;
use cfn2cdk_ir::{Deferred, MappingTable, ObjectKind, StackIr, Value};

use crate::{
    builder::CodeBuilder,
    language::{CfnOption, LanguageEmitter, NamingConvention},
};

/// Names visible inside the generated class.
#[derive(Debug)]
pub struct Scope<'a> {
    ir: &'a StackIr,
    variables: HashMap<String, String>,
    mappings: HashMap<String, String>,
    conditions: HashMap<String, String>,
    used_conditions: HashSet<String>,
    bind_unreferenced: bool,
}

impl<'a> Scope<'a> {
    /// Assign a unique local variable to every construct, mapping table and
    /// deploy-time condition.
    ///
    /// `taken` holds identifiers the generated file already uses, such as
    /// imported module aliases.
    pub fn new(
        ir: &'a StackIr,
        naming: &NamingConvention,
        taken: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut taken: HashSet<String> = taken.into_iter().collect();

        let variables = ir
            .constructs
            .iter()
            .map(|c| {
                let name = unique(&mut taken, naming.variable(&c.logical_id));
                (c.logical_id.clone(), name)
            })
            .collect();

        let mappings = ir
            .mappings
            .iter()
            .map(|m| {
                let mut base = naming.variable(&m.logical_id);
                if taken.contains(&base) {
                    base = naming.variable(&format!("{}Mapping", m.logical_id));
                }
                (m.logical_id.clone(), unique(&mut taken, base))
            })
            .collect();

        let conditions = ir
            .deploy_conditions
            .iter()
            .map(|c| {
                let mut base = naming.variable(&c.logical_id);
                if taken.contains(&base) {
                    base = naming.variable(&format!("{}Condition", c.logical_id));
                }
                (c.logical_id.clone(), unique(&mut taken, base))
            })
            .collect();

        Self {
            ir,
            variables,
            mappings,
            conditions,
            used_conditions: used_conditions(ir),
            bind_unreferenced: true,
        }
    }

    /// Scope for one emitter: its naming, its module aliases and its binding rule.
    pub fn for_emitter<E: LanguageEmitter + ?Sized>(emitter: &E, ir: &'a StackIr) -> Self {
        let modules = ir.services.iter().map(|s| emitter.service_module(s));
        let mut scope = Self::new(ir, emitter.naming(), modules);
        scope.bind_unreferenced = emitter.binds_unreferenced();
        scope
    }

    pub fn ir(&self) -> &'a StackIr {
        self.ir
    }

    pub fn kind(&self) -> StackKind {
        self.ir.meta.kind
    }

    /// Class name of the generated stack or construct.
    pub fn class_name(&self) -> &'a str {
        &self.ir.meta.name
    }

    /// Local variable bound to a construct.
    pub fn variable<'s>(&'s self, logical_id: &'s str) -> &'s str {
        self.variables
            .get(logical_id)
            .map(String::as_str)
            .unwrap_or(logical_id)
    }

    /// Local variable bound to a `CfnMapping`.
    pub fn mapping_variable<'s>(&'s self, logical_id: &'s str) -> &'s str {
        self.mappings
            .get(logical_id)
            .map(String::as_str)
            .unwrap_or(logical_id)
    }

    /// Local variable bound to a `CfnCondition`.
    pub fn condition_variable<'s>(&'s self, logical_id: &'s str) -> &'s str {
        self.conditions
            .get(logical_id)
            .map(String::as_str)
            .unwrap_or(logical_id)
    }

    /// The variable a `CfnCondition` is bound to, if it is bound at all.
    pub fn condition_binding(&self, logical_id: &str) -> Option<&str> {
        if self.bind_unreferenced || self.used_conditions.contains(logical_id) {
            self.conditions.get(logical_id).map(String::as_str)
        } else {
            None
        }
    }

    /// The variable a construct is bound to, if it is bound at all.
    pub fn binding(&self, logical_id: &str) -> Option<&str> {
        let construct = self.ir.construct(logical_id)?;
        if self.bind_unreferenced || construct.needs_binding() {
            self.variables.get(logical_id).map(String::as_str)
        } else {
            None
        }
    }

    /// Whether `text` mentions a module alias such as `cdk.` or `Fn.`.
    pub fn uses(body: &str, prefix: &str) -> bool {
        body.match_indices(prefix).any(|(i, _)| {
            body[..i]
                .chars()
                .next_back()
                .is_none_or(|c| !(c.is_alphanumeric() || c == '_' || c == '.'))
        })
    }
}

/// Deploy-time conditions some statement of the stack refers to.
fn used_conditions(ir: &StackIr) -> HashSet<String> {
    let mut used: HashSet<String> = HashSet::new();
    let values = ir
        .constructs
        .iter()
        .flat_map(|c| c.properties.values().chain(c.metadata.iter()))
        .chain(
            ir.outputs
                .iter()
                .flat_map(|o| std::iter::once(&o.value).chain(o.export_name.iter())),
        );
    for value in values {
        value.visit_deferred(&mut |d| {
            if let Deferred::If { condition, .. } = d {
                used.insert(condition.clone());
            }
        });
    }

    let gates = ir
        .constructs
        .iter()
        .filter_map(|c| c.condition.as_deref())
        .chain(ir.outputs.iter().filter_map(|o| o.condition.as_deref()));
    let nested = ir
        .deploy_conditions
        .iter()
        .flat_map(|c| c.expression.referenced_conditions());
    used.extend(gates.chain(nested).map(str::to_string));
    used
}

fn unique(taken: &mut HashSet<String>, base: String) -> String {
    if taken.insert(base.clone()) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}{n}");
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

/// Render a whole stack IR as one source file.
///
/// Emitting the same IR twice yields byte-identical output.
pub fn emit_stack<E: LanguageEmitter + ?Sized>(emitter: &E, ir: &StackIr) -> String {
    let scope = Scope::for_emitter(emitter, ir);
    let mut blocks: Vec<Vec<String>> = Vec::new();

    for table in &ir.mappings {
        let variable = scope.mapping_variable(&table.logical_id);
        blocks.push(vec![emitter.render_mapping(&scope, variable, table)]);
    }

    if !ir.conditions.is_empty() {
        blocks.push(
            ir.conditions
                .iter()
                .map(|c| {
                    emitter.render_comment(&format!(
                        "Condition {} resolved to {}",
                        c.logical_id, c.value
                    ))
                })
                .collect(),
        );
    }

    for condition in &ir.deploy_conditions {
        let binding = scope.condition_binding(&condition.logical_id);
        blocks.push(vec![emitter.render_condition(&scope, condition, binding)]);
    }

    for construct in &ir.constructs {
        let binding = scope.binding(&construct.logical_id);
        let mut block = vec![emitter.render_constructor_call(&scope, construct, binding)];

        if let Some(target) = binding {
            for dependency in &construct.depends_on {
                block.push(emitter.render_add_dependency(target, scope.variable(dependency)));
            }
            if let Some(condition) = &construct.condition {
                block.push(emitter.render_cfn_option(
                    target,
                    CfnOption::Condition,
                    scope.condition_variable(condition),
                ));
            }
            if let Some(policy) = construct.deletion_policy {
                block.push(emitter.render_cfn_option(
                    target,
                    CfnOption::DeletionPolicy,
                    &emitter.render_deletion_policy(policy),
                ));
            }
            if let Some(policy) = construct.update_replace_policy {
                block.push(emitter.render_cfn_option(
                    target,
                    CfnOption::UpdateReplacePolicy,
                    &emitter.render_deletion_policy(policy),
                ));
            }
            if let Some(metadata) = &construct.metadata {
                block.push(emitter.render_cfn_option(
                    target,
                    CfnOption::Metadata,
                    &emitter.render_value(&scope, metadata, 0),
                ));
            }
        }
        blocks.push(block);
    }

    for output in &ir.outputs {
        blocks.push(vec![emitter.render_output(&scope, output)]);
    }

    let mut body = CodeBuilder::new(emitter.indent());
    for _ in 0..emitter.body_indent() {
        body.push_indent();
    }
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            body.push_blank();
        }
        for statement in block {
            body.push_multiline("", statement, "");
        }
    }

    log::debug!(
        "emitted {} statement block(s) for {} ({})",
        blocks.len(),
        ir.meta.name,
        emitter.language()
    );
    emitter.render_file(&scope, &body.build())
}

/// A mapping table as a two-level JSON object.
pub fn mapping_object(table: &MappingTable) -> Value {
    Value::Object {
        kind: ObjectKind::Json,
        entries: table
            .entries
            .iter()
            .map(|(top, row)| {
                let row = Value::Object {
                    kind: ObjectKind::Json,
                    entries: row.clone(),
                };
                (top.clone(), row)
            })
            .collect(),
    }
}

/// Numeric strings become numbers; anything else is unchanged.
pub fn coerce_number(value: &Value) -> Value {
    match value {
        Value::String(s) => {
            if let Ok(n) = s.trim().parse::<i64>() {
                Value::Number(n)
            } else if let Ok(d) = s.trim().parse::<f64>() {
                Value::Double(d)
            } else {
                value.clone()
            }
        }
        other => other.clone(),
    }
}

/// Numbers and booleans become their canonical text; anything else is unchanged.
pub fn coerce_string(value: &Value) -> Value {
    match value {
        Value::Number(_) | Value::Double(_) | Value::Bool(_) => {
            Value::String(value.scalar_text().unwrap_or_default())
        }
        other => other.clone(),
    }
}

/// Escape a string for a C-style quoted literal using `quote` as delimiter.
pub fn escape(s: &str, quote: char) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
