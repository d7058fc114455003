//! TypeScript rendering of the stack IR.

use cfn2cdk_codegen::{
    builder::{CodeBuilder, Indent},
    emit::{Scope, coerce_number, coerce_string, escape, mapping_object},
    language::{CfnOption, ConditionFunction, LanguageEmitter, NamingConvention},
};
use cfn2cdk_core::{DeletionPolicy, PseudoParameter, StackKind, TargetLanguage, to_pascal_case};
use cfn2cdk_ir::{
    ConstructIr, Deferred, DeployCondition, MappingTable, ObjectKind, OutputIr, Value,
};
use indexmap::IndexMap;

use crate::TS_NAMING;

/// Emits `aws-cdk-lib` TypeScript.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptEmitter;

fn quote(s: &str) -> String {
    escape(s, '\'')
}

/// Object keys that are not plain identifiers are quoted.
fn key(name: &str) -> String {
    let mut chars = name.chars();
    let identifier = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if identifier {
        name.to_string()
    } else {
        quote(name)
    }
}

impl TypeScriptEmitter {
    fn props(&self, entries: &[String]) -> String {
        self.wrap("{", entries, "}", 0, false)
    }
}

impl LanguageEmitter for TypeScriptEmitter {
    fn language(&self) -> TargetLanguage {
        TargetLanguage::TypeScript
    }

    fn naming(&self) -> &'static NamingConvention {
        &TS_NAMING
    }

    fn indent(&self) -> Indent {
        Indent::TYPESCRIPT
    }

    fn body_indent(&self) -> usize {
        2
    }

    fn render_comment(&self, text: &str) -> String {
        format!("// {text}")
    }

    fn render_literal(&self, value: &Value) -> String {
        match value {
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Double(d) => d.to_string(),
            Value::String(s) => quote(s),
            _ => "undefined".to_string(),
        }
    }

    fn render_list(&self, scope: &Scope<'_>, items: &[Value], depth: usize) -> String {
        let items: Vec<String> = items
            .iter()
            .map(|item| self.render_value(scope, item, depth + 1))
            .collect();
        self.wrap("[", &items, "]", depth, true)
    }

    fn render_object(
        &self,
        scope: &Scope<'_>,
        kind: ObjectKind,
        entries: &IndexMap<String, Value>,
        depth: usize,
    ) -> String {
        let entries: Vec<String> = entries
            .iter()
            .map(|(name, value)| {
                format!(
                    "{}: {}",
                    key(&self.object_key(kind, name)),
                    self.render_value(scope, value, depth + 1)
                )
            })
            .collect();
        self.wrap("{", &entries, "}", depth, false)
    }

    fn render_identifier_ref(&self, scope: &Scope<'_>, logical_id: &str) -> String {
        format!("{}.ref", scope.variable(logical_id))
    }

    fn render_attribute(
        &self,
        scope: &Scope<'_>,
        logical_id: &str,
        attribute: &str,
        custom: bool,
    ) -> String {
        let target = scope.variable(logical_id);
        if custom {
            format!("{target}.getAtt({}).toString()", quote(attribute))
        } else {
            format!("{target}.attr{}", to_pascal_case(attribute))
        }
    }

    fn render_pseudo(&self, _scope: &Scope<'_>, pseudo: PseudoParameter) -> String {
        format!("cdk.Stack.of(this).{}", pseudo.stack_property())
    }

    fn render_call(&self, scope: &Scope<'_>, deferred: &Deferred, depth: usize) -> String {
        let value = |v: &Value| self.render_value(scope, v, depth);
        match deferred {
            Deferred::Select { index, list } => {
                format!("cdk.Fn.select({index}, {})", value(list))
            }
            Deferred::Split { delimiter, source } => {
                format!("cdk.Fn.split({}, {})", quote(delimiter), value(source))
            }
            Deferred::Join { delimiter, items } => {
                format!("cdk.Fn.join({}, {})", quote(delimiter), value(items))
            }
            Deferred::FindInMap {
                mapping,
                top_key,
                second_key,
            } => format!(
                "{}.findInMap({}, {})",
                scope.mapping_variable(mapping),
                value(top_key),
                value(second_key)
            ),
            Deferred::ImportValue(name) => format!("cdk.Fn.importValue({})", value(name)),
            Deferred::Base64(data) => format!("cdk.Fn.base64({})", value(data)),
            Deferred::GetAzs(region) => format!("cdk.Fn.getAzs({})", value(region)),
            Deferred::Cidr {
                ip_block,
                count,
                cidr_bits,
            } => format!(
                "cdk.Fn.cidr({}, {}, {})",
                value(ip_block),
                value(&coerce_number(count)),
                value(&coerce_string(cidr_bits))
            ),
            other => self.render_deferred(scope, other, depth),
        }
    }

    fn render_mapping(&self, scope: &Scope<'_>, variable: &str, table: &MappingTable) -> String {
        let mapping = self.render_value(scope, &mapping_object(table), 1);
        format!(
            "const {variable} = new cdk.CfnMapping(this, {}, {});",
            quote(&table.logical_id),
            self.props(&[format!("mapping: {mapping}")])
        )
    }

    fn render_condition(
        &self,
        scope: &Scope<'_>,
        condition: &DeployCondition,
        binding: Option<&str>,
    ) -> String {
        let expression = self.render_condition_expr(scope, &condition.expression, 1);
        let call = format!(
            "new cdk.CfnCondition(this, {}, {})",
            quote(&condition.logical_id),
            self.props(&[format!("expression: {expression}")])
        );
        match binding {
            Some(variable) => format!("const {variable} = {call};"),
            None => format!("{call};"),
        }
    }

    fn render_condition_function(&self, function: ConditionFunction, args: &[String]) -> String {
        let name = match function {
            ConditionFunction::Equals => "conditionEquals",
            ConditionFunction::And => "conditionAnd",
            ConditionFunction::Or => "conditionOr",
            ConditionFunction::Not => "conditionNot",
        };
        format!("cdk.Fn.{name}({})", args.join(", "))
    }

    fn render_condition_if(
        &self,
        condition: &str,
        when_true: &str,
        when_false: &str,
        string: bool,
    ) -> String {
        let call = format!("cdk.Fn.conditionIf({condition}.logicalId, {when_true}, {when_false})");
        if string {
            format!("{call}.toString()")
        } else {
            call
        }
    }

    fn render_no_value(&self) -> String {
        "cdk.Aws.NO_VALUE".to_string()
    }

    fn render_constructor_call(
        &self,
        scope: &Scope<'_>,
        construct: &ConstructIr,
        binding: Option<&str>,
    ) -> String {
        let (class, entries) = match construct.resource_type.service() {
            Some(service) => {
                let class = format!(
                    "{}.{}",
                    self.service_module(service),
                    construct.resource_type.class_name()
                );
                let entries = construct
                    .properties
                    .iter()
                    .map(|(name, value)| {
                        format!(
                            "{}: {}",
                            TS_NAMING.property(name),
                            self.render_value(scope, value, 1)
                        )
                    })
                    .collect();
                (class, entries)
            }
            None => {
                let resource_type = quote(&construct.resource_type.to_string());
                let mut entries = vec![format!("type: {resource_type}")];
                if !construct.properties.is_empty() {
                    entries.push(format!(
                        "properties: {}",
                        self.render_object(scope, ObjectKind::Json, &construct.properties, 1)
                    ));
                }
                ("cdk.CfnResource".to_string(), entries)
            }
        };

        let id = quote(&construct.logical_id);
        let call = if entries.is_empty() {
            format!("new {class}(this, {id})")
        } else {
            format!("new {class}(this, {id}, {})", self.props(&entries))
        };
        match binding {
            Some(variable) => format!("const {variable} = {call};"),
            None => format!("{call};"),
        }
    }

    fn render_add_dependency(&self, target: &str, dependency: &str) -> String {
        format!("{target}.addDependency({dependency});")
    }

    fn render_cfn_option(&self, target: &str, option: CfnOption, value: &str) -> String {
        let name = match option {
            CfnOption::DeletionPolicy => "deletionPolicy",
            CfnOption::UpdateReplacePolicy => "updateReplacePolicy",
            CfnOption::Metadata => "metadata",
            CfnOption::Condition => "condition",
        };
        format!("{target}.cfnOptions.{name} = {value};")
    }

    fn render_deletion_policy(&self, policy: DeletionPolicy) -> String {
        format!("cdk.CfnDeletionPolicy.{}", policy.constant())
    }

    fn render_output(&self, scope: &Scope<'_>, output: &OutputIr) -> String {
        let mut entries = vec![format!("value: {}", self.render_value(scope, &output.value, 1))];
        if let Some(description) = &output.description {
            entries.push(format!("description: {}", quote(description)));
        }
        if let Some(export_name) = &output.export_name {
            entries.push(format!("exportName: {}", self.render_value(scope, export_name, 1)));
        }
        if let Some(condition) = &output.condition {
            entries.push(format!("condition: {}", scope.condition_variable(condition)));
        }
        format!(
            "new cdk.CfnOutput(this, {}, {});",
            quote(&output.logical_id),
            self.props(&entries)
        )
    }

    fn render_file(&self, scope: &Scope<'_>, body: &str) -> String {
        let ir = scope.ir();
        let name = TS_NAMING.type_name(scope.class_name());

        let mut b = CodeBuilder::new(self.indent());
        b.push_line("import * as cdk from 'aws-cdk-lib';");
        for service in &ir.services {
            b.push_line(&format!(
                "import * as {} from 'aws-cdk-lib/aws-{}';",
                self.service_module(service),
                service.to_lowercase()
            ));
        }
        b.push_line("import { Construct } from 'constructs';");
        b.push_blank();

        if let Some(description) = &ir.meta.description {
            b.push_line("/**");
            for line in description.lines() {
                b.push_line(format!(" * {line}").trim_end());
            }
            b.push_line(" */");
        }

        match scope.kind() {
            StackKind::Stack => {
                b.push_line(&format!("export class {name} extends cdk.Stack {{"))
                    .push_indent()
                    .push_line(
                        "public constructor(scope: Construct, id: string, props?: cdk.StackProps) {",
                    )
                    .push_indent()
                    .push_line("super(scope, id, props);");
            }
            StackKind::Construct => {
                b.push_line(&format!("export class {name} extends Construct {{"))
                    .push_indent()
                    .push_line("public constructor(scope: Construct, id: string) {")
                    .push_indent()
                    .push_line("super(scope, id);");
            }
        }

        if !body.is_empty() {
            b.push_blank();
            b.push_raw(body);
        }
        b.push_dedent().push_line("}").push_dedent().push_line("}");
        b.build()
    }
}
