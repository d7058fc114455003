//! C# rendering of the stack IR.

use cfn2cdk_codegen::{
    builder::{CodeBuilder, Indent},
    emit::{Scope, coerce_number, coerce_string, escape},
    language::{CfnOption, ConditionFunction, LanguageEmitter, NamingConvention},
};
use cfn2cdk_core::{DeletionPolicy, PseudoParameter, StackKind, TargetLanguage, to_pascal_case};
use cfn2cdk_ir::{
    ConstructIr, Deferred, DeployCondition, MappingTable, ObjectKind, OutputIr, Value,
};
use indexmap::IndexMap;

use crate::{CSHARP_NAMING, NAMESPACE};

/// Emits `Amazon.CDK` C#.
#[derive(Debug, Clone, Copy, Default)]
pub struct CSharpEmitter;

fn quote(s: &str) -> String {
    escape(s, '"')
}

const DICTIONARY: &str = "new Dictionary<string, object> {";

impl CSharpEmitter {
    /// Object initializer for a props class.
    fn props(&self, class: &str, entries: &[String]) -> String {
        self.wrap(&format!("new {class} {{"), entries, "}", 0, false)
    }

    fn field(&self, scope: &Scope<'_>, name: &str, value: &Value) -> String {
        format!("{name} = {}", self.render_value(scope, value, 1))
    }
}

impl LanguageEmitter for CSharpEmitter {
    fn language(&self) -> TargetLanguage {
        TargetLanguage::CSharp
    }

    fn naming(&self) -> &'static NamingConvention {
        &CSHARP_NAMING
    }

    fn indent(&self) -> Indent {
        Indent::FOUR
    }

    fn body_indent(&self) -> usize {
        3
    }

    fn inline_padding(&self) -> &'static str {
        " "
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
            _ => "null".to_string(),
        }
    }

    fn render_list(&self, scope: &Scope<'_>, items: &[Value], depth: usize) -> String {
        let open = if items.is_empty() {
            "new string[] {"
        } else if items.iter().all(Value::is_string_like) || items.iter().all(Value::is_tag) {
            "new [] {"
        } else {
            "new object[] {"
        };
        let items: Vec<String> = items
            .iter()
            .map(|item| self.render_value(scope, item, depth + 1))
            .collect();
        self.wrap(open, &items, "}", depth, true)
    }

    fn render_object(
        &self,
        scope: &Scope<'_>,
        kind: ObjectKind,
        entries: &IndexMap<String, Value>,
        depth: usize,
    ) -> String {
        if kind == ObjectKind::Tag {
            let fields: Vec<String> = entries
                .iter()
                .map(|(name, value)| {
                    format!(
                        "{name} = {}",
                        self.render_value(scope, &coerce_string(value), depth + 1)
                    )
                })
                .collect();
            return self.wrap("new CfnTag {", &fields, "}", depth, true);
        }
        let entries: Vec<String> = entries
            .iter()
            .map(|(name, value)| {
                format!(
                    "{{ {}, {} }}",
                    quote(&self.object_key(kind, name)),
                    self.render_value(scope, value, depth + 1)
                )
            })
            .collect();
        self.wrap(DICTIONARY, &entries, "}", depth, false)
    }

    fn render_identifier_ref(&self, scope: &Scope<'_>, logical_id: &str) -> String {
        format!("{}.Ref", scope.variable(logical_id))
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
            format!("{target}.GetAtt({}).ToString()", quote(attribute))
        } else {
            format!("{target}.Attr{}", to_pascal_case(attribute))
        }
    }

    fn render_pseudo(&self, _scope: &Scope<'_>, pseudo: PseudoParameter) -> String {
        format!("Stack.Of(this).{}", to_pascal_case(pseudo.stack_property()))
    }

    fn render_call(&self, scope: &Scope<'_>, deferred: &Deferred, depth: usize) -> String {
        let value = |v: &Value| self.render_value(scope, v, depth);
        match deferred {
            Deferred::Select { index, list } => format!("Fn.Select({index}, {})", value(list)),
            Deferred::Split { delimiter, source } => {
                format!("Fn.Split({}, {})", quote(delimiter), value(source))
            }
            Deferred::Join { delimiter, items } => {
                format!("Fn.Join({}, {})", quote(delimiter), value(items))
            }
            Deferred::FindInMap {
                mapping,
                top_key,
                second_key,
            } => format!(
                "{}.FindInMap({}, {})",
                scope.mapping_variable(mapping),
                value(top_key),
                value(second_key)
            ),
            Deferred::ImportValue(name) => format!("Fn.ImportValue({})", value(name)),
            Deferred::Base64(data) => format!("Fn.Base64({})", value(data)),
            Deferred::GetAzs(region) => format!("Fn.GetAzs({})", value(region)),
            Deferred::Cidr {
                ip_block,
                count,
                cidr_bits,
            } => format!(
                "Fn.Cidr({}, {}, {})",
                value(ip_block),
                value(&coerce_number(count)),
                value(&coerce_string(cidr_bits))
            ),
            other => self.render_deferred(scope, other, depth),
        }
    }

    /// `CfnMappingProps.Mapping` nests `IDictionary` rows, so they are typed explicitly.
    fn render_mapping(&self, scope: &Scope<'_>, variable: &str, table: &MappingTable) -> String {
        let rows: Vec<String> = table
            .entries
            .iter()
            .map(|(top, row)| {
                let row = self.render_object(scope, ObjectKind::Json, row, 2);
                format!("{{ {}, {row} }}", quote(top))
            })
            .collect();
        let mapping = self.wrap(
            "new Dictionary<string, IDictionary<string, object>> {",
            &rows,
            "}",
            1,
            false,
        );
        format!(
            "var {variable} = new CfnMapping(this, {}, {});",
            quote(&table.logical_id),
            self.props("CfnMappingProps", &[format!("Mapping = {mapping}")])
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
            "new CfnCondition(this, {}, {})",
            quote(&condition.logical_id),
            self.props("CfnConditionProps", &[format!("Expression = {expression}")])
        );
        match binding {
            Some(variable) => format!("var {variable} = {call};"),
            None => format!("{call};"),
        }
    }

    fn render_condition_function(&self, function: ConditionFunction, args: &[String]) -> String {
        let name = match function {
            ConditionFunction::Equals => "ConditionEquals",
            ConditionFunction::And => "ConditionAnd",
            ConditionFunction::Or => "ConditionOr",
            ConditionFunction::Not => "ConditionNot",
        };
        format!("Fn.{name}({})", args.join(", "))
    }

    fn render_condition_if(
        &self,
        condition: &str,
        when_true: &str,
        when_false: &str,
        string: bool,
    ) -> String {
        let call = format!("Fn.ConditionIf({condition}.LogicalId, {when_true}, {when_false})");
        if string {
            format!("{call}.ToString()")
        } else {
            call
        }
    }

    fn render_no_value(&self) -> String {
        "Aws.NO_VALUE".to_string()
    }

    fn render_constructor_call(
        &self,
        scope: &Scope<'_>,
        construct: &ConstructIr,
        binding: Option<&str>,
    ) -> String {
        let class = construct.resource_type.class_name();
        let entries: Vec<String> = match construct.resource_type.service() {
            Some(_) => construct
                .properties
                .iter()
                .map(|(name, value)| self.field(scope, &CSHARP_NAMING.property(name), value))
                .collect(),
            None => {
                let mut entries = vec![format!(
                    "Type = {}",
                    quote(&construct.resource_type.to_string())
                )];
                if !construct.properties.is_empty() {
                    entries.push(format!(
                        "Properties = {}",
                        self.render_object(scope, ObjectKind::Json, &construct.properties, 1)
                    ));
                }
                entries
            }
        };

        let id = quote(&construct.logical_id);
        let call = if entries.is_empty() {
            format!("new {class}(this, {id})")
        } else {
            format!(
                "new {class}(this, {id}, {})",
                self.props(&format!("{class}Props"), &entries)
            )
        };
        match binding {
            Some(variable) => format!("var {variable} = {call};"),
            None => format!("{call};"),
        }
    }

    fn render_add_dependency(&self, target: &str, dependency: &str) -> String {
        format!("{target}.AddDependency({dependency});")
    }

    fn render_cfn_option(&self, target: &str, option: CfnOption, value: &str) -> String {
        let name = match option {
            CfnOption::DeletionPolicy => "DeletionPolicy",
            CfnOption::UpdateReplacePolicy => "UpdateReplacePolicy",
            CfnOption::Metadata => "Metadata",
            CfnOption::Condition => "Condition",
        };
        format!("{target}.CfnOptions.{name} = {value};")
    }

    fn render_deletion_policy(&self, policy: DeletionPolicy) -> String {
        format!("CfnDeletionPolicy.{}", policy.constant())
    }

    fn render_output(&self, scope: &Scope<'_>, output: &OutputIr) -> String {
        let mut entries = vec![self.field(scope, "Value", &output.value)];
        if let Some(description) = &output.description {
            entries.push(format!("Description = {}", quote(description)));
        }
        if let Some(export_name) = &output.export_name {
            entries.push(self.field(scope, "ExportName", export_name));
        }
        if let Some(condition) = &output.condition {
            entries.push(format!("Condition = {}", scope.condition_variable(condition)));
        }
        format!(
            "new CfnOutput(this, {}, {});",
            quote(&output.logical_id),
            self.props("CfnOutputProps", &entries)
        )
    }

    fn render_file(&self, scope: &Scope<'_>, body: &str) -> String {
        let ir = scope.ir();
        let name = CSHARP_NAMING.type_name(scope.class_name());

        let mut b = CodeBuilder::new(self.indent());
        b.push_line("using Amazon.CDK;");
        for service in &ir.services {
            b.push_line(&format!("using Amazon.CDK.AWS.{service};"));
        }
        b.push_line("using Constructs;");
        if Scope::uses(body, "Dictionary<") {
            b.push_line("using System.Collections.Generic;");
        }
        b.push_blank();

        b.push_line(&format!("namespace {NAMESPACE}"))
            .push_line("{")
            .push_indent();

        if let Some(description) = &ir.meta.description {
            b.push_line("/// <summary>");
            for line in description.lines() {
                b.push_line(format!("/// {line}").trim_end());
            }
            b.push_line("/// </summary>");
        }

        let (base, constructor) = match scope.kind() {
            StackKind::Stack => (
                "Stack",
                format!(
                    "public {name}(Construct scope, string id, IStackProps props = null) : base(scope, id, props)"
                ),
            ),
            StackKind::Construct => (
                "Construct",
                format!("public {name}(Construct scope, string id) : base(scope, id)"),
            ),
        };
        b.push_line(&format!("public class {name} : {base}"))
            .push_line("{")
            .push_indent()
            .push_line(&constructor)
            .push_line("{")
            .push_indent();

        if !body.is_empty() {
            b.push_raw(body);
        }
        b.push_dedent()
            .push_line("}")
            .push_dedent()
            .push_line("}")
            .push_dedent()
            .push_line("}");
        b.build()
    }
}
