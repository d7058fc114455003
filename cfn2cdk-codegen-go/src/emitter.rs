//! Go rendering of the stack IR.

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

use crate::GO_NAMING;

const CDK_MODULE: &str = "github.com/aws/aws-cdk-go/awscdk/v2";

/// Emits `awscdk/v2` Go.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoEmitter;

fn quote(s: &str) -> String {
    escape(s, '"')
}

fn string(s: &str) -> String {
    format!("jsii.String({})", quote(s))
}

/// The construct every statement is scoped to.
fn owner(scope: &Scope<'_>) -> &'static str {
    match scope.kind() {
        StackKind::Stack => "stack",
        StackKind::Construct => "construct",
    }
}

impl GoEmitter {
    fn props(&self, type_name: &str, entries: &[String]) -> String {
        self.wrap(&format!("&{type_name}{{"), entries, "}", 0, false)
    }

    fn field(&self, scope: &Scope<'_>, name: &str, value: &Value) -> String {
        format!("{name}: {}", self.render_value(scope, value, 1))
    }
}

impl LanguageEmitter for GoEmitter {
    fn language(&self) -> TargetLanguage {
        TargetLanguage::Go
    }

    fn naming(&self) -> &'static NamingConvention {
        &GO_NAMING
    }

    fn indent(&self) -> Indent {
        Indent::GO
    }

    fn body_indent(&self) -> usize {
        1
    }

    fn service_module(&self, service: &str) -> String {
        format!("aws{}", service.to_lowercase())
    }

    fn binds_unreferenced(&self) -> bool {
        false
    }

    fn render_comment(&self, text: &str) -> String {
        format!("// {text}")
    }

    fn render_literal(&self, value: &Value) -> String {
        match value {
            Value::Bool(b) => format!("jsii.Bool({b})"),
            Value::Number(n) => format!("jsii.Number({n})"),
            Value::Double(d) => format!("jsii.Number({d})"),
            Value::String(s) => string(s),
            _ => "nil".to_string(),
        }
    }

    fn render_list(&self, scope: &Scope<'_>, items: &[Value], depth: usize) -> String {
        let element = if !items.is_empty() && items.iter().all(Value::is_tag) {
            "*cdk.CfnTag"
        } else if items.iter().all(Value::is_string_like) {
            "*string"
        } else {
            "interface{}"
        };
        let items: Vec<String> = items
            .iter()
            .map(|item| self.render_value(scope, item, depth + 1))
            .collect();
        self.wrap(&format!("&[]{element}{{"), &items, "}", depth, true)
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
                        "{name}: {}",
                        self.render_value(scope, &coerce_string(value), depth + 1)
                    )
                })
                .collect();
            return self.wrap("&cdk.CfnTag{", &fields, "}", depth, true);
        }
        let entries: Vec<String> = entries
            .iter()
            .map(|(name, value)| {
                format!(
                    "{}: {}",
                    quote(&self.object_key(kind, name)),
                    self.render_value(scope, value, depth + 1)
                )
            })
            .collect();
        self.wrap("&map[string]interface{}{", &entries, "}", depth, false)
    }

    fn render_identifier_ref(&self, scope: &Scope<'_>, logical_id: &str) -> String {
        format!("{}.Ref()", scope.variable(logical_id))
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
            format!("{target}.GetAtt({}, nil).ToString()", string(attribute))
        } else {
            format!("{target}.Attr{}()", to_pascal_case(attribute))
        }
    }

    fn render_pseudo(&self, scope: &Scope<'_>, pseudo: PseudoParameter) -> String {
        let property = to_pascal_case(pseudo.stack_property());
        match scope.kind() {
            StackKind::Stack => format!("stack.{property}()"),
            StackKind::Construct => format!("cdk.Stack_Of(construct).{property}()"),
        }
    }

    fn render_call(&self, scope: &Scope<'_>, deferred: &Deferred, depth: usize) -> String {
        let value = |v: &Value| self.render_value(scope, v, depth);
        match deferred {
            Deferred::Select { index, list } => {
                format!("cdk.Fn_Select(jsii.Number({index}), {})", value(list))
            }
            Deferred::Split { delimiter, source } => {
                format!("cdk.Fn_Split({}, {}, nil)", string(delimiter), value(source))
            }
            Deferred::Join { delimiter, items } => {
                format!("cdk.Fn_Join({}, {})", string(delimiter), value(items))
            }
            Deferred::FindInMap {
                mapping,
                top_key,
                second_key,
            } => format!(
                "{}.FindInMap({}, {}, nil)",
                scope.mapping_variable(mapping),
                value(top_key),
                value(second_key)
            ),
            Deferred::ImportValue(name) => format!("cdk.Fn_ImportValue({})", value(name)),
            Deferred::Base64(data) => format!("cdk.Fn_Base64({})", value(data)),
            Deferred::GetAzs(region) => format!("cdk.Fn_GetAzs({})", value(region)),
            Deferred::Cidr {
                ip_block,
                count,
                cidr_bits,
            } => format!(
                "cdk.Fn_Cidr({}, {}, {})",
                value(ip_block),
                value(&coerce_number(count)),
                value(&coerce_string(cidr_bits))
            ),
            other => self.render_deferred(scope, other, depth),
        }
    }

    /// `CfnMappingProps.Mapping` is a map of map pointers, so rows are typed explicitly.
    fn render_mapping(&self, scope: &Scope<'_>, variable: &str, table: &MappingTable) -> String {
        let rows: Vec<String> = table
            .entries
            .iter()
            .map(|(top, row)| {
                let row = self.render_object(scope, ObjectKind::Json, row, 2);
                format!("{}: {row}", quote(top))
            })
            .collect();
        let mapping = self.wrap("&map[string]*map[string]interface{}{", &rows, "}", 1, false);
        format!(
            "{variable} := cdk.NewCfnMapping({}, {}, {})",
            owner(scope),
            string(&table.logical_id),
            self.props("cdk.CfnMappingProps", &[format!("Mapping: {mapping}")])
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
            "cdk.NewCfnCondition({}, {}, {})",
            owner(scope),
            string(&condition.logical_id),
            self.props(
                "cdk.CfnConditionProps",
                &[format!("Expression: {expression}")]
            )
        );
        match binding {
            Some(variable) => format!("{variable} := {call}"),
            None => call,
        }
    }

    fn render_condition_function(&self, function: ConditionFunction, args: &[String]) -> String {
        let name = match function {
            ConditionFunction::Equals => "Equals",
            ConditionFunction::And => "And",
            ConditionFunction::Or => "Or",
            ConditionFunction::Not => "Not",
        };
        format!("cdk.Fn_Condition{name}({})", args.join(", "))
    }

    fn render_condition_if(
        &self,
        condition: &str,
        when_true: &str,
        when_false: &str,
        string: bool,
    ) -> String {
        let call = format!("cdk.Fn_ConditionIf({condition}.LogicalId(), {when_true}, {when_false})");
        if string {
            format!("{call}.ToString()")
        } else {
            call
        }
    }

    fn render_no_value(&self) -> String {
        "cdk.Aws_NO_VALUE()".to_string()
    }

    fn render_constructor_call(
        &self,
        scope: &Scope<'_>,
        construct: &ConstructIr,
        binding: Option<&str>,
    ) -> String {
        let (constructor, props) = match construct.resource_type.service() {
            Some(service) => {
                let module = self.service_module(service);
                let class = construct.resource_type.class_name();
                let entries: Vec<String> = construct
                    .properties
                    .iter()
                    .map(|(name, value)| self.field(scope, &GO_NAMING.property(name), value))
                    .collect();
                (
                    format!("{module}.New{class}"),
                    self.props(&format!("{module}.{class}Props"), &entries),
                )
            }
            None => {
                let mut entries = vec![format!(
                    "Type: {}",
                    string(&construct.resource_type.to_string())
                )];
                if !construct.properties.is_empty() {
                    entries.push(format!(
                        "Properties: {}",
                        self.render_object(scope, ObjectKind::Json, &construct.properties, 1)
                    ));
                }
                (
                    "cdk.NewCfnResource".to_string(),
                    self.props("cdk.CfnResourceProps", &entries),
                )
            }
        };

        let call = format!(
            "{constructor}({}, {}, {props})",
            owner(scope),
            string(&construct.logical_id)
        );
        match binding {
            Some(variable) => format!("{variable} := {call}"),
            None => call,
        }
    }

    fn render_add_dependency(&self, target: &str, dependency: &str) -> String {
        format!("{target}.AddDependency({dependency})")
    }

    fn render_cfn_option(&self, target: &str, option: CfnOption, value: &str) -> String {
        let setter = match option {
            CfnOption::DeletionPolicy => "SetDeletionPolicy",
            CfnOption::UpdateReplacePolicy => "SetUpdateReplacePolicy",
            CfnOption::Metadata => "SetMetadata",
            CfnOption::Condition => "SetCondition",
        };
        format!("{target}.CfnOptions().{setter}({value})")
    }

    fn render_deletion_policy(&self, policy: DeletionPolicy) -> String {
        format!("cdk.CfnDeletionPolicy_{}", policy.constant())
    }

    fn render_output(&self, scope: &Scope<'_>, output: &OutputIr) -> String {
        let mut entries = vec![self.field(scope, "Value", &output.value)];
        if let Some(description) = &output.description {
            entries.push(format!("Description: {}", string(description)));
        }
        if let Some(export_name) = &output.export_name {
            entries.push(self.field(scope, "ExportName", export_name));
        }
        if let Some(condition) = &output.condition {
            entries.push(format!("Condition: {}", scope.condition_variable(condition)));
        }
        format!(
            "cdk.NewCfnOutput({}, {}, {})",
            owner(scope),
            string(&output.logical_id),
            self.props("cdk.CfnOutputProps", &entries)
        )
    }

    fn render_file(&self, scope: &Scope<'_>, body: &str) -> String {
        let ir = scope.ir();
        let name = GO_NAMING.type_name(scope.class_name());
        let kind = scope.kind();

        let mut imports = Vec::new();
        if kind == StackKind::Stack || Scope::uses(body, "cdk.") {
            imports.push(format!("cdk {}", quote(CDK_MODULE)));
        }
        for service in &ir.services {
            imports.push(quote(&format!("{CDK_MODULE}/{}", self.service_module(service))));
        }
        imports.push(quote("github.com/aws/constructs-go/constructs/v10"));
        if Scope::uses(body, "jsii.") {
            imports.push(quote("github.com/aws/jsii-runtime-go"));
        }

        let mut b = CodeBuilder::new(self.indent());
        b.push_line("package main").push_blank();
        b.push_line("import (").push_indent();
        for import in &imports {
            b.push_line(import);
        }
        b.push_dedent().push_line(")").push_blank();

        if kind == StackKind::Stack {
            b.push_line(&format!("type {name}Props struct {{"))
                .push_indent()
                .push_line("cdk.StackProps")
                .push_dedent()
                .push_line("}")
                .push_blank();
        }

        if let Some(description) = &ir.meta.description {
            for line in description.lines() {
                b.push_line(format!("// {line}").trim_end());
            }
        }

        let owner = owner(scope);
        match kind {
            StackKind::Stack => {
                b.push_line(&format!(
                    "func New{name}(scope constructs.Construct, id string, props *{name}Props) cdk.Stack {{"
                ))
                .push_indent()
                .push_line("var sprops cdk.StackProps")
                .push_line("if props != nil {")
                .push_indent()
                .push_line("sprops = props.StackProps")
                .push_dedent()
                .push_line("}")
                .push_line("stack := cdk.NewStack(scope, &id, &sprops)");
            }
            StackKind::Construct => {
                b.push_line(&format!(
                    "func New{name}(scope constructs.Construct, id string) constructs.Construct {{"
                ))
                .push_indent()
                .push_line("construct := constructs.NewConstruct(scope, &id)");
            }
        }

        if !body.is_empty() {
            b.push_blank();
            b.push_raw(body);
        }
        b.push_blank()
            .push_line(&format!("return {owner}"))
            .push_dedent()
            .push_line("}");
        b.build()
    }
}
