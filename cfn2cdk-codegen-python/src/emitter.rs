//! Python rendering of the stack IR.

use cfn2cdk_codegen::{
    builder::{CodeBuilder, Indent},
    emit::{Scope, coerce_number, coerce_string, escape, mapping_object},
    language::{CfnOption, ConditionFunction, LanguageEmitter, NamingConvention},
};
use cfn2cdk_core::{DeletionPolicy, PseudoParameter, StackKind, TargetLanguage, to_snake_case};
use cfn2cdk_ir::{
    ConstructIr, Deferred, DeployCondition, MappingTable, ObjectKind, OutputIr, Value,
};
use indexmap::IndexMap;

use crate::PY_NAMING;

/// Emits `aws_cdk` Python.
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonEmitter;

fn quote(s: &str) -> String {
    escape(s, '"')
}

impl PythonEmitter {
    /// A call with one argument per line, or on one line when it fits.
    fn call(&self, callee: &str, args: &[String], inline: bool) -> String {
        self.wrap(&format!("{callee}("), args, ")", 0, inline)
    }
}

impl LanguageEmitter for PythonEmitter {
    fn language(&self) -> TargetLanguage {
        TargetLanguage::Python
    }

    fn naming(&self) -> &'static NamingConvention {
        &PY_NAMING
    }

    fn indent(&self) -> Indent {
        Indent::FOUR
    }

    fn body_indent(&self) -> usize {
        2
    }

    fn service_module(&self, service: &str) -> String {
        PY_NAMING.safe_name(&service.to_lowercase())
    }

    fn render_comment(&self, text: &str) -> String {
        format!("# {text}")
    }

    fn render_literal(&self, value: &Value) -> String {
        match value {
            Value::Bool(true) => "True".to_string(),
            Value::Bool(false) => "False".to_string(),
            Value::Number(n) => n.to_string(),
            Value::Double(d) => d.to_string(),
            Value::String(s) => quote(s),
            _ => "None".to_string(),
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
                    quote(&self.object_key(kind, name)),
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
            format!("{target}.get_att({}).to_string()", quote(attribute))
        } else {
            format!("{target}.attr_{}", to_snake_case(attribute))
        }
    }

    fn render_pseudo(&self, _scope: &Scope<'_>, pseudo: PseudoParameter) -> String {
        format!("cdk.Stack.of(self).{}", to_snake_case(pseudo.stack_property()))
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
                "{}.find_in_map({}, {})",
                scope.mapping_variable(mapping),
                value(top_key),
                value(second_key)
            ),
            Deferred::ImportValue(name) => format!("cdk.Fn.import_value({})", value(name)),
            Deferred::Base64(data) => format!("cdk.Fn.base64({})", value(data)),
            Deferred::GetAzs(region) => format!("cdk.Fn.get_azs({})", value(region)),
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
        let args = [
            "self".to_string(),
            quote(&table.logical_id),
            format!("mapping={mapping}"),
        ];
        format!("{variable} = {}", self.call("cdk.CfnMapping", &args, false))
    }

    fn render_condition(
        &self,
        scope: &Scope<'_>,
        condition: &DeployCondition,
        binding: Option<&str>,
    ) -> String {
        let expression = self.render_condition_expr(scope, &condition.expression, 1);
        let args = [
            "self".to_string(),
            quote(&condition.logical_id),
            format!("expression={expression}"),
        ];
        let call = self.call("cdk.CfnCondition", &args, false);
        match binding {
            Some(variable) => format!("{variable} = {call}"),
            None => call,
        }
    }

    fn render_condition_function(&self, function: ConditionFunction, args: &[String]) -> String {
        let name = match function {
            ConditionFunction::Equals => "condition_equals",
            ConditionFunction::And => "condition_and",
            ConditionFunction::Or => "condition_or",
            ConditionFunction::Not => "condition_not",
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
        let call = format!("cdk.Fn.condition_if({condition}.logical_id, {when_true}, {when_false})");
        if string {
            format!("{call}.to_string()")
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
        let mut args = vec!["self".to_string(), quote(&construct.logical_id)];
        let class = match construct.resource_type.service() {
            Some(service) => {
                args.extend(construct.properties.iter().map(|(name, value)| {
                    format!(
                        "{}={}",
                        PY_NAMING.property(name),
                        self.render_value(scope, value, 1)
                    )
                }));
                format!(
                    "{}.{}",
                    self.service_module(service),
                    construct.resource_type.class_name()
                )
            }
            None => {
                args.push(format!("type={}", quote(&construct.resource_type.to_string())));
                if !construct.properties.is_empty() {
                    args.push(format!(
                        "properties={}",
                        self.render_object(scope, ObjectKind::Json, &construct.properties, 1)
                    ));
                }
                "cdk.CfnResource".to_string()
            }
        };

        let call = self.call(&class, &args, args.len() == 2);
        match binding {
            Some(variable) => format!("{variable} = {call}"),
            None => call,
        }
    }

    fn render_add_dependency(&self, target: &str, dependency: &str) -> String {
        format!("{target}.add_dependency({dependency})")
    }

    fn render_cfn_option(&self, target: &str, option: CfnOption, value: &str) -> String {
        let name = match option {
            CfnOption::DeletionPolicy => "deletion_policy",
            CfnOption::UpdateReplacePolicy => "update_replace_policy",
            CfnOption::Metadata => "metadata",
            CfnOption::Condition => "condition",
        };
        format!("{target}.cfn_options.{name} = {value}")
    }

    fn render_deletion_policy(&self, policy: DeletionPolicy) -> String {
        format!("cdk.CfnDeletionPolicy.{}", policy.constant())
    }

    fn render_output(&self, scope: &Scope<'_>, output: &OutputIr) -> String {
        let mut args = vec![
            "self".to_string(),
            quote(&output.logical_id),
            format!("value={}", self.render_value(scope, &output.value, 1)),
        ];
        if let Some(description) = &output.description {
            args.push(format!("description={}", quote(description)));
        }
        if let Some(export_name) = &output.export_name {
            args.push(format!("export_name={}", self.render_value(scope, export_name, 1)));
        }
        if let Some(condition) = &output.condition {
            args.push(format!("condition={}", scope.condition_variable(condition)));
        }
        self.call("cdk.CfnOutput", &args, false)
    }

    fn render_file(&self, scope: &Scope<'_>, body: &str) -> String {
        let ir = scope.ir();
        let name = PY_NAMING.type_name(scope.class_name());

        let mut b = CodeBuilder::new(self.indent());
        b.push_line("import aws_cdk as cdk");
        for service in &ir.services {
            b.push_line(&format!(
                "from aws_cdk import aws_{} as {}",
                service.to_lowercase(),
                self.service_module(service)
            ));
        }
        b.push_line("from constructs import Construct");
        b.push_blank().push_blank();

        let (base, init, super_call) = match scope.kind() {
            StackKind::Stack => (
                "cdk.Stack",
                "def __init__(self, scope: Construct, construct_id: str, **kwargs) -> None:",
                "super().__init__(scope, construct_id, **kwargs)",
            ),
            StackKind::Construct => (
                "Construct",
                "def __init__(self, scope: Construct, construct_id: str) -> None:",
                "super().__init__(scope, construct_id)",
            ),
        };

        b.push_line(&format!("class {name}({base}):")).push_indent();
        if let Some(description) = &ir.meta.description {
            let description = description.trim().replace("\"\"\"", "\\\"\\\"\\\"");
            if description.contains('\n') {
                b.push_line("\"\"\"");
                for line in description.lines() {
                    b.push_line(line.trim_end());
                }
                b.push_line("\"\"\"");
            } else {
                b.push_line(&format!("\"\"\"{description}\"\"\""));
            }
            b.push_blank();
        }
        b.push_line(init).push_indent().push_line(super_call);

        if !body.is_empty() {
            b.push_blank();
            b.push_raw(body);
        }
        b.build()
    }
}
