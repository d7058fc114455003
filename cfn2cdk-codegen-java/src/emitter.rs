//! Java rendering of the stack IR.

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

use crate::{JAVA_NAMING, PACKAGE};

/// Emits `software.amazon.awscdk` Java.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaEmitter;

fn quote(s: &str) -> String {
    escape(s, '"')
}

/// Builder method calls hang two levels below the statement.
const CHAIN_DEPTH: usize = 2;

impl JavaEmitter {
    /// `Class.Builder.create(this, "Id")` followed by one method per setting.
    fn builder(&self, class: &str, id: &str, calls: &[(String, String)]) -> String {
        let chain = self.indent().repeat(CHAIN_DEPTH);
        let mut out = format!("{class}.Builder.create(this, {})", quote(id));
        for (method, argument) in calls {
            out.push_str(&format!("\n{chain}.{method}({argument})"));
        }
        out.push_str(&format!("\n{chain}.build()"));
        out
    }

    fn call(&self, scope: &Scope<'_>, method: &str, value: &Value) -> (String, String) {
        (
            method.to_string(),
            self.render_value(scope, value, CHAIN_DEPTH),
        )
    }
}

impl LanguageEmitter for JavaEmitter {
    fn language(&self) -> TargetLanguage {
        TargetLanguage::Java
    }

    fn naming(&self) -> &'static NamingConvention {
        &JAVA_NAMING
    }

    fn indent(&self) -> Indent {
        Indent::FOUR
    }

    fn body_indent(&self) -> usize {
        2
    }

    fn trailing_comma(&self) -> bool {
        false
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
        let items: Vec<String> = items
            .iter()
            .map(|item| self.render_value(scope, item, depth + 1))
            .collect();
        self.wrap("Arrays.asList(", &items, ")", depth, true)
    }

    fn render_object(
        &self,
        scope: &Scope<'_>,
        kind: ObjectKind,
        entries: &IndexMap<String, Value>,
        depth: usize,
    ) -> String {
        if kind == ObjectKind::Tag {
            let chain = self.indent().repeat(depth + 1);
            let mut out = String::from("CfnTag.builder()");
            for (name, value) in entries {
                let value = self.render_value(scope, &coerce_string(value), depth + 1);
                out.push_str(&format!("\n{chain}.{}({value})", self.object_key(kind, name)));
            }
            out.push_str(&format!("\n{chain}.build()"));
            return out;
        }
        if entries.is_empty() {
            return "Map.of()".to_string();
        }
        let entries: Vec<String> = entries
            .iter()
            .map(|(name, value)| {
                format!(
                    "Map.entry({}, {})",
                    quote(&self.object_key(kind, name)),
                    self.render_value(scope, value, depth + 1)
                )
            })
            .collect();
        self.wrap("Map.ofEntries(", &entries, ")", depth, false)
    }

    fn render_identifier_ref(&self, scope: &Scope<'_>, logical_id: &str) -> String {
        format!("{}.getRef()", scope.variable(logical_id))
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
            format!("{target}.getAttr{}()", to_pascal_case(attribute))
        }
    }

    fn render_pseudo(&self, _scope: &Scope<'_>, pseudo: PseudoParameter) -> String {
        format!("Stack.of(this).get{}()", to_pascal_case(pseudo.stack_property()))
    }

    fn render_call(&self, scope: &Scope<'_>, deferred: &Deferred, depth: usize) -> String {
        let value = |v: &Value| self.render_value(scope, v, depth);
        match deferred {
            Deferred::Select { index, list } => format!("Fn.select({index}, {})", value(list)),
            Deferred::Split { delimiter, source } => {
                format!("Fn.split({}, {})", quote(delimiter), value(source))
            }
            Deferred::Join { delimiter, items } => {
                format!("Fn.join({}, {})", quote(delimiter), value(items))
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
            Deferred::ImportValue(name) => format!("Fn.importValue({})", value(name)),
            Deferred::Base64(data) => format!("Fn.base64({})", value(data)),
            Deferred::GetAzs(region) => format!("Fn.getAzs({})", value(region)),
            Deferred::Cidr {
                ip_block,
                count,
                cidr_bits,
            } => format!(
                "Fn.cidr({}, {}, {})",
                value(ip_block),
                value(&coerce_number(count)),
                value(&coerce_string(cidr_bits))
            ),
            other => self.render_deferred(scope, other, depth),
        }
    }

    fn render_mapping(&self, scope: &Scope<'_>, variable: &str, table: &MappingTable) -> String {
        let calls = [self.call(scope, "mapping", &mapping_object(table))];
        format!(
            "CfnMapping {variable} = {};",
            self.builder("CfnMapping", &table.logical_id, &calls)
        )
    }

    fn render_condition(
        &self,
        scope: &Scope<'_>,
        condition: &DeployCondition,
        binding: Option<&str>,
    ) -> String {
        let calls = [(
            "expression".to_string(),
            self.render_condition_expr(scope, &condition.expression, CHAIN_DEPTH),
        )];
        let call = self.builder("CfnCondition", &condition.logical_id, &calls);
        match binding {
            Some(variable) => format!("CfnCondition {variable} = {call};"),
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
        format!("Fn.{name}({})", args.join(", "))
    }

    fn render_condition_if(
        &self,
        condition: &str,
        when_true: &str,
        when_false: &str,
        string: bool,
    ) -> String {
        let call = format!("Fn.conditionIf({condition}.getLogicalId(), {when_true}, {when_false})");
        if string {
            format!("{call}.toString()")
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
        let (class, calls) = match construct.resource_type.service() {
            Some(_) => {
                let calls: Vec<_> = construct
                    .properties
                    .iter()
                    .map(|(name, value)| self.call(scope, &JAVA_NAMING.property(name), value))
                    .collect();
                (construct.resource_type.class_name(), calls)
            }
            None => {
                let mut calls = vec![(
                    "type".to_string(),
                    quote(&construct.resource_type.to_string()),
                )];
                if !construct.properties.is_empty() {
                    calls.push((
                        "properties".to_string(),
                        self.render_object(
                            scope,
                            ObjectKind::Json,
                            &construct.properties,
                            CHAIN_DEPTH,
                        ),
                    ));
                }
                ("CfnResource".to_string(), calls)
            }
        };

        let call = self.builder(&class, &construct.logical_id, &calls);
        match binding {
            Some(variable) => format!("{class} {variable} = {call};"),
            None => format!("{call};"),
        }
    }

    fn render_add_dependency(&self, target: &str, dependency: &str) -> String {
        format!("{target}.addDependency({dependency});")
    }

    fn render_cfn_option(&self, target: &str, option: CfnOption, value: &str) -> String {
        let setter = match option {
            CfnOption::DeletionPolicy => "setDeletionPolicy",
            CfnOption::UpdateReplacePolicy => "setUpdateReplacePolicy",
            CfnOption::Metadata => "setMetadata",
            CfnOption::Condition => "setCondition",
        };
        format!("{target}.getCfnOptions().{setter}({value});")
    }

    fn render_deletion_policy(&self, policy: DeletionPolicy) -> String {
        format!("CfnDeletionPolicy.{}", policy.constant())
    }

    fn render_output(&self, scope: &Scope<'_>, output: &OutputIr) -> String {
        let mut calls = vec![self.call(scope, "value", &output.value)];
        if let Some(description) = &output.description {
            calls.push(("description".to_string(), quote(description)));
        }
        if let Some(export_name) = &output.export_name {
            calls.push(self.call(scope, "exportName", export_name));
        }
        if let Some(condition) = &output.condition {
            calls.push((
                "condition".to_string(),
                scope.condition_variable(condition).to_string(),
            ));
        }
        format!("{};", self.builder("CfnOutput", &output.logical_id, &calls))
    }

    fn render_file(&self, scope: &Scope<'_>, body: &str) -> String {
        let ir = scope.ir();
        let name = JAVA_NAMING.type_name(scope.class_name());

        let mut b = CodeBuilder::new(self.indent());
        b.push_line(&format!("package {PACKAGE};")).push_blank();

        b.push_line("import software.amazon.awscdk.*;");
        for service in &ir.services {
            b.push_line(&format!(
                "import software.amazon.awscdk.services.{}.*;",
                service.to_lowercase()
            ));
        }
        b.push_line("import software.constructs.Construct;");

        let utilities: Vec<&str> = ["Arrays", "Map"]
            .into_iter()
            .filter(|class| Scope::uses(body, &format!("{class}.")))
            .collect();
        if !utilities.is_empty() {
            b.push_blank();
            for class in utilities {
                b.push_line(&format!("import java.util.{class};"));
            }
        }
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
                b.push_line(&format!("public class {name} extends Stack {{"))
                    .push_indent()
                    .push_line(&format!(
                        "public {name}(final Construct scope, final String id) {{"
                    ))
                    .push_indent()
                    .push_line("this(scope, id, null);")
                    .push_dedent()
                    .push_line("}")
                    .push_blank()
                    .push_line(&format!(
                        "public {name}(final Construct scope, final String id, final StackProps props) {{"
                    ))
                    .push_indent()
                    .push_line("super(scope, id, props);");
            }
            StackKind::Construct => {
                b.push_line(&format!("public class {name} extends Construct {{"))
                    .push_indent()
                    .push_line(&format!(
                        "public {name}(final Construct scope, final String id) {{"
                    ))
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
