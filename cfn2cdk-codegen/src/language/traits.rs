//! Language-agnostic code generation traits.

use std::path::Path;

use cfn2cdk_core::{
    DeletionPolicy, File, PseudoParameter, TargetLanguage, WriteResult, to_camel_case,
};
use cfn2cdk_ir::{
    ConditionExpr, ConstructIr, Deferred, DeployCondition, MappingTable, ObjectKind, OutputIr,
    Value,
};
use eyre::Result;
use indexmap::IndexMap;

use super::NamingConvention;
use crate::{builder::Indent, emit::Scope};

/// Trait for language-specific code generators.
///
/// Implement this trait to add support for writing a synthesized stack in a
/// new language.
pub trait LanguageCodegen {
    /// Target language of the generated source.
    fn language(&self) -> TargetLanguage;

    /// File extension for generated source files (e.g., "ts", "py", "go")
    fn file_extension(&self) -> &'static str;

    /// Preview generated files without writing to disk
    fn preview(&self) -> Vec<PreviewFile>;

    /// Generate all files into the specified output directory
    fn generate(&self, output_dir: &Path) -> Result<GenerateResult>;
}

/// Result of code generation
#[derive(Debug, Default)]
pub struct GenerateResult {
    /// Files that were written
    pub written: Vec<String>,
    /// Files that already had identical content
    pub unchanged: Vec<String>,
}

/// A generated file for preview
#[derive(Debug)]
pub struct PreviewFile {
    /// Relative path from output directory
    pub path: String,
    /// File content
    pub content: String,
}

/// Write previewed files below `output_dir`, skipping files whose content is unchanged.
pub fn write_files(output_dir: &Path, files: Vec<PreviewFile>) -> Result<GenerateResult> {
    let mut result = GenerateResult::default();
    for file in files {
        match File::new(output_dir.join(&file.path), file.content).write()? {
            WriteResult::Written => result.written.push(file.path),
            WriteResult::Unchanged => result.unchanged.push(file.path),
        }
    }
    Ok(result)
}

/// Construct options set after instantiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CfnOption {
    DeletionPolicy,
    UpdateReplacePolicy,
    Metadata,
    Condition,
}

/// `Fn` functions that build a `CfnCondition` expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionFunction {
    Equals,
    And,
    Or,
    Not,
}

/// Strategy for rendering a stack in one target language.
///
/// [`crate::emit::emit_stack`] walks the stack IR and asks the emitter for
/// each statement and expression; nothing outside an implementation of this
/// trait branches on the target language.
///
/// Multi-line values are rendered relative to the statement they appear in:
/// a value rendered at `depth` indents its inner lines by `depth + 1` levels
/// and its closing delimiter by `depth` levels.
pub trait LanguageEmitter {
    fn language(&self) -> TargetLanguage;

    fn naming(&self) -> &'static NamingConvention;

    fn indent(&self) -> Indent;

    /// Indent level of statements inside the generated constructor.
    fn body_indent(&self) -> usize;

    /// Name under which a service's construct module is imported
    /// (e.g., "EC2" -> "ec2").
    fn service_module(&self, service: &str) -> String {
        service.to_lowercase()
    }

    /// A single-line comment.
    fn render_comment(&self, text: &str) -> String;

    /// A scalar literal (string, number, boolean, null).
    fn render_literal(&self, value: &Value) -> String;

    fn render_list(&self, scope: &Scope<'_>, items: &[Value], depth: usize) -> String;

    fn render_object(
        &self,
        scope: &Scope<'_>,
        kind: ObjectKind,
        entries: &IndexMap<String, Value>,
        depth: usize,
    ) -> String;

    /// The `Ref` of a construct declared earlier in the stack.
    fn render_identifier_ref(&self, scope: &Scope<'_>, logical_id: &str) -> String;

    /// An attribute of a construct declared earlier in the stack.
    fn render_attribute(
        &self,
        scope: &Scope<'_>,
        logical_id: &str,
        attribute: &str,
        custom: bool,
    ) -> String;

    /// A pseudo parameter read from the enclosing stack.
    fn render_pseudo(&self, scope: &Scope<'_>, pseudo: PseudoParameter) -> String;

    /// Any other deploy-time expression (`Fn::Join`, `Fn::Select`, ...).
    fn render_call(&self, scope: &Scope<'_>, deferred: &Deferred, depth: usize) -> String;

    /// A `CfnMapping` declaration for a mapping still needed at deploy time.
    fn render_mapping(&self, scope: &Scope<'_>, variable: &str, table: &MappingTable) -> String;

    /// A `CfnCondition` declaration, bound to `binding` when given.
    fn render_condition(
        &self,
        scope: &Scope<'_>,
        condition: &DeployCondition,
        binding: Option<&str>,
    ) -> String;

    /// A call such as `Fn.conditionEquals(a, b)` on already rendered arguments.
    fn render_condition_function(&self, function: ConditionFunction, args: &[String]) -> String;

    /// `Fn.conditionIf` on the `CfnCondition` bound to `condition`. String
    /// results are converted back to a string token.
    fn render_condition_if(
        &self,
        condition: &str,
        when_true: &str,
        when_false: &str,
        string: bool,
    ) -> String;

    /// The `AWS::NoValue` pseudo parameter.
    fn render_no_value(&self) -> String;

    /// The statement instantiating a construct, bound to `binding` when given.
    fn render_constructor_call(
        &self,
        scope: &Scope<'_>,
        construct: &ConstructIr,
        binding: Option<&str>,
    ) -> String;

    /// `target.addDependency(dependency)` as a statement.
    fn render_add_dependency(&self, target: &str, dependency: &str) -> String;

    /// Assignment of a construct option to an already rendered value.
    fn render_cfn_option(&self, target: &str, option: CfnOption, value: &str) -> String;

    fn render_deletion_policy(&self, policy: DeletionPolicy) -> String;

    /// A `CfnOutput` statement.
    fn render_output(&self, scope: &Scope<'_>, output: &OutputIr) -> String;

    /// Wrap the rendered constructor body in imports and the class declaration.
    fn render_file(&self, scope: &Scope<'_>, body: &str) -> String;

    /// Whether constructs nothing refers to are still bound to a local.
    fn binds_unreferenced(&self) -> bool {
        true
    }

    /// Whether multi-line collections end with a separator after the last item.
    fn trailing_comma(&self) -> bool {
        true
    }

    /// Padding inside the delimiters of a single-line collection.
    fn inline_padding(&self) -> &'static str {
        ""
    }

    /// Key of an object entry. Struct and tag keys follow the camelCase wire
    /// names, JSON keys are kept verbatim.
    fn object_key(&self, kind: ObjectKind, key: &str) -> String {
        match kind {
            ObjectKind::Struct | ObjectKind::Tag => to_camel_case(key),
            ObjectKind::Json => key.to_string(),
        }
    }

    /// Render any value.
    fn render_value(&self, scope: &Scope<'_>, value: &Value, depth: usize) -> String {
        match value {
            Value::List(items) => self.render_list(scope, items, depth),
            Value::Object { kind, entries } => self.render_object(scope, *kind, entries, depth),
            Value::Deferred(deferred) => self.render_deferred(scope, deferred, depth),
            scalar => self.render_literal(scalar),
        }
    }

    fn render_deferred(&self, scope: &Scope<'_>, deferred: &Deferred, depth: usize) -> String {
        match deferred {
            Deferred::Ref { logical_id } => self.render_identifier_ref(scope, logical_id),
            Deferred::GetAtt {
                logical_id,
                attribute,
                custom,
            } => self.render_attribute(scope, logical_id, attribute, *custom),
            Deferred::Pseudo(pseudo) => self.render_pseudo(scope, *pseudo),
            Deferred::If {
                condition,
                when_true,
                when_false,
            } => self.render_condition_if(
                scope.condition_variable(condition),
                &self.render_value(scope, when_true, depth),
                &self.render_value(scope, when_false, depth),
                when_true.is_string_like() && when_false.is_string_like(),
            ),
            Deferred::NoValue => self.render_no_value(),
            call => self.render_call(scope, call, depth),
        }
    }

    /// The expression of a `CfnCondition`. Other deploy-time conditions are
    /// referred to by their variable.
    fn render_condition_expr(&self, scope: &Scope<'_>, expr: &ConditionExpr, depth: usize) -> String {
        let operands = |operands: &[ConditionExpr]| -> Vec<String> {
            operands
                .iter()
                .map(|operand| self.render_condition_expr(scope, operand, depth))
                .collect()
        };
        let (function, args) = match expr {
            ConditionExpr::Condition(name) => return scope.condition_variable(name).to_string(),
            ConditionExpr::Equals(left, right) => (
                ConditionFunction::Equals,
                vec![
                    self.render_value(scope, left, depth),
                    self.render_value(scope, right, depth),
                ],
            ),
            ConditionExpr::And(all) => (ConditionFunction::And, operands(all)),
            ConditionExpr::Or(any) => (ConditionFunction::Or, operands(any)),
            ConditionExpr::Not(operand) => (
                ConditionFunction::Not,
                operands(std::slice::from_ref(operand.as_ref())),
            ),
        };
        self.render_condition_function(function, &args)
    }

    /// Lay out a collection.
    ///
    /// Items must already be rendered at `depth + 1`. With `inline` set, short
    /// single-line items stay on one line.
    fn wrap(&self, open: &str, items: &[String], close: &str, depth: usize, inline: bool) -> String {
        if items.is_empty() {
            return format!("{open}{close}");
        }

        let single_line = items.iter().all(|item| !item.contains('\n'));
        let width: usize = items.iter().map(|item| item.len() + 2).sum();
        if inline && single_line && width <= 72 {
            let pad = self.inline_padding();
            return format!("{open}{pad}{}{pad}{close}", items.join(", "));
        }

        let indent = self.indent();
        let inner = indent.repeat(depth + 1);
        let mut out = String::from(open);
        out.push('\n');
        for (i, item) in items.iter().enumerate() {
            out.push_str(&inner);
            out.push_str(item);
            if i + 1 < items.len() || self.trailing_comma() {
                out.push(',');
            }
            out.push('\n');
        }
        out.push_str(&indent.repeat(depth));
        out.push_str(close);
        out
    }
}
