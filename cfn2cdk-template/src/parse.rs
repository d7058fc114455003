//! Conversion from a raw JSON/YAML document into the typed template model.

use std::str::FromStr;

use cfn2cdk_core::{DeletionPolicy, ResourceType};
use indexmap::IndexMap;
use serde_yaml::{Mapping as RawMapping, Value};

use crate::{
    Condition, Expr, Intrinsic, Mapping, MappingValue, Output, Parameter, ParameterType, Resource,
    Result, SourceContext, Template, sub::parse_sub_template,
};

/// Load the raw document, picking JSON or YAML by its first character.
pub(crate) fn load_document(source: &SourceContext) -> Result<Value> {
    if source.src().trim_start().starts_with('{') {
        serde_json::from_str(source.src()).map_err(|e| source.json_error(e))
    } else {
        serde_yaml::from_str(source.src()).map_err(|e| source.yaml_error(e))
    }
}

fn key_string(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::Sequence(items) => items
            .iter()
            .map(key_string)
            .collect::<Option<Vec<_>>>()
            .map(|items| items.join(",")),
        other => key_string(other),
    }
}

fn display_name(function: &str) -> String {
    match function {
        "Ref" | "Condition" => function.to_string(),
        _ => format!("Fn::{function}"),
    }
}

pub(crate) struct TemplateParser<'a> {
    source: &'a SourceContext,
}

impl<'a> TemplateParser<'a> {
    pub(crate) fn new(source: &'a SourceContext) -> Self {
        Self { source }
    }

    pub(crate) fn parse(&self, document: &Value) -> Result<Template> {
        let Value::Mapping(root) = document else {
            return Err(self.source.error("template root must be a mapping"));
        };

        if root.get("Resources").is_none() {
            return Err(self.source.missing_section_error("Resources"));
        }

        Ok(Template {
            format_version: root
                .get("AWSTemplateFormatVersion")
                .and_then(key_string),
            description: root.get("Description").and_then(key_string),
            transforms: self.parse_transforms(root.get("Transform"))?,
            parameters: self.parse_section(root, "Parameters", |id, body| {
                self.parse_parameter(id, body)
            })?,
            mappings: self.parse_section(root, "Mappings", |id, body| {
                self.parse_mapping(id, body)
            })?,
            conditions: self.parse_section(root, "Conditions", |id, body| {
                Ok(Condition {
                    logical_id: id.to_string(),
                    expr: ExprParser::new(self.source, id).parse_condition(body)?,
                })
            })?,
            resources: self.parse_section(root, "Resources", |id, body| {
                self.parse_resource(id, body)
            })?,
            outputs: self.parse_section(root, "Outputs", |id, body| {
                self.parse_output(id, body)
            })?,
        })
    }

    fn parse_transforms(&self, value: Option<&Value>) -> Result<Vec<String>> {
        match value {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::String(s)) => Ok(vec![s.clone()]),
            Some(Value::Sequence(items)) => items
                .iter()
                .map(|item| {
                    key_string(item)
                        .ok_or_else(|| self.source.error("'Transform' entries must be strings"))
                })
                .collect(),
            Some(_) => Err(self
                .source
                .error("'Transform' must be a string or a list of strings")),
        }
    }

    fn parse_section<T>(
        &self,
        root: &RawMapping,
        section: &str,
        mut parse_entry: impl FnMut(&str, &Value) -> Result<T>,
    ) -> Result<IndexMap<String, T>> {
        let entries = match root.get(section) {
            None | Some(Value::Null) => return Ok(IndexMap::new()),
            Some(Value::Mapping(entries)) => entries,
            Some(_) => {
                return Err(self
                    .source
                    .validation_error(section, format!("'{section}' must be a mapping")));
            }
        };

        let mut parsed = IndexMap::with_capacity(entries.len());
        for (key, body) in entries {
            let id = key_string(key).ok_or_else(|| {
                self.source
                    .validation_error(section, format!("'{section}' keys must be strings"))
            })?;
            let value = parse_entry(&id, body)?;
            if parsed.insert(id.clone(), value).is_some() {
                return Err(self.source.duplicate_error(&id, section, section));
            }
        }
        Ok(parsed)
    }

    fn body<'v>(&self, id: &str, kind: &str, body: &'v Value) -> Result<&'v RawMapping> {
        match body {
            Value::Mapping(m) => Ok(m),
            _ => Err(self
                .source
                .validation_error(id, format!("{kind} '{id}' must be a mapping"))),
        }
    }

    fn optional_string(&self, id: &str, body: &RawMapping, field: &str) -> Result<Option<String>> {
        match body.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => key_string(value).map(Some).ok_or_else(|| {
                self.source
                    .validation_error(id, format!("'{field}' of '{id}' must be a string"))
            }),
        }
    }

    fn parse_parameter(&self, id: &str, body: &Value) -> Result<Parameter> {
        let body = self.body(id, "parameter", body)?;
        let type_name = self
            .optional_string(id, body, "Type")?
            .ok_or_else(|| {
                self.source
                    .validation_error(id, format!("parameter '{id}' is missing 'Type'"))
            })?;
        let parameter_type = ParameterType::parse(&type_name).ok_or_else(|| {
            self.source.validation_error(
                id,
                format!("parameter '{id}' has unknown type '{type_name}'"),
            )
        })?;

        let default = match body.get("Default") {
            None | Some(Value::Null) => None,
            Some(value) => Some(scalar_string(value).ok_or_else(|| {
                self.source.validation_error(
                    id,
                    format!("default of parameter '{id}' must be a scalar or a list of scalars"),
                )
            })?),
        };

        let allowed_values = match body.get("AllowedValues") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Sequence(items)) => items
                .iter()
                .map(|item| {
                    key_string(item).ok_or_else(|| {
                        self.source.validation_error(
                            id,
                            format!("'AllowedValues' of '{id}' must contain scalars"),
                        )
                    })
                })
                .collect::<Result<_>>()?,
            Some(_) => {
                return Err(self
                    .source
                    .validation_error(id, format!("'AllowedValues' of '{id}' must be a list")));
            }
        };

        let no_echo = match body.get("NoEcho") {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        };

        Ok(Parameter {
            logical_id: id.to_string(),
            parameter_type,
            default,
            allowed_values,
            description: self.optional_string(id, body, "Description")?,
            no_echo,
        })
    }

    fn mapping_value(&self, id: &str, value: &Value) -> Result<MappingValue> {
        match value {
            Value::String(s) => Ok(MappingValue::String(s.clone())),
            Value::Bool(b) => Ok(MappingValue::Bool(*b)),
            Value::Number(n) => Ok(match n.as_i64() {
                Some(i) => MappingValue::Number(i),
                None => MappingValue::Double(n.as_f64().unwrap_or_default()),
            }),
            Value::Sequence(items) => items
                .iter()
                .map(|item| self.mapping_value(id, item))
                .collect::<Result<_>>()
                .map(MappingValue::List),
            _ => Err(self.source.validation_error(
                id,
                format!("mapping '{id}' values must be scalars or lists"),
            )),
        }
    }

    fn parse_mapping(&self, id: &str, body: &Value) -> Result<Mapping> {
        let body = self.body(id, "mapping", body)?;
        let mut entries = IndexMap::new();
        for (top_key, second_level) in body {
            let top_key = key_string(top_key).ok_or_else(|| {
                self.source
                    .validation_error(id, format!("mapping '{id}' keys must be strings"))
            })?;
            let second_level = self.body(id, "mapping", second_level)?;
            let mut values = IndexMap::new();
            for (second_key, value) in second_level {
                let second_key = key_string(second_key).ok_or_else(|| {
                    self.source
                        .validation_error(id, format!("mapping '{id}' keys must be strings"))
                })?;
                values.insert(second_key, self.mapping_value(id, value)?);
            }
            entries.insert(top_key, values);
        }
        Ok(Mapping {
            logical_id: id.to_string(),
            entries,
        })
    }

    fn parse_policy(&self, id: &str, body: &RawMapping, field: &str) -> Result<Option<DeletionPolicy>> {
        self.optional_string(id, body, field)?
            .map(|value| {
                DeletionPolicy::from_str(&value).map_err(|reason| {
                    self.source
                        .validation_error(id, format!("'{field}' of '{id}': {reason}"))
                })
            })
            .transpose()
    }

    fn parse_resource(&self, id: &str, body: &Value) -> Result<Resource> {
        let body = self.body(id, "resource", body)?;
        let type_name = self.optional_string(id, body, "Type")?.ok_or_else(|| {
            self.source
                .validation_error(id, format!("resource '{id}' is missing 'Type'"))
        })?;
        let resource_type = ResourceType::from_str(&type_name)
            .map_err(|_| self.source.resource_type_error(id, &type_name))?;

        let exprs = ExprParser::new(self.source, id);
        let properties = match body.get("Properties") {
            None | Some(Value::Null) => IndexMap::new(),
            Some(Value::Mapping(props)) => {
                let mut properties = IndexMap::with_capacity(props.len());
                for (key, value) in props {
                    let key = key_string(key).ok_or_else(|| {
                        self.source
                            .validation_error(id, format!("property names of '{id}' must be strings"))
                    })?;
                    properties.insert(key, exprs.parse(value)?);
                }
                properties
            }
            Some(_) => {
                return Err(self
                    .source
                    .validation_error(id, format!("'Properties' of '{id}' must be a mapping")));
            }
        };

        let depends_on = match body.get("DependsOn") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::String(dep)) => vec![dep.clone()],
            Some(Value::Sequence(deps)) => deps
                .iter()
                .map(|dep| {
                    dep.as_str().map(str::to_string).ok_or_else(|| {
                        self.source
                            .validation_error(id, format!("'DependsOn' of '{id}' must list logical IDs"))
                    })
                })
                .collect::<Result<_>>()?,
            Some(_) => {
                return Err(self.source.validation_error(
                    id,
                    format!("'DependsOn' of '{id}' must be a string or a list"),
                ));
            }
        };

        Ok(Resource {
            logical_id: id.to_string(),
            resource_type,
            properties,
            condition: self.optional_string(id, body, "Condition")?,
            depends_on,
            deletion_policy: self.parse_policy(id, body, "DeletionPolicy")?,
            update_replace_policy: self.parse_policy(id, body, "UpdateReplacePolicy")?,
            metadata: body.get("Metadata").map(|m| exprs.parse(m)).transpose()?,
        })
    }

    fn parse_output(&self, id: &str, body: &Value) -> Result<Output> {
        let body = self.body(id, "output", body)?;
        let exprs = ExprParser::new(self.source, id);
        let value = body.get("Value").ok_or_else(|| {
            self.source
                .validation_error(id, format!("output '{id}' is missing 'Value'"))
        })?;

        let export_name = match body.get("Export") {
            None | Some(Value::Null) => None,
            Some(Value::Mapping(export)) => {
                let name = export.get("Name").ok_or_else(|| {
                    self.source
                        .validation_error(id, format!("'Export' of '{id}' is missing 'Name'"))
                })?;
                Some(exprs.parse(name)?)
            }
            Some(_) => {
                return Err(self
                    .source
                    .validation_error(id, format!("'Export' of '{id}' must be a mapping")));
            }
        };

        Ok(Output {
            logical_id: id.to_string(),
            value: exprs.parse(value)?,
            description: self.optional_string(id, body, "Description")?,
            export_name,
            condition: self.optional_string(id, body, "Condition")?,
        })
    }
}

/// Parses property values and condition bodies into [`Expr`] trees.
struct ExprParser<'a> {
    source: &'a SourceContext,
    owner: &'a str,
}

impl<'a> ExprParser<'a> {
    fn new(source: &'a SourceContext, owner: &'a str) -> Self {
        Self { source, owner }
    }

    fn parse(&self, value: &Value) -> Result<Expr> {
        self.parse_value(value, false)
    }

    /// Like `parse`, but a single-key `{"Condition": name}` is a condition reference.
    fn parse_condition(&self, value: &Value) -> Result<Expr> {
        self.parse_value(value, true)
    }

    fn parse_value(&self, value: &Value, condition_operand: bool) -> Result<Expr> {
        match value {
            Value::Null => Ok(Expr::Null),
            Value::Bool(b) => Ok(Expr::Bool(*b)),
            Value::Number(n) => Ok(match n.as_i64() {
                Some(i) => Expr::Number(i),
                None => Expr::Double(n.as_f64().unwrap_or_default()),
            }),
            Value::String(s) => Ok(Expr::String(s.clone())),
            Value::Sequence(items) => items
                .iter()
                .map(|item| self.parse(item))
                .collect::<Result<_>>()
                .map(Expr::List),
            Value::Mapping(map) => {
                if map.len() == 1
                    && let Some((Value::String(key), args)) = map.iter().next()
                {
                    let function = match key.as_str() {
                        "Ref" => Some("Ref"),
                        "Condition" if condition_operand => Some("Condition"),
                        other => other.strip_prefix("Fn::"),
                    };
                    if let Some(function) = function {
                        return self.parse_function(function, args, condition_operand);
                    }
                }

                let mut entries = IndexMap::with_capacity(map.len());
                for (key, value) in map {
                    let key = key_string(key).ok_or_else(|| {
                        self.source.validation_error(
                            self.owner,
                            format!("object keys in '{}' must be strings", self.owner),
                        )
                    })?;
                    entries.insert(key, self.parse(value)?);
                }
                Ok(Expr::Object(entries))
            }
            Value::Tagged(tagged) => {
                let tag = tagged.tag.to_string();
                self.parse_function(tag.trim_start_matches('!'), &tagged.value, condition_operand)
            }
        }
    }

    fn malformed(&self, function: &str, reason: impl Into<String>) -> Box<crate::Error> {
        self.source
            .malformed_intrinsic_error(&display_name(function), self.owner, reason)
    }

    fn args<'v, const N: usize>(&self, function: &str, args: &'v Value) -> Result<[&'v Value; N]> {
        let Value::Sequence(items) = args else {
            return Err(self.malformed(function, format!("expected a list of {N} arguments")));
        };
        items
            .iter()
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|_| {
                self.malformed(
                    function,
                    format!("expected {N} arguments, found {}", items.len()),
                )
            })
    }

    fn literal(&self, function: &str, value: &Value, what: &str) -> Result<String> {
        key_string(value)
            .ok_or_else(|| self.malformed(function, format!("{what} must be a literal string")))
    }

    /// `condition_operand` carries into the branches of `Fn::If`, which are
    /// conditions themselves when the `Fn::If` is.
    fn parse_function(&self, function: &str, args: &Value, condition_operand: bool) -> Result<Expr> {
        let intrinsic = match function {
            "Ref" => Intrinsic::Ref(self.literal(function, args, "the target")?),
            "Condition" => Intrinsic::Condition(self.literal(function, args, "the condition name")?),
            "GetAtt" => self.parse_get_att(args)?,
            "FindInMap" => {
                let [mapping, top_key, second_key] = self.args(function, args)?;
                Intrinsic::FindInMap {
                    mapping: self.parse(mapping)?,
                    top_key: self.parse(top_key)?,
                    second_key: self.parse(second_key)?,
                }
            }
            "Select" => {
                let [index, list] = self.args(function, args)?;
                Intrinsic::Select {
                    index: self.parse(index)?,
                    list: self.parse(list)?,
                }
            }
            "Split" => {
                let [delimiter, source] = self.args(function, args)?;
                Intrinsic::Split {
                    delimiter: self.literal(function, delimiter, "the delimiter")?,
                    source: self.parse(source)?,
                }
            }
            "Join" => {
                let [delimiter, items] = self.args(function, args)?;
                Intrinsic::Join {
                    delimiter: self.literal(function, delimiter, "the delimiter")?,
                    items: self.parse(items)?,
                }
            }
            "Sub" => self.parse_sub(args)?,
            "If" => {
                let [condition, when_true, when_false] = self.args(function, args)?;
                Intrinsic::If {
                    condition: self.literal(function, condition, "the condition name")?,
                    when_true: self.parse_value(when_true, condition_operand)?,
                    when_false: self.parse_value(when_false, condition_operand)?,
                }
            }
            "Equals" => {
                let [left, right] = self.args(function, args)?;
                Intrinsic::Equals(self.parse(left)?, self.parse(right)?)
            }
            "And" | "Or" => {
                let operands = match args {
                    Value::Sequence(items) if (2..=10).contains(&items.len()) => items
                        .iter()
                        .map(|item| self.parse_condition(item))
                        .collect::<Result<Vec<_>>>()?,
                    _ => {
                        return Err(self.malformed(function, "expected a list of 2 to 10 conditions"));
                    }
                };
                if function == "And" {
                    Intrinsic::And(operands)
                } else {
                    Intrinsic::Or(operands)
                }
            }
            "Not" => {
                let [operand] = self.args(function, args)?;
                Intrinsic::Not(self.parse_condition(operand)?)
            }
            "ImportValue" => Intrinsic::ImportValue(self.parse(args)?),
            "Base64" => Intrinsic::Base64(self.parse(args)?),
            "GetAZs" => Intrinsic::GetAzs(self.parse(args)?),
            "Cidr" => {
                let [ip_block, count, cidr_bits] = self.args(function, args)?;
                Intrinsic::Cidr {
                    ip_block: self.parse(ip_block)?,
                    count: self.parse(count)?,
                    cidr_bits: self.parse(cidr_bits)?,
                }
            }
            _ => {
                return Err(self
                    .source
                    .unsupported_function_error(&display_name(function), self.owner));
            }
        };
        Ok(Expr::intrinsic(intrinsic))
    }

    fn parse_get_att(&self, args: &Value) -> Result<Intrinsic> {
        let (logical_id, attribute) = match args {
            Value::String(s) => s
                .split_once('.')
                .map(|(id, attr)| (id.to_string(), attr.to_string()))
                .ok_or_else(|| self.malformed("GetAtt", "expected 'Resource.Attribute'"))?,
            Value::Sequence(_) => {
                let [id, attr] = self.args("GetAtt", args)?;
                (
                    self.literal("GetAtt", id, "the resource name")?,
                    self.literal("GetAtt", attr, "the attribute name")?,
                )
            }
            _ => return Err(self.malformed("GetAtt", "expected a string or a list of 2 strings")),
        };
        if logical_id.is_empty() || attribute.is_empty() {
            return Err(self.malformed("GetAtt", "resource and attribute must not be empty"));
        }
        Ok(Intrinsic::GetAtt {
            logical_id,
            attribute,
        })
    }

    fn parse_sub(&self, args: &Value) -> Result<Intrinsic> {
        let (template, variables) = match args {
            Value::String(s) => (s.as_str(), None),
            Value::Sequence(items) => match items.as_slice() {
                [Value::String(s)] => (s.as_str(), None),
                [Value::String(s), Value::Mapping(vars)] => (s.as_str(), Some(vars)),
                _ => {
                    return Err(self.malformed(
                        "Sub",
                        "expected a string, or a list of a string and a variable map",
                    ));
                }
            },
            _ => return Err(self.malformed("Sub", "expected a string or a list")),
        };

        let parts = parse_sub_template(template).map_err(|reason| self.malformed("Sub", reason))?;
        let mut bound = IndexMap::new();
        for (name, value) in variables.into_iter().flatten() {
            let name = key_string(name)
                .ok_or_else(|| self.malformed("Sub", "variable names must be strings"))?;
            bound.insert(name, self.parse(value)?);
        }
        Ok(Intrinsic::Sub {
            parts,
            variables: bound,
        })
    }
}
