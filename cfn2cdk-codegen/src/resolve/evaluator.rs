//! Partial evaluation of intrinsic functions.
//!
//! Anything computable from the template, parameter values and supplied
//! pseudo parameters is folded to a literal. References to resources and
//! values CloudFormation only knows at deploy time become [`Deferred`] nodes
//! that the emitted code performs itself.

use cfn2cdk_core::PseudoParameter;
use cfn2cdk_ir::{Deferred, ObjectKind, Value};
use cfn2cdk_template::{
    Expr, Intrinsic, MappingValue, Parameter, ParameterType, SubPart, Template,
};
use indexmap::IndexMap;

use super::{ResolutionContext, Truth};
use crate::{SynthError, SynthResult};

pub(super) fn unsupported(
    logical_id: &str,
    function: &str,
    reason: impl Into<String>,
) -> SynthError {
    SynthError::UnsupportedIntrinsic {
        logical_id: logical_id.to_string(),
        function: function.to_string(),
        reason: reason.into(),
    }
}

/// Convert a stored mapping value to an IR value.
pub(crate) fn mapping_value(value: &MappingValue) -> Value {
    match value {
        MappingValue::String(s) => Value::String(s.clone()),
        MappingValue::Number(n) => Value::Number(*n),
        MappingValue::Double(d) => Value::Double(*d),
        MappingValue::Bool(b) => Value::Bool(*b),
        MappingValue::List(items) => Value::List(items.iter().map(mapping_value).collect()),
    }
}

/// Evaluates expressions of one template against one [`ResolutionContext`].
pub struct Evaluator<'a> {
    pub(super) template: &'a Template,
    pub(super) ctx: &'a mut ResolutionContext,
}

impl<'a> Evaluator<'a> {
    pub fn new(template: &'a Template, ctx: &'a mut ResolutionContext) -> Self {
        Self { template, ctx }
    }

    /// Resolve `expr`, found in the entity `owner`, to a value.
    ///
    /// `AWS::NoValue` resolves to [`Value::Null`]; objects and lists drop
    /// such entries.
    pub fn resolve(&mut self, owner: &str, expr: &Expr) -> SynthResult<Value> {
        Ok(match expr {
            Expr::Null => Value::Null,
            Expr::Bool(b) => Value::Bool(*b),
            Expr::Number(n) => Value::Number(*n),
            Expr::Double(d) => Value::Double(*d),
            Expr::String(s) => Value::String(s.clone()),
            Expr::List(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    match self.resolve(owner, item)? {
                        Value::Null => {}
                        value => values.push(value),
                    }
                }
                Value::List(values)
            }
            Expr::Object(entries) => Value::Object {
                kind: ObjectKind::Struct,
                entries: self.resolve_entries(owner, entries)?,
            },
            Expr::Intrinsic(intrinsic) => self.resolve_intrinsic(owner, intrinsic)?,
        })
    }

    /// Resolve every entry of a property bag, dropping removed ones.
    pub fn resolve_entries(
        &mut self,
        owner: &str,
        entries: &IndexMap<String, Expr>,
    ) -> SynthResult<IndexMap<String, Value>> {
        let mut resolved = IndexMap::with_capacity(entries.len());
        for (key, expr) in entries {
            match self.resolve(owner, expr)? {
                Value::Null => {}
                value => {
                    resolved.insert(key.clone(), value);
                }
            }
        }
        Ok(resolved)
    }

    fn resolve_intrinsic(&mut self, owner: &str, intrinsic: &Intrinsic) -> SynthResult<Value> {
        match intrinsic {
            Intrinsic::Ref(name) => self.resolve_ref(owner, name),
            Intrinsic::GetAtt {
                logical_id,
                attribute,
            } => self.resolve_get_att(owner, logical_id, attribute),
            Intrinsic::FindInMap {
                mapping,
                top_key,
                second_key,
            } => self.resolve_find_in_map(owner, mapping, top_key, second_key),
            Intrinsic::Select { index, list } => self.resolve_select(owner, index, list),
            Intrinsic::Split { delimiter, source } => {
                match self.resolve(owner, source)? {
                    Value::String(s) => Ok(Value::List(
                        s.split(delimiter.as_str())
                            .map(|part| Value::String(part.to_string()))
                            .collect(),
                    )),
                    source if source.is_string_like() => Ok(Value::deferred(Deferred::Split {
                        delimiter: delimiter.clone(),
                        source,
                    })),
                    _ => Err(unsupported(owner, "Fn::Split", "the source must be a string")),
                }
            }
            Intrinsic::Join { delimiter, items } => {
                let items = self.resolve(owner, items)?;
                join(owner, "Fn::Join", delimiter, items)
            }
            Intrinsic::Sub { parts, variables } => self.resolve_sub(owner, parts, variables),
            Intrinsic::If {
                condition,
                when_true,
                when_false,
            } => match self.evaluate_condition(condition)? {
                // The unselected branch is never evaluated.
                Truth::Known(true) => self.resolve(owner, when_true),
                Truth::Known(false) => self.resolve(owner, when_false),
                Truth::Deferred(_) => {
                    let branch = |value: Value| match value {
                        Value::Null => Value::deferred(Deferred::NoValue),
                        value => value,
                    };
                    Ok(Value::deferred(Deferred::If {
                        condition: condition.clone(),
                        when_true: branch(self.resolve(owner, when_true)?),
                        when_false: branch(self.resolve(owner, when_false)?),
                    }))
                }
            },
            Intrinsic::Equals(..)
            | Intrinsic::And(_)
            | Intrinsic::Or(_)
            | Intrinsic::Not(_)
            | Intrinsic::Condition(_) => match self.evaluate_boolean_intrinsic(owner, intrinsic)? {
                Truth::Known(value) => Ok(Value::Bool(value)),
                Truth::Deferred(_) => Err(unsupported(
                    owner,
                    intrinsic.name(),
                    "a condition decided at deploy time cannot be used as a property value",
                )),
            },
            Intrinsic::ImportValue(name) => Ok(Value::deferred(Deferred::ImportValue(
                self.resolve(owner, name)?,
            ))),
            Intrinsic::Base64(content) => Ok(Value::deferred(Deferred::Base64(
                self.resolve(owner, content)?,
            ))),
            Intrinsic::GetAzs(region) => Ok(Value::deferred(Deferred::GetAzs(
                self.resolve(owner, region)?,
            ))),
            Intrinsic::Cidr {
                ip_block,
                count,
                cidr_bits,
            } => Ok(Value::deferred(Deferred::Cidr {
                ip_block: self.resolve(owner, ip_block)?,
                count: self.resolve(owner, count)?,
                cidr_bits: self.resolve(owner, cidr_bits)?,
            })),
        }
    }

    fn resolve_ref(&mut self, owner: &str, name: &str) -> SynthResult<Value> {
        if let Some(param) = self.template.parameter(name) {
            return self.parameter_value(param);
        }
        if self.template.resource(name).is_some() {
            self.ensure_created(owner, name)?;
            return Ok(Value::deferred(Deferred::Ref {
                logical_id: name.to_string(),
            }));
        }
        match PseudoParameter::from_name(name) {
            Some(PseudoParameter::NoValue) => Ok(Value::Null),
            Some(pseudo) => Ok(match self.ctx.pseudo_value(pseudo) {
                Some(value) if pseudo.is_list() => Value::List(
                    value
                        .split(',')
                        .filter(|s| !s.is_empty())
                        .map(|s| Value::String(s.trim().to_string()))
                        .collect(),
                ),
                Some(value) => Value::String(value.to_string()),
                None => Value::deferred(Deferred::Pseudo(pseudo)),
            }),
            None => Err(SynthError::UnresolvedReference {
                logical_id: owner.to_string(),
                target: name.to_string(),
                reason: "not a declared parameter, resource or pseudo parameter".to_string(),
            }),
        }
    }

    fn resolve_get_att(&mut self, owner: &str, id: &str, attribute: &str) -> SynthResult<Value> {
        let resource = self
            .template
            .resource(id)
            .ok_or_else(|| SynthError::UnresolvedReference {
                logical_id: owner.to_string(),
                target: id.to_string(),
                reason: "not a declared resource".to_string(),
            })?;
        self.ensure_created(owner, id)?;
        Ok(Value::deferred(Deferred::GetAtt {
            logical_id: id.to_string(),
            attribute: attribute.to_string(),
            custom: resource.resource_type.is_custom(),
        }))
    }

    /// Fail if `target` is a resource that this run does not create.
    fn ensure_created(&mut self, owner: &str, target: &str) -> SynthResult<()> {
        let Some(condition) = self
            .template
            .resource(target)
            .and_then(|r| r.condition.as_deref())
        else {
            return Ok(());
        };
        if self.evaluate_condition(condition)?.is_possible() {
            Ok(())
        } else {
            Err(SynthError::UnresolvedReference {
                logical_id: owner.to_string(),
                target: target.to_string(),
                reason: format!("not created because condition '{condition}' is false"),
            })
        }
    }

    fn parameter_value(&mut self, param: &Parameter) -> SynthResult<Value> {
        let name = &param.logical_id;
        if let Some(value) = self.ctx.parameter_values.get(name) {
            return Ok(value.clone());
        }

        let raw = match self.ctx.parameter_override(name) {
            Some(value) => {
                if !param.allows(value) {
                    return Err(SynthError::ParameterValueNotAllowed {
                        parameter: name.clone(),
                        value: value.to_string(),
                        allowed: param.allowed_values.join(", "),
                    });
                }
                value.to_string()
            }
            None => param
                .default
                .clone()
                .ok_or_else(|| SynthError::UnresolvedParameter {
                    parameter: name.clone(),
                })?,
        };

        let not_a_number = |value: &str| SynthError::ParameterValueNotAllowed {
            parameter: name.clone(),
            value: value.to_string(),
            allowed: "a number".to_string(),
        };
        let number = |value: &str| -> SynthResult<Value> {
            let value = value.trim();
            value
                .parse::<i64>()
                .map(Value::Number)
                .or_else(|_| value.parse::<f64>().map(Value::Double))
                .map_err(|_| not_a_number(value))
        };

        let value = match &param.parameter_type {
            ParameterType::Ssm(type_name) => {
                return Err(unsupported(
                    name,
                    "Ref",
                    format!("'{type_name}' values are read from SSM at deploy time"),
                ));
            }
            ParameterType::Number => number(&raw)?,
            ParameterType::NumberList => Value::List(
                raw.split(',')
                    .map(|item| number(item))
                    .collect::<SynthResult<_>>()?,
            ),
            ParameterType::CommaDelimitedList => Value::List(
                raw.split(',')
                    .map(|item| Value::String(item.trim().to_string()))
                    .collect(),
            ),
            ParameterType::String | ParameterType::AwsSpecific(_) => Value::String(raw),
        };

        self.ctx
            .parameter_values
            .insert(name.clone(), value.clone());
        Ok(value)
    }

    fn resolve_find_in_map(
        &mut self,
        owner: &str,
        mapping: &Expr,
        top_key: &Expr,
        second_key: &Expr,
    ) -> SynthResult<Value> {
        let name = match self.resolve(owner, mapping)? {
            Value::String(name) => name,
            _ => {
                return Err(unsupported(
                    owner,
                    "Fn::FindInMap",
                    "the mapping name must resolve to a literal string",
                ));
            }
        };
        let table = self
            .template
            .mapping(&name)
            .ok_or_else(|| SynthError::UnresolvedReference {
                logical_id: owner.to_string(),
                target: name.clone(),
                reason: "not a declared mapping".to_string(),
            })?;

        let top = self.resolve(owner, top_key)?;
        let second = self.resolve(owner, second_key)?;
        let key_not_found = |key: &str| SynthError::MappingKeyNotFound {
            logical_id: owner.to_string(),
            mapping: name.clone(),
            key: key.to_string(),
        };

        if let Some(top) = top.scalar_text()
            && !table.contains_top_key(&top)
        {
            return Err(key_not_found(&top));
        }

        match (top.scalar_text(), second.scalar_text()) {
            (Some(top), Some(second)) => {
                let memo_key = (name.clone(), top, second);
                if let Some(value) = self.ctx.lookups.get(&memo_key) {
                    return Ok(value.clone());
                }
                let value = table
                    .get(&memo_key.1, &memo_key.2)
                    .map(mapping_value)
                    .ok_or_else(|| key_not_found(&memo_key.2))?;
                self.ctx.lookups.insert(memo_key, value.clone());
                Ok(value)
            }
            _ if top.is_string_like() && second.is_string_like() => {
                self.ctx.deferred_mappings.insert(name.clone());
                Ok(Value::deferred(Deferred::FindInMap {
                    mapping: name,
                    top_key: top,
                    second_key: second,
                }))
            }
            _ => Err(unsupported(
                owner,
                "Fn::FindInMap",
                "mapping keys must be strings",
            )),
        }
    }

    fn resolve_select(&mut self, owner: &str, index: &Expr, list: &Expr) -> SynthResult<Value> {
        let index = match self.resolve(owner, index)? {
            Value::Number(n) if n >= 0 => n as usize,
            Value::String(s) => s.trim().parse::<usize>().map_err(|_| {
                unsupported(owner, "Fn::Select", format!("'{s}' is not a valid index"))
            })?,
            _ => {
                return Err(unsupported(
                    owner,
                    "Fn::Select",
                    "the index must be a non-negative literal number",
                ));
            }
        };

        match self.resolve(owner, list)? {
            Value::List(items) => {
                let len = items.len();
                items
                    .into_iter()
                    .nth(index)
                    .ok_or_else(|| SynthError::IndexOutOfRange {
                        logical_id: owner.to_string(),
                        index,
                        len,
                    })
            }
            list if list.is_list_like() => {
                Ok(Value::deferred(Deferred::Select { index, list }))
            }
            _ => Err(unsupported(
                owner,
                "Fn::Select",
                "the second argument must be a list",
            )),
        }
    }

    fn resolve_sub(
        &mut self,
        owner: &str,
        parts: &[SubPart],
        variables: &IndexMap<String, Expr>,
    ) -> SynthResult<Value> {
        let mut values: Vec<Value> = Vec::with_capacity(parts.len());
        for part in parts {
            let value = match part {
                SubPart::Text(text) => Value::String(text.clone()),
                SubPart::Variable(name) => match variables.get(name) {
                    Some(expr) => self.resolve(owner, expr)?,
                    None => self.resolve_sub_variable(owner, name)?,
                },
            };

            // Adjacent literal text is merged.
            match value.scalar_text() {
                Some(text) => match values.last_mut() {
                    Some(Value::String(previous)) => previous.push_str(&text),
                    _ => values.push(Value::String(text)),
                },
                None => values.push(value),
            }
        }

        match values.len() {
            0 => Ok(Value::String(String::new())),
            1 if values[0].is_string_like() => Ok(values.remove(0)),
            _ => join(owner, "Fn::Sub", "", Value::List(values)),
        }
    }

    /// `${Name}` falls back to a `Ref`, `${Resource.Attribute}` to a `Fn::GetAtt`.
    fn resolve_sub_variable(&mut self, owner: &str, name: &str) -> SynthResult<Value> {
        if let Some((id, attribute)) = name.split_once('.')
            && self.template.resource(id).is_some()
        {
            return self.resolve_get_att(owner, id, attribute);
        }
        self.resolve_ref(owner, name)
    }
}

/// Fold a join when every element is a literal scalar.
fn join(owner: &str, function: &str, delimiter: &str, items: Value) -> SynthResult<Value> {
    match items {
        Value::List(values) => {
            if values.iter().any(|v| !v.is_string_like() && v.scalar_text().is_none()) {
                return Err(unsupported(owner, function, "every element must be a string"));
            }
            if values.iter().all(Value::is_concrete) {
                let texts: Vec<String> = values.iter().filter_map(Value::scalar_text).collect();
                Ok(Value::String(texts.join(delimiter)))
            } else {
                Ok(Value::deferred(Deferred::Join {
                    delimiter: delimiter.to_string(),
                    items: Value::List(values),
                }))
            }
        }
        items if items.is_list_like() => Ok(Value::deferred(Deferred::Join {
            delimiter: delimiter.to_string(),
            items,
        })),
        _ => Err(unsupported(owner, function, "the second argument must be a list")),
    }
}
