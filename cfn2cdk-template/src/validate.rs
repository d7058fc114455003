//! Reference validation for parsed templates.

use crate::{EntityKind, Expr, Reference, Result, SourceContext, Template};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Condition,
    Resource,
    Output,
}

/// Check that every reference resolves to a declared entity of the right kind.
pub(crate) fn validate(template: &Template, source: &SourceContext) -> Result<()> {
    let validator = Validator { template, source };
    validator.check_namespaces()?;
    validator.check_parameters()?;

    for condition in template.conditions.values() {
        validator.check_expr(&condition.logical_id, &condition.expr, Scope::Condition)?;
    }

    for resource in template.resources.values() {
        let id = &resource.logical_id;
        validator.check_condition_name(id, resource.condition.as_deref())?;
        for dep in &resource.depends_on {
            if !template.resources.contains_key(dep) {
                return Err(source.unresolved_reference_error(dep, "resource", id));
            }
        }
        for expr in resource.expressions() {
            validator.check_expr(id, expr, Scope::Resource)?;
        }
    }

    for output in template.outputs.values() {
        let id = &output.logical_id;
        validator.check_condition_name(id, output.condition.as_deref())?;
        for expr in output.expressions() {
            validator.check_expr(id, expr, Scope::Output)?;
        }
    }

    Ok(())
}

struct Validator<'a> {
    template: &'a Template,
    source: &'a SourceContext,
}

impl Validator<'_> {
    fn check_namespaces(&self) -> Result<()> {
        match self
            .template
            .parameters
            .keys()
            .find(|name| self.template.resources.contains_key(*name))
        {
            Some(name) => Err(self.source.duplicate_error(name, "Parameters", "Resources")),
            None => Ok(()),
        }
    }

    fn check_parameters(&self) -> Result<()> {
        for param in self.template.parameters.values() {
            if let Some(default) = &param.default
                && !param.allows(default)
            {
                return Err(self.source.validation_error(
                    &param.logical_id,
                    format!(
                        "default '{}' of parameter '{}' is not one of its AllowedValues",
                        default, param.logical_id
                    ),
                ));
            }
        }
        Ok(())
    }

    fn check_condition_name(&self, owner: &str, condition: Option<&str>) -> Result<()> {
        match condition {
            Some(name) if !self.template.conditions.contains_key(name) => {
                Err(self.source.unresolved_reference_error(name, "condition", owner))
            }
            _ => Ok(()),
        }
    }

    fn check_expr(&self, owner: &str, expr: &Expr, scope: Scope) -> Result<()> {
        let mut first_error = None;
        expr.visit_references(&mut |reference| {
            if first_error.is_none()
                && let Err(err) = self.check_reference(owner, reference, scope)
            {
                first_error = Some(err);
            }
        });
        first_error.map_or(Ok(()), Err)
    }

    fn check_ref_target(&self, owner: &str, name: &str, scope: Scope) -> Result<()> {
        match self.template.entity_kind(name) {
            None => Err(self.source.unresolved_reference_error(
                name,
                "parameter, resource or pseudo parameter",
                owner,
            )),
            Some(EntityKind::Resource) if scope == Scope::Condition => {
                Err(self.source.validation_error(
                    owner,
                    format!("condition '{owner}' cannot reference resource '{name}'"),
                ))
            }
            Some(_) => Ok(()),
        }
    }

    fn check_reference(&self, owner: &str, reference: Reference<'_>, scope: Scope) -> Result<()> {
        let template = self.template;
        match reference {
            Reference::Ref(name) => self.check_ref_target(owner, name, scope),
            Reference::GetAtt(..) if scope == Scope::Condition => Err(self.source.validation_error(
                owner,
                format!("Fn::GetAtt is not allowed in condition '{owner}'"),
            )),
            Reference::GetAtt(name, _) => {
                if template.resources.contains_key(name) {
                    Ok(())
                } else {
                    Err(self.source.unresolved_reference_error(name, "resource", owner))
                }
            }
            Reference::Condition(name) => self.check_condition_name(owner, Some(name)),
            Reference::Mapping(name) => {
                if template.mappings.contains_key(name) {
                    Ok(())
                } else {
                    Err(self.source.unresolved_reference_error(name, "mapping", owner))
                }
            }
            Reference::SubVariable(name) => match name.split_once('.') {
                Some((resource, _)) if template.resources.contains_key(resource) => {
                    if scope == Scope::Condition {
                        Err(self.source.validation_error(
                            owner,
                            format!("condition '{owner}' cannot reference resource '{resource}'"),
                        ))
                    } else {
                        Ok(())
                    }
                }
                Some(_) => Err(self
                    .source
                    .unresolved_reference_error(name, "resource attribute", owner)),
                None => self.check_ref_target(owner, name, scope),
            },
        }
    }
}
