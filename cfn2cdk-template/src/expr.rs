//! Typed expression tree for property values and condition bodies.

use indexmap::IndexMap;
use serde::Serialize;

/// A template value: a literal, a container, or an intrinsic function call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Null,
    Bool(bool),
    Number(i64),
    Double(f64),
    String(String),
    List(Vec<Expr>),
    Object(IndexMap<String, Expr>),
    Intrinsic(Box<Intrinsic>),
}

/// An intrinsic function call with its argument sub-expressions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Intrinsic {
    Ref(String),
    GetAtt {
        logical_id: String,
        attribute: String,
    },
    FindInMap {
        mapping: Expr,
        top_key: Expr,
        second_key: Expr,
    },
    Select {
        index: Expr,
        list: Expr,
    },
    Split {
        delimiter: String,
        source: Expr,
    },
    Join {
        delimiter: String,
        items: Expr,
    },
    Sub {
        parts: Vec<SubPart>,
        variables: IndexMap<String, Expr>,
    },
    If {
        condition: String,
        when_true: Expr,
        when_false: Expr,
    },
    Equals(Expr, Expr),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Expr),
    Condition(String),
    ImportValue(Expr),
    Base64(Expr),
    GetAzs(Expr),
    Cidr {
        ip_block: Expr,
        count: Expr,
        cidr_bits: Expr,
    },
}

impl Intrinsic {
    /// The long-form function name (`Fn::Select`, `Ref`).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ref(_) => "Ref",
            Self::GetAtt { .. } => "Fn::GetAtt",
            Self::FindInMap { .. } => "Fn::FindInMap",
            Self::Select { .. } => "Fn::Select",
            Self::Split { .. } => "Fn::Split",
            Self::Join { .. } => "Fn::Join",
            Self::Sub { .. } => "Fn::Sub",
            Self::If { .. } => "Fn::If",
            Self::Equals(..) => "Fn::Equals",
            Self::And(_) => "Fn::And",
            Self::Or(_) => "Fn::Or",
            Self::Not(_) => "Fn::Not",
            Self::Condition(_) => "Condition",
            Self::ImportValue(_) => "Fn::ImportValue",
            Self::Base64(_) => "Fn::Base64",
            Self::GetAzs(_) => "Fn::GetAZs",
            Self::Cidr { .. } => "Fn::Cidr",
        }
    }
}

/// A segment of an `Fn::Sub` template string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SubPart {
    Text(String),
    /// `${Name}`, `${Resource.Attribute}` or `${AWS::Region}`
    Variable(String),
}

/// A name referenced from inside an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference<'a> {
    /// `Ref` target: parameter, resource or pseudo parameter.
    Ref(&'a str),
    /// `Fn::GetAtt` target resource and attribute.
    GetAtt(&'a str, &'a str),
    /// `Fn::If` or `Condition` target.
    Condition(&'a str),
    /// Literal `Fn::FindInMap` mapping name.
    Mapping(&'a str),
    /// `Fn::Sub` variable that is not bound by the explicit variable map.
    SubVariable(&'a str),
}

impl<'a> Reference<'a> {
    /// The resource logical ID this reference points at, when it can point at one.
    ///
    /// `SubVariable("Res.Attr")` yields `Res`.
    pub fn target(&self) -> Option<&'a str> {
        match *self {
            Reference::Ref(name) => Some(name),
            Reference::GetAtt(name, _) => Some(name),
            Reference::SubVariable(name) => Some(name.split('.').next().unwrap_or(name)),
            Reference::Condition(_) | Reference::Mapping(_) => None,
        }
    }
}

impl Expr {
    /// Create a string literal.
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Create an intrinsic node.
    pub fn intrinsic(intrinsic: Intrinsic) -> Self {
        Self::Intrinsic(Box::new(intrinsic))
    }

    /// Returns the intrinsic call if this is one.
    pub fn as_intrinsic(&self) -> Option<&Intrinsic> {
        match self {
            Self::Intrinsic(i) => Some(i),
            _ => None,
        }
    }

    /// Returns the string literal if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Visit every reference in this expression, including both branches of `Fn::If`.
    pub fn visit_references<'a>(&'a self, f: &mut impl FnMut(Reference<'a>)) {
        match self {
            Expr::Null | Expr::Bool(_) | Expr::Number(_) | Expr::Double(_) | Expr::String(_) => {}
            Expr::List(items) => items.iter().for_each(|item| item.visit_references(f)),
            Expr::Object(entries) => entries.values().for_each(|v| v.visit_references(f)),
            Expr::Intrinsic(intrinsic) => intrinsic.visit_references(f),
        }
    }

    /// Collect every reference in this expression.
    pub fn references(&self) -> Vec<Reference<'_>> {
        let mut refs = Vec::new();
        self.visit_references(&mut |r| refs.push(r));
        refs
    }
}

impl Intrinsic {
    fn visit_references<'a>(&'a self, f: &mut impl FnMut(Reference<'a>)) {
        match self {
            Intrinsic::Ref(name) => f(Reference::Ref(name)),
            Intrinsic::GetAtt {
                logical_id,
                attribute,
            } => f(Reference::GetAtt(logical_id, attribute)),
            Intrinsic::FindInMap {
                mapping,
                top_key,
                second_key,
            } => {
                match mapping.as_str() {
                    Some(name) => f(Reference::Mapping(name)),
                    None => mapping.visit_references(f),
                }
                top_key.visit_references(f);
                second_key.visit_references(f);
            }
            Intrinsic::Select { index, list } => {
                index.visit_references(f);
                list.visit_references(f);
            }
            Intrinsic::Split { source, .. } => source.visit_references(f),
            Intrinsic::Join { items, .. } => items.visit_references(f),
            Intrinsic::Sub { parts, variables } => {
                for part in parts {
                    if let SubPart::Variable(name) = part
                        && !variables.contains_key(name)
                    {
                        f(Reference::SubVariable(name));
                    }
                }
                variables.values().for_each(|v| v.visit_references(f));
            }
            Intrinsic::If {
                condition,
                when_true,
                when_false,
            } => {
                f(Reference::Condition(condition));
                when_true.visit_references(f);
                when_false.visit_references(f);
            }
            Intrinsic::Equals(a, b) => {
                a.visit_references(f);
                b.visit_references(f);
            }
            Intrinsic::And(items) | Intrinsic::Or(items) => {
                items.iter().for_each(|item| item.visit_references(f))
            }
            Intrinsic::Not(inner)
            | Intrinsic::ImportValue(inner)
            | Intrinsic::Base64(inner)
            | Intrinsic::GetAzs(inner) => inner.visit_references(f),
            Intrinsic::Condition(name) => f(Reference::Condition(name)),
            Intrinsic::Cidr {
                ip_block,
                count,
                cidr_bits,
            } => {
                ip_block.visit_references(f);
                count.visit_references(f);
                cidr_bits.visit_references(f);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_references_cover_both_if_branches() {
        let expr = Expr::intrinsic(Intrinsic::If {
            condition: "IsProd".into(),
            when_true: Expr::intrinsic(Intrinsic::Ref("Private".into())),
            when_false: Expr::intrinsic(Intrinsic::GetAtt {
                logical_id: "Public".into(),
                attribute: "GroupId".into(),
            }),
        });

        assert_eq!(
            expr.references(),
            vec![
                Reference::Condition("IsProd"),
                Reference::Ref("Private"),
                Reference::GetAtt("Public", "GroupId"),
            ]
        );
    }

    #[test]
    fn test_sub_variables_bound_locally_are_not_references() {
        let mut variables = IndexMap::new();
        variables.insert("Suffix".to_string(), Expr::string("x"));
        let expr = Expr::intrinsic(Intrinsic::Sub {
            parts: vec![
                SubPart::Variable("Bucket.Arn".into()),
                SubPart::Text("/".into()),
                SubPart::Variable("Suffix".into()),
            ],
            variables,
        });

        let refs = expr.references();
        assert_eq!(refs, vec![Reference::SubVariable("Bucket.Arn")]);
        assert_eq!(refs[0].target(), Some("Bucket"));
    }
}
