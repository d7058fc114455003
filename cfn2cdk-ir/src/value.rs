use cfn2cdk_core::PseudoParameter;
use indexmap::IndexMap;
use serde::Serialize;

/// How an object's keys are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ObjectKind {
    /// A property struct: keys follow the target language's property naming.
    Struct,
    /// Free-form JSON (policy documents, custom resource properties): keys are kept verbatim.
    Json,
    /// A `{Key, Value}` resource tag, emitted as the CDK's `CfnTag` type.
    Tag,
}

/// A property value after evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Null,
    Bool(bool),
    Number(i64),
    Double(f64),
    String(String),
    List(Vec<Value>),
    Object {
        kind: ObjectKind,
        entries: IndexMap<String, Value>,
    },
    Deferred(Box<Deferred>),
}

/// An expression that can only be computed at deploy time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Deferred {
    /// `Ref` to a resource.
    Ref { logical_id: String },
    /// `Fn::GetAtt` on a resource; `custom` marks untyped custom resources.
    GetAtt {
        logical_id: String,
        attribute: String,
        custom: bool,
    },
    /// A pseudo parameter the caller did not supply.
    Pseudo(PseudoParameter),
    /// Mapping lookup with at least one deploy-time key.
    FindInMap {
        mapping: String,
        top_key: Value,
        second_key: Value,
    },
    Select { index: usize, list: Value },
    Split { delimiter: String, source: Value },
    /// `Fn::Join`, and `Fn::Sub` as a join with an empty delimiter.
    Join { delimiter: String, items: Value },
    ImportValue(Value),
    Base64(Value),
    GetAzs(Value),
    Cidr {
        ip_block: Value,
        count: Value,
        cidr_bits: Value,
    },
    /// `Fn::If` on a deploy-time condition.
    If {
        condition: String,
        when_true: Value,
        when_false: Value,
    },
    /// `AWS::NoValue` as a branch of a deploy-time `Fn::If`.
    NoValue,
}

impl Value {
    /// Wrap a deferred expression.
    pub fn deferred(deferred: Deferred) -> Self {
        Self::Deferred(Box::new(deferred))
    }

    /// Returns the string literal if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The canonical text of a scalar (`1`, `true`, `abc`).
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Number(n) => Some(n.to_string()),
            Self::Double(d) => Some(d.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Whether the value contains no deferred expression.
    pub fn is_concrete(&self) -> bool {
        match self {
            Self::Deferred(_) => false,
            Self::List(items) => items.iter().all(Value::is_concrete),
            Self::Object { entries, .. } => entries.values().all(Value::is_concrete),
            _ => true,
        }
    }

    /// Whether the value is a string at deploy time.
    pub fn is_string_like(&self) -> bool {
        match self {
            Self::String(_) => true,
            Self::Deferred(d) => !d.is_list(),
            _ => false,
        }
    }

    /// Whether the value is a `{Key, Value}` resource tag.
    pub fn is_tag(&self) -> bool {
        matches!(
            self,
            Self::Object {
                kind: ObjectKind::Tag,
                ..
            }
        )
    }

    /// Whether the value is a list at deploy time.
    pub fn is_list_like(&self) -> bool {
        match self {
            Self::List(_) => true,
            Self::Deferred(d) => d.is_list(),
            _ => false,
        }
    }

    /// Visit every deferred node, outermost first.
    pub fn visit_deferred<'a>(&'a self, f: &mut impl FnMut(&'a Deferred)) {
        match self {
            Self::List(items) => items.iter().for_each(|v| v.visit_deferred(f)),
            Self::Object { entries, .. } => entries.values().for_each(|v| v.visit_deferred(f)),
            Self::Deferred(d) => {
                f(d);
                d.children().for_each(|v| v.visit_deferred(f));
            }
            _ => {}
        }
    }

    /// Logical IDs of resources this value refers to.
    pub fn referenced_resources(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.visit_deferred(&mut |d| match d {
            Deferred::Ref { logical_id } | Deferred::GetAtt { logical_id, .. } => {
                ids.push(logical_id.as_str())
            }
            _ => {}
        });
        ids
    }
}

impl Deferred {
    /// Whether this expression yields a list.
    pub fn is_list(&self) -> bool {
        match self {
            Self::Pseudo(p) => p.is_list(),
            Self::Split { .. } | Self::GetAzs(_) | Self::Cidr { .. } => true,
            Self::If { when_true, .. } => when_true.is_list_like(),
            _ => false,
        }
    }

    /// Direct value children.
    pub fn children(&self) -> impl Iterator<Item = &Value> {
        let children: Vec<&Value> = match self {
            Self::Ref { .. } | Self::GetAtt { .. } | Self::Pseudo(_) | Self::NoValue => Vec::new(),
            Self::FindInMap {
                top_key,
                second_key,
                ..
            } => vec![top_key, second_key],
            Self::Select { list, .. } => vec![list],
            Self::Split { source, .. } => vec![source],
            Self::Join { items, .. } => vec![items],
            Self::ImportValue(v) | Self::Base64(v) | Self::GetAzs(v) => vec![v],
            Self::Cidr {
                ip_block,
                count,
                cidr_bits,
            } => vec![ip_block, count, cidr_bits],
            Self::If {
                when_true,
                when_false,
                ..
            } => vec![when_true, when_false],
        };
        children.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(id: &str) -> Value {
        Value::deferred(Deferred::Ref {
            logical_id: id.into(),
        })
    }

    #[test]
    fn test_is_concrete() {
        assert!(Value::List(vec![Value::String("a".into()), Value::Number(1)]).is_concrete());
        assert!(!Value::List(vec![reference("Vpc")]).is_concrete());
    }

    #[test]
    fn test_referenced_resources_nested() {
        let value = Value::Object {
            kind: ObjectKind::Struct,
            entries: IndexMap::from([
                ("a".to_string(), reference("Vpc")),
                (
                    "b".to_string(),
                    Value::deferred(Deferred::Select {
                        index: 0,
                        list: Value::List(vec![Value::deferred(Deferred::GetAtt {
                            logical_id: "Subnet".into(),
                            attribute: "SubnetId".into(),
                            custom: false,
                        })]),
                    }),
                ),
            ]),
        };

        assert_eq!(value.referenced_resources(), vec!["Vpc", "Subnet"]);
    }

    #[test]
    fn test_deploy_time_if_visits_both_branches() {
        let value = Value::deferred(Deferred::If {
            condition: "IsUsEast1".into(),
            when_true: reference("Topic"),
            when_false: Value::deferred(Deferred::NoValue),
        });

        assert_eq!(value.referenced_resources(), vec!["Topic"]);
        assert!(value.is_string_like());
    }

    #[test]
    fn test_string_and_list_like() {
        assert!(reference("Vpc").is_string_like());
        let azs = Value::deferred(Deferred::GetAzs(Value::String(String::new())));
        assert!(azs.is_list_like());
        assert!(!azs.is_string_like());
        assert_eq!(Value::Bool(true).scalar_text().as_deref(), Some("true"));
    }
}
