//! Two-level lookup tables used by `Fn::FindInMap`.

use indexmap::IndexMap;
use serde::Serialize;

/// A scalar or list stored in a mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MappingValue {
    String(String),
    Number(i64),
    Double(f64),
    Bool(bool),
    List(Vec<MappingValue>),
}

/// A declared mapping: top-level key -> second-level key -> value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mapping {
    pub logical_id: String,
    pub entries: IndexMap<String, IndexMap<String, MappingValue>>,
}

impl Mapping {
    /// Two-level lookup.
    pub fn get(&self, top_key: &str, second_key: &str) -> Option<&MappingValue> {
        self.entries.get(top_key)?.get(second_key)
    }

    /// Whether the top-level key exists.
    pub fn contains_top_key(&self, top_key: &str) -> bool {
        self.entries.contains_key(top_key)
    }
}
