//! The in-memory template model.

mod mapping;
mod parameter;
mod resource;

use std::{path::Path, str::FromStr};

use indexmap::IndexMap;
pub use mapping::{Mapping, MappingValue};
pub use parameter::{Parameter, ParameterType};
pub use resource::{Output, Resource};
use serde::Serialize;

use crate::{Error, Expr, Result};

/// A named boolean expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    pub logical_id: String,
    pub expr: Expr,
}

/// What kind of entity a logical ID names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Parameter,
    Resource,
    Pseudo,
}

/// A parsed CloudFormation template.
///
/// Every section keeps declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
    pub format_version: Option<String>,
    pub description: Option<String>,
    pub transforms: Vec<String>,
    pub parameters: IndexMap<String, Parameter>,
    pub mappings: IndexMap<String, Mapping>,
    pub conditions: IndexMap<String, Condition>,
    pub resources: IndexMap<String, Resource>,
    pub outputs: IndexMap<String, Output>,
}

impl FromStr for Template {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        crate::parse_template(s, "template")
    }
}

impl Template {
    /// Read and parse a template file (JSON or YAML).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        Self::from_str_with_filename(&content, &path.display().to_string())
    }

    /// Parse a template, naming `filename` in diagnostics.
    pub fn from_str_with_filename(s: &str, filename: &str) -> Result<Self> {
        crate::parse_template(s, filename)
    }

    /// Classify a `Ref` target.
    pub fn entity_kind(&self, name: &str) -> Option<EntityKind> {
        if self.parameters.contains_key(name) {
            Some(EntityKind::Parameter)
        } else if self.resources.contains_key(name) {
            Some(EntityKind::Resource)
        } else if cfn2cdk_core::PseudoParameter::from_name(name).is_some() {
            Some(EntityKind::Pseudo)
        } else {
            None
        }
    }

    /// Get a parameter by logical ID.
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }

    /// Get a mapping by logical ID.
    pub fn mapping(&self, name: &str) -> Option<&Mapping> {
        self.mappings.get(name)
    }

    /// Get a condition by logical ID.
    pub fn condition(&self, name: &str) -> Option<&Condition> {
        self.conditions.get(name)
    }

    /// Get a resource by logical ID.
    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.get(name)
    }

    /// Position of a resource in declaration order.
    pub fn resource_index(&self, name: &str) -> Option<usize> {
        self.resources.get_index_of(name)
    }
}
