//! Resources and outputs.

use cfn2cdk_core::{DeletionPolicy, ResourceType};
use indexmap::IndexMap;
use serde::Serialize;

use crate::Expr;

/// A declared resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    pub logical_id: String,
    pub resource_type: ResourceType,
    pub properties: IndexMap<String, Expr>,
    pub condition: Option<String>,
    pub depends_on: Vec<String>,
    pub deletion_policy: Option<DeletionPolicy>,
    pub update_replace_policy: Option<DeletionPolicy>,
    pub metadata: Option<Expr>,
}

impl Resource {
    /// Every expression owned by this resource (properties then metadata).
    pub fn expressions(&self) -> impl Iterator<Item = &Expr> {
        self.properties.values().chain(self.metadata.iter())
    }
}

/// A declared stack output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Output {
    pub logical_id: String,
    pub value: Expr,
    pub description: Option<String>,
    pub export_name: Option<Expr>,
    pub condition: Option<String>,
}

impl Output {
    /// Value and export name expressions.
    pub fn expressions(&self) -> impl Iterator<Item = &Expr> {
        std::iter::once(&self.value).chain(self.export_name.iter())
    }
}
