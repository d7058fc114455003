use cfn2cdk_core::{DeletionPolicy, ResourceType, StackKind};
use indexmap::IndexMap;
use serde::Serialize;

use crate::{DeployCondition, Value};

/// Stack IR - the language-agnostic result of synthesis.
#[derive(Debug, Clone, Serialize)]
pub struct StackIr {
    pub meta: StackMeta,
    /// AWS services whose construct modules the stack imports, sorted.
    pub services: Vec<String>,
    /// Mappings still needed at deploy time.
    pub mappings: Vec<MappingTable>,
    pub conditions: Vec<ResolvedCondition>,
    /// Conditions left to CloudFormation, each after the conditions it refers to.
    pub deploy_conditions: Vec<DeployCondition>,
    /// Constructs in dependency order.
    pub constructs: Vec<ConstructIr>,
    pub outputs: Vec<OutputIr>,
}

impl StackIr {
    /// Find a construct by logical ID.
    pub fn construct(&self, logical_id: &str) -> Option<&ConstructIr> {
        self.constructs.iter().find(|c| c.logical_id == logical_id)
    }

    /// Find a deploy-time condition by logical ID.
    pub fn deploy_condition(&self, logical_id: &str) -> Option<&DeployCondition> {
        self.deploy_conditions
            .iter()
            .find(|c| c.logical_id == logical_id)
    }

    /// Whether any construct is a custom resource.
    pub fn has_custom_resources(&self) -> bool {
        self.constructs.iter().any(|c| c.resource_type.is_custom())
    }
}

/// Name and shape of the generated class.
#[derive(Debug, Clone, Serialize)]
pub struct StackMeta {
    /// Class name (PascalCase).
    pub name: String,
    pub description: Option<String>,
    pub kind: StackKind,
}

/// A mapping emitted as a `CfnMapping` because a lookup key is deploy-time.
#[derive(Debug, Clone, Serialize)]
pub struct MappingTable {
    pub logical_id: String,
    pub entries: IndexMap<String, IndexMap<String, Value>>,
}

/// A condition and the value it resolved to.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedCondition {
    pub logical_id: String,
    pub value: bool,
}

/// One construct instantiation.
#[derive(Debug, Clone, Serialize)]
pub struct ConstructIr {
    pub logical_id: String,
    pub resource_type: ResourceType,
    /// Property values in template order, with removed (`AWS::NoValue`) entries dropped.
    pub properties: IndexMap<String, Value>,
    pub depends_on: Vec<String>,
    pub deletion_policy: Option<DeletionPolicy>,
    pub update_replace_policy: Option<DeletionPolicy>,
    pub metadata: Option<Value>,
    /// Deploy-time condition gating the construct.
    pub condition: Option<String>,
    /// Whether a later statement refers to this construct.
    pub referenced: bool,
}

impl ConstructIr {
    /// Whether the construct must be bound to a local identifier.
    pub fn needs_binding(&self) -> bool {
        self.referenced
            || !self.depends_on.is_empty()
            || self.deletion_policy.is_some()
            || self.update_replace_policy.is_some()
            || self.metadata.is_some()
            || self.condition.is_some()
    }
}

/// A stack output.
#[derive(Debug, Clone, Serialize)]
pub struct OutputIr {
    pub logical_id: String,
    pub value: Value,
    pub description: Option<String>,
    pub export_name: Option<Value>,
    /// Deploy-time condition gating the output.
    pub condition: Option<String>,
}
