//! Snapshot plugin for inspecting the pipeline state.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
};

use cfn2cdk_ir::StackIr;
use eyre::{Result, eyre};
use serde::Serialize;

use super::{CompilationContext, Diagnostic, Plugin};

/// The pipeline state after one phase.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseSnapshot {
    /// The phase that just completed.
    pub phase: String,

    /// Resolved conditions (available after the "conditions" phase).
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub conditions: BTreeMap<String, bool>,

    /// Instantiation order (available after the "order" phase).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<String>>,

    /// The stack IR (available after the "lower" phase).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ir: Option<StackIr>,

    /// Diagnostics collected so far.
    pub diagnostics: Vec<Diagnostic>,
}

/// A plugin that captures the pipeline state after each phase.
///
/// Backs the `--visualize` flag.
///
/// ```ignore
/// let pipeline = Pipeline::new().plugin(SnapshotPlugin::with_output_dir("debug"));
/// ```
pub struct SnapshotPlugin {
    snapshots: RwLock<Vec<PhaseSnapshot>>,
    output_dir: Option<PathBuf>,
}

impl SnapshotPlugin {
    pub fn new() -> Self {
        Self {
            snapshots: RwLock::new(Vec::new()),
            output_dir: None,
        }
    }

    /// A snapshot plugin that writes `<phase>.json` files into `output_dir`.
    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            snapshots: RwLock::new(Vec::new()),
            output_dir: Some(output_dir.into()),
        }
    }

    /// All snapshots collected so far.
    pub fn snapshots(&self) -> Vec<PhaseSnapshot> {
        self.snapshots
            .read()
            .map(|snapshots| snapshots.clone())
            .unwrap_or_default()
    }

    /// Write all snapshots to `dir`.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        for snapshot in self.snapshots() {
            write_snapshot(dir, &snapshot)?;
        }

        Ok(())
    }

    fn capture_snapshot(&self, phase: &str, ctx: &CompilationContext) -> Result<PhaseSnapshot> {
        let conditions = ctx
            .template
            .conditions
            .keys()
            .filter_map(|name| {
                ctx.resolution
                    .condition_value(name)
                    .map(|value| (name.clone(), value))
            })
            .collect();

        let snapshot = PhaseSnapshot {
            phase: phase.to_string(),
            conditions,
            order: ctx.order.clone(),
            ir: ctx.ir.clone(),
            diagnostics: ctx.diagnostics.clone(),
        };
        self.snapshots
            .write()
            .map_err(|_| eyre!("snapshot store poisoned"))?
            .push(snapshot.clone());
        Ok(snapshot)
    }
}

fn write_snapshot(dir: &Path, snapshot: &PhaseSnapshot) -> Result<()> {
    let path = dir.join(format!("{}.json", snapshot.phase));
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(&path, json)?;
    Ok(())
}

impl Default for SnapshotPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for SnapshotPlugin {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    fn on_after_phase(&self, phase: &str, ctx: &mut CompilationContext) -> Result<()> {
        let snapshot = self.capture_snapshot(phase, ctx)?;

        if let Some(ref dir) = self.output_dir {
            fs::create_dir_all(dir)?;
            write_snapshot(dir, &snapshot)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{Pipeline, StackSettings};

    #[test]
    fn test_snapshot_plugin_creation() {
        let plugin = SnapshotPlugin::new();
        assert!(plugin.snapshots().is_empty());
    }

    #[test]
    fn test_snapshots_written_per_phase() {
        let dir = tempfile::tempdir().unwrap();
        let template = cfn2cdk_template::parse_template(
            r#"
Conditions:
  Always: !Equals [a, a]
Resources:
  Topic:
    Type: AWS::SNS::Topic
    Condition: Always
"#,
            "test.yaml",
        )
        .unwrap();
        let ctx = CompilationContext::new(template, StackSettings::new("TestStack"));

        Pipeline::new()
            .plugin(SnapshotPlugin::with_output_dir(dir.path()))
            .run(ctx)
            .unwrap();

        for phase in ["validate", "conditions", "order", "lower"] {
            assert!(dir.path().join(format!("{phase}.json")).exists(), "{phase}");
        }
        let lower = fs::read_to_string(dir.path().join("lower.json")).unwrap();
        assert!(lower.contains("\"Always\": true"));
        assert!(lower.contains("\"constructs\""));
    }
}
