//! Check command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from template validation.
#[derive(Debug)]
pub struct CheckReport {
    pub template_path: PathBuf,
    pub stack_name: String,
    /// Resources in instantiation order.
    pub order: Vec<String>,
    /// Mapping tables still needed at deploy time.
    pub mapping_count: usize,
    pub output_count: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Resolved conditions and skipped resources.
    pub infos: Vec<String>,
}

impl CheckReport {
    /// Whether the check passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        for error in &self.errors {
            out.error(error);
        }

        for warning in &self.warnings {
            out.warning(warning);
        }

        for info in &self.infos {
            out.preformatted(&format!("info: {}", info));
        }

        if !self.infos.is_empty() {
            out.newline();
        }

        if !self.is_valid() {
            return;
        }

        out.preformatted(&format!("✓ {} is valid", self.template_path.display()));
        out.newline();
        out.key_value("Class", &self.stack_name);
        out.key_value("Mappings", &self.mapping_count.to_string());
        out.key_value("Outputs", &self.output_count.to_string());
        out.section(&format!("Resources ({})", self.order.len()));
        for (i, id) in self.order.iter().enumerate() {
            out.numbered_item(i + 1, id);
        }
    }
}
