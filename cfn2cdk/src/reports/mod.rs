//! Report data structures for commands.
//!
//! Commands build reports, then render them to an Output target.

mod check;
mod output;
mod synth;

pub use check::CheckReport;
pub use output::{Report, TerminalOutput};
pub use synth::{GenerationResult, PreviewFile, PreviewResult, SynthReport, WrittenResult};
