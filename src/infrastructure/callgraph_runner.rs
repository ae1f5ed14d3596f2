//! Call Graph Runner.
//!
//! Invokes PyCG (https://github.com/vitsalis/PyCG) against the staged copy
//! so a call graph JSON sits next to the instrumented sources. The artifact
//! is not read back; a missing tool or a failing run is only logged.

use std::path::Path;
use std::process::{Command, ExitStatus};
use anyhow::{Context, Result};

use crate::ports::{CallGraphGenerator, Reporter};

pub struct PycgRunner {
    program: String,
}

impl PycgRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for PycgRunner {
    fn default() -> Self {
        Self::new("pycg")
    }
}

impl CallGraphGenerator for PycgRunner {
    fn generate(&self, package: &Path, entry: &Path, output: &Path, reporter: &dyn Reporter) {
        let spec = build_command_spec(&self.program, package, entry, output);
        reporter.debug(&format!(
            "Call tree is written to the file: {}",
            output.display()
        ));

        // Exit status is not inspected.
        match run_command(&spec) {
            Ok(status) => reporter.debug(&format!("{} finished with {}", spec.program, status)),
            Err(e) => reporter.debug(&format!("{:#}", e)),
        }
    }
}

/// Call-graph generation switched off in the settings.
pub struct DisabledCallGraph;

impl CallGraphGenerator for DisabledCallGraph {
    fn generate(&self, _package: &Path, _entry: &Path, _output: &Path, reporter: &dyn Reporter) {
        reporter.debug("Call graph generation is disabled");
    }
}

fn run_command(spec: &CallGraphCommandSpec) -> Result<ExitStatus> {
    Command::new(&spec.program)
        .args(&spec.args)
        .status()
        .with_context(|| format!("Failed to execute {}", spec.program))
}

// ═══════════════════════════════════════════════════════════════════════════
// Testable Command Builder
// ═══════════════════════════════════════════════════════════════════════════

/// Describes the command that would be run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallGraphCommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

/// `<program> --package <package> <package>/<entry> -o <output>`
pub fn build_command_spec(
    program: &str,
    package: &Path,
    entry: &Path,
    output: &Path,
) -> CallGraphCommandSpec {
    CallGraphCommandSpec {
        program: program.to_string(),
        args: vec![
            "--package".to_string(),
            package.display().to_string(),
            package.join(entry).display().to_string(),
            "-o".to_string(),
            output.display().to_string(),
        ],
    }
}
