//! Settings Module
//!
//! Optional TOML file tuning the operational side of a run. The injected
//! import and decorator names are fixed and not configurable.
//!
//! ```toml
//! [call_graph]
//! enabled = true
//! program = "pycg"
//!
//! [output]
//! indent_width = 4
//! dump_ast = true
//! ```

use std::fs;
use std::path::Path;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub call_graph: CallGraphSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallGraphSettings {
    /// Run the call-graph tool at all
    pub enabled: bool,
    /// Executable looked up in PATH
    pub program: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Spaces per indentation level in the regenerated source
    pub indent_width: usize,
    /// Write `<file>_ast.json` next to the working copy before mutation
    pub dump_ast: bool,
}

impl Default for CallGraphSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            program: "pycg".to_string(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            indent_width: 4,
            dump_ast: true,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.output.indent_width == 0 {
            bail!("output.indent_width must be at least 1");
        }
        if self.call_graph.enabled && self.call_graph.program.trim().is_empty() {
            bail!("call_graph.program must not be empty when the call graph is enabled");
        }
        Ok(())
    }
}
