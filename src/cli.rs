// Command-line surface for decoprof.

use std::path::PathBuf;
use clap::Parser;

use crate::application::{check_source_path, InjectRequest};
use crate::common::error::{InjectError, Result};
use crate::domain::profiler::ProfilerKind;
use crate::domain::target_path::TargetPath;

/// Every flag is optional to clap so that missing ones are reported by
/// `into_request` with a readable message and exit code 1.
#[derive(Parser, Debug)]
#[command(
    name = "decoprof",
    author,
    version,
    about = "Inject a profiling decorator into one function of a staged copy of a Python project.",
    long_about = None
)]
pub struct Cli {
    /// Source file, relative to the project root
    #[arg(short = 'f', value_name = "filename")]
    pub file: Option<String>,

    /// Project root directory
    #[arg(short = 'p', value_name = "project path")]
    pub project: Option<String>,

    /// Function to instrument. Prefix inner functions and methods with the
    /// enclosing function or class, e.g. "-n Vector.add"
    #[arg(short = 'n', value_name = "function name")]
    pub name: Option<String>,

    /// Profiler type (cpu, mem, call_stack, thread, line)
    #[arg(short = 't', value_name = "profiler type", default_value = "cpu")]
    pub profiler: String,

    /// Optional TOML settings file
    #[arg(short = 'c', long = "config", value_name = "file")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long)]
    pub verbose: bool,
}

impl Cli {
    /// Check mandatory flags and the profiler token.
    pub fn into_request(self) -> Result<InjectRequest> {
        let file = require(self.file, "Filename")?;
        let project = require(self.project, "Project name")?;
        let name = require(self.name, "Function name")?;

        let profiler = ProfilerKind::from_token(&self.profiler).ok_or_else(|| {
            InjectError::Argument(format!(
                "Unknown profiler type \"{}\". Available options: {}",
                self.profiler,
                ProfilerKind::available_tokens()
            ))
        })?;

        let file = PathBuf::from(file);
        check_source_path(&file)?;

        Ok(InjectRequest {
            project: PathBuf::from(project),
            file,
            target: TargetPath::parse(&name)?,
            profiler,
        })
    }
}

fn require(value: Option<String>, what: &str) -> Result<String> {
    value.ok_or_else(|| InjectError::Argument(format!("{} is not specified.", what)))
}
