use std::path::Path;

use crate::common::error::Result;
use crate::domain::ast::SyntaxTree;

/// Logging context handed to every step of a run.
pub trait Reporter {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Reads a source file into a syntax tree.
pub trait TreeLoader {
    fn load(&self, path: &Path, reporter: &dyn Reporter) -> Result<SyntaxTree>;
}

/// Turns a syntax tree back into source text.
pub trait TreeSerializer {
    fn render(&self, tree: &SyntaxTree) -> String;

    /// Overwrite `path` with the rendered tree.
    fn write(&self, tree: &SyntaxTree, path: &Path, reporter: &dyn Reporter) -> Result<()>;
}

/// An isolated copy of the project the run is allowed to modify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// `<basename>_<timestamp>`
    pub name: String,
    pub root: std::path::PathBuf,
}

impl Workspace {
    /// Where the call-graph tool writes its JSON output.
    pub fn call_graph_path(&self) -> std::path::PathBuf {
        self.root.join(format!("{}.json", self.name))
    }
}

pub trait WorkspaceStager {
    fn stage(&self, project: &Path, reporter: &dyn Reporter) -> Result<Workspace>;
}

/// Produces the call-graph artifact. Failures are never propagated.
pub trait CallGraphGenerator {
    fn generate(&self, package: &Path, entry: &Path, output: &Path, reporter: &dyn Reporter);
}
