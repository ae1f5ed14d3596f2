use std::path::{Component, Path, PathBuf};

use crate::common::error::{InjectError, Result};
use crate::domain::ast::SyntaxTree;
use crate::domain::inject::{inject_annotation, inject_import};
use crate::domain::locator::{locate, Resolution};
use crate::domain::profiler::ProfilerKind;
use crate::domain::target_path::TargetPath;
use crate::infrastructure::ast_dump::{dump_path, write_ast_dump};
use crate::ports::{CallGraphGenerator, Reporter, TreeLoader, TreeSerializer, WorkspaceStager};

/// Everything one run needs, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectRequest {
    /// Project root to stage.
    pub project: PathBuf,
    /// Source file, relative to the project root.
    pub file: PathBuf,
    pub target: TargetPath,
    pub profiler: ProfilerKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectOutcome {
    pub workspace: PathBuf,
    /// The instrumented working copy.
    pub output_file: PathBuf,
    pub call_graph: PathBuf,
    pub resolution: Resolution,
}

/// `file` must name a file inside the project: relative, with no `..`,
/// root or drive component.
pub fn check_source_path(file: &Path) -> Result<()> {
    let mut has_name = false;
    for component in file.components() {
        match component {
            Component::Normal(_) => has_name = true,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(InjectError::Argument(format!(
                    "Filename must be relative to the project folder: {}",
                    file.display()
                )));
            }
        }
    }
    if !has_name {
        return Err(InjectError::Argument("Filename is not specified.".to_string()));
    }
    Ok(())
}

/// Decorate the function named by `target` and add the support import.
///
/// An unresolved target is reported as an error but the import is still
/// added, so the caller always gets a tree worth writing back.
pub fn instrument_tree(
    tree: &mut SyntaxTree,
    target: &TargetPath,
    profiler: ProfilerKind,
    source_name: &str,
    reporter: &dyn Reporter,
) -> Resolution {
    if target.is_nested() {
        reporter.debug(&format!(
            "Function \"{}\" is a member of a class or an inner function",
            target.function_name()
        ));
    } else {
        reporter.debug(&format!(
            "Function \"{}\" is a free function",
            target.function_name()
        ));
    }

    let resolution = locate(tree, target);
    match &resolution {
        Resolution::Found(_) => {
            inject_annotation(tree, &resolution, &profiler.capability_reference(), reporter);
        }
        Resolution::NotFound => {
            let err = InjectError::SymbolNotFound {
                symbol: target.to_string(),
                file: source_name.to_string(),
            };
            reporter.error(&err.to_string());
        }
    }

    inject_import(tree, reporter);
    resolution
}

pub struct InjectUsecase<'a> {
    pub stager: &'a dyn WorkspaceStager,
    pub call_graph: &'a dyn CallGraphGenerator,
    pub loader: &'a dyn TreeLoader,
    pub serializer: &'a dyn TreeSerializer,
    pub reporter: &'a dyn Reporter,
    /// Write `<file>_ast.json` into the workspace before mutating.
    pub dump_ast: bool,
}

impl<'a> InjectUsecase<'a> {
    pub fn run(&self, request: &InjectRequest) -> Result<InjectOutcome> {
        check_source_path(&request.file)?;

        let reporter = self.reporter;
        reporter.debug(&format!("Filename: \t{}", request.file.display()));
        reporter.debug(&format!("Project name: \t{}", request.project.display()));
        reporter.debug(&format!("Function name: \t{}", request.target));
        reporter.debug(&format!(
            "Profiler type: \t{} ({})",
            request.profiler,
            request.profiler.backend()
        ));

        let workspace = self.stager.stage(&request.project, reporter)?;

        let call_graph = workspace.call_graph_path();
        self.call_graph
            .generate(&workspace.root, &request.file, &call_graph, reporter);

        let output_file = workspace.root.join(&request.file);
        reporter.debug(&format!("Working copy filename: {}", output_file.display()));
        let mut tree = self.loader.load(&output_file, reporter)?;

        if self.dump_ast {
            self.dump(&tree, &workspace.root, &request.file);
        }

        let resolution = instrument_tree(
            &mut tree,
            &request.target,
            request.profiler,
            &request.file.display().to_string(),
            reporter,
        );

        self.serializer.write(&tree, &output_file, reporter)?;
        reporter.info(&format!("Instrumented copy written to {}", output_file.display()));

        Ok(InjectOutcome {
            workspace: workspace.root,
            output_file,
            call_graph,
            resolution,
        })
    }

    fn dump(&self, tree: &SyntaxTree, workspace_root: &Path, file: &Path) {
        let path = dump_path(workspace_root, file);
        match write_ast_dump(tree, &path) {
            Ok(()) => self
                .reporter
                .debug(&format!("AST is written to the file: {}", path.display())),
            Err(e) => self.reporter.warn(&format!("{:#}", e)),
        }
    }
}
