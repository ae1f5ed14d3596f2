//! Pipeline Tests
//!
//! Drive `InjectUsecase` end to end on temporary projects, with the
//! call-graph tool replaced by a stub so no external program is needed.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use decoprof::application::{InjectRequest, InjectUsecase};
use decoprof::common::error::InjectError;
use decoprof::domain::locator::Resolution;
use decoprof::domain::profiler::ProfilerKind;
use decoprof::domain::target_path::TargetPath;
use decoprof::infrastructure::python_parser::parse_python;
use decoprof::infrastructure::{FsWorkspaceStager, MemoryReporter, PythonTreeLoader, PythonUnparser};
use decoprof::ports::{CallGraphGenerator, Reporter, TreeSerializer};
use tempfile::TempDir;

const IMPORT: &str = "from decoProf.genericProfiler import ProfileDecorators as gp";

#[derive(Default)]
struct RecordingCallGraph {
    calls: RefCell<Vec<(PathBuf, PathBuf, PathBuf)>>,
}

impl CallGraphGenerator for RecordingCallGraph {
    fn generate(&self, package: &Path, entry: &Path, output: &Path, _reporter: &dyn Reporter) {
        self.calls
            .borrow_mut()
            .push((package.to_path_buf(), entry.to_path_buf(), output.to_path_buf()));
    }
}

struct Fixture {
    tmp: TempDir,
    project: PathBuf,
    runs: PathBuf,
}

impl Fixture {
    fn new(files: &[(&str, &str)]) -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let project = tmp.path().join("project");
        let runs = tmp.path().join("runs");
        fs::create_dir_all(&project).unwrap();
        fs::create_dir_all(&runs).unwrap();
        for (name, content) in files {
            let path = project.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }
        Self { tmp, project, runs }
    }

    fn request(&self, file: &str, name: &str, profiler: ProfilerKind) -> InjectRequest {
        InjectRequest {
            project: self.project.clone(),
            file: PathBuf::from(file),
            target: TargetPath::parse(name).unwrap(),
            profiler,
        }
    }

    fn run(
        &self,
        request: &InjectRequest,
        reporter: &MemoryReporter,
        call_graph: &RecordingCallGraph,
    ) -> Result<decoprof::application::InjectOutcome, InjectError> {
        let stager = FsWorkspaceStager::new(&self.runs);
        let unparser = PythonUnparser::default();
        let usecase = InjectUsecase {
            stager: &stager,
            call_graph,
            loader: &PythonTreeLoader,
            serializer: &unparser,
            reporter,
            dump_ast: true,
        };
        usecase.run(request)
    }

    fn workspaces(&self) -> usize {
        fs::read_dir(&self.runs).unwrap().count()
    }
}

#[test]
fn test_scenario_simple_function_cpu() {
    let fixture = Fixture::new(&[("main.py", "def foo(): pass\n")]);
    let reporter = MemoryReporter::new();
    let call_graph = RecordingCallGraph::default();

    let outcome = fixture
        .run(&fixture.request("main.py", "foo", ProfilerKind::Cpu), &reporter, &call_graph)
        .unwrap();

    assert!(outcome.resolution.is_found());
    let output = fs::read_to_string(&outcome.output_file).unwrap();
    assert!(output.starts_with(IMPORT));
    assert!(output.contains("@gp.cprofile_decorator\ndef foo():"));

    // The original stays untouched.
    assert_eq!(
        fs::read_to_string(fixture.project.join("main.py")).unwrap(),
        "def foo(): pass\n"
    );
    assert!(reporter.errors().is_empty());
}

#[test]
fn test_scenario_class_member_mem() {
    let source = "\
def add(a, b):
    return a + b

class Vector:
    def __init__(self, x):
        self.x = x

    def add(self, o):
        return Vector(self.x + o.x)
";
    let fixture = Fixture::new(&[("vector.py", source)]);
    let reporter = MemoryReporter::new();
    let call_graph = RecordingCallGraph::default();

    let outcome = fixture
        .run(&fixture.request("vector.py", "Vector.add", ProfilerKind::Memory), &reporter, &call_graph)
        .unwrap();

    let output = fs::read_to_string(&outcome.output_file).unwrap();
    assert_eq!(output.matches("@gp.memory_profiler_decorator").count(), 1);
    assert!(output.contains("    @gp.memory_profiler_decorator\n    def add(self, o):"));
    assert!(output.contains("\ndef add(a, b):"));
    assert!(!output.contains("@gp.memory_profiler_decorator\ndef add(a, b):"));
}

#[test]
fn test_scenario_missing_symbol_completes() {
    let fixture = Fixture::new(&[("main.py", "def foo():\n    return 1\n")]);
    let reporter = MemoryReporter::new();
    let call_graph = RecordingCallGraph::default();

    let outcome = fixture
        .run(&fixture.request("main.py", "missing", ProfilerKind::Cpu), &reporter, &call_graph)
        .unwrap();

    assert_eq!(outcome.resolution, Resolution::NotFound);
    let output = fs::read_to_string(&outcome.output_file).unwrap();
    assert!(output.starts_with(IMPORT));
    assert!(!output.contains('@'));

    let errors = reporter.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("\"missing\""));
    assert!(errors[0].contains("main.py"));
}

#[test]
fn test_first_match_in_document_order() {
    let source = "\
def outer():
    def helper():
        pass
    return helper

def helper():
    pass
";
    let fixture = Fixture::new(&[("m.py", source)]);
    let reporter = MemoryReporter::new();
    let call_graph = RecordingCallGraph::default();

    let outcome = fixture
        .run(&fixture.request("m.py", "helper", ProfilerKind::Line), &reporter, &call_graph)
        .unwrap();

    let output = fs::read_to_string(&outcome.output_file).unwrap();
    assert_eq!(output.matches("@gp.line_profiler_decorator").count(), 1);
    assert!(output.contains("    @gp.line_profiler_decorator\n    def helper():"));
}

#[test]
fn test_second_run_adds_second_decorator_and_import() {
    let fixture = Fixture::new(&[("main.py", "def foo(): pass\n")]);
    let reporter = MemoryReporter::new();
    let call_graph = RecordingCallGraph::default();
    let request = fixture.request("main.py", "foo", ProfilerKind::Thread);

    let first = fixture.run(&request, &reporter, &call_graph).unwrap();

    // Feed the instrumented file back in as a new project.
    let again = Fixture::new(&[(
        "main.py",
        fs::read_to_string(&first.output_file).unwrap().as_str(),
    )]);
    let second = again
        .run(&again.request("main.py", "foo", ProfilerKind::Thread), &reporter, &call_graph)
        .unwrap();

    let output = fs::read_to_string(&second.output_file).unwrap();
    assert_eq!(output.matches("@gp.yappi_decorator").count(), 2);
    assert_eq!(output.matches(IMPORT).count(), 2);
}

#[test]
fn test_call_graph_invoked_on_staged_copy() {
    let fixture = Fixture::new(&[("pkg/mod.py", "def run(): pass\n")]);
    let reporter = MemoryReporter::new();
    let call_graph = RecordingCallGraph::default();

    let outcome = fixture
        .run(&fixture.request("pkg/mod.py", "run", ProfilerKind::CallStack), &reporter, &call_graph)
        .unwrap();

    let calls = call_graph.calls.borrow();
    assert_eq!(calls.len(), 1);
    let (package, entry, output) = &calls[0];
    assert_eq!(package, &outcome.workspace);
    assert_eq!(entry, &PathBuf::from("pkg/mod.py"));
    assert_eq!(output, &outcome.call_graph);

    let name = outcome.workspace.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("project_"));
    assert_eq!(outcome.call_graph, outcome.workspace.join(format!("{}.json", name)));
    assert_eq!(outcome.output_file, outcome.workspace.join("pkg/mod.py"));
    assert!(outcome.workspace.join("pkg/mod.py_ast.json").is_file());
}

#[test]
fn test_missing_project_stages_nothing() {
    let fixture = Fixture::new(&[]);
    let reporter = MemoryReporter::new();
    let call_graph = RecordingCallGraph::default();
    let mut request = fixture.request("main.py", "foo", ProfilerKind::Cpu);
    request.project = fixture.tmp.path().join("does-not-exist");

    let err = fixture.run(&request, &reporter, &call_graph).unwrap_err();

    assert!(matches!(err, InjectError::ProjectNotFound(_)));
    assert_eq!(fixture.workspaces(), 0);
    assert!(call_graph.calls.borrow().is_empty());
}

#[test]
fn test_file_outside_workspace_rejected_before_staging() {
    let fixture = Fixture::new(&[("main.py", "def foo(): pass\n")]);
    let reporter = MemoryReporter::new();
    let call_graph = RecordingCallGraph::default();

    let absolute = fixture.project.join("main.py");
    let escaping = PathBuf::from("../../project/main.py");
    for file in [absolute, escaping] {
        let mut request = fixture.request("main.py", "foo", ProfilerKind::Cpu);
        request.file = file;

        let err = fixture.run(&request, &reporter, &call_graph).unwrap_err();
        assert!(matches!(err, InjectError::Argument(_)));
    }

    assert_eq!(fixture.workspaces(), 0);
    assert!(call_graph.calls.borrow().is_empty());
    assert_eq!(
        fs::read_to_string(fixture.project.join("main.py")).unwrap(),
        "def foo(): pass\n"
    );
}

#[test]
fn test_completion_reported_at_info() {
    let fixture = Fixture::new(&[("main.py", "def foo(): pass\n")]);
    let reporter = MemoryReporter::new();
    let call_graph = RecordingCallGraph::default();

    let outcome = fixture
        .run(&fixture.request("main.py", "foo", ProfilerKind::Cpu), &reporter, &call_graph)
        .unwrap();

    let info = reporter.messages_at(tracing::Level::INFO);
    assert_eq!(
        info,
        vec![format!("Instrumented copy written to {}", outcome.output_file.display())]
    );
}

#[test]
fn test_parse_error_is_fatal() {
    let fixture = Fixture::new(&[("bad.py", "def broken(:\n    pass\n")]);
    let reporter = MemoryReporter::new();
    let call_graph = RecordingCallGraph::default();

    let err = fixture
        .run(&fixture.request("bad.py", "broken", ProfilerKind::Cpu), &reporter, &call_graph)
        .unwrap_err();

    assert!(matches!(err, InjectError::Parse { .. }));
}

#[test]
fn test_roundtrip_keeps_node_kinds() {
    let source = "\
import os

class Shape:
    sides = 0

    def area(self):
        raise NotImplementedError

def main():
    for i in range(3):
        if i % 2:
            print(i)
        else:
            continue
    while False:
        pass

if __name__ == '__main__':
    main()
";
    let tree = parse_python(source).unwrap();
    let rendered = PythonUnparser::default().render(&tree);
    let reparsed = parse_python(&rendered).unwrap();

    assert_eq!(tree.kinds(), reparsed.kinds());
}
