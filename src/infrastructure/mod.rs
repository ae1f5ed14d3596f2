// Infrastructure implementations for decoprof.

pub mod ast_dump;
pub mod callgraph_runner;
pub mod python_parser;
pub mod reporter;
pub mod unparser;
pub mod workspace;

pub use callgraph_runner::{DisabledCallGraph, PycgRunner};
pub use python_parser::PythonTreeLoader;
pub use reporter::{MemoryReporter, TracingReporter};
pub use unparser::PythonUnparser;
pub use workspace::FsWorkspaceStager;
