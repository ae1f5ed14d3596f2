// Domain model for decoprof: the syntax tree and everything that reasons about it.

pub mod ast;
pub mod inject;
pub mod locator;
pub mod profiler;
pub mod target_path;
