//! Profiler Domain Module
//!
//! Defines the profiling capabilities a decorator can reference, and the
//! support import every instrumented file receives.

/// Package providing the runtime decorators.
pub const SUPPORT_PACKAGE: &str = "decoProf";
/// Module inside the support package.
pub const SUPPORT_MODULE: &str = "genericProfiler";
/// Class holding the decorator functions.
pub const SUPPORT_CLASS: &str = "ProfileDecorators";
/// Name the support class is bound to in the instrumented file.
pub const SUPPORT_ALIAS: &str = "gp";

/// Supported profiling backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfilerKind {
    #[default]
    Cpu,
    Memory,
    CallStack,
    Thread,
    Line,
}

impl ProfilerKind {
    pub const ALL: [ProfilerKind; 5] = [
        ProfilerKind::Cpu,
        ProfilerKind::Memory,
        ProfilerKind::CallStack,
        ProfilerKind::Thread,
        ProfilerKind::Line,
    ];

    /// Parse the `-t` token. Tokens are matched exactly.
    pub fn from_token(token: &str) -> Option<ProfilerKind> {
        Self::ALL.into_iter().find(|kind| kind.token() == token)
    }

    pub fn token(&self) -> &'static str {
        match self {
            ProfilerKind::Cpu => "cpu",
            ProfilerKind::Memory => "mem",
            ProfilerKind::CallStack => "call_stack",
            ProfilerKind::Thread => "thread",
            ProfilerKind::Line => "line",
        }
    }

    /// Decorator method on the support class.
    pub fn method_name(&self) -> &'static str {
        match self {
            ProfilerKind::Cpu => "cprofile_decorator",
            ProfilerKind::Memory => "memory_profiler_decorator",
            ProfilerKind::CallStack => "pyinstrument_decorator",
            ProfilerKind::Thread => "yappi_decorator",
            ProfilerKind::Line => "line_profiler_decorator",
        }
    }

    /// Python library doing the actual work at runtime.
    pub fn backend(&self) -> &'static str {
        match self {
            ProfilerKind::Cpu => "cProfile",
            ProfilerKind::Memory => "memory_profiler",
            ProfilerKind::CallStack => "pyinstrument",
            ProfilerKind::Thread => "yappi",
            ProfilerKind::Line => "line_profiler",
        }
    }

    /// Decorator expression, e.g. `gp.cprofile_decorator`.
    pub fn capability_reference(&self) -> String {
        format!("{}.{}", SUPPORT_ALIAS, self.method_name())
    }

    /// Comma-separated tokens, for help and error messages.
    pub fn available_tokens() -> String {
        Self::ALL
            .iter()
            .map(|kind| kind.token())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for ProfilerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// The import statement binding the support class to its alias.
pub fn support_import() -> String {
    format!(
        "from {}.{} import {} as {}",
        SUPPORT_PACKAGE, SUPPORT_MODULE, SUPPORT_CLASS, SUPPORT_ALIAS
    )
}
