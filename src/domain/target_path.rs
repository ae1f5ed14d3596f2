//! Target Path Module
//!
//! Dotted symbol paths naming the function to instrument: `name`,
//! `Class.method` or `outer.inner`.

use std::fmt;
use crate::common::error::{InjectError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetPath {
    /// A function defined anywhere in the file.
    Simple(String),
    /// A function defined directly inside a class or another function.
    Nested { outer: String, inner: String },
}

impl TargetPath {
    /// Split `raw` on `.`. Only the first two segments are used; anything
    /// after the second is ignored.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(InjectError::Argument(
                "Function name must not be empty.".to_string(),
            ));
        }

        let mut segments = raw.split('.');
        let first = segments.next().unwrap_or_default().to_string();
        match segments.next() {
            None => Ok(TargetPath::Simple(first)),
            Some(inner) => Ok(TargetPath::Nested {
                outer: first,
                inner: inner.to_string(),
            }),
        }
    }

    /// The function that actually receives the decorator.
    pub fn function_name(&self) -> &str {
        match self {
            TargetPath::Simple(name) => name,
            TargetPath::Nested { inner, .. } => inner,
        }
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, TargetPath::Nested { .. })
    }
}

impl fmt::Display for TargetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetPath::Simple(name) => write!(f, "{}", name),
            TargetPath::Nested { outer, inner } => write!(f, "{}.{}", outer, inner),
        }
    }
}
