//! Symbol Locator
//!
//! Resolves a [`TargetPath`] against a [`SyntaxTree`].
//!
//! Resolution is first-match in document order:
//! - `name`: the first `def name` anywhere in the file, however deeply nested.
//! - `outer.inner`: the first class or function called `outer`, then the
//!   first `def inner` among its direct children. Once an `outer` is found
//!   the search never moves on to a later `outer`, even if the first one
//!   has no `inner`.
//!
//! Duplicate names elsewhere in the tree are not an error.

use crate::domain::ast::{NodeAddress, SyntaxTree};
use crate::domain::target_path::TargetPath;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(NodeAddress),
    NotFound,
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }
}

pub fn locate(tree: &SyntaxTree, target: &TargetPath) -> Resolution {
    let address = match target {
        TargetPath::Simple(name) => tree
            .find_first(|node| node.is_function_named(name))
            .map(|found| found.address),
        TargetPath::Nested { outer, inner } => tree
            .find_first(|node| node.is_container_named(outer))
            .and_then(|container| {
                container
                    .node
                    .children()
                    .into_iter()
                    .position(|child| child.is_function_named(inner))
                    .map(|index| container.address.child(index))
            }),
    };

    match address {
        Some(address) => Resolution::Found(address),
        None => Resolution::NotFound,
    }
}
