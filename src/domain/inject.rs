// Tree mutations: decorator and import injection.

use crate::domain::ast::{Node, SyntaxTree};
use crate::domain::locator::Resolution;
use crate::domain::profiler::support_import;
use crate::ports::Reporter;

/// Append `reference` to the decorators of the resolved function.
/// Returns whether a decorator was added; `NotFound` leaves the tree untouched.
pub fn inject_annotation(
    tree: &mut SyntaxTree,
    resolution: &Resolution,
    reference: &str,
    reporter: &dyn Reporter,
) -> bool {
    let Resolution::Found(address) = resolution else {
        return false;
    };

    match tree.get_mut(address) {
        Some(Node::FunctionDef(def)) => {
            reporter.debug(&format!(
                "Function name: {} (nesting depth {})",
                def.name,
                address.depth()
            ));
            reporter.debug(&format!("Original decorator list: {:?}", def.decorators));
            def.decorators.push(reference.to_string());
            reporter.debug(&format!("Modified decorator list: {:?}", def.decorators));
            true
        }
        _ => {
            reporter.warn(&format!(
                "Resolved address {:?} does not point at a function",
                address.indices()
            ));
            false
        }
    }
}

/// Insert the profiler support import as the first statement of the module.
/// Always inserts, even if an identical import is already present.
pub fn inject_import(tree: &mut SyntaxTree, reporter: &dyn Reporter) {
    let text = support_import();
    reporter.debug(&format!("Injecting import: {}", text));
    tree.body.insert(0, Node::Import { text });
}
