// Source regeneration for decoprof.
// Re-emits a SyntaxTree as Python with uniform indentation. The first line of
// every statement is re-indented; continuation lines are written back as they
// were, which is always valid inside brackets and strings.

use std::fs;
use std::path::Path;

use crate::common::error::{InjectError, Result};
use crate::domain::ast::{Definition, Node, SyntaxTree};
use crate::ports::{Reporter, TreeSerializer};

pub struct PythonUnparser {
    indent: String,
}

impl PythonUnparser {
    pub fn new(indent_width: usize) -> Self {
        Self {
            indent: " ".repeat(indent_width.max(1)),
        }
    }

    fn render_block(&self, nodes: &[Node], depth: usize, out: &mut String) {
        if nodes.is_empty() {
            if depth > 0 {
                self.push_line("pass", depth, out);
            }
            return;
        }

        let mut previous: Option<&Node> = None;
        for node in nodes {
            // Blank line around definitions, like a formatter would.
            if let Some(prev) = previous {
                if node.is_definition() || prev.is_definition() {
                    out.push('\n');
                }
            }
            self.render_node(node, depth, out);
            previous = Some(node);
        }
    }

    fn render_node(&self, node: &Node, depth: usize, out: &mut String) {
        match node {
            Node::ClassDef(def) | Node::FunctionDef(def) => self.render_definition(def, depth, out),
            Node::Compound { clauses } => {
                for clause in clauses {
                    self.push_line(&clause.header, depth, out);
                    self.render_block(&clause.body, depth + 1, out);
                }
            }
            Node::Import { text } | Node::Other { text } => self.push_line(text, depth, out),
        }
    }

    fn render_definition(&self, def: &Definition, depth: usize, out: &mut String) {
        for decorator in &def.decorators {
            self.push_line(&format!("@{}", decorator), depth, out);
        }
        self.push_line(&def.header, depth, out);
        self.render_block(&def.body, depth + 1, out);
    }

    fn push_line(&self, text: &str, depth: usize, out: &mut String) {
        for _ in 0..depth {
            out.push_str(&self.indent);
        }
        out.push_str(text);
        out.push('\n');
    }
}

impl Default for PythonUnparser {
    fn default() -> Self {
        Self::new(4)
    }
}

impl TreeSerializer for PythonUnparser {
    fn render(&self, tree: &SyntaxTree) -> String {
        let mut out = String::new();
        self.render_block(&tree.body, 0, &mut out);
        out
    }

    fn write(&self, tree: &SyntaxTree, path: &Path, reporter: &dyn Reporter) -> Result<()> {
        let code = self.render(tree);
        reporter.debug("Modified code:");
        reporter.debug(&code);
        fs::write(path, code).map_err(|e| InjectError::fs(path, e))
    }
}
