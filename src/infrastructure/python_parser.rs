//! Python Tree Loader
//!
//! Builds a [`SyntaxTree`] from Python source using tree-sitter-python.
//! Classes, functions, imports and block statements become structured
//! nodes; simple statements keep their exact source text. Comments at
//! statement level are dropped.

use std::fs;
use std::path::Path;
use tree_sitter::{Node as TsNode, Parser};

use crate::common::error::{InjectError, Result, SyntaxError};
use crate::domain::ast::{Clause, Definition, Node, SyntaxTree};
use crate::ports::{Reporter, TreeLoader};

pub struct PythonTreeLoader;

impl TreeLoader for PythonTreeLoader {
    fn load(&self, path: &Path, reporter: &dyn Reporter) -> Result<SyntaxTree> {
        let source = fs::read_to_string(path).map_err(|e| InjectError::fs(path, e))?;
        reporter.debug(&format!(
            "Parsing {} ({} bytes)",
            path.display(),
            source.len()
        ));
        parse_python(&source).map_err(|source| InjectError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Parse Python source text into a syntax tree.
pub fn parse_python(source: &str) -> std::result::Result<SyntaxTree, SyntaxError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| SyntaxError {
            line: 1,
            column: 1,
            message: format!("Failed to set language: {}", e),
        })?;

    let tree = parser.parse(source, None).ok_or_else(|| SyntaxError {
        line: 1,
        column: 1,
        message: "Failed to parse source".to_string(),
    })?;

    let root = tree.root_node();
    if root.has_error() {
        let culprit = first_error(root).unwrap_or(root);
        let position = culprit.start_position();
        let message = if culprit.is_missing() {
            format!("missing `{}`", culprit.kind())
        } else {
            "invalid syntax".to_string()
        };
        return Err(SyntaxError {
            line: position.row + 1,
            column: position.column + 1,
            message,
        });
    }

    // tree-sitter accepts a few things Python does not.
    if let Some(err) = first_rejected(root) {
        return Err(err);
    }

    let converter = Converter { source };
    Ok(SyntaxTree::new(converter.statements(root)))
}

/// Depth-first search for the first ERROR or MISSING node.
fn first_error(node: TsNode) -> Option<TsNode> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<TsNode> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

/// First Python 2 statement or misindented statement, in document order.
fn first_rejected(node: TsNode) -> Option<SyntaxError> {
    match node.kind() {
        "print_statement" | "exec_statement" => {
            let keyword = node.kind().trim_end_matches("_statement");
            return Some(error_at(
                node,
                format!("Missing parentheses in call to '{}'", keyword),
            ));
        }
        "module" => {
            if let Some(err) = misindented(node, Some(0)) {
                return Some(err);
            }
        }
        "block" => {
            if let Some(err) = misindented(node, None) {
                return Some(err);
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    let children: Vec<TsNode> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_rejected)
}

/// Statements of a module or block must share one column. `expected` is
/// that column, or `None` to take it from the first statement. Statements
/// sharing a line with the previous one (`a = 1; b = 2`) are exempt.
fn misindented(parent: TsNode, expected: Option<usize>) -> Option<SyntaxError> {
    let mut cursor = parent.walk();
    let statements: Vec<TsNode> = parent
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect();

    let mut column = expected;
    let mut previous_end_row: Option<usize> = None;
    for statement in statements {
        let start = statement.start_position();
        if previous_end_row != Some(start.row) {
            let indent = *column.get_or_insert(start.column);
            if start.column > indent {
                return Some(error_at(statement, "unexpected indent".to_string()));
            }
            if start.column < indent {
                return Some(error_at(
                    statement,
                    "unindent does not match any outer indentation level".to_string(),
                ));
            }
        }
        previous_end_row = Some(statement.end_position().row);
    }
    None
}

fn error_at(node: TsNode, message: String) -> SyntaxError {
    let position = node.start_position();
    SyntaxError {
        line: position.row + 1,
        column: position.column + 1,
        message,
    }
}

struct Converter<'s> {
    source: &'s str,
}

impl<'s> Converter<'s> {
    fn text(&self, start: usize, end: usize) -> &'s str {
        self.source.get(start..end).unwrap_or_default()
    }

    fn node_text(&self, node: TsNode) -> String {
        self.text(node.start_byte(), node.end_byte()).to_string()
    }

    /// Statements of a `module` or `block` node.
    fn statements(&self, parent: TsNode) -> Vec<Node> {
        let mut cursor = parent.walk();
        let children: Vec<TsNode> = parent.named_children(&mut cursor).collect();
        children
            .into_iter()
            .filter(|child| child.kind() != "comment")
            .map(|child| self.statement(child))
            .collect()
    }

    fn statement(&self, node: TsNode) -> Node {
        match node.kind() {
            "function_definition" => Node::FunctionDef(self.definition(node, Vec::new())),
            "class_definition" => Node::ClassDef(self.definition(node, Vec::new())),
            "decorated_definition" => self.decorated(node),
            "import_statement" | "import_from_statement" | "future_import_statement" => {
                Node::Import {
                    text: self.node_text(node),
                }
            }
            _ if has_block(node) => {
                let mut clauses = Vec::new();
                self.collect_clauses(node, &mut clauses);
                Node::Compound { clauses }
            }
            _ => Node::Other {
                text: self.node_text(node),
            },
        }
    }

    fn decorated(&self, node: TsNode) -> Node {
        let mut cursor = node.walk();
        let decorators: Vec<String> = node
            .named_children(&mut cursor)
            .filter(|child| child.kind() == "decorator")
            .map(|decorator| self.decorator_expression(decorator))
            .collect();

        match node.child_by_field_name("definition") {
            Some(def) if def.kind() == "class_definition" => {
                Node::ClassDef(self.definition(def, decorators))
            }
            Some(def) if def.kind() == "function_definition" => {
                Node::FunctionDef(self.definition(def, decorators))
            }
            // Unknown decorated construct: keep it whole.
            _ => Node::Other {
                text: self.node_text(node),
            },
        }
    }

    fn decorator_expression(&self, decorator: TsNode) -> String {
        let mut cursor = decorator.walk();
        let expression = decorator
            .named_children(&mut cursor)
            .find(|child| child.kind() != "comment");
        match expression {
            Some(expr) => self.node_text(expr),
            None => self
                .node_text(decorator)
                .trim_start_matches('@')
                .trim()
                .to_string(),
        }
    }

    fn definition(&self, node: TsNode, decorators: Vec<String>) -> Definition {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.node_text(n))
            .unwrap_or_default();
        let body_node = node.child_by_field_name("body");
        let header_end = body_node
            .and_then(|body| colon_before(node, body.start_byte()))
            .or_else(|| body_node.map(|body| body.start_byte()))
            .unwrap_or_else(|| node.end_byte());

        Definition {
            name,
            decorators,
            header: self.text(node.start_byte(), header_end).trim().to_string(),
            body: body_node.map(|b| self.statements(b)).unwrap_or_default(),
        }
    }

    /// Split a block statement into `header:` + block pairs, descending into
    /// `elif`/`else`/`except`/`finally`/`case` clauses in order.
    fn collect_clauses(&self, node: TsNode, clauses: &mut Vec<Clause>) {
        let mut header_start: Option<usize> = None;
        let mut header_end: Option<usize> = None;

        let mut cursor = node.walk();
        let children: Vec<TsNode> = node.children(&mut cursor).collect();
        for child in children {
            match child.kind() {
                "comment" => {}
                "block" => {
                    let start = header_start.unwrap_or_else(|| node.start_byte());
                    let end = header_end.unwrap_or_else(|| child.start_byte());
                    clauses.push(Clause {
                        header: self.text(start, end).trim().to_string(),
                        body: self.statements(child),
                    });
                    header_start = None;
                    header_end = None;
                }
                _ if is_clause_with_block(child) => {
                    self.collect_clauses(child, clauses);
                    header_start = None;
                    header_end = None;
                }
                ":" => {
                    header_start.get_or_insert(child.start_byte());
                    header_end = Some(child.end_byte());
                }
                _ => {
                    header_start.get_or_insert(child.start_byte());
                }
            }
        }
    }
}

/// End of the last `:` token of `node` that starts before `limit`.
fn colon_before(node: TsNode, limit: usize) -> Option<usize> {
    let mut cursor = node.walk();
    let children: Vec<TsNode> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.kind() == ":" && child.end_byte() <= limit)
        .map(|child| child.end_byte())
        .last()
}

fn has_block(node: TsNode) -> bool {
    let mut cursor = node.walk();
    let children: Vec<TsNode> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .any(|child| child.kind() == "block" || is_clause_with_block(child))
}

fn is_clause_with_block(node: TsNode) -> bool {
    if !node.kind().ends_with("_clause") {
        return false;
    }
    let mut cursor = node.walk();
    let children: Vec<TsNode> = node.children(&mut cursor).collect();
    children.into_iter().any(|child| child.kind() == "block")
}
