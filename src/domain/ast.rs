// AST data structures for decoprof.
// An owned, ordered tree of Python statements. Only the statements the
// injector reasons about are modelled structurally; everything else keeps
// its source text.

use serde::Serialize;

/// Root of a parsed source file (the module node).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyntaxTree {
    pub body: Vec<Node>,
}

/// A statement in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    ClassDef(Definition),
    FunctionDef(Definition),
    /// `import x`, `from x import y`, `from __future__ import z`
    Import { text: String },
    /// `if`, `for`, `while`, `try`, `with`, `match` and `case` statements.
    Compound { clauses: Vec<Clause> },
    /// Any simple statement, verbatim.
    Other { text: String },
}

/// A `class` or `def` together with its decorators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Definition {
    pub name: String,
    /// Decorator expressions without the leading `@`, in source order.
    pub decorators: Vec<String>,
    /// The full `def ...:` / `class ...:` header, `async` included.
    pub header: String,
    pub body: Vec<Node>,
}

/// One header line plus its indented block, e.g. `elif x:` and what follows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Clause {
    pub header: String,
    pub body: Vec<Node>,
}

/// Node kinds, used for reporting and structural comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum NodeKind {
    Module,
    ClassDef,
    FunctionDef,
    Import,
    Compound,
    Other,
}

/// Child indices leading from the module body to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodeAddress(Vec<usize>);

impl NodeAddress {
    pub fn root_child(index: usize) -> Self {
        NodeAddress(vec![index])
    }

    pub fn child(&self, index: usize) -> Self {
        let mut path = self.0.clone();
        path.push(index);
        NodeAddress(path)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Nesting depth; module-level statements have depth 1.
    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::ClassDef(_) => NodeKind::ClassDef,
            Node::FunctionDef(_) => NodeKind::FunctionDef,
            Node::Import { .. } => NodeKind::Import,
            Node::Compound { .. } => NodeKind::Compound,
            Node::Other { .. } => NodeKind::Other,
        }
    }

    /// Name of a class or function definition.
    pub fn name(&self) -> Option<&str> {
        match self {
            Node::ClassDef(def) | Node::FunctionDef(def) => Some(&def.name),
            _ => None,
        }
    }

    pub fn is_function_named(&self, name: &str) -> bool {
        matches!(self, Node::FunctionDef(def) if def.name == name)
    }

    /// Classes and functions can both act as the outer part of `outer.inner`.
    pub fn is_container_named(&self, name: &str) -> bool {
        matches!(self, Node::ClassDef(def) | Node::FunctionDef(def) if def.name == name)
    }

    pub fn is_definition(&self) -> bool {
        matches!(self, Node::ClassDef(_) | Node::FunctionDef(_))
    }

    /// Direct children in document order. Compound statements expose the
    /// bodies of all their clauses as one sequence.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::ClassDef(def) | Node::FunctionDef(def) => def.body.iter().collect(),
            Node::Compound { clauses } => clauses.iter().flat_map(|c| c.body.iter()).collect(),
            Node::Import { .. } | Node::Other { .. } => Vec::new(),
        }
    }

    /// Mutable access to the `index`-th child, with the same numbering as `children`.
    pub fn child_mut(&mut self, mut index: usize) -> Option<&mut Node> {
        match self {
            Node::ClassDef(def) | Node::FunctionDef(def) => def.body.get_mut(index),
            Node::Compound { clauses } => {
                for clause in clauses.iter_mut() {
                    if index < clause.body.len() {
                        return clause.body.get_mut(index);
                    }
                    index -= clause.body.len();
                }
                None
            }
            Node::Import { .. } | Node::Other { .. } => None,
        }
    }
}

/// A node reached by traversal, with the address needed to mutate it later.
#[derive(Debug, Clone)]
pub struct NodeRef<'a> {
    pub address: NodeAddress,
    pub node: &'a Node,
}

/// Lazy pre-order, depth-first walk in document order.
pub struct PreOrder<'a> {
    stack: Vec<NodeRef<'a>>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        for (index, child) in current.node.children().into_iter().enumerate().rev() {
            self.stack.push(NodeRef {
                address: current.address.child(index),
                node: child,
            });
        }
        Some(current)
    }
}

impl SyntaxTree {
    pub fn new(body: Vec<Node>) -> Self {
        Self { body }
    }

    /// Start a fresh traversal. Each call is independent of previous ones.
    pub fn pre_order(&self) -> PreOrder<'_> {
        let stack = self
            .body
            .iter()
            .enumerate()
            .rev()
            .map(|(index, node)| NodeRef {
                address: NodeAddress::root_child(index),
                node,
            })
            .collect();
        PreOrder { stack }
    }

    /// First node in pre-order satisfying `predicate`; traversal stops there.
    pub fn find_first<P>(&self, mut predicate: P) -> Option<NodeRef<'_>>
    where
        P: FnMut(&Node) -> bool,
    {
        self.pre_order().find(|r| predicate(r.node))
    }

    pub fn get_mut(&mut self, address: &NodeAddress) -> Option<&mut Node> {
        let (first, rest) = address.indices().split_first()?;
        let mut node = self.body.get_mut(*first)?;
        for &index in rest {
            node = node.child_mut(index)?;
        }
        Some(node)
    }

    /// Kinds of every node, the module first, then pre-order.
    pub fn kinds(&self) -> Vec<NodeKind> {
        std::iter::once(NodeKind::Module)
            .chain(self.pre_order().map(|r| r.node.kind()))
            .collect()
    }
}
