//! Parse tree types
//!
//! A parse tree is an arena of nodes addressed by [`NodeId`]. Interior
//! nodes list their children by id, so the tree owns every node exactly
//! once and stays immutable after the parser builds it.

use serde::Serialize;

use super::grammar::{NonTerminal, Production, RULES};
use super::tokenizer::Terminal;
use crate::{Error, Result};

/// Index of a node inside its [`ParseTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One node of a parse tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Leaf {
        terminal: Terminal,
        text: String,
    },
    Interior {
        production: Production,
        children: Vec<NodeId>,
        span: String,
    },
}

impl Node {
    /// Text this node matched
    pub fn span(&self) -> &str {
        match self {
            Node::Leaf { text, .. } => text,
            Node::Interior { span, .. } => span,
        }
    }
}

/// Arena-backed parse tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl ParseTree {
    pub(crate) fn builder() -> TreeBuilder {
        TreeBuilder { nodes: Vec::new() }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn span(&self, id: NodeId) -> &str {
        self.node(id).span()
    }

    /// Production of an interior node
    pub fn production(&self, id: NodeId) -> Option<Production> {
        match self.node(id) {
            Node::Interior { production, .. } => Some(*production),
            Node::Leaf { .. } => None,
        }
    }

    /// Nonterminal on the left-hand side of an interior node
    pub fn lhs(&self, id: NodeId) -> Option<NonTerminal> {
        let production = self.production(id)?;
        RULES
            .iter()
            .find(|rule| rule.production == production)
            .map(|rule| rule.lhs)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.node(id) {
            Node::Interior { children, .. } => children,
            Node::Leaf { .. } => &[],
        }
    }

    /// The `index`-th child, or an invariant violation if the node has fewer
    pub fn child(&self, id: NodeId, index: usize) -> Result<NodeId> {
        self.children(id).get(index).copied().ok_or_else(|| {
            Error::InvariantViolation(format!(
                "node `{}` has no child {}",
                self.span(id),
                index
            ))
        })
    }

    fn fmt_node(&self, f: &mut std::fmt::Formatter, id: NodeId, depth: usize) -> std::fmt::Result {
        let indent = "  ".repeat(depth);
        match self.node(id) {
            Node::Leaf { terminal, text } => writeln!(f, "{}{} {:?}", indent, terminal, text),
            Node::Interior {
                children, span, ..
            } => {
                let lhs = self
                    .lhs(id)
                    .map(|nt| nt.to_string())
                    .unwrap_or_default();
                writeln!(f, "{}{} {:?}", indent, lhs, span)?;
                for child in children {
                    self.fmt_node(f, *child, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl std::fmt::Display for ParseTree {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.fmt_node(f, self.root, 0)
    }
}

/// Appends nodes bottom-up; children must be pushed before their parent
pub(crate) struct TreeBuilder {
    nodes: Vec<Node>,
}

impl TreeBuilder {
    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub(crate) fn span_of(&self, id: NodeId) -> &str {
        self.nodes[id.index()].span()
    }

    pub(crate) fn finish(self, root: NodeId) -> ParseTree {
        ParseTree {
            nodes: self.nodes,
            root,
        }
    }
}

/// An accepted contract: the single parse of a `fun`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    tree: ParseTree,
}

impl Schema {
    pub(crate) fn from_tree(tree: ParseTree) -> Result<Self> {
        if tree.production(tree.root()) != Some(Production::FunArrow) {
            return Err(Error::InvariantViolation(format!(
                "schema root `{}` is not a function type",
                tree.span(tree.root())
            )));
        }
        Ok(Schema { tree })
    }

    pub fn tree(&self) -> &ParseTree {
        &self.tree
    }

    /// Canonical contract text, `"<input>-><output>"`
    pub fn text(&self) -> &str {
        self.tree.span(self.tree.root())
    }

    /// The `fixed_tup` node describing the argument tuple
    pub fn input(&self) -> NodeId {
        self.tree.children(self.tree.root())[0]
    }

    /// The `typ` node describing the result
    pub fn output(&self) -> NodeId {
        self.tree.children(self.tree.root())[2]
    }

    pub fn input_text(&self) -> &str {
        self.tree.span(self.input())
    }

    pub fn output_text(&self) -> &str {
        self.tree.span(self.output())
    }
}

impl std::fmt::Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.tree)
    }
}
