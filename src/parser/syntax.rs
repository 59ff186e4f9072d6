use serde::{Deserialize, Serialize};

use crate::lexer::{Token, TokenKind};

/// A node of the syntax tree built by the reader
///
/// A node owns its children exclusively; the tree is built once during
/// reading and never mutated afterwards. A childless node is a leaf (an atom
/// or a bare identifier).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxNode {
    /// The token this node carries
    pub content: Token,
    /// Ordered child nodes
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    /// Creates a leaf node from a single token
    pub fn leaf(content: Token) -> Self {
        SyntaxNode {
            content,
            children: Vec::new(),
        }
    }

    /// Creates a node with the given children
    pub fn with_children(content: Token, children: Vec<SyntaxNode>) -> Self {
        SyntaxNode { content, children }
    }

    /// Returns true if this node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns true if this is a synthetic grouping node
    pub fn is_branch(&self) -> bool {
        self.content.kind == TokenKind::Branch
    }
}
