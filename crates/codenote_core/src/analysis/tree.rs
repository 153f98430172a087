//! Source tree access used by the analyzer.
//!
//! Hosts expose their syntax trees through [`SourceTree`]. [`SyntaxTree`] is
//! an owned implementation for hosts that materialize a tree up front.

use std::ops::Range;

/// Read-only view of a host syntax tree.
pub trait SourceTree {
    type Node: Copy + Eq;

    /// Deepest node covering the byte `offset`.
    fn element_at(&self, offset: usize) -> Option<Self::Node>;
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;
    /// Host node kind name, e.g. `CLASS` or `FUN`.
    fn kind(&self, node: Self::Node) -> &str;
    /// Declared name, when the node declares one.
    fn name(&self, node: Self::Node) -> Option<&str>;
}

/// Index of a node inside a [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SyntaxNodeId(usize);

#[derive(Debug, Clone)]
struct SyntaxNode {
    kind: String,
    name: Option<String>,
    range: Range<usize>,
    parent: Option<SyntaxNodeId>,
    children: Vec<SyntaxNodeId>,
}

/// Owned syntax tree with byte-range nodes.
///
/// Child ranges are expected to nest inside their parent's range.
#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
    roots: Vec<SyntaxNodeId>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node and returns its id. `parent` must already exist.
    pub fn add_node(
        &mut self,
        parent: Option<SyntaxNodeId>,
        kind: impl Into<String>,
        name: Option<&str>,
        range: Range<usize>,
    ) -> SyntaxNodeId {
        let id = SyntaxNodeId(self.nodes.len());
        let parent = parent.filter(|p| p.0 < self.nodes.len());
        self.nodes.push(SyntaxNode {
            kind: kind.into(),
            name: name.map(str::to_string),
            range,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(parent) => self.nodes[parent.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn covering(&self, candidates: &[SyntaxNodeId], offset: usize) -> Option<SyntaxNodeId> {
        candidates
            .iter()
            .copied()
            .find(|id| self.nodes[id.0].range.contains(&offset))
    }
}

impl SourceTree for SyntaxTree {
    type Node = SyntaxNodeId;

    fn element_at(&self, offset: usize) -> Option<SyntaxNodeId> {
        let mut current = self.covering(&self.roots, offset)?;
        while let Some(child) = self.covering(&self.nodes[current.0].children, offset) {
            current = child;
        }
        Some(current)
    }

    fn parent(&self, node: SyntaxNodeId) -> Option<SyntaxNodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    fn kind(&self, node: SyntaxNodeId) -> &str {
        self.nodes.get(node.0).map_or("", |n| n.kind.as_str())
    }

    fn name(&self, node: SyntaxNodeId) -> Option<&str> {
        self.nodes.get(node.0).and_then(|n| n.name.as_deref())
    }
}
