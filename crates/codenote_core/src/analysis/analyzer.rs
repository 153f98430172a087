//! Enclosing class/function lookup over a source tree.

use crate::analysis::dialect::{NodeRole, SourceDialect};
use crate::analysis::tree::SourceTree;
use log::debug;

/// Name used for constructor nodes, which have no declared name of their own.
pub const CONSTRUCTOR_METHOD_NAME: &str = "<init>";

// Upper bound on ancestor hops; guards against cyclic host trees.
const MAX_ANCESTOR_DEPTH: usize = 4096;

/// Structural metadata of a selection. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeStructureInfo {
    pub class_name: Option<String>,
    pub method_name: Option<String>,
    pub method_signature: Option<String>,
}

impl CodeStructureInfo {
    pub fn is_empty(&self) -> bool {
        self.class_name.is_none() && self.method_name.is_none() && self.method_signature.is_none()
    }
}

/// Stateless structure analyzer.
#[derive(Debug, Default, Clone, Copy)]
pub struct CodeAnalyzer;

impl CodeAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyzes the byte selection `start..end` of `tree`.
    ///
    /// A selection spanning several leaves is collapsed to their lowest
    /// common ancestor before the enclosing lookup.
    pub fn analyze_selection<T: SourceTree>(
        &self,
        tree: &T,
        dialect: SourceDialect,
        start: usize,
        end: usize,
    ) -> CodeStructureInfo {
        if dialect == SourceDialect::Unknown {
            return CodeStructureInfo::default();
        }

        let Some(start_node) = tree.element_at(start) else {
            return CodeStructureInfo::default();
        };
        let end_node = if end > start {
            tree.element_at(end - 1)
        } else {
            None
        };

        let anchor = match end_node {
            Some(end_node) if end_node != start_node => {
                common_ancestor(tree, start_node, end_node)
            }
            _ => Some(start_node),
        };

        match anchor {
            Some(node) => self.analyze_node(tree, dialect, node),
            None => CodeStructureInfo::default(),
        }
    }

    /// Analyzes the structure enclosing `node`, `node` included.
    pub fn analyze_node<T: SourceTree>(
        &self,
        tree: &T,
        dialect: SourceDialect,
        node: T::Node,
    ) -> CodeStructureInfo {
        let class_name = find_enclosing(tree, dialect, node, NodeRole::ClassLike)
            .and_then(|class| tree.name(class).map(str::to_string));

        let info = match find_enclosing(tree, dialect, node, NodeRole::FunctionLike) {
            Some(function) => {
                let method_name = tree.name(function).map(str::to_string);
                let signature = match dialect {
                    SourceDialect::Kotlin => Some(simplified_signature(
                        method_name.as_deref().unwrap_or("unknown"),
                    )),
                    _ => method_name.as_deref().map(simplified_signature),
                };
                CodeStructureInfo {
                    class_name,
                    method_name,
                    method_signature: signature,
                }
            }
            None if dialect.has_constructor_fallback() => {
                let constructor = find_enclosing(tree, dialect, node, NodeRole::PrimaryConstructor)
                    .or_else(|| {
                        find_enclosing(tree, dialect, node, NodeRole::SecondaryConstructor)
                    });
                match constructor {
                    Some(_) => {
                        let owner = class_name.as_deref().unwrap_or("Unknown");
                        CodeStructureInfo {
                            method_signature: Some(simplified_signature(owner)),
                            method_name: Some(CONSTRUCTOR_METHOD_NAME.to_string()),
                            class_name,
                        }
                    }
                    None => CodeStructureInfo {
                        class_name,
                        ..CodeStructureInfo::default()
                    },
                }
            }
            None => CodeStructureInfo {
                class_name,
                ..CodeStructureInfo::default()
            },
        };

        debug!(
            "event=structure_analyze module=analysis status=ok dialect={:?} class={} method={}",
            dialect,
            info.class_name.is_some(),
            info.method_name.is_some()
        );
        info
    }
}

fn simplified_signature(name: &str) -> String {
    format!("{name}(...)")
}

fn find_enclosing<T: SourceTree>(
    tree: &T,
    dialect: SourceDialect,
    node: T::Node,
    role: NodeRole,
) -> Option<T::Node> {
    let mut current = Some(node);
    for _ in 0..MAX_ANCESTOR_DEPTH {
        let candidate = current?;
        if dialect.classify(tree.kind(candidate)) == role {
            return Some(candidate);
        }
        current = tree.parent(candidate);
    }
    None
}

fn common_ancestor<T: SourceTree>(tree: &T, left: T::Node, right: T::Node) -> Option<T::Node> {
    let mut left_chain = Vec::new();
    let mut current = Some(left);
    while let Some(node) = current {
        if left_chain.len() >= MAX_ANCESTOR_DEPTH {
            break;
        }
        left_chain.push(node);
        current = tree.parent(node);
    }

    let mut current = Some(right);
    for _ in 0..MAX_ANCESTOR_DEPTH {
        let node = current?;
        if left_chain.contains(&node) {
            return Some(node);
        }
        current = tree.parent(node);
    }
    None
}
