//! Best-effort code structure analysis.
//!
//! # Responsibility
//! - Find the enclosing class and function of a selection in a source tree.
//! - Dispatch per source dialect through a closed enum.
//!
//! # Invariants
//! - Analysis never fails; unknown dialects and missing nodes yield absent values.
//! - Signatures are simplified placeholders (`name(...)`).

pub mod analyzer;
pub mod dialect;
pub mod tree;

pub use analyzer::{CodeAnalyzer, CodeStructureInfo};
pub use dialect::{NodeRole, SourceDialect};
pub use tree::{SourceTree, SyntaxNodeId, SyntaxTree};
