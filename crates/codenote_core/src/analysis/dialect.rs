//! Source dialects recognized by the analyzer.
//!
//! Dispatch is a closed enum: each dialect classifies host node kinds into
//! structural roles. Files that match no dialect map to `Unknown`, whose
//! classification is always `NodeRole::Other`.

use std::path::Path;

/// Supported source languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceDialect {
    /// Statically typed class-file language (`.java`).
    Java,
    /// Language with distinct function and constructor nodes (`.kt`, `.kts`).
    Kotlin,
    Unknown,
}

/// Structural role of a syntax node within a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    ClassLike,
    FunctionLike,
    PrimaryConstructor,
    SecondaryConstructor,
    Other,
}

impl SourceDialect {
    /// Sniffs the dialect from a file path and an optional host file type name.
    ///
    /// The file type name wins when it names a known dialect.
    pub fn detect(file_path: &str, file_type: Option<&str>) -> Self {
        if let Some(kind) = file_type.map(str::trim) {
            if kind.eq_ignore_ascii_case("java") {
                return Self::Java;
            }
            if kind.eq_ignore_ascii_case("kotlin") {
                return Self::Kotlin;
            }
        }

        let extension = Path::new(file_path)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
        match extension.as_deref() {
            Some("java") => Self::Java,
            Some("kt") | Some("kts") => Self::Kotlin,
            _ => Self::Unknown,
        }
    }

    /// Classifies a host node kind name.
    pub fn classify(self, kind: &str) -> NodeRole {
        match self {
            Self::Java => match kind {
                "CLASS" | "INTERFACE" | "ENUM" | "RECORD" | "ANNOTATION_TYPE" => {
                    NodeRole::ClassLike
                }
                "METHOD" | "CONSTRUCTOR" => NodeRole::FunctionLike,
                _ => NodeRole::Other,
            },
            Self::Kotlin => match kind {
                "CLASS" => NodeRole::ClassLike,
                "FUN" => NodeRole::FunctionLike,
                "PRIMARY_CONSTRUCTOR" => NodeRole::PrimaryConstructor,
                "SECONDARY_CONSTRUCTOR" => NodeRole::SecondaryConstructor,
                _ => NodeRole::Other,
            },
            Self::Unknown => NodeRole::Other,
        }
    }

    /// Whether the dialect falls back to constructor nodes when no function encloses the selection.
    pub fn has_constructor_fallback(self) -> bool {
        matches!(self, Self::Kotlin)
    }
}

#[cfg(test)]
mod tests {
    use super::{NodeRole, SourceDialect};

    #[test]
    fn detect_by_extension_and_file_type() {
        assert_eq!(SourceDialect::detect("/src/Foo.java", None), SourceDialect::Java);
        assert_eq!(SourceDialect::detect("/src/Foo.KT", None), SourceDialect::Kotlin);
        assert_eq!(SourceDialect::detect("build.gradle.kts", None), SourceDialect::Kotlin);
        assert_eq!(SourceDialect::detect("/src/foo.rs", None), SourceDialect::Unknown);
        assert_eq!(
            SourceDialect::detect("/tmp/scratch", Some("Kotlin")),
            SourceDialect::Kotlin
        );
    }

    #[test]
    fn unknown_dialect_classifies_nothing() {
        assert_eq!(SourceDialect::Unknown.classify("CLASS"), NodeRole::Other);
        assert_eq!(SourceDialect::Java.classify("FUN"), NodeRole::Other);
        assert_eq!(SourceDialect::Kotlin.classify("FUN"), NodeRole::FunctionLike);
    }
}
