use codenote_core::analysis::{NodeRole, SyntaxNodeId};
use codenote_core::{CodeAnalyzer, CodeStructureInfo, SourceDialect, SyntaxTree};

/// `class Service { void handle() { <body> } }` with byte ranges.
fn java_tree() -> (SyntaxTree, SyntaxNodeId) {
    let mut tree = SyntaxTree::new();
    let file = tree.add_node(None, "FILE", None, 0..200);
    let class = tree.add_node(Some(file), "CLASS", Some("Service"), 0..200);
    let method = tree.add_node(Some(class), "METHOD", Some("handle"), 20..120);
    let body = tree.add_node(Some(method), "CODE_BLOCK", None, 40..120);
    tree.add_node(Some(body), "STATEMENT", None, 50..70);
    tree.add_node(Some(body), "STATEMENT", None, 80..100);
    (tree, body)
}

#[test]
fn java_selection_reports_class_and_method() {
    let (tree, _) = java_tree();
    let info = CodeAnalyzer::new().analyze_selection(&tree, SourceDialect::Java, 55, 60);
    assert_eq!(
        info,
        CodeStructureInfo {
            class_name: Some("Service".to_string()),
            method_name: Some("handle".to_string()),
            method_signature: Some("handle(...)".to_string()),
        }
    );
}

#[test]
fn multi_leaf_selection_uses_common_ancestor() {
    let (tree, _) = java_tree();
    // spans both statements; their common ancestor is the method body
    let info = CodeAnalyzer::new().analyze_selection(&tree, SourceDialect::Java, 55, 95);
    assert_eq!(info.method_name.as_deref(), Some("handle"));

    // spans the method and class-level code; only the class encloses both
    let outside = CodeAnalyzer::new().analyze_selection(&tree, SourceDialect::Java, 10, 95);
    assert_eq!(outside.class_name.as_deref(), Some("Service"));
    assert_eq!(outside.method_name, None);
    assert_eq!(outside.method_signature, None);
}

#[test]
fn kotlin_constructor_fallback_and_unnamed_function() {
    let mut tree = SyntaxTree::new();
    let class = tree.add_node(None, "CLASS", Some("Account"), 0..300);
    let ctor = tree.add_node(Some(class), "PRIMARY_CONSTRUCTOR", None, 10..40);
    tree.add_node(Some(ctor), "VALUE_PARAMETER", Some("id"), 15..25);
    tree.add_node(Some(class), "FUN", None, 100..200);

    let analyzer = CodeAnalyzer::new();
    let in_ctor = analyzer.analyze_selection(&tree, SourceDialect::Kotlin, 16, 20);
    assert_eq!(in_ctor.method_name.as_deref(), Some("<init>"));
    assert_eq!(in_ctor.method_signature.as_deref(), Some("Account(...)"));

    let in_fun = analyzer.analyze_selection(&tree, SourceDialect::Kotlin, 120, 130);
    assert_eq!(in_fun.method_name, None);
    assert_eq!(in_fun.method_signature.as_deref(), Some("unknown(...)"));
}

#[test]
fn unknown_dialect_degrades_to_empty_info() {
    let (tree, _) = java_tree();
    let dialect = SourceDialect::detect("/work/readme.md", None);
    assert_eq!(dialect, SourceDialect::Unknown);
    assert_eq!(dialect.classify("CLASS"), NodeRole::Other);
    assert!(CodeAnalyzer::new()
        .analyze_selection(&tree, dialect, 55, 60)
        .is_empty());

    assert_eq!(SourceDialect::detect("/a/B.KT", None), SourceDialect::Kotlin);
    assert_eq!(SourceDialect::detect("/a/B.txt", Some("JAVA")), SourceDialect::Java);
}

#[test]
fn analyze_node_includes_the_node_itself() {
    let (tree, body) = java_tree();
    let info = CodeAnalyzer::new().analyze_node(&tree, SourceDialect::Java, body);
    assert_eq!(info.class_name.as_deref(), Some("Service"));
    assert_eq!(info.method_name.as_deref(), Some("handle"));
}
