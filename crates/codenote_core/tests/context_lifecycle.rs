use codenote_core::{
    CapturedSelection, CodeAnalyzer, CodeNoteContext, CodeNoteSettings, ExportScope,
    ImportMode, ImportOutcome, SourceDialect, SyntaxTree,
};
use std::fs;

fn settings_for(root: &std::path::Path) -> CodeNoteSettings {
    CodeNoteSettings {
        storage_path: root.to_string_lossy().into_owned(),
        ..CodeNoteSettings::default()
    }
}

#[test]
fn capture_navigate_and_reopen() {
    let storage = tempfile::tempdir().unwrap();
    let project = tempfile::tempdir().unwrap();
    let source = project.path().join("Service.java");
    fs::write(&source, "class Service {\n  void run() {\n    go();\n  }\n}\n").unwrap();

    let mut tree = SyntaxTree::new();
    let class = tree.add_node(None, "CLASS", Some("Service"), 0..50);
    tree.add_node(Some(class), "METHOD", Some("run"), 18..46);
    let structure = CodeAnalyzer::new().analyze_selection(&tree, SourceDialect::Java, 35, 40);

    let context = CodeNoteContext::start(settings_for(storage.path()));
    let id = context
        .notes()
        .capture_and_save(
            CapturedSelection {
                text: "  void run() {\n    go();".to_string(),
                file_path: source.to_string_lossy().into_owned(),
                start_line: 1,
                end_line: 2,
                project_base_path: Some(project.path().to_string_lossy().into_owned()),
            },
            structure,
        )
        .unwrap();

    let note = context.store().get(&id).unwrap();
    assert_eq!((note.start_line, note.end_line), (2, 3));
    assert_eq!(note.structure_summary(), "Service run(...)");

    let plan = context.plan_navigation(&note).unwrap();
    assert_eq!(plan.caret_line, 1);
    let highlight = plan.highlight.unwrap();
    assert_eq!(highlight.start, "class Service {\n".len());

    context.shutdown().unwrap();

    let reopened = CodeNoteContext::start(settings_for(storage.path()));
    assert!(reopened.store().contains(&id));
}

#[test]
fn transfer_is_wired_to_the_shared_store() {
    let storage = tempfile::tempdir().unwrap();
    let exports = tempfile::tempdir().unwrap();
    let context = CodeNoteContext::start(settings_for(storage.path()));
    context
        .notes()
        .capture_and_save(
            CapturedSelection {
                text: "x".to_string(),
                file_path: "/work/demo/a.kt".to_string(),
                start_line: 0,
                end_line: 0,
                project_base_path: None,
            },
            Default::default(),
        )
        .unwrap();

    let report = context
        .transfer()
        .export(&ExportScope::AllNotes, exports.path())
        .unwrap();
    let codenote_core::ExportReport::Written { path, count } = report else {
        panic!("export should write a file");
    };
    assert_eq!(count, 1);

    let outcome = context.transfer().import_file(&path, ImportMode::AddAll).unwrap();
    assert!(matches!(outcome, ImportOutcome::Completed(report) if report.imported == 1));
    assert_eq!(context.store().len(), 2);
}

#[test]
fn unreadable_document_gets_caret_only_plan() {
    let storage = tempfile::tempdir().unwrap();
    let project = tempfile::tempdir().unwrap();
    let binary = project.path().join("Blob.java");
    fs::write(&binary, [0xff, 0xfe, b'\n', 0xc3, b'\n']).unwrap();

    let context = CodeNoteContext::start(settings_for(storage.path()));
    let note = codenote_core::CodeNote::new("t", "x", binary.to_string_lossy(), 4, 6, "");
    let plan = context.plan_navigation(&note).unwrap();

    assert_eq!(plan.caret_line, 3);
    assert_eq!(plan.highlight, None);
}
