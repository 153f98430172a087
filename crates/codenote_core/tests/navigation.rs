use codenote_core::navigation::{infer_source_path, is_archive_path, parse_archive_path, TextRange};
use codenote_core::{
    CodeNote, LocalFileLookup, NavigationError, NavigationPlan, NavigationResolver,
    NavigationTarget,
};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::ZipWriter;

fn write_jar(dir: &Path, name: &str, entries: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(name);
    let mut writer = ZipWriter::new(File::create(&path).unwrap());
    for (entry, body) in entries {
        writer.start_file(*entry, FileOptions::default()).unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
    path
}

fn resolver() -> NavigationResolver<LocalFileLookup> {
    NavigationResolver::new(LocalFileLookup)
}

#[test]
fn archive_paths_split_and_infer_source() {
    let path = "/x/lib.jar!/com/Foo.class";
    assert!(is_archive_path(path));
    assert!(is_archive_path("/x/LIB.JAR!/com/Foo.class"));
    assert!(!is_archive_path("/x/src/Foo.java"));

    let parsed = parse_archive_path(path).unwrap();
    assert_eq!(parsed.archive_path, "/x/lib.jar");
    assert_eq!(parsed.internal_path, "com/Foo.class");
    assert_eq!(infer_source_path(&parsed.internal_path), "com/Foo.java");
}

#[test]
fn archive_entry_prefers_source_and_reads_text() {
    let dir = tempfile::tempdir().unwrap();
    let jar = write_jar(
        dir.path(),
        "lib.jar",
        &[
            ("com/Foo.class", "\u{1}binary"),
            ("com/Foo.java", "package com;\nclass Foo {}\n"),
        ],
    );
    let stored = format!("{}!/com/Foo.class", jar.display());

    let target = resolver().resolve(&stored).unwrap();
    assert_eq!(
        target,
        NavigationTarget::ArchiveEntry {
            archive_path: jar.clone(),
            entry_path: "com/Foo.java".to_string(),
        }
    );
    let text = LocalFileLookup.read_text(&target).unwrap();
    assert!(text.starts_with("package com;"));
}

#[test]
fn archive_without_source_falls_back_to_compiled_entry() {
    let dir = tempfile::tempdir().unwrap();
    let jar = write_jar(dir.path(), "only-classes.jar", &[("a/B.class", "bytes")]);

    let target = resolver()
        .resolve(&format!("{}!/a/B.class", jar.display()))
        .unwrap();
    assert!(matches!(
        target,
        NavigationTarget::ArchiveEntry { ref entry_path, .. } if entry_path == "a/B.class"
    ));

    let missing = resolver().resolve(&format!("{}!/a/C.class", jar.display()));
    assert!(matches!(missing, Err(NavigationError::EntryNotFound { .. })));
}

#[test]
fn archive_must_be_an_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let not_a_file = dir.path().join("classes.jar");
    fs::create_dir_all(&not_a_file).unwrap();

    let result = resolver().resolve(&format!("{}!/a/B.class", not_a_file.display()));
    assert!(matches!(result, Err(NavigationError::ArchiveNotFound(_))));

    let absent = resolver().resolve(&format!("{}/gone.jar!/a/B.class", dir.path().display()));
    assert!(matches!(absent, Err(NavigationError::ArchiveNotFound(_))));
}

#[test]
fn plain_files_resolve_and_plan_highlight() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("Main.java");
    fs::write(&source, "a\nbb\nccc\n").unwrap();
    let path = source.to_string_lossy().into_owned();

    let target = resolver().resolve(&path).unwrap();
    assert_eq!(target, NavigationTarget::LocalFile(source.clone()));

    let multi = CodeNote::new("t", "bb\nccc", path.clone(), 2, 3, "");
    let plan = NavigationPlan::for_document(target.clone(), &multi, "a\nbb\nccc\n");
    assert_eq!(plan.caret_line, 1);
    assert_eq!(plan.highlight, Some(TextRange { start: 2, end: 8 }));

    let single = CodeNote::new("t", "a", path.clone(), 1, 1, "");
    let plan = NavigationPlan::for_document(target.clone(), &single, "a\nbb\nccc\n");
    assert_eq!(plan.caret_line, 0);
    assert_eq!(plan.highlight, None);

    // lines past the end of a shrunken document are clamped
    let stale = CodeNote::new("t", "x", path, 3, 40, "");
    let plan = NavigationPlan::for_document(target, &stale, "a\nbb");
    assert_eq!(plan.caret_line, 1);
    assert_eq!(plan.highlight, Some(TextRange { start: 2, end: 4 }));
}

#[test]
fn missing_plain_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("Gone.java");
    let note = CodeNote::new("t", "x", missing.to_string_lossy(), 1, 1, "");
    assert!(matches!(
        resolver().resolve_note(&note),
        Err(NavigationError::FileNotFound(_))
    ));
}
