use std::fs;

use cyrillize::local_files::local;
use cyrillize::plan::{auto_resolve, execute, recompute_conflicts, scan, session, ScanOptions};
use cyrillize::translit::Transliterator;
use tempfile::tempdir;

#[test]
fn file_and_directory_are_renamed_in_one_pass() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("privet.txt"), "hello").unwrap();
    fs::create_dir(dir.path().join("mir")).unwrap();

    let local = local();
    let plan = scan(dir.path(), &Transliterator::default(), &ScanOptions::default(), &local)
        .unwrap();

    let proposed: Vec<&str> = plan.entries().iter().map(|e| e.new_name.as_str()).collect();
    assert_eq!(proposed, vec!["мир", "привет.txt"]);

    let conflicts = recompute_conflicts(&plan, &local);
    assert!(conflicts.is_empty());

    let report = execute(&plan, &conflicts, &local);
    assert_eq!((report.renamed, report.errors), (2, 0));
    assert_eq!(fs::read_to_string(dir.path().join("привет.txt")).unwrap(), "hello");
    assert!(dir.path().join("мир").is_dir());
}

#[test]
fn colliding_names_are_resolved_then_applied() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("kot.txt"), "lower").unwrap();
    // q and k share a mapping, so both propose кот.txt
    fs::write(dir.path().join("qot.txt"), "q").unwrap();

    let local = local();
    let mut plan = scan(dir.path(), &Transliterator::default(), &ScanOptions::default(), &local)
        .unwrap();

    let conflicts = recompute_conflicts(&plan, &local);
    assert_eq!(conflicts.len(), 2);

    let resolved = auto_resolve(&mut plan, &conflicts, &local);
    assert!(resolved.unresolved.is_empty());

    let mut names: Vec<&str> = plan.entries().iter().map(|e| e.new_name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["кот.txt", "кот_1.txt"]);

    let conflicts = recompute_conflicts(&plan, &local);
    assert!(conflicts.is_empty());

    let report = execute(&plan, &conflicts, &local);
    assert_eq!((report.renamed, report.errors), (2, 0));
    assert!(dir.path().join("кот.txt").exists());
    assert!(dir.path().join("кот_1.txt").exists());
    assert!(!dir.path().join("kot.txt").exists());
}

#[test]
fn saved_session_can_be_edited_and_applied_later() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("tree");
    fs::create_dir_all(root.join("docs")).unwrap();
    fs::write(root.join("docs").join("zametki.md"), "").unwrap();
    fs::write(root.join("keep.txt"), "").unwrap();

    let local = local();
    let plan = scan(&root, &Transliterator::default(), &ScanOptions::default(), &local).unwrap();
    let session_file = dir.path().join("plan.json");
    session::save(&plan, &session_file).unwrap();

    let mut restored = session::load(&session_file).unwrap();
    let keep = restored.find_by_path("keep.txt").unwrap();
    restored.set_rename_requested(keep, false).unwrap();
    let notes = restored.find_by_path("docs/zametki.md").unwrap();
    restored.set_new_name(notes, "заметки.md").unwrap();

    let conflicts = recompute_conflicts(&restored, &local);
    let report = execute(&restored, &conflicts, &local);

    assert_eq!((report.renamed, report.errors), (2, 0));
    assert!(root.join("keep.txt").exists());
    assert!(root.join("доцс").join("заметки.md").exists());
}

#[test]
fn session_from_relative_root_records_absolute_root() {
    let dir = tempfile::tempdir_in(".").unwrap();
    fs::write(dir.path().join("kot.txt"), "").unwrap();
    let relative = std::path::Path::new(".").join(dir.path().file_name().unwrap());

    let local = local();
    let plan = scan(&relative, &Transliterator::default(), &ScanOptions::default(), &local)
        .unwrap();
    let session_file = dir.path().join("plan.json");
    session::save(&plan, &session_file).unwrap();

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&session_file).unwrap()).unwrap();
    let root = std::path::PathBuf::from(saved["root"].as_str().unwrap());
    assert!(root.is_absolute());
    assert_eq!(root, fs::canonicalize(dir.path()).unwrap());
}
