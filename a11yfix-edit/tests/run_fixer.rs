//! End-to-end run tests over in-memory and on-disk trees.

use a11yfix_domain::{
    AttributeFixer, AttributeRule, FsSourceTree, InMemorySourceTree, NON_UTF8_PATH,
};
use a11yfix_edit::{
    FileError, FileFix, FixOptions, RunObserver, report_from_summary, run_fixer,
};
use a11yfix_types::report::{ScanInfo, ToolInfo};
use camino::Utf8PathBuf;
use fs_err as fs;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn fixer() -> AttributeFixer {
    AttributeFixer::new(AttributeRule::default()).expect("default rule")
}

#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}

impl RunObserver for Recorder {
    fn file_fixed(&mut self, fix: &FileFix) {
        self.events
            .push(format!("fixed {} {}", fix.path, fix.insertions));
    }

    fn file_failed(&mut self, error: &FileError) {
        self.events.push(format!("failed {}", error.path()));
    }
}

fn create_temp_src() -> (TempDir, Utf8PathBuf) {
    let td = tempfile::tempdir().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(td.path().join("src")).expect("utf8");

    fs::create_dir_all(root.join("components")).unwrap();
    fs::write(
        root.join("App.tsx"),
        "<button onClick={a}>A</button>\n<button type=\"submit\">B</button>\n",
    )
    .unwrap();
    fs::write(
        root.join("components").join("Toolbar.tsx"),
        "<button\n  disabled\n>x</button>\n<button className=\"y\">y</button>\n",
    )
    .unwrap();
    fs::write(root.join("components").join("Plain.tsx"), "<button>ok</button>\n").unwrap();
    fs::write(root.join("notes.ts"), "<button onClick={a}>A</button>\n").unwrap();

    (td, root)
}

#[test]
fn counts_files_and_insertions_across_the_tree() {
    let (_td, root) = create_temp_src();
    let tree = FsSourceTree::new(root.clone());
    let mut recorder = Recorder::default();

    let summary = run_fixer(&tree, &fixer(), "tsx", &FixOptions::default(), &mut recorder)
        .expect("run");

    assert_eq!(summary.files_scanned, 3);
    assert_eq!(summary.fixed.len(), 2);
    assert_eq!(summary.total_insertions, 3);
    assert!(summary.failures.is_empty());
    assert_eq!(
        recorder.events,
        vec![
            format!("fixed {} 1", root.join("App.tsx")),
            format!("fixed {} 2", root.join("components").join("Toolbar.tsx")),
        ]
    );

    assert_eq!(
        fs::read_to_string(root.join("App.tsx")).unwrap(),
        "<button type=\"button\" onClick={a}>A</button>\n<button type=\"submit\">B</button>\n"
    );
    assert_eq!(
        fs::read_to_string(root.join("components").join("Toolbar.tsx")).unwrap(),
        "<button\n  type=\"button\" disabled\n>x</button>\n<button type=\"button\" className=\"y\">y</button>\n"
    );
    // Untouched: no qualifying occurrence, or not the scanned extension.
    assert_eq!(
        fs::read_to_string(root.join("components").join("Plain.tsx")).unwrap(),
        "<button>ok</button>\n"
    );
    assert_eq!(
        fs::read_to_string(root.join("notes.ts")).unwrap(),
        "<button onClick={a}>A</button>\n"
    );
}

#[test]
fn second_run_reports_nothing() {
    let (_td, root) = create_temp_src();
    let tree = FsSourceTree::new(root.clone());

    run_fixer(&tree, &fixer(), "tsx", &FixOptions::default(), &mut ()).expect("first run");
    let after_first = fs::read_to_string(root.join("App.tsx")).unwrap();

    let second =
        run_fixer(&tree, &fixer(), "tsx", &FixOptions::default(), &mut ()).expect("second run");

    assert_eq!(second.total_insertions, 0);
    assert!(second.fixed.is_empty());
    assert_eq!(fs::read_to_string(root.join("App.tsx")).unwrap(), after_first);
}

#[test]
fn undecodable_file_is_reported_and_skipped() {
    let tree = InMemorySourceTree::new("src")
        .with_file("A.tsx", "<button onClick={a}>")
        .with_file("B.tsx", vec![b'<', 0xff, 0xfe, b'>'])
        .with_file("C.tsx", "<button id=\"c\">");
    let mut recorder = Recorder::default();

    let summary =
        run_fixer(&tree, &fixer(), "tsx", &FixOptions::default(), &mut recorder).expect("run");

    assert_eq!(summary.files_scanned, 3);
    assert_eq!(summary.total_insertions, 2);
    assert_eq!(summary.failures.len(), 1);
    assert!(matches!(summary.failures[0], FileError::Read { .. }));
    assert_eq!(summary.failures[0].path().as_str(), "src/B.tsx");
    assert_eq!(
        recorder.events,
        vec![
            "fixed src/A.tsx 1".to_string(),
            "failed src/B.tsx".to_string(),
            "fixed src/C.tsx 1".to_string(),
        ]
    );
    assert_eq!(
        tree.contents("C.tsx").as_deref(),
        Some("<button type=\"button\" id=\"c\">")
    );
}

#[test]
fn write_failure_counts_as_zero_and_run_continues() {
    let tree = InMemorySourceTree::new("src")
        .with_file("A.tsx", "<button onClick={a}>")
        .with_file("B.tsx", "<button onClick={b}>")
        .with_read_only("A.tsx");

    let summary =
        run_fixer(&tree, &fixer(), "tsx", &FixOptions::default(), &mut ()).expect("run");

    assert_eq!(summary.total_insertions, 1);
    assert_eq!(summary.fixed.len(), 1);
    assert_eq!(summary.fixed[0].path.as_str(), "src/B.tsx");
    assert_eq!(summary.failures.len(), 1);
    assert!(matches!(summary.failures[0], FileError::Write { .. }));
    assert_eq!(tree.contents("A.tsx").as_deref(), Some("<button onClick={a}>"));
}

#[test]
fn dry_run_collects_patch_without_writing() {
    let tree = InMemorySourceTree::new("src")
        .with_file("A.tsx", "<button onClick={a}>\n")
        .with_file("B.tsx", "<span />\n");
    let opts = FixOptions {
        dry_run: true,
        with_patch: true,
    };

    let summary = run_fixer(&tree, &fixer(), "tsx", &opts, &mut ()).expect("run");

    assert_eq!(summary.total_insertions, 1);
    assert_eq!(tree.write_count(), 0);
    let patch = summary.patch();
    assert!(patch.starts_with("diff --git a/src/A.tsx b/src/A.tsx\n"));
    assert!(!patch.contains("B.tsx"));
}

#[test]
fn report_mirrors_summary() {
    let tree = InMemorySourceTree::new("src")
        .with_file("A.tsx", "<button a><button b>")
        .with_file("B.tsx", vec![0xffu8]);

    let summary =
        run_fixer(&tree, &fixer(), "tsx", &FixOptions::default(), &mut ()).expect("run");
    let report = report_from_summary(
        &summary,
        ToolInfo {
            name: "a11yfix".to_string(),
            version: None,
        },
        ScanInfo {
            root: "src".into(),
            extension: "tsx".to_string(),
        },
        &AttributeRule::default(),
        false,
    );

    assert_eq!(report.summary.files_scanned, 2);
    assert_eq!(report.summary.files_fixed, 1);
    assert_eq!(report.summary.files_failed, 1);
    assert_eq!(report.summary.total_insertions, 2);
    assert_eq!(report.fixed[0].path.as_str(), "src/A.tsx");
    assert_eq!(report.failures[0].path.as_str(), "src/B.tsx");
    assert_eq!(report.rule.tag, "button");
    assert!(report.run.ended_at.is_some());
}

#[test]
fn skipped_entries_are_reported_as_failures_after_files() {
    let tree = InMemorySourceTree::new("src")
        .with_file("A.tsx", "<button onClick={a}>")
        .with_skipped("\u{FFFD}Weird.tsx", NON_UTF8_PATH);
    let mut recorder = Recorder::default();

    let summary =
        run_fixer(&tree, &fixer(), "tsx", &FixOptions::default(), &mut recorder).expect("run");

    assert_eq!(summary.files_scanned, 2);
    assert_eq!(summary.total_insertions, 1);
    assert_eq!(summary.failures.len(), 1);
    assert!(matches!(summary.failures[0], FileError::Skipped { .. }));
    assert_eq!(summary.failures[0].cause(), NON_UTF8_PATH);
    assert_eq!(
        recorder.events,
        vec![
            "fixed src/A.tsx 1".to_string(),
            "failed src/\u{FFFD}Weird.tsx".to_string(),
        ]
    );
}
