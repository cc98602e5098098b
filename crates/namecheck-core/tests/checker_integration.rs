//! Integration test: naming checks end-to-end via Checker.
//!
//! Every test builds a real directory tree under a temporary directory,
//! runs a checker over it and inspects the report.

use namecheck_core::rules::load_scheme_from_toml;
use namecheck_core::{
    CheckReport, Checker, Config, CustomLists, NamingRule, RuleKind, RuleSet, RunStatus,
    Severity, ViolationKind,
};
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use tempfile::TempDir;

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, b"").expect("write file");
}

fn mkdir(root: &Path, relative: &str) {
    fs::create_dir_all(root.join(relative)).expect("create dir");
}

fn school_lists() -> CustomLists {
    let mut lists = CustomLists::new();
    lists
        .insert("年级", vec!["1年级".into(), "2年级".into()])
        .unwrap();
    lists
        .insert("学科", vec!["数学".into(), "语文".into()])
        .unwrap();
    lists
}

fn school_rules() -> RuleSet {
    RuleSet::new()
        .with(
            RuleKind::Folder,
            0,
            NamingRule::new("[年级]").with_required_lists(["年级"]),
        )
        .with(
            RuleKind::File,
            1,
            NamingRule::new("[学科]_[日期8位]")
                .with_required_lists(["学科"])
                .with_extensions([".pdf"]),
        )
}

fn run(root: &Path, lists: CustomLists, rules: RuleSet) -> CheckReport {
    Checker::builder()
        .root(root)
        .lists(lists)
        .rules(rules)
        .build()
        .expect("checker should build")
        .run()
        .expect("run should succeed")
}

fn kinds(report: &CheckReport) -> Vec<ViolationKind> {
    report.violations.iter().map(|v| v.kind).collect()
}

fn grade_lists() -> CustomLists {
    let mut lists = CustomLists::new();
    lists
        .insert("Grade", vec!["G1".into(), "G2".into()])
        .unwrap();
    lists
}

// ── End-to-end scenario ──

#[test]
fn conforming_tree_has_no_violations() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "1年级/数学_20230101.pdf");

    let report = run(dir.path(), school_lists(), school_rules());
    assert!(report.is_clean(), "unexpected: {:#?}", report.violations);
    assert_eq!(report.dirs_checked, 2);
    assert_eq!(report.files_checked, 1);
    assert_eq!(report.status, RunStatus::Completed);
}

#[test]
fn bad_folder_name_reports_once_and_keeps_parent_context() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "3年级/数学_20230101.pdf");

    let report = run(dir.path(), school_lists(), school_rules());
    assert_eq!(kinds(&report), vec![ViolationKind::FolderNaming]);

    let v = &report.violations[0];
    assert_eq!(v.depth, 1);
    assert_eq!(v.path, dir.path().join("3年级"));
    assert_eq!(v.actual_name.as_deref(), Some("3年级"));
    assert_eq!(v.expected_pattern.as_deref(), Some("[年级]"));
}

// ── Depth indexing ──

#[test]
fn root_name_is_never_checked() {
    let dir = TempDir::new().unwrap();
    let rules = RuleSet::new().with(RuleKind::Folder, 0, NamingRule::new("[数字]"));

    let report = run(dir.path(), CustomLists::new(), rules);
    assert!(report.is_clean());
}

#[test]
fn first_level_folders_use_folder_rule_zero() {
    let dir = TempDir::new().unwrap();
    mkdir(dir.path(), "12");
    mkdir(dir.path(), "ab");
    mkdir(dir.path(), "12/ab");
    let rules = RuleSet::new().with(RuleKind::Folder, 0, NamingRule::new("[数字]"));

    let report = run(dir.path(), CustomLists::new(), rules);
    assert_eq!(kinds(&report), vec![ViolationKind::FolderNaming]);
    assert_eq!(report.violations[0].path, dir.path().join("ab"));
}

#[test]
fn file_rule_zero_applies_only_to_root_files() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "abc.txt");
    touch(dir.path(), "123.txt");
    touch(dir.path(), "sub/abc.txt");
    let rules = RuleSet::new().with(RuleKind::File, 0, NamingRule::new("[数字]"));

    let report = run(dir.path(), CustomLists::new(), rules);
    assert_eq!(kinds(&report), vec![ViolationKind::FileNaming]);
    assert_eq!(report.violations[0].path, dir.path().join("abc.txt"));
    assert_eq!(report.violations[0].depth, 1);
    assert_eq!(report.violations[0].actual_name.as_deref(), Some("abc"));
}

#[test]
fn depth_gaps_are_unchecked() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "x/y/z/bad name.txt");
    let rules = RuleSet::new()
        .with(RuleKind::Folder, 0, NamingRule::new("x"))
        .with(RuleKind::File, 0, NamingRule::new("[数字]"));

    let report = run(dir.path(), CustomLists::new(), rules);
    assert!(report.is_clean());
    assert_eq!(report.dirs_checked, 4);
}

// ── Context propagation ──

#[test]
fn failed_folder_contributes_no_values() {
    let dir = TempDir::new().unwrap();
    // "G2-wrong" fails its rule; the file must be compared against G1.
    touch(dir.path(), "G1/G2-wrong/G2_1.txt");
    let rules = RuleSet::new()
        .with(RuleKind::Folder, 0, NamingRule::new("[Grade]"))
        .with(
            RuleKind::Folder,
            1,
            NamingRule::new("[Grade]-sub").with_required_lists(["Grade"]),
        )
        .with(
            RuleKind::File,
            2,
            NamingRule::new("[Grade]_[数字]").with_required_lists(["Grade"]),
        );

    let report = run(dir.path(), grade_lists(), rules);
    assert_eq!(
        kinds(&report),
        vec![ViolationKind::FolderNaming, ViolationKind::ListMismatch]
    );
    let mismatch = report.violations[1].list_value.as_ref().unwrap();
    assert_eq!(mismatch.expected, "G1");
    assert_eq!(mismatch.actual, "G2");
}

#[test]
fn siblings_do_not_see_each_other() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "G1/X/G1_1.txt");
    touch(dir.path(), "G2/Y/G2_1.txt");
    let rules = RuleSet::new()
        .with(RuleKind::Folder, 0, NamingRule::new("[Grade]"))
        .with(
            RuleKind::File,
            2,
            NamingRule::new("[Grade]_[数字]").with_required_lists(["Grade"]),
        );

    let report = run(dir.path(), grade_lists(), rules.clone());
    assert!(report.is_clean(), "unexpected: {:#?}", report.violations);

    touch(dir.path(), "G1/X/G2_5.txt");
    let report = run(dir.path(), grade_lists(), rules);
    assert_eq!(kinds(&report), vec![ViolationKind::ListMismatch]);
    let v = &report.violations[0];
    assert_eq!(v.path, dir.path().join("G1/X/G2_5.txt"));
    assert_eq!(v.depth, 3);
    assert_eq!(v.list_value.as_ref().unwrap().expected, "G1");
}

#[test]
fn folder_mismatch_against_ancestor() {
    let dir = TempDir::new().unwrap();
    mkdir(dir.path(), "1年级/2年级数学");
    let rules = RuleSet::new()
        .with(RuleKind::Folder, 0, NamingRule::new("[年级]"))
        .with(
            RuleKind::Folder,
            1,
            NamingRule::new("[年级][学科]").with_required_lists(["年级"]),
        );

    let report = run(dir.path(), school_lists(), rules);
    assert_eq!(kinds(&report), vec![ViolationKind::ListMismatch]);
    assert_eq!(report.violations[0].depth, 2);
}

#[test]
fn list_compared_only_when_present_on_both_sides() {
    let dir = TempDir::new().unwrap();
    // The folder resolves 年级 only; the file resolves 学科 only.
    touch(dir.path(), "1年级/数学_20230101.pdf");
    let rules = RuleSet::new()
        .with(RuleKind::Folder, 0, NamingRule::new("[年级]"))
        .with(
            RuleKind::File,
            1,
            NamingRule::new("[学科]_[日期8位]").with_required_lists(["年级", "学科"]),
        );

    let report = run(dir.path(), school_lists(), rules);
    assert!(report.is_clean());
}

#[test]
fn unrequired_list_is_not_compared() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "1年级/2年级.txt");
    let rules = RuleSet::new()
        .with(RuleKind::Folder, 0, NamingRule::new("[年级]"))
        .with(RuleKind::File, 1, NamingRule::new("[年级]"));

    let report = run(dir.path(), school_lists(), rules);
    assert!(report.is_clean());
}

// ── File checks ──

#[test]
fn name_and_extension_checks_are_independent() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "1年级/英语_20230101.pdf");
    touch(dir.path(), "1年级/数学_20230101.docx");
    touch(dir.path(), "1年级/数学_20230102.PDF");

    // Files are visited in name order.
    let report = run(dir.path(), school_lists(), school_rules());
    assert_eq!(
        kinds(&report),
        vec![ViolationKind::Extension, ViolationKind::FileNaming]
    );
    assert_eq!(
        report.violations[0].path,
        dir.path().join("1年级/数学_20230101.docx")
    );
    assert_eq!(report.violations[0].expected_extensions, vec![".pdf"]);
    assert_eq!(
        report.violations[1].path,
        dir.path().join("1年级/英语_20230101.pdf")
    );
}

#[test]
fn both_file_checks_can_fail_together() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "1年级/notes.txt");

    let report = run(dir.path(), school_lists(), school_rules());
    assert_eq!(
        kinds(&report),
        vec![ViolationKind::FileNaming, ViolationKind::Extension]
    );
}

// ── Failures inside the tree ──

#[test]
fn broken_pattern_is_reported_once_and_rejects_names() {
    let dir = TempDir::new().unwrap();
    mkdir(dir.path(), "1年级");
    mkdir(dir.path(), "2年级");
    let rules = RuleSet::new().with(RuleKind::Folder, 0, NamingRule::new("([年级]"));

    let report = run(dir.path(), school_lists(), rules);
    assert_eq!(
        kinds(&report),
        vec![
            ViolationKind::PatternCompile,
            ViolationKind::FolderNaming,
            ViolationKind::FolderNaming,
        ]
    );
    let compile = &report.violations[0];
    assert_eq!(compile.path, dir.path());
    assert_eq!(compile.depth, 1);
    assert_eq!(compile.expected_pattern.as_deref(), Some("([年级]"));
}

#[cfg(unix)]
#[test]
fn unreadable_directory_is_reported_and_siblings_continue() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    touch(dir.path(), "locked/inner.txt");
    touch(dir.path(), "open/bad.txt");
    let locked = dir.path().join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Permission bits do not bind privileged users.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let rules = RuleSet::new().with(RuleKind::File, 1, NamingRule::new("[数字]"));
    let report = run(dir.path(), CustomLists::new(), rules);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(
        kinds(&report),
        vec![ViolationKind::DirectoryAccess, ViolationKind::FileNaming]
    );
    let access = &report.violations[0];
    assert_eq!(access.path, locked);
    assert_eq!(access.depth, 2);
    assert_eq!(access.severity, Severity::Warning);
    assert_eq!(report.violations[1].path, dir.path().join("open/bad.txt"));
}

#[cfg(unix)]
#[test]
fn symlink_cycle_is_reported_not_followed() {
    let dir = TempDir::new().unwrap();
    mkdir(dir.path(), "a");
    std::os::unix::fs::symlink(dir.path(), dir.path().join("a/loop")).unwrap();

    let report = run(dir.path(), CustomLists::new(), RuleSet::new());
    assert_eq!(kinds(&report), vec![ViolationKind::DirectoryAccess]);
    assert_eq!(report.violations[0].path, dir.path().join("a/loop"));
    assert!(report.violations[0].message.contains("symlink cycle"));
}

#[cfg(unix)]
#[test]
fn symlinks_skipped_when_not_following() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "target/bad.txt");
    std::os::unix::fs::symlink(dir.path().join("target"), dir.path().join("link")).unwrap();
    let rules = RuleSet::new().with(RuleKind::File, 1, NamingRule::new("[数字]"));

    let followed = run(dir.path(), CustomLists::new(), rules.clone());
    assert_eq!(followed.violations.len(), 2);

    let report = Checker::builder()
        .root(dir.path())
        .rules(rules)
        .follow_symlinks(false)
        .build()
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(kinds(&report), vec![ViolationKind::FileNaming]);
    assert_eq!(report.violations[0].path, dir.path().join("target/bad.txt"));
}

// ── Run control ──

#[test]
fn cancelled_run_is_partial() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "bad.txt");
    let rules = RuleSet::new().with(RuleKind::File, 0, NamingRule::new("[数字]"));
    let checker = Checker::builder()
        .root(dir.path())
        .rules(rules)
        .build()
        .unwrap();

    let report = checker.run_with_cancel(&AtomicBool::new(true)).unwrap();
    assert!(report.is_cancelled());
    assert!(report.is_clean());
    assert_eq!(report.dirs_checked, 0);
    assert!(report.format_text().contains("cancelled"));

    let report = checker.run_with_cancel(&AtomicBool::new(false)).unwrap();
    assert!(!report.is_cancelled());
    assert_eq!(report.violations.len(), 1);
}

#[test]
fn repeated_runs_start_fresh() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "bad.txt");
    let rules = RuleSet::new().with(RuleKind::File, 0, NamingRule::new("[数字]"));
    let checker = Checker::builder()
        .root(dir.path())
        .rules(rules)
        .build()
        .unwrap();

    assert_eq!(checker.run().unwrap().violations.len(), 1);
    assert_eq!(checker.run().unwrap().violations.len(), 1);
}

#[test]
fn excluded_entries_are_skipped() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "1年级/数学_20230101.pdf");
    touch(dir.path(), "1年级/draft.tmp");
    touch(dir.path(), "草稿/whatever.txt");

    let report = Checker::builder()
        .root(dir.path())
        .lists(school_lists())
        .rules(school_rules())
        .exclude("草稿")
        .exclude("**/*.tmp")
        .build()
        .unwrap()
        .run()
        .unwrap();
    assert!(report.is_clean(), "unexpected: {:#?}", report.violations);
    assert_eq!(report.files_checked, 1);
}

// ── TOML-driven ──

const SCHEME: &str = r#"
[checker]
exclude = ["草稿"]
fail_on = "warning"

[lists]
"年级" = ["1年级", "2年级"]
"学科" = ["数学", "语文"]

[[folder-rules]]
level = 1
pattern = "[年级]"

[[folder-rules]]
level = 2
pattern = "[年级][学科]"

[[file-rules]]
level = 3
pattern = "[学科]_[日期8位]"
extensions = ["PDF"]

[severity]
list-mismatch = "warning"
"#;

#[test]
fn toml_scheme_end_to_end() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "1年级/1年级数学/数学_20230101.pdf");
    touch(dir.path(), "1年级/2年级语文/数学_20230101.pdf");
    touch(dir.path(), "草稿/anything.doc");

    let scheme = load_scheme_from_toml(SCHEME).unwrap();
    let config = Config::parse(SCHEME).unwrap();
    assert_eq!(config.checker.fail_on, Some(Severity::Warning));

    let report = Checker::builder()
        .root(dir.path())
        .scheme(scheme)
        .config(config)
        .build()
        .unwrap()
        .run()
        .unwrap();

    // 2年级语文 disagrees with 1年级 on 年级; its file disagrees on 学科.
    assert_eq!(
        kinds(&report),
        vec![ViolationKind::ListMismatch, ViolationKind::ListMismatch]
    );
    assert!(report
        .violations
        .iter()
        .all(|v| v.severity == Severity::Warning));
    assert_eq!(
        report.violations[0].path,
        dir.path().join("1年级/2年级语文")
    );
    assert_eq!(
        report.violations[1].path,
        dir.path().join("1年级/2年级语文/数学_20230101.pdf")
    );
    assert!(report.has_violations_at(Severity::Warning));
    assert!(!report.has_violations_at(Severity::Error));
}
