use retemplate_core::{
    rename_operation, Config, LocalFs, MemorySink, OutputFormatter, RenameOutcome, ValidationError,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

const MODULE_PACKAGE: &str = "changehere/src/commonMain/kotlin/com/tweener/changehere";
const SAMPLE_PACKAGE: &str = "sample/composeApp/src/commonMain/kotlin/com/tweener/changehere/sample";

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

/// A trimmed-down copy of the project template.
fn create_template(root: &Path) {
    write(
        root,
        "settings.gradle.kts",
        "rootProject.name = \"Kmplate_Library\"\n\ninclude(\":changehere\")\ninclude(\":sample:composeApp\")\n",
    );
    write(root, "README.md", "# Kmplate_Library\n\nRename changehere before use.\n");
    write(
        root,
        ".github/workflows/notify.yml",
        "name: Kmplate_Library release notification\n",
    );
    write(
        root,
        "buildSrc/src/main/kotlin/ProjectConfiguration.kt",
        "object ProjectConfiguration {\n    object MyProject {\n        const val packageName = \"com.tweener.changehere\"\n        const val namespace = \"$packageName.android\"\n    }\n}\n",
    );
    write(
        root,
        "buildSrc/src/main/kotlin/gradle/RenameDirectories.kt",
        "private const val PACKAGE = \"com.tweener.changehere\"\n",
    );
    write(
        root,
        "buildSrc/src/main/kotlin/RenameProjectTask.kt",
        "private const val ACTUAL_MODULE_NAME = \"changehere\"\n",
    );
    write(
        root,
        "changehere/build.gradle.kts",
        "android {\n    namespace = ProjectConfiguration.MyProject.namespace\n}\n\nbaseName = \"changehere\"\noutputFileName = \"changehere.js\"\n",
    );
    write(
        root,
        &format!("{MODULE_PACKAGE}/Library.kt"),
        "package com.tweener.changehere\n\nclass Library\n",
    );
    write(
        root,
        &format!("{MODULE_PACKAGE}/util/Strings.kt"),
        "package com.tweener.changehere.util\n\nimport com.tweener.changehere.Library\n",
    );
    write(
        root,
        "changehere/build/generated/Generated.kt",
        "package com.tweener.changehere.generated\n",
    );
    write(
        root,
        "sample/composeApp/build.gradle.kts",
        "dependencies {\n    api(project(\":changehere\"))\n}\n\nnamespace = ProjectConfiguration.MyProject.packageName + \".sample\"\n",
    );
    write(
        root,
        &format!("{SAMPLE_PACKAGE}/App.kt"),
        "package com.tweener.changehere.sample\n\nimport com.tweener.changehere.sample.ui.theme.MyProjectTheme\n\nfun App() = MyProjectTheme {}\n",
    );
    write(
        root,
        &format!("{SAMPLE_PACKAGE}/ui/theme/Theme.kt"),
        "package com.tweener.changehere.sample.ui.theme\n\nfun MyProjectTheme(content: () -> Unit) = content()\n",
    );
}

/// Every path below `root` with the content of files.
fn snapshot(root: &Path) -> BTreeMap<PathBuf, Option<Vec<u8>>> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|entry| {
            let entry = entry.unwrap();
            let relative = entry.path().strip_prefix(root).unwrap().to_path_buf();
            let content = entry
                .file_type()
                .is_file()
                .then(|| fs::read(entry.path()).unwrap());
            (relative, content)
        })
        .collect()
}

fn rename(root: &Path, dry_run: bool) -> (RenameOutcome, MemorySink) {
    let mut sink = MemorySink::new();
    let outcome = rename_operation(
        &LocalFs,
        root,
        Some("MyLibrary".to_string()),
        Some("org.example.mylib".to_string()),
        dry_run,
        &Config::default(),
        &mut sink,
    )
    .unwrap();
    (outcome, sink)
}

#[test]
fn test_actual_run_renames_template() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    create_template(root);

    let (outcome, _) = rename(root, false);

    assert_eq!(outcome.error_count(), 0);
    assert_eq!(outcome.module_name, "mylibrary");
    assert!(!root.join("changehere").exists());
    assert!(root.join("mylibrary").is_dir());

    let module_package = "mylibrary/src/commonMain/kotlin/org/example/mylib";
    assert_eq!(
        read(root, &format!("{module_package}/Library.kt")),
        "package org.example.mylib\n\nclass Library\n"
    );
    assert_eq!(
        read(root, &format!("{module_package}/util/Strings.kt")),
        "package org.example.mylib.util\n\nimport org.example.mylib.Library\n"
    );
    assert!(!root.join("mylibrary/src/commonMain/kotlin/com").exists());

    let sample_package = "sample/composeApp/src/commonMain/kotlin/org/example/mylib/sample";
    assert_eq!(
        read(root, &format!("{sample_package}/App.kt")),
        "package org.example.mylib.sample\n\nimport org.example.mylib.sample.ui.theme.MyLibraryTheme\n\nfun App() = MyLibraryTheme {}\n"
    );
    assert!(root.join(format!("{sample_package}/ui/theme/Theme.kt")).is_file());
    assert!(!root.join("sample/composeApp/src/commonMain/kotlin/com").exists());

    assert_eq!(
        read(root, "settings.gradle.kts"),
        "rootProject.name = \"MyLibrary\"\n\ninclude(\":mylibrary\")\ninclude(\":sample:composeApp\")\n"
    );
    assert_eq!(
        read(root, "buildSrc/src/main/kotlin/ProjectConfiguration.kt"),
        "object ProjectConfiguration {\n    object MyLibrary {\n        const val packageName = \"org.example.mylib\"\n        const val namespace = \"$packageName.android\"\n    }\n}\n"
    );
    assert_eq!(
        read(root, "mylibrary/build.gradle.kts"),
        "android {\n    namespace = ProjectConfiguration.MyLibrary.namespace\n}\n\nbaseName = \"mylibrary\"\noutputFileName = \"mylibrary.js\"\n"
    );
    assert_eq!(
        read(root, ".github/workflows/notify.yml"),
        "name: MyLibrary release notification\n"
    );
}

#[test]
fn test_actual_run_leaves_excluded_files_alone() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    create_template(root);

    rename(root, false);

    assert_eq!(
        read(root, "README.md"),
        "# Kmplate_Library\n\nRename changehere before use.\n"
    );
    assert_eq!(
        read(root, "buildSrc/src/main/kotlin/gradle/RenameDirectories.kt"),
        "private const val PACKAGE = \"com.tweener.changehere\"\n"
    );
    assert_eq!(
        read(root, "buildSrc/src/main/kotlin/RenameProjectTask.kt"),
        "private const val ACTUAL_MODULE_NAME = \"changehere\"\n"
    );
    // Build output travels with the module directory but is never rewritten
    assert_eq!(
        read(root, "mylibrary/build/generated/Generated.kt"),
        "package com.tweener.changehere.generated\n"
    );
}

#[test]
fn test_no_placeholder_statements_remain() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    create_template(root);

    rename(root, false);

    for entry in WalkDir::new(root).into_iter().filter_entry(|e| e.file_name() != "build") {
        let entry = entry.unwrap();
        let is_kotlin = entry.path().extension().is_some_and(|ext| ext == "kt");
        if !entry.file_type().is_file() || !is_kotlin || entry.path().starts_with(root.join("buildSrc")) {
            continue;
        }
        let content = fs::read_to_string(entry.path()).unwrap();
        assert!(
            !content.contains("package com.tweener.changehere"),
            "placeholder package left in {}",
            entry.path().display()
        );
        assert!(
            !content.contains("import com.tweener.changehere"),
            "placeholder import left in {}",
            entry.path().display()
        );
    }
}

#[test]
fn test_dry_run_changes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    create_template(root);
    let before = snapshot(root);

    let (outcome, sink) = rename(root, true);

    assert_eq!(snapshot(root), before);
    assert!(outcome.dry_run);
    assert!(!outcome.journal.is_empty());
    assert!(outcome
        .journal
        .directory_actions
        .iter()
        .chain(&outcome.journal.file_actions)
        .all(|action| action.is_simulated()));
    assert!(sink.contains("Dry run enabled. No changes will be applied."));
    assert!(outcome
        .format_summary()
        .ends_with("Dry run completed successfully!\n"));
}

#[test]
fn test_second_run_is_a_no_op() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    create_template(root);

    rename(root, false);
    let after_first = snapshot(root);

    let (outcome, _) = rename(root, false);

    assert!(outcome.journal.is_empty());
    assert_eq!(snapshot(root), after_first);
}

#[test]
fn test_stale_module_output_is_replaced() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    create_template(root);
    write(root, "mylibrary/build/outputs/old.aar", "stale");

    let (outcome, _) = rename(root, false);

    assert_eq!(outcome.error_count(), 0);
    assert!(!root.join("mylibrary/build/outputs/old.aar").exists());
    assert!(root.join("mylibrary/build.gradle.kts").is_file());
}

#[test]
fn test_invalid_names_touch_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    create_template(root);
    let before = snapshot(root);
    let mut sink = MemorySink::new();

    let err = rename_operation(
        &LocalFs,
        root,
        Some("MyLibrary".to_string()),
        Some("org.example.my-lib".to_string()),
        false,
        &Config::default(),
        &mut sink,
    )
    .unwrap_err();

    assert!(matches!(err, ValidationError::InvalidNamespace { .. }));
    assert_eq!(snapshot(root), before);
}
