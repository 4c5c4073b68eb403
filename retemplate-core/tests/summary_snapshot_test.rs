use retemplate_core::{rename_operation, Config, MemoryFs, MemorySink, OutputFormatter};
use std::path::Path;

fn template() -> MemoryFs {
    let fs = MemoryFs::new();
    fs.add_file(
        "/p/changehere/src/commonMain/kotlin/com/tweener/changehere/Lib.kt",
        "package com.tweener.changehere\n",
    );
    fs.add_file(
        "/p/settings.gradle.kts",
        "rootProject.name = \"Kmplate_Library\"\ninclude(\":changehere\")\n",
    );
    fs
}

fn summary(fs: &MemoryFs, dry_run: bool) -> String {
    let mut sink = MemorySink::new();
    rename_operation(
        fs,
        Path::new("/p"),
        Some("MyLibrary".to_string()),
        Some("org.example.mylib".to_string()),
        dry_run,
        &Config::default(),
        &mut sink,
    )
    .unwrap()
    .format_summary()
}

#[test]
fn test_actual_run_summary() {
    let fs = template();
    insta::assert_snapshot!(summary(&fs, false), @r"
    --- Summary (Actual Run) ---
    Renamed directories:
    /p/changehere -> /p/mylibrary
    Created directory: /p/mylibrary/src/commonMain/kotlin/org/example/mylib
    /p/mylibrary/src/commonMain/kotlin/com/tweener/changehere -> /p/mylibrary/src/commonMain/kotlin/org/example/mylib
    Deleted directory: /p/mylibrary/src/commonMain/kotlin/com/tweener/changehere
    Deleted empty directory: /p/mylibrary/src/commonMain/kotlin/com/tweener
    Deleted empty directory: /p/mylibrary/src/commonMain/kotlin/com

    Updated files:
    /p/mylibrary/src/commonMain/kotlin/org/example/mylib/Lib.kt
    /p/settings.gradle.kts
    ----------------
    Task completed successfully!
    ");
}

#[test]
fn test_rerun_summary_is_empty() {
    let fs = template();
    summary(&fs, false);
    insta::assert_snapshot!(summary(&fs, false), @r"
    --- Summary (Actual Run) ---
    Renamed directories:
    None

    Updated files:
    None
    ----------------
    Task completed successfully!
    ");
}
