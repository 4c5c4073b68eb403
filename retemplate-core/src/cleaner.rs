use crate::events::EventSink;
use crate::fs::FileSystem;
use crate::journal::{Action, StepReport};
use std::path::Path;

/// Delete `root/<module_name>` left over from an earlier run.
///
/// Only a directory that the template module is about to be renamed onto
/// counts as stale. Once the template module is gone the directory is the
/// output of a finished rename and stays.
///
/// Failures are logged and journaled; they never stop the run.
pub fn clean_stale_target(
    fs: &dyn FileSystem,
    root: &Path,
    placeholder_module: &str,
    module_name: &str,
    dry_run: bool,
    sink: &mut dyn EventSink,
) -> StepReport {
    sink.section("Deleting existing module directory");
    let mut report = StepReport::new();
    let module_dir = root.join(module_name);

    if !fs.is_dir(&module_dir) {
        sink.info(&format!(
            "No existing directory to delete: {}",
            module_dir.display()
        ));
        return report;
    }

    if module_name == placeholder_module || !fs.is_dir(&root.join(placeholder_module)) {
        sink.info(&format!(
            "Keeping {}: no template module left to rename onto it",
            module_dir.display()
        ));
        return report;
    }

    let description = format!("Deleted directory: {}", module_dir.display());
    if dry_run {
        sink.info(&format!(
            "Dry run: Directory to be deleted: {}",
            module_dir.display()
        ));
        report.directory(Action::simulated(description));
        return report;
    }

    match fs.remove_dir_all(&module_dir) {
        Ok(()) => {
            sink.info(&format!(
                "Deleted existing directory: {}",
                module_dir.display()
            ));
            report.directory(Action::executed(description));
        },
        Err(e) => {
            sink.error(&format!(
                "Error deleting directory: {}. Reason: {e}",
                module_dir.display()
            ));
            report.directory(Action::failed(description, e));
        },
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemorySink;
    use crate::fs::MemoryFs;

    #[test]
    fn test_deletes_existing_module_directory() {
        let fs = MemoryFs::new();
        fs.add_file("/p/mylibrary/build/out.txt", "stale");
        fs.add_dir("/p/changehere");
        let mut sink = MemorySink::new();

        let report = clean_stale_target(&fs, Path::new("/p"), "changehere", "mylibrary", false, &mut sink);

        assert!(!fs.exists(Path::new("/p/mylibrary")));
        assert_eq!(report.directory_actions.len(), 1);
        assert!(!report.directory_actions[0].is_error());
    }

    #[test]
    fn test_dry_run_keeps_directory() {
        let fs = MemoryFs::new();
        fs.add_file("/p/mylibrary/a.kt", "x");
        fs.add_dir("/p/changehere");
        let before = fs.snapshot();
        let mut sink = MemorySink::new();

        let report = clean_stale_target(&fs, Path::new("/p"), "changehere", "mylibrary", true, &mut sink);

        assert_eq!(fs.snapshot(), before);
        assert!(report.directory_actions[0].is_simulated());
        assert!(sink.contains("Dry run: Directory to be deleted"));
    }

    #[test]
    fn test_missing_directory_is_a_no_op() {
        let fs = MemoryFs::new();
        fs.add_dir("/p/sample");
        let mut sink = MemorySink::new();

        let report = clean_stale_target(&fs, Path::new("/p"), "changehere", "mylibrary", false, &mut sink);

        assert!(report.is_empty());
        assert!(sink.contains("No existing directory to delete"));
    }

    #[test]
    fn test_failure_is_recorded_not_raised() {
        let fs = MemoryFs::new();
        fs.add_file("/p/mylibrary/locked/a.kt", "x");
        fs.lock("/p/mylibrary/locked");
        fs.add_dir("/p/changehere");
        let mut sink = MemorySink::new();

        let report = clean_stale_target(&fs, Path::new("/p"), "changehere", "mylibrary", false, &mut sink);

        assert!(report.directory_actions[0].is_error());
        assert!(fs.exists(Path::new("/p/mylibrary/locked/a.kt")));
        assert_eq!(sink.messages(crate::events::Level::Error).len(), 1);
    }

    #[test]
    fn test_renamed_module_survives_rerun() {
        let fs = MemoryFs::new();
        fs.add_file("/p/mylibrary/src/Lib.kt", "package org.example.mylib");
        let before = fs.snapshot();
        let mut sink = MemorySink::new();

        let report = clean_stale_target(&fs, Path::new("/p"), "changehere", "mylibrary", false, &mut sink);

        assert!(report.is_empty());
        assert_eq!(fs.snapshot(), before);
    }

    #[test]
    fn test_module_named_like_placeholder_is_kept() {
        let fs = MemoryFs::new();
        fs.add_file("/p/changehere/build.gradle.kts", "x");
        let mut sink = MemorySink::new();

        let report = clean_stale_target(&fs, Path::new("/p"), "changehere", "changehere", false, &mut sink);

        assert!(report.is_empty());
        assert!(fs.exists(Path::new("/p/changehere/build.gradle.kts")));
    }
}
