use crate::cleaner::clean_stale_target;
use crate::config::Config;
use crate::error::ValidationError;
use crate::events::EventSink;
use crate::fs::FileSystem;
use crate::journal::ActionJournal;
use crate::namespace::{NamespacePath, PathSegmentPattern};
use crate::output::RenameOutcome;
use crate::remap::{remap_hierarchy, RemapOptions};
use crate::request::RenameRequest;
use crate::rewrite::rewrite_contents;
use crate::substitution::SubstitutionTable;
use std::path::Path;

/// Rename operation - validates the parameters, then runs every step.
///
/// Validation is the only failure: once the request is valid the steps
/// absorb their own errors into the returned journal.
pub fn rename_operation(
    fs: &dyn FileSystem,
    root: &Path,
    project_name: Option<String>,
    package_name: Option<String>,
    dry_run: bool,
    config: &Config,
    sink: &mut dyn EventSink,
) -> Result<RenameOutcome, ValidationError> {
    let request = RenameRequest::from_parameters(project_name, package_name, dry_run)?;
    Ok(run_rename(fs, root, &request, config, sink))
}

/// Clean, remap, rewrite, in that order, with the same root and dry-run flag.
pub fn run_rename(
    fs: &dyn FileSystem,
    root: &Path,
    request: &RenameRequest,
    config: &Config,
    sink: &mut dyn EventSink,
) -> RenameOutcome {
    let module_name = request.module_name();
    let dry_run = request.dry_run();

    sink.info("Starting project rename task...");
    sink.info(&format!("Target project name: {}", request.target_identifier()));
    sink.info(&format!("Derived module name: {module_name}"));
    sink.info(&format!("Target package name: {}", request.target_namespace()));
    sink.info(if dry_run {
        "Dry run enabled. No changes will be applied."
    } else {
        "Applying changes..."
    });

    let cleaned = clean_stale_target(
        fs,
        root,
        &config.placeholders.module,
        &module_name,
        dry_run,
        sink,
    );

    let remap_options = RemapOptions {
        placeholder_module: &config.placeholders.module,
        module_name: &module_name,
        pattern: PathSegmentPattern::new(
            NamespacePath::parse(&config.placeholders.namespace),
            request.namespace_path(),
        ),
        roots: &config.remap.roots,
        dry_run,
    };
    let remapped = remap_hierarchy(fs, root, &remap_options, sink);

    let table = SubstitutionTable::new(&config.placeholders, request);
    let rewritten = rewrite_contents(fs, root, &table, &config.rewrite, dry_run, sink);

    RenameOutcome {
        project_name: request.target_identifier().to_string(),
        module_name,
        package_name: request.target_namespace().to_string(),
        dry_run,
        journal: ActionJournal::from_reports([cleaned, remapped, rewritten]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemorySink;
    use crate::fs::MemoryFs;

    #[test]
    fn test_validation_failure_touches_nothing() {
        let fs = MemoryFs::new();
        fs.add_file("/p/changehere/build.gradle.kts", "changehere");
        let before = fs.snapshot();
        let mut sink = MemorySink::new();

        let err = rename_operation(
            &fs,
            Path::new("/p"),
            Some("My-Lib".to_string()),
            Some("org.example.mylib".to_string()),
            false,
            &Config::default(),
            &mut sink,
        )
        .unwrap_err();

        assert!(matches!(err, ValidationError::InvalidIdentifier { .. }));
        assert_eq!(fs.snapshot(), before);
        assert!(sink.events.is_empty());
    }

    #[test]
    fn test_steps_run_in_order() {
        let fs = MemoryFs::new();
        fs.add_file("/p/mylibrary/stale.txt", "old output");
        fs.add_file("/p/changehere/build.gradle.kts", "baseName = \"changehere\"");
        let mut sink = MemorySink::new();

        let outcome = rename_operation(
            &fs,
            Path::new("/p"),
            Some("MyLibrary".to_string()),
            Some("org.example.mylib".to_string()),
            false,
            &Config::default(),
            &mut sink,
        )
        .unwrap();

        let sections = sink.messages(crate::events::Level::Section);
        assert_eq!(
            sections,
            vec![
                "Deleting existing module directory",
                "Renaming directories",
                "Updating words in files",
            ]
        );
        assert_eq!(outcome.module_name, "mylibrary");
        assert_eq!(
            outcome.journal.directory_actions[0].description,
            "Deleted directory: /p/mylibrary"
        );
        assert_eq!(
            outcome.journal.directory_actions[1].description,
            "/p/changehere -> /p/mylibrary"
        );
        assert!(!fs.exists(Path::new("/p/mylibrary/stale.txt")));
        assert_eq!(
            fs.read_to_string("/p/mylibrary/build.gradle.kts").unwrap(),
            "baseName = \"mylibrary\""
        );
        assert_eq!(outcome.error_count(), 0);
    }
}
