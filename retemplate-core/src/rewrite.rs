use crate::config::RewriteRules;
use crate::events::EventSink;
use crate::fs::{FileSystem, FsEntry, Walk};
use crate::journal::{Action, StepReport};
use crate::substitution::SubstitutionTable;
use content_inspector::ContentType;
use similar::TextDiff;
use std::path::Path;

/// Rewrite placeholder tokens in every candidate file under `root`.
pub fn rewrite_contents(
    fs: &dyn FileSystem,
    root: &Path,
    table: &SubstitutionTable,
    rules: &RewriteRules,
    dry_run: bool,
    sink: &mut dyn EventSink,
) -> StepReport {
    sink.section("Updating words in files");
    let mut report = StepReport::new();

    let candidates = collect_candidates(fs, root, rules);
    for failure in candidates.errors {
        let display = failure.path.display().to_string();
        sink.error(&format!(
            "Error listing directory: {display}. Reason: {}",
            failure.error
        ));
        report.file(Action::failed(display, failure.error));
    }

    for path in candidates.entries.into_iter().map(|entry| entry.path) {
        // The tree may change underneath us between listing and reading.
        if !fs.is_file(&path) {
            sink.warn(&format!("File not found: {}", path.display()));
            continue;
        }
        if let Some(action) = rewrite_file(fs, &path, table, rules, dry_run, sink) {
            report.file(action);
        }
    }

    report
}

/// Files the rewriter would touch, in walk order, plus the directories
/// that could not be searched.
pub fn collect_candidates(fs: &dyn FileSystem, root: &Path, rules: &RewriteRules) -> Walk {
    let keep = |entry: &FsEntry| !(entry.is_dir() && is_skip_dir(&entry.name(), rules));
    let mut walk = fs.walk_with(root, &keep);
    walk.entries
        .retain(|entry| entry.is_file() && is_candidate(root, &entry.path, rules));
    walk
}

fn is_skip_dir(name: &str, rules: &RewriteRules) -> bool {
    rules.skip_dirs.iter().any(|skip| skip == name)
}

/// Candidate test on a path below `root`.
pub fn is_candidate(root: &Path, path: &Path, rules: &RewriteRules) -> bool {
    let Ok(relative) = path.strip_prefix(root) else {
        return false;
    };
    let inside_skip_dir = relative
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .any(|component| is_skip_dir(&component.as_os_str().to_string_lossy(), rules));
    if inside_skip_dir || is_self_file(relative, rules) {
        return false;
    }

    let name = relative
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let has_source_extension = relative
        .extension()
        .is_some_and(|ext| rules.extensions.iter().any(|wanted| ext == wanted.as_str()));

    has_source_extension
        || rules.allow_list.iter().any(|allowed| *allowed == name)
        || (!rules.build_script.as_os_str().is_empty() && relative.ends_with(&rules.build_script))
}

/// The tool's own sources under the tooling root are never rewritten.
fn is_self_file(relative: &Path, rules: &RewriteRules) -> bool {
    relative.starts_with(&rules.tooling_root)
        && relative
            .file_name()
            .is_some_and(|name| rules.self_files.iter().any(|own| name == own.as_str()))
}

fn rewrite_file(
    fs: &dyn FileSystem,
    path: &Path,
    table: &SubstitutionTable,
    rules: &RewriteRules,
    dry_run: bool,
    sink: &mut dyn EventSink,
) -> Option<Action> {
    let display = path.display().to_string();

    let bytes = match fs.read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            sink.error(&format!("Error updating file: {display}. Reason: {e}"));
            return Some(Action::failed(display, e));
        },
    };

    if rules.detect_binary && matches!(content_inspector::inspect(&bytes), ContentType::BINARY) {
        sink.warn(&format!("Skipping binary file: {display}"));
        return None;
    }

    let original = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            sink.error(&format!("Error updating file: {display}. Reason: {e}"));
            return Some(Action::failed(display, e));
        },
    };

    let substituted = table.apply(&original);
    if substituted.text == original {
        return None;
    }

    if dry_run {
        sink.info(&format!("Dry run: File changes for {display}:"));
        sink.preview(&render_diff(&display, &original, &substituted.text));
        return Some(Action::simulated(display));
    }

    match fs.write(path, substituted.text.as_bytes()) {
        Ok(()) => {
            sink.info(&format!(
                "Updated file: {display} ({} replacements)",
                substituted.replacements
            ));
            Some(Action::executed(display))
        },
        Err(e) => {
            sink.error(&format!("Error updating file: {display}. Reason: {e}"));
            Some(Action::failed(display, e))
        },
    }
}

/// Unified diff of the would-be change.
pub fn render_diff(name: &str, before: &str, after: &str) -> String {
    let diff = TextDiff::from_lines(before, after);
    diff.unified_diff()
        .context_radius(1)
        .header(name, name)
        .to_string()
}
