use crate::journal::{Action, ActionJournal};
use std::fmt::Write;
use std::path::PathBuf;

/// Result of a rename operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOutcome {
    pub project_name: String,
    pub module_name: String,
    pub package_name: String,
    pub dry_run: bool,
    pub journal: ActionJournal,
}

impl RenameOutcome {
    pub fn error_count(&self) -> usize {
        self.journal.error_count()
    }
}

/// Result of a check operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub project_name: String,
    pub module_name: String,
    pub package_name: String,
    pub package_path: PathBuf,
}

/// Result of a version command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionResult {
    pub name: String,
    pub version: String,
}

/// Human-readable rendering of an operation result
pub trait OutputFormatter {
    fn format_summary(&self) -> String;
}

fn write_actions(output: &mut String, actions: &[Action]) {
    if actions.is_empty() {
        writeln!(output, "None").unwrap();
        return;
    }
    for action in actions {
        if action.is_error() {
            writeln!(output, "Error: {action}").unwrap();
        } else {
            writeln!(output, "{action}").unwrap();
        }
    }
}

impl OutputFormatter for RenameOutcome {
    fn format_summary(&self) -> String {
        let mut output = String::new();

        let mode = if self.dry_run { "Dry Run" } else { "Actual Run" };
        writeln!(output, "--- Summary ({mode}) ---").unwrap();

        writeln!(output, "Renamed directories:").unwrap();
        write_actions(&mut output, &self.journal.directory_actions);

        writeln!(output).unwrap();
        writeln!(output, "Updated files:").unwrap();
        write_actions(&mut output, &self.journal.file_actions);

        writeln!(output, "----------------").unwrap();
        if self.dry_run {
            writeln!(output, "Dry run completed successfully!").unwrap();
        } else {
            writeln!(output, "Task completed successfully!").unwrap();
        }

        output
    }
}

impl OutputFormatter for CheckResult {
    fn format_summary(&self) -> String {
        let mut output = String::new();
        writeln!(output, "Project name: {}", self.project_name).unwrap();
        writeln!(output, "Module name: {}", self.module_name).unwrap();
        writeln!(output, "Package name: {}", self.package_name).unwrap();
        writeln!(output, "Package path: {}", self.package_path.display()).unwrap();
        output
    }
}

impl OutputFormatter for VersionResult {
    fn format_summary(&self) -> String {
        format!("{} {}", self.name, self.version)
    }
}
