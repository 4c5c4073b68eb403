//! Directory relocation.
//!
//! Two independent moves happen here: the top-level placeholder module
//! directory is renamed to the derived module name, and every package
//! directory whose path spells the placeholder namespace is moved to the
//! path of the target namespace. Contents are moved entry by entry, then a
//! bottom-up sweep removes the directories the moves left empty. Neither
//! phase is atomic; a partially migrated tree can be fed to a second run.

use crate::events::EventSink;
use crate::fs::{FileSystem, FsEntry, Walk};
use crate::journal::{Action, StepReport};
use crate::namespace::PathSegmentPattern;
use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

/// Inputs of one remap pass.
#[derive(Debug, Clone)]
pub struct RemapOptions<'a> {
    /// Name of the top-level placeholder module directory
    pub placeholder_module: &'a str,
    /// Derived module name the placeholder directory is renamed to
    pub module_name: &'a str,
    /// Placeholder namespace path -> target namespace path
    pub pattern: PathSegmentPattern,
    /// Root-level sub-trees to scan besides the module directory
    pub roots: &'a [String],
    pub dry_run: bool,
}

pub fn remap_hierarchy(
    fs: &dyn FileSystem,
    root: &Path,
    options: &RemapOptions<'_>,
    sink: &mut dyn EventSink,
) -> StepReport {
    sink.section("Renaming directories");

    let mut remapper = Remapper::new(fs, root, options);
    let module_dir = remapper.rename_module_dir(sink);
    let bases = remapper.bases(&module_dir);

    for base in &bases {
        remapper.relocate_packages(base, sink);
    }
    for base in &bases {
        remapper.prune_empty_dirs(base, sink);
    }

    remapper.report
}

struct Remapper<'a> {
    fs: &'a dyn FileSystem,
    root: &'a Path,
    options: &'a RemapOptions<'a>,
    report: StepReport,
    /// Dry run: paths a real run would have moved away or deleted.
    gone: BTreeSet<PathBuf>,
    /// Dry run: directories a real run would have created.
    created: BTreeSet<PathBuf>,
    /// Dry run: move targets a real run would have filled.
    filled: BTreeSet<PathBuf>,
    /// Directories the sweep already failed to delete.
    undeletable: BTreeSet<PathBuf>,
    /// Directories whose listing failure is already journaled.
    unlisted: BTreeSet<PathBuf>,
}

impl<'a> Remapper<'a> {
    fn new(fs: &'a dyn FileSystem, root: &'a Path, options: &'a RemapOptions<'a>) -> Self {
        Self {
            fs,
            root,
            options,
            report: StepReport::new(),
            gone: BTreeSet::new(),
            created: BTreeSet::new(),
            filled: BTreeSet::new(),
            undeletable: BTreeSet::new(),
            unlisted: BTreeSet::new(),
        }
    }

    fn dry_run(&self) -> bool {
        self.options.dry_run
    }

    /// Existence as a real run would see it at this point.
    fn exists(&self, path: &Path) -> bool {
        if self.created.contains(path) {
            return true;
        }
        !self.gone.iter().any(|gone| path.starts_with(gone)) && self.fs.exists(path)
    }

    fn children(&self, dir: &Path) -> io::Result<Vec<FsEntry>> {
        Ok(self
            .fs
            .read_dir(dir)?
            .into_iter()
            .filter(|entry| !self.gone.contains(&entry.path))
            .collect())
    }

    /// Walk `base`, journaling each directory that cannot be listed once.
    fn walk(&mut self, base: &Path, sink: &mut dyn EventSink) -> Walk {
        let mut walk = self.fs.walk(base);
        for failure in std::mem::take(&mut walk.errors) {
            if !self.unlisted.insert(failure.path.clone()) {
                continue;
            }
            sink.error(&format!(
                "Failed to list directory: {}. Reason: {}",
                failure.path.display(),
                failure.error
            ));
            self.report.directory(Action::failed(
                format!("Listed directory: {}", failure.path.display()),
                failure.error,
            ));
        }
        walk
    }

    /// Rename `root/<placeholder>` to `root/<module_name>`.
    ///
    /// Returns the directory that holds the module tree afterwards. In a dry
    /// run that is still the placeholder directory, so the later phases
    /// preview the module tree as well.
    fn rename_module_dir(&mut self, sink: &mut dyn EventSink) -> PathBuf {
        let placeholder_dir = self.root.join(self.options.placeholder_module);
        let module_dir = self.root.join(self.options.module_name);

        if self.options.placeholder_module == self.options.module_name
            || !self.fs.is_dir(&placeholder_dir)
        {
            sink.info(&format!(
                "No module directory to rename: {}",
                placeholder_dir.display()
            ));
            return module_dir;
        }

        let description = format!("{} -> {}", placeholder_dir.display(), module_dir.display());

        if self.dry_run() {
            sink.info(&format!("Dry run: Root directory renamed: {description}"));
            self.report.directory(Action::simulated(description));
            return placeholder_dir;
        }

        if self.fs.exists(&module_dir) {
            sink.error(&format!(
                "Failed to rename root directory: {}. Target already exists.",
                placeholder_dir.display()
            ));
            self.report
                .directory(Action::failed(description, "target already exists"));
            return module_dir;
        }

        match self.fs.rename(&placeholder_dir, &module_dir) {
            Ok(()) => {
                sink.info(&format!("Renamed root directory: {description}"));
                self.report.directory(Action::executed(description));
            },
            Err(e) => {
                sink.error(&format!(
                    "Failed to rename root directory: {}. Reason: {e}",
                    placeholder_dir.display()
                ));
                self.report.directory(Action::failed(description, e));
            },
        }
        module_dir
    }

    /// Configured sub-trees plus the module tree, existing ones only.
    fn bases(&self, module_dir: &Path) -> Vec<PathBuf> {
        let mut bases: Vec<PathBuf> = Vec::new();
        let candidates = self
            .options
            .roots
            .iter()
            .map(|name| self.root.join(name))
            .chain(std::iter::once(module_dir.to_path_buf()));
        for candidate in candidates {
            if self.fs.is_dir(&candidate) && !bases.contains(&candidate) {
                bases.push(candidate);
            }
        }
        bases
    }

    fn relocate_packages(&mut self, base: &Path, sink: &mut dyn EventSink) {
        sink.info(&format!(
            "Processing subdirectories in '{}': {}",
            display_name(base),
            base.display()
        ));

        let options = self.options;
        let pattern = &options.pattern;
        if pattern.is_identity() || pattern.source().is_empty() {
            return;
        }

        let dirs = self.walk(base, sink).dirs();

        let mut relocated: Vec<PathBuf> = Vec::new();
        for old_dir in dirs {
            // Everything below a relocated directory travelled with it.
            if relocated.iter().any(|done| old_dir.starts_with(done)) {
                continue;
            }
            if !self.exists(&old_dir) {
                continue;
            }
            let Ok(relative) = old_dir.strip_prefix(self.root) else {
                continue;
            };
            let Some(new_relative) = pattern.splice(relative) else {
                continue;
            };
            let new_dir = self.root.join(new_relative);
            relocated.push(old_dir.clone());
            self.relocate(&old_dir, &new_dir, sink);
        }
    }

    fn relocate(&mut self, old_dir: &Path, new_dir: &Path, sink: &mut dyn EventSink) {
        let description = format!("{} -> {}", old_dir.display(), new_dir.display());

        if new_dir.starts_with(old_dir) {
            sink.error(&format!(
                "Cannot move contents of {} into its own subdirectory {}",
                old_dir.display(),
                new_dir.display()
            ));
            self.report
                .directory(Action::failed(description, "target is inside source"));
            return;
        }

        let entries = match self.children(old_dir) {
            Ok(entries) => entries,
            Err(e) => {
                sink.error(&format!(
                    "Failed to list directory: {}. Reason: {e}",
                    old_dir.display()
                ));
                self.unlisted.insert(old_dir.to_path_buf());
                self.report.directory(Action::failed(description, e));
                return;
            },
        };

        if !self.ensure_dir(new_dir, sink) {
            return;
        }

        if self.dry_run() {
            sink.info(&format!("Dry run: Would move contents of: {description}"));
            if !entries.is_empty() {
                self.filled.insert(new_dir.to_path_buf());
            }
            for entry in entries {
                self.gone.insert(entry.path);
            }
            self.report.directory(Action::simulated(description));
        } else {
            sink.info(&format!("Moving contents of: {description}"));
            let mut failures = 0;
            for entry in entries {
                let target = new_dir.join(entry.name());
                let moved = format!("{} -> {}", entry.path.display(), target.display());
                match self.fs.rename(&entry.path, &target) {
                    Ok(()) => sink.info(&format!("Moved: {moved}")),
                    Err(e) => {
                        sink.error(&format!(
                            "Failed to move: {}. Reason: {e}",
                            entry.path.display()
                        ));
                        self.report
                            .directory(Action::failed(format!("Moved {moved}"), e));
                        failures += 1;
                    },
                }
            }
            if failures == 0 {
                self.report.directory(Action::executed(description));
            } else {
                self.report.directory(Action::failed(
                    description,
                    format!("{failures} entries could not be moved"),
                ));
            }
        }

        self.delete_old_dir(old_dir, sink);
    }

    /// Create `dir` and its parents unless they already exist.
    fn ensure_dir(&mut self, dir: &Path, sink: &mut dyn EventSink) -> bool {
        if self.exists(dir) {
            return true;
        }
        let description = format!("Created directory: {}", dir.display());

        if self.dry_run() {
            sink.info(&format!("Dry run: Would create directory: {}", dir.display()));
            for ancestor in dir.ancestors() {
                if ancestor == self.root || self.exists(ancestor) {
                    break;
                }
                self.created.insert(ancestor.to_path_buf());
            }
            self.report.directory(Action::simulated(description));
            return true;
        }

        match self.fs.create_dir_all(dir) {
            Ok(()) => {
                sink.info(&format!("Creating directory: {}", dir.display()));
                self.report.directory(Action::executed(description));
                true
            },
            Err(e) => {
                sink.error(&format!(
                    "Failed to create directory: {}. Reason: {e}",
                    dir.display()
                ));
                self.report.directory(Action::failed(description, e));
                false
            },
        }
    }

    fn delete_old_dir(&mut self, old_dir: &Path, sink: &mut dyn EventSink) {
        let description = format!("Deleted directory: {}", old_dir.display());

        if self.dry_run() {
            sink.info(&format!(
                "Dry run: Would delete old directory: {}",
                old_dir.display()
            ));
            self.gone.insert(old_dir.to_path_buf());
            self.report.directory(Action::simulated(description));
            return;
        }

        // Leftovers that failed to move keep the directory alive.
        match self.fs.remove_dir(old_dir) {
            Ok(()) => {
                sink.info(&format!("Deleted old directory: {}", old_dir.display()));
                self.report.directory(Action::executed(description));
            },
            Err(e) => {
                sink.warn(&format!(
                    "Failed to delete old directory: {}. Reason: {e}",
                    old_dir.display()
                ));
                self.report.directory(Action::failed(description, e));
            },
        }
    }

    fn is_empty_dir(&self, dir: &Path) -> bool {
        // Unlistable directories were journaled by the walk.
        if !self.children(dir).is_ok_and(|children| children.is_empty()) {
            return false;
        }
        // Dry run: a directory that would receive moved content is not empty.
        !self
            .created
            .iter()
            .chain(&self.filled)
            .any(|target| target.starts_with(dir))
    }

    /// Repeated bottom-up passes until nothing else can be removed.
    fn prune_empty_dirs(&mut self, base: &Path, sink: &mut dyn EventSink) {
        sink.info(&format!(
            "Deleting empty directories inside '{}'",
            display_name(base)
        ));

        loop {
            let mut removed = 0;
            let dirs = self.walk(base, sink).dirs();

            for dir in dirs.into_iter().rev() {
                if !self.exists(&dir) || self.undeletable.contains(&dir) || !self.is_empty_dir(&dir)
                {
                    continue;
                }
                let description = format!("Deleted empty directory: {}", dir.display());

                if self.dry_run() {
                    sink.info(&format!(
                        "Dry run: Would delete empty directory: {}",
                        dir.display()
                    ));
                    self.gone.insert(dir);
                    self.report.directory(Action::simulated(description));
                    removed += 1;
                    continue;
                }

                match self.fs.remove_dir(&dir) {
                    Ok(()) => {
                        sink.info(&format!("Deleting empty directory: {}", dir.display()));
                        self.report.directory(Action::executed(description));
                        removed += 1;
                    },
                    Err(e) => {
                        sink.warn(&format!(
                            "Failed to delete directory: {}. Reason: {e}",
                            dir.display()
                        ));
                        self.report.directory(Action::failed(description, e));
                        self.undeletable.insert(dir);
                    },
                }
            }

            if removed == 0 {
                break;
            }
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
