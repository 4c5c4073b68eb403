//! Filesystem port used by every engine step.
//!
//! The engine never calls `std::fs` directly. [`LocalFs`] talks to the real
//! disk, [`MemoryFs`] keeps a tree in memory so the steps can be exercised
//! against fixtures, including injected write and delete failures.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// A path together with what it pointed at when it was listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl FsEntry {
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Final path component, lossily converted.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// A directory a walk could not list.
#[derive(Debug)]
pub struct WalkError {
    pub path: PathBuf,
    pub error: io::Error,
}

/// Everything a walk reached, in pre-order, plus the directories it could
/// not descend into.
#[derive(Debug, Default)]
pub struct Walk {
    pub entries: Vec<FsEntry>,
    pub errors: Vec<WalkError>,
}

impl Walk {
    /// Paths of the directories reached, in walk order.
    pub fn dirs(&self) -> Vec<PathBuf> {
        self.entries
            .iter()
            .filter(|entry| entry.is_dir())
            .map(|entry| entry.path.clone())
            .collect()
    }
}

pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    /// Immediate children of a directory, sorted by name.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<FsEntry>>;

    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    fn write(&self, path: &Path, content: &[u8]) -> io::Result<()>;

    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Move a file or directory. An existing file target is overwritten.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Remove an empty directory.
    fn remove_dir(&self, path: &Path) -> io::Result<()>;

    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Pre-order walk starting with `root` itself.
    ///
    /// Entries rejected by `keep` are skipped together with everything below
    /// them. A directory that cannot be listed is still reported as an entry,
    /// and its listing failure lands in [`Walk::errors`].
    fn walk_with(&self, root: &Path, keep: &dyn Fn(&FsEntry) -> bool) -> Walk {
        let mut walk = Walk::default();
        if !self.is_dir(root) {
            return walk;
        }
        let mut stack = vec![FsEntry::new(root, EntryKind::Dir)];
        while let Some(entry) = stack.pop() {
            if entry.is_dir() {
                match self.read_dir(&entry.path) {
                    // Reverse so the smallest name is popped first.
                    Ok(children) => {
                        stack.extend(children.into_iter().rev().filter(|child| keep(child)));
                    },
                    Err(error) => walk.errors.push(WalkError {
                        path: entry.path.clone(),
                        error,
                    }),
                }
            }
            walk.entries.push(entry);
        }
        walk
    }

    fn walk(&self, root: &Path) -> Walk {
        self.walk_with(root, &|_| true)
    }
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    fn kind_of(file_type: fs::FileType) -> EntryKind {
        if file_type.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::File
        }
    }
}

impl FileSystem for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<FsEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            entries.push(FsEntry::new(entry.path(), Self::kind_of(entry.file_type()?)));
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
        fs::write(path, content)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }

    fn walk_with(&self, root: &Path, keep: &dyn Fn(&FsEntry) -> bool) -> Walk {
        let mut walk = Walk::default();
        if !root.is_dir() {
            return walk;
        }
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || keep(&FsEntry::new(
                        entry.path(),
                        Self::kind_of(entry.file_type()),
                    ))
            });
        for entry in walker {
            match entry {
                Ok(entry) => {
                    let kind = Self::kind_of(entry.file_type());
                    walk.entries.push(FsEntry::new(entry.into_path(), kind));
                },
                Err(err) => {
                    let path = err.path().unwrap_or(root).to_path_buf();
                    walk.errors.push(WalkError {
                        path,
                        error: io::Error::from(err),
                    });
                },
            }
        }
        walk
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Dir,
    File(Vec<u8>),
}

#[derive(Debug, Default)]
struct MemoryTree {
    nodes: BTreeMap<PathBuf, Node>,
    read_only: BTreeSet<PathBuf>,
    locked: BTreeSet<PathBuf>,
    unlistable: BTreeSet<PathBuf>,
}

impl MemoryTree {
    fn children(&self, path: &Path) -> Vec<FsEntry> {
        self.nodes
            .iter()
            .filter(|(candidate, _)| candidate.parent() == Some(path))
            .map(|(candidate, node)| {
                let kind = match node {
                    Node::Dir => EntryKind::Dir,
                    Node::File(_) => EntryKind::File,
                };
                FsEntry::new(candidate.clone(), kind)
            })
            .collect()
    }

    fn subtree(&self, path: &Path) -> Vec<PathBuf> {
        self.nodes
            .keys()
            .filter(|candidate| candidate.starts_with(path))
            .cloned()
            .collect()
    }

    fn insert_dirs(&mut self, path: &Path) -> io::Result<()> {
        for ancestor in path.ancestors().collect::<Vec<_>>().into_iter().rev() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            match self.nodes.get(ancestor) {
                Some(Node::File(_)) => {
                    return Err(io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        format!("{} exists and is not a directory", ancestor.display()),
                    ))
                },
                Some(Node::Dir) => {},
                None => {
                    self.nodes.insert(ancestor.to_path_buf(), Node::Dir);
                },
            }
        }
        Ok(())
    }

    fn require_parent_dir(&self, path: &Path) -> io::Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                if self.nodes.get(parent) == Some(&Node::Dir) {
                    Ok(())
                } else {
                    Err(not_found(parent))
                }
            },
            _ => Ok(()),
        }
    }

    fn check_not_locked(&self, path: &Path) -> io::Result<()> {
        if self.locked.iter().any(|locked| locked.starts_with(path) || path.starts_with(locked)) {
            Err(permission_denied(path))
        } else {
            Ok(())
        }
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("No such file or directory: {}", path.display()),
    )
}

fn permission_denied(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::PermissionDenied,
        format!("Permission denied: {}", path.display()),
    )
}

/// In-memory tree for fixtures.
///
/// Paths are stored as given; tests conventionally root everything under a
/// fake absolute directory such as `/project`.
#[derive(Debug, Default)]
pub struct MemoryFs {
    tree: Mutex<MemoryTree>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    fn tree(&self) -> std::sync::MutexGuard<'_, MemoryTree> {
        self.tree.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a directory and all its ancestors.
    pub fn add_dir(&self, path: impl AsRef<Path>) -> &Self {
        // Fixture setup only fails when a file sits where a directory is
        // requested, which is a broken fixture.
        let _ = self.tree().insert_dirs(path.as_ref());
        self
    }

    /// Add a file, creating its parent directories.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl AsRef<[u8]>) -> &Self {
        let path = path.as_ref();
        let mut tree = self.tree();
        if let Some(parent) = path.parent() {
            let _ = tree.insert_dirs(parent);
        }
        tree.nodes
            .insert(path.to_path_buf(), Node::File(content.as_ref().to_vec()));
        drop(tree);
        self
    }

    /// Make writes to `path` fail with `PermissionDenied`.
    pub fn deny_write(&self, path: impl AsRef<Path>) -> &Self {
        self.tree().read_only.insert(path.as_ref().to_path_buf());
        self
    }

    /// Make listing the directory at `path` fail with `PermissionDenied`.
    pub fn deny_list(&self, path: impl AsRef<Path>) -> &Self {
        self.tree().unlistable.insert(path.as_ref().to_path_buf());
        self
    }

    /// Make moves and deletions touching `path` fail with `PermissionDenied`.
    pub fn lock(&self, path: impl AsRef<Path>) -> &Self {
        self.tree().locked.insert(path.as_ref().to_path_buf());
        self
    }

    pub fn read_to_string(&self, path: impl AsRef<Path>) -> Option<String> {
        match self.tree().nodes.get(path.as_ref()) {
            Some(Node::File(content)) => Some(String::from_utf8_lossy(content).into_owned()),
            _ => None,
        }
    }

    /// Every path with its file content (`None` for directories).
    pub fn snapshot(&self) -> BTreeMap<PathBuf, Option<Vec<u8>>> {
        self.tree()
            .nodes
            .iter()
            .map(|(path, node)| {
                let content = match node {
                    Node::Dir => None,
                    Node::File(content) => Some(content.clone()),
                };
                (path.clone(), content)
            })
            .collect()
    }

    /// All file paths, sorted.
    pub fn files(&self) -> Vec<PathBuf> {
        self.tree()
            .nodes
            .iter()
            .filter(|(_, node)| matches!(node, Node::File(_)))
            .map(|(path, _)| path.clone())
            .collect()
    }
}

impl FileSystem for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        self.tree().nodes.contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.tree().nodes.get(path) == Some(&Node::Dir)
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.tree().nodes.get(path), Some(Node::File(_)))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<FsEntry>> {
        let tree = self.tree();
        match tree.nodes.get(path) {
            Some(Node::Dir) if tree.unlistable.contains(path) => Err(permission_denied(path)),
            Some(Node::Dir) => Ok(tree.children(path)),
            Some(Node::File(_)) => Err(io::Error::new(
                io::ErrorKind::Other,
                format!("Not a directory: {}", path.display()),
            )),
            None => Err(not_found(path)),
        }
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        match self.tree().nodes.get(path) {
            Some(Node::File(content)) => Ok(content.clone()),
            Some(Node::Dir) => Err(io::Error::new(
                io::ErrorKind::Other,
                format!("Is a directory: {}", path.display()),
            )),
            None => Err(not_found(path)),
        }
    }

    fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
        let mut tree = self.tree();
        if tree.read_only.contains(path) {
            return Err(permission_denied(path));
        }
        if tree.nodes.get(path) == Some(&Node::Dir) {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("Is a directory: {}", path.display()),
            ));
        }
        tree.require_parent_dir(path)?;
        tree.nodes
            .insert(path.to_path_buf(), Node::File(content.to_vec()));
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.tree().insert_dirs(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut tree = self.tree();
        let source = tree.nodes.get(from).cloned().ok_or_else(|| not_found(from))?;
        tree.check_not_locked(from)?;
        tree.require_parent_dir(to)?;

        if source == Node::Dir && to.starts_with(from) && to != from {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "Cannot move {} into itself ({})",
                    from.display(),
                    to.display()
                ),
            ));
        }

        let target_is_dir = tree.nodes.get(to).map(|node| *node == Node::Dir);
        match (target_is_dir, source == Node::Dir) {
            (None, _) | (Some(false), false) => {},
            (Some(true), true) if tree.children(to).is_empty() => {
                tree.nodes.remove(to);
            },
            (Some(_), _) => {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("Target already exists: {}", to.display()),
                ))
            },
        }

        for old in tree.subtree(from) {
            if let Some(node) = tree.nodes.remove(&old) {
                let relative = old.strip_prefix(from).unwrap_or(Path::new(""));
                let new = if relative.as_os_str().is_empty() {
                    to.to_path_buf()
                } else {
                    to.join(relative)
                };
                tree.nodes.insert(new, node);
            }
        }
        Ok(())
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        let mut tree = self.tree();
        match tree.nodes.get(path) {
            Some(Node::Dir) => {},
            Some(Node::File(_)) => {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    format!("Not a directory: {}", path.display()),
                ))
            },
            None => return Err(not_found(path)),
        }
        tree.check_not_locked(path)?;
        if !tree.children(path).is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("Directory not empty: {}", path.display()),
            ));
        }
        tree.nodes.remove(path);
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut tree = self.tree();
        if tree.nodes.get(path) != Some(&Node::Dir) {
            return Err(not_found(path));
        }
        tree.check_not_locked(path)?;
        for doomed in tree.subtree(path) {
            tree.nodes.remove(&doomed);
        }
        Ok(())
    }
}
