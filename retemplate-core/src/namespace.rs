use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A dotted namespace viewed as a sequence of directory segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespacePath {
    segments: Vec<String>,
}

impl NamespacePath {
    /// Split on `.`, dropping empty segments (`org..example.` has two).
    pub fn parse(dotted: &str) -> Self {
        Self {
            segments: dotted
                .split('.')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// `org.example.mylib` -> `org/example/mylib` using the platform separator.
    pub fn to_path(&self) -> PathBuf {
        self.segments.iter().collect()
    }

    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }

    /// Index of the first component at which the whole namespace appears as a
    /// contiguous run of path components.
    pub fn find_in(&self, path: &Path) -> Option<usize> {
        if self.segments.is_empty() {
            return None;
        }
        let components: Vec<Component<'_>> = path.components().collect();
        if components.len() < self.segments.len() {
            return None;
        }
        (0..=components.len() - self.segments.len()).find(|&start| {
            self.segments
                .iter()
                .zip(&components[start..])
                .all(|(segment, component)| match component {
                    Component::Normal(name) => name.to_str() == Some(segment.as_str()),
                    _ => false,
                })
        })
    }
}

impl fmt::Display for NamespacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_path().display())
    }
}

/// Old namespace fragment and its replacement, matched on whole path segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegmentPattern {
    from: NamespacePath,
    to: NamespacePath,
}

impl PathSegmentPattern {
    pub fn new(from: NamespacePath, to: NamespacePath) -> Self {
        Self { from, to }
    }

    pub fn from_dotted(from: &str, to: &str) -> Self {
        Self::new(NamespacePath::parse(from), NamespacePath::parse(to))
    }

    pub fn source(&self) -> &NamespacePath {
        &self.from
    }

    /// True when replacing would not change any path.
    pub fn is_identity(&self) -> bool {
        self.from == self.to
    }

    /// Replace the first occurrence of the old fragment with the new one.
    ///
    /// `com/tweener/changehere/sample` with `com.tweener.changehere` ->
    /// `org.example.mylib` becomes `org/example/mylib/sample`, while a
    /// segment such as `changehere_extra` is never touched.
    pub fn splice(&self, path: &Path) -> Option<PathBuf> {
        let start = self.from.find_in(path)?;
        let end = start + self.from.segments.len();

        let mut spliced = PathBuf::new();
        for (index, component) in path.components().enumerate() {
            if index == start {
                for segment in &self.to.segments {
                    spliced.push(segment);
                }
            }
            if index < start || index >= end {
                spliced.push(component.as_os_str());
            }
        }
        Some(spliced)
    }
}
