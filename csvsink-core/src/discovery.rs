//! File discovery under a data directory.
//!
//! The directory is validated eagerly, before any connection work, so a
//! misconfigured path is reported without side effects. Discovery itself walks
//! the whole tree and matches file names against a `*`-wildcard pattern at
//! every level. Traversal order is whatever the filesystem yields; callers
//! must not rely on it.

use std::path::{Path, PathBuf};

use crate::error::{Result, SinkError};

/// Default pattern: any file whose name contains the `.csv` extension,
/// including compressed variants such as `data.csv.gz`.
pub const DEFAULT_PATTERN: &str = "*.csv*";

/// A file-name pattern with `*` wildcards, e.g. `*.csv*` or `report-*.csv`.
///
/// Only file names are matched, never directory components. Matching is the
/// usual glob subset: literal runs must appear in order, anchored at both
/// ends unless the pattern starts/ends with `*`.
#[derive(Debug, Clone)]
pub struct FilePattern {
    literals: Vec<String>,
    anchored_start: bool,
    anchored_end: bool,
}

impl FilePattern {
    /// Parses a wildcard pattern.
    ///
    /// # Errors
    /// Returns a configuration error for an empty pattern.
    pub fn new(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(SinkError::configuration("file pattern must not be empty"));
        }
        Ok(Self {
            literals: pattern
                .split('*')
                .filter(|part| !part.is_empty())
                .map(ToOwned::to_owned)
                .collect(),
            anchored_start: !pattern.starts_with('*'),
            anchored_end: !pattern.ends_with('*'),
        })
    }

    /// Tests a bare file name against the pattern.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        let mut rest = name;
        let count = self.literals.len();
        for (i, literal) in self.literals.iter().enumerate() {
            let is_last = i + 1 == count;
            if i == 0 && self.anchored_start {
                if !rest.starts_with(literal.as_str()) {
                    return false;
                }
                rest = &rest[literal.len()..];
                if is_last && self.anchored_end {
                    return rest.is_empty();
                }
                continue;
            }
            if is_last && self.anchored_end {
                // The final literal must sit at the very end of the name.
                return rest.ends_with(literal.as_str());
            }
            match rest.find(literal.as_str()) {
                Some(at) => rest = &rest[at + literal.len()..],
                None => return false,
            }
        }
        true
    }
}

impl Default for FilePattern {
    fn default() -> Self {
        Self {
            literals: vec![".csv".to_string()],
            anchored_start: false,
            anchored_end: false,
        }
    }
}

/// A validated data directory to discover CSV files under.
#[derive(Debug, Clone)]
pub struct CsvTree {
    root: PathBuf,
}

impl CsvTree {
    /// Validates `root` and wraps it for discovery.
    ///
    /// # Errors
    /// Returns a configuration error if `root` does not exist or is not a
    /// directory. This check runs here, at construction, so the failure
    /// surfaces before any database connection is attempted.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(SinkError::configuration(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    /// The validated root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Recursively collects all files under the root matching `pattern`.
    ///
    /// # Errors
    /// Returns an I/O error if any directory in the tree cannot be read.
    pub fn discover(&self, pattern: &FilePattern) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        walk(&self.root, pattern, &mut files)?;
        tracing::debug!(
            "Discovered {} data files under {}",
            files.len(),
            self.root.display()
        );
        Ok(files)
    }
}

fn walk(dir: &Path, pattern: &FilePattern, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| SinkError::io(format!("failed to read directory {}", dir.display()), e))?;

    for entry in entries {
        let entry = entry
            .map_err(|e| SinkError::io(format!("failed to read directory {}", dir.display()), e))?;
        let path = entry.path();
        if path.is_dir() {
            walk(&path, pattern, files)?;
        } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if pattern.matches(name) {
                files.push(path);
            }
        }
    }
    Ok(())
}
