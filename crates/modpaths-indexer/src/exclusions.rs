//! Directory base names skipped during a walk.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::io::Read;

/// Version-control metadata directories skipped when no exclusions file is given.
const DEFAULT_EXCLUSIONS: &str = ".git .hg";

/// A set of plain directory base names.
///
/// Names carry no path semantics and no wildcards: `vendor` excludes every
/// directory called `vendor`, wherever it sits under a root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSet {
    names: BTreeSet<String>,
}

impl ExclusionSet {
    /// An exclusion set that skips nothing.
    pub fn empty() -> Self {
        Self {
            names: BTreeSet::new(),
        }
    }

    /// Parse whitespace-separated names from a reader.
    pub fn load<R: Read>(mut reader: R) -> std::io::Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Ok(Self::parse(&content))
    }

    /// Parse whitespace-separated names from a string.
    pub fn parse(content: &str) -> Self {
        Self {
            names: content.split_whitespace().map(str::to_string).collect(),
        }
    }

    /// Whether a directory base name is excluded.
    pub fn contains(&self, name: &OsStr) -> bool {
        name.to_str().is_some_and(|name| self.names.contains(name))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::parse(DEFAULT_EXCLUSIONS)
    }
}
