//! Whole-segment suffix queries over a snapshot.

use crate::Snapshot;
use std::path::{MAIN_SEPARATOR, MAIN_SEPARATOR_STR};

/// What a query string is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// Match module identifiers (`/`-separated import paths)
    Import,
    /// Match absolute directory paths
    Path,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::Import => "imports",
            QueryKind::Path => "dirs",
        }
    }

    /// The separator-prefixed suffix an entry must end with.
    fn suffix(&self, partial: &str) -> String {
        match self {
            QueryKind::Import => format!("/{partial}"),
            QueryKind::Path => {
                if MAIN_SEPARATOR == '/' {
                    format!("{MAIN_SEPARATOR}{partial}")
                } else {
                    format!("{MAIN_SEPARATOR}{}", partial.replace('/', MAIN_SEPARATOR_STR))
                }
            }
        }
    }
}

impl Snapshot {
    /// Entries whose subject ends with `partial` on a segment boundary.
    ///
    /// A query for `os` matches `.../os` but not `.../paxos`. Directories
    /// that are modules win: directories that are not are returned only
    /// when no module matched. The two groups are never mixed.
    pub fn query(&self, partial: &str, kind: QueryKind) -> Vec<String> {
        let suffix = kind.suffix(partial);

        let mut valid = Vec::new();
        let mut invalid = Vec::new();

        for entry in self.entries() {
            let matched = match kind {
                // "/" + id ends with "/" + partial
                QueryKind::Import => (entry.module_id.ends_with(&suffix)
                    || entry.module_id == partial)
                    .then(|| entry.module_id.clone()),
                QueryKind::Path => {
                    let path = entry.full_path.to_string_lossy();
                    path.ends_with(&suffix).then(|| path.into_owned())
                }
            };

            let Some(matched) = matched.filter(|m| !m.is_empty()) else {
                continue;
            };

            if entry.valid {
                valid.push(matched);
            } else {
                invalid.push(matched);
            }
        }

        if valid.is_empty() {
            invalid
        } else {
            valid
        }
    }
}
