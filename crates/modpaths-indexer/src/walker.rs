//! Directory walker that prunes excluded sub-trees.

use crate::store::{normalize_path, IndexEntry};
use crate::{ExclusionSet, IndexerError, ModuleResolver};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Walks one root and produces an index entry for every directory under it.
pub struct Walker {
    root: PathBuf,
    exclusions: Arc<ExclusionSet>,
    resolver: Arc<dyn ModuleResolver>,
}

impl Walker {
    /// Create a new walker for the given root directory.
    pub fn new(
        root: &Path,
        exclusions: Arc<ExclusionSet>,
        resolver: Arc<dyn ModuleResolver>,
    ) -> Self {
        Self {
            root: normalize_path(root),
            exclusions,
            resolver,
        }
    }

    /// Walk the directory tree depth-first, siblings in file-name order.
    ///
    /// Only a root that cannot be read is an error; unreadable entries below
    /// it are skipped.
    pub fn walk(&self) -> Result<Vec<IndexEntry>, IndexerError> {
        let root = &self.root;

        let metadata = std::fs::metadata(root).map_err(|source| IndexerError::RootUnreadable {
            path: root.clone(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(IndexerError::NotADirectory(root.clone()));
        }
        std::fs::read_dir(root).map_err(|source| IndexerError::RootUnreadable {
            path: root.clone(),
            source,
        })?;

        // The walk never filters its own root, so check it here.
        if root
            .file_name()
            .is_some_and(|name| self.exclusions.contains(name))
        {
            debug!(root = ?root, "Root is excluded");
            return Ok(Vec::new());
        }

        let exclusions = self.exclusions.clone();
        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                !(is_dir && exclusions.contains(entry.file_name()))
            })
            .build();

        let mut entries = Vec::new();
        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(error = %e, "Walk error");
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                continue;
            }

            let resolution = self.resolver.resolve(entry.path());
            entries.push(IndexEntry {
                full_path: entry.path().to_path_buf(),
                module_id: resolution.module_id,
                valid: resolution.valid,
            });
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Resolution;
    use std::fs::{self, File};
    use tempfile::tempdir;

    fn name_resolver() -> Arc<dyn ModuleResolver> {
        Arc::new(|dir: &Path| {
            let name = dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if name.starts_with("pkg") {
                Resolution::module(name)
            } else {
                Resolution::not_module(name)
            }
        })
    }

    fn walk(root: &Path, exclusions: ExclusionSet) -> Vec<IndexEntry> {
        Walker::new(root, Arc::new(exclusions), name_resolver())
            .walk()
            .unwrap()
    }

    fn relative_paths(root: &Path, entries: &[IndexEntry]) -> Vec<String> {
        entries
            .iter()
            .map(|e| {
                e.full_path
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    }

    #[test]
    fn test_walker_empty_directory() {
        let temp_dir = tempdir().unwrap();
        let entries = walk(temp_dir.path(), ExclusionSet::empty());

        // Just the root itself
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].full_path, normalize_path(temp_dir.path()));
        assert!(entries[0].full_path.is_absolute());
    }

    #[test]
    fn test_walker_ignores_files() {
        let temp_dir = tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("pkga")).unwrap();
        File::create(temp_dir.path().join("file.txt")).unwrap();
        File::create(temp_dir.path().join("pkga/file.go")).unwrap();

        let entries = walk(temp_dir.path(), ExclusionSet::empty());
        assert_eq!(relative_paths(temp_dir.path(), &entries), vec!["", "pkga"]);
    }

    #[test]
    fn test_walker_prunes_excluded_subtree() {
        let temp_dir = tempdir().unwrap();
        fs::create_dir_all(temp_dir.path().join("a/.git/objects/pkgx")).unwrap();
        fs::create_dir_all(temp_dir.path().join("a/pkgb")).unwrap();
        fs::create_dir_all(temp_dir.path().join(".git/refs")).unwrap();

        let entries = walk(temp_dir.path(), ExclusionSet::default());
        let paths = relative_paths(temp_dir.path(), &entries);

        assert_eq!(paths, vec!["", "a", "a/pkgb"]);
        assert!(!paths.iter().any(|p| p.contains(".git")));
    }

    #[test]
    fn test_walker_only_excludes_directories() {
        let temp_dir = tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("pkga")).unwrap();
        // A file with an excluded name does not hide its siblings
        File::create(temp_dir.path().join("pkga/.git")).unwrap();
        fs::create_dir(temp_dir.path().join("pkga/pkgb")).unwrap();

        let entries = walk(temp_dir.path(), ExclusionSet::default());
        assert_eq!(
            relative_paths(temp_dir.path(), &entries),
            vec!["", "pkga", "pkga/pkgb"]
        );
    }

    #[test]
    fn test_walker_excluded_root_yields_nothing() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path().join("vendor");
        fs::create_dir_all(root.join("pkga")).unwrap();

        let entries = walk(&root, ExclusionSet::parse("vendor"));
        assert!(entries.is_empty());
    }

    #[test]
    fn test_walker_is_depth_first_and_sorted() {
        let temp_dir = tempdir().unwrap();
        for dir in ["c", "a/z", "a/b", "b"] {
            fs::create_dir_all(temp_dir.path().join(dir)).unwrap();
        }

        let entries = walk(temp_dir.path(), ExclusionSet::empty());
        assert_eq!(
            relative_paths(temp_dir.path(), &entries),
            vec!["", "a", "a/b", "a/z", "b", "c"]
        );
    }

    #[test]
    fn test_walker_records_resolution() {
        let temp_dir = tempdir().unwrap();
        fs::create_dir_all(temp_dir.path().join("lib/pkgnet")).unwrap();

        let entries = walk(temp_dir.path(), ExclusionSet::empty());
        let lib = &entries[1];
        let pkg = &entries[2];

        assert_eq!(lib.module_id, "lib");
        assert!(!lib.valid);
        assert_eq!(pkg.module_id, "pkgnet");
        assert!(pkg.valid);
    }

    #[test]
    fn test_walker_missing_root_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let walker = Walker::new(
            &temp_dir.path().join("missing"),
            Arc::new(ExclusionSet::empty()),
            name_resolver(),
        );

        let err = walker.walk().unwrap_err();
        assert!(matches!(err, IndexerError::RootUnreadable { .. }));
    }

    #[test]
    fn test_walker_file_root_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let file = temp_dir.path().join("file.txt");
        File::create(&file).unwrap();

        let walker = Walker::new(&file, Arc::new(ExclusionSet::empty()), name_resolver());
        assert!(matches!(
            walker.walk().unwrap_err(),
            IndexerError::NotADirectory(_)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_walker_does_not_follow_symlinks() {
        let temp_dir = tempdir().unwrap();
        let target = temp_dir.path().join("target");
        let root = temp_dir.path().join("root");
        fs::create_dir_all(target.join("pkgdeep")).unwrap();
        fs::create_dir_all(&root).unwrap();
        std::os::unix::fs::symlink(&target, root.join("link")).unwrap();

        let entries = walk(&root, ExclusionSet::empty());
        assert_eq!(relative_paths(&root, &entries), vec![""]);
    }
}
