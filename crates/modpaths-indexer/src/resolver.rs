//! Module resolution for indexed directories.
//!
//! The walker asks a [`ModuleResolver`] about every directory it visits.
//! [`GoResolver`] is the built-in implementation for Go source trees.

use crate::store::normalize_path;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Outcome of resolving one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Logical module identifier (may be empty)
    pub module_id: String,
    /// Whether the directory is itself a module
    pub valid: bool,
}

impl Resolution {
    /// The directory holds a recognizable module.
    pub fn module(module_id: impl Into<String>) -> Self {
        Self {
            module_id: module_id.into(),
            valid: true,
        }
    }

    /// The directory holds no recognizable module.
    ///
    /// `module_id` is whatever identifier the directory would have, so that
    /// import-style queries can still fall back to it.
    pub fn not_module(module_id: impl Into<String>) -> Self {
        Self {
            module_id: module_id.into(),
            valid: false,
        }
    }
}

/// Derives a module identifier from a directory.
pub trait ModuleResolver: Send + Sync {
    /// Resolve an absolute directory path.
    fn resolve(&self, dir: &Path) -> Resolution;
}

impl<F> ModuleResolver for F
where
    F: Fn(&Path) -> Resolution + Send + Sync,
{
    fn resolve(&self, dir: &Path) -> Resolution {
        self(dir)
    }
}

/// Resolves Go packages inside `src` directories.
///
/// The import path of a directory is its location relative to the deepest
/// source directory containing it. A directory is a package when it holds
/// at least one `.go` file that the Go tool would not ignore.
#[derive(Debug, Clone)]
pub struct GoResolver {
    src_dirs: Vec<PathBuf>,
}

impl GoResolver {
    /// Create a resolver for the given source directories.
    pub fn new<I, P>(src_dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            src_dirs: src_dirs
                .into_iter()
                .map(|dir| normalize_path(dir.as_ref()))
                .collect(),
        }
    }

    /// Create a resolver for indexing `roots`.
    ///
    /// Import paths are computed against the default source directories;
    /// a root outside all of them becomes a source directory of its own.
    pub fn for_roots<P: AsRef<Path>>(roots: &[P]) -> Self {
        let mut src_dirs: Vec<PathBuf> = Self::default_src_dirs()
            .iter()
            .map(|dir| normalize_path(dir))
            .collect();

        for root in roots {
            let root = normalize_path(root.as_ref());
            if !src_dirs.iter().any(|src| root.starts_with(src)) {
                src_dirs.push(root);
            }
        }

        Self { src_dirs }
    }

    /// `$GOROOT/src` followed by `src` under every `$GOPATH` entry
    /// (`~/go` when `$GOPATH` is unset). Only existing directories are kept.
    pub fn default_src_dirs() -> Vec<PathBuf> {
        let mut src_dirs = Vec::new();

        if let Some(goroot) = std::env::var_os("GOROOT").filter(|v| !v.is_empty()) {
            src_dirs.push(PathBuf::from(goroot).join("src"));
        }

        match std::env::var_os("GOPATH").filter(|v| !v.is_empty()) {
            Some(gopath) => {
                for entry in std::env::split_paths(&gopath) {
                    if !entry.as_os_str().is_empty() {
                        src_dirs.push(entry.join("src"));
                    }
                }
            }
            None => {
                if let Some(home) = dirs::home_dir() {
                    src_dirs.push(home.join("go").join("src"));
                }
            }
        }

        src_dirs.retain(|dir| dir.is_dir());
        src_dirs
    }

    /// Source directories this resolver computes import paths against.
    pub fn src_dirs(&self) -> &[PathBuf] {
        &self.src_dirs
    }

    fn import_path(&self, dir: &Path) -> String {
        let deepest = self
            .src_dirs
            .iter()
            .filter(|src| dir.starts_with(src))
            .max_by_key(|src| src.components().count());

        let Some(src) = deepest else {
            return String::new();
        };

        dir.strip_prefix(src)
            .map(|rel| {
                rel.components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .unwrap_or_default()
    }
}

impl ModuleResolver for GoResolver {
    fn resolve(&self, dir: &Path) -> Resolution {
        let import_path = self.import_path(dir);

        match has_go_files(dir) {
            Ok(true) => Resolution::module(import_path),
            Ok(false) => Resolution::not_module(import_path),
            Err(e) => {
                debug!(path = ?dir, error = %e, "Failed to read directory");
                Resolution::not_module(import_path)
            }
        }
    }
}

/// Whether `dir` directly contains a buildable-looking `.go` file.
fn has_go_files(dir: &Path) -> std::io::Result<bool> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };

        if name.starts_with('_') || name.starts_with('.') || !name.ends_with(".go") {
            continue;
        }

        if entry.path().is_file() {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_package_directory_is_valid() {
        let temp_dir = tempdir().unwrap();
        let src = temp_dir.path().join("src");
        let pkg = src.join("github.com/user/repo");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(pkg.join("repo.go"), "package repo").unwrap();

        let resolver = GoResolver::new([&src]);
        let resolution = resolver.resolve(&pkg);

        assert_eq!(resolution, Resolution::module("github.com/user/repo"));
    }

    #[test]
    fn test_directory_without_go_files_is_invalid_but_named() {
        let temp_dir = tempdir().unwrap();
        let src = temp_dir.path().join("src");
        let dir = src.join("github.com/user");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("README.md"), "# user").unwrap();

        let resolver = GoResolver::new([&src]);
        let resolution = resolver.resolve(&dir);

        assert!(!resolution.valid);
        assert_eq!(resolution.module_id, "github.com/user");
    }

    #[test]
    fn test_ignored_go_files_do_not_count() {
        let temp_dir = tempdir().unwrap();
        let src = temp_dir.path().join("src");
        let dir = src.join("hidden");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("_draft.go"), "package hidden").unwrap();
        fs::write(dir.join(".scratch.go"), "package hidden").unwrap();
        fs::create_dir(dir.join("fake.go")).unwrap();

        let resolver = GoResolver::new([&src]);
        assert!(!resolver.resolve(&dir).valid);
    }

    #[test]
    fn test_deepest_src_dir_wins() {
        let temp_dir = tempdir().unwrap();
        let outer = temp_dir.path().join("src");
        let inner = outer.join("vendored/src");
        let pkg = inner.join("lib/http");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(pkg.join("http.go"), "package http").unwrap();

        let resolver = GoResolver::new([&outer, &inner]);
        assert_eq!(resolver.resolve(&pkg).module_id, "lib/http");
    }

    #[test]
    fn test_outside_src_dirs_has_empty_id() {
        let temp_dir = tempdir().unwrap();
        let src = temp_dir.path().join("src");
        let other = temp_dir.path().join("elsewhere");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&other).unwrap();
        fs::write(other.join("main.go"), "package main").unwrap();

        let resolver = GoResolver::new([&src]);
        let resolution = resolver.resolve(&other);

        assert!(resolution.valid);
        assert_eq!(resolution.module_id, "");
    }

    #[test]
    fn test_src_dir_itself_has_empty_id() {
        let temp_dir = tempdir().unwrap();
        let src = temp_dir.path().join("src");
        fs::create_dir_all(&src).unwrap();

        let resolver = GoResolver::new([&src]);
        assert_eq!(resolver.resolve(&src), Resolution::not_module(""));
    }

    #[test]
    fn test_missing_directory_is_not_module() {
        let temp_dir = tempdir().unwrap();
        let src = temp_dir.path().join("src");
        let resolver = GoResolver::new([&src]);

        let resolution = resolver.resolve(&src.join("does/not/exist"));
        assert!(!resolution.valid);
        assert_eq!(resolution.module_id, "does/not/exist");
    }

    #[test]
    fn test_for_roots_outside_go_tree_are_src_dirs() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path().join("code");
        let pkg = root.join("tools/lint");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(pkg.join("lint.go"), "package lint").unwrap();

        let resolver = GoResolver::for_roots(&[&root]);
        assert!(resolver.src_dirs().contains(&normalize_path(&root)));
        assert_eq!(resolver.resolve(&pkg), Resolution::module("tools/lint"));
    }

    #[test]
    fn test_src_dirs_are_normalized() {
        let resolver = GoResolver::new(["/go/src/", "/go/./src"]);
        assert_eq!(
            resolver.src_dirs(),
            &[PathBuf::from("/go/src"), PathBuf::from("/go/src")]
        );
    }
}
