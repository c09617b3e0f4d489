//! Index store: configured roots, exclusions, and the current snapshot.
//!
//! A rebuild walks every root without holding the store lock and then
//! publishes the new [`Snapshot`] with a single pointer swap, so queries
//! keep reading the previous generation until the swap happens.

use crate::{ExclusionSet, IndexerError, ModuleResolver, QueryKind, Walker};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::collections::HashSet;
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// One indexed directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexEntry {
    /// Absolute path of the directory
    pub full_path: PathBuf,
    /// Module identifier reported by the resolver (may be empty)
    pub module_id: String,
    /// Whether the directory is itself a module
    pub valid: bool,
}

impl IndexEntry {
    pub fn new(full_path: impl Into<PathBuf>, module_id: impl Into<String>, valid: bool) -> Self {
        Self {
            full_path: full_path.into(),
            module_id: module_id.into(),
            valid,
        }
    }
}

/// One complete index generation.
#[derive(Debug, Clone)]
pub struct Snapshot {
    generation: u64,
    built_at: Option<DateTime<Utc>>,
    entries: Vec<IndexEntry>,
}

impl Snapshot {
    /// The generation served before the first rebuild completes.
    pub fn empty() -> Self {
        Self {
            generation: 0,
            built_at: None,
            entries: Vec::new(),
        }
    }

    pub fn new(generation: u64, entries: Vec<IndexEntry>) -> Self {
        Self {
            generation,
            built_at: Some(Utc::now()),
            entries,
        }
    }

    /// Generation number, 0 until the first rebuild.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn built_at(&self) -> Option<DateTime<Utc>> {
        self.built_at
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Summary of a completed rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebuildStats {
    /// Generation that was published
    pub generation: u64,
    /// Number of indexed directories
    pub entries: usize,
    /// Roots that could not be read
    pub roots_failed: usize,
    /// Wall time of the walk and swap
    pub duration: Duration,
}

struct StoreState {
    snapshot: Arc<Snapshot>,
    roots: Vec<PathBuf>,
    exclusions: Arc<ExclusionSet>,
}

/// Shared index of directories under the configured roots.
pub struct IndexStore {
    state: RwLock<StoreState>,
    /// Held for the whole of a rebuild so rebuilds never overlap.
    rebuild_lock: Mutex<()>,
    resolver: Arc<dyn ModuleResolver>,
}

impl IndexStore {
    /// Create an empty store with no roots and the default exclusions.
    pub fn new(resolver: Arc<dyn ModuleResolver>) -> Self {
        Self::with_config(Vec::<PathBuf>::new(), ExclusionSet::default(), resolver)
    }

    /// Create a store with roots and exclusions already configured.
    pub fn with_config<I, P>(
        roots: I,
        exclusions: ExclusionSet,
        resolver: Arc<dyn ModuleResolver>,
    ) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            state: RwLock::new(StoreState {
                snapshot: Arc::new(Snapshot::empty()),
                roots: dedup_roots(roots),
                exclusions: Arc::new(exclusions),
            }),
            rebuild_lock: Mutex::new(()),
            resolver,
        }
    }

    /// Replace the configured roots. Does not rebuild.
    ///
    /// Roots are compared after normalization, so `/x`, `/x/` and `/x/.`
    /// are one root; the first spelling seen keeps its position.
    pub fn set_roots<I, P>(&self, roots: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let roots = dedup_roots(roots);
        debug!(count = roots.len(), "Roots configured");
        self.state.write().roots = roots;
    }

    pub fn roots(&self) -> Vec<PathBuf> {
        self.state.read().roots.clone()
    }

    /// Replace the exclusion set with names parsed from a reader.
    pub fn load_exclusions<R: Read>(&self, reader: R) -> Result<(), IndexerError> {
        let exclusions = ExclusionSet::load(reader)?;
        self.set_exclusions(exclusions);
        Ok(())
    }

    pub fn set_exclusions(&self, exclusions: ExclusionSet) {
        debug!(count = exclusions.len(), "Exclusions configured");
        self.state.write().exclusions = Arc::new(exclusions);
    }

    pub fn exclusions(&self) -> Arc<ExclusionSet> {
        self.state.read().exclusions.clone()
    }

    /// The current generation. Later rebuilds do not affect it.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.state.read().snapshot.clone()
    }

    pub fn generation(&self) -> u64 {
        self.state.read().snapshot.generation
    }

    pub fn len(&self) -> usize {
        self.state.read().snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Match `partial` against the current generation.
    pub fn query(&self, partial: &str, kind: QueryKind) -> Vec<String> {
        self.snapshot().query(partial, kind)
    }

    /// Re-index every root, waiting for any rebuild already running.
    pub fn rebuild(&self) -> RebuildStats {
        let _guard = self.rebuild_lock.lock();
        self.rebuild_locked()
    }

    /// Re-index every root unless another rebuild is already running.
    pub fn try_rebuild(&self) -> Option<RebuildStats> {
        let _guard = self.rebuild_lock.try_lock()?;
        Some(self.rebuild_locked())
    }

    fn rebuild_locked(&self) -> RebuildStats {
        let start = Instant::now();

        let (roots, exclusions) = {
            let state = self.state.read();
            (state.roots.clone(), state.exclusions.clone())
        };

        let mut entries = Vec::new();
        let mut seen = HashSet::new();
        let mut roots_failed = 0;

        for root in &roots {
            let walker = Walker::new(root, exclusions.clone(), self.resolver.clone());
            match walker.walk() {
                Ok(found) => {
                    debug!(root = ?root, entries = found.len(), "Root walked");
                    // Nested roots would otherwise list shared directories twice
                    entries.extend(
                        found
                            .into_iter()
                            .filter(|entry| seen.insert(entry.full_path.clone())),
                    );
                }
                Err(e) => {
                    warn!(root = ?root, error = %e, "Skipping root");
                    roots_failed += 1;
                }
            }
        }

        let count = entries.len();
        let generation = {
            let mut state = self.state.write();
            let generation = state.snapshot.generation + 1;
            state.snapshot = Arc::new(Snapshot::new(generation, entries));
            generation
        };

        let duration = start.elapsed();
        info!(
            entries = count,
            generation,
            roots = roots.len(),
            roots_failed,
            duration_ms = duration.as_millis() as u64,
            "Indexed {} directories",
            count
        );

        RebuildStats {
            generation,
            entries: count,
            roots_failed,
            duration,
        }
    }
}

fn dedup_roots<I, P>(roots: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut seen = HashSet::new();
    roots
        .into_iter()
        .map(|root| normalize_path(root.as_ref()))
        .filter(|root| seen.insert(root.clone()))
        .collect()
}

/// Lexically normalize a path and make it absolute.
///
/// Relative paths are joined onto the working directory; `.` segments and
/// trailing separators disappear and `..` removes the preceding segment.
/// Symlinks are not resolved.
pub fn normalize_path(path: &Path) -> PathBuf {
    let joined;
    let path = if path.is_relative() {
        match std::env::current_dir() {
            Ok(cwd) => {
                joined = cwd.join(path);
                joined.as_path()
            }
            Err(_) => path,
        }
    } else {
        path
    };

    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }

    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }
    normalized
}
