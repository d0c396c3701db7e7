use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::summary::{FileSummary, PackageSummary};

/// Process-lifetime map from package name to its accumulating summary.
///
/// Events are normally delivered sequentially, but the map is shared mutable
/// state reachable from every callback, so each merge runs as a scoped
/// critical section: the lock is held for the read-modify-write and released
/// on every exit path. No I/O happens while the lock is held; callers locate
/// source and emit reports outside of it.
#[derive(Debug, Default)]
pub struct PackageAggregate {
    packages: Mutex<BTreeMap<String, PackageSummary>>,
}

impl PackageAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `summary` to its package, creating the package entry on first
    /// contact. Returns a snapshot of the updated package summary.
    ///
    /// No de-duplication by file name: a file reported twice yields two
    /// entries, and its counts are summed at every level.
    pub fn merge(&self, summary: FileSummary) -> PackageSummary {
        let mut packages = self.lock();
        let package = packages
            .entry(summary.package_name.clone())
            .or_insert_with(|| PackageSummary::new(&summary.package_name));
        package.file_summaries.push(summary);
        package.clone()
    }

    /// Number of packages merged so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Clone of the current package map, in package-name order.
    pub fn snapshot(&self) -> BTreeMap<String, PackageSummary> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, PackageSummary>> {
        // A poisoning panic cannot leave a half-applied merge behind (the
        // write is a single push), so recover the guard instead of failing.
        self.packages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
