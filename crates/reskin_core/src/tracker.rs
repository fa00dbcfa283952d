//! Stale-override invalidation.
//!
//! Overrides registered for an origin describe the package as it was when
//! they were registered. When the package on disk changes, everything
//! attributed to it is dropped before it is used again.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

use hashbrown::HashMap;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::scope::Scope;
use crate::table::ReplacementTable;

/// Reports when a package was last modified.
pub trait ModificationSource: Send + Sync + 'static {
    /// Modification time of the package at `origin`, or `None` if it cannot
    /// be determined.
    fn last_modified(&self, origin: &str) -> Option<SystemTime>;
}

/// Reads modification times from the filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsModificationSource;

impl ModificationSource for FsModificationSource {
    fn last_modified(&self, origin: &str) -> Option<SystemTime> {
        fs::metadata(Path::new(origin))
            .and_then(|meta| meta.modified())
            .ok()
    }
}

/// Remembers the modification time each origin was loaded at.
pub struct ModificationTracker {
    source: Arc<dyn ModificationSource>,
    seen: Mutex<HashMap<Arc<str>, Option<SystemTime>>>,
}

impl ModificationTracker {
    /// Creates a tracker reading from `source`.
    #[must_use]
    pub fn new(source: Arc<dyn ModificationSource>) -> Self {
        Self {
            source,
            seen: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a tracker reading from the filesystem.
    #[must_use]
    pub fn filesystem() -> Self {
        Self::new(Arc::new(FsModificationSource))
    }

    /// Returns true if `scope` is being loaded for the first time since its
    /// package last changed.
    ///
    /// On a change, every entry of `table` attributed to the origin is purged
    /// before returning. Reading the modification time, updating the record
    /// and purging all happen under one lock, so concurrent callers for the
    /// same origin see exactly one `true` and never record an older time over
    /// a newer one. The global scope is never tracked.
    pub fn check_first_load(&self, scope: &Scope, table: &ReplacementTable) -> bool {
        let Scope::Origin(origin) = scope else {
            return false;
        };

        let mut seen = self.seen.lock();
        let modified = self.source.last_modified(origin);
        match seen.insert(Arc::clone(origin), modified) {
            None => {
                debug!(%origin, "first load of origin");
                true
            }
            Some(previous) if previous == modified => false,
            Some(_) => {
                let purged = table.purge(scope);
                info!(%origin, purged, "origin changed on disk, dropped stale replacements");
                true
            }
        }
    }

    /// Forgets every recorded origin.
    pub fn reset(&self) {
        self.seen.lock().clear();
    }
}

impl core::fmt::Debug for ModificationTracker {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ModificationTracker")
            .field("origins", &self.seen.lock().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::ResId;
    use crate::testing::MockModificationSource;
    use crate::value::Replacement;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{OnceLock, Weak};
    use std::time::Duration;

    fn setup() -> (Arc<MockModificationSource>, ModificationTracker, ReplacementTable) {
        let source = Arc::new(MockModificationSource::new());
        let tracker = ModificationTracker::new(Arc::clone(&source) as Arc<dyn ModificationSource>);
        (source, tracker, ReplacementTable::new())
    }

    #[test]
    fn global_scope_is_never_first() {
        let (_, tracker, table) = setup();
        assert!(!tracker.check_first_load(&Scope::Global, &table));
        assert!(!tracker.check_first_load(&Scope::Global, &table));
    }

    #[test]
    fn unchanged_origin_is_first_once() {
        let (source, tracker, table) = setup();
        source.set("/a.apk", SystemTime::UNIX_EPOCH + Duration::from_secs(100));
        let scope = Scope::origin("/a.apk");

        assert!(tracker.check_first_load(&scope, &table));
        assert!(!tracker.check_first_load(&scope, &table));
    }

    #[test]
    fn changed_origin_purges_its_entries() {
        let (source, tracker, table) = setup();
        let scope = Scope::origin("/a.apk");
        let other = Scope::origin("/b.apk");
        let id = ResId::new(0x7f02_0001);
        source.set("/a.apk", SystemTime::UNIX_EPOCH + Duration::from_secs(100));

        assert!(tracker.check_first_load(&scope, &table));
        table.set(id, scope.clone(), Replacement::Bool(true)).unwrap();
        table.set(id, other.clone(), Replacement::Bool(true)).unwrap();

        source.touch("/a.apk");

        assert!(tracker.check_first_load(&scope, &table));
        assert!(!table.contains(id, &scope));
        assert!(table.contains(id, &other));
    }

    #[test]
    fn missing_package_is_tracked_as_unknown() {
        let (source, tracker, table) = setup();
        let scope = Scope::origin("/gone.apk");

        assert!(tracker.check_first_load(&scope, &table));
        assert!(!tracker.check_first_load(&scope, &table));

        source.set("/gone.apk", SystemTime::UNIX_EPOCH + Duration::from_secs(5));
        assert!(tracker.check_first_load(&scope, &table));
    }

    #[test]
    fn replacements_registered_after_a_change_survive_later_checks() {
        let (source, tracker, table) = setup();
        let scope = Scope::origin("/a.apk");
        let id = ResId::new(0x7f02_0001);
        source.set("/a.apk", SystemTime::UNIX_EPOCH + Duration::from_secs(100));
        assert!(tracker.check_first_load(&scope, &table));

        source.touch("/a.apk");
        assert!(tracker.check_first_load(&scope, &table));
        table.set(id, scope.clone(), Replacement::Bool(true)).unwrap();

        assert!(!tracker.check_first_load(&scope, &table));
        assert!(!tracker.check_first_load(&scope, &table));
        assert!(table.contains(id, &scope));
    }

    /// Reports a fixed time and notes whether the tracker lock was held.
    struct LockObservingSource {
        tracker: OnceLock<Weak<ModificationTracker>>,
        unlocked_read: AtomicBool,
    }

    impl ModificationSource for LockObservingSource {
        fn last_modified(&self, _origin: &str) -> Option<SystemTime> {
            let locked = self
                .tracker
                .get()
                .and_then(Weak::upgrade)
                .is_some_and(|tracker| tracker.seen.is_locked());
            if !locked {
                self.unlocked_read.store(true, Ordering::SeqCst);
            }
            Some(SystemTime::UNIX_EPOCH)
        }
    }

    #[test]
    fn modification_time_is_read_under_the_record_lock() {
        let source = Arc::new(LockObservingSource {
            tracker: OnceLock::new(),
            unlocked_read: AtomicBool::new(false),
        });
        let tracker = Arc::new(ModificationTracker::new(
            Arc::clone(&source) as Arc<dyn ModificationSource>
        ));
        assert!(source.tracker.set(Arc::downgrade(&tracker)).is_ok());
        let table = ReplacementTable::new();
        let scope = Scope::origin("/a.apk");

        assert!(tracker.check_first_load(&scope, &table));
        assert!(!tracker.check_first_load(&scope, &table));
        assert!(!source.unlocked_read.load(Ordering::SeqCst));
    }

    #[test]
    fn filesystem_source_reads_mtime() {
        let dir = std::env::temp_dir();
        assert!(FsModificationSource.last_modified(dir.to_str().unwrap()).is_some());
        assert!(FsModificationSource
            .last_modified("/definitely/not/here.apk")
            .is_none());
    }
}
