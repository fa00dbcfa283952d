//! The hosting process that modules plug into.
//!
//! A [`Host`] collects module plugins, stores the capability [`API`]s they
//! publish, and walks every plugin through the same stages:
//!
//! 1. **Ordering** - dependencies are checked and plugins are ordered so
//!    that each one follows everything it depends on
//! 2. **Build** - `build()` runs in that order
//! 3. **Ready** - `ready()` runs in that order, once everything is built
//! 4. **Cleanup** - `cleanup()` runs last-built first

use core::any::{Any, TypeId};
use std::collections::VecDeque;

use hashbrown::{HashMap, HashSet};

use crate::api::API;
use crate::plugin::{Plugin, PluginId, Plugins};

type StoredApi = Box<dyn Any + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Stage {
    #[default]
    Collecting,
    Building,
    Running,
}

struct Registration {
    id: PluginId,
    label: String,
    module: Box<dyn Plugin>,
}

/// Owns the capability APIs and the module plugins of one process.
///
/// # Example
///
/// ```
/// use reskin_system::host::Host;
/// use reskin_system::plugin::Plugin;
///
/// struct Noop;
/// impl Plugin for Noop {
///     fn build(&self, _host: &mut Host) {}
/// }
///
/// let mut host = Host::new();
/// host.add_plugins(Noop);
/// host.finish();
/// assert!(host.is_built());
/// host.cleanup();
/// ```
#[derive(Default)]
pub struct Host {
    apis: HashMap<TypeId, StoredApi>,
    waiting: Vec<Registration>,
    active: Vec<Registration>,
    seen: HashSet<PluginId>,
    stage: Stage,
}

impl Host {
    /// Creates a host with no plugins and no APIs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Modules
    // ─────────────────────────────────────────────────────────────────────────

    /// Registers a plugin or a whole plugin group.
    ///
    /// A plugin registered from inside another plugin's `build` is built
    /// straight away.
    ///
    /// # Panics
    ///
    /// Panics when a plugin that reports `is_unique()` is registered again.
    pub fn add_plugins<P: Plugins>(&mut self, plugins: P) -> &mut Self {
        plugins.add_to_host(self);
        self
    }

    pub(crate) fn register(&mut self, id: PluginId, module: Box<dyn Plugin>) {
        let label = module.name().to_owned();
        let fresh = self.seen.insert(id);
        assert!(
            fresh || !module.is_unique(),
            "module plugin `{label}` is already added to this host; \
             return false from `is_unique()` to allow several instances",
        );

        let registration = Registration { id, label, module };
        match self.stage {
            Stage::Building => {
                tracing::debug!(plugin = %registration.label, "building late plugin");
                registration.module.build(self);
                self.active.push(registration);
            }
            Stage::Collecting | Stage::Running => self.waiting.push(registration),
        }
    }

    /// Whether a plugin of type `P` has been registered.
    #[must_use]
    pub fn has_plugin<P: Plugin>(&self) -> bool {
        self.seen.contains(&PluginId::of::<P>())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Capability APIs
    // ─────────────────────────────────────────────────────────────────────────

    /// Stores `api`, handing back whatever value of the same type it displaced.
    pub fn insert_api<A: API>(&mut self, api: A) -> Option<A> {
        let previous = self.apis.insert(TypeId::of::<A>(), Box::new(api))?;
        previous.downcast::<A>().ok().map(|displaced| *displaced)
    }

    /// Borrows the stored API of type `A`.
    #[must_use]
    pub fn api<A: API>(&self) -> Option<&A> {
        self.apis.get(&TypeId::of::<A>())?.downcast_ref()
    }

    /// Whether an API of type `A` is stored.
    #[must_use]
    pub fn contains_api<A: API>(&self) -> bool {
        self.apis.contains_key(&TypeId::of::<A>())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Stages
    // ─────────────────────────────────────────────────────────────────────────

    /// True once [`finish`](Self::finish) has returned.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.stage == Stage::Running
    }

    /// Orders, builds and readies every registered plugin.
    ///
    /// # Panics
    ///
    /// Panics on a second call, when a declared dependency was never
    /// registered, or when dependencies form a cycle.
    pub fn finish(&mut self) {
        assert!(
            self.stage == Stage::Collecting,
            "finish() already called on this host; plugins are built only once",
        );

        let waiting = core::mem::take(&mut self.waiting);
        let ordered = order_by_dependencies(waiting, &self.active);

        self.stage = Stage::Building;
        for registration in ordered {
            tracing::debug!(plugin = %registration.label, "building plugin");
            registration.module.build(self);
            self.active.push(registration);
        }

        // `ready` may register more plugins; those get built immediately and
        // land in `self.active` while the readied set is detached.
        let readied = core::mem::take(&mut self.active);
        for registration in &readied {
            registration.module.ready(self);
        }
        let late = core::mem::replace(&mut self.active, readied);
        self.active.extend(late);

        self.stage = Stage::Running;
        tracing::debug!(plugins = self.active.len(), "host running");
    }

    /// Runs `cleanup()` on every built plugin, last-built first.
    pub fn cleanup(&mut self) {
        let active = core::mem::take(&mut self.active);
        active
            .iter()
            .rev()
            .for_each(|registration| registration.module.cleanup(self));
        self.active = active;
    }
}

/// Orders `waiting` so that every plugin comes after its dependencies,
/// keeping registration order among independent plugins.
fn order_by_dependencies(waiting: Vec<Registration>, built: &[Registration]) -> Vec<Registration> {
    let position: HashMap<PluginId, usize> = waiting
        .iter()
        .enumerate()
        .map(|(index, registration)| (registration.id, index))
        .collect();

    let mut blockers = vec![0usize; waiting.len()];
    let mut unblocks: Vec<Vec<usize>> = vec![Vec::new(); waiting.len()];

    for (index, registration) in waiting.iter().enumerate() {
        for dependency in registration.module.dependencies() {
            if let Some(&provider) = position.get(&dependency) {
                unblocks[provider].push(index);
                blockers[index] += 1;
                continue;
            }
            let satisfied = built.iter().any(|done| done.id == dependency);
            assert!(
                satisfied,
                "module plugin `{}` depends on `{}`, which was not added to the host",
                registration.label,
                dependency.type_name(),
            );
        }
    }

    let mut ready: VecDeque<usize> = (0..waiting.len()).filter(|&i| blockers[i] == 0).collect();
    let mut order = Vec::with_capacity(waiting.len());
    while let Some(next) = ready.pop_front() {
        order.push(next);
        for &follower in &unblocks[next] {
            blockers[follower] -= 1;
            if blockers[follower] == 0 {
                ready.push_back(follower);
            }
        }
    }

    if order.len() < waiting.len() {
        let stuck: Vec<&str> = waiting
            .iter()
            .zip(&blockers)
            .filter(|(_, remaining)| **remaining > 0)
            .map(|(registration, _)| registration.label.as_str())
            .collect();
        panic!("Circular dependency between module plugins: {stuck:?}");
    }

    let mut slots: Vec<Option<Registration>> = waiting.into_iter().map(Some).collect();
    order.into_iter().filter_map(|index| slots[index].take()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Probe {
        tag: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Probe {
        fn record(&self, stage: &str) {
            self.log.lock().unwrap().push(format!("{stage}:{}", self.tag));
        }
    }

    impl Plugin for Probe {
        fn build(&self, _host: &mut Host) {
            self.record("build");
        }

        fn ready(&self, _host: &mut Host) {
            self.record("ready");
        }

        fn cleanup(&self, _host: &mut Host) {
            self.record("cleanup");
        }

        fn name(&self) -> &str {
            self.tag
        }

        fn is_unique(&self) -> bool {
            false
        }
    }

    #[derive(Debug, PartialEq)]
    struct Palette(u32);
    impl API for Palette {}

    #[test]
    fn insert_api_hands_back_the_displaced_value() {
        let mut host = Host::new();
        assert_eq!(host.insert_api(Palette(1)), None);
        assert_eq!(host.insert_api(Palette(2)), Some(Palette(1)));
        assert_eq!(host.api::<Palette>(), Some(&Palette(2)));
        assert!(host.contains_api::<Palette>());
    }

    #[test]
    fn stages_run_in_order_and_cleanup_reverses() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut host = Host::new();
        for tag in ["a", "b"] {
            host.add_plugins(Probe {
                tag,
                log: Arc::clone(&log),
            });
        }
        host.finish();
        host.cleanup();

        let expected = [
            "build:a",
            "build:b",
            "ready:a",
            "ready:b",
            "cleanup:b",
            "cleanup:a",
        ];
        assert_eq!(*log.lock().unwrap(), expected);
    }

    #[test]
    #[should_panic(expected = "already called")]
    fn second_finish_panics() {
        let mut host = Host::new();
        host.finish();
        host.finish();
    }
}
