//! Layout callbacks.
//!
//! Callbacks are registered per layout identifier and scope. When a layout
//! with callbacks is opened, the parser instance is tagged with everything
//! dispatch needs (names, variant, callbacks, resources). After the caller
//! inflates the layout it reports the parser and the instantiated root back
//! through [`LayoutHooks::dispatch_inflated`], which fires every callback once.
//!
//! Tags are held weakly by parser identity. A parser that is dropped without
//! being dispatched leaves nothing behind. The resources that loaded the
//! layout are held strongly by the tag, so dispatch still reaches them after
//! the caller let go of its own handle.

use core::any::Any;
use core::fmt;
use std::collections::BTreeMap;
use std::sync::{Arc, Weak};

use hashbrown::HashMap;
use parking_lot::Mutex;
use reskin_core::{
    DocumentParser, InvalidIdentifier, NameRegistry, ResId, ResourceNames, ResourceProvider, Scope,
    ScopedMap,
};
use tracing::debug;

/// Signature of a layout callback.
pub type LayoutHandler = dyn Fn(&LayoutInflated<'_>) + Send + Sync;

/// Everything a callback learns about an inflated layout.
pub struct LayoutInflated<'a> {
    /// Root of the instantiated tree. Downcast with [`LayoutInflated::root`].
    pub root: &'a dyn Any,
    /// Names of the layout.
    pub names: &'a ResourceNames,
    /// Layout directory the document was loaded from, e.g. `layout-land`.
    pub variant: &'a str,
    /// Resources the layout was loaded through.
    pub resources: &'a Arc<dyn ResourceProvider>,
}

impl LayoutInflated<'_> {
    /// Downcasts the instantiated root.
    #[must_use]
    pub fn root<T: Any>(&self) -> Option<&T> {
        self.root.downcast_ref()
    }
}

/// A layout callback with its priority.
///
/// Callbacks run in ascending priority; equal priorities run in registration
/// order.
#[derive(Clone)]
pub struct LayoutCallback {
    priority: i32,
    handler: Arc<LayoutHandler>,
}

impl LayoutCallback {
    /// Priority of callbacks created with [`LayoutCallback::new`].
    pub const DEFAULT_PRIORITY: i32 = 0;

    /// Wraps `handler` with the default priority.
    pub fn new(handler: impl Fn(&LayoutInflated<'_>) + Send + Sync + 'static) -> Self {
        Self {
            priority: Self::DEFAULT_PRIORITY,
            handler: Arc::new(handler),
        }
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> i32 {
        self.priority
    }
}

impl fmt::Debug for LayoutCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutCallback")
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
pub(crate) struct CallbackSet {
    next_seq: u64,
    entries: BTreeMap<(i32, u64), LayoutCallback>,
}

impl CallbackSet {
    fn snapshot(&self) -> Vec<LayoutCallback> {
        self.entries.values().cloned().collect()
    }
}

pub(crate) type SharedCallbacks = Arc<Mutex<CallbackSet>>;

/// Removes a registered callback.
#[derive(Debug, Clone)]
pub struct LayoutHookHandle {
    set: Weak<Mutex<CallbackSet>>,
    key: (i32, u64),
    id: ResId,
}

impl LayoutHookHandle {
    /// Layout the callback was registered for.
    #[must_use]
    pub const fn id(&self) -> ResId {
        self.id
    }

    /// Unregisters the callback. Returns false if it was already removed.
    pub fn unhook(&self) -> bool {
        self.set
            .upgrade()
            .is_some_and(|set| set.lock().entries.remove(&self.key).is_some())
    }
}

impl fmt::Debug for CallbackSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackSet")
            .field("len", &self.entries.len())
            .finish()
    }
}

/// Metadata attached to a parser awaiting inflation.
pub(crate) struct PendingInflation {
    pub(crate) names: Arc<ResourceNames>,
    pub(crate) variant: Arc<str>,
    pub(crate) callbacks: SharedCallbacks,
    pub(crate) resources: Arc<dyn ResourceProvider>,
}

struct PendingEntry {
    parser: Weak<dyn DocumentParser>,
    inflation: PendingInflation,
}

fn parser_key(parser: &dyn DocumentParser) -> usize {
    core::ptr::from_ref(parser).cast::<()>() as usize
}

/// Layout callback registry and dispatcher.
pub struct LayoutHooks {
    callbacks: ScopedMap<SharedCallbacks>,
    names: Arc<NameRegistry>,
    pending: Mutex<HashMap<usize, PendingEntry>>,
}

impl LayoutHooks {
    /// Creates an empty registry that records names into `names`.
    #[must_use]
    pub fn new(names: Arc<NameRegistry>) -> Self {
        Self {
            callbacks: ScopedMap::new(),
            names,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Registers `callback` for the layout described by `names` in `scope`.
    ///
    /// The names are recorded in the name registry so dispatch can hand them
    /// to the callback without another lookup.
    ///
    /// # Errors
    ///
    /// Rejects the same identifiers the replacement table does.
    pub fn register(
        &self,
        scope: Scope,
        names: ResourceNames,
        callback: LayoutCallback,
    ) -> Result<LayoutHookHandle, InvalidIdentifier> {
        let id = names.id;
        id.validate_for(&scope)?;

        let set = self.callbacks.update(id, scope.clone(), |set| Arc::clone(set));
        let key = {
            let mut set = set.lock();
            let key = (callback.priority, set.next_seq);
            set.next_seq += 1;
            set.entries.insert(key, callback);
            key
        };
        debug!(layout = %names.full_name, %scope, priority = key.0, "registered layout callback");
        self.names.insert(scope, names);

        Ok(LayoutHookHandle {
            set: Arc::downgrade(&set),
            key,
            id,
        })
    }

    /// Callbacks visible to `scope` for `id`.
    ///
    /// An origin's own non-empty set replaces the global set; it is not merged.
    pub(crate) fn callbacks_for(&self, id: ResId, scope: &Scope) -> Option<SharedCallbacks> {
        let slot = self.callbacks.slot(id)?;
        let inner = slot.read();
        let non_empty = |scope: &Scope| {
            inner
                .get(scope)
                .filter(|set| !set.lock().entries.is_empty())
                .cloned()
        };
        match scope {
            Scope::Global => non_empty(scope),
            Scope::Origin(_) => non_empty(scope).or_else(|| non_empty(&Scope::Global)),
        }
    }

    /// Number of callbacks that would fire for `id` loaded in `scope`.
    #[must_use]
    pub fn callback_count(&self, id: ResId, scope: &Scope) -> usize {
        self.callbacks_for(id, scope)
            .map_or(0, |set| set.lock().entries.len())
    }

    /// Tags `parser` for dispatch.
    pub(crate) fn attach(&self, parser: &Arc<dyn DocumentParser>, inflation: PendingInflation) {
        let mut pending = self.pending.lock();
        pending.retain(|_, entry| entry.parser.strong_count() > 0);
        pending.insert(
            parser_key(parser.as_ref()),
            PendingEntry {
                parser: Arc::downgrade(parser),
                inflation,
            },
        );
    }

    /// Returns true if `parser` is tagged and not yet dispatched.
    #[must_use]
    pub fn is_pending(&self, parser: &dyn DocumentParser) -> bool {
        self.pending
            .lock()
            .get(&parser_key(parser))
            .is_some_and(|entry| entry.parser.strong_count() > 0)
    }

    /// Number of live tagged parsers.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        let mut pending = self.pending.lock();
        pending.retain(|_, entry| entry.parser.strong_count() > 0);
        pending.len()
    }

    /// Fires the callbacks tagged on `parser` with the instantiated `root`.
    ///
    /// The tag is consumed, so a parser dispatches at most once. Returns the
    /// number of callbacks invoked; untagged parsers invoke none.
    pub fn dispatch_inflated(&self, parser: &dyn DocumentParser, root: &dyn Any) -> usize {
        let Some(entry) = self.pending.lock().remove(&parser_key(parser)) else {
            return 0;
        };
        if entry.parser.strong_count() == 0 {
            // The tagged parser died and its address was reused.
            return 0;
        }
        let inflation = entry.inflation;
        let callbacks = inflation.callbacks.lock().snapshot();
        let event = LayoutInflated {
            root,
            names: &inflation.names,
            variant: &inflation.variant,
            resources: &inflation.resources,
        };
        for callback in &callbacks {
            (callback.handler)(&event);
        }
        debug!(
            layout = %inflation.names.full_name,
            variant = %inflation.variant,
            callbacks = callbacks.len(),
            "dispatched layout callbacks"
        );
        callbacks.len()
    }
}

impl fmt::Debug for LayoutHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutHooks")
            .field("layouts", &self.callbacks.len())
            .field("pending", &self.pending.lock().len())
            .finish_non_exhaustive()
    }
}
