//! Cycle collector.
//!
//! Reference counting frees acyclic garbage on its own. What it cannot free
//! is a cycle: a function stored in the scope it captured, a list that
//! contains itself, an instance whose member refers back to the instance.
//! The collector handles those.
//!
//! # Algorithm
//!
//! Every container that can take part in a cycle (Scope, List, Dict) is
//! registered with `track` when the interpreter allocates it. The collector
//! only holds weak handles, so tracking never keeps anything alive.
//!
//! 1. **Mark**: starting from the roots (global scope, every live frame's
//!    scope, operand stack and callee), walk `collect` callbacks and record
//!    the allocation id of everything reached.
//! 2. **Sweep**: every tracked container that is still alive but was not
//!    reached is garbage held up only by a cycle. Clearing its contents
//!    breaks the cycle and reference counting reclaims the rest.
//!
//! Collection runs only at instruction boundaries, when every live object is
//! reachable from a frame.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::scope::{LocalScope, Scope, WeakScope};
use crate::value::{Address, DictObject, Heap, ListObject, Object, WeakHeap};

/// Smallest tracked-map size at which dead entries are pruned.
const PRUNE_FLOOR: usize = 64;

/// Receives the scopes and objects a value keeps alive.
pub trait Visitor {
    fn visit_scope(&mut self, scope: &LocalScope<Scope>);

    fn visit_object(&mut self, object: &Object);

    fn visit_address(&mut self, address: &Address) {
        address.with(|object| self.visit_object(object));
    }
}

/// Counters reported after each collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GcStats {
    /// Collections run so far.
    pub collections: usize,
    /// Containers still tracked after the last collection.
    pub tracked: usize,
    /// Containers cleared across all collections.
    pub reclaimed: usize,
}

enum Tracked {
    Scope(WeakScope<Scope>),
    List(WeakHeap<ListObject>),
    Dict(WeakHeap<DictObject>),
}

impl Tracked {
    fn is_alive(&self) -> bool {
        match self {
            Tracked::Scope(weak) => weak.is_alive(),
            Tracked::List(weak) => weak.is_alive(),
            Tracked::Dict(weak) => weak.is_alive(),
        }
    }

    /// Empty the container if it is still alive. Returns whether anything
    /// was cleared.
    fn clear(&self) -> bool {
        match self {
            Tracked::Scope(weak) => weak.upgrade().is_some_and(|scope| {
                let detached = scope.borrow_mut().clear();
                drop(detached);
                true
            }),
            Tracked::List(weak) => weak.upgrade().is_some_and(|list| {
                let detached = list.take();
                drop(detached);
                true
            }),
            Tracked::Dict(weak) => weak.upgrade().is_some_and(|dict| {
                let detached = dict.take();
                drop(detached);
                true
            }),
        }
    }
}

/// Tracks cyclic-capable containers and reclaims unreachable ones.
pub struct Collector {
    tracked: FxHashMap<usize, Tracked>,
    allocations: usize,
    threshold: Option<usize>,
    /// Map size that triggers pruning of dead entries on insert.
    prune_at: usize,
    stats: GcStats,
}

impl Collector {
    /// A collector that runs automatically after `threshold` tracked
    /// allocations, or only on request when `None`.
    pub fn new(threshold: Option<usize>) -> Self {
        Collector {
            tracked: FxHashMap::default(),
            allocations: 0,
            threshold,
            prune_at: PRUNE_FLOOR,
            stats: GcStats::default(),
        }
    }

    pub fn track_scope(&mut self, scope: &LocalScope<Scope>) {
        self.insert(scope.id(), Tracked::Scope(scope.downgrade()));
    }

    pub fn track_list(&mut self, list: &Heap<ListObject>) {
        self.insert(list.id(), Tracked::List(list.downgrade()));
    }

    pub fn track_dict(&mut self, dict: &Heap<DictObject>) {
        self.insert(dict.id(), Tracked::Dict(dict.downgrade()));
    }

    /// Track `object` if it is a container. Other objects are ignored.
    pub fn track(&mut self, object: &Object) {
        match object {
            Object::List(list) => self.track_list(list),
            Object::Dict(dict) => self.track_dict(dict),
            _ => {}
        }
    }

    fn insert(&mut self, id: usize, entry: Tracked) {
        // A weak handle pins the allocation, so an id is never reused while
        // it is tracked.
        if self.tracked.insert(id, entry).is_none() {
            self.allocations += 1;
            if self.tracked.len() >= self.prune_at {
                self.prune();
            }
        }
    }

    /// Forget containers that reference counting already freed, releasing
    /// their weak handles. Runs with or without a threshold.
    fn prune(&mut self) {
        self.tracked.retain(|_, entry| entry.is_alive());
        self.prune_at = (self.tracked.len() * 2).max(PRUNE_FLOOR);
    }

    /// Whether enough allocations happened since the last run.
    #[inline]
    pub fn should_collect(&self) -> bool {
        self.threshold
            .is_some_and(|threshold| self.allocations >= threshold)
    }

    /// Run a full collection. `mark_roots` must report every root to the
    /// visitor it is given. Returns the number of containers cleared.
    pub fn collect(&mut self, mark_roots: impl FnOnce(&mut dyn Visitor)) -> usize {
        let mut marker = Marker::default();
        mark_roots(&mut marker);
        marker.drain();

        let mut reclaimed = 0;
        for (id, entry) in &self.tracked {
            if !marker.marked.contains(id) && entry.clear() {
                reclaimed += 1;
            }
        }
        self.prune();

        self.allocations = 0;
        self.stats.collections += 1;
        self.stats.tracked = self.tracked.len();
        self.stats.reclaimed += reclaimed;

        tracing::debug!(
            collection = self.stats.collections,
            marked = marker.marked.len(),
            reclaimed,
            tracked = self.stats.tracked,
            "garbage collection"
        );
        reclaimed
    }

    pub fn stats(&self) -> GcStats {
        GcStats {
            tracked: self.tracked.len(),
            ..self.stats
        }
    }
}

impl Default for Collector {
    fn default() -> Self {
        Collector::new(Some(crate::config::DEFAULT_GC_THRESHOLD))
    }
}

/// Worklist marker: records ids on first visit and defers traversal, so
/// deep structures never recurse on the native stack.
#[derive(Default)]
struct Marker {
    marked: FxHashSet<usize>,
    scopes: Vec<LocalScope<Scope>>,
    objects: Vec<Object>,
}

impl Marker {
    fn drain(&mut self) {
        loop {
            if let Some(scope) = self.scopes.pop() {
                scope.borrow().collect(self);
            } else if let Some(object) = self.objects.pop() {
                object.collect(self);
            } else {
                break;
            }
        }
    }
}

impl Visitor for Marker {
    fn visit_scope(&mut self, scope: &LocalScope<Scope>) {
        if self.marked.insert(scope.id()) {
            self.scopes.push(scope.clone());
        }
    }

    fn visit_object(&mut self, object: &Object) {
        let Some(id) = object.heap_id() else {
            return;
        };
        if self.marked.insert(id) {
            self.objects.push(object.clone());
        }
    }
}
