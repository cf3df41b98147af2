//! Result cache for completed simulations
//!
//! Results are keyed by ignition point id and shared as `Arc`s. The cache is
//! an explicit object owned by the service, so its lifetime and capacity are
//! decided by whoever builds the service.
//!
//! # Request coalescing
//!
//! ```text
//! run_simulation(42) ─┐
//!                     │
//! run_simulation(42) ─┼──► ResultCache ──► one engine run
//!                     │        │                 │
//! run_simulation(42) ─┘        ▼                 ▼
//!                       all callers receive the same Arc
//! ```
//!
//! The first caller for an id becomes the leader and computes; callers that
//! arrive while it runs block until it finishes. If the leader fails (or
//! panics) nothing is cached and each waiter retries on its own.
//!
//! # Eviction
//!
//! With a capacity set, the least recently used entry is dropped when a new
//! result would exceed it. A hit counts as a use.

use crate::core_types::grid_point::PointId;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

use super::SimulationResult;

/// Counters for monitoring cache effectiveness
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests served from a completed entry
    pub hits: u64,
    /// Requests that ran the computation
    pub misses: u64,
    /// Requests that waited on another caller's computation
    pub coalesced: u64,
    /// Entries dropped to stay within capacity
    pub evictions: u64,
}

impl CacheStats {
    /// Fraction of requests that did not run the computation (0.0 to 1.0)
    pub fn reuse_ratio(&self) -> f64 {
        let total = self.hits + self.misses + self.coalesced;
        if total == 0 {
            0.0
        } else {
            (self.hits + self.coalesced) as f64 / total as f64
        }
    }
}

enum Flight<T> {
    Pending,
    Ready(Arc<T>),
    Failed,
}

/// Computation in progress for one id
struct InFlight<T> {
    state: Mutex<Flight<T>>,
    done: Condvar,
}

impl<T> InFlight<T> {
    fn new() -> Self {
        Self {
            state: Mutex::new(Flight::Pending),
            done: Condvar::new(),
        }
    }

    /// Block until the leader finishes; `None` if it failed
    fn wait(&self) -> Option<Arc<T>> {
        let mut flight = lock(&self.state);
        while matches!(*flight, Flight::Pending) {
            flight = self
                .done
                .wait(flight)
                .unwrap_or_else(PoisonError::into_inner);
        }
        match &*flight {
            Flight::Ready(result) => Some(Arc::clone(result)),
            Flight::Pending | Flight::Failed => None,
        }
    }

    fn finish(&self, outcome: Flight<T>) {
        *lock(&self.state) = outcome;
        self.done.notify_all();
    }
}

struct CacheState<T> {
    /// Completed results, least recently used first
    entries: IndexMap<PointId, Arc<T>>,
    in_flight: FxHashMap<PointId, Arc<InFlight<T>>>,
}

/// Memo of completed simulations with single-flight computation
pub struct ResultCache<T = SimulationResult> {
    capacity: Option<usize>,
    state: Mutex<CacheState<T>>,
    hits: AtomicU64,
    misses: AtomicU64,
    coalesced: AtomicU64,
    evictions: AtomicU64,
}

impl<T> ResultCache<T> {
    /// Create a cache holding at most `capacity` results (`None` = unbounded)
    ///
    /// A capacity of zero is treated as one.
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            capacity: capacity.map(|c| c.max(1)),
            state: Mutex::new(CacheState {
                entries: IndexMap::new(),
                in_flight: FxHashMap::default(),
            }),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            coalesced: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Create a cache that never evicts
    pub fn unbounded() -> Self {
        Self::new(None)
    }

    /// Maximum number of results kept
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Cached result for `id`, marking it as recently used
    pub fn get(&self, id: PointId) -> Option<Arc<T>> {
        let mut state = lock(&self.state);
        touch(&mut state.entries, id)
    }

    /// True if a completed result for `id` is cached
    pub fn contains(&self, id: PointId) -> bool {
        lock(&self.state).entries.contains_key(&id)
    }

    /// Number of completed results held
    pub fn len(&self) -> usize {
        lock(&self.state).entries.len()
    }

    /// True when no completed results are held
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached ids, least recently used first
    pub fn ids(&self) -> Vec<PointId> {
        lock(&self.state).entries.keys().copied().collect()
    }

    /// Drop every completed result
    ///
    /// Computations already in flight still complete and are cached.
    pub fn clear(&self) {
        let mut state = lock(&self.state);
        let dropped = state.entries.len();
        state.entries.clear();
        debug!(dropped, "result cache cleared");
    }

    /// Snapshot of the cache counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    /// Return the cached result for `id`, computing it at most once
    ///
    /// Concurrent callers for the same id share one call to `compute`.
    /// A failed computation caches nothing.
    ///
    /// # Errors
    /// Returns the error of `compute` when this caller ran it and it failed.
    pub fn get_or_compute<E, F>(&self, id: PointId, compute: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let flight = loop {
            let waiting = {
                let mut state = lock(&self.state);
                if let Some(hit) = touch(&mut state.entries, id) {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    info!(id, "result cache hit");
                    return Ok(hit);
                }
                if let Some(flight) = state.in_flight.get(&id) {
                    Arc::clone(flight)
                } else {
                    let flight = Arc::new(InFlight::new());
                    state.in_flight.insert(id, Arc::clone(&flight));
                    break flight;
                }
            };

            self.coalesced.fetch_add(1, Ordering::Relaxed);
            info!(id, "waiting on in-flight computation");
            if let Some(result) = waiting.wait() {
                return Ok(result);
            }
            debug!(id, "in-flight computation failed, retrying");
        };

        self.misses.fetch_add(1, Ordering::Relaxed);
        let mut leader = Leader {
            cache: self,
            id,
            flight,
            finished: false,
        };
        match compute() {
            Ok(value) => {
                let result = Arc::new(value);
                leader.complete(Some(Arc::clone(&result)));
                Ok(result)
            }
            Err(e) => {
                leader.complete(None);
                Err(e)
            }
        }
    }

    fn insert_completed(&self, state: &mut CacheState<T>, id: PointId, result: Arc<T>) {
        state.entries.shift_remove(&id);
        state.entries.insert(id, result);
        if let Some(capacity) = self.capacity {
            while state.entries.len() > capacity {
                if let Some((evicted, _)) = state.entries.shift_remove_index(0) {
                    self.evictions.fetch_add(1, Ordering::Relaxed);
                    debug!(id = evicted, "evicted least recently used result");
                }
            }
        }
    }
}

impl<T> Default for ResultCache<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<T> std::fmt::Debug for ResultCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("ResultCache")
            .field("capacity", &self.capacity)
            .field("entries", &state.entries.len())
            .field("in_flight", &state.in_flight.len())
            .finish_non_exhaustive()
    }
}

/// Publishes the leader's outcome, including when `compute` panics
struct Leader<'a, T> {
    cache: &'a ResultCache<T>,
    id: PointId,
    flight: Arc<InFlight<T>>,
    finished: bool,
}

impl<T> Leader<'_, T> {
    fn complete(&mut self, result: Option<Arc<T>>) {
        {
            let mut state = lock(&self.cache.state);
            if state
                .in_flight
                .get(&self.id)
                .is_some_and(|current| Arc::ptr_eq(current, &self.flight))
            {
                state.in_flight.remove(&self.id);
            }
            if let Some(result) = &result {
                self.cache
                    .insert_completed(&mut state, self.id, Arc::clone(result));
            }
        }
        self.flight
            .finish(result.map_or(Flight::Failed, Flight::Ready));
        self.finished = true;
    }
}

impl<T> Drop for Leader<'_, T> {
    fn drop(&mut self) {
        if !self.finished {
            self.complete(None);
        }
    }
}

/// Move `id` to the most recently used position and return it
fn touch<T>(entries: &mut IndexMap<PointId, Arc<T>>, id: PointId) -> Option<Arc<T>> {
    let result = entries.shift_remove(&id)?;
    entries.insert(id, Arc::clone(&result));
    Some(result)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
