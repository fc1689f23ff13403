//! Fork-join worker pool.
//!
//! Pipeline stages parallelize over image rows through an explicit
//! [`ThreadPool`] handle rather than ambient global state: the pipeline
//! holds a handle, tests build their own, and a process-wide
//! [`default_pool`] exists purely as a convenience.
//!
//! The execution contract is deliberately narrow:
//!
//! - [`parallel_for`](ThreadPool::parallel_for) partitions `[begin, end)`
//!   into contiguous chunks, at most one per worker, and runs the body for
//!   every index **exactly once**.
//! - Calls are synchronous fan-out/fan-in barriers; no call returns with
//!   work outstanding.
//! - No ordering is guaranteed between indices; callers must depend only on
//!   completion.
//! - Bodies never fail; a body that must report a problem does so
//!   out-of-band through state it owns.
//!
//! Reconfiguring the worker count takes effect for subsequent calls;
//! in-flight calls keep the pool they started with. The count is
//! last-write-wins by design.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, RwLock};

use crate::error::{Error, Result};

/// Explicit handle to a fixed-size worker pool.
///
/// Handles are cheap to clone and share one underlying pool, so a
/// `set_worker_count` through any clone is visible to all of them.
///
/// # Example
///
/// ```rust
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use pixwash_core::ThreadPool;
///
/// let pool = ThreadPool::new(4).unwrap();
/// let hits: Vec<AtomicUsize> = (0..64).map(|_| AtomicUsize::new(0)).collect();
/// pool.parallel_for(0, hits.len(), |i| {
///     hits[i].fetch_add(1, Ordering::Relaxed);
/// });
/// assert!(hits.iter().all(|h| h.load(Ordering::Relaxed) == 1));
/// ```
#[derive(Clone)]
pub struct ThreadPool {
    inner: Arc<Inner>,
}

struct Inner {
    /// `None` means single-threaded execution on the caller's thread.
    pool: RwLock<Option<Arc<rayon::ThreadPool>>>,
    workers: AtomicUsize,
}

fn build_pool(workers: usize) -> Result<Option<Arc<rayon::ThreadPool>>> {
    if workers <= 1 {
        return Ok(None);
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| Error::PoolBuild {
            reason: e.to_string(),
        })?;
    Ok(Some(Arc::new(pool)))
}

impl ThreadPool {
    /// Creates a pool with `workers` threads (clamped to at least 1).
    ///
    /// # Errors
    ///
    /// Returns [`Error::PoolBuild`] if the worker threads cannot be spawned.
    pub fn new(workers: usize) -> Result<Self> {
        let workers = workers.max(1);
        let pool = build_pool(workers)?;
        Ok(Self {
            inner: Arc::new(Inner {
                pool: RwLock::new(pool),
                workers: AtomicUsize::new(workers),
            }),
        })
    }

    /// Creates a single-worker pool that runs everything on the caller's
    /// thread. Cannot fail.
    pub fn serial() -> Self {
        Self {
            inner: Arc::new(Inner {
                pool: RwLock::new(None),
                workers: AtomicUsize::new(1),
            }),
        }
    }

    /// Reconfigures the pool to exactly `workers` threads (clamped to at
    /// least 1).
    ///
    /// Takes effect for subsequent `parallel_*` calls; calls already running
    /// keep the pool they started with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PoolBuild`] if the new worker threads cannot be
    /// spawned; the previous configuration stays in place.
    pub fn set_worker_count(&self, workers: usize) -> Result<()> {
        let workers = workers.max(1);
        let new_pool = build_pool(workers)?;
        let mut guard = match self.inner.pool.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = new_pool;
        self.inner.workers.store(workers, Ordering::Release);
        Ok(())
    }

    /// Returns the current worker count.
    #[inline]
    pub fn worker_count(&self) -> usize {
        self.inner.workers.load(Ordering::Acquire)
    }

    fn handle(&self) -> Option<Arc<rayon::ThreadPool>> {
        let guard = match self.inner.pool.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.clone()
    }

    /// Runs `body(i)` for every `i` in `[begin, end)`, exactly once each.
    ///
    /// The range is split into contiguous chunks, at most one per worker.
    /// Blocks until every index has run. Indices may execute in any order
    /// and concurrently; `body` must be safe to call from multiple threads
    /// on disjoint indices.
    pub fn parallel_for<F>(&self, begin: usize, end: usize, body: F)
    where
        F: Fn(usize) + Sync,
    {
        if end <= begin {
            return;
        }
        let total = end - begin;
        let workers = self.worker_count();

        match self.handle() {
            Some(pool) if workers > 1 && total > 1 => {
                let chunk = total.div_ceil(workers);
                pool.scope(|scope| {
                    let body = &body;
                    let mut start = begin;
                    while start < end {
                        let stop = (start + chunk).min(end);
                        scope.spawn(move |_| {
                            for i in start..stop {
                                body(i);
                            }
                        });
                        start = stop;
                    }
                });
            }
            _ => {
                for i in begin..end {
                    body(i);
                }
            }
        }
    }

    /// Runs `body(row_index, row)` for every `row_len`-sized chunk of
    /// `data`, exactly once each.
    ///
    /// Same partitioning and barrier semantics as
    /// [`parallel_for`](Self::parallel_for), with the disjointness the
    /// contract demands made structural: each worker receives exclusive
    /// `&mut` access to the rows it owns. A trailing chunk shorter than
    /// `row_len` is passed through as-is.
    pub fn parallel_rows<T, F>(&self, data: &mut [T], row_len: usize, body: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync,
    {
        if row_len == 0 || data.is_empty() {
            return;
        }
        let rows = data.len().div_ceil(row_len);
        let workers = self.worker_count().min(rows);

        match self.handle() {
            Some(pool) if workers > 1 && rows > 1 => {
                let rows_per_worker = rows.div_ceil(workers);
                let chunk_len = rows_per_worker * row_len;
                pool.scope(|scope| {
                    let body = &body;
                    for (chunk_index, chunk) in data.chunks_mut(chunk_len).enumerate() {
                        let base = chunk_index * rows_per_worker;
                        scope.spawn(move |_| {
                            for (offset, row) in chunk.chunks_mut(row_len).enumerate() {
                                body(base + offset, row);
                            }
                        });
                    }
                });
            }
            _ => {
                for (index, row) in data.chunks_mut(row_len).enumerate() {
                    body(index, row);
                }
            }
        }
    }
}

impl std::fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPool")
            .field("workers", &self.worker_count())
            .finish()
    }
}

/// Returns the process-wide convenience pool.
///
/// Sized to the machine's available parallelism on first use; falls back to
/// a serial pool if worker threads cannot be spawned. Purely a convenience:
/// everything accepting a pool takes an explicit handle.
pub fn default_pool() -> &'static ThreadPool {
    static DEFAULT: OnceLock<ThreadPool> = OnceLock::new();
    DEFAULT.get_or_init(|| {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        ThreadPool::new(workers).unwrap_or_else(|_| ThreadPool::serial())
    })
}
