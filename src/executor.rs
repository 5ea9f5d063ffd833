//! The parallel executor: runs a batch plan's descriptors across a scoped
//! thread pool with dynamic, chunk-size-1 work stealing (§4.4, §5).
//!
//! Each worker builds its own codec state once at startup (an [`Inflater`]
//! or [`Deflater`], via `worker_factory`) and then claims descriptors one at
//! a time from a shared [`AtomicUsize`] cursor until the plan is exhausted.
//! There is no other cross-thread synchronization: every descriptor writes
//! to a disjoint region of the destination, so workers never contend on
//! anything but the cursor itself.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use crate::error::{Error, Result};

/// Resolve a requested thread count into an effective one.
///
/// `0` means "let the executor decide", mirroring the teacher's own
/// `effective_threads` convention; any explicit count is clamped to a sane
/// range so a caller can't accidentally oversubscribe by orders of
/// magnitude.
pub fn resolve_thread_count(requested: usize) -> usize {
    match requested {
        0 => num_cpus::get().clamp(1, 32),
        n => n.clamp(1, 32),
    }
}

/// A raw-pointer wrapper around a full destination buffer, letting scoped
/// worker threads reconstruct disjoint `&mut [u8]` windows into it from
/// plain offsets and lengths.
///
/// # Safety
///
/// Callers must guarantee that the `(offset, len)` windows handed out to
/// workers via [`RawOut::window`] are pairwise disjoint. The work-stealing
/// cursor in [`execute`] upholds this: each descriptor index, and therefore
/// each `(offset, len)` pair, is claimed by exactly one worker.
pub(crate) struct RawOut {
    ptr: *mut u8,
    len: usize,
}

unsafe impl Send for RawOut {}
unsafe impl Sync for RawOut {}

impl RawOut {
    pub(crate) fn new(buf: &mut [u8]) -> Self {
        Self { ptr: buf.as_mut_ptr(), len: buf.len() }
    }

    /// # Safety
    ///
    /// `offset + len` must be within bounds, and this window must not
    /// overlap any other window handed out concurrently.
    pub(crate) unsafe fn window(&self, offset: usize, len: usize) -> &'static mut [u8] {
        debug_assert!(offset + len <= self.len);
        std::slice::from_raw_parts_mut(self.ptr.add(offset), len)
    }
}

/// A raw-pointer wrapper around a set of independently-allocated output
/// buffers (deflate's one-buffer-per-block model), letting scoped worker
/// threads reconstruct a `&mut [u8]` for any one buffer by index.
///
/// # Safety
///
/// Callers must guarantee each index is claimed by at most one worker. The
/// deflate planner assigns each descriptor a distinct `out_buffer_index`,
/// and the work-stealing cursor claims each descriptor index exactly once.
pub(crate) struct RawBuffers {
    buffers: Vec<(*mut u8, usize)>,
}

unsafe impl Send for RawBuffers {}
unsafe impl Sync for RawBuffers {}

impl RawBuffers {
    pub(crate) fn new(buffers: &mut [&mut [u8]]) -> Self {
        Self { buffers: buffers.iter_mut().map(|b| (b.as_mut_ptr(), b.len())).collect() }
    }

    /// # Safety
    ///
    /// `index` must be claimed by exactly one caller across the batch.
    pub(crate) unsafe fn buffer(&self, index: usize) -> &'static mut [u8] {
        let (ptr, len) = self.buffers[index];
        std::slice::from_raw_parts_mut(ptr, len)
    }
}

/// Run `job` for every index in `0..num_descriptors`, using up to
/// `num_threads` scoped worker threads that each build their codec state
/// once via `worker_factory` and then pull indices from a shared cursor.
///
/// `job` receives the worker's own codec state and the descriptor index it
/// claimed, and returns that descriptor's outcome. Results are collected
/// into a `Vec<Option<T>>` in descriptor order via per-slot [`OnceLock`]s,
/// so no lock is held across a descriptor's execution.
///
/// If a worker panics, its claimed descriptor's slot is left empty, and this
/// function returns [`Error::WorkerPanicked`] once the scope unwinds.
pub fn execute<W, T, F, J>(
    num_descriptors: usize,
    num_threads: usize,
    worker_factory: F,
    job: J,
) -> Result<Vec<T>>
where
    W: Send,
    T: Send,
    F: Fn() -> W + Sync,
    J: Fn(&mut W, usize) -> T + Sync,
{
    if num_descriptors == 0 {
        return Ok(Vec::new());
    }

    let cursor = AtomicUsize::new(0);
    let slots: Vec<OnceLock<T>> = (0..num_descriptors).map(|_| OnceLock::new()).collect();
    let threads = num_threads.min(num_descriptors).max(1);

    let scope_result = crossbeam::thread::scope(|scope| {
        for _ in 0..threads {
            let cursor = &cursor;
            let slots = &slots;
            let worker_factory = &worker_factory;
            let job = &job;
            scope.spawn(move |_| {
                let mut worker = worker_factory();
                loop {
                    let index = cursor.fetch_add(1, Ordering::Relaxed);
                    if index >= slots.len() {
                        break;
                    }
                    let result = job(&mut worker, index);
                    let _ = slots[index].set(result);
                }
            });
        }
    });

    scope_result.map_err(|_| Error::WorkerPanicked)?;

    let mut results = Vec::with_capacity(num_descriptors);
    for slot in slots {
        results.push(slot.into_inner().ok_or(Error::WorkerPanicked)?);
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU64;

    #[test]
    fn resolves_zero_to_available_parallelism() {
        assert!(resolve_thread_count(0) >= 1);
        assert_eq!(resolve_thread_count(4), 4);
        assert_eq!(resolve_thread_count(1000), 32);
    }

    #[test]
    fn raw_out_hands_out_disjoint_windows() {
        let mut buf = vec![0u8; 32];
        let raw = RawOut::new(&mut buf);
        let ranges = [(0usize, 4usize), (4, 10), (20, 12)];
        let windows: Vec<&mut [u8]> = ranges.iter().map(|&(o, l)| unsafe { raw.window(o, l) }).collect();
        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0].len(), 4);
        assert_eq!(windows[1].len(), 10);
        assert_eq!(windows[2].len(), 12);
    }

    #[test]
    fn raw_buffers_hands_out_one_buffer_per_index() {
        let mut a = vec![0u8; 8];
        let mut b = vec![0u8; 16];
        let mut bufs: Vec<&mut [u8]> = vec![&mut a, &mut b];
        let raw = RawBuffers::new(&mut bufs);
        unsafe {
            assert_eq!(raw.buffer(0).len(), 8);
            assert_eq!(raw.buffer(1).len(), 16);
        }
    }

    #[test]
    fn execute_runs_every_index_exactly_once() {
        let seen = (0..50).map(|_| AtomicU64::new(0)).collect::<Vec<_>>();
        let results = execute(
            50,
            4,
            || (),
            |_worker, index| {
                seen[index].fetch_add(1, Ordering::SeqCst);
                index * 2
            },
        )
        .unwrap();

        assert_eq!(results.len(), 50);
        for (i, r) in results.iter().enumerate() {
            assert_eq!(*r, i * 2);
        }
        for s in &seen {
            assert_eq!(s.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn execute_with_zero_descriptors_returns_empty() {
        let results = execute(0, 4, || (), |_w: &mut (), _i| 0u8).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn worker_factory_runs_once_per_worker_not_per_descriptor() {
        let builds = AtomicU64::new(0);
        let _ = execute(
            200,
            8,
            || {
                builds.fetch_add(1, Ordering::SeqCst);
            },
            |_worker, index| index,
        )
        .unwrap();
        assert!(builds.load(Ordering::SeqCst) <= 8);
    }
}
