//! The cache-wide exclusivity boundary and the duplicate-tick guard.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, MutexGuard};

/// Single lock around all snapshot state.
///
/// Writers hold it for a whole rebuild pass; readers hold it only while
/// they copy or walk a container. A generation counter is bumped every
/// time a write guard is released, so readers can tell whether anything
/// changed since they last looked.
///
/// ```text
/// Producer → write() ── rebuild ── drop → generation + 1
/// Consumer → read()  ── draw ───── drop
/// ```
pub struct SnapshotLock<T> {
    /// The guarded state.
    state: Mutex<T>,
    /// Number of completed write passes.
    generation: AtomicU64,
}

impl<T> SnapshotLock<T> {
    /// Wraps `state` in a new lock.
    #[must_use]
    pub fn new(state: T) -> Self {
        Self {
            state: Mutex::new(state),
            generation: AtomicU64::new(0),
        }
    }

    /// Begins a write pass.
    ///
    /// Blocks until no reader holds the lock. The pass is published when
    /// the returned guard is dropped.
    #[must_use]
    pub fn write(&self) -> WriteGuard<'_, T> {
        WriteGuard {
            lock: self,
            guard: self.state.lock(),
        }
    }

    /// Acquires read access to the last published state.
    #[must_use]
    pub fn read(&self) -> ReadGuard<'_, T> {
        ReadGuard {
            guard: self.state.lock(),
        }
    }

    /// Attempts read access without blocking.
    #[must_use]
    pub fn try_read(&self) -> Option<ReadGuard<'_, T>> {
        self.state.try_lock().map(|guard| ReadGuard { guard })
    }

    /// Returns the number of published write passes.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Consumes the lock and returns the state.
    pub fn into_inner(self) -> T {
        self.state.into_inner()
    }
}

impl<T> fmt::Debug for SnapshotLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotLock")
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}

impl<T: Default> Default for SnapshotLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Exclusive access for one rebuild pass.
///
/// When dropped, the pass is counted as published.
pub struct WriteGuard<'a, T> {
    lock: &'a SnapshotLock<T>,
    guard: MutexGuard<'a, T>,
}

impl<T> Deref for WriteGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl<T> DerefMut for WriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

impl<T> Drop for WriteGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.generation.fetch_add(1, Ordering::Release);
    }
}

/// Read-only access to published state.
pub struct ReadGuard<'a, T> {
    guard: MutexGuard<'a, T>,
}

impl<T> Deref for ReadGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// Remembers the last simulation tick that was processed.
///
/// The simulation may invoke its tick callback several times per tick;
/// only the first call for a given tick gets through.
#[derive(Debug)]
pub struct TickGate {
    last: AtomicU64,
}

impl TickGate {
    /// Value meaning "no tick seen yet".
    const UNSEEN: u64 = u64::MAX;

    /// Creates a gate that lets the first tick through.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(Self::UNSEEN),
        }
    }

    /// Records `tick` and returns true if it differs from the last one seen.
    #[inline]
    pub fn enter(&self, tick: u64) -> bool {
        self.last.swap(tick, Ordering::AcqRel) != tick
    }

    /// Returns the last tick let through, if any.
    #[must_use]
    pub fn last(&self) -> Option<u64> {
        match self.last.load(Ordering::Acquire) {
            Self::UNSEEN => None,
            tick => Some(tick),
        }
    }

    /// Forgets the last tick so the next call to [`TickGate::enter`] passes.
    pub fn reset(&self) {
        self.last.store(Self::UNSEEN, Ordering::Release);
    }
}

impl Default for TickGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_generation_tracking() {
        let lock = SnapshotLock::new(0u32);
        let gen1 = lock.generation();

        {
            let mut write = lock.write();
            *write = 5;
        }

        assert!(lock.generation() > gen1);
        assert_eq!(*lock.read(), 5);
    }

    #[test]
    fn test_reader_never_sees_partial_pass() {
        let lock = Arc::new(SnapshotLock::new(vec![0u32; 64]));
        let writer = {
            let lock = Arc::clone(&lock);
            thread::spawn(move || {
                for pass in 1..=200u32 {
                    let mut state = lock.write();
                    for slot in state.iter_mut() {
                        *slot = pass;
                    }
                }
            })
        };

        for _ in 0..200 {
            let state = lock.read();
            let first = state[0];
            assert!(state.iter().all(|&v| v == first));
        }

        writer.join().unwrap();
        assert_eq!(lock.generation(), 200);
    }

    #[test]
    fn test_tick_gate() {
        let gate = TickGate::new();
        assert_eq!(gate.last(), None);

        assert!(gate.enter(10));
        assert!(!gate.enter(10));
        assert!(gate.enter(11));
        assert_eq!(gate.last(), Some(11));

        gate.reset();
        assert!(gate.enter(11));
    }
}
