//! Mutex capability and the process-wide factory.
//!
//! Components never name a concrete lock type. They ask
//! [`MutexFactory::create_mutex`] for an `Arc<dyn Mutex>` and hold it for
//! their lifetime. The factory's constructor can be swapped at runtime;
//! only mutexes created afterwards use the new backend.
//!
//! # Example
//!
//! ```ignore
//! let m = MutexFactory::create_mutex();
//! {
//!     let _lock = m.lock()?;
//!     // critical section
//! } // released here, also on unwind
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use kern_status::{KResult, Status};
use lock_api::RawReentrantMutex;
use parking_lot::{RawMutex, RawThreadId, RwLock};

/// Lock capability.
///
/// # Safety
///
/// Implementors must provide mutual exclusion between threads: while one
/// thread holds the lock, `acquire` on any other thread must not return
/// `Ok(true)`. A backend may be reentrant for the owning thread.
pub unsafe trait Mutex: Send + Sync {
    /// Acquire the lock.
    ///
    /// - `blocking == false`: try once.
    /// - `blocking == true`, `timeout == Some(d)`: wait at most `d`.
    /// - `blocking == true`, `timeout == None`: wait indefinitely.
    ///
    /// Returns `Ok(true)` when acquired and `Ok(false)` when not.
    fn acquire(&self, blocking: bool, timeout: Option<Duration>) -> KResult<bool>;

    /// Release one level of the lock. Releasing a lock the calling thread
    /// does not hold returns `FAILED_PRECONDITION`.
    fn release(&self) -> Status;

    /// Short backend name for diagnostics.
    fn backend(&self) -> &'static str {
        "custom"
    }
}

impl dyn Mutex + '_ {
    /// Block until acquired and return the scoped guard.
    pub fn lock(&self) -> KResult<ScopedLock<'_>> {
        ScopedLock::new(self)
    }

    /// Try to acquire within `timeout` (`None`: try once).
    pub fn try_lock(&self, timeout: Option<Duration>) -> KResult<Option<ScopedLock<'_>>> {
        ScopedLock::try_new(self, timeout)
    }
}

impl fmt::Debug for dyn Mutex + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutex").field("backend", &self.backend()).finish()
    }
}

// ── ScopedLock ────────────────────────────────────────────────────

/// Holds a [`Mutex`] acquired and releases it when dropped, including
/// during unwinding.
#[must_use = "the lock is released as soon as the ScopedLock is dropped"]
pub struct ScopedLock<'a> {
    mutex: &'a dyn Mutex,
}

impl<'a> ScopedLock<'a> {
    /// Block until `mutex` is acquired.
    pub fn new(mutex: &'a dyn Mutex) -> KResult<Self> {
        if mutex.acquire(true, None)? {
            Ok(Self { mutex })
        } else {
            Err(Status::internal_error("blocking acquire returned without the lock"))
        }
    }

    /// `Ok(None)` when the lock could not be taken in time.
    pub fn try_new(mutex: &'a dyn Mutex, timeout: Option<Duration>) -> KResult<Option<Self>> {
        let acquired = match timeout {
            Some(d) => mutex.acquire(true, Some(d))?,
            None => mutex.acquire(false, None)?,
        };
        Ok(acquired.then_some(Self { mutex }))
    }
}

impl Drop for ScopedLock<'_> {
    fn drop(&mut self) {
        let status = self.mutex.release();
        if !status.ok() {
            tracing::warn!(%status, backend = self.mutex.backend(), "scoped lock release failed");
        }
    }
}

// ── ReentrantMutex ────────────────────────────────────────────────

/// Default backend: a reentrant lock owned by an OS thread.
pub struct ReentrantMutex {
    raw: RawReentrantMutex<RawMutex, RawThreadId>,
}

impl ReentrantMutex {
    pub const fn new() -> Self {
        Self { raw: RawReentrantMutex::INIT }
    }

    /// True when the calling thread holds the lock.
    pub fn is_owned_by_current_thread(&self) -> bool {
        self.raw.is_owned_by_current_thread()
    }

    pub fn is_locked(&self) -> bool {
        self.raw.is_locked()
    }
}

impl Default for ReentrantMutex {
    fn default() -> Self {
        Self::new()
    }
}

// Safety: RawReentrantMutex excludes all threads but the owner.
unsafe impl Mutex for ReentrantMutex {
    fn acquire(&self, blocking: bool, timeout: Option<Duration>) -> KResult<bool> {
        Ok(match (blocking, timeout) {
            (false, _) => self.raw.try_lock(),
            (true, Some(d)) => self.raw.try_lock_for(d),
            (true, None) => {
                self.raw.lock();
                true
            }
        })
    }

    fn release(&self) -> Status {
        if !self.raw.is_owned_by_current_thread() {
            return Status::failed_precondition_error(
                "release of a mutex not held by the calling thread",
            );
        }
        // Safety: ownership by this thread checked above.
        unsafe { self.raw.unlock() };
        Status::new()
    }

    fn backend(&self) -> &'static str {
        "reentrant"
    }
}

// ── MutexFactory ──────────────────────────────────────────────────

/// Constructor installed in the factory.
pub type MutexCtor = fn() -> Arc<dyn Mutex>;

fn default_ctor() -> Arc<dyn Mutex> {
    Arc::new(ReentrantMutex::new())
}

static MUTEX_CTOR: RwLock<MutexCtor> = parking_lot::const_rwlock(default_ctor as MutexCtor);

/// Process-wide selector for the mutex backend.
pub struct MutexFactory;

impl MutexFactory {
    /// Create a mutex with the currently installed backend.
    pub fn create_mutex() -> Arc<dyn Mutex> {
        let ctor = *MUTEX_CTOR.read();
        ctor()
    }

    /// Install `ctor` for all subsequently created mutexes.
    pub fn set_implementation(ctor: MutexCtor) {
        *MUTEX_CTOR.write() = ctor;
        tracing::debug!("mutex factory backend replaced");
    }

    /// Restore the default [`ReentrantMutex`] backend.
    pub fn reset_implementation() {
        Self::set_implementation(default_ctor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kern_status::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn reentrant_same_thread() {
        let m = ReentrantMutex::new();
        assert_eq!(m.acquire(true, None), Ok(true));
        assert_eq!(m.acquire(false, None), Ok(true));
        assert!(m.release().ok());
        assert!(m.is_owned_by_current_thread());
        assert!(m.release().ok());
        assert!(!m.is_locked());
    }

    #[test]
    fn release_without_holding() {
        let m = ReentrantMutex::new();
        assert_eq!(m.release().code(), StatusCode::FailedPrecondition);
    }

    #[test]
    fn release_from_other_thread_fails() {
        let m = Arc::new(ReentrantMutex::new());
        assert_eq!(m.acquire(true, None), Ok(true));
        let m2 = Arc::clone(&m);
        let code = thread::spawn(move || m2.release().code()).join().unwrap();
        assert_eq!(code, StatusCode::FailedPrecondition);
        assert!(m.release().ok());
    }

    #[test]
    fn try_and_timed_acquire_fail_when_held_elsewhere() {
        let m = Arc::new(ReentrantMutex::new());
        assert_eq!(m.acquire(true, None), Ok(true));
        let m2 = Arc::clone(&m);
        let (try_once, timed) = thread::spawn(move || {
            (
                m2.acquire(false, None),
                m2.acquire(true, Some(Duration::from_millis(20))),
            )
        })
        .join()
        .unwrap();
        assert_eq!(try_once, Ok(false));
        assert_eq!(timed, Ok(false));
        assert!(m.release().ok());
    }

    #[test]
    fn scoped_lock_releases_on_drop() {
        let m = MutexFactory::create_mutex();
        {
            let _g = m.lock().unwrap();
        }
        let m2 = Arc::clone(&m);
        let got = thread::spawn(move || {
            let g = m2.try_lock(None).unwrap();
            g.is_some()
        })
        .join()
        .unwrap();
        assert!(got);
    }

    #[test]
    fn scoped_lock_releases_on_unwind() {
        let m = MutexFactory::create_mutex();
        let m2 = Arc::clone(&m);
        let r = thread::spawn(move || {
            let _g = m2.lock().unwrap();
            panic!("inside critical section");
        })
        .join();
        assert!(r.is_err());
        assert!(m.try_lock(Some(Duration::from_millis(100))).unwrap().is_some());
    }

    #[test]
    fn counter_is_exclusive() {
        let m = MutexFactory::create_mutex();
        let hits = Arc::new(AtomicUsize::new(0));
        let max_inside = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let (m, hits, max_inside) = (Arc::clone(&m), Arc::clone(&hits), Arc::clone(&max_inside));
                thread::spawn(move || {
                    for _ in 0..500 {
                        let _g = m.lock().unwrap();
                        let inside = hits.fetch_add(1, Ordering::SeqCst) + 1;
                        max_inside.fetch_max(inside, Ordering::SeqCst);
                        hits.fetch_sub(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn debug_shows_backend() {
        let m = MutexFactory::create_mutex();
        assert!(format!("{:?}", &*m).contains("backend"));
    }
}
