//! Data protected by a factory-created [`Mutex`].

use core::cell::UnsafeCell;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicBool, Ordering};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use kern_status::{KResult, Status};

use crate::mutex::{Mutex, MutexFactory, ScopedLock};

/// A value behind a capability [`Mutex`].
///
/// The backend may be reentrant, so a second `lock()` from the thread that
/// already holds a guard would otherwise alias `&mut T`. That case returns
/// `FAILED_PRECONDITION` instead.
///
/// ```ignore
/// let handlers = Guarded::new(Vec::new());
/// handlers.lock()?.push(h);
/// ```
pub struct Guarded<T> {
    mutex: Arc<dyn Mutex>,
    borrowed: AtomicBool,
    data: UnsafeCell<T>,
}

// Safety: access to `data` requires holding `mutex` and winning `borrowed`.
unsafe impl<T: Send> Send for Guarded<T> {}
unsafe impl<T: Send> Sync for Guarded<T> {}

impl<T> Guarded<T> {
    /// Protect `value` with a mutex from [`MutexFactory::create_mutex`].
    pub fn new(value: T) -> Self {
        Self::with_mutex(value, MutexFactory::create_mutex())
    }

    /// Protect `value` with a specific mutex.
    pub fn with_mutex(value: T, mutex: Arc<dyn Mutex>) -> Self {
        Self { mutex, borrowed: AtomicBool::new(false), data: UnsafeCell::new(value) }
    }

    /// Block until the data is available.
    pub fn lock(&self) -> KResult<GuardedRef<'_, T>> {
        let lock = ScopedLock::new(&*self.mutex)?;
        self.claim(lock)
    }

    /// `Ok(None)` when the lock is not available within `timeout`
    /// (`None`: try once).
    pub fn try_lock(&self, timeout: Option<Duration>) -> KResult<Option<GuardedRef<'_, T>>> {
        match ScopedLock::try_new(&*self.mutex, timeout)? {
            Some(lock) => self.claim(lock).map(Some),
            None => Ok(None),
        }
    }

    fn claim<'a>(&'a self, lock: ScopedLock<'a>) -> KResult<GuardedRef<'a, T>> {
        if self.borrowed.swap(true, Ordering::Acquire) {
            // `lock` drops here, undoing the reentrant acquire.
            return Err(Status::failed_precondition_error(
                "guarded data already borrowed by this thread",
            ));
        }
        Ok(GuardedRef { owner: self, _lock: lock })
    }

    /// The mutex guarding this value.
    pub fn mutex(&self) -> &Arc<dyn Mutex> {
        &self.mutex
    }

    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }

    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

impl<T: Default> Default for Guarded<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Guarded<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.try_lock(None) {
            Ok(Some(guard)) => f.debug_struct("Guarded").field("data", &*guard).finish(),
            _ => f.debug_struct("Guarded").field("data", &"<locked>").finish(),
        }
    }
}

/// Exclusive access to the data of a [`Guarded`].
pub struct GuardedRef<'a, T> {
    owner: &'a Guarded<T>,
    // Dropped after `Drop::drop` clears the borrow flag.
    _lock: ScopedLock<'a>,
}

impl<T> Deref for GuardedRef<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // Safety: we hold the lock and the borrow flag
        unsafe { &*self.owner.data.get() }
    }
}

impl<T> DerefMut for GuardedRef<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // Safety: we hold the lock and the borrow flag
        unsafe { &mut *self.owner.data.get() }
    }
}

impl<T> Drop for GuardedRef<'_, T> {
    fn drop(&mut self) {
        self.owner.borrowed.store(false, Ordering::Release);
    }
}
